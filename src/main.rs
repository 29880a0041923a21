use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use contact_lookup::output;
use contact_lookup::query::PrefixSearcher;
use contact_lookup::repository::random_query;
use contact_lookup::{
    ContactRepository, JsonDirRepository, LookupConfig, LookupEngine, LookupError,
    SyntheticRepository,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "clook")]
#[command(about = "Deadline-bounded prefix lookup over a user's contacts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Lookup deadline in milliseconds (overrides config file and env)
    #[arg(long, global = true)]
    deadline_ms: Option<u64>,

    /// Config file to load instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Warm a user up and run one lookup
    Query {
        /// User whose contacts to search
        user: String,

        /// Prefix to look up (words are joined with spaces; empty matches all)
        query: Vec<String>,

        /// Directory of <user>.json contact files
        #[arg(short, long, conflicts_with = "synthetic")]
        data: Option<PathBuf>,

        /// Generate this many random contacts instead of reading files
        #[arg(short, long, default_value_t = 10_000)]
        synthetic: usize,

        /// Show each contact once even if it matched on several fields
        #[arg(long)]
        distinct: bool,

        /// Maximum matches to print
        #[arg(short = 'n', long, default_value_t = 50)]
        limit: usize,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
    /// Warm a synthetic user up and time many random lookups
    Bench {
        /// Contacts to generate
        #[arg(short, long, default_value_t = 100_000)]
        contacts: usize,

        /// Lookups to run
        #[arg(short, long, default_value_t = 10_000)]
        lookups: usize,

        /// Longest random query
        #[arg(long, default_value_t = 5)]
        max_query_len: usize,

        /// Seed for contacts and queries
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Print the effective configuration
    Config,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error[{}]: {:#}", error_code(&e), e);
            ExitCode::FAILURE
        }
    }
}

/// Stable code of the first `LookupError` in the chain
fn error_code(err: &anyhow::Error) -> &'static str {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<LookupError>())
        .map_or("ERROR", LookupError::code)
}

fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(cli.config.as_deref(), cli.deadline_ms)?;

    match cli.command {
        Commands::Query {
            user,
            query,
            data,
            synthetic,
            distinct,
            limit,
            no_color,
        } => {
            let repository: Box<dyn ContactRepository> = match data {
                Some(dir) => Box::new(JsonDirRepository::new(dir)),
                None => Box::new(SyntheticRepository::new(synthetic)),
            };
            let query = query.join(" ");
            let repository = repository.as_ref();
            run_query(config, &user, &query, repository, distinct, limit, !no_color)?;
        }
        Commands::Bench {
            contacts,
            lookups,
            max_query_len,
            seed,
        } => {
            run_bench(config, contacts, lookups, max_query_len, seed)?;
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            match contact_lookup::config::config_path() {
                Some(path) => println!("config file: {}", path.display()),
                None => println!("config file: (no app data directory)"),
            }
        }
    }

    Ok(())
}

fn resolve_config(path: Option<&Path>, deadline_ms: Option<u64>) -> Result<LookupConfig> {
    let mut config = match path {
        Some(path) => LookupConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => LookupConfig::load(),
    };
    if let Some(ms) = deadline_ms {
        config.deadline_ms = ms;
    }
    config.validate()?;
    Ok(config)
}

fn run_query(
    config: LookupConfig,
    user: &str,
    query: &str,
    repository: &dyn ContactRepository,
    distinct: bool,
    limit: usize,
    color: bool,
) -> Result<()> {
    let engine = LookupEngine::new(config)?;
    engine
        .warm_up(user, repository)
        .with_context(|| format!("Failed to warm up user {}", user))?;

    let result = engine.lookup(user, query);
    let mut matches = if distinct {
        result.distinct()
    } else {
        result.matches.clone()
    };
    matches.sort_by(|a, b| a.email.cmp(&b.email).then_with(|| a.id.cmp(&b.id)));
    matches.truncate(limit);

    let available = engine.store().get(user).map_or(0, |set| {
        PrefixSearcher::all()
            .iter()
            .map(|searcher| searcher.count(&set, query))
            .sum()
    });

    output::print_matches(&matches, query, color)?;
    output::print_summary(&result, matches.len(), available)?;
    Ok(())
}

fn run_bench(
    config: LookupConfig,
    contacts: usize,
    lookups: usize,
    max_query_len: usize,
    seed: u64,
) -> Result<()> {
    let user = "bench";
    let engine = LookupEngine::new(config)?;
    let repository = SyntheticRepository::new(contacts).with_seed(seed);

    let stats = engine.warm_up(user, &repository)?;
    println!(
        "Indexed {} contacts in {:.2?}",
        stats.contacts, stats.build_time
    );

    let mut rng = StdRng::seed_from_u64(seed);
    let mut total_matches = 0usize;
    let mut slowest = Duration::ZERO;
    let started = Instant::now();

    for _ in 0..lookups {
        let query = random_query(&mut rng, max_query_len);
        let result = engine.lookup(user, &query);
        total_matches += result.len();
        slowest = slowest.max(result.elapsed);
    }

    let elapsed = started.elapsed();
    let engine_stats = engine.stats();
    println!("Lookups:    {}", lookups);
    println!("Total time: {:.2?}", elapsed);
    if lookups > 0 {
        println!("Mean:       {:.2?}", elapsed / lookups as u32);
    }
    println!("Slowest:    {:.2?}", slowest);
    println!("Matches:    {}", total_matches);
    println!(
        "Timed out:  {} (deadline {} ms)",
        engine_stats.lookups_timed_out,
        engine.config().deadline_ms
    );

    Ok(())
}
