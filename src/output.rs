//! Terminal output for lookup results

use crate::index::types::{Contact, Field, normalize};
use crate::query::engine::{LookupOutcome, LookupResult};
use std::io::{self, Write};
use std::sync::Arc;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Print matches one per line, highlighting the matched prefix of each field
pub fn print_matches(
    matches: &[Arc<Contact>],
    query: &str,
    color: bool,
) -> io::Result<()> {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);
    let query = normalize(query);

    for contact in matches {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(stdout, "{}", contact.id)?;
        stdout.reset()?;

        for field in Field::ALL {
            write!(stdout, "  ")?;
            print_field(&mut stdout, field.key(contact), &query)?;
        }
        writeln!(stdout)?;
    }

    Ok(())
}

fn print_field(stdout: &mut StandardStream, value: &str, query: &str) -> io::Result<()> {
    if query.is_empty() || !value.starts_with(query) {
        return write!(stdout, "{}", value);
    }

    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    write!(stdout, "{}", &value[..query.len()])?;
    stdout.reset()?;
    write!(stdout, "{}", &value[query.len()..])
}

/// One-line summary written to stderr
///
/// `available` is the number of matches the index holds across all fields,
/// which exceeds `result.len()` when the deadline cut the lookup short.
pub fn print_summary(result: &LookupResult, shown: usize, available: usize) -> io::Result<()> {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);

    let (label, color) = match result.outcome {
        LookupOutcome::Completed => ("complete", Color::Cyan),
        LookupOutcome::TimedOut => ("partial (deadline reached)", Color::Yellow),
        LookupOutcome::NotWarmedUp => ("no index for user", Color::Yellow),
    };

    write!(
        stderr,
        "{} shown, {} of {} matched in {:.2?} ",
        shown,
        result.len(),
        available,
        result.elapsed
    )?;
    stderr.set_color(ColorSpec::new().set_fg(Some(color)))?;
    writeln!(stderr, "[{}]", label)?;
    stderr.reset()
}
