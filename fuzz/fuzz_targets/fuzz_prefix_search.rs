#![no_main]

use arbitrary::Arbitrary;
use contact_lookup::index::{build_index_set, Field, RawContact};
use contact_lookup::query::{CancelToken, MatchCollector, PrefixSearcher};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    contacts: Vec<(String, String, String)>,
    query: String,
}

fuzz_target!(|input: Input| {
    // Arbitrary (including non-ASCII) text must never panic, and every
    // searcher must agree with a linear scan of its own field
    let records = input
        .contacts
        .into_iter()
        .enumerate()
        .map(|(i, (email, first, last))| RawContact::new(i.to_string(), email, first, last))
        .collect();
    let set = build_index_set(records);
    let query = input.query.to_lowercase();

    for field in Field::ALL {
        let view = set.view(field);
        assert!(view.is_sorted());

        let collector = MatchCollector::new();
        PrefixSearcher::new(field).search(&set, &input.query, &collector, &CancelToken::new());

        let expected = view.iter().filter(|c| field.key(c).starts_with(&query)).count();
        assert_eq!(collector.len(), expected);
    }
});
