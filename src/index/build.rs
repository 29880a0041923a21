use crate::index::types::{Contact, Field, RawContact};
use crate::index::view::{IndexSet, IndexView};
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;

/// Build the three sorted views over a batch of raw contacts
///
/// Normalization and the per-field sorts run on the rayon pool. Sorting is
/// stable, so contacts with equal keys keep their input order.
pub fn build_index_set(records: Vec<RawContact>) -> IndexSet {
    let started = Instant::now();

    // Indexed parallel collect keeps input order
    let contacts: Vec<Arc<Contact>> = records
        .into_par_iter()
        .map(|raw| Arc::new(Contact::from_raw(raw)))
        .collect();

    let (email, (first_name, last_name)) = rayon::join(
        || sorted_view(&contacts, Field::Email),
        || {
            rayon::join(
                || sorted_view(&contacts, Field::FirstName),
                || sorted_view(&contacts, Field::LastName),
            )
        },
    );

    IndexSet::new(email, first_name, last_name, started.elapsed())
}

/// Copy the shared entries and sort them by one field's key
fn sorted_view(contacts: &[Arc<Contact>], field: Field) -> IndexView {
    let mut entries = contacts.to_vec();
    entries.par_sort_by(|a, b| field.key(a).cmp(field.key(b)));
    IndexView::new(field, entries)
}
