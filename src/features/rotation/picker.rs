//! Phrase rotation
//!
//! Each subscriber cycles through the whole catalog in a random order that
//! is unique to them: an index is never repeated until every index has been
//! delivered once, then the cycle resets. The set of delivered indices lives
//! on the [`UserRecord`] and is persisted with it, so a restart resumes the
//! cycle where it left off.

use log::info;
use rand::Rng;

use crate::features::catalog::PhraseCatalog;
use crate::features::users::UserRecord;

/// Pick the next phrase for `record`, marking its index as delivered.
///
/// Rejection-samples uniformly over the catalog until an undelivered index
/// comes up. The catalog is guaranteed non-empty, and a full `sent_indices`
/// set is cleared before sampling, so the loop always terminates - a
/// one-phrase catalog accepts immediately after the reset. Expected cost is
/// O(catalog) near the end of a cycle, which is fine at catalog scale.
pub fn next_phrase<R: Rng>(
    record: &mut UserRecord,
    catalog: &PhraseCatalog,
    rng: &mut R,
) -> String {
    if record.sent_indices.len() >= catalog.len() {
        record.sent_indices.clear();
        info!(
            "Phrase cycle complete for user {} (@{}) - starting over",
            record.id, record.user_name
        );
    }

    let index = loop {
        let candidate = rng.random_range(0..catalog.len());
        if !record.sent_indices.contains(&candidate) {
            break candidate;
        }
    };
    record.sent_indices.insert(index);

    catalog.get(index).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn catalog_of(n: usize) -> PhraseCatalog {
        PhraseCatalog::new((0..n).map(|i| format!("phrase {i}")).collect())
    }

    #[test]
    fn test_full_cycle_is_a_permutation() {
        let catalog = catalog_of(7);
        let mut record = UserRecord::new(1, "ada");
        let mut rng = StdRng::seed_from_u64(42);

        let mut seen = HashSet::new();
        for _ in 0..catalog.len() {
            let phrase = next_phrase(&mut record, &catalog, &mut rng);
            assert!(seen.insert(phrase), "phrase repeated within a cycle");
        }
        assert_eq!(seen.len(), catalog.len());

        // The next call starts a fresh cycle
        let phrase = next_phrase(&mut record, &catalog, &mut rng);
        assert!(seen.contains(&phrase));
        assert_eq!(record.sent_indices.len(), 1);
    }

    #[test]
    fn test_single_phrase_catalog_terminates() {
        let catalog = catalog_of(1);
        let mut record = UserRecord::new(1, "ada");
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..5 {
            assert_eq!(next_phrase(&mut record, &catalog, &mut rng), "phrase 0");
        }
    }

    #[test]
    fn test_cycles_are_independent_per_user() {
        let catalog = catalog_of(5);
        let mut a = UserRecord::new(1, "ada");
        let mut b = UserRecord::new(2, "grace");
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..catalog.len() {
            next_phrase(&mut a, &catalog, &mut rng);
        }
        assert_eq!(a.sent_indices.len(), catalog.len());
        assert!(b.sent_indices.is_empty());
    }

    #[test]
    fn test_stale_indices_from_a_larger_catalog_still_terminate() {
        // A reload may renumber: the persisted set can reference indices
        // beyond the current catalog.
        let catalog = catalog_of(3);
        let mut record = UserRecord::new(1, "ada");
        record.sent_indices.insert(10);
        record.sent_indices.insert(11);
        let mut rng = StdRng::seed_from_u64(3);

        let phrase = next_phrase(&mut record, &catalog, &mut rng);
        assert!(catalog.phrases().contains(&phrase));
    }
}
