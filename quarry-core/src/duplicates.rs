//! Duplicate document detection.
//!
//! Two documents are duplicates when they index the same set of distinct
//! words; word counts, order and ratings are ignored. Among duplicates the
//! lowest id is kept.

use crate::arena::WordId;
use crate::index::Quarry;
use quarry_types::DocId;

use rustc_hash::FxHashSet;

/// Returns the ids [`remove_duplicates`] would remove, ascending.
pub fn find_duplicates(quarry: &Quarry) -> Vec<DocId> {
    let mut seen: FxHashSet<Vec<WordId>> = FxHashSet::default();
    let mut duplicates = Vec::new();

    // Store iteration is ascending by id, so the first owner of a word set
    // is always the canonical one.
    for (&id, doc) in &quarry.documents {
        let word_set: Vec<WordId> = doc.word_freqs.keys().copied().collect();
        if !seen.insert(word_set) {
            duplicates.push(id);
        }
    }
    duplicates
}

/// Removes every document whose word set matches a lower-id document.
///
/// Returns the removed ids, ascending.
pub fn remove_duplicates(quarry: &mut Quarry) -> Vec<DocId> {
    let duplicates = find_duplicates(quarry);
    for &id in &duplicates {
        tracing::info!(doc_id = id, "removing duplicate document");
        quarry.remove_document(id);
    }
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_types::DocumentStatus;

    fn add(quarry: &mut Quarry, id: DocId, text: &str) {
        quarry
            .add_document(id, text, DocumentStatus::Actual, &[1, 2])
            .expect("should add doc");
    }

    #[test]
    fn keeps_lowest_id_of_each_group() {
        let mut quarry = Quarry::from_stop_words_text("and with").unwrap();
        add(&mut quarry, 1, "funny pet and nasty rat");
        add(&mut quarry, 2, "funny pet with curly hair");
        // same words as 2
        add(&mut quarry, 3, "funny pet with curly hair");
        // same set as 2, different counts
        add(&mut quarry, 4, "funny pet and curly hair curly");
        // same set as 1, different order
        add(&mut quarry, 5, "nasty rat funny pet");
        add(&mut quarry, 6, "nasty rat with curly hair");
        // subset of 6, not a duplicate
        add(&mut quarry, 7, "nasty rat curly");

        assert_eq!(find_duplicates(&quarry), vec![3, 4, 5]);
        assert_eq!(quarry.document_count(), 7);

        assert_eq!(remove_duplicates(&mut quarry), vec![3, 4, 5]);
        assert_eq!(quarry.iter().collect::<Vec<_>>(), vec![1, 2, 6, 7]);
        assert!(find_duplicates(&quarry).is_empty());
    }

    #[test]
    fn canonical_is_lowest_id_not_first_inserted() {
        let mut quarry = Quarry::new();
        add(&mut quarry, 10, "cat dog");
        add(&mut quarry, 2, "dog cat");
        assert_eq!(remove_duplicates(&mut quarry), vec![10]);
        assert_eq!(quarry.document_id(0), Ok(2));
    }

    #[test]
    fn stop_word_only_documents_share_the_empty_set() {
        let mut quarry = Quarry::from_stop_words_text("in the").unwrap();
        add(&mut quarry, 1, "in the");
        add(&mut quarry, 2, "the");
        add(&mut quarry, 3, "cat");
        assert_eq!(find_duplicates(&quarry), vec![2]);
    }

    #[test]
    fn empty_index_has_no_duplicates() {
        let mut quarry = Quarry::new();
        assert!(remove_duplicates(&mut quarry).is_empty());
    }
}
