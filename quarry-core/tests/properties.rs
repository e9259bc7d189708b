//! Property-based tests over small random corpora.
//!
//! The vocabulary is deliberately tiny so that documents share words, ties
//! in relevance are common, and duplicate word sets actually occur.

use proptest::prelude::*;
use quarry_core::{
    find_duplicates, remove_duplicates, DocId, Document, DocumentStatus, ExecutionPolicy, Quarry,
    MAX_RESULT_DOCUMENT_COUNT,
};
use std::cmp::Ordering;
use std::collections::BTreeSet;

const VOCABULARY: &[&str] = &[
    "cat", "dog", "city", "mouse", "house", "tail", "collar", "in", "the",
];
const STOP_WORDS: &str = "in the";

#[derive(Debug, Clone)]
struct GeneratedDoc {
    text: String,
    status: DocumentStatus,
    ratings: Vec<i32>,
}

fn word_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(VOCABULARY)
}

fn status_strategy() -> impl Strategy<Value = DocumentStatus> {
    prop_oneof![
        4 => Just(DocumentStatus::Actual),
        1 => Just(DocumentStatus::Irrelevant),
        1 => Just(DocumentStatus::Banned),
        1 => Just(DocumentStatus::Removed),
    ]
}

fn doc_strategy() -> impl Strategy<Value = GeneratedDoc> {
    (
        prop::collection::vec(word_strategy(), 1..7),
        status_strategy(),
        prop::collection::vec(-10i32..=10, 0..4),
    )
        .prop_map(|(words, status, ratings)| GeneratedDoc {
            text: words.join(" "),
            status,
            ratings,
        })
}

fn corpus_strategy() -> impl Strategy<Value = Vec<GeneratedDoc>> {
    prop::collection::vec(doc_strategy(), 1..24)
}

fn query_strategy() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(word_strategy(), 0..4),
        prop::collection::vec(word_strategy(), 0..2),
    )
        .prop_map(|(plus, minus)| {
            let mut parts: Vec<String> = plus.into_iter().map(str::to_owned).collect();
            parts.extend(minus.into_iter().map(|word| format!("-{}", word)));
            parts.join(" ")
        })
}

/// Ids are spread out so the ordinal and the id differ.
fn build(corpus: &[GeneratedDoc]) -> Quarry {
    let mut index = Quarry::from_stop_words_text(STOP_WORDS).expect("valid stop words");
    for (n, doc) in corpus.iter().enumerate() {
        index
            .add_document(n as DocId * 3, &doc.text, doc.status, &doc.ratings)
            .expect("should add doc");
    }
    index
}

fn minus_words(query: &str) -> Vec<&str> {
    query
        .split(' ')
        .filter_map(|word| word.strip_prefix('-'))
        .filter(|word| !STOP_WORDS.split(' ').any(|stop| stop == *word))
        .collect()
}

fn ids(hits: &[Document]) -> Vec<DocId> {
    hits.iter().map(|doc| doc.id).collect()
}

fn word_set(index: &Quarry, id: DocId) -> BTreeSet<String> {
    index
        .word_frequencies(id)
        .keys()
        .map(|word| (*word).to_owned())
        .collect()
}

proptest! {
    #[test]
    fn results_are_capped_and_ordered(corpus in corpus_strategy(), query in query_strategy()) {
        let index = build(&corpus);
        let hits = index.find_top_documents(&query).unwrap();

        prop_assert!(hits.len() <= MAX_RESULT_DOCUMENT_COUNT);
        for pair in hits.windows(2) {
            prop_assert_ne!(pair[0].rank_cmp(&pair[1]), Ordering::Greater, "{:?}", hits);
        }
        for hit in &hits {
            prop_assert!(hit.relevance >= 0.0);
            prop_assert_eq!(
                index.document_info(hit.id).map(|(status, _)| status),
                Some(DocumentStatus::Actual)
            );
        }
    }

    #[test]
    fn minus_words_exclude_documents(corpus in corpus_strategy(), query in query_strategy()) {
        let index = build(&corpus);
        let minus = minus_words(&query);

        for hit in index.find_top_documents(&query).unwrap() {
            let words = word_set(&index, hit.id);
            for word in &minus {
                prop_assert!(!words.contains(*word), "doc {} contains -{}", hit.id, word);
            }
        }

        for id in &index {
            let (matched, _) = index.match_document(&query, id).unwrap();
            let words = word_set(&index, id);
            if minus.iter().any(|word| words.contains(*word)) {
                prop_assert!(matched.is_empty());
            }
            for word in &matched {
                prop_assert!(words.contains(*word));
            }
        }
    }

    #[test]
    fn parallel_paths_agree_with_sequential(corpus in corpus_strategy(), query in query_strategy()) {
        let index = build(&corpus);

        let seq = index
            .find_top_documents_with(ExecutionPolicy::Sequential, &query, DocumentStatus::Actual)
            .unwrap();
        let par = index
            .find_top_documents_with(ExecutionPolicy::Parallel, &query, DocumentStatus::Actual)
            .unwrap();
        prop_assert_eq!(ids(&seq), ids(&par));
        for (a, b) in seq.iter().zip(&par) {
            prop_assert!((a.relevance - b.relevance).abs() < 1e-9);
        }

        for id in &index {
            prop_assert_eq!(
                index.match_document_with(ExecutionPolicy::Sequential, &query, id).unwrap(),
                index.match_document_with(ExecutionPolicy::Parallel, &query, id).unwrap()
            );
        }
    }

    #[test]
    fn add_then_remove_is_invisible(
        corpus in corpus_strategy(),
        extra in doc_strategy(),
        query in query_strategy(),
        parallel in any::<bool>(),
    ) {
        let mut index = build(&corpus);
        let before = index.find_top_documents(&query).unwrap();
        let count = index.document_count();

        let id = 1_000_001;
        index.add_document(id, &extra.text, extra.status, &extra.ratings).unwrap();
        let policy = if parallel { ExecutionPolicy::Parallel } else { ExecutionPolicy::Sequential };
        index.remove_document_with(policy, id);

        prop_assert_eq!(index.document_count(), count);
        prop_assert!(index.word_frequencies(id).is_empty());
        prop_assert!(index.iter().all(|live| live != id));
        prop_assert_eq!(index.find_top_documents(&query).unwrap(), before);
    }

    #[test]
    fn duplicate_removal_keeps_lowest_id(corpus in corpus_strategy()) {
        let mut index = build(&corpus);
        let original: Vec<(DocId, BTreeSet<String>)> =
            index.iter().map(|id| (id, word_set(&index, id))).collect();

        let reported = find_duplicates(&index);
        let removed = remove_duplicates(&mut index);
        prop_assert_eq!(&reported, &removed);

        for &id in &removed {
            let set = &original.iter().find(|(doc, _)| *doc == id).unwrap().1;
            let keeper = original
                .iter()
                .find(|(doc, words)| words == set && *doc < id)
                .map(|(doc, _)| *doc);
            prop_assert!(keeper.is_some(), "{} removed without a lower twin", id);
            prop_assert!(index.document_info(keeper.unwrap()).is_some());
        }

        let survivors: Vec<BTreeSet<String>> =
            index.iter().map(|id| word_set(&index, id)).collect();
        let distinct: BTreeSet<&BTreeSet<String>> = survivors.iter().collect();
        prop_assert_eq!(distinct.len(), survivors.len());
    }

    #[test]
    fn term_frequencies_sum_to_one(corpus in corpus_strategy()) {
        let index = build(&corpus);
        for id in &index {
            let freqs = index.word_frequencies(id);
            if !freqs.is_empty() {
                let total: f64 = freqs.values().sum();
                prop_assert!((total - 1.0).abs() < 1e-9);
            }
        }
    }
}
