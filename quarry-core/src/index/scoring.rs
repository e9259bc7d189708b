//! Scoring functions.

use crate::index::types::Quarry;
use quarry_types::{Document, MAX_RESULT_DOCUMENT_COUNT, RELEVANCE_EPSILON};

impl Quarry {
    /// `ln(total documents / documents containing the word)`.
    #[inline(always)]
    pub(crate) fn inverse_document_freq(&self, posting_count: usize) -> f64 {
        (self.documents.len() as f64 / posting_count as f64).ln()
    }
}

/// Truncating integer average; 0 for no ratings.
pub(crate) fn average_rating(ratings: &[i32]) -> i32 {
    if ratings.is_empty() {
        return 0;
    }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    // The mean of i32 values always fits in an i32.
    (sum / ratings.len() as i64) as i32
}

/// Sorts hits into ranking order and keeps the top [`MAX_RESULT_DOCUMENT_COUNT`].
///
/// Relevances are first sorted descending with a total order. Runs of
/// neighbours closer than [`RELEVANCE_EPSILON`] then form tie clusters. A
/// cluster narrower than epsilon end to end is sorted by rating descending,
/// then id ascending. A wider cluster is reordered by adjacent swaps only, so
/// every adjacent output pair agrees with [`Document::rank_cmp`].
pub(crate) fn rank_and_truncate(docs: &mut Vec<Document>) {
    docs.sort_unstable_by(|a, b| {
        b.relevance
            .total_cmp(&a.relevance)
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut start = 0usize;
    while start < docs.len() {
        let mut end = start + 1;
        while end < docs.len() && near_tie(&docs[end - 1], &docs[end]) {
            end += 1;
        }
        let cluster = &mut docs[start..end];
        if near_tie(&cluster[0], &cluster[cluster.len() - 1]) {
            // Equal ratings fall back to id so that last-bit summation noise
            // never reorders a cluster.
            cluster.sort_unstable_by(|a, b| {
                b.rating.cmp(&a.rating).then_with(|| a.id.cmp(&b.id))
            });
        } else {
            settle_chain(cluster);
        }
        start = end;
    }

    docs.truncate(MAX_RESULT_DOCUMENT_COUNT);
}

#[inline(always)]
fn near_tie(a: &Document, b: &Document) -> bool {
    (a.relevance - b.relevance).abs() < RELEVANCE_EPSILON
}

/// Insertion pass over a relevance-descending chain.
///
/// Each entry moves up past neighbours within epsilon that it outranks on
/// rating (id on equal rating) and stops at the first neighbour it does not.
/// Everything above an entry has relevance at least as high, so a stop at a
/// neighbour outside epsilon leaves that pair in relevance order.
fn settle_chain(chain: &mut [Document]) {
    for i in 1..chain.len() {
        let mut j = i;
        while j > 0
            && near_tie(&chain[j - 1], &chain[j])
            && outranks(&chain[j], &chain[j - 1])
        {
            chain.swap(j - 1, j);
            j -= 1;
        }
    }
}

#[inline(always)]
fn outranks(a: &Document, b: &Document) -> bool {
    a.rating > b.rating || (a.rating == b.rating && a.id < b.id)
}
