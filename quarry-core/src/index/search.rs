//! Ranked TF-IDF search.

use crate::concurrent::ConcurrentMap;
use crate::index::query::Query;
use crate::index::scoring::rank_and_truncate;
use crate::index::types::Quarry;
use quarry_types::{
    DocId, Document, DocumentPredicate, DocumentStatus, ExecutionPolicy, SearchError,
};

use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::atomic::Ordering;

impl Quarry {
    /// Returns the top documents with status `Actual` for `raw_query`.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidWord` if the query is malformed.
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>, SearchError> {
        self.find_top_documents_by(raw_query, DocumentStatus::Actual)
    }

    /// Returns the top documents accepted by `predicate`.
    ///
    /// Pass a [`DocumentStatus`] to filter by status, or a closure over
    /// `(id, status, rating)`.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidWord` if the query is malformed.
    pub fn find_top_documents_by<P>(
        &self,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>, SearchError>
    where
        P: DocumentPredicate,
    {
        self.find_top_documents_with(ExecutionPolicy::Sequential, raw_query, predicate)
    }

    /// Ranked search with an explicit execution policy.
    ///
    /// Both policies return the same documents in the same order; relevances
    /// may differ in the last bits because the parallel path sums in a
    /// different order.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidWord` if the query is malformed.
    pub fn find_top_documents_with<P>(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>, SearchError>
    where
        P: DocumentPredicate,
    {
        let query = self.parse_query(raw_query)?;

        let mut hits = match policy {
            ExecutionPolicy::Sequential => self.find_all_documents(&query, &predicate),
            ExecutionPolicy::Parallel => self.find_all_documents_par(&query, &predicate),
        };
        let matched = hits.len();
        rank_and_truncate(&mut hits);

        self.query_count.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(
            ?policy,
            plus = query.plus_words.len(),
            minus = query.minus_words.len(),
            matched,
            returned = hits.len(),
            "ranked search"
        );
        Ok(hits)
    }

    fn find_all_documents<P>(&self, query: &Query<'_>, predicate: &P) -> Vec<Document>
    where
        P: DocumentPredicate,
    {
        let mut relevance: BTreeMap<DocId, f64> = BTreeMap::new();

        for word in &query.plus_words {
            let Some(postings) = self.postings_for(word) else {
                continue;
            };
            let idf = self.inverse_document_freq(postings.len());
            for (&id, &term_freq) in postings {
                if self.accepts(predicate, id) {
                    *relevance.entry(id).or_insert(0.0) += term_freq * idf;
                }
            }
        }

        for word in &query.minus_words {
            let Some(postings) = self.postings_for(word) else {
                continue;
            };
            for id in postings.keys() {
                relevance.remove(id);
            }
        }

        self.collect_hits(relevance)
    }

    /// Plus words fan out across the rayon pool, each worker adding into a
    /// sharded map; minus words then erase their documents from the same map.
    fn find_all_documents_par<P>(&self, query: &Query<'_>, predicate: &P) -> Vec<Document>
    where
        P: DocumentPredicate,
    {
        let relevance: ConcurrentMap<DocId, f64> =
            ConcurrentMap::new(self.config.shard_count(self.documents.len()));

        query.plus_words.par_iter().for_each(|word| {
            let Some(postings) = self.postings_for(word) else {
                return;
            };
            let idf = self.inverse_document_freq(postings.len());
            for (&id, &term_freq) in postings {
                if self.accepts(predicate, id) {
                    *relevance.access(id) += term_freq * idf;
                }
            }
        });

        query.minus_words.par_iter().for_each(|word| {
            if let Some(postings) = self.postings_for(word) {
                for id in postings.keys() {
                    relevance.erase(id);
                }
            }
        });

        self.collect_hits(relevance.build_ordinary_map())
    }

    #[inline]
    fn accepts<P: DocumentPredicate>(&self, predicate: &P, id: DocId) -> bool {
        self.documents
            .get(&id)
            .is_some_and(|doc| predicate.matches(id, doc.status, doc.rating))
    }

    fn collect_hits(&self, relevance: BTreeMap<DocId, f64>) -> Vec<Document> {
        relevance
            .into_iter()
            .filter_map(|(id, score)| {
                let doc = self.documents.get(&id)?;
                Some(Document::new(id, score, doc.rating))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Quarry {
        let mut quarry = Quarry::from_stop_words_text("and in the").unwrap();
        quarry
            .add_document(1, "white cat fashionable collar", DocumentStatus::Actual, &[8, -3])
            .unwrap();
        quarry
            .add_document(2, "fluffy cat fluffy tail", DocumentStatus::Actual, &[7, 2, 7])
            .unwrap();
        quarry
            .add_document(3, "groomed dog expressive eyes", DocumentStatus::Actual, &[5, -12, 2, 1])
            .unwrap();
        quarry
            .add_document(4, "groomed starling eugene", DocumentStatus::Banned, &[9])
            .unwrap();
        quarry
    }

    fn ids(hits: &[Document]) -> Vec<DocId> {
        hits.iter().map(|doc| doc.id).collect()
    }

    #[test]
    fn default_search_only_sees_actual() {
        let quarry = corpus();
        let hits = quarry.find_top_documents("groomed").unwrap();
        assert_eq!(ids(&hits), vec![3]);

        let banned = quarry
            .find_top_documents_by("groomed", DocumentStatus::Banned)
            .unwrap();
        assert_eq!(ids(&banned), vec![4]);
    }

    #[test]
    fn closure_predicate_filters_during_accumulation() {
        let quarry = corpus();
        let even_id = |id: DocId, _: DocumentStatus, _: i32| id % 2 == 0;
        let even = quarry
            .find_top_documents_by("fluffy groomed cat", even_id)
            .unwrap();
        assert_eq!(ids(&even), vec![2, 4]);
    }

    #[test]
    fn minus_word_drops_document() {
        let quarry = corpus();
        let hits = quarry.find_top_documents("cat -collar").unwrap();
        assert_eq!(ids(&hits), vec![2]);
    }

    #[test]
    fn unknown_words_match_nothing() {
        let quarry = corpus();
        assert!(quarry.find_top_documents("parrot").unwrap().is_empty());
        assert!(quarry.find_top_documents("").unwrap().is_empty());
        assert!(quarry.find_top_documents("-cat").unwrap().is_empty());
    }

    #[test]
    fn malformed_query_is_an_error() {
        let quarry = corpus();
        assert!(quarry.find_top_documents("cat --dog").is_err());
        assert!(quarry.find_top_documents("cat -").is_err());
    }

    #[test]
    fn parallel_matches_sequential() {
        let quarry = corpus();
        for raw in ["fluffy groomed cat", "cat -collar", "eyes tail collar -dog", "nothing"] {
            let seq = quarry
                .find_top_documents_with(ExecutionPolicy::Sequential, raw, DocumentStatus::Actual)
                .unwrap();
            let par = quarry
                .find_top_documents_with(ExecutionPolicy::Parallel, raw, DocumentStatus::Actual)
                .unwrap();
            assert_eq!(ids(&seq), ids(&par), "query {raw:?}");
            for (a, b) in seq.iter().zip(&par) {
                assert!((a.relevance - b.relevance).abs() < 1e-12);
                assert_eq!(a.rating, b.rating);
            }
        }
    }

    #[test]
    fn search_counts_queries() {
        let quarry = corpus();
        quarry.find_top_documents("cat").unwrap();
        quarry
            .find_top_documents_with(ExecutionPolicy::Parallel, "cat", DocumentStatus::Actual)
            .unwrap();
        let _ = quarry.find_top_documents("--bad");
        assert_eq!(quarry.metrics().queries_executed, 2);
    }
}
