//! Rolling window of recent search outcomes.
//!
//! Every search made through a [`RequestQueue`] is one tick of a logical
//! clock. The queue remembers, for the last [`REQUEST_WINDOW_TICKS`] ticks,
//! whether the search came back empty.

use crate::index::Quarry;
use quarry_types::{Document, DocumentPredicate, DocumentStatus, SearchError};

use std::collections::VecDeque;

/// Window length in ticks (one day of minutes).
pub const REQUEST_WINDOW_TICKS: u64 = 1440;

#[derive(Debug, Clone, Copy)]
struct RequestOutcome {
    tick: u64,
    is_empty: bool,
}

/// Search wrapper that counts empty results over a sliding window.
pub struct RequestQueue<'a> {
    index: &'a Quarry,
    requests: VecDeque<RequestOutcome>,
    no_results: usize,
    current_tick: u64,
}

impl<'a> RequestQueue<'a> {
    /// Creates an empty queue over `index`.
    pub fn new(index: &'a Quarry) -> Self {
        Self {
            index,
            requests: VecDeque::new(),
            no_results: 0,
            current_tick: 0,
        }
    }

    /// Searches for `Actual` documents and records the outcome.
    ///
    /// # Errors
    ///
    /// Returns the search error unchanged; a failed search does not advance
    /// the clock.
    pub fn add_find_request(&mut self, raw_query: &str) -> Result<Vec<Document>, SearchError> {
        self.add_find_request_by(raw_query, DocumentStatus::Actual)
    }

    /// Searches with `predicate` (a closure or a [`DocumentStatus`]) and
    /// records the outcome.
    ///
    /// # Errors
    ///
    /// Returns the search error unchanged; a failed search does not advance
    /// the clock.
    pub fn add_find_request_by<P>(
        &mut self,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>, SearchError>
    where
        P: DocumentPredicate,
    {
        let results = self.index.find_top_documents_by(raw_query, predicate)?;
        self.record(results.is_empty());
        Ok(results)
    }

    /// Number of empty results within the current window.
    #[inline]
    pub fn no_result_requests(&self) -> usize {
        self.no_results
    }

    /// Number of searches within the current window.
    #[inline]
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Returns `true` if no search falls within the current window.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    fn record(&mut self, is_empty: bool) {
        self.current_tick += 1;

        while let Some(front) = self.requests.front() {
            if front.tick + REQUEST_WINDOW_TICKS > self.current_tick {
                break;
            }
            if front.is_empty {
                self.no_results -= 1;
            }
            self.requests.pop_front();
        }

        self.requests.push_back(RequestOutcome {
            tick: self.current_tick,
            is_empty,
        });
        if is_empty {
            self.no_results += 1;
        }
        tracing::trace!(
            tick = self.current_tick,
            is_empty,
            no_results = self.no_results,
            "request recorded"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_types::DocId;

    fn index() -> Quarry {
        let mut quarry = Quarry::from_stop_words_text("and in at").unwrap();
        let docs: [(DocId, &str); 5] = [
            (1, "curly cat curly tail"),
            (2, "curly dog and fancy collar"),
            (3, "big cat fancy collar"),
            (4, "big dog sparrow Eugene"),
            (5, "big dog sparrow Vasiliy"),
        ];
        for (id, text) in docs {
            quarry
                .add_document(id, text, DocumentStatus::Actual, &[1, 2, 3])
                .expect("should add doc");
        }
        quarry
    }

    #[test]
    fn window_evicts_oldest_requests() {
        let quarry = index();
        let mut queue = RequestQueue::new(&quarry);

        for _ in 0..1439 {
            assert!(queue.add_find_request("empty request").unwrap().is_empty());
        }
        assert_eq!(queue.no_result_requests(), 1439);

        // Tick 1440: the window is full but nothing has aged out yet.
        assert!(!queue.add_find_request("curly dog").unwrap().is_empty());
        assert_eq!(queue.no_result_requests(), 1439);
        assert_eq!(queue.len(), 1440);

        // Each further tick pushes one empty request out.
        queue.add_find_request("big collar").unwrap();
        assert_eq!(queue.no_result_requests(), 1438);
        queue.add_find_request("sparrow").unwrap();
        assert_eq!(queue.no_result_requests(), 1437);
        assert_eq!(queue.len(), 1440);
    }

    #[test]
    fn failed_searches_are_not_recorded() {
        let quarry = index();
        let mut queue = RequestQueue::new(&quarry);
        assert!(queue.add_find_request("--bad").is_err());
        assert!(queue.is_empty());
        assert_eq!(queue.no_result_requests(), 0);
    }

    #[test]
    fn predicate_and_status_overloads() {
        let quarry = index();
        let mut queue = RequestQueue::new(&quarry);

        let banned = queue
            .add_find_request_by("curly", DocumentStatus::Banned)
            .unwrap();
        assert!(banned.is_empty());

        let odd_id = |id: DocId, _: DocumentStatus, _: i32| id % 2 == 1;
        let odd = queue.add_find_request_by("big", odd_id).unwrap();
        assert_eq!(odd.iter().map(|doc| doc.id).collect::<Vec<_>>(), vec![3, 5]);

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.no_result_requests(), 1);
    }
}
