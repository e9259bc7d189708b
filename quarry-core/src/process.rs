//! Batch query processing across the rayon pool.

use crate::index::Quarry;
use quarry_types::{Document, SearchError};

use rayon::prelude::*;
use std::time::Instant;

/// Runs [`Quarry::find_top_documents`] for every query in parallel.
///
/// Results are returned in query order, one list per query.
///
/// # Errors
///
/// Fails if any query is malformed. Which error is reported when several
/// queries are malformed is unspecified.
pub fn process_queries<S>(quarry: &Quarry, queries: &[S]) -> Result<Vec<Vec<Document>>, SearchError>
where
    S: AsRef<str> + Sync,
{
    let span = tracing::debug_span!("process_queries", queries = queries.len());
    let _guard = span.enter();
    let start = Instant::now();

    let results = queries
        .par_iter()
        .map(|query| quarry.find_top_documents(query.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        elapsed_us = start.elapsed().as_micros() as u64,
        "batch complete"
    );
    Ok(results)
}

/// Like [`process_queries`], but concatenates all result lists in query order.
///
/// # Errors
///
/// Same as [`process_queries`].
pub fn process_queries_joined<S>(quarry: &Quarry, queries: &[S]) -> Result<Vec<Document>, SearchError>
where
    S: AsRef<str> + Sync,
{
    Ok(process_queries(quarry, queries)?
        .into_iter()
        .flatten()
        .collect())
}
