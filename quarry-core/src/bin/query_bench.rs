//! Query Benchmarking Tool
//!
//! Loads a corpus (one document per line), then measures ranked search
//! throughput under each execution strategy the index offers.
//!
//! ## What It Benchmarks
//!
//! 1. **Indexing**: adding every corpus line as a document
//! 2. **Sequential**: one query at a time, single-threaded ranking
//! 3. **Parallel ranking**: one query at a time, ranking fanned out over rayon
//! 4. **Batch**: all queries at once through `process_queries`
//!
//! ## Usage
//!
//! ```bash
//! # Queries are derived from the corpus itself
//! ./target/release/query_bench /path/to/corpus.txt
//!
//! # Queries read from a file, one per line (minus words allowed)
//! ./target/release/query_bench /path/to/corpus.txt /path/to/queries.txt
//!
//! # Index and per-query logging
//! RUST_LOG=quarry_core=debug ./target/release/query_bench corpus.txt
//! ```
//!
//! Lines the index rejects (tabs and other control characters) are skipped
//! and counted.

use std::env;
use std::error::Error;
use std::fs;
use std::time::{Duration, Instant};

use quarry_core::analyzer::check_word;
use quarry_core::{
    find_duplicates, paginate, process_queries, process_queries_joined, DocId, DocumentStatus,
    ExecutionPolicy, Quarry,
};
use tracing_subscriber::{fmt, EnvFilter};

const WARMUP_RUNS: usize = 1;
const MEASURE_RUNS: usize = 5;
const STOP_WORDS: &str = "a an and at in of on the to with";
const DERIVED_QUERY_COUNT: usize = 1000;
const PREVIEW_PAGE_SIZE: usize = 5;

fn main() -> Result<(), Box<dyn Error>> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: query_bench <corpus> [queries]");
        std::process::exit(1);
    }

    println!("Loading corpus...");
    let corpus = fs::read_to_string(&args[1])?;
    println!("Corpus size: {}", fmt_bytes(corpus.len() as u64));

    let (index, skipped) = bench_indexing(&corpus)?;
    println!("Skipped     : {} lines\n", fmt_count(skipped as u64));

    let queries: Vec<String> = match args.get(2) {
        Some(path) => fs::read_to_string(path)?
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_owned)
            .collect(),
        None => derive_queries(&corpus),
    };
    if queries.is_empty() {
        eprintln!("No queries to run");
        std::process::exit(1);
    }
    println!("Queries     : {}\n", fmt_count(queries.len() as u64));

    bench_policy(&index, &queries, ExecutionPolicy::Sequential)?;
    bench_policy(&index, &queries, ExecutionPolicy::Parallel)?;
    bench_batch(&index, &queries)?;

    preview(&index, &queries)?;

    let metrics = index.metrics();
    println!("--------------------------------");
    println!("Documents   : {}", fmt_count(metrics.current_doc_count));
    println!("Words       : {}", fmt_count(metrics.distinct_words));
    println!("Searches    : {}", fmt_count(metrics.queries_executed));
    println!("Duplicates  : {}", fmt_count(find_duplicates(&index).len() as u64));
    println!("--------------------------------");

    Ok(())
}

fn bench_indexing(corpus: &str) -> Result<(Quarry, usize), Box<dyn Error>> {
    println!("=== Indexing ===");

    let start = Instant::now();
    let mut index = Quarry::from_stop_words_text(STOP_WORDS)?;
    let mut skipped = 0usize;
    for (line_no, line) in corpus.lines().enumerate() {
        let id = DocId::try_from(line_no)?;
        let rating = (line.len() % 10) as i32;
        if let Err(err) = index.add_document(id, line, DocumentStatus::Actual, &[rating]) {
            tracing::debug!(line = line_no, %err, "skipping line");
            skipped += 1;
        }
    }
    let elapsed = start.elapsed();

    print_perf("Indexing", corpus.len(), elapsed, index.document_count() as u64, "Docs");
    Ok((index, skipped))
}

fn bench_policy(
    index: &Quarry,
    queries: &[String],
    policy: ExecutionPolicy,
) -> Result<(), Box<dyn Error>> {
    println!("=== {:?} ===", policy);

    let run = || -> Result<usize, Box<dyn Error>> {
        let mut hits = 0usize;
        for query in queries {
            hits += index
                .find_top_documents_with(policy, query, DocumentStatus::Actual)?
                .len();
        }
        Ok(std::hint::black_box(hits))
    };

    warmup(|| run().map(drop))?;
    let elapsed = measure(|| run().map(drop))?;

    let label = format!("{:?}", policy);
    print_perf(&label, 0, elapsed, queries.len() as u64, "Queries");
    Ok(())
}

fn bench_batch(index: &Quarry, queries: &[String]) -> Result<(), Box<dyn Error>> {
    println!("=== Batch ===");

    let run = || -> Result<(), Box<dyn Error>> {
        std::hint::black_box(process_queries(index, queries)?);
        Ok(())
    };

    warmup(run)?;
    let elapsed = measure(run)?;

    print_perf("Batch", 0, elapsed, queries.len() as u64, "Queries");
    Ok(())
}

/// Prints the first pages of joined results for the first few queries.
fn preview(index: &Quarry, queries: &[String]) -> Result<(), Box<dyn Error>> {
    let sample = &queries[..queries.len().min(3)];
    let joined = process_queries_joined(index, sample)?;

    println!("=== Preview: {:?} ===", sample);
    for (n, page) in paginate(&joined, PREVIEW_PAGE_SIZE)?.into_iter().take(2).enumerate() {
        println!("Page {}", n + 1);
        for doc in page {
            println!("  {}", doc);
        }
    }
    println!();
    Ok(())
}

/// Two-word queries built from every Nth corpus line, the second word negated
/// on every third query.
fn derive_queries(corpus: &str) -> Vec<String> {
    let lines = corpus.lines().count().max(1);
    let step = (lines / DERIVED_QUERY_COUNT).max(1);

    corpus
        .lines()
        .step_by(step)
        .filter_map(|line| {
            let mut words = line
                .split(' ')
                .filter(|w| !w.starts_with('-') && check_word(w).is_ok());
            Some((words.next()?, words.next()?))
        })
        .take(DERIVED_QUERY_COUNT)
        .enumerate()
        .map(|(n, (first, second))| {
            if n % 3 == 2 {
                format!("{} -{}", first, second)
            } else {
                format!("{} {}", first, second)
            }
        })
        .collect()
}

fn warmup<F, E>(mut f: F) -> Result<(), E>
where
    F: FnMut() -> Result<(), E>,
{
    for _ in 0..WARMUP_RUNS {
        f()?;
    }
    Ok(())
}

fn measure<F, E>(mut f: F) -> Result<Duration, E>
where
    F: FnMut() -> Result<(), E>,
{
    let mut total = Duration::ZERO;

    for _ in 0..MEASURE_RUNS {
        let start = Instant::now();
        f()?;
        total += start.elapsed();
    }

    Ok(total / MEASURE_RUNS as u32)
}

fn print_perf(label: &str, input_bytes: usize, elapsed: Duration, items: u64, unit: &str) {
    let secs = elapsed.as_secs_f64();

    println!("--------------------------------");
    println!("Mode        : {}", label);
    println!("Elapsed     : {:.3} s", secs);

    if input_bytes > 0 {
        let mib = input_bytes as f64 / (1024.0 * 1024.0);
        println!("Throughput  : {:.2} MiB/s", mib / secs);
    }
    if items > 0 {
        println!("{:<12}: {}", unit, fmt_count(items));
        println!("{:<12}: {}", format!("{}/sec", unit), fmt_count((items as f64 / secs) as u64));
    }

    println!("--------------------------------\n");
}

fn fmt_bytes(b: u64) -> String {
    if b >= 1024 * 1024 * 1024 {
        format!("{:.2} GiB", b as f64 / (1024.0 * 1024.0 * 1024.0))
    } else if b >= 1024 * 1024 {
        format!("{:.2} MiB", b as f64 / (1024.0 * 1024.0))
    } else if b >= 1024 {
        format!("{:.2} KiB", b as f64 / 1024.0)
    } else {
        format!("{} B", b)
    }
}

fn fmt_count(n: u64) -> String {
    let s = n.to_string();
    let mut out = String::with_capacity(s.len() + s.len() / 3);

    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push('_');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}
