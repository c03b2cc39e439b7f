//! Memo Cache demo
//!
//! Runs the bundled collection projections through the shared cache twice
//! and prints the results together with the cache statistics.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memo_cache::collections::{
    memoized_first, memoized_primes, memoized_product, memoized_sorted, memoized_sum,
};
use memo_cache::json::to_json_pretty;
use memo_cache::{shared_cache, MemoConfig};

#[derive(Debug, Serialize)]
struct Report {
    input: Vec<i64>,
    sum: i64,
    product: i64,
    sorted: Vec<i64>,
    primes: Vec<i64>,
    first: Option<i64>,
}

/// Entry point.
///
/// # Usage
/// `memo_cache [N...]` - integers to summarize (default: 1 2 3 4 5)
fn main() -> Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memo_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = MemoConfig::from_env();
    info!(
        "Configuration loaded: count_limit={}, cost_limit={}",
        config.count_limit, config.cost_limit
    );

    let input = parse_args(std::env::args().skip(1))?;
    let cache = Some(shared_cache());

    // The second pass is served entirely from the cache.
    let mut report = None;
    for pass in 1..=2 {
        report = Some(Report {
            input: input.clone(),
            sum: memoized_sum(&input, cache),
            product: memoized_product(&input, cache),
            sorted: memoized_sorted(&input, cache),
            primes: memoized_primes(&input, cache),
            first: memoized_first(&input, cache).ok(),
        });
        info!("Pass {} done: {:?}", pass, shared_cache().stats());
    }

    println!("{}", to_json_pretty(&report)?);
    println!("{}", to_json_pretty(&shared_cache().stats())?);
    Ok(())
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Vec<i64>> {
    let values = args
        .map(|arg| {
            arg.parse::<i64>()
                .with_context(|| format!("not an integer: {arg}"))
        })
        .collect::<Result<Vec<_>>>()?;

    if values.is_empty() {
        Ok((1..=5).collect())
    } else {
        Ok(values)
    }
}
