//! Load generator: fills one book per ticker from concurrent producers, then
//! matches every book in parallel and reports timings and residual depths.
//!
//! Tunable through `LOB_*` environment variables (see `SimulationConfig`),
//! log verbosity through `RUST_LOG`.

use limit_order_book::{BookRegistry, OrderBookError, SharedOrderBook, Side, SimulationConfig, Trade};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = SimulationConfig::from_env()?;
    info!(
        tickers = ?config.tickers,
        orders_per_side = config.orders_per_side,
        producers_per_side = config.producers_per_side,
        seed = config.seed,
        "starting simulation"
    );

    let registry = BookRegistry::with_config(config.tickers.iter().cloned(), config.order_book_config());

    info!("populating limit orders");
    let population_start = Instant::now();
    let rejected = populate(&registry, &config)?;
    info!(
        elapsed_ms = population_start.elapsed().as_millis() as u64,
        rejected, "population complete"
    );
    if rejected > 0 {
        warn!(rejected, "some synthetic orders were refused by their books");
    }
    log_depths(&registry);

    info!("order matching begins");
    let matching_start = Instant::now();
    let (sender, receiver) = mpsc::channel::<Trade>();
    let consumer = thread::spawn(move || {
        let mut volume: BTreeMap<String, u64> = BTreeMap::new();
        for trade in receiver {
            *volume.entry(trade.ticker).or_insert(0) += trade.quantity;
        }
        volume
    });

    let summaries = registry.match_all_streaming(&sender);
    drop(sender);
    let volume = consumer.join().map_err(|_| "trade consumer panicked")?;

    info!(
        elapsed_ms = matching_start.elapsed().as_millis() as u64,
        "order matching complete"
    );
    for (ticker, summary) in &summaries {
        info!(
            ticker = %ticker,
            trades = summary.trades,
            filled_quantity = summary.filled_quantity,
            streamed_quantity = volume.get(ticker).copied().unwrap_or(0),
            "matching summary"
        );
    }
    log_depths(&registry);

    Ok(())
}

/// Spawns `producers_per_side` threads per side per ticker and returns how many
/// submissions the books refused.
fn populate(registry: &BookRegistry, config: &SimulationConfig) -> Result<usize, OrderBookError> {
    let rejected = AtomicUsize::new(0);

    let mut jobs = Vec::new();
    for ticker in registry.tickers() {
        let book = registry.book(ticker)?;
        for side in [Side::Bid, Side::Ask] {
            for producer in 0..config.producers_per_side {
                let share = config.orders_per_side / config.producers_per_side
                    + usize::from(producer < config.orders_per_side % config.producers_per_side);
                jobs.push((book, side, share));
            }
        }
    }

    thread::scope(|scope| {
        for (index, (book, side, share)) in jobs.into_iter().enumerate() {
            let rejected = &rejected;
            let seed = config.seed.wrapping_add(index as u64);
            scope.spawn(move || {
                let refused = produce(book, side, share, seed, config);
                rejected.fetch_add(refused, Ordering::Relaxed);
            });
        }
    });

    Ok(rejected.into_inner())
}

fn produce(book: &SharedOrderBook, side: Side, count: usize, seed: u64, config: &SimulationConfig) -> usize {
    let mut rng = StdRng::seed_from_u64(seed);
    let price_range = match side {
        Side::Bid => config.bid_price_range.clone(),
        Side::Ask => config.ask_price_range.clone(),
    };

    let mut refused = 0;
    for _ in 0..count {
        let price = format!("{:.2}", rng.gen_range(price_range.clone()));
        let quantity = rng.gen_range(1..=config.max_quantity);

        if book.submit(book.ticker(), &price, quantity, side).is_err() {
            refused += 1;
        }
    }
    refused
}

fn log_depths(registry: &BookRegistry) {
    for (ticker, (bids, asks)) in registry.depths() {
        info!(ticker = %ticker, bids, asks, "book depth");
    }
}
