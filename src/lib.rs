//! A price-time priority limit order book for single instruments, built on
//! binary-heap order queues and serialized behind a lock for concurrent use.
//!
//! ## Architecture
//!
//! The library is layered from the leaves up:
//!
//! 1. `Order`: immutable identity, ticker, side and price, mutable remaining quantity
//! 2. `OrderQueue`: a binary heap of orders ordered by side-aware price priority,
//!    ties broken by arrival sequence
//! 3. `OrderBook`: one queue per side for one ticker, order submission and the
//!    batch matching pass
//! 4. `SharedOrderBook`: a cloneable handle serializing every call on a book behind a mutex
//! 5. `BookRegistry`: one shared book per ticker, matched in parallel across tickers
//!
//! Matching never prints or logs trades to a shared stream. Trades are handed
//! to the caller, either collected into a `Vec`, passed to a closure, or sent
//! down a channel.
//!
//! ## Example Usage
//!
//! ```rust
//! use limit_order_book::{SharedOrderBook, Side, Decimal};
//! use std::thread;
//!
//! let book = SharedOrderBook::new("AAPL");
//!
//! // 1. Populate both sides concurrently; each submission takes the lock briefly
//! let bids = {
//!     let book = book.clone();
//!     thread::spawn(move || book.submit("AAPL", "200.00", 100, Side::Bid))
//! };
//! let asks = {
//!     let book = book.clone();
//!     thread::spawn(move || book.submit("AAPL", "199.50", 40, Side::Ask))
//! };
//! let bid = bids.join().unwrap().unwrap();
//! let ask = asks.join().unwrap().unwrap();
//!
//! // 2. Run a matching pass; the lock is held until the book no longer crosses
//! let trades = book.match_orders();
//! assert_eq!(trades.len(), 1);
//! assert_eq!(trades[0].quantity, 40);
//!
//! // Trades execute at the price of whichever order arrived first
//! let resting_price = if bid.sequence < ask.sequence { bid.price } else { ask.price };
//! assert_eq!(trades[0].price, resting_price);
//!
//! // 3. The partially filled bid stays queued with its remainder
//! assert_eq!(book.best_bid().map(|order| order.quantity), Some(60));
//! assert_eq!(book.best_bid().map(|order| order.price), Some(Decimal::new(20000, 2)));
//! ```
//!
//! Errors (`TickerMismatch`, `InvalidPrice`, `InvalidQuantity`, `BookFull`,
//! `UnknownTicker`) are always returned to the caller and never leave a book
//! partially modified.

mod book_registry;
mod config;
mod error;
mod order_book;
mod order_queue;
mod price;
mod shared_order_book;
mod types;

// Re-export public API
pub use book_registry::BookRegistry;
pub use config::{ConfigError, OrderBookConfig, SimulationConfig};
pub use error::{OrderBookError, Result};
pub use order_book::{MatchSummary, OrderBook, MAX_ORDER_QUANTITY};
pub use order_queue::OrderQueue;
pub use price::parse_price;
pub use shared_order_book::SharedOrderBook;
pub use types::{Order, OrderId, Side, Trade};

// Re-export commonly used external dependencies
pub use rust_decimal::Decimal;
