use crate::config::OrderBookConfig;
use crate::error::Result;
use crate::order_book::{MatchSummary, OrderBook};
use crate::types::{Order, Side, Trade};
use parking_lot::Mutex;
use std::sync::Arc;

/// A cloneable, thread-safe handle to an [`OrderBook`].
///
/// Every call acquires the book's mutex for exactly its own duration, so
/// submissions and matching passes against the same ticker are serialized.
/// The guard is a local, which releases it on every exit path including
/// error returns.
///
/// ## Examples
///
/// ```
/// use limit_order_book::{SharedOrderBook, Side};
/// use std::thread;
///
/// let book = SharedOrderBook::new("SPY");
///
/// let producers: Vec<_> = (0..4)
///     .map(|_| {
///         let book = book.clone();
///         thread::spawn(move || {
///             for _ in 0..100 {
///                 book.submit("SPY", "410.00", 10, Side::Bid).unwrap();
///             }
///         })
///     })
///     .collect();
///
/// for producer in producers {
///     producer.join().unwrap();
/// }
/// assert_eq!(book.queue_depth(Side::Bid), 400);
/// ```
#[derive(Debug, Clone)]
pub struct SharedOrderBook {
    ticker: Arc<str>,
    inner: Arc<Mutex<OrderBook>>,
}

impl SharedOrderBook {
    pub fn new(ticker: impl Into<String>) -> Self {
        Self::from(OrderBook::new(ticker))
    }

    pub fn with_config(ticker: impl Into<String>, config: OrderBookConfig) -> Self {
        Self::from(OrderBook::with_config(ticker, config))
    }

    /// The ticker of the underlying book. Does not take the lock.
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// See [`OrderBook::submit`].
    pub fn submit(&self, ticker: &str, price: &str, quantity: i64, side: Side) -> Result<Order> {
        self.inner.lock().submit(ticker, price, quantity, side)
    }

    /// See [`OrderBook::match_orders`]. Holds the lock for the whole pass.
    pub fn match_orders(&self) -> Vec<Trade> {
        self.inner.lock().match_orders()
    }

    /// See [`OrderBook::match_orders_with`]. `on_trade` runs while the lock is
    /// held, so it must not call back into this book.
    pub fn match_orders_with<F>(&self, on_trade: F) -> MatchSummary
    where
        F: FnMut(Trade),
    {
        self.inner.lock().match_orders_with(on_trade)
    }

    pub fn queue_depth(&self, side: Side) -> usize {
        self.inner.lock().queue_depth(side)
    }

    /// Snapshot of the best bid.
    pub fn best_bid(&self) -> Option<Order> {
        self.inner.lock().best_bid().cloned()
    }

    /// Snapshot of the best ask.
    pub fn best_ask(&self) -> Option<Order> {
        self.inner.lock().best_ask().cloned()
    }

    pub fn is_crossed(&self) -> bool {
        self.inner.lock().is_crossed()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Runs `read` against the book under the lock.
    pub fn with_book<R>(&self, read: impl FnOnce(&OrderBook) -> R) -> R {
        read(&*self.inner.lock())
    }
}

impl From<OrderBook> for SharedOrderBook {
    fn from(order_book: OrderBook) -> Self {
        Self {
            ticker: Arc::from(order_book.ticker()),
            inner: Arc::new(Mutex::new(order_book)),
        }
    }
}
