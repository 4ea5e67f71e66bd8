use crate::config::OrderBookConfig;
use crate::error::{OrderBookError, Result};
use crate::order_book::MatchSummary;
use crate::shared_order_book::SharedOrderBook;
use crate::types::{Order, Side, Trade};
use std::collections::BTreeMap;
use std::panic;
use std::sync::mpsc::Sender;
use std::thread;
use tracing::info;

/// Owns one [`SharedOrderBook`] per ticker.
///
/// Books share no state, so matching passes for different tickers run fully
/// in parallel: [`BookRegistry::match_all`] spawns one scoped thread per book.
///
/// ## Examples
///
/// ```
/// use limit_order_book::{BookRegistry, Side};
///
/// let registry = BookRegistry::new(["AAPL", "QQQ"]);
/// registry.submit("AAPL", "190.00", 10, Side::Bid).unwrap();
/// registry.submit("AAPL", "189.50", 10, Side::Ask).unwrap();
/// registry.submit("QQQ", "350.00", 10, Side::Bid).unwrap();
///
/// let trades = registry.match_all();
/// assert_eq!(trades["AAPL"].len(), 1);
/// assert!(trades["QQQ"].is_empty());
/// assert!(registry.submit("TSLA", "1.00", 1, Side::Bid).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct BookRegistry {
    books: BTreeMap<String, SharedOrderBook>,
}

impl BookRegistry {
    /// Creates an unbounded book for each ticker. Duplicates collapse into one book.
    pub fn new<I, T>(tickers: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::with_config(tickers, OrderBookConfig::default())
    }

    /// Creates a book for each ticker, all sharing `config`.
    pub fn with_config<I, T>(tickers: I, config: OrderBookConfig) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let books = tickers
            .into_iter()
            .map(Into::into)
            .map(|ticker: String| {
                let book = SharedOrderBook::with_config(ticker.clone(), config);
                (ticker, book)
            })
            .collect();

        Self { books }
    }

    /// The book registered for `ticker`.
    pub fn book(&self, ticker: &str) -> Result<&SharedOrderBook> {
        self.books
            .get(ticker)
            .ok_or_else(|| OrderBookError::UnknownTicker(ticker.to_string()))
    }

    /// Registered tickers, in ascending order.
    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.books.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Routes a submission to the book of `ticker`.
    pub fn submit(&self, ticker: &str, price: &str, quantity: i64, side: Side) -> Result<Order> {
        self.book(ticker)?.submit(ticker, price, quantity, side)
    }

    /// Runs one matching pass per book in parallel and collects every trade, keyed by ticker.
    pub fn match_all(&self) -> BTreeMap<String, Vec<Trade>> {
        self.run_parallel(|book| book.match_orders())
    }

    /// Runs one matching pass per book in parallel, streaming trades into `sink`.
    ///
    /// Trades of different books interleave in the channel in no particular
    /// order; within a book they arrive in execution order. If the receiver
    /// hangs up the passes still run to completion.
    pub fn match_all_streaming(&self, sink: &Sender<Trade>) -> BTreeMap<String, MatchSummary> {
        self.run_parallel(|book| {
            let sink = sink.clone();
            book.match_orders_with(move |trade| {
                let _ = sink.send(trade);
            })
        })
    }

    /// Resident `(bids, asks)` per ticker. Each book is read under its own lock,
    /// so the snapshot is not atomic across books.
    pub fn depths(&self) -> BTreeMap<String, (usize, usize)> {
        self.books
            .iter()
            .map(|(ticker, book)| {
                let depth = book.with_book(|book| {
                    (book.queue_depth(Side::Bid), book.queue_depth(Side::Ask))
                });
                (ticker.clone(), depth)
            })
            .collect()
    }

    fn run_parallel<R, F>(&self, job: F) -> BTreeMap<String, R>
    where
        R: Send,
        F: Fn(&SharedOrderBook) -> R + Sync,
    {
        let job = &job;
        let results = thread::scope(|scope| {
            let handles: Vec<_> = self
                .books
                .iter()
                .map(|(ticker, book)| (ticker, scope.spawn(move || job(book))))
                .collect();

            handles
                .into_iter()
                .map(|(ticker, handle)| {
                    let result = handle
                        .join()
                        .unwrap_or_else(|payload| panic::resume_unwind(payload));
                    (ticker.clone(), result)
                })
                .collect::<BTreeMap<_, _>>()
        });

        info!(books = results.len(), "parallel pass over all books complete");
        results
    }
}
