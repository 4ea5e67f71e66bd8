use crate::config::OrderBookConfig;
use crate::error::{OrderBookError, Result};
use crate::order_queue::OrderQueue;
use crate::price::parse_price;
use crate::types::{Order, OrderId, Side, Trade};
use rust_decimal::Decimal;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Largest quantity a single order may carry.
///
/// Keeps every per-order fill, and the running totals of a matching pass,
/// far inside `u64`.
pub const MAX_ORDER_QUANTITY: u64 = u32::MAX as u64;

/// Totals of a single matching pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchSummary {
    /// Number of trades emitted
    pub trades: usize,
    /// Shares exchanged across all trades
    pub filled_quantity: u64,
}

/// The order book of a single ticker.
///
/// This structure is responsible only for:
///
/// - Validating and queueing new limit orders
/// - Maintaining price-time priority on each side
/// - Running matching passes that settle every crossing bid/ask pair
///
/// ### Thread Safety
///
/// All mutating methods take `&mut self`. To share a book across threads wrap it
/// in [`SharedOrderBook`](crate::SharedOrderBook), which serializes every call
/// behind a lock.
#[derive(Debug)]
pub struct OrderBook {
    ticker: String,
    /// Bid side (buy orders): highest price first
    bids: OrderQueue,
    /// Ask side (sell orders): lowest price first
    asks: OrderQueue,
    next_sequence: u64,
    config: OrderBookConfig,
}

impl OrderBook {
    /// Creates an empty, unbounded order book for `ticker`.
    ///
    /// ## Examples
    ///
    /// ```
    /// use limit_order_book::OrderBook;
    ///
    /// let order_book = OrderBook::new("AAPL");
    /// assert_eq!(order_book.ticker(), "AAPL");
    /// assert!(order_book.is_empty());
    /// ```
    pub fn new(ticker: impl Into<String>) -> Self {
        Self::with_config(ticker, OrderBookConfig::default())
    }

    /// Creates an empty order book for `ticker` with explicit limits.
    pub fn with_config(ticker: impl Into<String>, config: OrderBookConfig) -> Self {
        OrderBook {
            ticker: ticker.into(),
            bids: OrderQueue::new(Side::Bid),
            asks: OrderQueue::new(Side::Ask),
            next_sequence: 0,
            config,
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn config(&self) -> &OrderBookConfig {
        &self.config
    }

    /// Validates a limit order and queues it on its side.
    ///
    /// Checks, in order: the ticker belongs to this book, the price parses to a
    /// non-negative decimal, the quantity is in `1..=MAX_ORDER_QUANTITY`, and
    /// the book has room.
    /// A rejected order leaves the book untouched.
    ///
    /// ## Returns
    ///
    /// A snapshot of the accepted order, including its freshly assigned id.
    ///
    /// ## Examples
    ///
    /// ```
    /// use limit_order_book::{OrderBook, OrderBookError, Side};
    ///
    /// let mut order_book = OrderBook::new("AAPL");
    ///
    /// let order = order_book.submit("AAPL", "200.00", 100, Side::Bid).unwrap();
    /// assert_eq!(order.quantity, 100);
    /// assert_eq!(order_book.queue_depth(Side::Bid), 1);
    ///
    /// let rejected = order_book.submit("SPY", "200.00", 100, Side::Bid);
    /// assert!(matches!(rejected, Err(OrderBookError::TickerMismatch { .. })));
    /// assert_eq!(order_book.len(), 1);
    /// ```
    pub fn submit(&mut self, ticker: &str, price: &str, quantity: i64, side: Side) -> Result<Order> {
        let order = self
            .build_order(ticker, price, quantity, side)
            .map_err(|error| {
                warn!(book = %self.ticker, %error, "order rejected");
                error
            })?;

        debug!(
            ticker = %self.ticker,
            order_id = %order.id,
            %side,
            price = %order.price,
            quantity = order.quantity,
            "order accepted"
        );

        self.queue_mut(side).insert(order.clone());
        Ok(order)
    }

    fn build_order(&mut self, ticker: &str, price: &str, quantity: i64, side: Side) -> Result<Order> {
        if ticker != self.ticker {
            return Err(OrderBookError::TickerMismatch {
                expected: self.ticker.clone(),
                received: ticker.to_string(),
            });
        }

        let price = parse_price(price)?;

        let quantity = match u64::try_from(quantity) {
            Ok(quantity) if (1..=MAX_ORDER_QUANTITY).contains(&quantity) => quantity,
            _ => return Err(OrderBookError::InvalidQuantity(quantity)),
        };

        if let Some(capacity) = self.config.max_resident_orders {
            if self.len() >= capacity {
                return Err(OrderBookError::BookFull { capacity });
            }
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;

        Ok(Order {
            id: OrderId::new(),
            ticker: self.ticker.clone(),
            side,
            price,
            quantity,
            created_at: Instant::now(),
            sequence,
        })
    }

    /// Runs a matching pass to exhaustion and collects the resulting trades.
    ///
    /// ## Examples
    ///
    /// ```
    /// use limit_order_book::{OrderBook, Side};
    ///
    /// let mut order_book = OrderBook::new("AAPL");
    /// order_book.submit("AAPL", "200", 100, Side::Bid).unwrap();
    /// order_book.submit("AAPL", "200", 40, Side::Ask).unwrap();
    ///
    /// let trades = order_book.match_orders();
    /// assert_eq!(trades.len(), 1);
    /// assert_eq!(trades[0].quantity, 40);
    /// assert_eq!(order_book.best_bid().map(|bid| bid.quantity), Some(60));
    /// assert!(order_book.best_ask().is_none());
    /// ```
    pub fn match_orders(&mut self) -> Vec<Trade> {
        let mut trades = Vec::new();
        self.match_orders_with(|trade| trades.push(trade));
        trades
    }

    /// Runs a matching pass to exhaustion, handing each trade to `on_trade` as it happens.
    ///
    /// While the best bid is priced at or above the best ask, both are taken
    /// off their queues, the smaller remaining quantity is exchanged at the
    /// resting order's price, and whichever side still has quantity left goes
    /// back with its original arrival sequence. The pass stops as soon as one
    /// side is empty or the best prices no longer cross; it cannot fail.
    pub fn match_orders_with<F>(&mut self, mut on_trade: F) -> MatchSummary
    where
        F: FnMut(Trade),
    {
        let mut summary = MatchSummary::default();

        while self.is_crossed() {
            let (Some(mut bid), Some(mut ask)) = (self.bids.extract_top(), self.asks.extract_top())
            else {
                break;
            };

            let fill_quantity = bid.quantity.min(ask.quantity);
            let (maker, taker) = if bid.sequence < ask.sequence {
                (&bid, &ask)
            } else {
                (&ask, &bid)
            };

            let trade = Trade {
                ticker: self.ticker.clone(),
                quantity: fill_quantity,
                price: maker.price,
                maker_order_id: maker.id,
                taker_order_id: taker.id,
                aggressor_side: taker.side,
            };

            bid.fill(fill_quantity);
            ask.fill(fill_quantity);

            if !bid.is_filled() {
                self.bids.insert(bid);
            }
            if !ask.is_filled() {
                self.asks.insert(ask);
            }

            debug!(
                ticker = %trade.ticker,
                quantity = trade.quantity,
                price = %trade.price,
                maker = %trade.maker_order_id,
                taker = %trade.taker_order_id,
                "matched"
            );

            summary.trades += 1;
            summary.filled_quantity = summary.filled_quantity.saturating_add(fill_quantity);
            on_trade(trade);
        }

        info!(
            ticker = %self.ticker,
            trades = summary.trades,
            filled_quantity = summary.filled_quantity,
            bids = self.bids.len(),
            asks = self.asks.len(),
            "matching pass complete"
        );

        summary
    }

    /// Returns `true` when the best bid is priced at or above the best ask.
    pub fn is_crossed(&self) -> bool {
        match (self.bids.peek(), self.asks.peek()) {
            (Some(bid), Some(ask)) => bid.price >= ask.price,
            _ => false,
        }
    }

    /// The highest-priority bid, if any.
    pub fn best_bid(&self) -> Option<&Order> {
        self.bids.peek()
    }

    /// The highest-priority ask, if any.
    pub fn best_ask(&self) -> Option<&Order> {
        self.asks.peek()
    }

    /// Computes the current best bid and best ask prices.
    ///
    /// ## Returns
    ///
    /// A tuple of `(best_bid, best_ask)` where each is `Option<Decimal>`.
    /// Returns `None` if there are no orders on that side.
    pub fn compute_spread(&self) -> (Option<Decimal>, Option<Decimal>) {
        (
            self.bids.peek().map(|order| order.price),
            self.asks.peek().map(|order| order.price),
        )
    }

    /// Number of orders resting on `side`.
    pub fn queue_depth(&self, side: Side) -> usize {
        self.queue(side).len()
    }

    /// Read access to one side's queue.
    pub fn queue(&self, side: Side) -> &OrderQueue {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    fn queue_mut(&mut self, side: Side) -> &mut OrderQueue {
        match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        }
    }

    /// Total number of resident orders on both sides.
    pub fn len(&self) -> usize {
        self.bids.len() + self.asks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequences_increase_only_on_acceptance() {
        let mut book = OrderBook::new("HOOD");
        let first = book.submit("HOOD", "10", 1, Side::Bid).unwrap();
        assert!(book.submit("HOOD", "bad", 1, Side::Bid).is_err());
        let second = book.submit("HOOD", "10", 1, Side::Ask).unwrap();

        assert_eq!(first.sequence, 0);
        assert_eq!(second.sequence, 1);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_quantity_validation() {
        let mut book = OrderBook::new("HOOD");
        assert_eq!(
            book.submit("HOOD", "10", 0, Side::Bid),
            Err(OrderBookError::InvalidQuantity(0))
        );
        assert_eq!(
            book.submit("HOOD", "10", -5, Side::Ask),
            Err(OrderBookError::InvalidQuantity(-5))
        );
        assert_eq!(
            book.submit("HOOD", "10", MAX_ORDER_QUANTITY as i64 + 1, Side::Ask),
            Err(OrderBookError::InvalidQuantity(MAX_ORDER_QUANTITY as i64 + 1))
        );
        assert_eq!(
            book.submit("HOOD", "10", i64::MAX, Side::Bid),
            Err(OrderBookError::InvalidQuantity(i64::MAX))
        );
        assert!(book.is_empty());
    }

    #[test]
    fn test_ticker_checked_before_price() {
        let mut book = OrderBook::new("HOOD");
        assert!(matches!(
            book.submit("SPY", "not a price", 0, Side::Bid),
            Err(OrderBookError::TickerMismatch { .. })
        ));
    }

    #[test]
    fn test_capacity_limits_submissions() {
        let mut book = OrderBook::with_config("HOOD", OrderBookConfig::bounded(2));
        book.submit("HOOD", "10", 5, Side::Bid).unwrap();
        book.submit("HOOD", "11", 5, Side::Ask).unwrap();
        assert_eq!(
            book.submit("HOOD", "9", 5, Side::Bid),
            Err(OrderBookError::BookFull { capacity: 2 })
        );
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn test_requeued_remainder_ignores_capacity() {
        let mut book = OrderBook::with_config("HOOD", OrderBookConfig::bounded(2));
        book.submit("HOOD", "10", 5, Side::Bid).unwrap();
        book.submit("HOOD", "10", 3, Side::Ask).unwrap();

        let summary = book.match_orders_with(|_| {});
        assert_eq!(summary, MatchSummary { trades: 1, filled_quantity: 3 });
        assert_eq!(book.queue_depth(Side::Bid), 1);
        assert_eq!(book.best_bid().map(|bid| bid.quantity), Some(2));
    }
}
