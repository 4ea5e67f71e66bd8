use rust_decimal::Decimal;
use std::fmt;
use std::time::Instant;
use uuid::Uuid;

/// Represents the side of an order in the order book.
///
/// - `Bid` represents buy orders (demand side)
/// - `Ask` represents sell orders (supply side)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Buy side: traders willing to purchase at a given price or lower
    Bid,
    /// Sell side: traders willing to sell at a given price or higher
    Ask,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => write!(f, "bid"),
            Side::Ask => write!(f, "ask"),
        }
    }
}

/// Unique identifier for an order.
///
/// Backed by a UUID v7, so identifiers sort by creation time and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Creates a fresh identifier stamped with the current time.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents a single limit order resting in (or about to enter) an order book.
///
/// Identity, ticker, side and price are fixed at creation. Only `quantity`
/// changes afterwards, and only through the matching algorithm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Unique identifier assigned at submission
    pub id: OrderId,
    /// Instrument symbol, always equal to the owning book's ticker
    pub ticker: String,
    /// Whether this is a buy (`Bid`) or sell (`Ask`) order
    pub side: Side,
    /// The limit price (using fixed-point arithmetic)
    pub price: Decimal,
    /// Shares still waiting to be filled
    pub quantity: u64,
    /// Monotonic creation timestamp
    pub created_at: Instant,
    /// Arrival sequence within the owning book, used to break price ties
    pub sequence: u64,
}

impl Order {
    /// Returns `true` once nothing is left to fill.
    pub fn is_filled(&self) -> bool {
        self.quantity == 0
    }

    /// Removes `quantity` shares from the remaining size.
    ///
    /// Callers never fill more than what remains, so saturation only guards
    /// the arithmetic.
    pub(crate) fn fill(&mut self, quantity: u64) {
        self.quantity = self.quantity.saturating_sub(quantity);
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} - {} - {} - {} - #{} - {}]",
            self.ticker, self.price, self.quantity, self.side, self.sequence, self.id
        )
    }
}

/// A single execution produced by a matching pass.
///
/// The maker is the resting order (the one that arrived first), the taker the
/// one that arrived later and crossed it. Trades execute at the maker's price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trade {
    /// Instrument symbol of the book that produced the trade
    pub ticker: String,
    /// Shares exchanged
    pub quantity: u64,
    /// Execution price
    pub price: Decimal,
    /// The resting order
    pub maker_order_id: OrderId,
    /// The later order that crossed the resting one
    pub taker_order_id: OrderId,
    /// Side of the taker
    pub aggressor_side: Side,
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} shares at {} ({} aggressor)",
            self.ticker, self.quantity, self.price, self.aggressor_side
        )
    }
}
