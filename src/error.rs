use thiserror::Error;

/// Every way a request against an order book can be refused.
///
/// All variants are recoverable: they are handed back to the caller and leave
/// the book untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderBookError {
    #[error("wrong ticker for this book: expected {expected}, received {received}")]
    TickerMismatch { expected: String, received: String },

    #[error("invalid price: {0:?}")]
    InvalidPrice(String),

    #[error("invalid quantity: {0} (must be between 1 and {max})", max = crate::order_book::MAX_ORDER_QUANTITY)]
    InvalidQuantity(i64),

    #[error("order book is full: {capacity} resident orders")]
    BookFull { capacity: usize },

    #[error("no order book registered for ticker {0}")]
    UnknownTicker(String),
}

pub type Result<T> = std::result::Result<T, OrderBookError>;
