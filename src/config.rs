use crate::order_book::MAX_ORDER_QUANTITY;
use std::ops::Range;
use std::str::FromStr;
use thiserror::Error;

/// Per-book limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderBookConfig {
    /// Upper bound on resident orders (bids + asks). `None` means unbounded.
    ///
    /// Only new submissions are checked against it; remainders re-queued by a
    /// matching pass always fit because they replace an order that was just removed.
    pub max_resident_orders: Option<usize>,
}

impl OrderBookConfig {
    /// A configuration rejecting submissions beyond `capacity` resident orders.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            max_resident_orders: Some(capacity),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Parameters of the load-generation run driven by the `simulate` binary.
///
/// Defaults reproduce the classic five-ticker run: bids drawn from
/// `150..300`, asks from `250..450`, so roughly a third of each side overlaps.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// One order book is created per ticker
    pub tickers: Vec<String>,
    /// Orders generated per side, per ticker
    pub orders_per_side: usize,
    /// Concurrent producer threads per side, per ticker
    pub producers_per_side: usize,
    /// Bid prices are drawn uniformly from this range
    pub bid_price_range: Range<f64>,
    /// Ask prices are drawn uniformly from this range
    pub ask_price_range: Range<f64>,
    /// Quantities are drawn uniformly from `1..=max_quantity`
    pub max_quantity: i64,
    /// Base seed for the producers' random number generators
    pub seed: u64,
    /// Forwarded to every book's [`OrderBookConfig`]
    pub max_resident_orders: Option<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tickers: ["AAPL", "HOOD", "SPY", "SHOP", "QQQ"]
                .into_iter()
                .map(String::from)
                .collect(),
            orders_per_side: 1_000_000,
            producers_per_side: 1,
            bid_price_range: 150.0..300.0,
            ask_price_range: 250.0..450.0,
            max_quantity: 50_000,
            seed: 42,
            max_resident_orders: None,
        }
    }
}

impl SimulationConfig {
    /// Builds a configuration from the defaults, overridden by `LOB_*` environment variables.
    ///
    /// Recognized keys: `LOB_TICKERS` (comma separated), `LOB_ORDERS_PER_SIDE`,
    /// `LOB_PRODUCERS_PER_SIDE`, `LOB_MAX_QUANTITY`, `LOB_SEED`, `LOB_MAX_RESIDENT_ORDERS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`SimulationConfig::from_env`], reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("LOB_TICKERS") {
            config.tickers = raw
                .split(',')
                .map(str::trim)
                .filter(|ticker| !ticker.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(value) = parse_key(&lookup, "LOB_ORDERS_PER_SIDE")? {
            config.orders_per_side = value;
        }
        if let Some(value) = parse_key(&lookup, "LOB_PRODUCERS_PER_SIDE")? {
            config.producers_per_side = value;
        }
        if let Some(value) = parse_key(&lookup, "LOB_MAX_QUANTITY")? {
            config.max_quantity = value;
        }
        if let Some(value) = parse_key(&lookup, "LOB_SEED")? {
            config.seed = value;
        }
        if let Some(value) = parse_key(&lookup, "LOB_MAX_RESIDENT_ORDERS")? {
            config.max_resident_orders = Some(value);
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants the driver relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tickers.is_empty() {
            return Err(ConfigError::Empty("tickers"));
        }
        if self.producers_per_side == 0 {
            return Err(ConfigError::InvalidValue {
                key: "producers_per_side",
                value: "0".to_string(),
            });
        }
        if self.max_quantity < 1 || self.max_quantity as u64 > MAX_ORDER_QUANTITY {
            return Err(ConfigError::InvalidValue {
                key: "max_quantity",
                value: self.max_quantity.to_string(),
            });
        }
        if self.bid_price_range.is_empty() || self.bid_price_range.start < 0.0 {
            return Err(ConfigError::Empty("bid_price_range"));
        }
        if self.ask_price_range.is_empty() || self.ask_price_range.start < 0.0 {
            return Err(ConfigError::Empty("ask_price_range"));
        }
        Ok(())
    }

    /// The book configuration every ticker is created with.
    pub fn order_book_config(&self) -> OrderBookConfig {
        OrderBookConfig {
            max_resident_orders: self.max_resident_orders,
        }
    }
}

fn parse_key<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| values.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_overrides() {
        let config = SimulationConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.tickers.len(), 5);
        assert_eq!(config.order_book_config(), OrderBookConfig::default());
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = SimulationConfig::from_lookup(lookup_from(&[
            ("LOB_TICKERS", "MSFT, NVDA,,"),
            ("LOB_ORDERS_PER_SIDE", "500"),
            ("LOB_PRODUCERS_PER_SIDE", "4"),
            ("LOB_SEED", "7"),
            ("LOB_MAX_RESIDENT_ORDERS", "900"),
        ]))
        .unwrap();

        assert_eq!(config.tickers, vec!["MSFT".to_string(), "NVDA".to_string()]);
        assert_eq!(config.orders_per_side, 500);
        assert_eq!(config.producers_per_side, 4);
        assert_eq!(config.seed, 7);
        assert_eq!(config.order_book_config(), OrderBookConfig::bounded(900));
    }

    #[test]
    fn test_malformed_values_are_reported() {
        let error = SimulationConfig::from_lookup(lookup_from(&[("LOB_SEED", "seven")])).unwrap_err();
        assert_eq!(
            error,
            ConfigError::InvalidValue {
                key: "LOB_SEED",
                value: "seven".to_string()
            }
        );

        let error =
            SimulationConfig::from_lookup(lookup_from(&[("LOB_PRODUCERS_PER_SIDE", "0")])).unwrap_err();
        assert!(matches!(error, ConfigError::InvalidValue { key: "producers_per_side", .. }));

        let error =
            SimulationConfig::from_lookup(lookup_from(&[("LOB_MAX_QUANTITY", "99999999999")])).unwrap_err();
        assert!(matches!(error, ConfigError::InvalidValue { key: "max_quantity", .. }));

        let error = SimulationConfig::from_lookup(lookup_from(&[("LOB_TICKERS", " , ")])).unwrap_err();
        assert_eq!(error, ConfigError::Empty("tickers"));
    }
}
