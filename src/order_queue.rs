use crate::types::{Order, Side};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Heap entry carrying the side-aware priority of an order.
///
/// `BinaryHeap` is a max-heap, so "greater" here means "matched sooner":
/// a higher price for bids, a lower price for asks, and on equal prices the
/// earlier arrival sequence.
#[derive(Debug)]
struct Prioritized(Order);

impl Ord for Prioritized {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_price = match self.0.side {
            Side::Bid => self.0.price.cmp(&other.0.price),
            Side::Ask => other.0.price.cmp(&self.0.price),
        };

        by_price.then_with(|| other.0.sequence.cmp(&self.0.sequence))
    }
}

impl PartialOrd for Prioritized {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Prioritized {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Prioritized {}

/// A binary-heap priority queue holding the orders of one side of a book.
///
/// The best order is always reachable in $O(1)$ through [`OrderQueue::peek`];
/// insertion and extraction are $O(\log{N})$.
///
/// ## Examples
///
/// ```
/// use limit_order_book::{OrderBook, Side};
///
/// let mut book = OrderBook::new("AAPL");
/// book.submit("AAPL", "10.00", 5, Side::Bid).unwrap();
/// let high = book.submit("AAPL", "12.00", 5, Side::Bid).unwrap();
///
/// let queue = book.queue(Side::Bid);
/// assert_eq!(queue.peek(), Some(&high));
/// assert_eq!(queue.total_quantity(), 10);
/// ```
///
/// Only the owning [`OrderBook`](crate::OrderBook) mutates a queue, so every
/// queued order is on the queue's side and has quantity left to fill.
#[derive(Debug)]
pub struct OrderQueue {
    side: Side,
    heap: BinaryHeap<Prioritized>,
}

impl OrderQueue {
    /// Creates an empty queue for the given side.
    pub(crate) fn new(side: Side) -> Self {
        Self {
            side,
            heap: BinaryHeap::new(),
        }
    }

    /// The side whose priority rule this queue applies.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Adds an order to the queue.
    ///
    /// The order must belong to this queue's side and have something left to fill.
    pub(crate) fn insert(&mut self, order: Order) {
        debug_assert_eq!(order.side, self.side, "order queued on the wrong side");
        debug_assert!(!order.is_filled(), "filled orders are never queued");

        self.heap.push(Prioritized(order));
    }

    /// Returns the highest-priority order without removing it.
    pub fn peek(&self) -> Option<&Order> {
        self.heap.peek().map(|entry| &entry.0)
    }

    /// Removes and returns the highest-priority order.
    pub(crate) fn extract_top(&mut self) -> Option<Order> {
        self.heap.pop().map(|entry| entry.0)
    }

    /// Number of orders currently queued.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Sum of the remaining quantity of every queued order, saturating at `u64::MAX`.
    pub fn total_quantity(&self) -> u64 {
        self.heap
            .iter()
            .fold(0u64, |total, entry| total.saturating_add(entry.0.quantity))
    }

    /// Iterates over the queued orders in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.heap.iter().map(|entry| &entry.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OrderId;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use std::time::Instant;

    fn order(side: Side, price: i64, sequence: u64) -> Order {
        Order {
            id: OrderId::new(),
            ticker: "TEST".to_string(),
            side,
            price: Decimal::new(price, 2),
            quantity: 10,
            created_at: Instant::now(),
            sequence,
        }
    }

    #[test]
    fn test_empty_queue() {
        let mut queue = OrderQueue::new(Side::Ask);
        assert!(queue.is_empty());
        assert_eq!(queue.peek(), None);
        assert_eq!(queue.extract_top(), None);
        assert_eq!(queue.total_quantity(), 0);
    }

    #[test]
    fn test_bids_pop_highest_price_first() {
        let mut queue = OrderQueue::new(Side::Bid);
        for (sequence, price) in [15000, 29999, 20000, 15001].into_iter().enumerate() {
            queue.insert(order(Side::Bid, price, sequence as u64));
        }

        let prices: Vec<Decimal> = std::iter::from_fn(|| queue.extract_top())
            .map(|order| order.price)
            .collect();
        assert_eq!(
            prices,
            vec![
                Decimal::new(29999, 2),
                Decimal::new(20000, 2),
                Decimal::new(15001, 2),
                Decimal::new(15000, 2),
            ]
        );
    }

    #[test]
    fn test_asks_pop_lowest_price_first() {
        let mut queue = OrderQueue::new(Side::Ask);
        for (sequence, price) in [45000, 25000, 30000].into_iter().enumerate() {
            queue.insert(order(Side::Ask, price, sequence as u64));
        }

        assert_eq!(queue.peek().map(|o| o.price), Some(Decimal::new(25000, 2)));
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.total_quantity(), 30);
    }

    #[test]
    fn test_equal_prices_pop_in_arrival_order() {
        let mut queue = OrderQueue::new(Side::Ask);
        for sequence in [3, 1, 2, 0] {
            queue.insert(order(Side::Ask, 100, sequence));
        }

        let sequences: Vec<u64> = std::iter::from_fn(|| queue.extract_top())
            .map(|order| order.sequence)
            .collect();
        assert_eq!(sequences, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_total_quantity_saturates() {
        let mut queue = OrderQueue::new(Side::Bid);
        for sequence in 0..3 {
            let mut large = order(Side::Bid, 100, sequence);
            large.quantity = u64::MAX / 2;
            queue.insert(large);
        }
        assert_eq!(queue.total_quantity(), u64::MAX);
    }

    fn side_strategy() -> impl Strategy<Value = Side> {
        prop_oneof![Just(Side::Bid), Just(Side::Ask)]
    }

    proptest! {
        #[test]
        fn peek_always_returns_the_best_price(
            side in side_strategy(),
            operations in prop::collection::vec(prop::option::weighted(0.7, 0i64..50_000), 1..300),
        ) {
            let mut queue = OrderQueue::new(side);
            let mut model: Vec<Decimal> = Vec::new();

            for (sequence, operation) in operations.into_iter().enumerate() {
                let best = |model: &Vec<Decimal>| match side {
                    Side::Bid => model.iter().max().copied(),
                    Side::Ask => model.iter().min().copied(),
                };

                match operation {
                    Some(price) => {
                        let queued = order(side, price, sequence as u64);
                        model.push(queued.price);
                        queue.insert(queued);
                    }
                    None => {
                        let expected = best(&model);
                        prop_assert_eq!(queue.extract_top().map(|order| order.price), expected);
                        if let Some(price) = expected {
                            let position = model.iter().position(|candidate| *candidate == price).unwrap();
                            model.swap_remove(position);
                        }
                    }
                }

                prop_assert_eq!(queue.peek().map(|order| order.price), best(&model));
                prop_assert_eq!(queue.len(), model.len());
            }
        }
    }
}
