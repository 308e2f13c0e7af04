use crate::model::Order;

/// The season's recorded orders with claim tracking.
///
/// An order is claimed by pool slot, never by value, so field-identical
/// duplicates stay distinct. Claiming replaces in-place removal: iteration
/// always walks the caller-supplied order and skips claimed slots, which
/// keeps greedy matching reproducible and free of index-shift hazards.
pub struct OrderPool {
    orders: Vec<Order>,
    claimed: Vec<bool>,
}

impl OrderPool {
    pub fn new(orders: Vec<Order>) -> Self {
        let claimed = vec![false; orders.len()];
        Self { orders, claimed }
    }

    /// Total slots, claimed or not.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Unclaimed slots in pool order.
    pub fn iter_unclaimed(&self) -> impl Iterator<Item = (usize, &Order)> + '_ {
        self.orders
            .iter()
            .enumerate()
            .filter(|(slot, _)| !self.claimed[*slot])
    }

    /// Unclaimed slot count.
    pub fn remaining(&self) -> usize {
        self.claimed.iter().filter(|c| !**c).count()
    }

    pub fn claim(&mut self, slot: usize) {
        self.claimed[slot] = true;
    }

    pub fn is_claimed(&self, slot: usize) -> bool {
        self.claimed[slot]
    }

    pub fn get(&self, slot: usize) -> &Order {
        &self.orders[slot]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;

    use super::*;

    fn order(id: i64) -> Order {
        Order {
            id,
            date: NaiveDate::parse_from_str("2025-01-01", "%Y-%m-%d").unwrap(),
            txn_type: "T2G".into(),
            to_seller_id: Some(1),
            from_seller_id: None,
            cookies: BTreeMap::new(),
            order_num: None,
        }
    }

    #[test]
    fn iterates_in_pool_order() {
        let pool = OrderPool::new(vec![order(3), order(1), order(2)]);
        let ids: Vec<i64> = pool.iter_unclaimed().map(|(_, o)| o.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn claimed_slots_disappear_from_iteration() {
        let mut pool = OrderPool::new(vec![order(1), order(2), order(3)]);
        pool.claim(1);
        let ids: Vec<i64> = pool.iter_unclaimed().map(|(_, o)| o.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(pool.remaining(), 2);
        assert_eq!(pool.len(), 3);
        assert!(pool.is_claimed(1));
        assert!(!pool.is_claimed(0));
    }

    #[test]
    fn identical_orders_are_distinct_slots() {
        // Same fields, different slots: claiming one leaves the twin alone.
        let mut pool = OrderPool::new(vec![order(7), order(7)]);
        pool.claim(0);
        let slots: Vec<usize> = pool.iter_unclaimed().map(|(slot, _)| slot).collect();
        assert_eq!(slots, vec![1]);
        assert_eq!(pool.get(1).id, 7);
    }
}
