//! Memoized filtered view
//!
//! The filtered list depends only on the orders and the criteria. Fetched
//! collections are shared behind an `Arc` and never mutated, so pointer
//! identity names a collection. [`Projection`] keeps the filter results of
//! the last few criteria for the current collection; switching back to a
//! recent filter reuses its result instead of re-running the filter.

use crate::core::filter::{apply_filters, FilterCriteria};
use crate::domain::Order;
use std::collections::VecDeque;
use std::sync::Arc;

/// Criteria results kept per collection
pub const CACHED_CRITERIA: usize = 8;

#[derive(Debug, Default)]
pub struct Projection {
    orders: Option<Arc<Vec<Order>>>,
    /// Most recently used first
    cached: VecDeque<(FilterCriteria, Arc<Vec<Order>>)>,
    recomputations: u64,
}

impl Projection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filtered `orders` for `criteria`
    ///
    /// A new collection drops every cached result.
    pub fn project(
        &mut self,
        orders: &Arc<Vec<Order>>,
        criteria: &FilterCriteria,
    ) -> Arc<Vec<Order>> {
        let same_collection = self
            .orders
            .as_ref()
            .is_some_and(|held| Arc::ptr_eq(held, orders));
        if !same_collection {
            self.orders = Some(Arc::clone(orders));
            self.cached.clear();
        }

        if let Some(position) = self.cached.iter().position(|(c, _)| c == criteria) {
            if let Some(entry) = self.cached.remove(position) {
                let filtered = Arc::clone(&entry.1);
                self.cached.push_front(entry);
                return filtered;
            }
        }

        let filtered = Arc::new(apply_filters(orders, criteria));
        self.recomputations += 1;
        tracing::trace!(
            total = orders.len(),
            matched = filtered.len(),
            "View projection recomputed"
        );

        self.cached.push_front((criteria.clone(), Arc::clone(&filtered)));
        self.cached.truncate(CACHED_CRITERIA);
        filtered
    }

    /// How many times the filter actually ran
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}
