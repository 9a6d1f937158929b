//! Order filtering
//!
//! [`apply_filters`] is a pure function: same input, same output, input
//! order preserved. Every criterion that is set must match (logical AND);
//! unset criteria match everything.

use crate::domain::{Order, OrderStatus, PaymentType};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

/// Inclusive range of instants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Range between two instants, both inclusive
    ///
    /// # Errors
    ///
    /// Returns an error if `start` is after `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, String> {
        if start > end {
            return Err(format!("date range start {start} is after end {end}"));
        }
        Ok(Self { start, end })
    }

    /// Whole calendar days in UTC, from the first instant of `first` to the
    /// last instant of `last`
    ///
    /// # Errors
    ///
    /// Returns an error if `first` is after `last`.
    pub fn whole_days(first: NaiveDate, last: NaiveDate) -> Result<Self, String> {
        let start = first.and_time(NaiveTime::MIN).and_utc();
        let end = (last.and_time(NaiveTime::MIN) + Duration::days(1) - Duration::nanoseconds(1))
            .and_utc();
        Self::new(start, end)
    }

    /// True when `instant` lies within the range, bounds included
    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        self.start <= *instant && *instant <= self.end
    }
}

/// Conjunction of optional order predicates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub status: Option<OrderStatus>,
    pub payment_type: Option<PaymentType>,
    pub date_range: Option<DateRange>,
    pub course_title: Option<String>,
}

impl FilterCriteria {
    /// Criteria that match every order
    pub fn any() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_payment_type(mut self, payment_type: PaymentType) -> Self {
        self.payment_type = Some(payment_type);
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn with_course_title(mut self, title: impl Into<String>) -> Self {
        self.course_title = Some(title.into());
        self
    }

    /// True when no criterion is set
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.payment_type.is_none()
            && self.date_range.is_none()
            && self.course_title.is_none()
    }

    /// Whether a single order satisfies every set criterion
    ///
    /// An order without a creation timestamp never matches a date range, and
    /// an order without a payment type never matches a payment type filter.
    pub fn matches(&self, order: &Order) -> bool {
        if let Some(status) = &self.status {
            if order.status != *status {
                return false;
            }
        }

        if let Some(payment_type) = &self.payment_type {
            if order.payment_type.as_ref() != Some(payment_type) {
                return false;
            }
        }

        if let Some(range) = &self.date_range {
            match &order.created_at {
                Some(created_at) if range.contains(created_at) => {}
                _ => return false,
            }
        }

        if let Some(title) = &self.course_title {
            if order.course_title() != Some(title.as_str()) {
                return false;
            }
        }

        true
    }
}

/// Orders matching `criteria`, in their original relative order
pub fn apply_filters(orders: &[Order], criteria: &FilterCriteria) -> Vec<Order> {
    if criteria.is_empty() {
        return orders.to_vec();
    }
    orders
        .iter()
        .filter(|order| criteria.matches(order))
        .cloned()
        .collect()
}
