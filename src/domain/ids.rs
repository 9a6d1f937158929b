//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers the order service hands out, so an
//! order id can never be passed where a course id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order identifier newtype wrapper
///
/// The service uses opaque document ids (24-character hex strings in
/// practice), so only emptiness is validated.
///
/// # Examples
///
/// ```
/// use orderdesk::domain::ids::OrderId;
/// use std::str::FromStr;
///
/// let order_id = OrderId::from_str("66f1c0a2b3d4e5f601234567").unwrap();
/// assert_eq!(order_id.as_str(), "66f1c0a2b3d4e5f601234567");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(String);

impl OrderId {
    /// Creates a new OrderId from a string
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty or whitespace
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Order ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the order ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for OrderId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Course identifier newtype wrapper
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CourseId(String);

impl CourseId {
    /// Creates a new CourseId from a string
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty or whitespace
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Course ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the course ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CourseId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_id_valid() {
        let id = OrderId::new("66f1c0a2b3d4e5f601234567").unwrap();
        assert_eq!(id.as_str(), "66f1c0a2b3d4e5f601234567");
        assert_eq!(id.to_string(), "66f1c0a2b3d4e5f601234567");
    }

    #[test]
    fn test_order_id_empty() {
        assert!(OrderId::new("").is_err());
        assert!(OrderId::new("   ").is_err());
    }

    #[test]
    fn test_order_id_serializes_as_plain_string() {
        let id = OrderId::new("abc").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
        let back: OrderId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_course_id_from_str() {
        let id = CourseId::from_str("course-1").unwrap();
        assert_eq!(id.as_str(), "course-1");
        assert!(CourseId::from_str("").is_err());
    }
}
