//! Domain models and types for orderdesk.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`OrderId`], [`CourseId`])
//! - **Domain models** ([`Order`], [`Course`]) in the service's wire format
//! - **Closed enumerations** ([`OrderStatus`], [`PaymentType`]) with an explicit
//!   unknown variant
//! - **Error types** ([`DeskError`], [`RemoteError`]) and the [`Result`] alias
//!
//! # Amounts
//!
//! Stored amounts are in minor units for paid orders and major units for
//! everything else. Always go through [`Order::display_amount`]:
//!
//! ```rust
//! use orderdesk::domain::{Order, OrderId, OrderStatus};
//!
//! let order = Order::builder()
//!     .id(OrderId::new("o1").unwrap())
//!     .status(OrderStatus::Paid)
//!     .amount(150000)
//!     .build()
//!     .unwrap();
//! assert_eq!(order.display_amount(), 1500.0);
//! ```

pub mod course;
pub mod errors;
pub mod ids;
pub mod order;
pub mod result;
mod wire;

// Re-export commonly used types for convenience
pub use course::{Course, CourseUpdate};
pub use errors::{DeskError, RemoteError};
pub use ids::{CourseId, OrderId};
pub use order::{Badge, BadgeTone, Order, OrderBuilder, OrderStatus, PaymentType, NO_DATA};
pub use result::Result;
