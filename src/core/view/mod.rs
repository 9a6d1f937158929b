//! Order view state and the console that drives it
//!
//! - [`store`] - the observable view state and fetch sequencing
//! - [`projection`] - memoized filtering keyed by collection and criteria
//! - [`console`] - fetch, filter, paginate and export in one place

pub mod console;
pub mod projection;
pub mod store;

pub use console::{LoadOutcome, OrderConsole};
pub use projection::Projection;
pub use store::{FetchTicket, OrderViewStore, ViewState, ViewStatus};
