//! Order service adapter
//!
//! REST integration with the remote order service:
//!
//! - [`client`] - authenticated HTTP plumbing and error classification
//! - [`repository`] - [`OrderRepository`] and [`BatchExportClient`] over HTTP
//! - [`models`] - request and response bodies

pub mod client;
pub mod models;
pub mod repository;

pub use client::ApiClient;
pub use models::DocumentBytes;
pub use repository::{
    contract_file_name, BatchExportClient, HttpOrderService, OrderRepository, PDF_CONTENT_TYPE,
};
