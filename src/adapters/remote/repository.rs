//! Order service operations
//!
//! Two seams, both implemented by [`HttpOrderService`]:
//!
//! - [`OrderRepository`] loads the order and course collections and edits
//!   or deletes courses
//! - [`BatchExportClient`] asks the service for export documents
//!
//! Every call takes the [`SessionContext`] explicitly and refreshes it first,
//! so the token is decrypted anew for each request.

use super::client::ApiClient;
use super::models::{BatchExportRequest, ContractRequest, DocumentBytes, OrderListResponse};
use crate::config::ApiConfig;
use crate::domain::{Course, CourseId, CourseUpdate, DeskError, Order, OrderId, Result};
use crate::session::SessionContext;
use async_trait::async_trait;
use std::time::Instant;

/// Content type the contract endpoint must answer with
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Source of order and course collections
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Fetch all orders, most recent first
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Fetch`] on a network failure or non-success
    /// response. There is no retry.
    async fn fetch_orders(&self, session: &SessionContext) -> Result<Vec<Order>>;

    /// Fetch all courses, in service order
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Fetch`] on a network failure or non-success
    /// response.
    async fn fetch_courses(&self, session: &SessionContext) -> Result<Vec<Course>>;

    /// Send the changed fields of one course
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::CourseChange`] on a network failure or
    /// non-success response.
    async fn update_course(
        &self,
        session: &SessionContext,
        course_id: &CourseId,
        update: &CourseUpdate,
    ) -> Result<()>;

    /// Delete one course
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::CourseChange`] on a network failure or
    /// non-success response.
    async fn delete_course(&self, session: &SessionContext, course_id: &CourseId) -> Result<()>;
}

/// Server-side document generation
#[async_trait]
pub trait BatchExportClient: Send + Sync {
    /// Export the given orders as a spreadsheet
    ///
    /// Callers pass the full filtered id set, not a page of it.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Export`] if the call fails.
    async fn export_batch(&self, session: &SessionContext, order_ids: &[OrderId])
        -> Result<Vec<u8>>;

    /// Generate the contract PDF for one paid order
    ///
    /// # Errors
    ///
    /// - [`DeskError::Ineligible`] for any order that is not PAID, before any
    ///   request is made
    /// - [`DeskError::InvalidResponseFormat`] when the response is not
    ///   `application/pdf`
    /// - [`DeskError::Export`] when the call fails
    async fn generate_contract_pdf(&self, session: &SessionContext, order: &Order)
        -> Result<Vec<u8>>;
}

/// REST implementation of both seams
#[derive(Debug, Clone)]
pub struct HttpOrderService {
    client: ApiClient,
}

impl HttpOrderService {
    /// Create the service client from configuration
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Configuration`] if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Ok(Self {
            client: ApiClient::new(config)?,
        })
    }

    /// Wrap an existing client
    pub fn with_client(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }
}

#[async_trait]
impl OrderRepository for HttpOrderService {
    async fn fetch_orders(&self, session: &SessionContext) -> Result<Vec<Order>> {
        session.refresh().await;
        let start = Instant::now();

        let response: OrderListResponse = self
            .client
            .get_json("orders", session)
            .await
            .map_err(|e| DeskError::fetch("orders", e))?;

        // The service returns insertion order; the console shows newest first
        let mut orders = response.data;
        orders.reverse();

        let unknown = orders.iter().filter(|o| o.status.is_unknown()).count();
        if unknown > 0 {
            tracing::warn!(count = unknown, "Orders with an unrecognised status");
        }

        tracing::debug!(
            count = orders.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Orders fetched"
        );
        Ok(orders)
    }

    async fn fetch_courses(&self, session: &SessionContext) -> Result<Vec<Course>> {
        session.refresh().await;
        let start = Instant::now();

        let courses: Vec<Course> = self
            .client
            .get_json("courses", session)
            .await
            .map_err(|e| DeskError::fetch("courses", e))?;

        tracing::debug!(
            count = courses.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Courses fetched"
        );
        Ok(courses)
    }

    async fn update_course(
        &self,
        session: &SessionContext,
        course_id: &CourseId,
        update: &CourseUpdate,
    ) -> Result<()> {
        session.refresh().await;

        self.client
            .put_item("courses", course_id.as_str(), update, session)
            .await
            .map_err(|e| DeskError::course_change("update", course_id.as_str(), e))?;

        tracing::info!(course_id = %course_id, "Course updated");
        Ok(())
    }

    async fn delete_course(&self, session: &SessionContext, course_id: &CourseId) -> Result<()> {
        session.refresh().await;

        self.client
            .delete_item("courses", course_id.as_str(), session)
            .await
            .map_err(|e| DeskError::course_change("delete", course_id.as_str(), e))?;

        tracing::info!(course_id = %course_id, "Course deleted");
        Ok(())
    }
}

#[async_trait]
impl BatchExportClient for HttpOrderService {
    async fn export_batch(
        &self,
        session: &SessionContext,
        order_ids: &[OrderId],
    ) -> Result<Vec<u8>> {
        session.refresh().await;

        tracing::info!(count = order_ids.len(), "Requesting spreadsheet export");
        let document = self
            .client
            .post_for_document("export/order", &BatchExportRequest { order_ids }, session)
            .await
            .map_err(|e| DeskError::Export(format!("Spreadsheet export failed: {e}")))?;

        if document.bytes.is_empty() {
            return Err(DeskError::Export(
                "Spreadsheet export returned an empty document".to_string(),
            ));
        }

        Ok(document.bytes)
    }

    async fn generate_contract_pdf(
        &self,
        session: &SessionContext,
        order: &Order,
    ) -> Result<Vec<u8>> {
        if !order.is_contract_eligible() {
            return Err(DeskError::Ineligible(format!(
                "contract PDF requires a PAID order; order {} is {}",
                order.id, order.status.badge().label
            )));
        }

        session.refresh().await;

        tracing::info!(order_id = %order.id, "Requesting contract PDF");
        let document: DocumentBytes = self
            .client
            .post_for_document("generate-pdf", &ContractRequest { orders: [order] }, session)
            .await
            .map_err(|e| DeskError::Export(format!("Contract PDF request failed: {e}")))?;

        if !document.has_content_type(PDF_CONTENT_TYPE) {
            return Err(DeskError::InvalidResponseFormat {
                expected: PDF_CONTENT_TYPE.to_string(),
                actual: document
                    .content_type
                    .unwrap_or_else(|| "<none>".to_string()),
            });
        }

        Ok(document.bytes)
    }
}

/// File name a contract PDF is saved under
pub fn contract_file_name(order: &Order) -> String {
    format!("{}.pdf", order.invoice_number)
}
