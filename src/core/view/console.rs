//! Order console orchestration
//!
//! [`OrderConsole`] wires the pipeline together: the session feeds the
//! repository, fetch results land in the [`OrderViewStore`], and the three
//! export paths read from the store. Course edits go to the service first
//! and reach the store only once accepted. The snapshot covers the visible page;
//! the spreadsheet covers every filtered order.

use super::store::{OrderViewStore, ViewState};
use crate::adapters::remote::{
    contract_file_name, BatchExportClient, HttpOrderService, OrderRepository,
};
use crate::config::{DeskConfig, ExportConfig};
use crate::core::export::{
    write_document, ExportKind, ExportSummary, PageFormat, Rasterizer, RowBandRasterizer,
    SnapshotExporter, ViewRegion,
};
use crate::core::stats::{successful_purchases, CoursePurchases};
use crate::domain::{Course, CourseId, CourseUpdate, DeskError, OrderId, Result};
use crate::session::{CredentialVault, SessionContext};
use crate::{log_error_with_context, log_fetch_complete};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// What happened to a load request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The result replaced the held collection
    Committed { orders: usize, courses: usize },
    /// A newer load started first; this result was dropped
    Superseded,
    /// The cancellation signal fired before the fetch finished
    Cancelled,
}

/// The order view-and-export pipeline
pub struct OrderConsole {
    repository: Arc<dyn OrderRepository>,
    exports: Arc<dyn BatchExportClient>,
    session: Arc<SessionContext>,
    store: Arc<OrderViewStore>,
    snapshot: SnapshotExporter,
    export_config: ExportConfig,
    currency: String,
}

impl OrderConsole {
    /// Assemble a console from its collaborators
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Validation`] for an unknown page format.
    pub fn new(
        repository: Arc<dyn OrderRepository>,
        exports: Arc<dyn BatchExportClient>,
        rasterizer: Arc<dyn Rasterizer>,
        session: Arc<SessionContext>,
        config: &DeskConfig,
    ) -> Result<Self> {
        let format: PageFormat = config.export.page_format.parse()?;
        Ok(Self {
            repository,
            exports,
            session,
            store: Arc::new(OrderViewStore::new(config.view.page_size)),
            snapshot: SnapshotExporter::new(rasterizer, format),
            export_config: config.export.clone(),
            currency: config.view.currency.clone(),
        })
    }

    /// Console over the HTTP order service with the file-backed vault
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the page
    /// format is unknown.
    pub async fn from_config(config: &DeskConfig) -> Result<Self> {
        let service = Arc::new(HttpOrderService::new(&config.api)?);
        let vault = Arc::new(CredentialVault::from_config(&config.session));
        let session = Arc::new(SessionContext::open(vault).await);

        if !session.is_authenticated() {
            tracing::warn!("No usable session token; requests will be unauthenticated");
        }

        Self::new(
            service.clone(),
            service,
            Arc::new(RowBandRasterizer::new()),
            session,
            config,
        )
    }

    pub fn store(&self) -> &Arc<OrderViewStore> {
        &self.store
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    /// Current view state
    pub fn state(&self) -> ViewState {
        self.store.snapshot()
    }

    /// Fetch orders and courses concurrently and commit them to the store
    ///
    /// A courses failure alone keeps the previous courses and still commits
    /// the orders.
    ///
    /// # Errors
    ///
    /// Returns the orders fetch error after recording it in the store.
    pub async fn load(&self, cancel: &mut watch::Receiver<bool>) -> Result<LoadOutcome> {
        let ticket = self.store.begin_fetch();
        let start = Instant::now();

        let fetch = async {
            tokio::join!(
                self.repository.fetch_orders(&self.session),
                self.repository.fetch_courses(&self.session)
            )
        };

        let (orders, courses) = tokio::select! {
            biased;
            _ = cancelled(cancel) => {
                tracing::info!(sequence = ticket.sequence(), "Load cancelled");
                self.store.abandon(ticket);
                return Ok(LoadOutcome::Cancelled);
            }
            results = fetch => results,
        };

        let orders = match orders {
            Ok(orders) => orders,
            Err(e) => {
                log_error_with_context!(&e, "Order fetch failed");
                self.store.fail(ticket, &e);
                return Err(e);
            }
        };

        let courses = match courses {
            Ok(courses) => Some(courses),
            Err(e) => {
                tracing::warn!(error = %e, "Course fetch failed, keeping previous courses");
                None
            }
        };

        let order_count = orders.len();
        let course_count = courses.as_ref().map(Vec::len);
        if !self.store.commit(ticket, orders, courses) {
            return Ok(LoadOutcome::Superseded);
        }

        log_fetch_complete!("orders", order_count, ticket.sequence(), start.elapsed());
        Ok(LoadOutcome::Committed {
            orders: order_count,
            courses: course_count.unwrap_or_else(|| self.store.snapshot().courses.len()),
        })
    }

    /// PDF snapshot of the visible page, written to the output directory
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Export`] if rasterization or composition fails,
    /// or an I/O error if the file cannot be written. No file is left behind
    /// on failure.
    pub async fn export_snapshot(&self) -> Result<ExportSummary> {
        let start = Instant::now();
        let state = self.store.snapshot();
        let visible = state.visible();
        let region = ViewRegion::from_orders(visible, &self.currency);

        let document = match self.snapshot.export_snapshot(&region).await {
            Ok(document) => document,
            Err(e) => {
                log_error_with_context!(&e, "Snapshot export failed");
                return Err(e);
            }
        };

        let path = write_document(
            &self.output_dir(),
            &self.export_config.snapshot_file_name,
            &document.bytes,
        )
        .await?;

        let summary = ExportSummary::new(ExportKind::Snapshot, visible.len())
            .written(path, document.bytes.len())
            .with_pages(document.pages)
            .with_duration(start.elapsed());
        summary.log_summary();
        Ok(summary)
    }

    /// Server-generated spreadsheet of every filtered order
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Validation`] when no order matches the current
    /// criteria (no request is made), [`DeskError::Export`] when the service
    /// call fails.
    pub async fn export_spreadsheet(&self) -> Result<ExportSummary> {
        let start = Instant::now();
        let ids = self.store.snapshot().filtered_ids();
        if ids.is_empty() {
            return Err(DeskError::Validation(
                "no orders match the current filters".to_string(),
            ));
        }

        let bytes = match self.exports.export_batch(&self.session, &ids).await {
            Ok(bytes) => bytes,
            Err(e) => {
                log_error_with_context!(&e, "Spreadsheet export failed");
                return Err(e);
            }
        };

        let path = write_document(
            &self.output_dir(),
            &self.export_config.spreadsheet_file_name,
            &bytes,
        )
        .await?;

        let summary = ExportSummary::new(ExportKind::Spreadsheet, ids.len())
            .written(path, bytes.len())
            .with_duration(start.elapsed());
        summary.log_summary();
        Ok(summary)
    }

    /// Contract PDF for one held order, saved as `<invoiceNumber>.pdf`
    ///
    /// # Errors
    ///
    /// - [`DeskError::Validation`] if the order is not in the held collection
    /// - [`DeskError::Ineligible`] if it is not PAID
    /// - [`DeskError::InvalidResponseFormat`] if the service answers with
    ///   anything but `application/pdf`
    pub async fn export_contract(&self, order_id: &OrderId) -> Result<ExportSummary> {
        let start = Instant::now();
        let state = self.store.snapshot();
        let order = state
            .orders
            .iter()
            .find(|o| &o.id == order_id)
            .ok_or_else(|| DeskError::Validation(format!("order {order_id} is not loaded")))?;

        let bytes = match self.exports.generate_contract_pdf(&self.session, order).await {
            Ok(bytes) => bytes,
            Err(e) => {
                log_error_with_context!(&e, "Contract PDF export failed");
                return Err(e);
            }
        };

        let path = write_document(&self.output_dir(), &contract_file_name(order), &bytes).await?;

        let summary = ExportSummary::new(ExportKind::Contract, 1)
            .written(path, bytes.len())
            .with_duration(start.elapsed());
        summary.log_summary();
        Ok(summary)
    }

    /// Change fields of a held course, then merge the change locally
    ///
    /// # Errors
    ///
    /// - [`DeskError::Validation`] for an empty update or a course that is not
    ///   held; no request is made
    /// - [`DeskError::CourseChange`] when the service rejects the change; the
    ///   held course stays as it was
    pub async fn update_course(
        &self,
        course_id: &CourseId,
        update: &CourseUpdate,
    ) -> Result<Course> {
        if update.is_empty() {
            return Err(DeskError::Validation(format!(
                "nothing to change for course {course_id}"
            )));
        }
        self.held_course(course_id)?;

        if let Err(e) = self
            .repository
            .update_course(&self.session, course_id, update)
            .await
        {
            log_error_with_context!(&e, "Course update failed");
            return Err(e);
        }

        self.store
            .update_course(course_id, update)
            .ok_or_else(|| not_loaded(course_id))
    }

    /// Delete a held course, then drop it from the held list
    ///
    /// # Errors
    ///
    /// - [`DeskError::Validation`] for a course that is not held; no request
    ///   is made
    /// - [`DeskError::CourseChange`] when the service rejects the delete; the
    ///   course stays in the list
    pub async fn delete_course(&self, course_id: &CourseId) -> Result<Course> {
        self.held_course(course_id)?;

        if let Err(e) = self.repository.delete_course(&self.session, course_id).await {
            log_error_with_context!(&e, "Course delete failed");
            return Err(e);
        }

        self.store
            .remove_course(course_id)
            .ok_or_else(|| not_loaded(course_id))
    }

    fn held_course(&self, course_id: &CourseId) -> Result<Course> {
        self.store
            .snapshot()
            .courses
            .iter()
            .find(|c| &c.id == course_id)
            .cloned()
            .ok_or_else(|| not_loaded(course_id))
    }

    /// Paid orders per held course
    pub fn course_statistics(&self) -> Vec<CoursePurchases> {
        let state = self.store.snapshot();
        successful_purchases(&state.courses, &state.orders)
    }

    fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.export_config.output_dir)
    }
}

fn not_loaded(course_id: &CourseId) -> DeskError {
    DeskError::Validation(format!("course {course_id} is not loaded"))
}

/// Resolves once the cancellation flag is set; never if the sender is gone
async fn cancelled(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::store::ViewStatus;
    use crate::config::{secret_string, ApiConfig};
    use crate::core::filter::FilterCriteria;
    use crate::domain::{Order, OrderStatus, RemoteError};
    use crate::session::MemoryTokenStore;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeService {
        orders: Vec<Order>,
        fail_orders: bool,
        fail_courses: bool,
        hang: bool,
        reject_course_changes: bool,
        exported: Mutex<Vec<Vec<OrderId>>>,
        course_changes: Mutex<Vec<String>>,
    }

    impl FakeService {
        fn change_course(&self, action: &'static str, course_id: &CourseId) -> Result<()> {
            if self.reject_course_changes {
                return Err(DeskError::course_change(
                    action,
                    course_id.as_str(),
                    RemoteError::from_status(404, "no such course"),
                ));
            }
            self.course_changes
                .lock()
                .unwrap()
                .push(format!("{action} {course_id}"));
            Ok(())
        }
    }

    #[async_trait]
    impl OrderRepository for FakeService {
        async fn fetch_orders(&self, _session: &SessionContext) -> Result<Vec<Order>> {
            if self.hang {
                std::future::pending::<()>().await;
            }
            if self.fail_orders {
                return Err(DeskError::fetch("orders", RemoteError::from_status(500, "boom")));
            }
            Ok(self.orders.clone())
        }

        async fn fetch_courses(&self, _session: &SessionContext) -> Result<Vec<Course>> {
            if self.fail_courses {
                return Err(DeskError::fetch("courses", RemoteError::from_status(502, "down")));
            }
            Ok(vec![Course::new(CourseId::new("c1").unwrap(), "Algebra")])
        }

        async fn update_course(
            &self,
            _session: &SessionContext,
            course_id: &CourseId,
            _update: &CourseUpdate,
        ) -> Result<()> {
            self.change_course("update", course_id)
        }

        async fn delete_course(&self, _session: &SessionContext, course_id: &CourseId) -> Result<()> {
            self.change_course("delete", course_id)
        }
    }

    #[async_trait]
    impl BatchExportClient for FakeService {
        async fn export_batch(
            &self,
            _session: &SessionContext,
            order_ids: &[OrderId],
        ) -> Result<Vec<u8>> {
            self.exported.lock().unwrap().push(order_ids.to_vec());
            Ok(b"spreadsheet".to_vec())
        }

        async fn generate_contract_pdf(
            &self,
            _session: &SessionContext,
            order: &Order,
        ) -> Result<Vec<u8>> {
            if !order.is_contract_eligible() {
                return Err(DeskError::Ineligible(order.id.to_string()));
            }
            Ok(b"%PDF-1.4 contract".to_vec())
        }
    }

    fn orders(n: usize) -> Vec<Order> {
        (0..n)
            .map(|i| {
                Order::builder()
                    .id(OrderId::new(format!("o{i}")).unwrap())
                    .invoice_number(format!("{}", 1000 + i))
                    .client_name(format!("Client {i}"))
                    .amount(150_000)
                    .status(if i % 2 == 0 {
                        OrderStatus::Paid
                    } else {
                        OrderStatus::Unpaid
                    })
                    .build()
                    .unwrap()
            })
            .collect()
    }

    fn config(dir: &Path) -> DeskConfig {
        DeskConfig {
            application: Default::default(),
            environment: Default::default(),
            api: ApiConfig::default(),
            session: Default::default(),
            view: Default::default(),
            export: ExportConfig {
                output_dir: dir.to_string_lossy().into_owned(),
                ..Default::default()
            },
            logging: Default::default(),
        }
    }

    fn console(service: Arc<FakeService>, dir: &Path) -> OrderConsole {
        let vault = CredentialVault::new(
            Arc::new(MemoryTokenStore::new()),
            "token",
            secret_string("k".to_string()),
        );
        OrderConsole::new(
            service.clone(),
            service,
            Arc::new(RowBandRasterizer::new()),
            Arc::new(SessionContext::new(Arc::new(vault))),
            &config(dir),
        )
        .unwrap()
    }

    fn no_cancel() -> watch::Receiver<bool> {
        let (tx, rx) = watch::channel(false);
        std::mem::forget(tx);
        rx
    }

    #[tokio::test]
    async fn test_load_commits_orders_and_courses() {
        let dir = tempfile::tempdir().unwrap();
        let service = Arc::new(FakeService {
            orders: orders(23),
            ..Default::default()
        });
        let console = console(service, dir.path());

        let outcome = console.load(&mut no_cancel()).await.unwrap();
        assert_eq!(outcome, LoadOutcome::Committed { orders: 23, courses: 1 });

        let state = console.state();
        assert_eq!(state.window.total_pages(), 3);
        assert_eq!(state.visible().len(), 10);
    }

    #[tokio::test]
    async fn test_course_failure_still_commits_orders() {
        let dir = tempfile::tempdir().unwrap();
        let service = Arc::new(FakeService {
            orders: orders(4),
            fail_courses: true,
            ..Default::default()
        });
        let console = console(service, dir.path());

        let outcome = console.load(&mut no_cancel()).await.unwrap();
        assert_eq!(outcome, LoadOutcome::Committed { orders: 4, courses: 0 });
    }

    #[tokio::test]
    async fn test_order_failure_is_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let service = Arc::new(FakeService {
            fail_orders: true,
            ..Default::default()
        });
        let console = console(service, dir.path());

        let err = console.load(&mut no_cancel()).await.unwrap_err();
        assert!(matches!(err, DeskError::Fetch { .. }));
        assert!(matches!(console.state().status, ViewStatus::Failed(_)));
    }

    #[tokio::test]
    async fn test_cancelled_load_leaves_store_idle() {
        let dir = tempfile::tempdir().unwrap();
        let service = Arc::new(FakeService {
            hang: true,
            ..Default::default()
        });
        let console = console(service, dir.path());

        let (tx, mut rx) = watch::channel(false);
        tx.send(true).unwrap();
        let outcome = console.load(&mut rx).await.unwrap();

        assert_eq!(outcome, LoadOutcome::Cancelled);
        assert_eq!(console.state().status, ViewStatus::Idle);
    }

    #[tokio::test]
    async fn test_spreadsheet_covers_every_filtered_order() {
        let dir = tempfile::tempdir().unwrap();
        let service = Arc::new(FakeService {
            orders: orders(23),
            ..Default::default()
        });
        let console = console(service.clone(), dir.path());
        console.load(&mut no_cancel()).await.unwrap();
        console
            .store()
            .set_criteria(FilterCriteria::any().with_status(OrderStatus::Paid));

        let summary = console.export_spreadsheet().await.unwrap();
        assert!(summary.is_successful());
        assert_eq!(summary.order_count, 12);

        let exported = service.exported.lock().unwrap();
        assert_eq!(exported.len(), 1);
        assert_eq!(exported[0].len(), 12);
        assert_eq!(exported[0][0].as_str(), "o0");

        let written = std::fs::read(dir.path().join("orders.xlsx")).unwrap();
        assert_eq!(written, b"spreadsheet");
    }

    #[tokio::test]
    async fn test_empty_spreadsheet_makes_no_request() {
        let dir = tempfile::tempdir().unwrap();
        let service = Arc::new(FakeService::default());
        let console = console(service.clone(), dir.path());
        console.load(&mut no_cancel()).await.unwrap();

        let err = console.export_spreadsheet().await.unwrap_err();
        assert!(matches!(err, DeskError::Validation(_)));
        assert!(service.exported.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_writes_pdf_of_visible_page() {
        let dir = tempfile::tempdir().unwrap();
        let service = Arc::new(FakeService {
            orders: orders(23),
            ..Default::default()
        });
        let console = console(service, dir.path());
        console.load(&mut no_cancel()).await.unwrap();

        let summary = console.export_snapshot().await.unwrap();
        assert_eq!(summary.order_count, 10);
        assert!(summary.pages.unwrap() >= 1);

        let path = summary.path.unwrap();
        let bytes = std::fs::read(path).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_contract_saved_under_invoice_number() {
        let dir = tempfile::tempdir().unwrap();
        let service = Arc::new(FakeService {
            orders: orders(2),
            ..Default::default()
        });
        let console = console(service, dir.path());
        console.load(&mut no_cancel()).await.unwrap();

        let summary = console
            .export_contract(&OrderId::new("o0").unwrap())
            .await
            .unwrap();
        assert_eq!(summary.path.unwrap(), dir.path().join("1000.pdf"));

        let err = console
            .export_contract(&OrderId::new("o1").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, DeskError::Ineligible(_)));
        assert!(!dir.path().join("1001.pdf").exists());
    }

    #[tokio::test]
    async fn test_contract_for_unknown_order() {
        let dir = tempfile::tempdir().unwrap();
        let console = console(Arc::new(FakeService::default()), dir.path());
        let err = console
            .export_contract(&OrderId::new("missing").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, DeskError::Validation(_)));
    }

    #[tokio::test]
    async fn test_course_update_reaches_service_then_store() {
        let dir = tempfile::tempdir().unwrap();
        let service = Arc::new(FakeService::default());
        let console = console(service.clone(), dir.path());
        console.load(&mut no_cancel()).await.unwrap();

        let update = CourseUpdate {
            price: Some(450_000),
            ..Default::default()
        };
        let c1 = CourseId::new("c1").unwrap();
        let course = console.update_course(&c1, &update).await.unwrap();

        assert_eq!(course.price, 450_000);
        assert_eq!(course.title, "Algebra");
        assert_eq!(console.state().courses[0].price, 450_000);
        assert_eq!(*service.course_changes.lock().unwrap(), vec!["update c1"]);
    }

    #[tokio::test]
    async fn test_course_update_needs_a_change_and_a_held_course() {
        let dir = tempfile::tempdir().unwrap();
        let service = Arc::new(FakeService::default());
        let console = console(service.clone(), dir.path());
        console.load(&mut no_cancel()).await.unwrap();

        let err = console
            .update_course(&CourseId::new("c1").unwrap(), &CourseUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DeskError::Validation(_)));

        let update = CourseUpdate {
            title: Some("Logic".to_string()),
            ..Default::default()
        };
        let err = console
            .update_course(&CourseId::new("c9").unwrap(), &update)
            .await
            .unwrap_err();
        assert!(matches!(err, DeskError::Validation(_)));
        assert!(service.course_changes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_course_delete_removes_from_held_list() {
        let dir = tempfile::tempdir().unwrap();
        let service = Arc::new(FakeService::default());
        let console = console(service.clone(), dir.path());
        console.load(&mut no_cancel()).await.unwrap();

        let removed = console
            .delete_course(&CourseId::new("c1").unwrap())
            .await
            .unwrap();
        assert_eq!(removed.title, "Algebra");
        assert!(console.state().courses.is_empty());
        assert!(console.course_statistics().is_empty());
        assert_eq!(*service.course_changes.lock().unwrap(), vec!["delete c1"]);
    }

    #[tokio::test]
    async fn test_rejected_course_change_keeps_held_course() {
        let dir = tempfile::tempdir().unwrap();
        let service = Arc::new(FakeService {
            reject_course_changes: true,
            ..Default::default()
        });
        let console = console(service, dir.path());
        console.load(&mut no_cancel()).await.unwrap();
        let c1 = CourseId::new("c1").unwrap();

        let err = console.delete_course(&c1).await.unwrap_err();
        assert!(matches!(err, DeskError::CourseChange { action: "delete", .. }));

        let update = CourseUpdate {
            title: Some("Logic".to_string()),
            ..Default::default()
        };
        let err = console.update_course(&c1, &update).await.unwrap_err();
        assert!(matches!(err, DeskError::CourseChange { action: "update", .. }));

        let courses = console.state().courses;
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].title, "Algebra");
    }
}
