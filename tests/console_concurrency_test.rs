//! Integration tests for load sequencing, cancellation and the end-to-end
//! console pipeline
//!
//! These tests verify that:
//! - Only the most recently started load commits
//! - A cancellation signal stops an in-flight load without touching the view
//! - Orders flow from the service through the filters into both exports

use async_trait::async_trait;
use mockito::{Matcher, Server};
use orderdesk::adapters::remote::{BatchExportClient, HttpOrderService, OrderRepository};
use orderdesk::config::{secret_string, ApiConfig, DeskConfig, ExportConfig};
use orderdesk::core::export::RowBandRasterizer;
use orderdesk::core::filter::FilterCriteria;
use orderdesk::core::view::{LoadOutcome, OrderConsole, ViewStatus};
use orderdesk::domain::{
    Course, CourseId, CourseUpdate, DeskError, Order, OrderId, OrderStatus, Result,
};
use orderdesk::session::{CredentialVault, MemoryTokenStore, SessionContext};
use serde_json::json;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// First call is slow and large, later calls are fast and small
#[derive(Default)]
struct SlowThenFast {
    calls: AtomicUsize,
}

#[async_trait]
impl OrderRepository for SlowThenFast {
    async fn fetch_orders(&self, _session: &SessionContext) -> Result<Vec<Order>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call == 0 {
            tokio::time::sleep(Duration::from_millis(150)).await;
            Ok(orders(50))
        } else {
            Ok(orders(5))
        }
    }

    async fn fetch_courses(&self, _session: &SessionContext) -> Result<Vec<Course>> {
        Ok(Vec::new())
    }

    async fn update_course(
        &self,
        _session: &SessionContext,
        _course_id: &CourseId,
        _update: &CourseUpdate,
    ) -> Result<()> {
        Ok(())
    }

    async fn delete_course(&self, _session: &SessionContext, _course_id: &CourseId) -> Result<()> {
        Ok(())
    }
}

/// Never answers
struct Hanging;

#[async_trait]
impl OrderRepository for Hanging {
    async fn fetch_orders(&self, _session: &SessionContext) -> Result<Vec<Order>> {
        std::future::pending::<()>().await;
        Ok(Vec::new())
    }

    async fn fetch_courses(&self, _session: &SessionContext) -> Result<Vec<Course>> {
        std::future::pending::<()>().await;
        Ok(Vec::new())
    }

    async fn update_course(
        &self,
        _session: &SessionContext,
        _course_id: &CourseId,
        _update: &CourseUpdate,
    ) -> Result<()> {
        std::future::pending::<()>().await;
        Ok(())
    }

    async fn delete_course(&self, _session: &SessionContext, _course_id: &CourseId) -> Result<()> {
        std::future::pending::<()>().await;
        Ok(())
    }
}

/// Export seam that must not be reached in these tests
struct NoExports;

#[async_trait]
impl BatchExportClient for NoExports {
    async fn export_batch(&self, _session: &SessionContext, _ids: &[OrderId]) -> Result<Vec<u8>> {
        Err(DeskError::Export("unexpected export".to_string()))
    }

    async fn generate_contract_pdf(
        &self,
        _session: &SessionContext,
        _order: &Order,
    ) -> Result<Vec<u8>> {
        Err(DeskError::Export("unexpected contract".to_string()))
    }
}

fn orders(n: usize) -> Vec<Order> {
    (0..n)
        .map(|i| {
            Order::builder()
                .id(OrderId::new(format!("o{i}")).unwrap())
                .status(OrderStatus::Paid)
                .build()
                .unwrap()
        })
        .collect()
}

fn config(base_url: &str, output_dir: &Path) -> DeskConfig {
    DeskConfig {
        application: Default::default(),
        environment: Default::default(),
        api: ApiConfig {
            base_url: base_url.to_string(),
            timeout_seconds: 5,
            tls_verify: true,
        },
        session: Default::default(),
        view: Default::default(),
        export: ExportConfig {
            output_dir: output_dir.to_string_lossy().into_owned(),
            ..Default::default()
        },
        logging: Default::default(),
    }
}

async fn session(token: &str) -> Arc<SessionContext> {
    let vault = Arc::new(CredentialVault::new(
        Arc::new(MemoryTokenStore::new()),
        "token",
        secret_string("passphrase".to_string()),
    ));
    vault.store_token(token).await.unwrap();
    Arc::new(SessionContext::new(vault))
}

fn idle_cancel() -> (watch::Sender<bool>, watch::Receiver<bool>) {
    watch::channel(false)
}

#[tokio::test]
async fn test_slow_earlier_load_is_superseded() {
    let dir = tempfile::tempdir().unwrap();
    let console = OrderConsole::new(
        Arc::new(SlowThenFast::default()),
        Arc::new(NoExports),
        Arc::new(RowBandRasterizer::new()),
        session("tok").await,
        &config("http://localhost", dir.path()),
    )
    .unwrap();

    let (_tx1, mut rx1) = idle_cancel();
    let (_tx2, mut rx2) = idle_cancel();

    let slow = console.load(&mut rx1);
    let fast = async {
        // Let the slow load take its ticket first
        tokio::time::sleep(Duration::from_millis(20)).await;
        console.load(&mut rx2).await
    };
    let (slow, fast) = tokio::join!(slow, fast);

    assert_eq!(slow.unwrap(), LoadOutcome::Superseded);
    assert_eq!(
        fast.unwrap(),
        LoadOutcome::Committed {
            orders: 5,
            courses: 0
        }
    );

    let state = console.state();
    assert_eq!(state.orders.len(), 5);
    assert_eq!(state.status, ViewStatus::Ready);
}

#[tokio::test]
async fn test_cancel_signal_stops_in_flight_load() {
    let dir = tempfile::tempdir().unwrap();
    let console = OrderConsole::new(
        Arc::new(Hanging),
        Arc::new(NoExports),
        Arc::new(RowBandRasterizer::new()),
        session("tok").await,
        &config("http://localhost", dir.path()),
    )
    .unwrap();

    let (cancel_tx, mut cancel_rx) = idle_cancel();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        let _ = cancel_tx.send(true);
    });

    let outcome = tokio::time::timeout(Duration::from_secs(5), console.load(&mut cancel_rx))
        .await
        .expect("load did not observe the cancel signal")
        .unwrap();

    assert_eq!(outcome, LoadOutcome::Cancelled);
    assert_eq!(console.state().status, ViewStatus::Idle);
}

#[tokio::test]
async fn test_end_to_end_against_mock_service() {
    let mut server = Server::new_async().await;
    let base_url = format!("{}/api/v1", server.url());

    server
        .mock("GET", "/api/v1/orders")
        .match_header("authorization", "Bearer e2e-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "data": [
                    {"_id": "a", "invoiceNumber": "101", "status": "PAID", "amount": 150000,
                     "course_id": {"_id": "c1", "title": "Algebra", "prefix": "A"}},
                    {"_id": "b", "invoiceNumber": "102", "status": "UNPAID", "amount": 1500,
                     "course_id": {"_id": "c1", "title": "Algebra", "prefix": "A"}},
                    {"_id": "c", "invoiceNumber": "103", "status": "PAID", "amount": 90000,
                     "course_id": {"_id": "c2", "title": "Geometry"}}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/api/v1/courses")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {"_id": "c1", "title": "Algebra", "prefix": "A"},
                {"_id": "c2", "title": "Geometry"}
            ])
            .to_string(),
        )
        .create_async()
        .await;
    let export = server
        .mock("POST", "/api/v1/export/order")
        .match_body(Matcher::Json(json!({"orderIds": ["c", "a"]})))
        .with_status(200)
        .with_body(b"PK\x03\x04".to_vec())
        .create_async()
        .await;
    let contract = server
        .mock("POST", "/api/v1/generate-pdf")
        .with_status(200)
        .with_header("content-type", "application/pdf")
        .with_body(b"%PDF-1.7".to_vec())
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = config(&base_url, dir.path());
    let service = Arc::new(HttpOrderService::new(&config.api).unwrap());
    let console = OrderConsole::new(
        service.clone(),
        service,
        Arc::new(RowBandRasterizer::new()),
        session("e2e-token").await,
        &config,
    )
    .unwrap();

    let (_tx, mut rx) = idle_cancel();
    console.load(&mut rx).await.unwrap();

    // Newest first
    let state = console.state();
    let ids: Vec<&str> = state.orders.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec!["c", "b", "a"]);

    let stats = console.course_statistics();
    assert_eq!(stats[0].successful, 1);
    assert_eq!(stats[1].successful, 1);

    console
        .store()
        .set_criteria(FilterCriteria::any().with_status(OrderStatus::Paid));

    let spreadsheet = console.export_spreadsheet().await.unwrap();
    export.assert_async().await;
    assert_eq!(spreadsheet.order_count, 2);
    assert!(dir.path().join("orders.xlsx").exists());

    let snapshot = console.export_snapshot().await.unwrap();
    assert_eq!(snapshot.order_count, 2);
    assert!(dir.path().join("orders.pdf").exists());

    let summary = console
        .export_contract(&OrderId::new("a").unwrap())
        .await
        .unwrap();
    contract.assert_async().await;
    assert_eq!(summary.path.unwrap(), dir.path().join("101.pdf"));
}
