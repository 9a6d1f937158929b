//! Observable order view state
//!
//! [`OrderViewStore`] is the only place view state changes. It publishes a
//! [`ViewState`] through a `tokio::sync::watch` channel; subscribers see
//! every committed change.
//!
//! Fetches are sequenced: [`OrderViewStore::begin_fetch`] hands out a
//! [`FetchTicket`] with a monotonically increasing number, and only the most
//! recently issued ticket may commit. A result that arrives after a newer
//! fetch was started is dropped.

use super::projection::Projection;
use crate::core::filter::FilterCriteria;
use crate::core::paginate::PageWindow;
use crate::domain::{Course, CourseId, CourseUpdate, DeskError, Order, OrderId, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Lifecycle of the held collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewStatus {
    /// Nothing fetched yet
    Idle,
    /// A fetch is in flight; the previous collection is still shown
    Loading,
    /// The last fetch committed
    Ready,
    /// The last fetch failed; the previous collection is still shown
    Failed(String),
}

/// Handle for one fetch; only the latest issued ticket can commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    sequence: u64,
}

impl FetchTicket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Published view state
#[derive(Debug, Clone)]
pub struct ViewState {
    /// Bumped whenever the orders or the criteria change
    pub revision: u64,
    pub orders: Arc<Vec<Order>>,
    pub courses: Arc<Vec<Course>>,
    pub criteria: FilterCriteria,
    /// `orders` filtered by `criteria`
    pub filtered: Arc<Vec<Order>>,
    pub window: PageWindow,
    pub status: ViewStatus,
    /// Sequence number of the fetch that produced `orders` (0 before any)
    pub committed_sequence: u64,
}

impl ViewState {
    fn new(page_size: usize) -> Self {
        Self {
            revision: 0,
            orders: Arc::new(Vec::new()),
            courses: Arc::new(Vec::new()),
            criteria: FilterCriteria::default(),
            filtered: Arc::new(Vec::new()),
            window: PageWindow::new(page_size, 0),
            status: ViewStatus::Idle,
            committed_sequence: 0,
        }
    }

    /// Orders on the current page
    pub fn visible(&self) -> &[Order] {
        self.window.slice(&self.filtered)
    }

    /// Ids of every filtered order, across all pages
    pub fn filtered_ids(&self) -> Vec<OrderId> {
        self.filtered.iter().map(|o| o.id.clone()).collect()
    }
}

/// Owner of the order view state
pub struct OrderViewStore {
    tx: watch::Sender<ViewState>,
    projection: Mutex<Projection>,
    issued: AtomicU64,
}

impl OrderViewStore {
    /// Empty store showing `page_size` orders per page
    pub fn new(page_size: usize) -> Self {
        let (tx, _rx) = watch::channel(ViewState::new(page_size));
        Self {
            tx,
            projection: Mutex::new(Projection::new()),
            issued: AtomicU64::new(0),
        }
    }

    /// Receive every published state
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.tx.subscribe()
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> ViewState {
        self.tx.borrow().clone()
    }

    /// Start a fetch; any earlier outstanding ticket becomes stale
    pub fn begin_fetch(&self) -> FetchTicket {
        // Issued under the channel lock so it orders against commit checks
        let mut sequence = 0;
        self.tx.send_modify(|state| {
            sequence = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
            state.status = ViewStatus::Loading;
        });
        tracing::debug!(sequence, "Fetch started");
        FetchTicket { sequence }
    }

    fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.sequence == self.issued.load(Ordering::SeqCst)
    }

    /// Replace the collection with a fetch result
    ///
    /// Returns `false` and changes nothing when the ticket is stale. `courses`
    /// of `None` keeps the courses already held.
    pub fn commit(
        &self,
        ticket: FetchTicket,
        orders: Vec<Order>,
        courses: Option<Vec<Course>>,
    ) -> bool {
        let committed = self.tx.send_if_modified(|state| {
            if !self.is_current(ticket) {
                return false;
            }
            state.orders = Arc::new(orders);
            if let Some(courses) = courses {
                state.courses = Arc::new(courses);
            }
            state.committed_sequence = ticket.sequence;
            state.status = ViewStatus::Ready;
            self.reproject(state);
            true
        });

        if !committed {
            tracing::debug!(sequence = ticket.sequence, "Discarding superseded fetch result");
        }
        committed
    }

    /// Record a failed fetch; the held collection stays as it was
    ///
    /// Returns `false` when the ticket is stale.
    pub fn fail(&self, ticket: FetchTicket, error: &DeskError) -> bool {
        let recorded = self.tx.send_if_modified(|state| {
            if !self.is_current(ticket) {
                return false;
            }
            state.status = ViewStatus::Failed(error.to_string());
            true
        });

        if !recorded {
            tracing::debug!(sequence = ticket.sequence, "Discarding superseded fetch failure");
        }
        recorded
    }

    /// Give up on a fetch without a result (cancellation)
    ///
    /// The status returns to what it was before the fetch started.
    pub fn abandon(&self, ticket: FetchTicket) {
        self.tx.send_if_modified(|state| {
            if !self.is_current(ticket) {
                return false;
            }
            state.status = if state.committed_sequence > 0 {
                ViewStatus::Ready
            } else {
                ViewStatus::Idle
            };
            true
        });
    }

    /// Replace the criteria; a real change re-filters and returns to page 1
    pub fn set_criteria(&self, criteria: FilterCriteria) {
        self.tx.send_if_modified(|state| {
            if state.criteria == criteria {
                return false;
            }
            state.criteria = criteria;
            self.reproject(state);
            true
        });
    }

    /// Merge an accepted update into the held course
    ///
    /// Returns the updated course, or `None` when it is not held. Orders keep
    /// the course they embedded when fetched.
    pub fn update_course(&self, course_id: &CourseId, update: &CourseUpdate) -> Option<Course> {
        let mut updated = None;
        self.tx.send_if_modified(|state| {
            let Some(index) = state.courses.iter().position(|c| &c.id == course_id) else {
                return false;
            };
            let mut courses = state.courses.as_ref().clone();
            courses[index].apply(update);
            updated = Some(courses[index].clone());
            state.courses = Arc::new(courses);
            true
        });
        updated
    }

    /// Drop a deleted course from the held list
    ///
    /// Returns the removed course, or `None` when it is not held.
    pub fn remove_course(&self, course_id: &CourseId) -> Option<Course> {
        let mut removed = None;
        self.tx.send_if_modified(|state| {
            let Some(index) = state.courses.iter().position(|c| &c.id == course_id) else {
                return false;
            };
            let mut courses = state.courses.as_ref().clone();
            removed = Some(courses.remove(index));
            state.courses = Arc::new(courses);
            true
        });
        removed
    }

    /// Change the page size and return to page 1
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Validation`] for a page size of zero.
    pub fn set_page_size(&self, page_size: usize) -> Result<()> {
        if page_size == 0 {
            return Err(DeskError::Validation("page size must be > 0".to_string()));
        }
        self.tx.send_modify(|state| state.window.set_page_size(page_size));
        Ok(())
    }

    /// Navigate; pages outside `[1, total_pages]` are ignored
    pub fn go_to_page(&self, page_number: usize) -> bool {
        self.tx
            .send_if_modified(|state| state.window.go_to(page_number))
    }

    /// How many times the filter has run, for diagnostics
    pub fn projection_recomputations(&self) -> u64 {
        self.lock_projection().recomputations()
    }

    fn reproject(&self, state: &mut ViewState) {
        state.revision += 1;
        let filtered = self
            .lock_projection()
            .project(&state.orders, &state.criteria);
        state.window.reset(filtered.len());
        state.filtered = filtered;
    }

    fn lock_projection(&self) -> std::sync::MutexGuard<'_, Projection> {
        self.projection
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
