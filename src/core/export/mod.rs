//! Export paths
//!
//! - [`snapshot`] - client-side: rasterize the visible page, page-break it into a PDF
//! - [`raster`] - view regions, bitmaps and the [`Rasterizer`] seam
//! - [`layout`] - offset-based page breaking
//! - [`document`] - the PDF writer
//! - [`output`] - atomic file writes for every artifact
//! - [`summary`] - per-run reporting
//!
//! The server-side paths (spreadsheet, contract PDF) go through
//! [`crate::adapters::remote::BatchExportClient`].

pub mod document;
pub mod layout;
pub mod output;
pub mod raster;
pub mod snapshot;
pub mod summary;

pub use document::PdfDocument;
pub use layout::{plan_pages, PageFormat, PagePlan};
pub use output::write_document;
pub use raster::{Bitmap, Rasterizer, RegionRow, RowBandRasterizer, ViewRegion, SNAPSHOT_SCALE};
pub use snapshot::{SnapshotDocument, SnapshotExporter};
pub use summary::{ExportKind, ExportSummary};
