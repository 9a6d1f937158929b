//! Client-side snapshot export
//!
//! Rasterize the visible view, then lay the single bitmap out over as many
//! pages as its scaled height needs (see [`plan_pages`]).

use super::document::PdfDocument;
use super::layout::{plan_pages, PageFormat};
use super::raster::{Rasterizer, ViewRegion, SNAPSHOT_SCALE};
use crate::domain::Result;
use std::sync::Arc;
use std::time::Instant;

/// Serialized snapshot and its page count
#[derive(Debug, Clone)]
pub struct SnapshotDocument {
    pub bytes: Vec<u8>,
    pub pages: usize,
}

/// Produces multi-page PDF snapshots of a view region
pub struct SnapshotExporter {
    rasterizer: Arc<dyn Rasterizer>,
    format: PageFormat,
    scale: f32,
}

impl SnapshotExporter {
    /// Exporter with the standard 2× supersampling
    pub fn new(rasterizer: Arc<dyn Rasterizer>, format: PageFormat) -> Self {
        Self {
            rasterizer,
            format,
            scale: SNAPSHOT_SCALE,
        }
    }

    pub fn format(&self) -> PageFormat {
        self.format
    }

    /// Rasterize `region` and compose it into a paged document
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::DeskError::Export`] if rasterization fails
    /// (for example an empty region). Nothing is produced in that case.
    pub async fn export_snapshot(&self, region: &ViewRegion) -> Result<SnapshotDocument> {
        let start = Instant::now();

        let bitmap = self.rasterizer.rasterize(region, self.scale).await?;
        let plan = plan_pages(bitmap.width(), bitmap.height(), self.format)?;

        let mut document = PdfDocument::new(plan.page_width, plan.page_height);
        document.set_image(&bitmap);
        for (i, offset) in plan.offsets.iter().enumerate() {
            if i > 0 {
                document.add_page();
            }
            document.place_image(0.0, *offset, plan.image_width, plan.image_height);
        }

        let bytes = document.to_bytes()?;
        tracing::debug!(
            pages = plan.page_count(),
            bytes = bytes.len(),
            format = %self.format,
            duration_ms = start.elapsed().as_millis() as u64,
            "Snapshot composed"
        );

        Ok(SnapshotDocument {
            bytes,
            pages: plan.page_count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::export::raster::{Bitmap, RowBandRasterizer};
    use crate::domain::DeskError;
    use async_trait::async_trait;

    /// Returns a fixed bitmap regardless of the region
    struct FixedRasterizer(Bitmap);

    #[async_trait]
    impl Rasterizer for FixedRasterizer {
        async fn rasterize(&self, _region: &ViewRegion, _scale: f32) -> Result<Bitmap> {
            Ok(self.0.clone())
        }
    }

    struct FailingRasterizer;

    #[async_trait]
    impl Rasterizer for FailingRasterizer {
        async fn rasterize(&self, _region: &ViewRegion, _scale: f32) -> Result<Bitmap> {
            Err(DeskError::Export("region detached".to_string()))
        }
    }

    #[tokio::test]
    async fn test_tall_bitmap_spans_three_pages() {
        // 210 px wide maps 1 px to 1 mm on A4; 2.3 page heights tall
        let bitmap = Bitmap::filled(210, 683, [255, 255, 255]);
        let exporter = SnapshotExporter::new(Arc::new(FixedRasterizer(bitmap)), PageFormat::A4);

        let doc = exporter.export_snapshot(&ViewRegion::default()).await.unwrap();
        assert_eq!(doc.pages, 3);
        assert!(doc.bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_rasterizer_failure_is_surfaced() {
        let exporter = SnapshotExporter::new(Arc::new(FailingRasterizer), PageFormat::A4);
        let err = exporter
            .export_snapshot(&ViewRegion::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DeskError::Export(_)));
    }

    #[tokio::test]
    async fn test_empty_region_with_band_rasterizer_fails() {
        let exporter = SnapshotExporter::new(Arc::new(RowBandRasterizer::new()), PageFormat::A4);
        assert!(exporter
            .export_snapshot(&ViewRegion::default())
            .await
            .is_err());
    }
}
