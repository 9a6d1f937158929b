//! View rasterization
//!
//! A [`ViewRegion`] is the rendered order table as a stack of bands: one
//! header band and one band per visible order, each band split into columns.
//! A [`Rasterizer`] turns a region into an RGB [`Bitmap`] at a supersampling
//! scale. Real DOM rendering is an external collaborator behind the trait;
//! [`RowBandRasterizer`] draws band fills, dividers and greeked cell text,
//! which is enough to produce a faithful page layout for the snapshot.

use crate::domain::{DeskError, Order, Result, NO_DATA};
use async_trait::async_trait;

/// Supersampling factor applied when rasterizing a snapshot
pub const SNAPSHOT_SCALE: f32 = 2.0;

/// Largest bitmap a rasterizer will allocate (RGB bytes)
const MAX_BITMAP_BYTES: u64 = 512 * 1024 * 1024;

const WHITE: [u8; 3] = [0xff, 0xff, 0xff];
const DIVIDER: [u8; 3] = [0xd1, 0xd5, 0xdb];
const HEADER_FILL: [u8; 3] = [0xf3, 0xf4, 0xf6];
const HEADER_INK: [u8; 3] = [0x11, 0x18, 0x27];
const ROW_INK: [u8; 3] = [0x37, 0x41, 0x51];

const REGION_WIDTH: u32 = 960;
const HEADER_HEIGHT: u32 = 40;
const ROW_HEIGHT: u32 = 32;
const COLUMNS: [(&str, u32); 7] = [
    ("Invoice", 110),
    ("Client", 190),
    ("Phone", 140),
    ("Course", 170),
    ("Amount", 130),
    ("Status", 110),
    ("Created", 110),
];

/// Packed 8-bit RGB image, rows top to bottom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Bitmap {
    /// Wrap raw RGB pixels
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Export`] if a dimension is zero or the buffer
    /// length is not `width * height * 3`.
    pub fn from_rgb(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(DeskError::Export(format!(
                "bitmap has a zero dimension ({width}x{height})"
            )));
        }
        let expected = width as usize * height as usize * 3;
        if pixels.len() != expected {
            return Err(DeskError::Export(format!(
                "bitmap buffer is {} bytes, expected {expected}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Single-colour bitmap
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * 3);
        for _ in 0..count {
            pixels.extend_from_slice(&rgb);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Colour at `(x, y)`, `None` outside the bitmap
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]])
    }

    /// Fill a rectangle, clipped to the bitmap
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, rgb: [u8; 3]) {
        let x_end = x.saturating_add(w).min(self.width);
        let y_end = y.saturating_add(h).min(self.height);
        for row in y..y_end {
            let base = row as usize * self.width as usize;
            for col in x..x_end {
                let i = (base + col as usize) * 3;
                self.pixels[i..i + 3].copy_from_slice(&rgb);
            }
        }
    }
}

/// One horizontal band of the view
#[derive(Debug, Clone, PartialEq)]
pub struct RegionRow {
    /// Band height in CSS pixels
    pub height: u32,
    pub fill: [u8; 3],
    pub ink: [u8; 3],
    pub cells: Vec<String>,
}

/// The part of the view being snapshotted, in CSS pixels
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewRegion {
    width: u32,
    columns: Vec<u32>,
    rows: Vec<RegionRow>,
}

impl ViewRegion {
    /// Empty region with the given width and column widths
    pub fn new(width: u32, columns: Vec<u32>) -> Self {
        Self {
            width,
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: RegionRow) {
        self.rows.push(row);
    }

    /// The order table for `orders`: a header band, then one band per order
    /// tinted with its status badge colour
    pub fn from_orders(orders: &[Order], currency: &str) -> Self {
        let mut region = Self::new(REGION_WIDTH, COLUMNS.iter().map(|(_, w)| *w).collect());

        region.push_row(RegionRow {
            height: HEADER_HEIGHT,
            fill: HEADER_FILL,
            ink: HEADER_INK,
            cells: COLUMNS.iter().map(|(title, _)| title.to_string()).collect(),
        });

        for order in orders {
            region.push_row(RegionRow {
                height: ROW_HEIGHT,
                fill: order.status.badge().tone.rgb(),
                ink: ROW_INK,
                cells: order_cells(order, currency),
            });
        }

        region
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Total height in CSS pixels
    pub fn height(&self) -> u32 {
        self.rows.iter().map(|r| r.height).sum()
    }

    pub fn columns(&self) -> &[u32] {
        &self.columns
    }

    pub fn rows(&self) -> &[RegionRow] {
        &self.rows
    }

    /// Nothing to draw: no width, or no bands
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.rows.is_empty() || self.height() == 0
    }
}

fn order_cells(order: &Order, currency: &str) -> Vec<String> {
    let or_no_data = |s: &str| {
        if s.trim().is_empty() {
            NO_DATA.to_string()
        } else {
            s.to_string()
        }
    };

    vec![
        order.invoice_label(),
        or_no_data(&order.client_name),
        or_no_data(&order.client_phone),
        or_no_data(order.course_title().unwrap_or_default()),
        order.formatted_amount(currency),
        order.status.badge().label.to_string(),
        order
            .created_at
            .map(|t| t.format("%d.%m.%Y").to_string())
            .unwrap_or_else(|| NO_DATA.to_string()),
    ]
}

/// Turns a view region into pixels
#[async_trait]
pub trait Rasterizer: Send + Sync {
    /// Rasterize `region` at `scale` device pixels per CSS pixel
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Export`] for an empty region or an unusable scale.
    async fn rasterize(&self, region: &ViewRegion, scale: f32) -> Result<Bitmap>;
}

/// Draws band fills, dividers and greeked text blocks
#[derive(Debug, Clone, Copy, Default)]
pub struct RowBandRasterizer;

impl RowBandRasterizer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Rasterizer for RowBandRasterizer {
    async fn rasterize(&self, region: &ViewRegion, scale: f32) -> Result<Bitmap> {
        if region.is_empty() {
            return Err(DeskError::Export(
                "cannot rasterize an empty view region".to_string(),
            ));
        }
        if !scale.is_finite() || scale <= 0.0 {
            return Err(DeskError::Export(format!("invalid raster scale {scale}")));
        }

        let px = |css: u32| ((css as f32 * scale).round() as u32).max(1);

        let width = px(region.width());
        let height: u32 = region.rows().iter().map(|r| px(r.height)).sum();
        let bytes = width as u64 * height as u64 * 3;
        if bytes > MAX_BITMAP_BYTES {
            return Err(DeskError::Export(format!(
                "view region too large to rasterize ({width}x{height} px)"
            )));
        }

        let mut bitmap = Bitmap::filled(width, height, WHITE);
        let pad = px(8);
        let glyph = px(7);
        let divider = px(1);

        let mut y = 0u32;
        for row in region.rows() {
            let h = px(row.height);
            bitmap.fill_rect(0, y, width, h, row.fill);

            let bar_h = px(8).min(h);
            let mut x = 0u32;
            for (cell, col_width) in row.cells.iter().zip(region.columns()) {
                let cw = px(*col_width);
                let chars = cell.chars().count() as u32;
                let bar_w = glyph
                    .saturating_mul(chars)
                    .min(cw.saturating_sub(pad.saturating_mul(2)));
                if bar_w > 0 {
                    bitmap.fill_rect(x + pad, y + (h - bar_h) / 2, bar_w, bar_h, row.ink);
                }
                x = x.saturating_add(cw);
            }

            let line = divider.min(h);
            bitmap.fill_rect(0, y + h - line, width, line, DIVIDER);
            y += h;
        }

        tracing::debug!(width, height, rows = region.rows().len(), scale, "View rasterized");
        Ok(bitmap)
    }
}
