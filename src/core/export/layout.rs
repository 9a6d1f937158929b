//! Page breaking for snapshot documents
//!
//! The bitmap is scaled to the page width and never cut. Page 1 shows it at
//! offset 0; every further page shows the same image shifted up by one more
//! page height. Pages are added while the remaining height is non-negative,
//! so an image exactly one page tall still gets a (blank) second page.

use crate::domain::{DeskError, Result};
use std::fmt;
use std::str::FromStr;

/// Portrait page formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageFormat {
    /// 210 × 297 mm
    #[default]
    A4,
    /// 8.5 × 11 in
    Letter,
}

impl PageFormat {
    /// `(width, height)` in millimetres
    pub fn size_mm(&self) -> (f64, f64) {
        match self {
            PageFormat::A4 => (210.0, 297.0),
            PageFormat::Letter => (215.9, 279.4),
        }
    }
}

impl FromStr for PageFormat {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(PageFormat::A4),
            "letter" => Ok(PageFormat::Letter),
            other => Err(DeskError::Validation(format!(
                "Unknown page format '{other}'. Must be one of: a4, letter"
            ))),
        }
    }
}

impl fmt::Display for PageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageFormat::A4 => f.write_str("a4"),
            PageFormat::Letter => f.write_str("letter"),
        }
    }
}

/// Where the image goes on each page, all lengths in millimetres
#[derive(Debug, Clone, PartialEq)]
pub struct PagePlan {
    pub page_width: f64,
    pub page_height: f64,
    pub image_width: f64,
    pub image_height: f64,
    /// Top edge of the image on each page, measured down from the page top.
    /// Zero for page 1, negative afterwards.
    pub offsets: Vec<f64>,
}

impl PagePlan {
    pub fn page_count(&self) -> usize {
        self.offsets.len()
    }
}

/// Plan the pages for a `bitmap_width × bitmap_height` image
///
/// # Errors
///
/// Returns [`DeskError::Export`] if either dimension is zero.
pub fn plan_pages(bitmap_width: u32, bitmap_height: u32, format: PageFormat) -> Result<PagePlan> {
    if bitmap_width == 0 || bitmap_height == 0 {
        return Err(DeskError::Export(format!(
            "cannot lay out a {bitmap_width}x{bitmap_height} image"
        )));
    }

    let (page_width, page_height) = format.size_mm();
    let image_width = page_width;
    let image_height = bitmap_height as f64 * page_width / bitmap_width as f64;

    let mut offsets = vec![0.0];
    let mut height_left = image_height - page_height;
    while height_left >= 0.0 {
        offsets.push(height_left - image_height);
        height_left -= page_height;
    }

    Ok(PagePlan {
        page_width,
        page_height,
        image_width,
        image_height,
        offsets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Bitmap whose scaled height is `ratio` page heights on A4
    fn plan_for_ratio(ratio: f64) -> PagePlan {
        let width = 2100u32;
        let height = (2970.0 * ratio).round() as u32;
        plan_pages(width, height, PageFormat::A4).unwrap()
    }

    #[test]
    fn test_short_image_single_page() {
        let plan = plan_for_ratio(0.4);
        assert_eq!(plan.page_count(), 1);
        assert_eq!(plan.offsets, vec![0.0]);
    }

    #[test]
    fn test_two_point_three_pages_yields_three() {
        let plan = plan_for_ratio(2.3);
        assert_eq!(plan.page_count(), 3);
        assert!((plan.image_height - 683.1).abs() < 1e-9);
        assert!((plan.offsets[1] + 297.0).abs() < 1e-9);
        assert!((plan.offsets[2] + 594.0).abs() < 1e-9);
    }

    #[test]
    fn test_exact_page_height_adds_trailing_page() {
        let plan = plan_for_ratio(1.0);
        assert_eq!(plan.page_count(), 2);
        assert!((plan.offsets[1] + 297.0).abs() < 1e-9);
    }

    #[test]
    fn test_image_scaled_to_page_width() {
        let plan = plan_pages(1000, 500, PageFormat::Letter).unwrap();
        assert_eq!(plan.image_width, 215.9);
        assert!((plan.image_height - 107.95).abs() < 1e-9);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(plan_pages(0, 10, PageFormat::A4).is_err());
        assert!(plan_pages(10, 0, PageFormat::A4).is_err());
    }

    #[test]
    fn test_page_format_parse() {
        assert_eq!("A4".parse::<PageFormat>().unwrap(), PageFormat::A4);
        assert_eq!("letter".parse::<PageFormat>().unwrap(), PageFormat::Letter);
        assert!("a3".parse::<PageFormat>().is_err());
    }
}
