//! Minimal PDF 1.4 writer for image snapshots
//!
//! Supports exactly what a snapshot needs: portrait pages of one size, one
//! shared raster image, and any number of placements of that image per page.
//! The image is written once and referenced from every page.
//!
//! Pixel data is run-length encoded (`/RunLengthDecode`). When the bitmap has
//! at most 256 distinct colours it is stored as an indexed image, which turns
//! flat colour bands into long byte runs.

use super::raster::Bitmap;
use crate::domain::{DeskError, Result};
use std::collections::HashMap;
use std::fmt::Write as _;

const MM_TO_PT: f64 = 72.0 / 25.4;
const IMAGE_NAME: &str = "Im0";

/// Image placement in millimetres, origin at the page's top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
struct Placement {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

/// PDF document under construction
#[derive(Debug, Clone)]
pub struct PdfDocument {
    page_width_mm: f64,
    page_height_mm: f64,
    image: Option<EncodedImage>,
    pages: Vec<Vec<Placement>>,
}

impl PdfDocument {
    /// New document with a single empty page
    pub fn new(page_width_mm: f64, page_height_mm: f64) -> Self {
        Self {
            page_width_mm,
            page_height_mm,
            image: None,
            pages: vec![Vec::new()],
        }
    }

    /// Set the image every placement refers to
    pub fn set_image(&mut self, bitmap: &Bitmap) {
        self.image = Some(EncodedImage::encode(bitmap));
    }

    /// Append an empty page and make it current
    pub fn add_page(&mut self) {
        self.pages.push(Vec::new());
    }

    /// Place the image on the current page
    ///
    /// `y` is measured down from the top of the page and may be negative,
    /// which shifts the image up past the top edge.
    pub fn place_image(&mut self, x: f64, y: f64, width: f64, height: f64) {
        if let Some(page) = self.pages.last_mut() {
            page.push(Placement {
                x,
                y,
                width,
                height,
            });
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Serialize the document
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Export`] if an image is placed but none was set.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let has_placements = self.pages.iter().any(|p| !p.is_empty());
        if has_placements && self.image.is_none() {
            return Err(DeskError::Export(
                "document places an image but none was set".to_string(),
            ));
        }

        let mut writer = ObjectWriter::new();
        let page_count = self.pages.len();

        // Object numbers: 1 catalog, 2 page tree, 3 image, then page/content pairs
        let page_id = |i: usize| 4 + 2 * i;
        let content_id = |i: usize| 5 + 2 * i;

        writer.object(1, b"<< /Type /Catalog /Pages 2 0 R >>", None);

        let kids = (0..page_count)
            .map(|i| format!("{} 0 R", page_id(i)))
            .collect::<Vec<_>>()
            .join(" ");
        writer.object(
            2,
            format!("<< /Type /Pages /Kids [{kids}] /Count {page_count} >>").as_bytes(),
            None,
        );

        match &self.image {
            Some(image) => writer.object(
                3,
                image.dictionary().as_bytes(),
                Some(image.data.as_slice()),
            ),
            None => writer.object(3, b"null", None),
        }

        let width_pt = self.page_width_mm * MM_TO_PT;
        let height_pt = self.page_height_mm * MM_TO_PT;
        let resources = if self.image.is_some() {
            format!("/Resources << /XObject << /{IMAGE_NAME} 3 0 R >> >>")
        } else {
            "/Resources << >>".to_string()
        };

        for (i, placements) in self.pages.iter().enumerate() {
            writer.object(
                page_id(i),
                format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] {resources} /Contents {} 0 R >>",
                    num(width_pt),
                    num(height_pt),
                    content_id(i)
                )
                .as_bytes(),
                None,
            );

            let content = self.content_stream(placements);
            writer.object(
                content_id(i),
                format!("<< /Length {} >>", content.len()).as_bytes(),
                Some(content.as_bytes()),
            );
        }

        Ok(writer.finish())
    }

    /// Drawing operators for one page; converts to PDF's bottom-left origin
    fn content_stream(&self, placements: &[Placement]) -> String {
        let mut ops = String::new();
        for p in placements {
            let w = p.width * MM_TO_PT;
            let h = p.height * MM_TO_PT;
            let x = p.x * MM_TO_PT;
            let y = (self.page_height_mm - p.y - p.height) * MM_TO_PT;
            let _ = writeln!(
                ops,
                "q {} 0 0 {} {} {} cm /{IMAGE_NAME} Do Q",
                num(w),
                num(h),
                num(x),
                num(y)
            );
        }
        ops
    }
}

/// Image XObject payload
#[derive(Debug, Clone)]
struct EncodedImage {
    width: u32,
    height: u32,
    /// `/DeviceRGB`, or an `/Indexed` array with its palette
    color_space: String,
    data: Vec<u8>,
}

impl EncodedImage {
    fn encode(bitmap: &Bitmap) -> Self {
        let (color_space, samples) = match index_colors(bitmap) {
            Some((palette, indices)) => {
                let mut hex = String::with_capacity(palette.len() * 6);
                for rgb in &palette {
                    let _ = write!(hex, "{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2]);
                }
                (
                    format!("[/Indexed /DeviceRGB {} <{hex}>]", palette.len() - 1),
                    indices,
                )
            }
            None => ("/DeviceRGB".to_string(), bitmap.pixels().to_vec()),
        };

        Self {
            width: bitmap.width(),
            height: bitmap.height(),
            color_space,
            data: run_length_encode(&samples),
        }
    }

    fn dictionary(&self) -> String {
        format!(
            "<< /Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace {} \
             /BitsPerComponent 8 /Filter /RunLengthDecode /Length {} >>",
            self.width,
            self.height,
            self.color_space,
            self.data.len()
        )
    }
}

/// Palette and per-pixel indices, or `None` past 256 colours
fn index_colors(bitmap: &Bitmap) -> Option<(Vec<[u8; 3]>, Vec<u8>)> {
    let mut palette: Vec<[u8; 3]> = Vec::new();
    let mut lookup: HashMap<[u8; 3], u8> = HashMap::new();
    let mut indices = Vec::with_capacity(bitmap.pixels().len() / 3);

    for px in bitmap.pixels().chunks_exact(3) {
        let rgb = [px[0], px[1], px[2]];
        let index = match lookup.get(&rgb) {
            Some(index) => *index,
            None => {
                if palette.len() == 256 {
                    return None;
                }
                let index = palette.len() as u8;
                palette.push(rgb);
                lookup.insert(rgb, index);
                index
            }
        };
        indices.push(index);
    }

    Some((palette, indices))
}

/// PDF `RunLengthDecode` encoding
///
/// Length byte 0..=127 copies the next `n + 1` bytes; 129..=255 repeats the
/// next byte `257 - n` times; 128 ends the data.
pub(crate) fn run_length_encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() / 2 + 2);
    let mut i = 0;

    while i < data.len() {
        let mut run = 1;
        while i + run < data.len() && run < 128 && data[i + run] == data[i] {
            run += 1;
        }

        if run >= 2 {
            out.push((257 - run) as u8);
            out.push(data[i]);
            i += run;
            continue;
        }

        let start = i;
        let mut len = 0;
        while i < data.len() && len < 128 {
            if i + 1 < data.len() && data[i] == data[i + 1] {
                break;
            }
            i += 1;
            len += 1;
        }
        out.push((len - 1) as u8);
        out.extend_from_slice(&data[start..start + len]);
    }

    out.push(128);
    out
}

/// Trims trailing zeros so the output stays short and deterministic
fn num(value: f64) -> String {
    let s = format!("{value:.4}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" || s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Appends numbered objects and builds the cross-reference table
struct ObjectWriter {
    out: Vec<u8>,
    offsets: Vec<(usize, usize)>,
}

impl ObjectWriter {
    fn new() -> Self {
        let mut out = Vec::new();
        out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
        Self {
            out,
            offsets: Vec::new(),
        }
    }

    fn object(&mut self, id: usize, dictionary: &[u8], stream: Option<&[u8]>) {
        self.offsets.push((id, self.out.len()));
        self.out.extend_from_slice(format!("{id} 0 obj\n").as_bytes());
        self.out.extend_from_slice(dictionary);
        if let Some(stream) = stream {
            self.out.extend_from_slice(b"\nstream\n");
            self.out.extend_from_slice(stream);
            self.out.extend_from_slice(b"\nendstream");
        }
        self.out.extend_from_slice(b"\nendobj\n");
    }

    fn finish(mut self) -> Vec<u8> {
        self.offsets.sort_by_key(|(id, _)| *id);
        let size = self.offsets.len() + 1;
        let xref_offset = self.out.len();

        let mut xref = format!("xref\n0 {size}\n0000000000 65535 f \n");
        for (_, offset) in &self.offsets {
            let _ = write!(xref, "{offset:010} 00000 n \n");
        }
        let _ = write!(
            xref,
            "trailer\n<< /Size {size} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n"
        );
        self.out.extend_from_slice(xref.as_bytes());
        self.out
    }
}
