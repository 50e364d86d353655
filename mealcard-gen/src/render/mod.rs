//! Rendering surfaces
//!
//! [`CardCanvas`] is the drawing surface the layout engine talks to;
//! [`CardRenderer`] turns a batch of records into a finished document file.

pub mod metrics;
pub mod pdf;

pub use pdf::{PdfCanvas, PdfRenderer};

use crate::error::Result;
use crate::layout::{Rect, RenderSummary};
use mealcard_common::StudentRecord;
use std::path::Path;

/// Absolute-coordinate drawing surface, in points from the bottom-left corner
pub trait CardCanvas {
    /// Start a new page; drawing goes to the newest page
    fn begin_page(&mut self);

    /// Outline a rectangle in black
    fn stroke_rect(&mut self, rect: Rect);

    /// Fill a rectangle with a grey level (0.0 black, 1.0 white)
    fn fill_rect(&mut self, rect: Rect, gray: f32);

    /// Draw bold text horizontally centred on `centre_x`
    fn centred_text(&mut self, centre_x: f32, baseline: f32, font_size: f32, text: &str);

    /// Draw the institution mark scaled into `rect`
    fn draw_logo(&mut self, rect: Rect);
}

/// Produces a card document for a batch of records
pub trait CardRenderer {
    /// Write one card per record to `output`
    ///
    /// Returning `Ok` means the document is completely written at `output`.
    fn render(
        &self,
        records: &[StudentRecord],
        validity: &str,
        output: &Path,
    ) -> Result<RenderSummary>;
}
