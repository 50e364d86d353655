//! PDF output through printpdf

use super::metrics::helvetica_bold_width;
use super::{CardCanvas, CardRenderer};
use crate::error::{GenerateError, RenderError, Result};
use crate::layout::{CardLayout, Rect, RenderSummary};
use mealcard_common::StudentRecord;
use printpdf::image_crate::{self, DynamicImage, GenericImageView};
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, Greyscale, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerIndex, PdfLayerReference, PdfPageIndex,
};
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const LAYER_NAME: &str = "Cards";
const LOGO_DPI: f32 = 300.0;
const OUTLINE_THICKNESS: f32 = 1.0;

fn mm(points: f32) -> Mm {
    Mm(points * 25.4 / 72.0)
}

fn gray(level: f32) -> Color {
    Color::Greyscale(Greyscale::new(level, None))
}

/// Load the institution mark from disk
pub fn load_logo(path: &Path) -> std::result::Result<DynamicImage, RenderError> {
    image_crate::open(path).map_err(|source| RenderError::Logo {
        path: path.to_path_buf(),
        source,
    })
}

/// Drawing surface writing US-Letter pages into a printpdf document
pub struct PdfCanvas {
    doc: PdfDocumentReference,
    font: IndirectFontRef,
    first_page: Option<(PdfPageIndex, PdfLayerIndex)>,
    layer: Option<PdfLayerReference>,
    page_width: f32,
    page_height: f32,
    logo: Option<DynamicImage>,
    pages: usize,
}

impl PdfCanvas {
    pub fn new(
        title: &str,
        page_width: f32,
        page_height: f32,
        logo: Option<DynamicImage>,
    ) -> std::result::Result<Self, RenderError> {
        let (doc, page, layer) =
            PdfDocument::new(title, mm(page_width), mm(page_height), LAYER_NAME);
        let font = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

        Ok(Self {
            doc,
            font,
            first_page: Some((page, layer)),
            layer: None,
            page_width,
            page_height,
            logo,
            pages: 0,
        })
    }

    pub fn page_count(&self) -> usize {
        self.pages
    }

    fn current_layer(&mut self) -> PdfLayerReference {
        match &self.layer {
            Some(layer) => layer.clone(),
            None => self.open_page(),
        }
    }

    fn open_page(&mut self) -> PdfLayerReference {
        let (width, height) = (mm(self.page_width), mm(self.page_height));
        let (page, layer) = match self.first_page.take() {
            Some(first) => first,
            None => self.doc.add_page(width, height, LAYER_NAME),
        };

        let layer = self.doc.get_page(page).get_layer(layer);
        layer.set_outline_color(gray(0.0));
        layer.set_outline_thickness(OUTLINE_THICKNESS);
        layer.set_fill_color(gray(0.0));

        self.layer = Some(layer.clone());
        self.pages += 1;
        layer
    }

    /// Write the document to `path`
    ///
    /// Bytes go to `<path>.partial` first and are renamed into place once
    /// flushed, so `path` only ever holds a complete document.
    pub fn save(self, path: &Path) -> std::result::Result<(), RenderError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let partial = partial_path(path);
        if let Err(e) = write_document(self.doc, &partial) {
            let _ = std::fs::remove_file(&partial);
            return Err(e);
        }

        std::fs::rename(&partial, path).map_err(|e| {
            let _ = std::fs::remove_file(&partial);
            RenderError::Io(e)
        })
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".partial");
    PathBuf::from(name)
}

fn write_document(doc: PdfDocumentReference, path: &Path) -> std::result::Result<(), RenderError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    doc.save(&mut writer)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

impl CardCanvas for PdfCanvas {
    fn begin_page(&mut self) {
        self.open_page();
    }

    fn stroke_rect(&mut self, rect: Rect) {
        let layer = self.current_layer();
        layer.add_rect(pdf_rect(rect).with_mode(PaintMode::Stroke));
    }

    fn fill_rect(&mut self, rect: Rect, level: f32) {
        let layer = self.current_layer();
        layer.set_fill_color(gray(level));
        layer.add_rect(pdf_rect(rect).with_mode(PaintMode::Fill));
        layer.set_fill_color(gray(0.0));
    }

    fn centred_text(&mut self, centre_x: f32, baseline: f32, font_size: f32, text: &str) {
        let layer = self.current_layer();
        let x = centre_x - helvetica_bold_width(text, font_size) / 2.0;
        layer.use_text(text, font_size, mm(x), mm(baseline), &self.font);
    }

    fn draw_logo(&mut self, rect: Rect) {
        let layer = self.current_layer();
        let Some(logo) = &self.logo else {
            return;
        };

        let (px_width, px_height) = logo.dimensions();
        if px_width == 0 || px_height == 0 {
            return;
        }

        // Natural size at LOGO_DPI, then stretched to the target box
        let natural_width = px_width as f32 / LOGO_DPI * 72.0;
        let natural_height = px_height as f32 / LOGO_DPI * 72.0;

        Image::from_dynamic_image(logo).add_to_layer(
            layer,
            ImageTransform {
                translate_x: Some(mm(rect.x)),
                translate_y: Some(mm(rect.y)),
                scale_x: Some(rect.width / natural_width),
                scale_y: Some(rect.height / natural_height),
                dpi: Some(LOGO_DPI),
                ..Default::default()
            },
        );
    }
}

fn pdf_rect(rect: Rect) -> printpdf::Rect {
    printpdf::Rect::new(
        mm(rect.x),
        mm(rect.y),
        mm(rect.x + rect.width),
        mm(rect.y + rect.height),
    )
}

/// Production renderer: lays out the cards and writes a PDF
pub struct PdfRenderer {
    layout: CardLayout,
    logo: Option<PathBuf>,
    title: String,
}

impl PdfRenderer {
    pub fn new(layout: CardLayout, logo: Option<PathBuf>) -> Self {
        Self {
            layout,
            logo,
            title: "Meal cards".to_string(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

impl CardRenderer for PdfRenderer {
    fn render(
        &self,
        records: &[StudentRecord],
        validity: &str,
        output: &Path,
    ) -> Result<RenderSummary> {
        if records.is_empty() {
            warn!("No records to render; skipping {}", output.display());
            return Err(GenerateError::render(output, RenderError::NoRecords));
        }

        let logo = self
            .logo
            .as_deref()
            .map(load_logo)
            .transpose()
            .map_err(|e| GenerateError::render(output, e))?;

        let geometry = self.layout.geometry();
        let (width, height) = (geometry.page_width, geometry.page_height);
        let mut canvas = PdfCanvas::new(&self.title, width, height, logo)
            .map_err(|e| GenerateError::render(output, e))?;

        let summary = self.layout.render(records, validity, &mut canvas);
        debug!(
            "Laid out {} card(s) on {} page(s)",
            summary.cards,
            canvas.page_count()
        );

        canvas
            .save(output)
            .map_err(|e| GenerateError::render(output, e))?;

        info!(
            "Wrote {} card(s) on {} page(s) to {}",
            summary.cards,
            summary.pages,
            output.display()
        );
        Ok(summary)
    }
}
