//! Shared test fixtures: roster files, a recording canvas, scripted renderers

#![allow(dead_code)]

use mealcard_common::StudentRecord;
use mealcard_gen::layout::{CardLayout, Rect, RenderSummary};
use mealcard_gen::{CardCanvas, CardRenderer, GenerateError, RenderError};
use std::cell::RefCell;
use std::path::{Path, PathBuf};

pub const HEADER: &str = "NAME,ADMNO,GRADE,STREAM";

/// Write a CSV roster with the standard header and return its path
pub fn write_roster(dir: &Path, file_name: &str, rows: &[&str]) -> PathBuf {
    let path = dir.join(file_name);
    let mut content = String::from(HEADER);
    for row in rows {
        content.push('\n');
        content.push_str(row);
    }
    content.push('\n');
    std::fs::write(&path, content).unwrap();
    path
}

/// One captured drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    BeginPage,
    StrokeRect(Rect),
    FillRect(Rect, f32),
    Text {
        centre_x: f32,
        baseline: f32,
        size: f32,
        text: String,
    },
    Logo(Rect),
}

/// Canvas that records every call instead of drawing
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub calls: Vec<DrawCall>,
}

impl RecordingCanvas {
    pub fn pages(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| **c == DrawCall::BeginPage)
            .count()
    }

    /// Card borders, in drawing order
    pub fn borders(&self) -> Vec<Rect> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::StrokeRect(r) => Some(*r),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Border count on each page
    pub fn cards_per_page(&self) -> Vec<usize> {
        let mut pages = Vec::new();
        for call in &self.calls {
            match call {
                DrawCall::BeginPage => pages.push(0),
                DrawCall::StrokeRect(_) => {
                    if let Some(last) = pages.last_mut() {
                        *last += 1;
                    }
                }
                _ => {}
            }
        }
        pages
    }
}

impl CardCanvas for RecordingCanvas {
    fn begin_page(&mut self) {
        self.calls.push(DrawCall::BeginPage);
    }

    fn stroke_rect(&mut self, rect: Rect) {
        self.calls.push(DrawCall::StrokeRect(rect));
    }

    fn fill_rect(&mut self, rect: Rect, gray: f32) {
        self.calls.push(DrawCall::FillRect(rect, gray));
    }

    fn centred_text(&mut self, centre_x: f32, baseline: f32, font_size: f32, text: &str) {
        self.calls.push(DrawCall::Text {
            centre_x,
            baseline,
            size: font_size,
            text: text.to_string(),
        });
    }

    fn draw_logo(&mut self, rect: Rect) {
        self.calls.push(DrawCall::Logo(rect));
    }
}

/// Renderer that lays cards out on a [`RecordingCanvas`] and writes a marker file
pub struct RecordingRenderer {
    layout: CardLayout,
    pub batches: RefCell<Vec<Vec<String>>>,
}

impl RecordingRenderer {
    pub fn new(layout: CardLayout) -> Self {
        Self {
            layout,
            batches: RefCell::new(Vec::new()),
        }
    }

    pub fn rendered(&self) -> Vec<Vec<String>> {
        self.batches.borrow().clone()
    }
}

impl CardRenderer for RecordingRenderer {
    fn render(
        &self,
        records: &[StudentRecord],
        validity: &str,
        output: &Path,
    ) -> mealcard_gen::Result<RenderSummary> {
        let mut canvas = RecordingCanvas::default();
        let summary = self.layout.render(records, validity, &mut canvas);

        std::fs::write(output, canvas.texts().join("\n")).map_err(|e| GenerateError::Render {
            path: output.to_path_buf(),
            source: RenderError::Io(e),
        })?;

        let ids = records
            .iter()
            .map(|r| r.admission_number.clone())
            .collect();
        self.batches.borrow_mut().push(ids);
        Ok(summary)
    }
}

/// Renderer that always fails without writing anything
pub struct FailingRenderer;

impl CardRenderer for FailingRenderer {
    fn render(
        &self,
        _records: &[StudentRecord],
        _validity: &str,
        output: &Path,
    ) -> mealcard_gen::Result<RenderSummary> {
        Err(GenerateError::Render {
            path: output.to_path_buf(),
            source: RenderError::Io(std::io::Error::other("disk full")),
        })
    }
}
