//! Card layout engine
//!
//! Places cards on a fixed grid, page by page, and draws each one through a
//! [`CardCanvas`]. All coordinates are PDF points (1/72 inch) with the origin
//! at the bottom-left corner of the page.

pub mod template;

pub use template::CardTemplate;

use crate::error::{GenerateError, Result};
use crate::render::CardCanvas;
use mealcard_common::config::LayoutConfig;
use mealcard_common::StudentRecord;
use serde::Serialize;
use tracing::{debug, warn};

/// Points per inch
pub const INCH: f32 = 72.0;

/// US Letter page width in points
pub const LETTER_WIDTH: f32 = 8.5 * INCH;

/// US Letter page height in points
pub const LETTER_HEIGHT: f32 = 11.0 * INCH;

/// Axis-aligned rectangle, bottom-left anchored
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Page and card grid dimensions, in points
#[derive(Debug, Clone, PartialEq)]
pub struct CardGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub card_width: f32,
    pub card_height: f32,
    pub margin_x: f32,
    pub margin_y: f32,
    pub spacing_x: f32,
    pub spacing_y: f32,
    pub cards_per_row: usize,
    pub cards_per_column: usize,
}

impl Default for CardGeometry {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default())
    }
}

impl CardGeometry {
    /// Letter-size geometry from the inch-based config section
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            page_width: LETTER_WIDTH,
            page_height: LETTER_HEIGHT,
            card_width: config.card_width * INCH,
            card_height: config.card_height * INCH,
            margin_x: config.margin_x * INCH,
            margin_y: config.margin_y * INCH,
            spacing_x: config.spacing_x * INCH,
            spacing_y: config.spacing_y * INCH,
            cards_per_row: config.cards_per_row,
            cards_per_column: config.cards_per_column,
        }
    }

    pub fn cards_per_page(&self) -> usize {
        self.cards_per_row * self.cards_per_column
    }

    /// Reject geometry the placement loop cannot work with
    ///
    /// A grid wider or taller than the page is allowed but logged.
    pub fn validate(&self) -> Result<()> {
        if self.cards_per_row == 0 || self.cards_per_column == 0 {
            return Err(GenerateError::Config(format!(
                "cards per row/column must be at least 1 (got {} x {})",
                self.cards_per_row, self.cards_per_column
            )));
        }

        let sizes = [
            ("page width", self.page_width),
            ("page height", self.page_height),
            ("card width", self.card_width),
            ("card height", self.card_height),
        ];
        if let Some((what, value)) = sizes.iter().find(|(_, v)| !v.is_finite() || *v <= 0.0) {
            return Err(GenerateError::Config(format!(
                "{} must be positive (got {})",
                what, value
            )));
        }

        let spacing = [
            ("margin x", self.margin_x),
            ("margin y", self.margin_y),
            ("spacing x", self.spacing_x),
            ("spacing y", self.spacing_y),
        ];
        if let Some((what, value)) = spacing.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            return Err(GenerateError::Config(format!(
                "{} must not be negative (got {})",
                what, value
            )));
        }

        let grid_width = self.margin_x
            + self.cards_per_row as f32 * self.card_width
            + (self.cards_per_row - 1) as f32 * self.spacing_x;
        let grid_height = self.margin_y
            + self.cards_per_column as f32 * self.card_height
            + (self.cards_per_column - 1) as f32 * self.spacing_y;
        if grid_width > self.page_width || grid_height > self.page_height {
            warn!(
                "Card grid {:.1}x{:.1} pt exceeds page {:.1}x{:.1} pt; cards will be clipped",
                grid_width, grid_height, self.page_width, self.page_height
            );
        }

        Ok(())
    }

    /// Cursor position of the first card on a page
    fn top_left_origin(&self) -> (f32, f32) {
        (self.margin_x, self.page_height - self.margin_y - self.card_height)
    }
}

/// One card position on a page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    /// Index into the input record sequence
    pub record_index: usize,
    /// Card bounding box
    pub bounds: Rect,
}

/// Cards placed on one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PagePlan {
    pub slots: Vec<Slot>,
}

/// Totals of a rendered document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenderSummary {
    pub cards: usize,
    pub pages: usize,
}

/// Grid layout plus the card template
#[derive(Debug, Clone)]
pub struct CardLayout {
    geometry: CardGeometry,
    template: CardTemplate,
}

impl CardLayout {
    pub fn new(geometry: CardGeometry, template: CardTemplate) -> Result<Self> {
        geometry.validate()?;
        Ok(Self { geometry, template })
    }

    pub fn geometry(&self) -> &CardGeometry {
        &self.geometry
    }

    /// Pages needed for `count` cards (no trailing empty page)
    pub fn page_count(&self, count: usize) -> usize {
        count.div_ceil(self.geometry.cards_per_page())
    }

    /// Place `count` cards, in input order
    ///
    /// The cursor moves right by one card plus spacing; every `cards_per_row`
    /// cards it returns to the left margin one row down, and every full grid
    /// starts a new page at the top-left position.
    pub fn plan(&self, count: usize) -> Vec<PagePlan> {
        let g = &self.geometry;
        let per_page = g.cards_per_page();
        let (left, top) = g.top_left_origin();

        let mut pages = Vec::with_capacity(self.page_count(count));
        let mut current = PagePlan::default();
        let (mut x, mut y) = (left, top);

        for (index, placed) in (0..count).zip(1usize..) {
            current.slots.push(Slot {
                record_index: index,
                bounds: Rect::new(x, y, g.card_width, g.card_height),
            });

            x += g.card_width + g.spacing_x;

            if placed % g.cards_per_row == 0 {
                x = left;
                y -= g.card_height + g.spacing_y;
            }

            if placed % per_page == 0 {
                pages.push(std::mem::take(&mut current));
                x = left;
                y = top;
            }
        }

        if !current.slots.is_empty() {
            pages.push(current);
        }

        pages
    }

    /// Draw every record onto `canvas`, one card per record
    pub fn render<C>(
        &self,
        records: &[StudentRecord],
        validity: &str,
        canvas: &mut C,
    ) -> RenderSummary
    where
        C: CardCanvas + ?Sized,
    {
        let pages = self.plan(records.len());

        for (page_number, page) in pages.iter().enumerate() {
            canvas.begin_page();
            for slot in &page.slots {
                self.template
                    .draw(canvas, slot.bounds, &records[slot.record_index], validity);
            }
            debug!("Page {}: {} card(s)", page_number + 1, page.slots.len());
        }

        RenderSummary {
            cards: records.len(),
            pages: pages.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> CardLayout {
        CardLayout::new(CardGeometry::default(), CardTemplate::default()).unwrap()
    }

    #[test]
    fn test_default_geometry_in_points() {
        let g = CardGeometry::default();
        assert!((g.card_width - 242.64).abs() < 0.01);
        assert!((g.card_height - 152.64).abs() < 0.01);
        assert_eq!(g.margin_x, 36.0);
        assert_eq!(g.spacing_y, 18.0);
        assert_eq!(g.page_width, 612.0);
        assert_eq!(g.page_height, 792.0);
        assert_eq!(g.cards_per_page(), 8);
    }

    #[test]
    fn test_page_count_arithmetic() {
        let layout = layout();
        assert_eq!(layout.page_count(0), 0);
        assert_eq!(layout.page_count(1), 1);
        assert_eq!(layout.page_count(8), 1);
        assert_eq!(layout.page_count(9), 2);
        assert_eq!(layout.page_count(17), 3);
    }

    #[test]
    fn test_seventeen_cards_three_pages_last_has_one() {
        let pages = layout().plan(17);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].slots.len(), 8);
        assert_eq!(pages[1].slots.len(), 8);
        assert_eq!(pages[2].slots.len(), 1);
        assert_eq!(pages[2].slots[0].record_index, 16);
    }

    #[test]
    fn test_full_page_has_no_trailing_blank_page() {
        let pages = layout().plan(16);
        assert_eq!(pages.len(), 2);
        assert!(pages.iter().all(|p| p.slots.len() == 8));
    }

    #[test]
    fn test_first_row_positions() {
        let g = CardGeometry::default();
        let pages = layout().plan(3);
        let slots = &pages[0].slots;

        let top = g.page_height - g.margin_y - g.card_height;
        assert_eq!(slots[0].bounds.x, g.margin_x);
        assert_eq!(slots[0].bounds.y, top);
        assert_eq!(slots[1].bounds.x, g.margin_x + (g.card_width + g.spacing_x));
        assert_eq!(slots[1].bounds.y, top);
        // Third card wraps to the next row
        assert_eq!(slots[2].bounds.x, g.margin_x);
        assert_eq!(slots[2].bounds.y, top - (g.card_height + g.spacing_y));
    }

    #[test]
    fn test_new_page_resets_cursor() {
        let pages = layout().plan(9);
        assert_eq!(pages[1].slots[0].bounds, pages[0].slots[0].bounds);
    }

    #[test]
    fn test_zero_cards_per_row_rejected() {
        let geometry = CardGeometry {
            cards_per_row: 0,
            ..CardGeometry::default()
        };
        let result = CardLayout::new(geometry, CardTemplate::default());
        assert!(matches!(result, Err(GenerateError::Config(_))));
    }

    #[test]
    fn test_negative_card_height_rejected() {
        let geometry = CardGeometry {
            card_height: -1.0,
            ..CardGeometry::default()
        };
        assert!(geometry.validate().is_err());
    }

    #[test]
    fn test_oversized_grid_is_only_a_warning() {
        let geometry = CardGeometry {
            cards_per_row: 5,
            ..CardGeometry::default()
        };
        assert!(geometry.validate().is_ok());
    }
}
