//! Fixed card template
//!
//! Offsets are measured down from the top edge of the card. Text is never
//! wrapped or shrunk; an over-long name simply runs past the card edge.

use super::{Rect, INCH};
use crate::render::CardCanvas;
use mealcard_common::config::InstitutionConfig;
use mealcard_common::StudentRecord;

const HEADER_BASELINE: f32 = 0.3 * INCH;
const HEADER_FONT_SIZE: f32 = 14.0;

const LOGO_SIZE: f32 = 0.4 * INCH;
const LOGO_RIGHT_INSET: f32 = 0.5 * INCH;
const LOGO_TOP_INSET: f32 = 0.45 * INCH;

const BAND_INSET_X: f32 = 0.1 * INCH;
const BAND_BOTTOM: f32 = 0.8 * INCH;
const BAND_HEIGHT: f32 = 0.35 * INCH;
const BAND_BASELINE: f32 = 0.67 * INCH;
const BAND_FONT_SIZE: f32 = 10.0;
/// Light grey band fill (211/255)
pub const BAND_GRAY: f32 = 0.827;

const DETAILS_BASELINE: f32 = 1.0 * INCH;
const DETAILS_STEP: f32 = 0.3 * INCH;
const DETAILS_FONT_SIZE: f32 = 12.0;

/// Institution text and artwork common to every card
#[derive(Debug, Clone, PartialEq)]
pub struct CardTemplate {
    pub institution_name: String,
    pub label: String,
    /// Ask the canvas to draw the institution mark
    pub show_logo: bool,
}

impl Default for CardTemplate {
    fn default() -> Self {
        Self::from_config(&InstitutionConfig::default())
    }
}

impl CardTemplate {
    pub fn from_config(config: &InstitutionConfig) -> Self {
        Self {
            institution_name: config.name.clone(),
            label: config.label.clone(),
            show_logo: config.logo.is_some(),
        }
    }

    /// The four detail lines, top to bottom
    pub fn detail_lines(student: &StudentRecord, validity: &str) -> [String; 4] {
        [
            format!("NAME: {}", student.name),
            format!("ADMNO: {}", student.admission_number),
            format!("GRADE: {} {}", student.grade, student.stream),
            format!("VALIDITY: {}", validity),
        ]
    }

    /// Draw one card inside `card`
    pub fn draw<C>(&self, canvas: &mut C, card: Rect, student: &StudentRecord, validity: &str)
    where
        C: CardCanvas + ?Sized,
    {
        let centre_x = card.x + card.width / 2.0;
        let top = card.y + card.height;

        canvas.stroke_rect(card);

        canvas.centred_text(
            centre_x,
            top - HEADER_BASELINE,
            HEADER_FONT_SIZE,
            &self.institution_name,
        );

        if self.show_logo {
            canvas.draw_logo(Rect::new(
                card.x + card.width - LOGO_RIGHT_INSET,
                top - LOGO_TOP_INSET,
                LOGO_SIZE,
                LOGO_SIZE,
            ));
        }

        canvas.fill_rect(
            Rect::new(
                card.x + BAND_INSET_X,
                top - BAND_BOTTOM,
                card.width - 2.0 * BAND_INSET_X,
                BAND_HEIGHT,
            ),
            BAND_GRAY,
        );
        canvas.centred_text(centre_x, top - BAND_BASELINE, BAND_FONT_SIZE, &self.label);

        for (line, text) in Self::detail_lines(student, validity).iter().enumerate() {
            let baseline = top - DETAILS_BASELINE - line as f32 * DETAILS_STEP;
            canvas.centred_text(centre_x, baseline, DETAILS_FONT_SIZE, text);
        }
    }
}
