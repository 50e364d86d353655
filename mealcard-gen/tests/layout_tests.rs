//! Layout engine tests against a recording canvas

mod helpers;

use helpers::{DrawCall, RecordingCanvas};
use mealcard_common::config::InstitutionConfig;
use mealcard_common::StudentRecord;
use mealcard_gen::layout::template::BAND_GRAY;
use mealcard_gen::layout::{Rect, INCH};
use mealcard_gen::{CardGeometry, CardLayout, CardTemplate};

fn students(count: usize) -> Vec<StudentRecord> {
    (1..=count)
        .map(|i| StudentRecord::new(format!("ADM{}", i), format!("Student {}", i), "7", "E"))
        .collect()
}

fn default_layout() -> CardLayout {
    CardLayout::new(CardGeometry::default(), CardTemplate::default()).unwrap()
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 0.001
}

#[test]
fn test_seventeen_records_on_three_pages() {
    let mut canvas = RecordingCanvas::default();
    let summary = default_layout().render(&students(17), "TERM 3", &mut canvas);

    assert_eq!(summary.cards, 17);
    assert_eq!(summary.pages, 3);
    assert_eq!(canvas.pages(), 3);
    assert_eq!(canvas.cards_per_page(), vec![8, 8, 1]);
}

#[test]
fn test_no_records_draws_nothing() {
    let mut canvas = RecordingCanvas::default();
    let summary = default_layout().render(&[], "TERM 3", &mut canvas);

    assert_eq!(summary.pages, 0);
    assert!(canvas.calls.is_empty());
}

#[test]
fn test_cards_fill_rows_left_to_right_then_down() {
    let mut canvas = RecordingCanvas::default();
    default_layout().render(&students(8), "TERM 3", &mut canvas);

    let g = CardGeometry::default();
    let borders = canvas.borders();
    assert_eq!(borders.len(), 8);

    for (i, border) in borders.iter().enumerate() {
        let column = i % 2;
        let row = i / 2;
        let x = g.margin_x + column as f32 * (g.card_width + g.spacing_x);
        let row_offset = row as f32 * (g.card_height + g.spacing_y);
        let y = g.page_height - g.margin_y - g.card_height - row_offset;
        assert!(close(border.x, x), "card {} x {} != {}", i, border.x, x);
        assert!(close(border.y, y), "card {} y {} != {}", i, border.y, y);
        assert!(close(border.width, g.card_width));
        assert!(close(border.height, g.card_height));
    }
}

#[test]
fn test_card_template_draw_calls() {
    let mut canvas = RecordingCanvas::default();
    let student = StudentRecord::new("ADM1", "Alice", "7", "E");
    default_layout().render(&[student], "25/10/2024", &mut canvas);

    let g = CardGeometry::default();
    let card = canvas.borders()[0];
    let centre = card.x + card.width / 2.0;
    let top = card.y + card.height;

    let texts: Vec<(f32, f32, f32, String)> = canvas
        .calls
        .iter()
        .filter_map(|c| match c {
            DrawCall::Text {
                centre_x,
                baseline,
                size,
                text,
            } => Some((*centre_x, *baseline, *size, text.clone())),
            _ => None,
        })
        .collect();

    let expected = [
        (0.3, 14.0, "MOI FORCES ACADEMY"),
        (0.67, 10.0, "MEAL CARD"),
        (1.0, 12.0, "NAME: Alice"),
        (1.3, 12.0, "ADMNO: ADM1"),
        (1.6, 12.0, "GRADE: 7 E"),
        (1.9, 12.0, "VALIDITY: 25/10/2024"),
    ];
    assert_eq!(texts.len(), expected.len());
    let pairs = texts.iter().zip(expected);
    for ((centre_x, baseline, size, text), (offset, want_size, want_text)) in pairs {
        assert_eq!(text, want_text);
        assert_eq!(*size, want_size);
        assert!(close(*centre_x, centre));
        assert!(
            close(*baseline, top - offset * INCH),
            "{} baseline {}",
            text, baseline
        );
    }

    let band = canvas
        .calls
        .iter()
        .find_map(|c| match c {
            DrawCall::FillRect(r, gray) => Some((*r, *gray)),
            _ => None,
        })
        .unwrap();
    assert_eq!(band.1, BAND_GRAY);
    assert!(close(band.0.x, card.x + 0.1 * INCH));
    assert!(close(band.0.y, top - 0.8 * INCH));
    assert!(close(band.0.width, g.card_width - 0.2 * INCH));
    assert!(close(band.0.height, 0.35 * INCH));

    // No logo configured
    assert!(!canvas.calls.iter().any(|c| matches!(c, DrawCall::Logo(_))));
}

#[test]
fn test_logo_placed_top_right_when_configured() {
    let institution = InstitutionConfig {
        logo: Some("crest.png".into()),
        ..InstitutionConfig::default()
    };
    let template = CardTemplate::from_config(&institution);
    let layout = CardLayout::new(CardGeometry::default(), template).unwrap();

    let mut canvas = RecordingCanvas::default();
    layout.render(&students(1), "TERM 3", &mut canvas);

    let card = canvas.borders()[0];
    let logo = canvas
        .calls
        .iter()
        .find_map(|c| match c {
            DrawCall::Logo(r) => Some(*r),
            _ => None,
        })
        .unwrap();

    let expected = Rect::new(
        card.x + card.width - 0.5 * INCH,
        card.y + card.height - 0.45 * INCH,
        0.4 * INCH,
        0.4 * INCH,
    );
    assert!(close(logo.x, expected.x));
    assert!(close(logo.y, expected.y));
    assert!(close(logo.width, expected.width));
    assert!(close(logo.height, expected.height));
}

#[test]
fn test_custom_grid_three_by_two() {
    let geometry = CardGeometry {
        cards_per_row: 3,
        cards_per_column: 2,
        card_width: 2.0 * INCH,
        ..CardGeometry::default()
    };
    let layout = CardLayout::new(geometry, CardTemplate::default()).unwrap();

    let mut canvas = RecordingCanvas::default();
    let summary = layout.render(&students(7), "TERM 3", &mut canvas);

    assert_eq!(summary.pages, 2);
    assert_eq!(canvas.cards_per_page(), vec![6, 1]);

    let borders = canvas.borders();
    // Fourth card starts the second row
    assert!(close(borders[3].x, borders[0].x));
    assert!(borders[3].y < borders[0].y);
}

#[test]
fn test_long_name_is_drawn_unchanged() {
    let long_name = "Wanjiru Njeri Kamau Otieno Achieng Mwangi Chebet Wambui";
    let student = StudentRecord::new("ADM9", long_name, "8", "W");

    let mut canvas = RecordingCanvas::default();
    default_layout().render(&[student], "TERM 3", &mut canvas);

    let expected = format!("NAME: {}", long_name);
    assert!(canvas.texts().contains(&expected.as_str()));
}
