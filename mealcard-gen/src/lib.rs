//! mealcard-gen library - incremental meal card generation
//!
//! Reads student rosters, remembers which students already have a card, and
//! lays out printable cards for the new ones only.

pub mod config;
pub mod error;
pub mod layout;
pub mod render;
pub mod roster;
pub mod selector;

pub use config::{CliOverrides, GeneratorSettings};
pub use error::{GenerateError, RenderError, Result};
pub use layout::{CardGeometry, CardLayout, CardTemplate, RenderSummary};
pub use render::{CardCanvas, CardRenderer, PdfRenderer};
pub use roster::{RosterEntry, RosterLoader};
pub use selector::{generate_cards, run_generation, store_status, GenerateRequest, RunOutcome};
