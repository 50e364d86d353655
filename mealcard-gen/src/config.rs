//! Generator settings
//!
//! Assembled once at startup from the bootstrap TOML and command-line
//! overrides, then handed explicitly to the loader, layout engine and store.

use crate::error::Result;
use crate::layout::{CardGeometry, CardLayout, CardTemplate};
use crate::render::PdfRenderer;
use crate::roster::RosterLoader;
use chrono::{DateTime, Local};
use mealcard_common::config::{RootFolderInitializer, RootFolderResolver, TomlConfig};
use mealcard_common::time::file_stamp;
use std::path::{Path, PathBuf};

/// File name prefix of timestamp-named output documents
pub const OUTPUT_PREFIX: &str = "meal_cards_";

/// Command-line values that take priority over the TOML file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub root_folder: Option<PathBuf>,
    pub database: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub logo: Option<PathBuf>,
    /// Replaces `roster.sheets` when non-empty
    pub sheets: Vec<String>,
}

/// Everything a generation run needs
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    pub root_folder: PathBuf,
    pub database_path: PathBuf,
    pub output_dir: PathBuf,
    pub geometry: CardGeometry,
    pub template: CardTemplate,
    pub logo: Option<PathBuf>,
    pub sheets: Vec<String>,
}

impl GeneratorSettings {
    pub fn resolve(config: &TomlConfig, overrides: CliOverrides) -> Self {
        let resolver = RootFolderResolver::new(overrides.root_folder, config.root_folder.clone());
        let root_folder = resolver.resolve();

        let initializer = RootFolderInitializer::new(root_folder.clone());
        let database_path = overrides
            .database
            .or_else(|| config.database_path.clone())
            .unwrap_or_else(|| initializer.database_path());

        let output_dir = overrides
            .output_dir
            .or_else(|| config.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."));

        let logo = overrides.logo.or_else(|| config.institution.logo.clone());

        let mut template = CardTemplate::from_config(&config.institution);
        template.show_logo = logo.is_some();

        let sheets = if overrides.sheets.is_empty() {
            config.roster.sheets.clone()
        } else {
            overrides.sheets
        };

        Self {
            root_folder,
            database_path,
            output_dir,
            geometry: CardGeometry::from_config(&config.layout),
            template,
            logo,
            sheets,
        }
    }

    /// Validated layout engine for these settings
    pub fn layout(&self) -> Result<CardLayout> {
        CardLayout::new(self.geometry.clone(), self.template.clone())
    }

    pub fn roster_loader(&self) -> RosterLoader {
        RosterLoader::new(self.sheets.clone())
    }

    pub fn pdf_renderer(&self) -> Result<PdfRenderer> {
        let title = format!("{} {}", self.template.institution_name, self.template.label);
        let renderer = PdfRenderer::new(self.layout()?, self.logo.clone());
        Ok(renderer.with_title(title))
    }
}

/// `<dir>/meal_cards_<YYYYmmdd_HHMMSS>.pdf` for the given time
pub fn timestamped_output(dir: &Path, at: DateTime<Local>) -> PathBuf {
    dir.join(format!("{}{}.pdf", OUTPUT_PREFIX, file_stamp(at)))
}
