//! Incremental card generation
//!
//! One run: ingest the roster, merge new students into the store, render
//! cards for every record not yet processed, and only then mark those
//! records processed. A failure before the final step leaves every record
//! unprocessed, so the next run regenerates the same set.

use crate::config::{timestamped_output, GeneratorSettings};
use crate::error::Result;
use crate::render::CardRenderer;
use crate::roster::{AdmissionNumberAllocator, RosterLoader};
use chrono::{DateTime, Local};
use mealcard_common::{StoreCounts, StudentRecord, StudentStore};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Inputs of one generation run
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Roster files, read in order
    pub inputs: Vec<PathBuf>,
    /// Text printed on the VALIDITY line of every card
    pub validity: String,
    /// Document path; when absent the document is timestamp-named inside
    /// the output folder handed to [`run_generation`]
    pub output: Option<PathBuf>,
}

impl GenerateRequest {
    pub fn new(inputs: Vec<PathBuf>, validity: impl Into<String>) -> Self {
        Self {
            inputs,
            validity: validity.into(),
            output: None,
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Document path of a run started at `at`
    pub fn output_path(&self, output_dir: &Path, at: DateTime<Local>) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => timestamped_output(output_dir, at),
        }
    }
}

/// What a run did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every stored record already had a card; no document was written
    NoNewRecords { ingested: usize, inserted: u64 },
    /// A document was written and its records marked processed
    Generated {
        ingested: usize,
        inserted: u64,
        cards: usize,
        pages: usize,
        output: PathBuf,
    },
}

impl RunOutcome {
    /// One-line operator summary
    pub fn describe(&self) -> String {
        match self {
            RunOutcome::NoNewRecords { .. } => {
                "No new students found; no document created".to_string()
            }
            RunOutcome::Generated {
                cards,
                pages,
                output,
                ..
            } => format!(
                "Generated {} card(s) on {} page(s): {}",
                cards,
                pages,
                output.display()
            ),
        }
    }
}

/// Run one incremental generation against an open store
///
/// Without an explicit `request.output` the document is timestamp-named
/// inside `output_dir`.
pub async fn run_generation(
    store: &StudentStore,
    loader: &RosterLoader,
    renderer: &dyn CardRenderer,
    request: &GenerateRequest,
    output_dir: &Path,
) -> Result<RunOutcome> {
    let mut allocator = AdmissionNumberAllocator::new();
    allocator.reserve_all(store.admission_numbers().await?);

    let entries = loader.load(&request.inputs, &mut allocator)?;
    let ingested = entries.len();
    let records: Vec<StudentRecord> = entries.into_iter().map(|e| e.student).collect();

    let merge = store.merge_insert(&records).await?;

    let pending = store.unprocessed().await?;
    if pending.is_empty() {
        info!("No unprocessed students");
        return Ok(RunOutcome::NoNewRecords {
            ingested,
            inserted: merge.inserted,
        });
    }

    let output = request.output_path(output_dir, Local::now());

    info!(
        "Rendering {} card(s) to {}",
        pending.len(),
        output.display()
    );
    let summary = renderer.render(&pending, &request.validity, &output)?;

    let marked = store
        .mark_processed(pending.iter().map(|r| r.admission_number.as_str()))
        .await?;
    if marked != pending.len() as u64 {
        warn!(
            "Marked {} of {} rendered record(s) processed",
            marked,
            pending.len()
        );
    }

    Ok(RunOutcome::Generated {
        ingested,
        inserted: merge.inserted,
        cards: summary.cards,
        pages: summary.pages,
        output,
    })
}

/// Open the configured store, run one generation, and close the store
///
/// The store is closed whether or not the run succeeds.
pub async fn generate_cards(
    settings: &GeneratorSettings,
    request: &GenerateRequest,
) -> Result<RunOutcome> {
    let renderer = settings.pdf_renderer()?;
    let loader = settings.roster_loader();

    let store = StudentStore::open(&settings.database_path).await?;
    let outcome = run_generation(&store, &loader, &renderer, request, &settings.output_dir).await;
    store.close().await;

    outcome
}

/// Record counts of the configured store
pub async fn store_status(settings: &GeneratorSettings) -> Result<StoreCounts> {
    let store = StudentStore::open(&settings.database_path).await?;
    let counts = store.counts().await;
    store.close().await;

    Ok(counts?)
}
