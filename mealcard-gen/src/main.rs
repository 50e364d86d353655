//! mealcard-gen - Meal card generator
//!
//! Command-line front end: `generate` produces cards for students not yet
//! issued one, `status` reports how many records are processed.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mealcard_common::config::{load_toml_config, locate_config_file, ROOT_FOLDER_ENV};
use mealcard_gen::{generate_cards, store_status, CliOverrides, GenerateRequest, GeneratorSettings};
use tracing::info;

/// Command-line arguments for mealcard-gen
#[derive(Parser, Debug)]
#[command(name = "mealcard-gen")]
#[command(about = "Generate printable meal cards for newly enrolled students")]
#[command(version)]
struct Args {
    /// Bootstrap TOML config file
    #[arg(short, long, global = true, env = "MEALCARD_CONFIG")]
    config: Option<PathBuf>,

    /// Folder holding the record store
    #[arg(short, long, global = true, env = ROOT_FOLDER_ENV)]
    root_folder: Option<PathBuf>,

    /// Record store file (overrides <root-folder>/mealcards.db)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Log level when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Print the result as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ingest rosters and render cards for students without one
    Generate {
        /// Roster file(s): .xlsx, .xls, .xlsb, .ods or .csv
        #[arg(short, long = "input", required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,

        /// Validity text printed on every card, e.g. "TERM 3 2024"
        #[arg(short, long)]
        validity: String,

        /// Output PDF (default: <output_dir>/meal_cards_<timestamp>.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Folder for timestamp-named output documents
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Workbook sheet to read; repeat for several (default: first sheet)
        #[arg(short, long = "sheet")]
        sheets: Vec<String>,

        /// Institution logo image
        #[arg(long)]
        logo: Option<PathBuf>,
    },

    /// Show total, processed and pending record counts
    Status,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Loaded before the subscriber exists; its source is logged below
    let config_path = locate_config_file(args.config.as_deref());
    let (config, config_source) = load_toml_config(config_path.as_deref())
        .context("Failed to load configuration")?;

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Build identification first, before any file or database work
    info!(
        "Starting mealcard-gen v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    config_source.log();

    let mut overrides = CliOverrides {
        root_folder: args.root_folder.clone(),
        database: args.database.clone(),
        ..Default::default()
    };

    match args.command {
        Command::Generate {
            inputs,
            validity,
            output,
            output_dir,
            sheets,
            logo,
        } => {
            overrides.output_dir = output_dir;
            overrides.sheets = sheets;
            overrides.logo = logo;
            let settings = GeneratorSettings::resolve(&config, overrides);
            info!("Record store: {}", settings.database_path.display());

            let mut request = GenerateRequest::new(inputs, validity);
            request.output = output;

            let outcome = generate_cards(&settings, &request)
                .await
                .context("Card generation failed")?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!("{}", outcome.describe());
            }
        }
        Command::Status => {
            let settings = GeneratorSettings::resolve(&config, overrides);
            info!("Record store: {}", settings.database_path.display());

            let counts = store_status(&settings)
                .await
                .context("Failed to read record store")?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&counts)?);
            } else {
                println!(
                    "{} student(s): {} processed, {} pending",
                    counts.total, counts.processed, counts.unprocessed
                );
            }
        }
    }

    Ok(())
}
