//! datarepo CLI - Derive snapshot schemas from dataset schemas
//!
//! Usage:
//!   datarepo derive --request <request.json> [--datasets <dir>] [--include <list>]
//!   datarepo validate --request <request.json>
//!   datarepo datasets --query <sql>
//!   datarepo fingerprint --request <request.json> [--datasets <dir>]
//!
//! Examples:
//!   datarepo derive --request snap.json --datasets ./datasets --include TABLES,RELATIONSHIPS
//!   datarepo datasets --query "SELECT D.sample.id FROM D.sample"

use clap::{Parser, Subcommand};
use datarepo::cache::short_hash;
use datarepo::catalog::{DatasetProvider, InMemoryCatalog};
use datarepo::config::Settings;
use datarepo::model::SnapshotRequest;
use datarepo::query::Query;
use datarepo::render::{render_map_tables, Include, MapTableModel, SnapshotModel};
use datarepo::snapshot::SnapshotBuilder;
use datarepo::validation::validate_request;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "datarepo")]
#[command(about = "datarepo - Derive snapshot schemas from research dataset schemas")]
#[command(version)]
struct Cli {
    /// Config file (defaults to DATAREPO_CONFIG, ./datarepo.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a request, derive the snapshot, and print it as JSON
    Derive {
        /// Path to the snapshot request JSON
        #[arg(short, long)]
        request: PathBuf,

        /// Directory of dataset definitions (overrides catalog.datasets_dir)
        #[arg(short, long)]
        datasets: Option<PathBuf>,

        /// Comma-separated sections to render (overrides render.include)
        #[arg(short, long)]
        include: Option<String>,
    },

    /// Check a snapshot request and print every problem found
    Validate {
        /// Path to the snapshot request JSON
        #[arg(short, long)]
        request: PathBuf,
    },

    /// Print the datasets a snapshot query references
    Datasets {
        /// Snapshot query text
        #[arg(short, long)]
        query: String,
    },

    /// Print the structural fingerprint of a derived snapshot
    Fingerprint {
        /// Path to the snapshot request JSON
        #[arg(short, long)]
        request: PathBuf,

        /// Directory of dataset definitions (overrides catalog.datasets_dir)
        #[arg(short, long)]
        datasets: Option<PathBuf>,

        /// Print only the first 12 characters
        #[arg(long)]
        short: bool,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeriveOutput {
    snapshot: SnapshotModel,
    map_tables: Vec<MapTableModel>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Derive {
            request,
            datasets,
            include,
        } => cmd_derive(&settings, &request, datasets, include),
        Commands::Validate { request } => cmd_validate(&settings, &request),
        Commands::Datasets { query } => cmd_datasets(&query),
        Commands::Fingerprint {
            request,
            datasets,
            short,
        } => cmd_fingerprint(&settings, &request, datasets, short),
    }
}

fn read_request(path: &Path) -> Result<SnapshotRequest, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Error reading file '{}': {}", path.display(), e))?;
    serde_json::from_str(&content)
        .map_err(|e| format!("Error parsing request '{}': {}", path.display(), e))
}

fn load_catalog(settings: &Settings, datasets: Option<PathBuf>) -> Result<InMemoryCatalog, String> {
    let dir = match datasets {
        Some(dir) => dir,
        None => settings
            .catalog
            .resolved_datasets_dir()
            .map_err(|e| format!("Configuration error: {}", e))?
            .ok_or_else(|| {
                "No datasets directory: pass --datasets or set catalog.datasets_dir".to_string()
            })?,
    };
    InMemoryCatalog::load_dir(&dir, settings.catalog.cloud_platform)
        .map_err(|e| format!("Error loading datasets from '{}': {}", dir.display(), e))
}

/// Validate, then derive. Validation failures are printed one per line.
fn derive(
    settings: &Settings,
    request_path: &Path,
    datasets: Option<PathBuf>,
) -> Result<(InMemoryCatalog, datarepo::model::Snapshot), String> {
    let request = read_request(request_path)?;
    if let Err(errors) = validate_request(&request, &settings.validation) {
        let lines: Vec<_> = errors
            .iter()
            .map(|e| format!("  [{}] {}", e.code(), e))
            .collect();
        return Err(format!("Invalid snapshot request:\n{}", lines.join("\n")));
    }

    let catalog = load_catalog(settings, datasets)?;
    let snapshot = SnapshotBuilder::new(&catalog).build(&request).map_err(|e| {
        let mut message = format!("Derivation error: {}", e);
        for detail in e.details() {
            message.push_str(&format!("\n  {}", detail));
        }
        message
    })?;
    Ok((catalog, snapshot))
}

fn cmd_derive(
    settings: &Settings,
    request: &Path,
    datasets: Option<PathBuf>,
    include: Option<String>,
) -> ExitCode {
    let include = match include {
        Some(list) => Include::parse_list(list.split(',')).map_err(|e| e.to_string()),
        None => settings.render.include_flags().map_err(|e| e.to_string()),
    };
    let include = match include {
        Ok(flags) => flags,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let (catalog, snapshot) = match derive(settings, request, datasets) {
        Ok(result) => result,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    let map_tables = snapshot
        .first_source()
        .map(|source| catalog.retrieve_by_name(&source.dataset.name))
        .transpose()
        .and_then(|dataset| match dataset {
            Some(dataset) => render_map_tables(&snapshot, &dataset),
            None => Ok(Vec::new()),
        });
    let map_tables = match map_tables {
        Ok(maps) => maps,
        Err(e) => {
            eprintln!("Render error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let output = DeriveOutput {
        snapshot: SnapshotModel::render(&snapshot, &include),
        map_tables,
    };
    match serde_json::to_string_pretty(&output) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Render error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_validate(settings: &Settings, request: &Path) -> ExitCode {
    let request = match read_request(request) {
        Ok(r) => r,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    match validate_request(&request, &settings.validation) {
        Ok(()) => {
            println!("Request is valid");
            ExitCode::SUCCESS
        }
        Err(errors) => {
            eprintln!("Validation errors:");
            for error in &errors {
                eprintln!("  [{}] {}", error.code(), error);
            }
            ExitCode::FAILURE
        }
    }
}

fn cmd_datasets(query: &str) -> ExitCode {
    match Query::parse(query) {
        Ok(query) => {
            for name in query.dataset_names() {
                println!("{}", name);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Query error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_fingerprint(
    settings: &Settings,
    request: &Path,
    datasets: Option<PathBuf>,
    short: bool,
) -> ExitCode {
    let (_, snapshot) = match derive(settings, request, datasets) {
        Ok(result) => result,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    match snapshot.fingerprint() {
        Ok(hash) if short => {
            println!("{}", short_hash(&hash));
            ExitCode::SUCCESS
        }
        Ok(hash) => {
            println!("{}", hash);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Fingerprint error: {}", e);
            ExitCode::FAILURE
        }
    }
}
