pub mod analysis;
pub mod assessment;
mod cli;
pub mod db;
pub mod error;
pub mod fingerprint;
pub mod geometry;
pub mod media;
pub mod metrics;
pub mod models;
pub mod settings;
mod utils;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use analysis::AnalysisController;
use db::Database;
use settings::SettingsStore;

pub const DATA_DIR_ENV: &str = "PHYSIOASSIST_DATA_DIR";
pub const DEFAULT_DATA_DIR: &str = "physioassist-data";
const SETTINGS_FILE: &str = "settings.json";

/// Everything a front end needs: the history store, the analysis pipeline
/// bound to it and the settings they were built from. Dropping the last
/// handle shuts the database worker down.
pub struct Engine {
    db: Database,
    controller: AnalysisController,
    settings: SettingsStore,
}

impl Engine {
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let settings = SettingsStore::new(data_dir.join(SETTINGS_FILE))?;
        let current = settings.current();

        let db = Database::with_history_cap(data_dir.join(&current.database_file), current.history_cap)?;
        let controller = AnalysisController::new(
            db.clone(),
            current.assessment_config(),
            current.max_media_bytes,
        );

        log::info!("Engine opened with history at {}", db.path().display());

        Ok(Self {
            db,
            controller,
            settings,
        })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn controller(&self) -> &AnalysisController {
        &self.controller
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }
}

pub fn data_dir_from_env() -> PathBuf {
    std::env::var_os(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

pub fn run() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    log::info!("PhysioAssist starting up...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = cli::Command::parse(&args)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(async move {
        if let cli::Command::Help = command {
            println!("{}", cli::USAGE);
            return Ok(());
        }
        let engine = Engine::open(data_dir_from_env())?;
        cli::dispatch(&engine, command).await
    })
}
