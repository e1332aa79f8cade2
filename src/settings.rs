use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::assessment::AssessmentConfig;
use crate::db::DEFAULT_HISTORY_CAP;
use crate::log_warn;
use crate::media::DEFAULT_MAX_MEDIA_BYTES;

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineSettings {
    pub history_cap: usize,
    pub visibility_threshold: f64,
    pub max_media_bytes: usize,
    pub report_normal_movements: bool,
    pub database_file: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        let assessment = AssessmentConfig::default();
        Self {
            history_cap: DEFAULT_HISTORY_CAP,
            visibility_threshold: assessment.visibility_threshold,
            max_media_bytes: DEFAULT_MAX_MEDIA_BYTES,
            report_normal_movements: assessment.report_normal_movements,
            database_file: "physioassist.db".into(),
        }
    }
}

impl EngineSettings {
    pub fn assessment_config(&self) -> AssessmentConfig {
        AssessmentConfig {
            visibility_threshold: self.visibility_threshold,
            report_normal_movements: self.report_normal_movements,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.history_cap == 0 {
            return Err(anyhow!("historyCap must be at least 1"));
        }
        if !(0.0..1.0).contains(&self.visibility_threshold) {
            return Err(anyhow!(
                "visibilityThreshold must be in [0, 1), got {}",
                self.visibility_threshold
            ));
        }
        if self.max_media_bytes == 0 {
            return Err(anyhow!("maxMediaBytes must be positive"));
        }
        if self.database_file.trim().is_empty() {
            return Err(anyhow!("databaseFile must not be empty"));
        }
        Ok(())
    }
}

/// Engine settings persisted as JSON. A missing file means defaults; an
/// unreadable one is reported and replaced by defaults in memory.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<EngineSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            match serde_json::from_str::<EngineSettings>(&contents) {
                Ok(settings) if settings.validate().is_ok() => settings,
                Ok(_) | Err(_) => {
                    log_warn!(
                        "Ignoring invalid settings at {}, using defaults",
                        path.display()
                    );
                    EngineSettings::default()
                }
            }
        } else {
            EngineSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, EngineSettings> {
        match self.data.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, EngineSettings> {
        match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn current(&self) -> EngineSettings {
        self.read().clone()
    }

    pub fn update(&self, settings: EngineSettings) -> Result<()> {
        settings.validate()?;
        let mut guard = self.write();
        self.persist(&settings)?;
        *guard = settings;
        Ok(())
    }

    fn persist(&self, data: &EngineSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let data: EngineSettings = serde_json::from_str(&contents)?;
        data.validate()?;
        *self.write() = data;
        Ok(())
    }
}
