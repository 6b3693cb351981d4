use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Duration,
};

use crate::models::{AccuracyTier, AcquireOptions};
use crate::scheduler::BackgroundFetchConfig;

pub const SETTINGS_PATH_ENV: &str = "LOCATION_REPORTER_SETTINGS";
pub const COLLECTOR_URL_ENV: &str = "LOCATION_REPORTER_COLLECTOR_URL";
pub const DEBUG_ENV: &str = "LOCATION_REPORTER_DEBUG";

const DEFAULT_SETTINGS_FILE: &str = "location-reporter.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReporterSettings {
    pub collector_url: String,
    pub foreground_interval_secs: u64,
    pub background_interval_mins: u64,
    pub acquire_timeout_secs: u64,
    pub max_cache_age_ms: u64,
    pub accuracy: AccuracyTier,
    pub delivery_timeout_secs: u64,
    /// Answer of the startup permission prompt for fine location.
    pub location_permission_granted: bool,
    /// Centre of the simulated provider's walk.
    pub home_latitude: f64,
    pub home_longitude: f64,
    pub stop_on_terminate: bool,
    pub start_on_boot: bool,
    pub enable_headless: bool,
    pub debug: bool,
}

impl Default for ReporterSettings {
    fn default() -> Self {
        Self {
            collector_url: "http://localhost:3000".into(),
            foreground_interval_secs: 10,
            background_interval_mins: 15,
            acquire_timeout_secs: 30,
            max_cache_age_ms: 5000,
            accuracy: AccuracyTier::High,
            delivery_timeout_secs: 30,
            location_permission_granted: true,
            home_latitude: 12.9756,
            home_longitude: 77.6050,
            stop_on_terminate: false,
            start_on_boot: true,
            enable_headless: true,
            debug: false,
        }
    }
}

impl ReporterSettings {
    pub fn acquire_options(&self) -> AcquireOptions {
        AcquireOptions {
            timeout: Duration::from_secs(self.acquire_timeout_secs),
            max_cache_age: Duration::from_millis(self.max_cache_age_ms),
            accuracy: self.accuracy,
        }
    }

    pub fn foreground_interval(&self) -> Duration {
        Duration::from_secs(self.foreground_interval_secs.max(1))
    }

    pub fn delivery_timeout(&self) -> Duration {
        Duration::from_secs(self.delivery_timeout_secs.max(1))
    }

    pub fn background_fetch_config(&self) -> BackgroundFetchConfig {
        BackgroundFetchConfig {
            minimum_fetch_interval: Duration::from_secs(self.background_interval_mins * 60),
            stop_on_terminate: self.stop_on_terminate,
            start_on_boot: self.start_on_boot,
            enable_headless: self.enable_headless,
        }
    }

    /// Apply `LOCATION_REPORTER_*` environment overrides.
    pub fn apply_env(&mut self) {
        if let Ok(url) = env::var(COLLECTOR_URL_ENV) {
            if !url.trim().is_empty() {
                self.collector_url = url.trim().to_owned();
            }
        }

        if let Ok(value) = env::var(DEBUG_ENV) {
            self.debug = value == "1" || value.eq_ignore_ascii_case("true");
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<ReporterSettings>,
}

impl SettingsStore {
    /// Load from `path`. A missing or malformed file yields defaults.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            ReporterSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    /// Load from `LOCATION_REPORTER_SETTINGS` (or the default file in the
    /// working directory) and apply environment overrides.
    pub fn from_env() -> Result<Self> {
        let path = env::var_os(SETTINGS_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));

        let store = Self::new(path)?;
        store.write().apply_env();
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> ReporterSettings {
        self.read().clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, ReporterSettings> {
        match self.data.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, ReporterSettings> {
        match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json")).unwrap();

        let settings = store.settings();
        assert_eq!(settings, ReporterSettings::default());
        assert_eq!(settings.acquire_options(), AcquireOptions::default());
        assert_eq!(settings.foreground_interval(), Duration::from_secs(10));
        assert_eq!(
            settings.background_fetch_config(),
            BackgroundFetchConfig::default()
        );
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{"collector_url": "http://collector.local", "location_permission_granted": false}"#,
        )
        .unwrap();

        let settings = SettingsStore::new(path).unwrap().settings();

        assert_eq!(settings.collector_url, "http://collector.local");
        assert!(!settings.location_permission_granted);
        assert_eq!(settings.foreground_interval_secs, 10);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        let settings = SettingsStore::new(path).unwrap().settings();

        assert_eq!(settings, ReporterSettings::default());
    }
}
