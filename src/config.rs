use crate::error::ConfigError;
use crate::flow::FeatureFlags;
use ahash::AHashMap;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs;

/// Engine settings: feature flags and an optional fixed date for future-date checks.
///
/// ```json
/// { "features": { "claimantShowOtherLeaveStep": true }, "today": "2026-10-18" }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub features: AHashMap<String, bool>,
    pub today: Option<NaiveDate>,
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn with_feature(mut self, name: &str, enabled: bool) -> Self {
        self.features.insert(name.to_string(), enabled);
        self
    }

    /// The configured date, or the local calendar date.
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

impl FeatureFlags for EngineConfig {
    fn is_enabled(&self, name: &str) -> bool {
        self.features.is_enabled(name)
    }
}
