//! Configuration loader - YAML presets + .env settings

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::RuleError;
use crate::lsystem::{parse_rules, LSystemState};
use crate::presets::Preset;

/// Upper bound on the step count accepted from users
pub const DEFAULT_MAX_STEP_COUNT: usize = 10;

fn default_max_step_count() -> usize {
    DEFAULT_MAX_STEP_COUNT
}

/// Main configuration loaded from lsystems.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_max_step_count")]
    pub max_step_count: usize,
    #[serde(default)]
    pub presets: Vec<PresetConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_step_count: DEFAULT_MAX_STEP_COUNT,
            presets: vec![],
        }
    }
}

/// A user-defined L-system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub axiom: String,
    /// Rule text, one `predecessor => successor` per line
    pub rules: String,
    pub angle: f64,
    pub step_count: usize,
}

impl PresetConfig {
    /// Parse the rule text into a full configuration
    pub fn state(&self) -> Result<LSystemState, RuleError> {
        Ok(LSystemState {
            axiom: self.axiom.clone(),
            rules: parse_rules(&self.rules)?,
            angle: self.angle,
            step_count: self.step_count,
        })
    }
}

/// Settings loaded from .env
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub log_dir: String,
    pub output_dir: String,
}

impl Config {
    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Get a user preset by name
    pub fn get_preset(&self, name: &str) -> Option<&PresetConfig> {
        self.presets.iter().find(|p| p.name == name)
    }

    /// Resolve a name against user presets first, then built-ins
    pub fn resolve(&self, name: &str) -> Option<Result<LSystemState, RuleError>> {
        if let Some(preset) = self.get_preset(name) {
            return Some(preset.state());
        }
        Preset::from_name(name).map(|p| Ok(p.state()))
    }
}

/// Load a replay script: a YAML list of configurations
pub fn load_script<P: AsRef<Path>>(path: P) -> Result<Vec<LSystemState>> {
    let content = std::fs::read_to_string(path)?;
    let states: Vec<LSystemState> = serde_yaml::from_str(&content)?;
    Ok(states)
}

impl Settings {
    /// Load settings from .env file
    pub fn load() -> Self {
        dotenvy::dotenv().ok();

        Settings {
            log_dir: std::env::var("LSYSTEM_LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            output_dir: std::env::var("LSYSTEM_OUTPUT_DIR").unwrap_or_else(|_| "out".to_string()),
        }
    }
}
