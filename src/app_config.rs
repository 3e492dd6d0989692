use anyhow::{anyhow, Context, Result};
use log::{warn, LevelFilter};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::sync::engine::{BlockErrorPolicy, SyncOptions};
use crate::sync::resolver::ResolverConfig;

/// Application configuration module
/// This module handles loading, validating and saving the JSON configuration.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Synchronization parameters
    #[serde(default)]
    pub sync: SyncConfig,

    /// Output rendering
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Synchronization engine settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SyncConfig {
    /// Silence (ms) that separates two blocks
    #[serde(default = "default_pause_length_ms")]
    pub pause_length_ms: u64,

    /// Cutoff of the first resolution attempt
    #[serde(default = "default_initial_cutoff")]
    pub initial_cutoff: f64,

    /// Cutoff increment between attempts
    #[serde(default = "default_cutoff_step")]
    pub cutoff_step: f64,

    /// Highest cutoff tried before a block is declared ambiguous
    #[serde(default = "default_max_cutoff")]
    pub max_cutoff: f64,

    /// Abort on the first failing block, or skip it and report
    #[serde(default)]
    pub on_block_error: BlockErrorPolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            pause_length_ms: default_pause_length_ms(),
            initial_cutoff: default_initial_cutoff(),
            cutoff_step: default_cutoff_step(),
            max_cutoff: default_max_cutoff(),
            on_block_error: BlockErrorPolicy::default(),
        }
    }
}

/// Output settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OutputConfig {
    /// Text placed between primary and secondary lines
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Language code of the primary track (timing reference)
    #[serde(default = "default_primary_language")]
    pub primary_language: String,

    /// Language code of the secondary track
    #[serde(default = "default_secondary_language")]
    pub secondary_language: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            primary_language: default_primary_language(),
            secondary_language: default_secondary_language(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_pause_length_ms() -> u64 {
    3000
}

fn default_initial_cutoff() -> f64 {
    0.16
}

fn default_cutoff_step() -> f64 {
    0.01
}

fn default_max_cutoff() -> f64 {
    1.0
}

fn default_separator() -> String {
    "\n".to_string()
}

fn default_primary_language() -> String {
    "zh".to_string()
}

fn default_secondary_language() -> String {
    "en".to_string()
}

impl Config {
    /// Load the configuration at `path`, writing a default one first when
    /// the file does not exist.
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let config: Config = serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let sync = &self.sync;

        if !(sync.initial_cutoff > 0.0 && sync.initial_cutoff <= 1.0) {
            return Err(anyhow!("initial_cutoff must be in (0, 1], got {}", sync.initial_cutoff));
        }
        if !(sync.cutoff_step > 0.0) || !sync.cutoff_step.is_finite() {
            return Err(anyhow!("cutoff_step must be positive, got {}", sync.cutoff_step));
        }
        if !(sync.max_cutoff >= sync.initial_cutoff) || !sync.max_cutoff.is_finite() {
            return Err(anyhow!(
                "max_cutoff ({}) must not be below initial_cutoff ({})",
                sync.max_cutoff, sync.initial_cutoff
            ));
        }

        crate::language_utils::get_language_name(&self.output.primary_language)
            .context("Invalid primary language")?;
        crate::language_utils::get_language_name(&self.output.secondary_language)
            .context("Invalid secondary language")?;

        if crate::language_utils::language_codes_match(
            &self.output.primary_language,
            &self.output.secondary_language,
        ) {
            warn!(
                "Primary and secondary languages are both '{}'",
                self.output.primary_language
            );
        }

        Ok(())
    }

    /// Engine options derived from this configuration
    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            pause_length_ms: self.sync.pause_length_ms,
            resolver: ResolverConfig {
                initial_cutoff: self.sync.initial_cutoff,
                cutoff_step: self.sync.cutoff_step,
                max_cutoff: self.sync.max_cutoff,
            },
            separator: self.output.separator.clone(),
            on_block_error: self.sync.on_block_error,
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            sync: SyncConfig::default(),
            output: OutputConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
