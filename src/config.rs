// SPDX-License-Identifier: MIT
use std::path::PathBuf;

use crate::harness::HarnessOptions;
use crate::report::Normalization;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("CODEC_ARTIFACT_STEM cannot be empty")]
    EmptyStem,

    #[error("CODEC_ARTIFACT_STEM must be a bare file name, got {0:?}")]
    StemWithSeparator(String),

    #[error("CODEC_BASELINE cannot be empty when set")]
    EmptyBaseline,

    #[error("CODEC_LOG_FORMAT must be 'text' or 'json', got {0:?}")]
    UnknownLogFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub output_dir: PathBuf,
    pub schema_path: PathBuf,
    pub artifact_stem: String,
    pub baseline: Option<String>,
    pub verify_round_trip: bool,
    pub log_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparsable values fall back to
    /// their defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            output_dir: lookup("CODEC_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            schema_path: lookup("CODEC_SCHEMA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("proto/employee.proto")),
            artifact_stem: lookup("CODEC_ARTIFACT_STEM").unwrap_or_else(|| "data".to_string()),
            baseline: lookup("CODEC_BASELINE"),
            verify_round_trip: lookup("CODEC_VERIFY_ROUND_TRIP")
                .and_then(|s| parse_bool(&s))
                .unwrap_or(true),
            log_format: lookup("CODEC_LOG_FORMAT").unwrap_or_else(|| "text".to_string()),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.artifact_stem.is_empty() {
            return Err(ConfigError::EmptyStem);
        }

        if self.artifact_stem.contains(['/', '\\']) {
            return Err(ConfigError::StemWithSeparator(self.artifact_stem.clone()));
        }

        if self.baseline.as_deref().is_some_and(|b| b.trim().is_empty()) {
            return Err(ConfigError::EmptyBaseline);
        }

        if self.log_format().is_none() {
            return Err(ConfigError::UnknownLogFormat(self.log_format.clone()));
        }

        Ok(())
    }

    pub fn log_format(&self) -> Option<LogFormat> {
        match self.log_format.to_ascii_lowercase().as_str() {
            "text" => Some(LogFormat::Text),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }

    pub fn normalization(&self) -> Normalization {
        match &self.baseline {
            Some(name) => Normalization::Baseline(name.clone()),
            None => Normalization::Minimum,
        }
    }

    pub fn harness_options(&self) -> HarnessOptions {
        HarnessOptions {
            normalization: self.normalization(),
            verify_round_trip: self.verify_round_trip,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
