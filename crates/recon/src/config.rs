use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

use crate::error::ReconError;

/// Names at or above this similarity are reported as potential duplicates.
pub const DEFAULT_THRESHOLD: f64 = 0.8;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReconConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default)]
    pub normalize: NormalizeConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            normalize: NormalizeConfig::default(),
            model: ModelConfig::default(),
        }
    }
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

// ---------------------------------------------------------------------------
// Name normalization
// ---------------------------------------------------------------------------

/// Brand and category words stripped from product names before comparison.
///
/// Both lists are ordered. Each entry is tried once, in order, against the
/// name as left by the entries before it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NormalizeConfig {
    #[serde(default = "default_prefixes")]
    pub prefixes: Vec<String>,
    #[serde(default = "default_suffixes")]
    pub suffixes: Vec<String>,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            prefixes: default_prefixes(),
            suffixes: default_suffixes(),
        }
    }
}

impl NormalizeConfig {
    /// No prefix or suffix stripping; only case, punctuation and whitespace.
    pub fn empty() -> Self {
        Self {
            prefixes: Vec::new(),
            suffixes: Vec::new(),
        }
    }
}

fn default_prefixes() -> Vec<String> {
    ["engwe", "electric", "e-bike", "ebike", "bike"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_suffixes() -> Vec<String> {
    ["electric bike", "e-bike", "ebike"]
        .into_iter()
        .map(String::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Model tokens
// ---------------------------------------------------------------------------

/// Ordered model-token patterns. The first pattern that matches wins, so
/// reordering this list changes classification.
///
/// Patterns are matched case-insensitively against the raw product name and
/// the token is capture group 1.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ModelConfig {
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            patterns: default_patterns(),
        }
    }
}

fn default_patterns() -> Vec<String> {
    [
        r"\b([A-Z]+[0-9]+(?:\.[0-9]+)?)\b",
        r"\b(EP-[0-9]+)\b",
        r"\b(Engine\s+Pro\s+[0-9.]+)\b",
        r"\b(L[0-9]+)\b",
        r"\b(P[0-9]+)\b",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ReconError> {
        toml::to_string_pretty(self).map_err(|e| ReconError::ConfigParse(e.to_string()))
    }

    /// Replace the similarity threshold, re-checking its range.
    pub fn with_threshold(mut self, threshold: f64) -> Result<Self, ReconError> {
        self.threshold = threshold;
        self.validate_threshold()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        self.validate_threshold()?;

        for (list, entries) in [
            ("prefixes", &self.normalize.prefixes),
            ("suffixes", &self.normalize.suffixes),
        ] {
            if entries.iter().any(|e| e.trim().is_empty()) {
                return Err(ReconError::ConfigValidation(format!(
                    "normalize.{list} must not contain empty entries"
                )));
            }
        }

        for pattern in &self.model.patterns {
            let re = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| ReconError::InvalidPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })?;
            // captures_len counts the implicit whole-match group
            if re.captures_len() < 2 {
                return Err(ReconError::InvalidPattern {
                    pattern: pattern.clone(),
                    reason: "pattern needs a capture group for the model token".into(),
                });
            }
        }

        Ok(())
    }

    fn validate_threshold(&self) -> Result<(), ReconError> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(ReconError::ConfigValidation(format!(
                "threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
