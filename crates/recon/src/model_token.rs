//! Model-token extraction ("M20", "EP-2", "ENGINE PRO 3.0") from raw names.

use regex::{Regex, RegexBuilder};

use crate::config::ModelConfig;
use crate::error::ReconError;

/// Compiled, ordered model-token patterns. First match wins.
#[derive(Debug, Clone)]
pub struct ModelExtractor {
    patterns: Vec<Regex>,
}

impl ModelExtractor {
    pub fn new(config: &ModelConfig) -> Result<Self, ReconError> {
        let patterns = config
            .patterns
            .iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| ReconError::InvalidPattern {
                        pattern: p.clone(),
                        reason: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Upper-cased token from the first matching pattern, or "" when no
    /// pattern matches. Works on the raw name, not the normalized one.
    pub fn extract(&self, name: &str) -> String {
        for re in &self.patterns {
            if let Some(caps) = re.captures(name) {
                let token = caps.get(1).or_else(|| caps.get(0));
                if let Some(m) = token {
                    return m.as_str().to_uppercase();
                }
            }
        }
        String::new()
    }
}
