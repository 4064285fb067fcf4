//! Product-name canonicalization used by every name comparison.

use crate::config::NormalizeConfig;

/// Lowercases, strips configured brand/category words, drops everything
/// outside `[a-z0-9]` and whitespace, and collapses whitespace.
#[derive(Debug, Clone)]
pub struct NameNormalizer {
    prefixes: Vec<String>,
    suffixes: Vec<String>,
}

impl NameNormalizer {
    pub fn new(config: &NormalizeConfig) -> Self {
        Self {
            prefixes: config.prefixes.iter().map(|p| p.trim().to_lowercase()).collect(),
            suffixes: config.suffixes.iter().map(|s| s.trim().to_lowercase()).collect(),
        }
    }

    /// Normalize a product name. Total and idempotent: applying it to its
    /// own output returns the output unchanged.
    pub fn normalize(&self, name: &str) -> String {
        let mut current = self.strip_once(name);
        // Stripping can expose a new prefix ("engwe engwe m20"), or cleaning
        // can turn "engwe." into "engwe". Repeat until stable; each round
        // either shortens the string or ends the loop.
        loop {
            let next = self.strip_once(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    fn strip_once(&self, name: &str) -> String {
        let lowered = name.to_lowercase();
        let mut name = lowered.trim();

        for prefix in &self.prefixes {
            if let Some(rest) = name.strip_prefix(prefix.as_str()) {
                if rest.starts_with(' ') {
                    name = rest.trim();
                }
            }
        }

        for suffix in &self.suffixes {
            if let Some(rest) = name.strip_suffix(suffix.as_str()) {
                if rest.ends_with(' ') {
                    name = rest.trim();
                }
            }
        }

        let cleaned: String = name
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
            .collect();

        cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::new(&NormalizeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(name: &str) -> String {
        NameNormalizer::default().normalize(name)
    }

    #[test]
    fn empty_input() {
        assert_eq!(norm(""), "");
        assert_eq!(norm("   "), "");
    }

    #[test]
    fn prefixes_chain_in_list_order() {
        assert_eq!(norm("ENGWE Electric Bike M20"), "m20");
        assert_eq!(norm("Engwe EP-2 Pro"), "ep2 pro");
    }

    #[test]
    fn suffix_stripped() {
        assert_eq!(norm("ENGWE M20 Electric Bike"), "m20");
        assert_eq!(norm("Engine Pro 2.0 E-Bike"), "engine pro 20");
    }

    #[test]
    fn prefix_needs_word_boundary() {
        assert_eq!(norm("Bikes Galore"), "bikes galore");
        assert_eq!(norm("electrical tape"), "electrical tape");
    }

    #[test]
    fn bare_prefix_word_is_kept() {
        assert_eq!(norm("Engwe"), "engwe");
    }

    #[test]
    fn punctuation_and_whitespace() {
        let n = NameNormalizer::new(&NormalizeConfig::empty());
        assert_eq!(n.normalize("  Foldable   City-Bike (X)!  "), "foldable citybike x");
        assert_eq!(n.normalize("Café\tRacer"), "caf racer");
    }

    #[test]
    fn exposed_prefix_is_stripped_again() {
        assert_eq!(norm("engwe engwe m20"), "m20");
        assert_eq!(norm("engwe. m20"), "m20");
        assert_eq!(norm("ENGWE !! ENGWE Engine Pro"), "engine pro");
    }

    #[test]
    fn idempotent_on_samples() {
        for name in ["ENGWE EP-2 Pro", "Bike engwe X", "E-Bike T14", "  ", "L20 2.0 Boost"] {
            let once = norm(name);
            assert_eq!(norm(&once), once, "not idempotent for {name:?}");
        }
    }

    #[test]
    fn config_entries_are_case_folded() {
        let config = NormalizeConfig {
            prefixes: vec!["ACME".into()],
            suffixes: vec!["Scooter".into()],
        };
        assert_eq!(NameNormalizer::new(&config).normalize("acme Z1 scooter"), "z1");
    }
}
