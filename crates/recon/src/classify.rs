use std::collections::HashSet;

use crate::model::{MatchResult, ProductRecord};
use crate::model_token::ModelExtractor;
use crate::normalize::NameNormalizer;
use crate::similarity::ratio;

/// Destination-side data derived once per run: exact-key sets plus each
/// record's normalized name and model token, in catalog order.
#[derive(Debug)]
pub struct DestinationIndex<'a> {
    skus: HashSet<String>,
    handles: HashSet<String>,
    entries: Vec<IndexedRecord<'a>>,
}

#[derive(Debug)]
struct IndexedRecord<'a> {
    record: &'a ProductRecord,
    normalized_name: String,
    model_token: String,
}

impl<'a> DestinationIndex<'a> {
    pub fn build(
        records: &'a [ProductRecord],
        normalizer: &NameNormalizer,
        extractor: &ModelExtractor,
    ) -> Self {
        let mut skus = HashSet::new();
        let mut handles = HashSet::new();
        let mut entries = Vec::with_capacity(records.len());

        for record in records {
            let sku = record.sku();
            if !sku.is_empty() {
                skus.insert(sku);
            }
            let handle = record.handle();
            if !handle.is_empty() {
                handles.insert(handle);
            }
            let name = record.name();
            entries.push(IndexedRecord {
                record,
                normalized_name: normalizer.normalize(&name),
                model_token: extractor.extract(&name),
            });
        }

        Self { skus, handles, entries }
    }

    pub fn contains_sku(&self, sku: &str) -> bool {
        !sku.is_empty() && self.skus.contains(sku)
    }

    pub fn contains_handle(&self, handle: &str) -> bool {
        !handle.is_empty() && self.handles.contains(handle)
    }

    /// First destination record with the highest name similarity. A later
    /// record only replaces the current best if it scores strictly higher.
    fn best_name_match(&self, normalized: &str) -> Option<(&'a ProductRecord, f64)> {
        let mut best: Option<(&'a ProductRecord, f64)> = None;
        let mut best_score = 0.0;
        for entry in &self.entries {
            let score = ratio(normalized, &entry.normalized_name);
            if score > best_score {
                best_score = score;
                best = Some((entry.record, score));
            }
        }
        best
    }

    /// First destination record (catalog order) carrying the same token.
    fn first_model_match(&self, token: &str) -> Option<&'a ProductRecord> {
        self.entries
            .iter()
            .find(|e| e.model_token == token)
            .map(|e| e.record)
    }
}

/// Classify one import record. Rules run in priority order and the first
/// that fires decides: SKU, handle, name similarity, model token.
pub fn classify(
    record: &ProductRecord,
    index: &DestinationIndex<'_>,
    normalizer: &NameNormalizer,
    extractor: &ModelExtractor,
    threshold: f64,
) -> MatchResult {
    let sku = record.sku();
    if index.contains_sku(&sku) {
        return MatchResult::ExactSku { sku };
    }

    let handle = record.handle();
    if index.contains_handle(&handle) {
        return MatchResult::ExactHandle { handle };
    }

    let name = record.name();
    let normalized = normalizer.normalize(&name);
    if !normalized.is_empty() {
        if let Some((matched, score)) = index.best_name_match(&normalized) {
            if score >= threshold {
                return MatchResult::NameSimilarity {
                    matched_record: matched.clone(),
                    similarity_score: score,
                };
            }
        }
    }

    let token = extractor.extract(&name);
    if !token.is_empty() {
        if let Some(matched) = index.first_model_match(&token) {
            return MatchResult::ModelNumber {
                matched_record: matched.clone(),
                model_token: token,
            };
        }
    }

    MatchResult::Unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ModelConfig, NormalizeConfig};
    use crate::model::MatchType;

    fn rec(name: &str, sku: &str, handle: &str) -> ProductRecord {
        ProductRecord::from_pairs([("name", name), ("sku", sku), ("handle", handle)])
    }

    fn run_one(import: &ProductRecord, dest: &[ProductRecord], normalize: &NormalizeConfig) -> MatchResult {
        let normalizer = NameNormalizer::new(normalize);
        let extractor = ModelExtractor::new(&ModelConfig::default()).unwrap();
        let index = DestinationIndex::build(dest, &normalizer, &extractor);
        classify(import, &index, &normalizer, &extractor, 0.8)
    }

    #[test]
    fn sku_beats_everything() {
        let dest = vec![rec("Completely Different", "EP2-001", "")];
        let result = run_one(&rec("Engwe EP-2 Pro", "EP2-001", ""), &dest, &NormalizeConfig::default());
        assert_eq!(result, MatchResult::ExactSku { sku: "EP2-001".into() });
    }

    #[test]
    fn handle_before_name() {
        let dest = vec![rec("Engwe M20", "", "engwe-m20")];
        let result = run_one(&rec("Engwe M20", "NEW-1", "engwe-m20"), &dest, &NormalizeConfig::default());
        assert_eq!(result.match_type(), Some(MatchType::ExactHandle));
    }

    #[test]
    fn empty_keys_never_match_exactly() {
        let dest = vec![rec("Other", "", "")];
        let result = run_one(&rec("Something", "", ""), &dest, &NormalizeConfig::default());
        assert_eq!(result, MatchResult::Unique);
    }

    #[test]
    fn name_similarity_with_default_stripping() {
        let dest = vec![rec("M20", "X1", "m20")];
        let result = run_one(&rec("ENGWE M20 Electric Bike", "", ""), &dest, &NormalizeConfig::default());
        match result {
            MatchResult::NameSimilarity { matched_record, similarity_score } => {
                assert_eq!(matched_record.sku(), "X1");
                assert_eq!(similarity_score, 1.0);
            }
            other => panic!("expected name similarity, got {other:?}"),
        }
    }

    #[test]
    fn model_token_fallback() {
        let dest = vec![rec("M20", "X1", "m20")];
        let result = run_one(&rec("ENGWE M20 Electric Bike", "", ""), &dest, &NormalizeConfig::empty());
        match result {
            MatchResult::ModelNumber { matched_record, model_token } => {
                assert_eq!(model_token, "M20");
                assert_eq!(matched_record.sku(), "X1");
            }
            other => panic!("expected model match, got {other:?}"),
        }
    }

    #[test]
    fn model_match_takes_first_hit() {
        let dest = vec![
            rec("Rack for M20 series", "A", ""),
            rec("M20", "B", ""),
        ];
        let result = run_one(&rec("Engwe M20 2024 edition", "", ""), &dest, &NormalizeConfig::empty());
        assert_eq!(result.match_type(), Some(MatchType::ModelNumber));
        assert_eq!(result.matched_record().unwrap().sku(), "A");
    }

    #[test]
    fn tie_keeps_first_destination() {
        let dest = vec![rec("City Runner", "FIRST", ""), rec("City Runner", "SECOND", "")];
        let result = run_one(&rec("City Runner", "", ""), &dest, &NormalizeConfig::default());
        assert_eq!(result.matched_record().unwrap().sku(), "FIRST");
    }

    #[test]
    fn equal_scores_from_different_names_keep_first() {
        let normalizer = NameNormalizer::default();
        let extractor = ModelExtractor::new(&ModelConfig::default()).unwrap();
        let dest = vec![rec("abcx", "FIRST", ""), rec("abcy", "SECOND", "")];
        let index = DestinationIndex::build(&dest, &normalizer, &extractor);

        // Both score 2 * 3 / 8
        let result = classify(&rec("abcz", "", ""), &index, &normalizer, &extractor, 0.7);
        assert_eq!(result.match_type(), Some(MatchType::NameSimilarity));
        assert_eq!(result.matched_record().unwrap().sku(), "FIRST");
        assert_eq!(result.similarity_score(), 0.75);
    }

    #[test]
    fn below_threshold_without_token_is_unique() {
        let dest = vec![rec("Mountain Trail Pro", "", ""), rec("Cargo Hauler", "", "")];
        let result = run_one(&rec("Foldable City Bike X", "", ""), &dest, &NormalizeConfig::default());
        assert_eq!(result, MatchResult::Unique);
    }

    #[test]
    fn empty_destination_is_unique() {
        let result = run_one(&rec("Engwe M20", "S", "h"), &[], &NormalizeConfig::default());
        assert_eq!(result, MatchResult::Unique);
    }

    #[test]
    fn zero_threshold_needs_some_overlap() {
        let normalizer = NameNormalizer::default();
        let extractor = ModelExtractor::new(&ModelConfig::default()).unwrap();
        let dest = vec![rec("xyz", "", "")];
        let index = DestinationIndex::build(&dest, &normalizer, &extractor);
        let result = classify(&rec("abc", "", ""), &index, &normalizer, &extractor, 0.0);
        assert_eq!(result, MatchResult::Unique);
    }
}
