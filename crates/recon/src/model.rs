use serde::Serialize;
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Field aliases, tried in order. JSON scrapes use the lowercase names,
/// storefront CSV exports use the capitalized column headers.
const NAME_FIELDS: &[&str] = &["name", "title", "Title"];
const SKU_FIELDS: &[&str] = &["sku", "variant_sku", "Variant SKU"];
const HANDLE_FIELDS: &[&str] = &["handle", "Handle"];

/// One product listing as handed over by a collector: loosely typed fields,
/// none of them guaranteed to be present.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProductRecord {
    fields: Map<String, Value>,
}

impl ProductRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Build a record from string pairs, mostly for tests and CSV rows.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), Value::String(v.into())))
                .collect(),
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn name(&self) -> String {
        self.first_of(NAME_FIELDS)
    }

    pub fn sku(&self) -> String {
        self.first_of(SKU_FIELDS)
    }

    pub fn handle(&self) -> String {
        self.first_of(HANDLE_FIELDS)
    }

    /// Value of the first alias that is present and not null, as trimmed
    /// text. Missing fields and non-scalar values read as "".
    fn first_of(&self, keys: &[&str]) -> String {
        keys.iter()
            .filter_map(|k| self.fields.get(*k))
            .find(|v| !v.is_null())
            .map(scalar_text)
            .unwrap_or_default()
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    ExactSku,
    ExactHandle,
    NameSimilarity,
    ModelNumber,
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExactSku => write!(f, "exact_sku"),
            Self::ExactHandle => write!(f, "exact_handle"),
            Self::NameSimilarity => write!(f, "name_similarity"),
            Self::ModelNumber => write!(f, "model_number"),
        }
    }
}

/// Outcome of checking one import record against the destination catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "match_type", rename_all = "snake_case")]
pub enum MatchResult {
    ExactSku {
        sku: String,
    },
    ExactHandle {
        handle: String,
    },
    NameSimilarity {
        matched_record: ProductRecord,
        similarity_score: f64,
    },
    ModelNumber {
        matched_record: ProductRecord,
        model_token: String,
    },
    Unique,
}

impl MatchResult {
    pub fn match_type(&self) -> Option<MatchType> {
        match self {
            Self::ExactSku { .. } => Some(MatchType::ExactSku),
            Self::ExactHandle { .. } => Some(MatchType::ExactHandle),
            Self::NameSimilarity { .. } => Some(MatchType::NameSimilarity),
            Self::ModelNumber { .. } => Some(MatchType::ModelNumber),
            Self::Unique => None,
        }
    }

    pub fn matched_record(&self) -> Option<&ProductRecord> {
        match self {
            Self::NameSimilarity { matched_record, .. }
            | Self::ModelNumber { matched_record, .. } => Some(matched_record),
            _ => None,
        }
    }

    /// Similarity of the best name match; 0 for every other outcome.
    pub fn similarity_score(&self) -> f64 {
        match self {
            Self::NameSimilarity { similarity_score, .. } => *similarity_score,
            _ => 0.0,
        }
    }

    pub fn partition(&self) -> Partition {
        match self {
            Self::ExactSku { .. } | Self::ExactHandle { .. } => Partition::ExactMatch,
            Self::NameSimilarity { .. } | Self::ModelNumber { .. } => Partition::PotentialDuplicate,
            Self::Unique => Partition::Unique,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    ExactMatch,
    PotentialDuplicate,
    Unique,
}

/// An import record together with its classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classified {
    /// Position of the record in the import batch.
    pub index: usize,
    pub import_record: ProductRecord,
    #[serde(flatten)]
    pub result: MatchResult,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub total_import_products: usize,
    pub total_existing_products: usize,
    pub exact_matches_count: usize,
    pub potential_duplicates_count: usize,
    pub unique_imports_count: usize,
}

impl ReconSummary {
    /// Import records that would be dropped from the filtered export.
    pub fn removed(&self) -> usize {
        self.exact_matches_count + self.potential_duplicates_count
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub engine_version: String,
    pub threshold: f64,
}

/// Every import record lands in exactly one of the three partitions, in
/// import order within each.
#[derive(Debug, Clone, Serialize)]
pub struct ReconOutcome {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub exact_matches: Vec<Classified>,
    pub potential_duplicates: Vec<Classified>,
    pub unique_imports: Vec<Classified>,
}

impl ReconOutcome {
    pub fn has_duplicates(&self) -> bool {
        self.summary.removed() > 0
    }
}
