use log::{debug, info, warn};

use crate::classify::{classify, DestinationIndex};
use crate::config::ReconConfig;
use crate::error::ReconError;
use crate::model::{Classified, Partition, ProductRecord, ReconMeta, ReconOutcome, ReconSummary};
use crate::model_token::ModelExtractor;
use crate::normalize::NameNormalizer;

/// Run duplicate detection per config. Returns the partitioned outcome.
pub fn run(
    config: &ReconConfig,
    import_records: &[ProductRecord],
    destination_records: &[ProductRecord],
) -> Result<ReconOutcome, ReconError> {
    let reconciler = Reconciler::new(config)?;
    Ok(reconciler.reconcile(import_records, destination_records))
}

/// Compiled form of a [`ReconConfig`], reusable across batches.
#[derive(Debug, Clone)]
pub struct Reconciler {
    normalizer: NameNormalizer,
    extractor: ModelExtractor,
    threshold: f64,
}

impl Reconciler {
    pub fn new(config: &ReconConfig) -> Result<Self, ReconError> {
        config.validate()?;
        Ok(Self {
            normalizer: NameNormalizer::new(&config.normalize),
            extractor: ModelExtractor::new(&config.model)?,
            threshold: config.threshold,
        })
    }

    pub fn index<'a>(&self, destination_records: &'a [ProductRecord]) -> DestinationIndex<'a> {
        DestinationIndex::build(destination_records, &self.normalizer, &self.extractor)
    }

    /// Lazily classify import records in order. Each item is independent,
    /// so a caller can stop iterating at any point and keep what it has.
    pub fn classify_all<'a>(
        &'a self,
        import_records: &'a [ProductRecord],
        index: &'a DestinationIndex<'a>,
    ) -> impl Iterator<Item = Classified> + 'a {
        import_records.iter().enumerate().map(move |(i, record)| {
            if record.name().is_empty() {
                warn!("import record {i} has no name/title; only exact keys can match it");
            }
            let result = classify(record, index, &self.normalizer, &self.extractor, self.threshold);
            debug!(
                "import record {i}: {} (score {:.4})",
                result
                    .match_type()
                    .map_or_else(|| "unique".to_string(), |t| t.to_string()),
                result.similarity_score(),
            );
            Classified {
                index: i,
                import_record: record.clone(),
                result,
            }
        })
    }

    /// Classify every import record and partition the results.
    ///
    /// Cost is O(I x D) name comparisons in the worst case; destination
    /// names and tokens are normalized once up front.
    pub fn reconcile(
        &self,
        import_records: &[ProductRecord],
        destination_records: &[ProductRecord],
    ) -> ReconOutcome {
        let index = self.index(destination_records);

        let mut exact_matches = Vec::new();
        let mut potential_duplicates = Vec::new();
        let mut unique_imports = Vec::new();

        for classified in self.classify_all(import_records, &index) {
            match classified.result.partition() {
                Partition::ExactMatch => exact_matches.push(classified),
                Partition::PotentialDuplicate => potential_duplicates.push(classified),
                Partition::Unique => unique_imports.push(classified),
            }
        }

        let summary = ReconSummary {
            total_import_products: import_records.len(),
            total_existing_products: destination_records.len(),
            exact_matches_count: exact_matches.len(),
            potential_duplicates_count: potential_duplicates.len(),
            unique_imports_count: unique_imports.len(),
        };

        info!(
            "reconciled {} import(s) against {} existing: {} exact, {} potential, {} unique",
            summary.total_import_products,
            summary.total_existing_products,
            summary.exact_matches_count,
            summary.potential_duplicates_count,
            summary.unique_imports_count,
        );

        ReconOutcome {
            meta: ReconMeta {
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                threshold: self.threshold,
            },
            summary,
            exact_matches,
            potential_duplicates,
            unique_imports,
        }
    }
}
