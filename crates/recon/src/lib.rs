//! `shelfcheck-recon`: duplicate detection for catalog imports.
//!
//! Pure engine crate: receives pre-loaded product records, returns each
//! import record classified as an exact match, a potential duplicate, or
//! unique. Parses and renders text; performs no file or network IO.

pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod model;
pub mod model_token;
pub mod normalize;
pub mod report;
pub mod similarity;
pub mod source;

pub use config::ReconConfig;
pub use engine::{run, Reconciler};
pub use error::ReconError;
pub use model::{Classified, MatchResult, MatchType, ProductRecord, ReconOutcome, ReconSummary};
pub use source::{load_records, InputFormat, RecordSet};
