//! Plain-text duplicate report.

use crate::model::{ProductRecord, ReconOutcome};

fn display_name(record: &ProductRecord) -> String {
    let name = record.name();
    if name.is_empty() {
        "Unknown".to_string()
    } else {
        name
    }
}

/// Render the report: summary, exact matches, potential duplicates, unique
/// products. The two match sections are left out when empty.
pub fn render_report(outcome: &ReconOutcome) -> String {
    let mut out = String::new();
    out.push_str("Product Duplicate Detection Report\n");
    out.push_str(&format!("{}\n\n", "=".repeat(50)));

    let s = &outcome.summary;
    out.push_str("SUMMARY\n");
    out.push_str(&format!("{}\n", "-".repeat(20)));
    out.push_str(&format!("Total products to import: {}\n", s.total_import_products));
    out.push_str(&format!("Total existing products: {}\n", s.total_existing_products));
    out.push_str(&format!("Exact matches (duplicates): {}\n", s.exact_matches_count));
    out.push_str(&format!("Potential duplicates: {}\n", s.potential_duplicates_count));
    out.push_str(&format!("Unique products to import: {}\n\n", s.unique_imports_count));

    if !outcome.exact_matches.is_empty() {
        out.push_str("EXACT MATCHES (Skip These)\n");
        out.push_str(&format!("{}\n", "-".repeat(30)));
        for m in &outcome.exact_matches {
            let kind = m
                .result
                .match_type()
                .map_or_else(String::new, |t| t.to_string());
            out.push_str(&format!("- {} ({kind})\n", display_name(&m.import_record)));
        }
        out.push('\n');
    }

    if !outcome.potential_duplicates.is_empty() {
        out.push_str("POTENTIAL DUPLICATES (Review These)\n");
        out.push_str(&format!("{}\n", "-".repeat(40)));
        for m in &outcome.potential_duplicates {
            out.push_str(&format!("Import: {}\n", display_name(&m.import_record)));
            if let Some(existing) = m.result.matched_record() {
                out.push_str(&format!("Existing: {}\n", display_name(existing)));
            }
            if let Some(kind) = m.result.match_type() {
                out.push_str(&format!("Match Type: {kind}\n"));
            }
            let score = m.result.similarity_score();
            if score > 0.0 {
                out.push_str(&format!("Similarity: {:.2}%\n", score * 100.0));
            }
            out.push('\n');
        }
    }

    out.push_str("UNIQUE PRODUCTS (Safe to Import)\n");
    out.push_str(&format!("{}\n", "-".repeat(35)));
    for m in &outcome.unique_imports {
        out.push_str(&format!("- {}\n", display_name(&m.import_record)));
    }

    out
}
