mod boundary;
mod classify;
mod columns;
mod csv_out;
mod error;
pub mod fragment_reader;
mod grid;
mod model;
mod options;
mod rows;
mod warning;

use std::path::Path;

use tracing::debug;

use crate::classify::{LOW_CONFIDENCE_THRESHOLD, classify_page};

pub use boundary::BoundaryMerger;
pub use error::EngineError;
pub use model::{BoundingBox, MergedOutput, PageFragments, Row, Table, TextFragment};
pub use options::{
    BoundaryMergeOptions, CsvOptions, EngineOptions, HeaderMode, QualityMode, ToleranceTier,
};
pub use warning::{ReconstructWarning, WarningCode};

#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructionReport {
    pub table_count: usize,
    pub row_count: usize,
    pub discarded_fragments: usize,
    pub warnings: Vec<ReconstructWarning>,
}

/// Reconstructs tables from page-ordered fragment groups.
///
/// Each page is classified independently; the resulting per-page tables
/// are folded through the boundary merger in document order, then policed
/// by the configured quality mode.
pub fn reconstruct_tables(
    pages: &[PageFragments],
    options: &EngineOptions,
) -> Result<(Vec<Table>, ReconstructionReport), EngineError> {
    options.validate()?;

    let mut warnings = Vec::new();
    let mut discarded_fragments = 0_usize;
    let mut merger = BoundaryMerger::new(&options.boundary);
    let mut tables = Vec::new();

    for page in pages {
        let (kept, discarded) = drop_malformed(page);
        if discarded > 0 {
            discarded_fragments += discarded;
            debug!(
                page = page.page_number,
                discarded, "dropped malformed fragments"
            );
            warnings.push(
                ReconstructWarning::new(
                    WarningCode::MalformedFragments,
                    "dropped fragments with malformed geometry",
                )
                .with_page(page.page_number)
                .with_count(discarded),
            );
        }
        if kept.fragments.is_empty() {
            continue;
        }

        let Some(classified) = classify_page(&kept, options) else {
            warnings.push(
                ReconstructWarning::new(
                    WarningCode::NonTabularPage,
                    "no tolerance tier produced an acceptable grid; treating page as prose",
                )
                .with_page(page.page_number),
            );
            continue;
        };

        if classified.tier_index > 0 {
            warnings.push(
                ReconstructWarning::new(
                    WarningCode::LooseTierAccepted,
                    "a later tolerance tier was needed to form a grid",
                )
                .with_page(page.page_number)
                .with_tier(classified.tier_index),
            );
        }

        if let Some(finished) = merger.push(classified.table) {
            tables.push(finished);
        }
    }

    if let Some(finished) = merger.finish() {
        tables.push(finished);
    }
    for (tail_page, head_page) in merger.merges() {
        warnings.push(
            ReconstructWarning::new(
                WarningCode::BoundaryMergeApplied,
                format!("stitched a table split across pages {tail_page}-{head_page}"),
            )
            .with_page(*tail_page),
        );
    }

    let tables = apply_quality_mode(tables, options, &mut warnings)?;
    let row_count = tables.iter().map(Table::num_rows).sum();
    let report = ReconstructionReport {
        table_count: tables.len(),
        row_count,
        discarded_fragments,
        warnings,
    };

    Ok((tables, report))
}

/// Reconstructs tables and renders them as one CSV document.
pub fn reconstruct_to_csv_string(
    pages: &[PageFragments],
    options: &EngineOptions,
    csv_options: &CsvOptions,
) -> Result<(String, ReconstructionReport), EngineError> {
    let (tables, mut report) = reconstruct_tables(pages, options)?;
    let merged = csv_out::merge_tables(&tables, csv_options, &mut report.warnings);
    report.row_count = merged.row_count;
    let csv = csv_out::write_csv_to_string(&merged, csv_options.delimiter)?;
    Ok((csv, report))
}

pub fn reconstruct_to_csv_file(
    pages: &[PageFragments],
    output_csv: &Path,
    options: &EngineOptions,
    csv_options: &CsvOptions,
) -> Result<ReconstructionReport, EngineError> {
    let (tables, mut report) = reconstruct_tables(pages, options)?;
    let merged = csv_out::merge_tables(&tables, csv_options, &mut report.warnings);
    report.row_count = merged.row_count;
    csv_out::write_csv(output_csv, &merged, csv_options.delimiter)?;
    Ok(report)
}

fn drop_malformed(page: &PageFragments) -> (PageFragments, usize) {
    let kept: Vec<TextFragment> = page
        .fragments
        .iter()
        .filter(|fragment| fragment.is_well_formed())
        .cloned()
        .collect();
    let discarded = page.fragments.len() - kept.len();
    (
        PageFragments {
            page_number: page.page_number,
            fragments: kept,
        },
        discarded,
    )
}

fn apply_quality_mode(
    tables: Vec<Table>,
    options: &EngineOptions,
    warnings: &mut Vec<ReconstructWarning>,
) -> Result<Vec<Table>, EngineError> {
    let mut out = Vec::new();

    for table in tables {
        if table.confidence >= LOW_CONFIDENCE_THRESHOLD {
            out.push(table);
            continue;
        }

        match options.quality_mode {
            QualityMode::BestEffort => {
                warnings.push(
                    ReconstructWarning::new(
                        WarningCode::LowConfidence,
                        "table confidence is low; kept in best-effort mode",
                    )
                    .with_page(table.first_page)
                    .with_confidence(table.confidence),
                );
                out.push(table);
            }
            QualityMode::Strict => {
                return Err(EngineError::AmbiguousTable {
                    first_page: table.first_page,
                    last_page: table.last_page,
                    confidence: table.confidence,
                });
            }
            QualityMode::SkipAmbiguous => {
                warnings.push(
                    ReconstructWarning::new(
                        WarningCode::LowConfidence,
                        "skipping low-confidence table",
                    )
                    .with_page(table.first_page)
                    .with_confidence(table.confidence),
                );
            }
        }
    }

    Ok(out)
}
