use std::path::Path;

use csv::WriterBuilder;

use crate::error::EngineError;
use crate::model::{MergedOutput, Table};
use crate::options::{CsvOptions, HeaderMode};
use crate::warning::{ReconstructWarning, WarningCode};

const HEADER_CONFIDENCE_CUTOFF: f32 = 0.55;

pub(crate) fn merge_tables(
    tables: &[Table],
    options: &CsvOptions,
    warnings: &mut Vec<ReconstructWarning>,
) -> MergedOutput {
    let width = tables.iter().map(Table::num_cols).max().unwrap_or(0);

    let mut headers = Vec::new();
    if options.include_page {
        headers.push("page".to_string());
    }
    if options.include_table_id {
        headers.push("table_id".to_string());
    }
    headers.extend((1..=width).map(|index| format!("col_{index}")));

    let mut rows = Vec::new();
    for (index, table) in tables.iter().enumerate() {
        let table_id = index + 1;
        let label = page_label(table);
        for mut data_row in apply_header_mode(table, options.header_mode, warnings, table_id) {
            let mut row = Vec::with_capacity(width + 2);
            if options.include_page {
                row.push(label.clone());
            }
            if options.include_table_id {
                row.push(table_id.to_string());
            }
            data_row.resize(width, String::new());
            row.extend(data_row);
            rows.push(row);
        }
    }

    MergedOutput {
        headers,
        row_count: rows.len(),
        table_count: tables.len(),
        rows,
    }
}

fn page_label(table: &Table) -> String {
    if table.spans_pages() {
        format!("{}-{}", table.first_page, table.last_page)
    } else {
        table.first_page.to_string()
    }
}

fn is_numeric(value: &str) -> bool {
    let trimmed = value.trim().replace(',', "");
    trimmed.parse::<f64>().is_ok()
}

fn non_numeric_ratio(cells: &[String]) -> f32 {
    if cells.is_empty() {
        return 0.0;
    }

    let non_numeric = cells.iter().filter(|cell| !is_numeric(cell)).count();
    non_numeric as f32 / cells.len() as f32
}

pub(crate) fn infer_has_header(rows: &[Vec<String>]) -> (bool, f32) {
    if rows.is_empty() {
        return (false, 0.0);
    }

    let first = non_numeric_ratio(&rows[0]);
    let second = rows.get(1).map_or(0.0, |row| non_numeric_ratio(row));

    let confidence = (first * 0.6 + (1.0 - second) * 0.4).clamp(0.0, 1.0);
    let has_header = first >= 0.6 && second <= 0.7;
    (has_header, confidence)
}

fn apply_header_mode(
    table: &Table,
    mode: HeaderMode,
    warnings: &mut Vec<ReconstructWarning>,
    table_id: usize,
) -> Vec<Vec<String>> {
    if table.rows.is_empty() {
        return Vec::new();
    }

    match mode {
        HeaderMode::HasHeader => table.rows.iter().skip(1).cloned().collect(),
        HeaderMode::NoHeader => table.rows.clone(),
        HeaderMode::AutoDetect => {
            let (has_header, confidence) = infer_has_header(&table.rows);
            if has_header && confidence >= HEADER_CONFIDENCE_CUTOFF {
                return table.rows.iter().skip(1).cloned().collect();
            }

            if confidence < HEADER_CONFIDENCE_CUTOFF {
                warnings.push(
                    ReconstructWarning::new(
                        WarningCode::HeaderInferenceLowConfidence,
                        "header inference confidence is low; keeping the first row as data",
                    )
                    .with_page(table.first_page)
                    .with_table_id(table_id)
                    .with_confidence(confidence),
                );
            }

            table.rows.clone()
        }
    }
}

pub(crate) fn write_csv(
    path: &Path,
    merged: &MergedOutput,
    delimiter: u8,
) -> Result<(), EngineError> {
    let mut writer = WriterBuilder::new().delimiter(delimiter).from_path(path)?;
    writer.write_record(&merged.headers)?;
    for row in &merged.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub(crate) fn write_csv_to_string(
    merged: &MergedOutput,
    delimiter: u8,
) -> Result<String, EngineError> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::<u8>::new());
    writer.write_record(&merged.headers)?;
    for row in &merged.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    let bytes = writer
        .into_inner()
        .map_err(|error| EngineError::Csv(error.into_error().into()))?;
    String::from_utf8(bytes)
        .map_err(|error| EngineError::InvalidOption(format!("invalid utf-8 csv output: {error}")))
}
