use std::str::FromStr;

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToleranceTier {
    pub row_tolerance: f32,
    pub col_tolerance: f32,
}

impl ToleranceTier {
    #[must_use]
    pub const fn new(row_tolerance: f32, col_tolerance: f32) -> Self {
        Self {
            row_tolerance,
            col_tolerance,
        }
    }
}

impl FromStr for ToleranceTier {
    type Err = String;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let (row_part, col_part) = spec
            .split_once(',')
            .ok_or_else(|| format!("invalid tier format '{spec}', expected row_tol,col_tol"))?;

        let row_tolerance: f32 = row_part
            .trim()
            .parse()
            .map_err(|_| format!("invalid row tolerance: '{row_part}'"))?;
        let col_tolerance: f32 = col_part
            .trim()
            .parse()
            .map_err(|_| format!("invalid column tolerance: '{col_part}'"))?;

        if !(row_tolerance.is_finite() && row_tolerance > 0.0) {
            return Err(format!("row tolerance must be positive: '{row_part}'"));
        }
        if !(col_tolerance.is_finite() && col_tolerance > 0.0) {
            return Err(format!("column tolerance must be positive: '{col_part}'"));
        }

        Ok(Self {
            row_tolerance,
            col_tolerance,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityMode {
    BestEffort,
    Strict,
    SkipAmbiguous,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryMergeOptions {
    /// Longest cell text (in chars) still considered a truncated stub.
    pub max_splice_chars: usize,
    /// A tail row with at most this many non-empty cells is degenerate.
    pub degenerate_tail_cells: usize,
    /// Characters that, at the end of a tail cell, block the merge.
    pub closing_punctuation: Vec<char>,
    /// Characters that, at the start of a head cell, block the merge.
    pub opening_punctuation: Vec<char>,
}

impl Default for BoundaryMergeOptions {
    fn default() -> Self {
        Self {
            max_splice_chars: 12,
            degenerate_tail_cells: 1,
            closing_punctuation: vec!['。', '．', '.', '!', '！', '?', '？', ';', '；'],
            opening_punctuation: vec![
                '。', '，', ',', '、', ';', '；', ':', '：', '!', '！', '?', '？', ')', '）',
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    /// Tolerance tiers tried in order; by convention ascending looseness.
    pub tiers: Vec<ToleranceTier>,
    pub min_rows: usize,
    pub min_cols: usize,
    pub quality_mode: QualityMode,
    pub boundary: BoundaryMergeOptions,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            tiers: vec![
                ToleranceTier::new(3.0, 10.0),
                ToleranceTier::new(6.0, 20.0),
                ToleranceTier::new(12.0, 36.0),
            ],
            min_rows: 2,
            min_cols: 2,
            quality_mode: QualityMode::BestEffort,
            boundary: BoundaryMergeOptions::default(),
        }
    }
}

impl EngineOptions {
    pub(crate) fn validate(&self) -> Result<(), EngineError> {
        if self.tiers.is_empty() {
            return Err(EngineError::InvalidOption(
                "at least one tolerance tier is required".to_string(),
            ));
        }
        for (index, tier) in self.tiers.iter().enumerate() {
            if !(tier.row_tolerance.is_finite() && tier.row_tolerance > 0.0) {
                return Err(EngineError::InvalidOption(format!(
                    "tier {index}: row tolerance must be positive and finite"
                )));
            }
            if !(tier.col_tolerance.is_finite() && tier.col_tolerance > 0.0) {
                return Err(EngineError::InvalidOption(format!(
                    "tier {index}: column tolerance must be positive and finite"
                )));
            }
        }
        if self.min_rows < 1 {
            return Err(EngineError::InvalidOption(
                "min_rows must be at least 1".to_string(),
            ));
        }
        if self.min_cols < 1 {
            return Err(EngineError::InvalidOption(
                "min_cols must be at least 1".to_string(),
            ));
        }
        if self.boundary.max_splice_chars == 0 {
            return Err(EngineError::InvalidOption(
                "max_splice_chars must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMode {
    AutoDetect,
    HasHeader,
    NoHeader,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub header_mode: HeaderMode,
    pub include_page: bool,
    pub include_table_id: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            header_mode: HeaderMode::AutoDetect,
            include_page: true,
            include_table_id: true,
        }
    }
}
