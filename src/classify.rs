use tracing::debug;

use crate::columns::column_anchors;
use crate::grid::assemble_grid;
use crate::model::{PageFragments, Table, TextFragment};
use crate::options::EngineOptions;
use crate::rows::cluster_rows;

pub(crate) const LOW_CONFIDENCE_THRESHOLD: f32 = 0.60;

#[derive(Debug)]
pub(crate) struct ClassifiedPage {
    pub table: Table,
    pub tier_index: usize,
}

/// Runs the row/column/grid pipeline at each tolerance tier in turn and
/// accepts the first tier whose grid meets the minimum dimensions. A page
/// where no tier fits is not a table.
pub(crate) fn classify_page(
    page: &PageFragments,
    options: &EngineOptions,
) -> Option<ClassifiedPage> {
    if page.fragments.is_empty() {
        return None;
    }

    for (tier_index, tier) in options.tiers.iter().enumerate() {
        let rows = cluster_rows(&page.fragments, tier.row_tolerance);
        let anchors = column_anchors(&page.fragments, tier.col_tolerance);
        if rows.len() < options.min_rows || anchors.len() < options.min_cols {
            continue;
        }

        let grid = assemble_grid(&rows, &anchors);
        let confidence = table_confidence(&grid, &page.fragments);
        debug!(
            page = page.page_number,
            tier = tier_index,
            rows = grid.len(),
            cols = anchors.len(),
            confidence,
            "tier accepted"
        );

        return Some(ClassifiedPage {
            table: Table {
                rows: grid,
                first_page: page.page_number,
                last_page: page.page_number,
                confidence,
            },
            tier_index,
        });
    }

    None
}

fn table_confidence(grid: &[Vec<String>], fragments: &[TextFragment]) -> f32 {
    let total_cells = grid.len() * grid.first().map_or(0, Vec::len);
    if total_cells == 0 || fragments.is_empty() {
        return 0.0;
    }

    let filled = grid
        .iter()
        .flatten()
        .filter(|cell| !cell.is_empty())
        .count();
    let fill_ratio = filled as f32 / total_cells as f32;
    let mean_confidence =
        fragments.iter().map(|f| f.confidence).sum::<f32>() / fragments.len() as f32;

    (fill_ratio * 0.75 + mean_confidence * 0.25).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::{classify_page, table_confidence};
    use crate::model::{BoundingBox, PageFragments, TextFragment};
    use crate::options::{EngineOptions, ToleranceTier};

    fn fragment_at(text: &str, x: f32, y: f32) -> TextFragment {
        TextFragment {
            text: text.to_string(),
            page: 1,
            bbox: BoundingBox::new(x - 1.0, y - 1.0, x + 1.0, y + 1.0),
            confidence: 1.0,
        }
    }

    fn grid_page() -> PageFragments {
        PageFragments {
            page_number: 1,
            fragments: vec![
                fragment_at("a", 0.0, 0.0),
                fragment_at("b", 120.0, 0.0),
                fragment_at("c", 0.0, 40.0),
                fragment_at("d", 120.0, 40.0),
            ],
        }
    }

    #[test]
    fn accepts_first_fitting_tier() {
        let classified = classify_page(&grid_page(), &EngineOptions::default())
            .expect("grid page should classify");
        assert_eq!(classified.tier_index, 0);
        assert_eq!(classified.table.num_rows(), 2);
        assert_eq!(classified.table.num_cols(), 2);
    }

    #[test]
    fn falls_through_to_a_tier_that_meets_minimums() {
        // A first tier so loose it collapses both columns into one anchor.
        let options = EngineOptions {
            tiers: vec![
                ToleranceTier::new(3.0, 1000.0),
                ToleranceTier::new(3.0, 10.0),
            ],
            ..EngineOptions::default()
        };

        let classified =
            classify_page(&grid_page(), &options).expect("second tier should be accepted");
        assert_eq!(classified.tier_index, 1);
    }

    #[test]
    fn single_line_page_is_not_a_table() {
        let page = PageFragments {
            page_number: 1,
            fragments: vec![fragment_at("just", 0.0, 0.0), fragment_at("text", 120.0, 0.0)],
        };
        assert!(classify_page(&page, &EngineOptions::default()).is_none());
    }

    #[test]
    fn empty_page_yields_no_table() {
        let page = PageFragments {
            page_number: 3,
            fragments: Vec::new(),
        };
        assert!(classify_page(&page, &EngineOptions::default()).is_none());
    }

    #[test]
    fn full_grid_scores_higher_than_sparse_grid() {
        let fragments = vec![fragment_at("a", 0.0, 0.0)];
        let full = vec![vec!["a".to_string(), "b".to_string()]];
        let sparse = vec![vec!["a".to_string(), String::new()]];
        assert!(table_confidence(&full, &fragments) > table_confidence(&sparse, &fragments));
    }
}
