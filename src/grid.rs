use crate::model::Row;

/// Projects rows onto the shared column anchors, producing one page's grid.
///
/// Each fragment lands in the column of its nearest anchor; fragments of
/// one row that land in the same column are joined left-to-right with a
/// single space. Unclaimed cells stay empty.
pub(crate) fn assemble_grid(rows: &[Row], anchors: &[f32]) -> Vec<Vec<String>> {
    if anchors.is_empty() {
        return rows.iter().map(|_| Vec::new()).collect();
    }

    let mut grid = vec![vec![String::new(); anchors.len()]; rows.len()];
    for (row_idx, row) in rows.iter().enumerate() {
        for fragment in &row.fragments {
            let col_idx = nearest_anchor(anchors, fragment.center_x());
            let cell = &mut grid[row_idx][col_idx];
            if !cell.is_empty() {
                cell.push(' ');
            }
            cell.push_str(&fragment.text);
        }
    }

    grid
}

fn nearest_anchor(anchors: &[f32], x: f32) -> usize {
    let mut best = 0;
    let mut best_distance = f32::INFINITY;
    for (idx, anchor) in anchors.iter().enumerate() {
        let distance = (x - anchor).abs();
        if distance < best_distance {
            best_distance = distance;
            best = idx;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::{assemble_grid, nearest_anchor};
    use crate::model::{BoundingBox, Row, TextFragment};

    fn fragment_at(text: &str, x: f32, y: f32) -> TextFragment {
        TextFragment {
            text: text.to_string(),
            page: 1,
            bbox: BoundingBox::new(x - 1.0, y - 1.0, x + 1.0, y + 1.0),
            confidence: 1.0,
        }
    }

    fn row_of(fragments: Vec<TextFragment>, center_y: f32) -> Row {
        Row {
            center_y,
            fragments,
        }
    }

    #[test]
    fn nearest_anchor_prefers_lowest_index_on_tie() {
        assert_eq!(nearest_anchor(&[10.0, 20.0], 15.0), 0);
    }

    #[test]
    fn same_cell_fragments_join_with_one_space() {
        let rows = vec![
            row_of(
                vec![fragment_at("日期", 10.0, 0.0), fragment_at("期", 14.0, 0.0)],
                0.0,
            ),
            row_of(vec![fragment_at("9/15", 12.0, 20.0)], 20.0),
        ];
        let anchors = vec![10.0];

        let grid = assemble_grid(&rows, &anchors);
        assert_eq!(grid[0][0], "日期 期");
        assert_eq!(grid[1][0], "9/15");
    }

    #[test]
    fn unclaimed_cells_stay_empty() {
        let rows = vec![
            row_of(
                vec![
                    fragment_at("a", 10.0, 0.0),
                    fragment_at("b", 120.0, 0.0),
                    fragment_at("c", 240.0, 0.0),
                ],
                0.0,
            ),
            row_of(vec![fragment_at("d", 241.0, 20.0)], 20.0),
        ];
        let anchors = vec![10.0, 120.0, 240.0];

        let grid = assemble_grid(&rows, &anchors);
        assert_eq!(grid[1], vec!["", "", "d"]);
    }

    #[test]
    fn grid_dimensions_match_rows_and_anchors() {
        let rows = vec![
            row_of(vec![fragment_at("a", 0.0, 0.0)], 0.0),
            row_of(vec![fragment_at("b", 0.0, 20.0)], 20.0),
        ];
        let grid = assemble_grid(&rows, &[0.0, 100.0, 200.0]);
        assert_eq!(grid.len(), 2);
        assert!(grid.iter().all(|row| row.len() == 3));
    }
}
