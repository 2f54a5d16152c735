use crate::model::{Row, TextFragment};

/// Groups one page's fragments into reading-order rows.
///
/// Fragments are scanned in ascending `center_y` order and joined to the
/// running cluster while they stay within `row_tolerance` of its
/// incrementally-updated mean Y (inclusive bound).
pub(crate) fn cluster_rows(fragments: &[TextFragment], row_tolerance: f32) -> Vec<Row> {
    let mut sorted = fragments.to_vec();
    sorted.sort_by(|a, b| a.center_y().total_cmp(&b.center_y()));

    let mut rows = Vec::new();
    let mut current: Vec<TextFragment> = Vec::new();
    let mut mean_y = 0.0_f32;

    for fragment in sorted {
        let y = fragment.center_y();
        if current.is_empty() {
            mean_y = y;
            current.push(fragment);
            continue;
        }

        if (y - mean_y).abs() <= row_tolerance {
            current.push(fragment);
            mean_y += (y - mean_y) / current.len() as f32;
        } else {
            rows.push(close_row(std::mem::take(&mut current), mean_y));
            mean_y = y;
            current.push(fragment);
        }
    }

    if !current.is_empty() {
        rows.push(close_row(current, mean_y));
    }

    rows
}

fn close_row(mut fragments: Vec<TextFragment>, mean_y: f32) -> Row {
    fragments.sort_by(|a, b| a.center_x().total_cmp(&b.center_x()));
    Row {
        center_y: mean_y,
        fragments,
    }
}
