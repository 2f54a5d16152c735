use crate::model::TextFragment;

/// Derives a page-wide ascending set of column anchor X positions.
///
/// Every fragment's `center_x` is a candidate; a candidate within
/// `col_tolerance` (inclusive) of an already-accepted anchor is absorbed
/// by it, so misaligned rows still project onto one shared grid.
pub(crate) fn column_anchors(fragments: &[TextFragment], col_tolerance: f32) -> Vec<f32> {
    let mut centers: Vec<f32> = fragments.iter().map(TextFragment::center_x).collect();
    centers.sort_by(f32::total_cmp);

    let mut anchors: Vec<f32> = Vec::new();
    for x in centers {
        match anchors.last() {
            Some(&last) if x - last <= col_tolerance => {}
            _ => anchors.push(x),
        }
    }

    anchors
}
