use std::path::Path;

use gridstitch::{BoundingBox, PageFragments, TextFragment};

pub fn fragment(text: &str, page: u32, x: f32, y: f32) -> TextFragment {
    TextFragment {
        text: text.to_string(),
        page,
        bbox: BoundingBox::new(x - 10.0, y - 6.0, x + 10.0, y + 6.0),
        confidence: 1.0,
    }
}

pub fn page(page_number: u32, fragments: Vec<TextFragment>) -> PageFragments {
    PageFragments {
        page_number,
        fragments,
    }
}

/// Lays out `texts` row-major on a perfect grid with the given spacing;
/// empty strings leave the cell unoccupied.
pub fn grid_fragments(
    page: u32,
    texts: &[&[&str]],
    row_step: f32,
    col_step: f32,
) -> Vec<TextFragment> {
    let mut fragments = Vec::new();
    for (row_idx, row) in texts.iter().enumerate() {
        for (col_idx, text) in row.iter().enumerate() {
            if text.is_empty() {
                continue;
            }
            fragments.push(fragment(
                text,
                page,
                col_idx as f32 * col_step,
                row_idx as f32 * row_step,
            ));
        }
    }
    fragments
}

pub fn write_fixture_json(
    path: &Path,
    fragments: &[TextFragment],
) -> Result<(), Box<dyn std::error::Error>> {
    let records: Vec<serde_json::Value> = fragments
        .iter()
        .map(|fragment| {
            serde_json::json!({
                "text": fragment.text,
                "page": fragment.page,
                "bbox": [
                    fragment.bbox.min_x,
                    fragment.bbox.min_y,
                    fragment.bbox.max_x,
                    fragment.bbox.max_y,
                ],
                "confidence": fragment.confidence,
            })
        })
        .collect();

    std::fs::write(path, serde_json::to_vec_pretty(&records)?)?;
    Ok(())
}
