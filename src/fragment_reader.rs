use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::EngineError;
use crate::model::{BoundingBox, PageFragments, TextFragment};

#[derive(Debug, Deserialize)]
struct RawFragment {
    text: String,
    page: u32,
    bbox: [f32; 4],
    #[serde(default = "default_confidence")]
    confidence: f32,
}

fn default_confidence() -> f32 {
    1.0
}

impl From<RawFragment> for TextFragment {
    fn from(raw: RawFragment) -> Self {
        let [min_x, min_y, max_x, max_y] = raw.bbox;
        Self {
            text: raw.text,
            page: raw.page,
            bbox: BoundingBox::new(min_x, min_y, max_x, max_y),
            confidence: raw.confidence,
        }
    }
}

/// Parses a serialized fragment list (a JSON array of
/// `{text, page, bbox: [x0,y0,x1,y1], confidence?}` records) into
/// page-ordered fragment groups.
pub fn parse_fragments_json(data: &[u8]) -> Result<Vec<PageFragments>, EngineError> {
    let raw: Vec<RawFragment> = serde_json::from_slice(data)?;
    Ok(group_by_page(raw.into_iter().map(Into::into).collect()))
}

pub fn read_fragments_file(path: &Path) -> Result<Vec<PageFragments>, EngineError> {
    let data = std::fs::read(path)?;
    parse_fragments_json(&data)
}

#[must_use]
pub fn group_by_page(fragments: Vec<TextFragment>) -> Vec<PageFragments> {
    let mut pages: BTreeMap<u32, Vec<TextFragment>> = BTreeMap::new();
    for fragment in fragments {
        pages.entry(fragment.page).or_default().push(fragment);
    }

    pages
        .into_iter()
        .map(|(page_number, fragments)| PageFragments {
            page_number,
            fragments,
        })
        .collect()
}
