use tracing::debug;

use crate::model::Table;
use crate::options::BoundaryMergeOptions;

/// Folds a stream of per-page tables, splicing a table that a page break
/// cut in two back into one logical table.
///
/// The merger holds at most one candidate table. Each incoming table is
/// either absorbed into the candidate (when the boundary rows look like a
/// split cell) or becomes the new candidate while the previous one is
/// emitted. Feeding the merger its own output changes nothing.
#[derive(Debug)]
pub struct BoundaryMerger<'a> {
    options: &'a BoundaryMergeOptions,
    held: Option<Table>,
    merges: Vec<(u32, u32)>,
}

impl<'a> BoundaryMerger<'a> {
    #[must_use]
    pub fn new(options: &'a BoundaryMergeOptions) -> Self {
        Self {
            options,
            held: None,
            merges: Vec::new(),
        }
    }

    /// Offers the next page's table; returns a finished table when the
    /// previously-held candidate is not continued by this one.
    pub fn push(&mut self, table: Table) -> Option<Table> {
        let Some(mut held) = self.held.take() else {
            self.held = Some(table);
            return None;
        };

        if should_merge(&held, &table, self.options) {
            let boundary = (held.last_page, table.first_page);
            debug!(
                tail_page = boundary.0,
                head_page = boundary.1,
                "boundary merge applied"
            );
            splice(&mut held, table);
            self.merges.push(boundary);
            self.held = Some(held);
            None
        } else {
            self.held = Some(table);
            Some(held)
        }
    }

    /// Emits the table still held at end of stream, if any.
    pub fn finish(&mut self) -> Option<Table> {
        self.held.take()
    }

    /// Page pairs (tail page, head page) that were spliced so far.
    #[must_use]
    pub fn merges(&self) -> &[(u32, u32)] {
        &self.merges
    }
}

fn should_merge(held: &Table, next: &Table, options: &BoundaryMergeOptions) -> bool {
    // Only a table starting right after the held one can have been cut by
    // the page break between them.
    if next.first_page != held.last_page.saturating_add(1) {
        return false;
    }

    let Some(tail_row) = held.rows.last() else {
        return false;
    };
    let Some(head_row) = next.rows.first() else {
        return false;
    };
    let Some(tail_cell) = tail_row.iter().rev().find(|cell| !cell.is_empty()) else {
        return false;
    };
    let Some(head_cell) = head_row.iter().find(|cell| !cell.is_empty()) else {
        return false;
    };

    let tail_cells = tail_row.iter().filter(|cell| !cell.is_empty()).count();
    let tail_is_degenerate = tail_cells <= options.degenerate_tail_cells;
    let tail_is_short = tail_cell.chars().count() <= options.max_splice_chars;
    if !(tail_is_degenerate || tail_is_short) {
        return false;
    }
    if tail_cell
        .chars()
        .next_back()
        .is_some_and(|ch| options.closing_punctuation.contains(&ch))
    {
        return false;
    }

    if head_cell.chars().count() > options.max_splice_chars {
        return false;
    }
    if head_cell
        .chars()
        .next()
        .is_some_and(|ch| options.opening_punctuation.contains(&ch))
    {
        return false;
    }

    true
}

fn splice(held: &mut Table, next: Table) {
    let Table {
        mut rows,
        last_page,
        confidence,
        ..
    } = next;
    if rows.is_empty() {
        return;
    }
    let head_row = rows.remove(0);

    if let Some(tail_row) = held.rows.last_mut() {
        let tail_idx = tail_row
            .iter()
            .rposition(|cell| !cell.is_empty())
            .unwrap_or(0);
        let head_idx = head_row
            .iter()
            .position(|cell| !cell.is_empty())
            .unwrap_or(head_row.len());

        tail_row.truncate(tail_idx + 1);
        for (offset, cell) in head_row.into_iter().skip(head_idx).enumerate() {
            if offset == 0 {
                if let Some(last) = tail_row.last_mut() {
                    // The split cell is rejoined without a separator.
                    last.push_str(&cell);
                }
            } else {
                tail_row.push(cell);
            }
        }
    }

    held.rows.extend(rows);
    held.last_page = last_page;
    held.confidence = held.confidence.min(confidence);
    normalize_row_widths(&mut held.rows);
}

fn normalize_row_widths(rows: &mut [Vec<String>]) {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in rows {
        row.resize(width, String::new());
    }
}
