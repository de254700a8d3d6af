use super::engine::{DiffEngine, SimilarEngine};
use super::types::{DiffError, DiffSegment, OutputLayout, RendererConfig, SegmentKind};
use maud::{Markup, html};
use similar::TextDiff;

/// Annotate a segment sequence with `<ins>`/`<del>`; text is escaped
pub fn segments_to_html(segments: &[DiffSegment]) -> String {
    let markup = html! {
        @for segment in segments {
            @match segment.kind {
                SegmentKind::Inserted => { ins { (segment.text) } }
                SegmentKind::Deleted => { del { (segment.text) } }
                SegmentKind::Unchanged => { (segment.text) }
            }
        }
    };
    markup.into_string()
}

/// Turns a unified diff into markup for direct insertion in a pane
pub trait MarkupRenderer: Send + Sync {
    fn render(&self, unified: &str, config: &RendererConfig) -> Result<String, DiffError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Context,
    Removed,
    Added,
    Empty,
}

impl LineKind {
    fn class(self) -> &'static str {
        match self {
            LineKind::Context => "diff-ctx",
            LineKind::Removed => "diff-del",
            LineKind::Added => "diff-ins",
            LineKind::Empty => "diff-empty",
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            LineKind::Context | LineKind::Empty => " ",
            LineKind::Removed => "-",
            LineKind::Added => "+",
        }
    }
}

#[derive(Debug, Clone)]
struct Cell {
    kind: LineKind,
    number: Option<usize>,
    parts: Vec<DiffSegment>,
}

impl Cell {
    fn empty() -> Self {
        Self {
            kind: LineKind::Empty,
            number: None,
            parts: Vec::new(),
        }
    }

    fn plain(kind: LineKind, number: usize, text: &str) -> Self {
        Self {
            kind,
            number: Some(number),
            parts: vec![DiffSegment::new(SegmentKind::Unchanged, text)],
        }
    }
}

#[derive(Debug, Clone)]
enum Row {
    Context(String),
    Pair(Vec<String>, Vec<String>),
}

/// Built-in renderer producing a side-by-side or inline table
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlDiffRenderer;

impl MarkupRenderer for HtmlDiffRenderer {
    fn render(&self, unified: &str, config: &RendererConfig) -> Result<String, DiffError> {
        let body = hunk_body(unified)?;
        let rows = group_into_rows(&body)?;
        let pairs = layout_rows(&rows, config);

        let markup = match config.layout {
            OutputLayout::SideBySide => side_by_side(&pairs),
            OutputLayout::Inline => inline(&pairs),
        };
        Ok(markup.into_string())
    }
}

/// Lines after the hunk header
fn hunk_body(unified: &str) -> Result<Vec<&str>, DiffError> {
    let mut lines = unified.lines();
    for line in lines.by_ref() {
        if line.starts_with("@@") {
            return Ok(lines.collect());
        }
        if !(line.starts_with("diff ") || line.starts_with("--- ") || line.starts_with("+++ ")) {
            return Err(DiffError::Computation(format!(
                "unexpected line before hunk header: {line}"
            )));
        }
    }
    Err(DiffError::Computation(
        "unified diff has no hunk header".to_string(),
    ))
}

/// Context lines stand alone; a removed block and the added block after it pair up
fn group_into_rows(body: &[&str]) -> Result<Vec<Row>, DiffError> {
    let mut rows = Vec::new();
    let mut removed: Vec<String> = Vec::new();
    let mut added: Vec<String> = Vec::new();

    let flush = |rows: &mut Vec<Row>, removed: &mut Vec<String>, added: &mut Vec<String>| {
        if !removed.is_empty() || !added.is_empty() {
            rows.push(Row::Pair(std::mem::take(removed), std::mem::take(added)));
        }
    };

    for line in body {
        let (prefix, text) = line.split_at(line.chars().next().map_or(0, char::len_utf8));
        match prefix {
            " " | "" => {
                flush(&mut rows, &mut removed, &mut added);
                rows.push(Row::Context(text.to_string()));
            }
            "-" => {
                if !added.is_empty() {
                    flush(&mut rows, &mut removed, &mut added);
                }
                removed.push(text.to_string());
            }
            "+" => added.push(text.to_string()),
            "\\" => {}
            _ => {
                return Err(DiffError::Computation(format!(
                    "unexpected line in hunk: {line}"
                )));
            }
        }
    }
    flush(&mut rows, &mut removed, &mut added);

    Ok(rows)
}

fn should_match(left: &str, right: &str, threshold: f32) -> bool {
    let ratio = TextDiff::from_chars(left, right).ratio();
    1.0 - ratio <= threshold
}

/// Word-level highlight for a matched line pair
fn highlight_pair(left: &str, right: &str) -> (Vec<DiffSegment>, Vec<DiffSegment>) {
    let segments = SimilarEngine
        .compute_word_diff(left, right)
        .unwrap_or_default();
    let old_parts = segments
        .iter()
        .filter(|s| s.kind != SegmentKind::Inserted)
        .cloned()
        .collect();
    let new_parts = segments
        .into_iter()
        .filter(|s| s.kind != SegmentKind::Deleted)
        .collect();
    (old_parts, new_parts)
}

/// Pairings a removed/added block would need stay under the ceiling
fn within_budget(removed: usize, added: usize, max_comparisons: usize) -> bool {
    removed.saturating_mul(added) <= max_comparisons
}

fn layout_rows(rows: &[Row], config: &RendererConfig) -> Vec<(Cell, Cell)> {
    let mut old_no = 0usize;
    let mut new_no = 0usize;
    let mut out = Vec::new();

    for row in rows {
        match row {
            Row::Context(text) => {
                old_no += 1;
                new_no += 1;
                out.push((
                    Cell::plain(LineKind::Context, old_no, text),
                    Cell::plain(LineKind::Context, new_no, text),
                ));
            }
            Row::Pair(removed, added) => {
                let matchable = within_budget(removed.len(), added.len(), config.max_comparisons);
                for i in 0..removed.len().max(added.len()) {
                    let (left, right) = match (removed.get(i), added.get(i)) {
                        (Some(l), Some(r)) => {
                            old_no += 1;
                            new_no += 1;
                            if matchable && should_match(l, r, config.matching_threshold) {
                                let (old_parts, new_parts) = highlight_pair(l, r);
                                (
                                    Cell {
                                        kind: LineKind::Removed,
                                        number: Some(old_no),
                                        parts: old_parts,
                                    },
                                    Cell {
                                        kind: LineKind::Added,
                                        number: Some(new_no),
                                        parts: new_parts,
                                    },
                                )
                            } else {
                                (
                                    Cell::plain(LineKind::Removed, old_no, l),
                                    Cell::plain(LineKind::Added, new_no, r),
                                )
                            }
                        }
                        (Some(l), None) => {
                            old_no += 1;
                            (Cell::plain(LineKind::Removed, old_no, l), Cell::empty())
                        }
                        (None, Some(r)) => {
                            new_no += 1;
                            (Cell::empty(), Cell::plain(LineKind::Added, new_no, r))
                        }
                        (None, None) => continue,
                    };
                    out.push((left, right));
                }
            }
        }
    }

    out
}

fn cell_content(cell: &Cell) -> Markup {
    html! {
        span class="diff-prefix" { (cell.kind.prefix()) }
        span class="diff-text" {
            @for part in &cell.parts {
                @match part.kind {
                    SegmentKind::Inserted => { ins { (part.text) } }
                    SegmentKind::Deleted => { del { (part.text) } }
                    SegmentKind::Unchanged => { (part.text) }
                }
            }
        }
    }
}

fn line_number(number: Option<usize>) -> String {
    number.map(|n| n.to_string()).unwrap_or_default()
}

fn side_by_side(pairs: &[(Cell, Cell)]) -> Markup {
    html! {
        table class="diff-table diff-side-by-side" {
            tbody {
                @for (left, right) in pairs {
                    tr {
                        td class="diff-line-num" { (line_number(left.number)) }
                        td class=(left.kind.class()) { (cell_content(left)) }
                        td class="diff-line-num" { (line_number(right.number)) }
                        td class=(right.kind.class()) { (cell_content(right)) }
                    }
                }
            }
        }
    }
}

fn inline(pairs: &[(Cell, Cell)]) -> Markup {
    // Removed lines of a block come before its added lines
    let mut cells: Vec<(&Cell, Option<usize>, Option<usize>)> = Vec::new();
    let mut pending_added: Vec<&Cell> = Vec::new();

    for (left, right) in pairs {
        if left.kind == LineKind::Context {
            for cell in pending_added.drain(..) {
                cells.push((cell, None, cell.number));
            }
            cells.push((left, left.number, right.number));
            continue;
        }
        if left.kind == LineKind::Removed {
            cells.push((left, left.number, None));
        }
        if right.kind == LineKind::Added {
            pending_added.push(right);
        }
    }
    for cell in pending_added.drain(..) {
        cells.push((cell, None, cell.number));
    }

    html! {
        table class="diff-table diff-inline" {
            tbody {
                @for (cell, old_no, new_no) in &cells {
                    tr {
                        td class="diff-line-num" { (line_number(*old_no)) }
                        td class="diff-line-num" { (line_number(*new_no)) }
                        td class=(cell.kind.class()) { (cell_content(cell)) }
                    }
                }
            }
        }
    }
}
