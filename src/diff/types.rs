use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiffError {
    #[error("Diff library not loaded. Please refresh the page and try again.")]
    EngineUnavailable,

    #[error("Diff library API not compatible: {0}")]
    IncompatibleEngine(String),

    #[error("{0}")]
    Computation(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Unchanged,
    Inserted,
    Deleted,
}

/// One run of text from the diff. Unchanged + Deleted rebuild the old text,
/// Unchanged + Inserted rebuild the new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSegment {
    pub kind: SegmentKind,
    pub text: String,
}

impl DiffSegment {
    pub fn new(kind: SegmentKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn is_change(&self) -> bool {
        self.kind != SegmentKind::Unchanged
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    #[default]
    Word,
    Char,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputLayout {
    #[default]
    SideBySide,
    Inline,
}

/// How the right-hand pane presents a comparison
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// `<ins>`/`<del>` annotated text from the word or char diff
    #[default]
    Segments,
    /// Unified diff handed to the markup renderer
    Unified(OutputLayout),
}

/// Options for the unified-diff-to-markup renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RendererConfig {
    pub layout: OutputLayout,
    /// Lines whose distance is at most this value get word highlighting
    pub matching_threshold: f32,
    /// Skip word matching when a changed block would need more pairings
    pub max_comparisons: usize,
}
