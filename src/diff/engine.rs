use super::types::{DiffError, DiffSegment, Granularity, SegmentKind};
use similar::{ChangeTag, TextDiff};
use tracing::{debug, info};

/// Which primitives an engine offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub word: bool,
    pub char: bool,
}

/// Adapter over a text diffing library
pub trait DiffEngine: Send + Sync {
    fn name(&self) -> &str;

    fn capabilities(&self) -> Capabilities;

    fn compute_word_diff(&self, _old: &str, _new: &str) -> Result<Vec<DiffSegment>, DiffError> {
        Err(DiffError::IncompatibleEngine(format!(
            "{} has no word diff",
            self.name()
        )))
    }

    fn compute_char_diff(&self, _old: &str, _new: &str) -> Result<Vec<DiffSegment>, DiffError> {
        Err(DiffError::IncompatibleEngine(format!(
            "{} has no char diff",
            self.name()
        )))
    }
}

/// Engine backed by `similar`; words keep their whitespace as separate tokens
#[derive(Debug, Default, Clone, Copy)]
pub struct SimilarEngine;

impl DiffEngine for SimilarEngine {
    fn name(&self) -> &str {
        "similar"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            word: true,
            char: true,
        }
    }

    fn compute_word_diff(&self, old: &str, new: &str) -> Result<Vec<DiffSegment>, DiffError> {
        Ok(collect_segments(&TextDiff::from_words(old, new)))
    }

    fn compute_char_diff(&self, old: &str, new: &str) -> Result<Vec<DiffSegment>, DiffError> {
        Ok(collect_segments(&TextDiff::from_chars(old, new)))
    }
}

/// Merge token changes into runs so neighbours never share a kind
fn collect_segments<'a>(diff: &TextDiff<'a, 'a, 'a, str>) -> Vec<DiffSegment> {
    let mut segments: Vec<DiffSegment> = Vec::new();

    for change in diff.iter_all_changes() {
        let kind = match change.tag() {
            ChangeTag::Equal => SegmentKind::Unchanged,
            ChangeTag::Insert => SegmentKind::Inserted,
            ChangeTag::Delete => SegmentKind::Deleted,
        };

        match segments.last_mut() {
            Some(last) if last.kind == kind => last.text.push_str(change.value()),
            _ => segments.push(DiffSegment::new(kind, change.value())),
        }
    }

    segments
}

/// Engine plus the granularity picked for it when the page initialized
pub struct DiffPipeline {
    engine: Box<dyn DiffEngine>,
    granularity: Granularity,
}

impl DiffPipeline {
    /// Probe the engine once: preferred granularity first, then whatever it has
    pub fn probe(engine: Box<dyn DiffEngine>, preferred: Granularity) -> Result<Self, DiffError> {
        let caps = engine.capabilities();
        let granularity = match (preferred, caps.word, caps.char) {
            (Granularity::Word, true, _) => Granularity::Word,
            (_, _, true) => Granularity::Char,
            (Granularity::Char, true, false) => Granularity::Word,
            _ => return Err(DiffError::EngineUnavailable),
        };

        info!(
            "Using {} diff engine with {:?} granularity",
            engine.name(),
            granularity
        );
        Ok(Self {
            engine,
            granularity,
        })
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    pub fn diff(&self, old: &str, new: &str) -> Result<Vec<DiffSegment>, DiffError> {
        debug!(
            "Diffing {} -> {} bytes by {:?}",
            old.len(),
            new.len(),
            self.granularity
        );
        match self.granularity {
            Granularity::Word => self.engine.compute_word_diff(old, new),
            Granularity::Char => self.engine.compute_char_diff(old, new),
        }
    }
}

impl Default for DiffPipeline {
    fn default() -> Self {
        Self {
            engine: Box::new(SimilarEngine),
            granularity: Granularity::Word,
        }
    }
}
