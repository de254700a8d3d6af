use super::types::{DiffSegment, SegmentKind};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiffStats {
    pub added_count: usize,
    pub removed_count: usize,
}

impl DiffStats {
    pub fn has_changes(&self) -> bool {
        self.added_count > 0 || self.removed_count > 0
    }
}

/// Character-level statistics over a segment sequence
pub fn calculate_stats(segments: &[DiffSegment]) -> DiffStats {
    let mut stats = DiffStats::default();

    for segment in segments {
        match segment.kind {
            SegmentKind::Inserted => stats.added_count += segment.text.chars().count(),
            SegmentKind::Deleted => stats.removed_count += segment.text.chars().count(),
            SegmentKind::Unchanged => {}
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{DiffEngine, SimilarEngine};

    #[test]
    fn stats_counting_english() {
        let segments = SimilarEngine.compute_char_diff("hello cat", "hello dog").unwrap();
        let stats = calculate_stats(&segments);
        assert_eq!(stats.added_count, 3);
        assert_eq!(stats.removed_count, 3);
    }

    #[test]
    fn stats_counting_chinese() {
        let segments = SimilarEngine.compute_char_diff("我爱你", "我不爱你").unwrap();
        let stats = calculate_stats(&segments);
        assert_eq!(stats.added_count, 1);
        assert_eq!(stats.removed_count, 0);
    }

    #[test]
    fn no_changes_for_identical_text() {
        let segments = SimilarEngine.compute_word_diff("same", "same").unwrap();
        assert!(!calculate_stats(&segments).has_changes());
    }
}
