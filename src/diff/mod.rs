mod engine;
mod markup;
mod stats;
mod types;
mod unified;

pub use engine::{Capabilities, DiffEngine, DiffPipeline, SimilarEngine};
pub use markup::{HtmlDiffRenderer, MarkupRenderer, segments_to_html};
pub use stats::{DiffStats, calculate_stats};
pub use types::{
    DiffError, DiffSegment, DisplayMode, Granularity, OutputLayout, RendererConfig, SegmentKind,
};
pub use unified::format_unified;
