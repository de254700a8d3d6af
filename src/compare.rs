//! Version comparison: guard the pair, diff both prompt fields, and build the
//! content of the two panes.

use crate::config::Settings;
use crate::constant::VERSION_NUMBER_PLACEHOLDER;
use crate::diff::{
    DiffError, DiffPipeline, DiffSegment, DiffStats, DisplayMode, HtmlDiffRenderer,
    MarkupRenderer, RendererConfig, SimilarEngine, calculate_stats, format_unified,
    segments_to_html,
};
use crate::version::{GuardError, PromptVersion, VersionPair, VersionSet};
use thiserror::Error;
use tracing::{error, info};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompareError {
    #[error(transparent)]
    Guard(#[from] GuardError),

    #[error("{0}")]
    EngineUnavailable(String),

    #[error("Error creating diff: {0}")]
    Computation(String),
}

/// How a failure is surfaced in the comparison region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// User-correctable, shown inline
    Warning,
    /// Environment problem, needs a reload
    Blocking,
    /// Exception during diff or formatting
    Error,
}

impl CompareError {
    pub fn severity(&self) -> Severity {
        match self {
            CompareError::Guard(_) => Severity::Warning,
            CompareError::EngineUnavailable(_) => Severity::Blocking,
            CompareError::Computation(_) => Severity::Error,
        }
    }
}

impl From<DiffError> for CompareError {
    fn from(err: DiffError) -> Self {
        match err {
            DiffError::EngineUnavailable | DiffError::IncompatibleEngine(_) => {
                CompareError::EngineUnavailable(err.to_string())
            }
            DiffError::Computation(msg) => CompareError::Computation(msg),
        }
    }
}

/// One prompt field rendered for the right-hand pane
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDiff {
    Segments {
        segments: Vec<DiffSegment>,
        markup: String,
        stats: DiffStats,
    },
    Unified {
        text: String,
        markup: String,
    },
}

impl FieldDiff {
    pub fn markup(&self) -> &str {
        match self {
            FieldDiff::Segments { markup, .. } | FieldDiff::Unified { markup, .. } => markup,
        }
    }
}

/// Header and plain text of one side
#[derive(Debug, Clone, PartialEq)]
pub struct PaneView {
    pub version: i64,
    pub is_active: bool,
    pub system_prompt: String,
    pub user_prompt: String,
}

impl From<&PromptVersion> for PaneView {
    fn from(v: &PromptVersion) -> Self {
        Self {
            version: v.version,
            is_active: v.is_active,
            system_prompt: v.system_prompt.clone(),
            user_prompt: v.user_prompt.clone(),
        }
    }
}

/// "Set Version N as Active" call to action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetActiveAction {
    pub version: i64,
    pub url: String,
}

impl SetActiveAction {
    pub fn label(&self) -> String {
        format!("Set Version {} as Active", self.version)
    }
}

/// Everything the two panes display for one comparison
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub pair: VersionPair,
    pub old: PaneView,
    pub new: PaneView,
    pub system: FieldDiff,
    pub user: FieldDiff,
    pub set_active: Option<SetActiveAction>,
}

pub fn set_active_url(template: &str, version: i64) -> String {
    template.replace(VERSION_NUMBER_PLACEHOLDER, &version.to_string())
}

/// Comparison pipeline configured once at startup
pub struct Comparator {
    pipeline: Result<DiffPipeline, DiffError>,
    renderer: Box<dyn MarkupRenderer>,
    renderer_config: RendererConfig,
    set_active_template: String,
}

impl Comparator {
    pub fn new(
        pipeline: Result<DiffPipeline, DiffError>,
        renderer: Box<dyn MarkupRenderer>,
        renderer_config: RendererConfig,
        set_active_template: impl Into<String>,
    ) -> Self {
        if let Err(e) = &pipeline {
            error!("Diff engine unavailable: {}", e);
        }
        Self {
            pipeline,
            renderer,
            renderer_config,
            set_active_template: set_active_template.into(),
        }
    }

    /// `similar` engine and the built-in HTML renderer, tuned by the settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            DiffPipeline::probe(Box::new(SimilarEngine), settings.diff.granularity),
            Box::new(HtmlDiffRenderer),
            settings.diff.renderer_config(),
            settings.set_active_url_template.clone(),
        )
    }

    pub fn renderer_config(&self) -> &RendererConfig {
        &self.renderer_config
    }

    pub fn compare(
        &self,
        versions: &VersionSet,
        pair: VersionPair,
        mode: DisplayMode,
    ) -> Result<Comparison, CompareError> {
        info!("Comparing versions {} and {}", pair.old, pair.new);
        let selected = versions.select(pair)?;
        let pipeline = self.pipeline.as_ref().map_err(|e| CompareError::from(e.clone()))?;

        let (system, user) = match mode {
            DisplayMode::Segments => (
                self.segment_field(
                    pipeline,
                    &selected.old.system_prompt,
                    &selected.new.system_prompt,
                )?,
                self.segment_field(pipeline, &selected.old.user_prompt, &selected.new.user_prompt)?,
            ),
            DisplayMode::Unified(layout) => {
                let config = RendererConfig {
                    layout,
                    ..self.renderer_config
                };
                (
                    self.unified_field(
                        "system_prompt",
                        &selected.old,
                        &selected.new,
                        |v| &v.system_prompt,
                        &config,
                    )?,
                    self.unified_field(
                        "user_prompt",
                        &selected.old,
                        &selected.new,
                        |v| &v.user_prompt,
                        &config,
                    )?,
                )
            }
        };

        let set_active = (!selected.new.is_active).then(|| SetActiveAction {
            version: selected.new.version,
            url: set_active_url(&self.set_active_template, selected.new.version),
        });

        info!("Version comparison completed successfully");
        Ok(Comparison {
            pair,
            old: PaneView::from(&selected.old),
            new: PaneView::from(&selected.new),
            system,
            user,
            set_active,
        })
    }

    fn segment_field(
        &self,
        pipeline: &DiffPipeline,
        old: &str,
        new: &str,
    ) -> Result<FieldDiff, CompareError> {
        let segments = pipeline.diff(old, new)?;
        Ok(FieldDiff::Segments {
            markup: segments_to_html(&segments),
            stats: calculate_stats(&segments),
            segments,
        })
    }

    fn unified_field(
        &self,
        field: &str,
        old: &PromptVersion,
        new: &PromptVersion,
        text: impl Fn(&PromptVersion) -> &String,
        config: &RendererConfig,
    ) -> Result<FieldDiff, CompareError> {
        let old_label = format!("{field}_v{}.txt", old.version);
        let new_label = format!("{field}_v{}.txt", new.version);
        let unified = format_unified(text(old), text(new), &old_label, &new_label);
        let markup = self.renderer.render(&unified, config)?;
        Ok(FieldDiff::Unified {
            text: unified,
            markup,
        })
    }
}
