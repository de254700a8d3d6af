use crate::compare::{Comparison, FieldDiff, PaneView, Severity};
use crate::diff::{DiffSegment, OutputLayout, SegmentKind};
use crate::render::ErrorPanel;
use crate::style::{
    ACTIVE_BADGE_BG, ADDED_LINE_BG, ADDED_TEXT_COLOR, ADDED_WORD_BG, REMOVED_LINE_BG,
    REMOVED_TEXT_COLOR, REMOVED_WORD_BG,
};
use egui::{Color32, FontId, RichText, TextFormat, Ui, Vec2, text::LayoutJob};
use similar::{ChangeTag, TextDiff};

const LINE_HEIGHT: f32 = 22.0;

pub enum CompareViewAction {
    SetActive { version: i64, url: String },
    CopyMarkup(String),
}

pub fn show_comparison(
    ui: &mut Ui,
    comparison: &Comparison,
    layout: OutputLayout,
) -> Option<CompareViewAction> {
    let mut action = None;

    ui.columns(2, |columns| {
        pane_header(&mut columns[0], &comparison.old);
        pane_header(&mut columns[1], &comparison.new);
    });
    ui.separator();

    let fields = [
        ("System Prompt", &comparison.old.system_prompt, &comparison.system),
        ("User Prompt", &comparison.old.user_prompt, &comparison.user),
    ];

    for (index, (title, old_text, diff)) in fields.into_iter().enumerate() {
        ui.push_id(index, |ui| {
            ui.horizontal(|ui| {
                ui.strong(title);
                if let FieldDiff::Segments { stats, .. } = diff
                    && stats.has_changes()
                {
                    ui.label(
                        RichText::new(format!("+{}", stats.added_count)).color(ADDED_TEXT_COLOR),
                    );
                    ui.label(
                        RichText::new(format!("-{}", stats.removed_count))
                            .color(REMOVED_TEXT_COLOR),
                    );
                }
                if ui.small_button("Copy HTML").clicked() {
                    action = Some(CompareViewAction::CopyMarkup(diff.markup().to_string()));
                }
            });

            ui.columns(2, |columns| {
                columns[0].add(
                    egui::Label::new(RichText::new(old_text.as_str()).monospace()).wrap(),
                );
                match diff {
                    FieldDiff::Segments { segments, .. } => {
                        render_segments(&mut columns[1], segments);
                    }
                    FieldDiff::Unified { text, .. } => match layout {
                        OutputLayout::Inline => render_unified_inline(&mut columns[1], text),
                        OutputLayout::SideBySide => {
                            render_unified_side_by_side(&mut columns[1], text)
                        }
                    },
                }
            });
        });
        ui.add_space(12.0);
    }

    if let Some(set_active) = &comparison.set_active
        && ui.button(set_active.label()).clicked()
    {
        action = Some(CompareViewAction::SetActive {
            version: set_active.version,
            url: set_active.url.clone(),
        });
    }

    action
}

pub fn show_error(ui: &mut Ui, panel: &ErrorPanel) {
    let (fill, text) = match panel.severity {
        Severity::Warning => (Color32::from_rgb(255, 243, 205), Color32::from_rgb(102, 77, 3)),
        Severity::Blocking | Severity::Error => {
            (Color32::from_rgb(248, 215, 218), Color32::from_rgb(132, 32, 41))
        }
    };
    egui::Frame::default()
        .fill(fill)
        .inner_margin(12.0)
        .corner_radius(4.0)
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(RichText::new(&panel.message).color(text));
        });
}

fn pane_header(ui: &mut Ui, pane: &PaneView) {
    ui.horizontal(|ui| {
        ui.heading(format!("Version {}", pane.version));
        if pane.is_active {
            egui::Frame::default()
                .fill(ACTIVE_BADGE_BG)
                .inner_margin(egui::Margin::symmetric(6, 2))
                .corner_radius(8.0)
                .show(ui, |ui| {
                    ui.label(RichText::new("Active").small().color(Color32::WHITE));
                });
        }
    });
}

fn text_format(color: Color32, background: Color32) -> TextFormat {
    TextFormat {
        font_id: FontId::monospace(14.0),
        color,
        background,
        line_height: Some(LINE_HEIGHT),
        ..Default::default()
    }
}

/// Inserted and deleted runs highlighted inline, in order
fn render_segments(ui: &mut Ui, segments: &[DiffSegment]) {
    let base = ui.visuals().text_color();
    let mut job = LayoutJob::default();
    for segment in segments {
        let format = match segment.kind {
            SegmentKind::Unchanged => text_format(base, Color32::TRANSPARENT),
            SegmentKind::Inserted => text_format(ADDED_TEXT_COLOR, ADDED_WORD_BG),
            SegmentKind::Deleted => {
                let mut format = text_format(REMOVED_TEXT_COLOR, REMOVED_WORD_BG);
                format.strikethrough = egui::Stroke::new(1.0, REMOVED_TEXT_COLOR);
                format
            }
        };
        job.append(&segment.text, 0.0, format);
    }
    job.wrap.max_width = ui.available_width();
    ui.add(egui::Label::new(job).wrap());
}

/// Hunk body lines, header stripped
fn body_lines(unified: &str) -> impl Iterator<Item = &str> {
    unified.lines().skip_while(|line| !line.starts_with("@@")).skip(1)
}

fn render_unified_inline(ui: &mut Ui, unified: &str) {
    ui.style_mut().spacing.item_spacing.y = 1.0;
    let base = ui.visuals().text_color();
    for line in body_lines(unified) {
        let (bg, color) = match line.chars().next() {
            Some('-') => (REMOVED_LINE_BG, REMOVED_TEXT_COLOR),
            Some('+') => (ADDED_LINE_BG, ADDED_TEXT_COLOR),
            _ => (Color32::TRANSPARENT, base),
        };
        egui::Frame::default()
            .fill(bg)
            .inner_margin(4.0)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.label(RichText::new(line).monospace().color(color));
            });
    }
}

/// Context lines full width; each removed block pairs with the added block after it
fn render_unified_side_by_side(ui: &mut Ui, unified: &str) {
    ui.style_mut().spacing.item_spacing.y = 1.0;
    let col_w = (ui.available_width() / 2.0 - 8.0).max(80.0);

    let mut removed: Vec<&str> = Vec::new();
    let mut added: Vec<&str> = Vec::new();
    let mut block = 0usize;

    let mut flush = |ui: &mut Ui, removed: &mut Vec<&str>, added: &mut Vec<&str>| {
        if removed.is_empty() && added.is_empty() {
            return;
        }
        block += 1;
        ui.push_id(block, |ui| {
            egui::Grid::new("unified_pair_grid")
                .num_columns(2)
                .min_col_width(0.0)
                .spacing(Vec2::new(0.0, 0.0))
                .show(ui, |ui| {
                    for i in 0..removed.len().max(added.len()) {
                        let left = removed.get(i).copied();
                        let right = added.get(i).copied();
                        render_word_highlight(ui, left, right, true, col_w);
                        render_word_highlight(ui, left, right, false, col_w);
                        ui.end_row();
                    }
                });
        });
        removed.clear();
        added.clear();
    };

    for line in body_lines(unified) {
        match line.split_at(line.chars().next().map_or(0, char::len_utf8)) {
            ("-", text) => {
                if !added.is_empty() {
                    flush(ui, &mut removed, &mut added);
                }
                removed.push(text);
            }
            ("+", text) => added.push(text),
            (_, text) => {
                flush(ui, &mut removed, &mut added);
                ui.add(egui::Label::new(RichText::new(text).monospace()).wrap());
            }
        }
    }
    flush(ui, &mut removed, &mut added);
}

/// One cell of a removed/added pair, with char-level highlighting when both sides exist
fn render_word_highlight(
    ui: &mut Ui,
    left: Option<&str>,
    right: Option<&str>,
    is_left: bool,
    width: f32,
) {
    let (line_bg, prefix, own) = if is_left {
        (REMOVED_LINE_BG, "- ", left)
    } else {
        (ADDED_LINE_BG, "+ ", right)
    };

    egui::Frame::default()
        .fill(if own.is_some() {
            line_bg
        } else {
            Color32::TRANSPARENT
        })
        .inner_margin(4.0)
        .show(ui, |ui| {
            ui.set_min_width(width - 8.0);
            let Some(own) = own else {
                ui.label("");
                return;
            };

            let base = ui.visuals().text_color();
            let mut job = LayoutJob::default();
            job.append(
                prefix,
                0.0,
                text_format(base.gamma_multiply(0.5), Color32::TRANSPARENT),
            );

            match (left, right) {
                (Some(l), Some(r)) => {
                    let diff = TextDiff::from_chars(l, r);
                    for change in diff.iter_all_changes() {
                        let format = match (change.tag(), is_left) {
                            (ChangeTag::Equal, _) => text_format(base, Color32::TRANSPARENT),
                            (ChangeTag::Delete, true) => {
                                text_format(REMOVED_TEXT_COLOR, REMOVED_WORD_BG)
                            }
                            (ChangeTag::Insert, false) => {
                                text_format(ADDED_TEXT_COLOR, ADDED_WORD_BG)
                            }
                            _ => continue,
                        };
                        job.append(change.value(), 0.0, format);
                    }
                }
                _ => job.append(own, 0.0, text_format(base, Color32::TRANSPARENT)),
            }

            job.wrap.max_width = width - 8.0;
            ui.add(egui::Label::new(job).wrap());
        });
}
