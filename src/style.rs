use crate::modal::Tone;
use crate::notification::ToastKind;
use egui::{Color32, Context, Stroke, Style, Visuals};

pub const REMOVED_LINE_BG: Color32 = Color32::from_rgb(255, 230, 230);
pub const ADDED_LINE_BG: Color32 = Color32::from_rgb(230, 255, 230);
pub const REMOVED_WORD_BG: Color32 = Color32::from_rgb(255, 170, 170);
pub const ADDED_WORD_BG: Color32 = Color32::from_rgb(170, 255, 170);
pub const REMOVED_TEXT_COLOR: Color32 = Color32::from_rgb(150, 0, 0);
pub const ADDED_TEXT_COLOR: Color32 = Color32::from_rgb(0, 100, 0);
pub const ACTIVE_BADGE_BG: Color32 = Color32::from_rgb(25, 135, 84);

pub fn configure_style(ctx: &Context) {
    let mut style = Style::default();
    style.spacing.item_spacing = egui::vec2(8.0, 8.0);
    style.spacing.window_margin = egui::Margin::same(12);
    ctx.set_style(style);

    let mut visuals = Visuals::light();
    visuals.window_shadow = egui::epaint::Shadow::NONE;
    visuals.popup_shadow = egui::epaint::Shadow::NONE;
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, Color32::from_gray(225));
    visuals.widgets.hovered.bg_fill = Color32::from_gray(240);
    visuals.widgets.active.bg_fill = Color32::from_gray(230);
    visuals.selection.bg_fill = Color32::from_rgb(200, 220, 255);
    ctx.set_visuals(visuals);
}

/// Background and foreground of a toast
pub fn toast_colors(kind: ToastKind) -> (Color32, Color32) {
    match kind {
        ToastKind::Success => (Color32::from_rgb(209, 231, 221), Color32::from_rgb(15, 81, 50)),
        ToastKind::Error => (Color32::from_rgb(248, 215, 218), Color32::from_rgb(132, 32, 41)),
        ToastKind::Info => (Color32::from_rgb(207, 226, 255), Color32::from_rgb(8, 66, 152)),
    }
}

pub fn tone_color(tone: Tone) -> Color32 {
    match tone {
        Tone::Success => Color32::from_rgb(25, 135, 84),
        Tone::Danger => Color32::from_rgb(220, 53, 69),
        Tone::Primary => Color32::from_rgb(13, 110, 253),
    }
}
