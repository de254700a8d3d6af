use crate::notification::Notifications;
use crate::style::toast_colors;
use egui::{Align2, Context, RichText};
use std::time::Instant;
use uuid::Uuid;

/// Toast stack in the top-right corner; advances timers and schedules the next repaint
pub fn show_toasts(ctx: &Context, notifications: &mut Notifications) {
    let now = Instant::now();
    notifications.tick(now);
    if notifications.is_empty() {
        return;
    }

    let mut closed: Option<Uuid> = None;
    egui::Area::new(egui::Id::new("toast_area"))
        .anchor(Align2::RIGHT_TOP, [-12.0, 48.0])
        .show(ctx, |ui| {
            for toast in notifications.toasts() {
                let (fill, text) = toast_colors(toast.kind);
                egui::Frame::default()
                    .fill(fill)
                    .inner_margin(10.0)
                    .corner_radius(6.0)
                    .show(ui, |ui| {
                        ui.set_max_width(320.0);
                        ui.horizontal(|ui| {
                            ui.label(RichText::new(&toast.message).color(text));
                            if ui.small_button("✕").clicked() {
                                closed = Some(toast.id);
                            }
                        });
                    });
            }
        });

    if let Some(id) = closed {
        notifications.dismiss(id, now);
    }
    if let Some(deadline) = notifications.next_deadline() {
        ctx.request_repaint_after(deadline.saturating_duration_since(now));
    }
}
