use crate::modal::{ConfirmationModal, RetainedDialog, VersionAction};
use crate::style::tone_color;
use egui::{Context, RichText};

pub enum DialogAction {
    Confirm,
    Cancel,
    Choose(VersionAction),
}

/// Draws whatever the modal last asked to show
pub fn show_dialog(
    ctx: &Context,
    modal: &ConfirmationModal<RetainedDialog>,
) -> Option<DialogAction> {
    let dialog = modal.dialog().current()?;
    let busy = modal.button().is_some_and(|b| b.is_disabled());
    let confirm_label = modal
        .button()
        .map(|b| b.label().to_string())
        .unwrap_or_else(|| dialog.confirm_label.clone());
    let mut action = None;

    egui::Window::new(dialog.title.as_str())
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(dialog.message.as_str());
            if let Some(warning) = &dialog.warning {
                ui.label(RichText::new(warning).small().weak());
            }
            if let Some(choice) = dialog.choice {
                let mut selected = choice;
                ui.radio_value(&mut selected, VersionAction::UpdateExisting, "Update existing version");
                ui.radio_value(&mut selected, VersionAction::CreateNew, "Create new version");
                if selected != choice {
                    action = Some(DialogAction::Choose(selected));
                }
            }
            ui.separator();
            ui.horizontal(|ui| {
                if ui.add_enabled(!busy, egui::Button::new("Cancel")).clicked() {
                    action = Some(DialogAction::Cancel);
                }
                let confirm = egui::Button::new(RichText::new(confirm_label).color(egui::Color32::WHITE))
                    .fill(tone_color(dialog.tone));
                if ui.add_enabled(!busy, confirm).clicked() {
                    action = Some(DialogAction::Confirm);
                }
            });
        });

    action
}
