use crate::diff::{DisplayMode, OutputLayout};
use crate::version::{VersionPair, VersionSet};
use egui::{Align, Layout, Ui};
use std::path::PathBuf;

pub enum TitleBarAction {
    Open,
    OpenFile(PathBuf),
    Reload,
    Select(VersionPair),
    Swap,
    Mode(DisplayMode),
}

pub struct TitleBar;

pub struct TitleBarState<'a> {
    pub title: &'a str,
    pub versions: &'a VersionSet,
    pub pair: Option<VersionPair>,
    pub mode: DisplayMode,
    pub recent_files: &'a [PathBuf],
    pub has_current_file: bool,
    pub is_loading: bool,
}

impl TitleBar {
    pub fn show(ui: &mut Ui, state: TitleBarState<'_>) -> Option<TitleBarAction> {
        let TitleBarState {
            title,
            versions,
            pair,
            mode,
            recent_files,
            has_current_file,
            is_loading,
        } = state;

        let mut action = None;

        ui.horizontal(|ui| {
            ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
                ui.label(title);
                ui.add_space(16.0);

                ui.menu_button("📂", |ui| {
                    for path in recent_files {
                        let file_name = path
                            .file_name()
                            .and_then(|n| n.to_str())
                            .unwrap_or("Unknown");
                        let path_str = path.to_string_lossy();
                        if ui
                            .button(file_name)
                            .on_hover_text(path_str.as_ref())
                            .clicked()
                        {
                            action = Some(TitleBarAction::OpenFile(path.clone()));
                            ui.close();
                        }
                    }
                    if !recent_files.is_empty() {
                        ui.separator();
                    }
                    if ui.button("Open Versions...").clicked() {
                        action = Some(TitleBarAction::Open);
                        ui.close();
                    }
                })
                .response
                .on_hover_text("Open");

                if ui
                    .add_enabled(has_current_file, egui::Button::new("⟳"))
                    .on_hover_text("Reload")
                    .on_disabled_hover_text("No file opened")
                    .clicked()
                {
                    action = Some(TitleBarAction::Reload);
                }

                ui.separator();

                if let Some(pair) = pair {
                    let mut old = pair.old;
                    let mut new = pair.new;
                    version_combo(ui, "version_old", &mut old, versions);
                    if ui.button("⇄").on_hover_text("Swap versions").clicked() {
                        action = Some(TitleBarAction::Swap);
                    }
                    version_combo(ui, "version_new", &mut new, versions);
                    if (old, new) != (pair.old, pair.new) {
                        action = Some(TitleBarAction::Select(VersionPair::new(old, new)));
                    }
                }

                if is_loading {
                    ui.spinner();
                }
            });

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                let modes = [
                    (DisplayMode::Unified(OutputLayout::Inline), "Inline"),
                    (DisplayMode::Unified(OutputLayout::SideBySide), "Side by side"),
                    (DisplayMode::Segments, "Words"),
                ];
                for (candidate, label) in modes {
                    if ui.selectable_label(mode == candidate, label).clicked() && mode != candidate
                    {
                        action = Some(TitleBarAction::Mode(candidate));
                    }
                }
            });
        });

        action
    }
}

fn version_combo(ui: &mut Ui, id: &str, selected: &mut i64, versions: &VersionSet) {
    egui::ComboBox::from_id_salt(id)
        .selected_text(format!("Version {selected}"))
        .show_ui(ui, |ui| {
            for version in versions.iter() {
                let label = if version.is_active {
                    format!("Version {} (Active)", version.version)
                } else {
                    format!("Version {}", version.version)
                };
                ui.selectable_value(selected, version.version, label);
            }
        });
}
