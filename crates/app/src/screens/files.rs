//! File browser screen: permission-gated listing, selection, import and
//! export.

use std::path::PathBuf;

use eframe::egui;

use crate::types::{AppState, ExportPayload, Screen};
use crate::utils;

pub fn show(ctx: &egui::Context, state: &mut AppState) {
    let mut go_up = false;
    let mut open_dir: Option<PathBuf> = None;
    let mut pick_file: Option<PathBuf> = None;
    let mut select_clicked = false;
    let mut import_clicked = false;
    let mut export_clicked = false;
    let mut cancel_clicked = false;

    egui::TopBottomPanel::top("files_header").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading("Files");
            ui.separator();
            if state.browser.loading {
                ui.label("Loading…");
            } else {
                ui.label(state.browser.current_dir.display().to_string());
            }
        });
    });

    egui::TopBottomPanel::bottom("files_actions").show(ctx, |ui| {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            let has_selection = state.browser.selected.is_some();
            if ui
                .add_enabled(has_selection, egui::Button::new("Select"))
                .clicked()
            {
                select_clicked = true;
            }
            if ui.button("Import here…").clicked() {
                import_clicked = true;
            }

            let exporting_chat = state.browser.pending_chat_export.is_some();
            let export_label = if exporting_chat {
                "Export chat…"
            } else {
                "Export file…"
            };
            if ui
                .add_enabled(
                    exporting_chat || has_selection,
                    egui::Button::new(export_label),
                )
                .clicked()
            {
                export_clicked = true;
            }

            if ui.button("Cancel").clicked() {
                cancel_clicked = true;
            }
            if ui.button("Settings").clicked() {
                state.set_screen(Screen::Settings);
            }
        });
        ui.add_space(4.0);
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        if let Some(notice) = state.browser.notice.clone() {
            ui.horizontal(|ui| {
                ui.colored_label(egui::Color32::LIGHT_RED, notice);
                if ui.small_button("✕").clicked() {
                    state.browser.notice = None;
                }
            });
            ui.separator();
        }

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if state.browser.current_dir.parent().is_some()
                    && ui.selectable_label(false, "⬆  ..").clicked()
                {
                    go_up = true;
                }

                for entry in &state.browser.entries {
                    let selected = state.browser.selected.as_deref() == Some(entry.path.as_path());
                    let mut detail = String::new();
                    if !entry.is_dir {
                        detail.push_str(&utils::format_file_size(entry.size));
                        detail.push_str(" • ");
                    }
                    if let Some(modified) = entry.modified {
                        detail.push_str(&modified.format("%b %e, %Y").to_string());
                    }

                    let clicked = ui
                        .horizontal(|ui| {
                            let row = ui.selectable_label(
                                selected,
                                format!("{} {}", utils::entry_icon(entry), entry.name),
                            );
                            ui.weak(detail);
                            row.clicked()
                        })
                        .inner;

                    if clicked {
                        if entry.is_dir {
                            open_dir = Some(entry.path.clone());
                        } else {
                            pick_file = Some(entry.path.clone());
                        }
                    }
                }
            });
    });

    // Permission prompt: "try again" re-probes the grant, "deny" moves the
    // gate to Denied and surfaces the blocking dialog below.
    let mut try_again = false;
    let mut deny = false;
    if let Some(missing) = state.browser.permission_request.clone() {
        egui::Window::new("Permission required")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Storage permission is required to manage files:");
                for permission in &missing {
                    ui.label(format!("• {}", permission.label()));
                }
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    if ui.button("Try again").clicked() {
                        try_again = true;
                    }
                    if ui.button("Deny").clicked() {
                        deny = true;
                    }
                });
            });
    }

    let mut close_screen = false;
    if state.browser.denied {
        egui::Window::new("Permission denied")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Storage permission is required to manage files. The screen will now close.");
                ui.add_space(6.0);
                if ui.button("OK").clicked() {
                    close_screen = true;
                }
            });
    }

    if try_again {
        state.browser.resume_pending();
    }
    if deny {
        state.browser.decline_permissions();
    }
    if close_screen {
        state.browser.denied = false;
        state.set_screen(Screen::Chat);
    }

    if go_up {
        if let Some(parent) = state.browser.current_dir.parent().map(PathBuf::from) {
            state.browser.request_load(parent);
        }
    }
    if let Some(dir) = open_dir {
        state.browser.request_load(dir);
    }
    if let Some(path) = pick_file {
        state.browser.selected = Some(path);
    }
    if select_clicked {
        state.use_selected_file();
    }
    if import_clicked {
        state.browser.import_into_current();
    }
    if export_clicked {
        if let Some(content) = state.browser.pending_chat_export.take() {
            state.browser.begin_export(ExportPayload::Text(content));
        } else if let Some(selected) = state.browser.selected.clone() {
            state.browser.begin_export(ExportPayload::File(selected));
        } else {
            state.browser.notice = Some("No file selected for export".to_string());
        }
    }
    if cancel_clicked {
        state.browser.pending_chat_export = None;
        state.set_screen(Screen::Chat);
    }
}
