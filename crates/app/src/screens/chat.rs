//! Chat screen: message log, input row, and the backend action strip.

use eframe::egui;

use crate::types::{AppState, Author, Screen};

pub fn show(ctx: &egui::Context, state: &mut AppState) {
    let mut send_clicked = false;

    egui::TopBottomPanel::bottom("chat_input").show(ctx, |ui| {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            let input = egui::TextEdit::singleline(&mut state.input_text)
                .hint_text("Message Genesis…")
                .desired_width(ui.available_width() - 90.0);
            let response = ui.add(input);
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                send_clicked = true;
            }

            let label = if state.sending { "Sending…" } else { "Send" };
            let can_send = !state.sending && !state.input_text.trim().is_empty();
            if ui.add_enabled(can_send, egui::Button::new(label)).clicked() {
                send_clicked = true;
            }
        });
        ui.add_space(2.0);
        ui.horizontal(|ui| {
            if ui.button("Import file…").clicked() {
                state.import_file_to_backend();
            }
            if ui.button("Export chat").clicked() {
                state.export_chat();
            }
            if ui.button("File manager").clicked() {
                state.set_screen(Screen::Files);
            }
            if ui.button("AI questions").clicked() {
                state.fetch_ai_questions();
            }
            let sync_label = if state.syncing { "Syncing…" } else { "Sync tasks" };
            if ui
                .add_enabled(!state.syncing, egui::Button::new(sync_label))
                .clicked()
            {
                state.sync_tasks();
            }
            let mut root = state.root_enabled;
            if ui.checkbox(&mut root, "Root access").changed() {
                state.set_root_enabled(root);
            }
        });
        ui.add_space(4.0);
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        if let Some(notice) = state.status_notice.clone() {
            ui.horizontal(|ui| {
                ui.colored_label(egui::Color32::LIGHT_RED, notice);
                if ui.small_button("✕").clicked() {
                    state.status_notice = None;
                }
            });
            ui.separator();
        }

        if !state.ai_questions.is_empty() {
            ui.label(egui::RichText::new("Genesis suggests:").strong());
            let mut picked = None;
            for question in &state.ai_questions {
                if ui.link(question).clicked() {
                    picked = Some(question.clone());
                }
            }
            if let Some(question) = picked {
                state.input_text = question;
            }
            ui.separator();
        }

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for entry in &state.chat_entries {
                    let (label, color) = match entry.author {
                        Author::User => ("You", egui::Color32::LIGHT_BLUE),
                        Author::Genesis => ("Genesis", egui::Color32::LIGHT_GREEN),
                    };
                    ui.horizontal_wrapped(|ui| {
                        ui.colored_label(color, format!("{}:", label));
                        ui.label(&entry.text);
                        ui.weak(entry.timestamp.format("%H:%M").to_string());
                    });
                    ui.add_space(4.0);
                }
            });
    });

    if send_clicked {
        state.send_current_message();
    }
}
