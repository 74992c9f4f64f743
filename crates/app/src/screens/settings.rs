//! Settings screen: API key, backend URL, and mock mode.

use eframe::egui;
use zeroize::Zeroize;

use crate::types::AppState;

pub fn show(ctx: &egui::Context, state: &mut AppState) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading("Settings");
        ui.add_space(12.0);

        ui.label("API key");
        ui.add(
            egui::TextEdit::singleline(&mut state.api_key_input)
                .password(true)
                .hint_text("Enter an API key"),
        );
        if ui.button("Save API key").clicked() {
            let api_key = state.api_key_input.trim().to_string();
            if api_key.is_empty() {
                state.settings_notice = Some("Please enter an API key".to_string());
            } else {
                match state.prefs.save_api_key(&api_key) {
                    Ok(()) => {
                        state.api_key_input.zeroize();
                        state.settings_notice = Some("API key saved".to_string());
                    }
                    Err(e) => {
                        state.settings_notice = Some(format!("Could not save the API key: {}", e));
                    }
                }
            }
        }

        ui.add_space(16.0);
        ui.label("Backend URL");
        ui.text_edit_singleline(&mut state.base_url_input);
        if ui.button("Apply").clicked() {
            state.apply_base_url();
        }

        ui.add_space(16.0);
        let mut mock = state.settings.mock_mode;
        if ui
            .checkbox(&mut mock, "Mock mode (canned answers, no network)")
            .changed()
        {
            state.set_mock_mode(mock);
        }

        if let Some(notice) = state.settings_notice.clone() {
            ui.add_space(12.0);
            ui.colored_label(egui::Color32::LIGHT_YELLOW, notice);
        }
    });
}
