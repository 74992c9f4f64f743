use std::sync::Arc;
use std::time::Duration;

use eframe::egui;
use parking_lot::Mutex;

mod screens;
mod state;
mod types;
mod utils;

use types::{AppState, Screen};

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 680.0])
            .with_min_inner_size([640.0, 480.0]),
        vsync: true,
        ..Default::default()
    };
    eframe::run_native(
        "Genesis",
        options,
        Box::new(|_cc| {
            Box::new(GenesisApp {
                state: Arc::new(Mutex::new(AppState::new())),
            })
        }),
    )
}

struct GenesisApp {
    state: Arc<Mutex<AppState>>,
}

impl eframe::App for GenesisApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut s = self.state.lock();

        // Any interaction resets the notifier's idle window.
        if ctx.input(|i| !i.events.is_empty()) {
            s.activity.touch();
        }

        s.poll_background();
        if s.has_pending_work() {
            ctx.request_repaint_after(Duration::from_millis(150));
        } else {
            // Lazy cadence so proactive messages still show up promptly.
            ctx.request_repaint_after(Duration::from_secs(1));
        }

        egui::TopBottomPanel::top("nav").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Genesis");
                ui.separator();
                let mut target = None;
                for (screen, label) in [
                    (Screen::Chat, "Chat"),
                    (Screen::Files, "Files"),
                    (Screen::Settings, "Settings"),
                ] {
                    if ui.selectable_label(s.screen == screen, label).clicked() {
                        target = Some(screen);
                    }
                }
                if let Some(screen) = target {
                    s.set_screen(screen);
                }
            });
        });

        match s.screen {
            Screen::Chat => screens::chat::show(ctx, &mut s),
            Screen::Files => screens::files::show(ctx, &mut s),
            Screen::Settings => screens::settings::show(ctx, &mut s),
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Some(notifier) = self.state.lock().notifier.take() {
            notifier.stop();
        }
    }
}
