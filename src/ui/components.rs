//! Shared UI components for the Turnstile scanner

use eframe::egui::{self, Color32, RichText, Rounding, Vec2};

use crate::app::TurnstileApp;
use crate::state::Tab;

/// Render a tab button
pub fn render_tab(app: &mut TurnstileApp, ui: &mut egui::Ui, tab: Tab, label: &str) {
    let theme = &app.ui.current_theme;
    let is_active = app.ui.active_tab == tab;

    let (bg, text_color) = if is_active {
        (theme.bg_medium, theme.accent)
    } else {
        (Color32::TRANSPARENT, theme.text_secondary)
    };

    let button = egui::Button::new(RichText::new(label).color(text_color))
        .fill(bg)
        .rounding(Rounding {
            nw: 6.0,
            ne: 6.0,
            sw: 0.0,
            se: 0.0,
        })
        .min_size(Vec2::new(80.0, 32.0));

    if ui.add(button).clicked() {
        let previous_tab = app.ui.active_tab;
        app.ui.active_tab = tab;

        // Entering Settings: sync the URL draft and re-enumerate cameras
        if tab == Tab::Settings && previous_tab != Tab::Settings {
            app.ui.base_url_draft = app.config.verification.base_url.clone();
            app.refresh_cameras();
        }
    }
}

/// Render a titled section inside a rounded frame
pub fn section_frame(
    app: &mut TurnstileApp,
    ui: &mut egui::Ui,
    title: &str,
    add_contents: impl FnOnce(&mut TurnstileApp, &mut egui::Ui),
) {
    let theme = app.ui.current_theme.clone();

    egui::Frame::none()
        .fill(theme.bg_medium)
        .rounding(8.0)
        .inner_margin(16.0)
        .stroke(egui::Stroke::new(1.0, theme.border))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(
                RichText::new(title)
                    .color(theme.accent)
                    .size(13.0)
                    .strong(),
            );
            ui.add_space(12.0);
            add_contents(app, ui);
        });
}

/// Render the About dialog
pub fn render_about_dialog(app: &mut TurnstileApp, ctx: &egui::Context) {
    if !app.ui.show_about_dialog {
        return;
    }

    let theme = app.ui.current_theme.clone();

    egui::Window::new("About Turnstile")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([300.0, 240.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(8.0);

                // App name
                ui.label(
                    RichText::new("Turnstile")
                        .size(24.0)
                        .strong()
                        .color(theme.accent),
                );

                ui.add_space(4.0);
                ui.label(
                    RichText::new("Event check-in scanner")
                        .size(14.0)
                        .color(theme.text_secondary),
                );

                ui.add_space(12.0);

                // Version
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                        .color(theme.text_muted),
                );

                ui.add_space(12.0);

                ui.label(
                    RichText::new("Scans attendee QR codes and verifies")
                        .color(theme.text_secondary),
                );
                ui.label(
                    RichText::new("them against the check-in service")
                        .color(theme.text_secondary),
                );

                ui.add_space(12.0);

                if ui.link("Check-in service").clicked() {
                    let _ = open::that(app.config.verification.base_url.clone());
                }

                ui.add_space(12.0);

                ui.label(
                    RichText::new("Built with Rust + egui")
                        .size(11.0)
                        .color(theme.text_muted),
                );

                ui.add_space(12.0);

                if ui.button("Close").clicked() {
                    app.ui.show_about_dialog = false;
                }

                ui.add_space(8.0);
            });
        });
}
