//! Settings tab UI rendering

use eframe::egui::{self, RichText, Vec2};

use crate::app::TurnstileApp;
use crate::ui::components::section_frame;
use crate::ui::theme::ThemePreset;

/// Render the settings tab
pub fn render_settings_tab(app: &mut TurnstileApp, ui: &mut egui::Ui) {
    egui::ScrollArea::vertical()
        .id_salt("settings_scroll")
        .show(ui, |ui| {
            render_appearance_section(app, ui);
            ui.add_space(12.0);
            render_scanner_section(app, ui);
            ui.add_space(12.0);
            render_verification_section(app, ui);
        });
}

fn render_appearance_section(app: &mut TurnstileApp, ui: &mut egui::Ui) {
    section_frame(app, ui, "Appearance", |app, ui| {
        let theme = app.ui.current_theme.clone();

        ui.horizontal(|ui| {
            ui.label(RichText::new("Theme:").color(theme.text_muted));

            let current_name = app.config.launcher.theme.name();
            egui::ComboBox::from_id_salt("theme_select")
                .selected_text(current_name)
                .show_ui(ui, |ui| {
                    for preset in ThemePreset::all() {
                        if ui
                            .selectable_label(app.config.launcher.theme == *preset, preset.name())
                            .clicked()
                        {
                            app.config.launcher.theme = *preset;
                            app.ui.current_theme = preset.theme();
                            app.ui.theme_dirty = true;
                            app.save_config();
                        }
                    }
                });
        });

        // Theme preview swatches
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.label(RichText::new("Preview:").color(theme.text_muted));
            ui.add_space(8.0);

            let swatch_size = Vec2::new(24.0, 24.0);
            let colors = [
                theme.bg_dark,
                theme.accent,
                theme.success,
                theme.warning,
                theme.error,
            ];

            for color in colors {
                let (rect, _) = ui.allocate_exact_size(swatch_size, egui::Sense::hover());
                ui.painter().rect_filled(rect, 4.0, color);
                ui.add_space(4.0);
            }
        });
    });
}

fn render_scanner_section(app: &mut TurnstileApp, ui: &mut egui::Ui) {
    section_frame(app, ui, "Scanner", |app, ui| {
        let theme = app.ui.current_theme.clone();

        // Camera picker
        let devices: Vec<(u32, String)> = app
            .cameras
            .iter()
            .map(|c| (c.index, format!("{}: {}", c.index, c.name)))
            .collect();

        let selected = app.config.scanner.camera_index;
        let selected_text = devices
            .iter()
            .find(|(index, _)| Some(*index) == selected)
            .map(|(_, label)| label.clone())
            .unwrap_or_else(|| match selected {
                Some(index) => format!("Camera {}", index),
                None => "Default camera".to_string(),
            });

        let mut picked: Option<u32> = None;
        ui.horizontal(|ui| {
            ui.label(RichText::new("Camera:").color(theme.text_muted));
            egui::ComboBox::from_id_salt("camera_select")
                .selected_text(&selected_text)
                .width(240.0)
                .show_ui(ui, |ui| {
                    if devices.is_empty() {
                        ui.label(RichText::new("No cameras found").color(theme.text_muted));
                    }
                    for (index, label) in &devices {
                        if ui
                            .selectable_label(selected == Some(*index), label)
                            .clicked()
                        {
                            picked = Some(*index);
                        }
                    }
                });

            if ui.button("Refresh").clicked() {
                app.refresh_cameras();
            }
        });
        if let Some(index) = picked {
            app.select_camera(index);
        }

        ui.add_space(8.0);

        let mut decoder_changed = false;
        ui.horizontal(|ui| {
            ui.label(RichText::new("Frame rate:").color(theme.text_muted));
            decoder_changed |= ui
                .add(
                    egui::Slider::new(&mut app.config.scanner.frames_per_second, 1..=30)
                        .suffix(" fps"),
                )
                .changed();
        });
        ui.horizontal(|ui| {
            ui.label(RichText::new("Scan region:").color(theme.text_muted));
            decoder_changed |= ui
                .add(
                    egui::Slider::new(&mut app.config.scanner.scan_region, 100..=800)
                        .suffix(" px"),
                )
                .changed();
        });

        let mut prefs_changed = false;
        prefs_changed |= ui
            .checkbox(
                &mut app.config.scanner.remember_last_camera,
                "Remember last used camera",
            )
            .changed();
        prefs_changed |= ui
            .checkbox(
                &mut app.config.scanner.prefer_torch_button,
                "Show torch button when supported",
            )
            .changed();

        if decoder_changed || prefs_changed {
            app.save_config();
        }

        ui.add_space(4.0);
        ui.label(
            RichText::new("Decoder changes apply on the next scan")
                .color(theme.text_muted)
                .size(11.0),
        );
    });
}

fn render_verification_section(app: &mut TurnstileApp, ui: &mut egui::Ui) {
    section_frame(app, ui, "Verification", |app, ui| {
        let theme = app.ui.current_theme.clone();

        ui.horizontal(|ui| {
            ui.label(RichText::new("Service URL:").color(theme.text_muted));
            ui.add(
                egui::TextEdit::singleline(&mut app.ui.base_url_draft).desired_width(240.0),
            );
            if ui.button("Apply").clicked() {
                app.apply_base_url();
            }
        });

        ui.add_space(4.0);
        ui.label(
            RichText::new(format!(
                "Scans POST to {}/scanner",
                app.config.verification.base_url.trim_end_matches('/')
            ))
            .color(theme.text_muted)
            .size(11.0),
        );
    });
}
