//! Scanner tab UI rendering
//!
//! One card per session phase: the live scan viewport, the verifying
//! spinner, and the accepted / rejected / failed result cards.

use eframe::egui::{self, Color32, RichText, Sense, Stroke, Vec2, vec2};

use crate::app::TurnstileApp;
use crate::state::Phase;
use crate::ui::components::section_frame;

/// Side length of the on-screen scan viewport
const VIEWPORT_SIZE: f32 = 260.0;

/// Result glyphs drawn with the painter (the built-in fonts have spotty
/// coverage for large dingbats)
enum Glyph {
    Check,
    Cross,
    Alert,
}

/// Render the scanner tab content
pub fn render_scanner_tab(app: &mut TurnstileApp, ui: &mut egui::Ui) {
    let theme = app.ui.current_theme.clone();

    ui.vertical_centered(|ui| {
        ui.add_space(4.0);
        ui.label(
            RichText::new("Point your camera at a QR code")
                .color(theme.text_muted)
                .size(12.0),
        );
    });
    ui.add_space(8.0);

    section_frame(app, ui, "Scanner", |app, ui| match app.session.phase {
        Phase::Scanning => render_scanning(app, ui),
        Phase::Verifying => render_verifying(app, ui),
        Phase::Accepted => render_accepted(app, ui),
        Phase::Rejected => render_rejected(app, ui),
        Phase::Failed => render_failed(app, ui),
    });

    ui.add_space(12.0);

    // Action row
    ui.horizontal(|ui| {
        let can_rescan = app.session.phase.is_terminal();
        if ui
            .add_enabled(can_rescan, egui::Button::new("Scan Another Code"))
            .clicked()
        {
            app.restart_scan();
        }

        if ui
            .add_enabled(!app.ping_in_flight(), egui::Button::new("Test Connection"))
            .clicked()
        {
            app.test_connection();
        }
    });
}

fn render_scanning(app: &mut TurnstileApp, ui: &mut egui::Ui) {
    let theme = app.ui.current_theme.clone();

    ui.vertical_centered(|ui| {
        let (rect, _) = ui.allocate_exact_size(Vec2::splat(VIEWPORT_SIZE), Sense::hover());
        let painter = ui.painter();
        painter.rect_filled(rect, 8.0, theme.bg_darkest);

        // Corner guides marking the scan region
        let guide = rect.shrink(18.0);
        let len = 26.0;
        let stroke = Stroke::new(3.0, theme.accent);
        let corners = [
            (guide.left_top(), vec2(len, 0.0), vec2(0.0, len)),
            (guide.right_top(), vec2(-len, 0.0), vec2(0.0, len)),
            (guide.left_bottom(), vec2(len, 0.0), vec2(0.0, -len)),
            (guide.right_bottom(), vec2(-len, 0.0), vec2(0.0, -len)),
        ];
        for (corner, dx, dy) in corners {
            painter.line_segment([corner, corner + dx], stroke);
            painter.line_segment([corner, corner + dy], stroke);
        }

        ui.add_space(10.0);
        ui.horizontal(|ui| {
            ui.add_space(ui.available_width() / 2.0 - 50.0);
            ui.spinner();
            ui.label(RichText::new("Scanning...").color(theme.text_secondary));
        });

        if !app.session.decoder_active() {
            ui.add_space(4.0);
            ui.label(
                RichText::new("Waiting for the camera to come up")
                    .color(theme.text_muted)
                    .size(11.0),
            );
        }

        // Desktop capture backends report no torch; the button only shows
        // where toggling one would actually work.
        if app.config.scanner.prefer_torch_button && app.session.torch_available() {
            ui.add_space(6.0);
            let _ = ui.button("Torch");
        }
    });
}

fn render_verifying(app: &mut TurnstileApp, ui: &mut egui::Ui) {
    let theme = app.ui.current_theme.clone();

    ui.vertical_centered(|ui| {
        ui.add_space(24.0);
        ui.spinner();
        ui.add_space(12.0);
        ui.label(
            RichText::new("Verifying Scan...")
                .size(18.0)
                .strong()
                .color(theme.text_primary),
        );
        ui.add_space(4.0);
        ui.label(
            RichText::new("Waiting for the check-in service")
                .color(theme.text_muted)
                .size(12.0),
        );
        ui.add_space(24.0);
    });
}

fn render_accepted(app: &mut TurnstileApp, ui: &mut egui::Ui) {
    let theme = app.ui.current_theme.clone();

    ui.vertical_centered(|ui| {
        ui.add_space(12.0);
        draw_glyph(ui, theme.success, Glyph::Check);
        ui.add_space(8.0);
        ui.label(
            RichText::new("Scan Complete!")
                .size(18.0)
                .strong()
                .color(theme.success),
        );

        if let Some(message) = app
            .session
            .outcome
            .as_ref()
            .and_then(|o| o.message.as_deref())
        {
            ui.add_space(4.0);
            ui.label(RichText::new(message).color(theme.text_secondary));
        }
    });

    ui.add_space(12.0);
    render_scan_details(app, ui);
}

fn render_rejected(app: &mut TurnstileApp, ui: &mut egui::Ui) {
    let theme = app.ui.current_theme.clone();

    ui.vertical_centered(|ui| {
        ui.add_space(12.0);
        draw_glyph(ui, theme.error, Glyph::Cross);
        ui.add_space(8.0);
        ui.label(
            RichText::new("Verification Failed")
                .size(18.0)
                .strong()
                .color(theme.error),
        );
        ui.add_space(4.0);

        let message = app
            .session
            .outcome
            .as_ref()
            .and_then(|o| o.message.as_deref())
            .unwrap_or("You are not a verified user for this event.");
        ui.label(RichText::new(message).color(theme.text_secondary));
    });

    ui.add_space(12.0);
    render_scan_details(app, ui);
}

fn render_failed(app: &mut TurnstileApp, ui: &mut egui::Ui) {
    let theme = app.ui.current_theme.clone();

    ui.vertical_centered(|ui| {
        ui.add_space(12.0);
        draw_glyph(ui, theme.warning, Glyph::Alert);
        ui.add_space(8.0);
        ui.label(
            RichText::new("Scan failed. Try again.")
                .size(18.0)
                .strong()
                .color(theme.warning),
        );

        if let Some(ref detail) = app.session.error {
            ui.add_space(4.0);
            ui.label(
                RichText::new(detail)
                    .color(theme.text_muted)
                    .size(11.0),
            );
        }
        ui.add_space(12.0);
    });
}

/// Raw payload, parsed fields, and decode time for a finished scan
fn render_scan_details(app: &mut TurnstileApp, ui: &mut egui::Ui) {
    let theme = app.ui.current_theme.clone();

    if let Some(ref record) = app.session.record {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Name:").color(theme.text_muted));
            ui.label(
                RichText::new(record.name.as_deref().unwrap_or("-"))
                    .color(theme.text_primary),
            );
        });
        ui.horizontal(|ui| {
            ui.label(RichText::new("Event Id:").color(theme.text_muted));
            ui.label(
                RichText::new(record.event_id.as_deref().unwrap_or("-"))
                    .color(theme.text_primary),
            );
        });
    }

    if let Some(scanned_at) = app.session.scanned_at {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Scanned at:").color(theme.text_muted));
            ui.label(
                RichText::new(scanned_at.format("%H:%M:%S").to_string())
                    .color(theme.text_primary),
            );
        });
    }

    if let Some(ref raw) = app.session.raw_payload {
        ui.add_space(8.0);
        egui::Frame::none()
            .fill(theme.bg_darkest)
            .rounding(4.0)
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(
                    RichText::new(raw)
                        .monospace()
                        .size(11.0)
                        .color(theme.text_secondary),
                );
            });
    }
}

fn draw_glyph(ui: &mut egui::Ui, color: Color32, glyph: Glyph) {
    let (rect, _) = ui.allocate_exact_size(Vec2::splat(56.0), Sense::hover());
    let painter = ui.painter();
    let center = rect.center();
    painter.circle_stroke(center, 26.0, Stroke::new(3.0, color));

    let stroke = Stroke::new(3.5, color);
    match glyph {
        Glyph::Check => {
            painter.line_segment([center + vec2(-11.0, 1.0), center + vec2(-3.0, 9.0)], stroke);
            painter.line_segment([center + vec2(-3.0, 9.0), center + vec2(11.0, -8.0)], stroke);
        }
        Glyph::Cross => {
            painter.line_segment([center + vec2(-9.0, -9.0), center + vec2(9.0, 9.0)], stroke);
            painter.line_segment([center + vec2(-9.0, 9.0), center + vec2(9.0, -9.0)], stroke);
        }
        Glyph::Alert => {
            painter.line_segment([center + vec2(0.0, -11.0), center + vec2(0.0, 4.0)], stroke);
            painter.circle_filled(center + vec2(0.0, 11.0), 2.2, color);
        }
    }
}
