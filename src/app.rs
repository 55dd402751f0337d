use std::time::Duration;

use eframe::egui::{self, RichText};
use futures::FutureExt;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::scanner::{self, CameraDevice};
use crate::state::{Phase, SessionState, StateEvent, Tab, UiState};
use crate::ui;
use crate::verify::{VerifyClient, VerifyError};

/// Main application state
pub struct TurnstileApp {
    /// Application configuration
    pub config: Config,
    /// UI-related state
    pub ui: UiState,
    /// Scan session state machine
    pub session: SessionState,
    /// Check-in service client
    verify_client: VerifyClient,
    /// Status message for the status bar
    pub status_message: String,
    /// Capture devices for the settings picker
    pub cameras: Vec<CameraDevice>,
    /// Async task for the connection test
    ping_task: Option<JoinHandle<Result<Duration, VerifyError>>>,
}

impl TurnstileApp {
    /// Create a new application instance
    pub fn new(_cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        let verify_client = VerifyClient::new(config.verification.base_url.clone())
            .expect("Failed to create HTTP client");

        let ui_state = UiState::new(
            config.launcher.theme.theme(),
            &config.verification.base_url,
        );

        let cameras = scanner::list_cameras();
        tracing::info!("Found {} capture device(s)", cameras.len());

        let mut session = SessionState::default();
        let events = session.start_scanning(&config.decoder_config());

        let mut app = Self {
            config,
            ui: ui_state,
            session,
            verify_client,
            status_message: "Scanning...".to_string(),
            cameras,
            ping_task: None,
        };
        app.apply_events(events);
        app
    }

    /// Apply events returned by state poll methods
    pub fn apply_events(&mut self, events: Vec<StateEvent>) {
        for event in events {
            match event {
                StateEvent::StatusMessage(msg) => self.status_message = msg,
                StateEvent::LogInfo(msg) => tracing::info!("{}", msg),
                StateEvent::LogError(msg) => tracing::error!("{}", msg),
            }
        }
    }

    /// Save configuration to disk
    pub fn save_config(&self) {
        if let Err(e) = self.config.save() {
            tracing::error!("Failed to save config: {}", e);
        }
    }

    /// Discard the shown result and start a fresh scan
    pub fn restart_scan(&mut self) {
        let decoder_config = self.config.decoder_config();
        let events = self.session.scan_again(&decoder_config);
        self.apply_events(events);
    }

    /// Re-enumerate capture devices
    pub fn refresh_cameras(&mut self) {
        self.cameras = scanner::list_cameras();
        tracing::info!("Found {} capture device(s)", self.cameras.len());
    }

    /// Switch to a different capture device
    pub fn select_camera(&mut self, index: u32) {
        self.config.scanner.camera_index = Some(index);
        if self.config.scanner.remember_last_camera {
            self.save_config();
        }

        // A live scan moves to the new camera immediately
        if self.session.phase == Phase::Scanning {
            self.restart_scan();
        }
    }

    /// Whether a connection test is currently running
    pub fn ping_in_flight(&self) -> bool {
        self.ping_task.is_some()
    }

    /// Probe the check-in service
    pub fn test_connection(&mut self) {
        if self.ping_task.is_some() {
            return;
        }

        self.status_message = "Testing connection...".to_string();
        let client = self.verify_client.clone();
        self.ping_task = Some(tokio::spawn(async move { client.ping().await }));
    }

    /// Apply the edited service base URL from Settings
    pub fn apply_base_url(&mut self) {
        let url = self.ui.base_url_draft.trim().trim_end_matches('/').to_string();
        if url.is_empty() {
            self.status_message = "Service URL cannot be empty".to_string();
            return;
        }

        match VerifyClient::new(url.clone()) {
            Ok(client) => {
                self.verify_client = client;
                self.config.verification.base_url = url;
                self.ui.base_url_draft = self.config.verification.base_url.clone();
                self.save_config();
                self.status_message = "Service URL updated".to_string();
            }
            Err(e) => {
                tracing::error!("Failed to rebuild HTTP client: {}", e);
                self.status_message = format!("Error: {}", e);
            }
        }
    }

    /// Poll the connection test task for completion
    fn poll_ping_task(&mut self, ctx: &egui::Context) {
        if let Some(task) = &mut self.ping_task {
            if task.is_finished() {
                let task = self.ping_task.take().unwrap();
                match task.now_or_never() {
                    Some(Ok(Ok(elapsed))) => {
                        self.status_message =
                            format!("Service reachable ({} ms)", elapsed.as_millis());
                    }
                    Some(Ok(Err(e))) => {
                        tracing::error!("Connection test failed: {}", e);
                        self.status_message = format!("Connection test failed: {}", e);
                    }
                    Some(Err(e)) => {
                        tracing::error!("Connection test task panicked: {}", e);
                        self.status_message = "Connection test failed".to_string();
                    }
                    None => {
                        // Shouldn't happen since we checked is_finished()
                        tracing::warn!("Task not ready despite is_finished()");
                    }
                }
            } else {
                ctx.request_repaint();
            }
        }
    }
}

impl eframe::App for TurnstileApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.ui.theme_dirty {
            self.ui.current_theme.apply(ctx);
            self.ui.theme_dirty = false;
        }

        // Poll async state
        let events = self.session.poll(ctx, &self.verify_client);
        self.apply_events(events);
        self.poll_ping_task(ctx);

        let theme = self.ui.current_theme.clone();

        // Header with title and tabs
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new("Turnstile")
                        .size(20.0)
                        .strong()
                        .color(theme.accent),
                );
                ui.label(
                    RichText::new("Event check-in scanner")
                        .color(theme.text_muted)
                        .size(12.0),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("About").clicked() {
                        self.ui.show_about_dialog = true;
                    }
                });
            });
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui::render_tab(self, ui, Tab::Scanner, "Scanner");
                ui::render_tab(self, ui, Tab::Settings, "Settings");
            });
        });

        // Status bar at bottom
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status_message);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        RichText::new(&self.config.verification.base_url)
                            .color(theme.text_muted)
                            .size(11.0),
                    );
                });
            });
        });

        // Main content area
        egui::CentralPanel::default().show(ctx, |ui| match self.ui.active_tab {
            Tab::Scanner => ui::render_scanner_tab(self, ui),
            Tab::Settings => ui::render_settings_tab(self, ui),
        });

        ui::render_about_dialog(self, ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        tracing::info!("Shutting down, releasing camera");
        self.session.shutdown();
    }
}
