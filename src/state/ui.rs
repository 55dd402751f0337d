//! UI-related application state

use crate::ui::theme::Theme;

/// Application tabs representing the main navigation sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    /// Scanner tab: scan viewport, verification result, scan actions
    #[default]
    Scanner,
    /// Settings tab: theme, camera and decoder options, service URL
    Settings,
}

/// UI-related state
pub struct UiState {
    /// Current theme
    pub current_theme: Theme,
    /// Currently selected tab
    pub active_tab: Tab,
    /// Whether theme needs to be applied
    pub theme_dirty: bool,
    /// Whether to show the About dialog
    pub show_about_dialog: bool,
    /// Edit buffer for the service base URL in Settings
    pub base_url_draft: String,
}

impl UiState {
    /// Create a new UiState with the given theme and base URL draft
    pub fn new(theme: Theme, base_url: &str) -> Self {
        Self {
            current_theme: theme,
            active_tab: Tab::default(),
            theme_dirty: true, // Apply theme on first frame
            show_about_dialog: false,
            base_url_draft: base_url.to_string(),
        }
    }
}
