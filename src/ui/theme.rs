use eframe::egui::{self, Color32, Stroke, Visuals};
use serde::{Deserialize, Serialize};

/// Available theme presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreset {
    #[default]
    Indigo,
    Emerald,
    Graphite,
}

impl ThemePreset {
    /// Get all available presets
    pub fn all() -> &'static [ThemePreset] {
        &[
            ThemePreset::Indigo,
            ThemePreset::Emerald,
            ThemePreset::Graphite,
        ]
    }

    /// Get display name for the preset
    pub fn name(&self) -> &'static str {
        match self {
            ThemePreset::Indigo => "Indigo",
            ThemePreset::Emerald => "Emerald",
            ThemePreset::Graphite => "Graphite",
        }
    }

    /// Get the theme colors for this preset
    pub fn theme(&self) -> Theme {
        match self {
            ThemePreset::Indigo => Theme::indigo(),
            ThemePreset::Emerald => Theme::emerald(),
            ThemePreset::Graphite => Theme::graphite(),
        }
    }
}

/// Theme color definitions
#[derive(Debug, Clone)]
pub struct Theme {
    // Base colors
    pub bg_darkest: Color32,
    pub bg_dark: Color32,
    pub bg_medium: Color32,
    pub bg_light: Color32,

    // Text colors
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,

    // Accent colors
    pub accent: Color32,
    pub accent_hover: Color32,
    pub accent_muted: Color32,

    // Semantic colors
    pub success: Color32,
    pub warning: Color32,
    pub error: Color32,

    // UI element colors
    pub border: Color32,
    pub selection: Color32,
}

impl Theme {
    /// Indigo theme - default, event-badge blue
    pub fn indigo() -> Self {
        Self {
            bg_darkest: Color32::from_rgb(15, 15, 24),
            bg_dark: Color32::from_rgb(22, 22, 34),
            bg_medium: Color32::from_rgb(30, 30, 46),
            bg_light: Color32::from_rgb(44, 44, 66),

            text_primary: Color32::from_rgb(248, 248, 253),
            text_secondary: Color32::from_rgb(198, 200, 218),
            text_muted: Color32::from_rgb(136, 138, 160),

            accent: Color32::from_rgb(99, 102, 241),        // Indigo-500
            accent_hover: Color32::from_rgb(129, 140, 248), // Indigo-400
            accent_muted: Color32::from_rgb(67, 70, 190),   // Darker indigo

            success: Color32::from_rgb(34, 197, 94),  // Green-500
            warning: Color32::from_rgb(234, 179, 8),  // Yellow-500
            error: Color32::from_rgb(239, 68, 68),    // Red-500

            border: Color32::from_rgb(58, 58, 82),
            selection: Color32::from_rgb(99, 102, 241).gamma_multiply(0.3),
        }
    }

    /// Emerald theme - entry-granted green
    pub fn emerald() -> Self {
        Self {
            bg_darkest: Color32::from_rgb(10, 18, 15),
            bg_dark: Color32::from_rgb(17, 27, 23),
            bg_medium: Color32::from_rgb(24, 38, 32),
            bg_light: Color32::from_rgb(36, 56, 47),

            text_primary: Color32::from_rgb(240, 253, 248),
            text_secondary: Color32::from_rgb(190, 219, 205),
            text_muted: Color32::from_rgb(122, 152, 138),

            accent: Color32::from_rgb(16, 185, 129),        // Emerald-500
            accent_hover: Color32::from_rgb(52, 211, 153),  // Emerald-400
            accent_muted: Color32::from_rgb(12, 138, 98),   // Darker emerald

            success: Color32::from_rgb(74, 222, 128),  // Green-400
            warning: Color32::from_rgb(251, 191, 36),  // Amber-400
            error: Color32::from_rgb(251, 113, 133),   // Rose-400

            border: Color32::from_rgb(46, 68, 58),
            selection: Color32::from_rgb(16, 185, 129).gamma_multiply(0.3),
        }
    }

    /// Graphite theme - neutral, low-glare for dim venues
    pub fn graphite() -> Self {
        Self {
            bg_darkest: Color32::from_rgb(14, 15, 17),
            bg_dark: Color32::from_rgb(21, 22, 25),
            bg_medium: Color32::from_rgb(29, 31, 35),
            bg_light: Color32::from_rgb(43, 46, 52),

            text_primary: Color32::from_rgb(245, 246, 248),
            text_secondary: Color32::from_rgb(196, 200, 208),
            text_muted: Color32::from_rgb(134, 140, 150),

            accent: Color32::from_rgb(148, 163, 184),       // Slate-400
            accent_hover: Color32::from_rgb(176, 190, 210), // Lighter slate
            accent_muted: Color32::from_rgb(100, 116, 139), // Slate-500

            success: Color32::from_rgb(134, 239, 172),  // Green-300
            warning: Color32::from_rgb(253, 224, 71),   // Yellow-300
            error: Color32::from_rgb(252, 165, 165),    // Red-300

            border: Color32::from_rgb(55, 60, 68),
            selection: Color32::from_rgb(148, 163, 184).gamma_multiply(0.3),
        }
    }

    /// Apply this theme to egui's visuals
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = Visuals::dark();

        // Window and panel backgrounds
        visuals.window_fill = self.bg_dark;
        visuals.panel_fill = self.bg_dark;
        visuals.faint_bg_color = self.bg_medium;
        visuals.extreme_bg_color = self.bg_darkest;

        // Widget backgrounds
        visuals.widgets.noninteractive.bg_fill = self.bg_medium;
        visuals.widgets.noninteractive.weak_bg_fill = self.bg_light;
        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, self.border);
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text_secondary);

        // Inactive widgets
        visuals.widgets.inactive.bg_fill = self.bg_medium;
        visuals.widgets.inactive.weak_bg_fill = self.bg_light;
        visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, self.border);
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.text_primary);

        // Hovered widgets
        visuals.widgets.hovered.bg_fill = self.bg_light;
        visuals.widgets.hovered.weak_bg_fill = self.bg_light;
        visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, self.accent);
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.text_primary);

        // Active/pressed widgets
        visuals.widgets.active.bg_fill = self.accent_muted;
        visuals.widgets.active.weak_bg_fill = self.accent_muted;
        visuals.widgets.active.bg_stroke = Stroke::new(1.0, self.accent_hover);
        visuals.widgets.active.fg_stroke = Stroke::new(1.0, self.text_primary);

        // Open widgets (dropdowns, etc)
        visuals.widgets.open.bg_fill = self.bg_light;
        visuals.widgets.open.weak_bg_fill = self.bg_light;
        visuals.widgets.open.bg_stroke = Stroke::new(1.0, self.accent);
        visuals.widgets.open.fg_stroke = Stroke::new(1.0, self.text_primary);

        // Selection
        visuals.selection.bg_fill = self.selection;
        visuals.selection.stroke = Stroke::new(1.0, self.accent);

        // Hyperlinks
        visuals.hyperlink_color = self.accent;

        // Window styling
        visuals.window_stroke = Stroke::new(1.0, self.border);
        visuals.window_shadow = egui::epaint::Shadow::NONE;

        // Popup styling
        visuals.popup_shadow = egui::epaint::Shadow::NONE;

        ctx.set_visuals(visuals);
    }
}
