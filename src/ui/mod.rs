//! UI modules for the Turnstile scanner
//!
//! Rendering code organized by tab, plus shared components and theming.

mod components;
mod scanner_tab;
mod settings_tab;
pub mod theme;

pub use components::{render_about_dialog, render_tab, section_frame};
pub use scanner_tab::render_scanner_tab;
pub use settings_tab::render_settings_tab;
