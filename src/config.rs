use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scanner::DecoderConfig;
use crate::ui::theme::ThemePreset;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub launcher: LauncherConfig,
    #[serde(default)]
    pub scanner: ScannerConfig,
    #[serde(default)]
    pub verification: VerificationConfig,
}

/// Appearance and behavior settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LauncherConfig {
    /// Color theme preset
    #[serde(default)]
    pub theme: ThemePreset,
}

/// Camera decoder settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Frame sampling rate for QR detection
    #[serde(default = "default_fps")]
    pub frames_per_second: u32,
    /// Side length of the centered square scan region, in pixels
    #[serde(default = "default_scan_region")]
    pub scan_region: u32,
    /// Persist the selected camera across runs
    #[serde(default = "default_true")]
    pub remember_last_camera: bool,
    /// Offer a torch toggle when the capture backend supports one
    #[serde(default = "default_true")]
    pub prefer_torch_button: bool,
    /// Remembered camera device index
    #[serde(default)]
    pub camera_index: Option<u32>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            frames_per_second: default_fps(),
            scan_region: default_scan_region(),
            remember_last_camera: true,
            prefer_torch_button: true,
            camera_index: None,
        }
    }
}

fn default_fps() -> u32 {
    10
}

fn default_scan_region() -> u32 {
    250
}

fn default_true() -> bool {
    true
}

/// Check-in service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationConfig {
    /// Base URL of the event check-in service
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "https://uemev-backend.onrender.com".to_string()
}

impl Config {
    /// Decoder configuration for the configured (or default) camera
    pub fn decoder_config(&self) -> DecoderConfig {
        DecoderConfig {
            camera_index: self.scanner.camera_index.unwrap_or(0),
            frames_per_second: self.scanner.frames_per_second,
            scan_region: self.scanner.scan_region,
        }
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("com", "turnstile", "Turnstile")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        let config_dir = dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            tracing::info!("Loaded configuration from {:?}", path);
            Ok(config)
        } else {
            tracing::info!("No configuration file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        tracing::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_decoder_expectations() {
        let config = Config::default();
        assert_eq!(config.scanner.frames_per_second, 10);
        assert_eq!(config.scanner.scan_region, 250);
        assert!(config.scanner.remember_last_camera);
        assert!(config.scanner.prefer_torch_button);
        assert!(config.scanner.camera_index.is_none());
        assert!(!config.verification.base_url.is_empty());

        let decoder = config.decoder_config();
        assert_eq!(decoder.camera_index, 0);
        assert_eq!(decoder.frames_per_second, 10);
        assert_eq!(decoder.scan_region, 250);
    }

    #[test]
    fn test_empty_file_parses_to_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.scanner.frames_per_second, 10);
        assert_eq!(
            config.verification.base_url,
            Config::default().verification.base_url
        );
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config: Config = toml::from_str(
            "[verification]\nbase_url = \"http://localhost:3000\"\n\n[scanner]\ncamera_index = 2\n",
        )
        .unwrap();
        assert_eq!(config.verification.base_url, "http://localhost:3000");
        assert_eq!(config.scanner.camera_index, Some(2));
        assert_eq!(config.scanner.scan_region, 250);
        assert_eq!(config.decoder_config().camera_index, 2);
    }

    #[test]
    fn test_round_trip_through_toml_file() {
        let mut config = Config::default();
        config.scanner.camera_index = Some(1);
        config.scanner.frames_per_second = 15;
        config.verification.base_url = "http://localhost:8080".to_string();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(toml::to_string_pretty(&config).unwrap().as_bytes())
            .unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        let loaded: Config = toml::from_str(&content).unwrap();
        assert_eq!(loaded.scanner.camera_index, Some(1));
        assert_eq!(loaded.scanner.frames_per_second, 15);
        assert_eq!(loaded.verification.base_url, "http://localhost:8080");
    }
}
