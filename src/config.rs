//! Persisted user settings.
//!
//! The screensaver remembers how many toasters to fly and which effects are
//! on. They live in a small JSON file; anything missing from the file falls
//! back to the defaults.

use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::core::{DEFAULT_TOASTERS, MAX_TOASTERS};
use crate::error::Result;
use crate::pipeline::RenderOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub toaster_count: usize,
    pub show_scanlines: bool,
    pub show_glow: bool,
    pub show_trails: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            toaster_count: DEFAULT_TOASTERS,
            show_scanlines: true,
            show_glow: true,
            show_trails: true,
        }
    }
}

impl Settings {
    /// Reads settings from `path`. A missing file is not an error and yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&text)?;
        info!("Loaded settings from {}", path.display());
        Ok(settings.clamped())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(&self.clamped())?;
        fs::write(path, text)?;
        info!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Toaster count forced into `1..=MAX_TOASTERS`.
    pub fn clamped(self) -> Self {
        let count = self.toaster_count.clamp(1, MAX_TOASTERS);
        if count != self.toaster_count {
            warn!(
                "Toaster count {} out of range, using {}",
                self.toaster_count, count
            );
        }
        Self {
            toaster_count: count,
            ..self
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            show_scanlines: self.show_scanlines,
            show_glow: self.show_glow,
            show_trails: self.show_trails,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("flying_toasters_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn count_is_clamped_both_ways() {
        let low = Settings {
            toaster_count: 0,
            ..Settings::default()
        };
        let high = Settings {
            toaster_count: 99,
            ..Settings::default()
        };
        assert_eq!(low.clamped().toaster_count, 1);
        assert_eq!(high.clamped().toaster_count, MAX_TOASTERS);
        assert_eq!(Settings::default().clamped(), Settings::default());
    }

    #[test]
    fn save_then_load() {
        let path = temp_path("roundtrip");
        let settings = Settings {
            toaster_count: 3,
            show_scanlines: false,
            show_glow: true,
            show_trails: false,
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = temp_path("does_not_exist");
        assert_eq!(Settings::load(&path).unwrap(), Settings::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let path = temp_path("partial");
        fs::write(&path, r#"{ "show_glow": false, "toaster_count": 40 }"#).unwrap();
        let loaded = Settings::load(&path).unwrap();
        assert!(!loaded.show_glow);
        assert!(loaded.show_trails);
        assert_eq!(loaded.toaster_count, MAX_TOASTERS);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn garbage_file_is_an_error() {
        let path = temp_path("garbage");
        fs::write(&path, "toasters = lots").unwrap();
        assert!(Settings::load(&path).is_err());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn options_mirror_toggles() {
        let s = Settings {
            show_glow: false,
            ..Settings::default()
        };
        let o = s.render_options();
        assert!(o.show_scanlines && !o.show_glow && o.show_trails);
    }
}
