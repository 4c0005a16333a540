//! Effect settings and preferences
//!
//! Persisted in LocalStorage on the web.

use serde::{Deserialize, Serialize};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live particles per engine for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 400,
            QualityPreset::Medium => 1500,
            QualityPreset::High => 4000,
        }
    }
}

/// Effect settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Audio ===
    /// Sound cues enabled
    pub sound: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,

    // === Accessibility ===
    /// Reduced motion (skip the matrix backdrop and continuous emitters)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            sound: true,
            master_volume: 1.0,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        self.quality.max_particles()
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Parse settings JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Option<Self> {
        let mut settings: Self = serde_json::from_str(json).ok()?;
        settings.set_master_volume(settings.master_volume);
        Some(settings)
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "celebration_fx_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Some(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("no settings storage under {}, using defaults", Self::STORAGE_KEY);
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_caps() {
        assert_eq!(Settings::from_preset(QualityPreset::Low).max_particles(), 400);
        assert_eq!(Settings::default().max_particles(), 1500);
        assert_eq!(QualityPreset::High.max_particles(), 4000);
    }

    #[test]
    fn test_preset_names() {
        for preset in [QualityPreset::Low, QualityPreset::Medium, QualityPreset::High] {
            assert_eq!(QualityPreset::from_str(preset.as_str()), Some(preset));
        }
        assert_eq!(QualityPreset::from_str("med"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_str("ultra"), None);
    }

    #[test]
    fn test_json_roundtrip_and_partial() {
        let mut s = Settings::from_preset(QualityPreset::High);
        s.reduced_motion = true;
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(Settings::from_json(&json), Some(s));

        let partial = Settings::from_json(r#"{"sound": false}"#).unwrap();
        assert!(!partial.sound);
        assert_eq!(partial.quality, QualityPreset::Medium);

        assert_eq!(Settings::from_json("not json"), None);
    }

    #[test]
    fn test_defaults_play_at_full_volume() {
        let s = Settings::default();
        assert_eq!(s.master_volume, 1.0);
        assert!(s.sound);
        assert_eq!(Settings::from_json("{}"), Some(s));
    }

    #[test]
    fn test_volume_clamped() {
        let s = Settings::from_json(r#"{"master_volume": 3.0}"#).unwrap();
        assert_eq!(s.master_volume, 1.0);
        let mut s = Settings::default();
        s.set_master_volume(-1.0);
        assert_eq!(s.master_volume, 0.0);
    }
}
