//! Player preferences
//!
//! Persisted to LocalStorage as JSON. Natively these are always defaults.

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::scores::ScoreError;

/// Backend URL baked in at build time, relative to the page when it has no scheme
pub const DEFAULT_BACKEND_URL: &str = match option_env!("ARCADE_BACKEND_URL") {
    Some(url) => url,
    None => "/api",
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Last name used in the score dialog
    pub player_name: String,
    /// Score service base; `None` leaves the client disconnected
    pub backend_url: Option<String>,

    // === HUD ===
    pub show_fps: bool,
    /// Control hints under the canvas
    pub show_controls: bool,

    /// Keep scores in memory instead of calling the backend
    pub offline: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: String::new(),
            backend_url: Some(DEFAULT_BACKEND_URL.to_string()),
            show_fps: false,
            show_controls: true,
            offline: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "retro_arcade_settings";

    /// Resolve the backend URL against the page origin
    ///
    /// Returns `Ok(None)` when no backend is configured.
    pub fn backend_base(&self, origin: &str) -> Result<Option<Url>, ScoreError> {
        let Some(raw) = self.backend_url.as_deref().map(str::trim) else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(None);
        }

        let url = match Url::parse(raw) {
            Ok(url) => url,
            Err(_) => Url::parse(origin)
                .and_then(|origin| origin.join(raw))
                .map_err(|e| ScoreError::InvalidUrl(format!("{raw}: {e}")))?,
        };
        Ok(Some(url))
    }

    /// Remember the name from a successful submission
    pub fn remember_player(&mut self, name: &str) {
        self.player_name = name.to_string();
    }

    /// Flip the FPS readout, returning the new state
    pub fn toggle_fps(&mut self) -> bool {
        self.show_fps = !self.show_fps;
        self.show_fps
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        if let Some(json) = crate::platform::storage_get(Self::STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring unreadable settings: {e}"),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        match serde_json::to_string(self) {
            Ok(json) => {
                crate::platform::storage_set(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
            Err(e) => log::error!("Failed to serialize settings: {e}"),
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
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
    fn test_defaults() {
        let s = Settings::default();
        assert!(s.player_name.is_empty());
        assert!(s.show_controls);
        assert!(!s.offline);
        assert!(s.backend_url.is_some());
    }

    #[test]
    fn test_toggle_fps() {
        let mut s = Settings::default();
        assert!(s.toggle_fps());
        assert!(s.show_fps);
        assert!(!s.toggle_fps());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s: Settings = serde_json::from_str(r#"{"player_name":"Ada","show_fps":true}"#).unwrap();
        assert_eq!(s.player_name, "Ada");
        assert!(s.show_fps);
        assert!(s.show_controls);
    }

    #[test]
    fn test_relative_backend_resolves_against_origin() {
        let s = Settings {
            backend_url: Some("/api".to_string()),
            ..Settings::default()
        };
        let url = s.backend_base("https://arcade.example.com").unwrap().unwrap();
        assert_eq!(url.as_str(), "https://arcade.example.com/api");
    }

    #[test]
    fn test_absolute_backend_ignores_origin() {
        let s = Settings {
            backend_url: Some("https://scores.example.net/v1/".to_string()),
            ..Settings::default()
        };
        let url = s.backend_base("not a url").unwrap().unwrap();
        assert_eq!(url.host_str(), Some("scores.example.net"));
    }

    #[test]
    fn test_missing_or_bad_backend() {
        let s = Settings {
            backend_url: None,
            ..Settings::default()
        };
        assert_eq!(s.backend_base("https://a.example"), Ok(None));

        let s = Settings {
            backend_url: Some("/api".to_string()),
            ..Settings::default()
        };
        assert!(matches!(s.backend_base("nope"), Err(ScoreError::InvalidUrl(_))));
    }
}
