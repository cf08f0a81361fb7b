//! Control panel settings and preferences
//!
//! Persisted in LocalStorage. Ball state itself is never saved.

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::consts::*;

/// Values behind the control panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Gravity in pixels/s² (the panel shows it divided by 100, in m/s²)
    pub gravity: f32,
    /// Radius for newly spawned balls
    pub ball_radius: f32,
    /// Fill color for newly spawned balls, as the picker reports it
    pub ball_color: String,
    /// Page background image, if any
    pub background_url: Option<String>,
    /// Whether the control panel is expanded
    pub controls_visible: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            ball_radius: DEFAULT_BALL_RADIUS,
            ball_color: "#ff4136".to_string(),
            background_url: None,
            controls_visible: true,
        }
    }
}

impl Settings {
    /// Clamp values into the ranges the controls can produce
    pub fn sanitize(&mut self) {
        self.gravity = if self.gravity.is_finite() {
            self.gravity.clamp(0.0, MAX_GRAVITY)
        } else {
            DEFAULT_GRAVITY
        };
        self.ball_radius = if self.ball_radius.is_finite() {
            self.ball_radius.clamp(MIN_BALL_RADIUS, MAX_BALL_RADIUS)
        } else {
            DEFAULT_BALL_RADIUS
        };
        if Rgba::from_hex(&self.ball_color).is_none() {
            self.ball_color = Self::default().ball_color;
        }
        if self
            .background_url
            .as_deref()
            .is_some_and(|url| url.trim().is_empty())
        {
            self.background_url = None;
        }
    }

    /// Parsed spawn color (falls back to the default on a bad picker value)
    pub fn color(&self) -> Rgba {
        Rgba::from_hex(&self.ball_color).unwrap_or_else(|| {
            log::warn!("Bad ball color {:?}, using default", self.ball_color);
            Rgba::from_hex(&Self::default().ball_color).unwrap_or_default()
        })
    }

    /// Gravity readout in m/s² with two decimals
    pub fn gravity_label(&self) -> String {
        format!("{:.2}", self.gravity / 100.0)
    }

    /// Size readout
    pub fn radius_label(&self) -> String {
        format!("{}", self.ball_radius.round() as i32)
    }

    /// Parse settings JSON, sanitizing whatever was stored
    pub fn from_json(json: &str) -> Option<Self> {
        let mut settings: Settings = serde_json::from_str(json).ok()?;
        settings.sanitize();
        Some(settings)
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "ball_drop_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Some(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    None => log::warn!("Stored settings are corrupt, ignoring"),
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
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Failed to save settings");
                }
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("No LocalStorage on native, using default settings ({})", Self::STORAGE_KEY);
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

/// Ball counter text
pub fn count_label(count: usize) -> String {
    format!("Balls: {}", count)
}

/// Body style properties for a background image (or for clearing it)
pub fn background_style(url: Option<&str>) -> [(&'static str, String); 4] {
    match url.map(str::trim).filter(|u| !u.is_empty()) {
        Some(url) => [
            ("background-image", format!("url(\"{}\")", url.replace('"', "%22"))),
            ("background-size", "cover".to_string()),
            ("background-repeat", "no-repeat".to_string()),
            ("background-position", "center center".to_string()),
        ],
        None => [
            ("background-image", "none".to_string()),
            ("background-size", "auto".to_string()),
            ("background-repeat", "no-repeat".to_string()),
            ("background-position", "center center".to_string()),
        ],
    }
}
