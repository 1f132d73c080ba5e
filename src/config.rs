//! Match configuration, variant presets and user settings
//!
//! `MatchConfig` is fixed for a run and handed to `Match::new`. `Settings`
//! are the player's preferences, persisted as JSON (a file on native,
//! LocalStorage in the browser).

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// The two shipped builds of the game. They only differ in arena size and text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// 800x600
    #[default]
    Classic,
    /// 1600x1200
    Duff,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "classic",
            Variant::Duff => "duff",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "le-pong" => Some(Variant::Classic),
            "duff" | "duffmaster" => Some(Variant::Duff),
            _ => None,
        }
    }

    /// Arena size (width, height)
    pub fn arena_size(&self) -> (f32, f32) {
        match self {
            Variant::Classic => (800.0, 600.0),
            Variant::Duff => (1600.0, 1200.0),
        }
    }
}

/// Immutable per-run simulation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub arena_width: f32,
    pub arena_height: f32,
    pub ball_radius: f32,
    /// Velocity given to the ball on construction and on every reset
    pub ball_start_velocity: Vec2,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_speed: f32,
    /// Paddle x distance from its own side wall
    pub paddle_inset: f32,
    pub hit_speedup: f32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::for_variant(Variant::Classic)
    }
}

impl MatchConfig {
    pub fn for_variant(variant: Variant) -> Self {
        let (arena_width, arena_height) = variant.arena_size();
        Self {
            arena_width,
            arena_height,
            ball_radius: BALL_RADIUS,
            ball_start_velocity: Vec2::new(BALL_START_VX, BALL_START_VY),
            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_speed: PADDLE_SPEED,
            paddle_inset: PADDLE_INSET,
            hit_speedup: HIT_SPEEDUP,
        }
    }

    /// Arena centre, where the ball is (re)spawned
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.arena_width / 2.0, self.arena_height / 2.0)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("arena_width", self.arena_width)?;
        positive("arena_height", self.arena_height)?;
        positive("ball_radius", self.ball_radius)?;
        positive("paddle_width", self.paddle_width)?;
        positive("paddle_height", self.paddle_height)?;
        positive("paddle_speed", self.paddle_speed)?;

        if !self.ball_start_velocity.is_finite() {
            return Err(ConfigError::Invalid {
                field: "ball_start_velocity",
                reason: format!("{} is not finite", self.ball_start_velocity),
            });
        }
        if !(self.paddle_inset >= 0.0 && self.paddle_inset < self.arena_width / 2.0) {
            return Err(ConfigError::Invalid {
                field: "paddle_inset",
                reason: format!(
                    "{} must lie in [0, {})",
                    self.paddle_inset,
                    self.arena_width / 2.0
                ),
            });
        }
        if !(self.hit_speedup.is_finite() && self.hit_speedup > 1.0) {
            return Err(ConfigError::Invalid {
                field: "hit_speedup",
                reason: format!("{} must be greater than 1", self.hit_speedup),
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} must be positive and finite"),
        })
    }
}

/// Text and font sizes shown by the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub window_title: &'static str,
    /// Heading on first launch
    pub title: &'static str,
    /// Heading after coming back from a won match
    pub return_title: &'static str,
    pub start_msg: &'static str,
    pub controls_msg: &'static str,
    pub restart_msg: &'static str,
    pub left_wins: &'static str,
    pub right_wins: &'static str,
    pub title_size: f32,
    pub start_msg_size: f32,
    pub controls_size: f32,
}

impl Theme {
    pub fn for_variant(variant: Variant) -> Self {
        let (window_title, return_title) = match variant {
            Variant::Classic => ("LE PONG", "LE PONG"),
            Variant::Duff => ("DUFFMASTERPONG", "DUFF PONG"),
        };
        Self {
            window_title,
            title: "LE PONG",
            return_title,
            start_msg: "Press Space to play, Esc to quit",
            controls_msg: "Use W and S to control left paddle, Up and Down to control right paddle",
            restart_msg: "Press space to play again, B to go back to title screen",
            left_wins: "Left Player Wins!!",
            right_wins: "Right Player Wins!!",
            title_size: 72.0,
            start_msg_size: 30.0,
            controls_size: 20.0,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::for_variant(Variant::Classic)
    }
}

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub variant: Variant,
    /// FPS overlay visible at startup
    pub show_fps: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            variant: Variant::Classic,
            show_fps: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
        }
    }
}

impl Settings {
    pub fn match_config(&self) -> MatchConfig {
        MatchConfig::for_variant(self.variant)
    }

    pub fn theme(&self) -> Theme {
        Theme::for_variant(self.variant)
    }

    /// Effective sound effect gain
    pub fn sfx_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Effective music gain
    pub fn music_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.music_volume).clamp(0.0, 1.0)
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("master_volume", self.master_volume),
            ("sfx_volume", self.sfx_volume),
            ("music_volume", self.music_volume),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{value} must lie in [0, 1]"),
                });
            }
        }
        Ok(())
    }

    /// Load settings from a JSON file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Settings file read by the native host when none is given
    #[cfg(not(target_arch = "wasm32"))]
    pub const DEFAULT_PATH: &'static str = "le_pong_settings.json";

    /// Load settings from the default file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::load_or_default(Self::DEFAULT_PATH)
    }

    /// A missing file means defaults; an unreadable or invalid one is
    /// reported and ignored
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("Using default settings");
            return Self::default();
        }
        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring settings file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "le_pong_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e}"),
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
            match serde_json::to_string(self) {
                Ok(json) => {
                    if storage.set_item(Self::STORAGE_KEY, &json).is_ok() {
                        log::info!("Settings saved");
                    } else {
                        log::warn!("Failed to write settings to LocalStorage");
                    }
                }
                Err(e) => log::warn!("Failed to serialize settings: {e}"),
            }
        }
    }
}
