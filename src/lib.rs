//! Le Pong - two-player local Pong
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (ball, paddles, match phase)
//! - `input`: Key state tracking and mapping to paddle intents / actions
//! - `presentation`: Draw and audio hooks implemented by the host
//! - `game`: The per-frame cycle tying the above together
//! - `config`: Variant presets, UI strings and persisted settings
//! - `platform`: Headless and browser hosts

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod config;
pub mod game;
pub mod input;
pub mod platform;
pub mod presentation;
pub mod sim;

pub use config::{ConfigError, MatchConfig, Settings, Theme, Variant};
pub use game::Game;

/// Canonical game numbers shared by both variants
pub mod consts {
    /// Ball radius
    pub const BALL_RADIUS: f32 = 8.0;
    /// Ball velocity after construction or any reset (units/s)
    pub const BALL_START_VX: f32 = 300.0;
    pub const BALL_START_VY: f32 = 300.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 10.0;
    pub const PADDLE_HEIGHT: f32 = 100.0;
    pub const PADDLE_SPEED: f32 = 500.0;
    /// Distance of each paddle from its side wall
    pub const PADDLE_INSET: f32 = 50.0;

    /// Paddle collision box. Always 10x100 whatever the paddle's own
    /// width/height say (only the anchor uses those).
    pub const PADDLE_HITBOX_WIDTH: f32 = 10.0;
    pub const PADDLE_HITBOX_HEIGHT: f32 = 100.0;

    /// Horizontal speed multiplier on every paddle hit (no cap)
    pub const HIT_SPEEDUP: f32 = 1.1;

    /// Frames averaged by the FPS overlay
    pub const FPS_WINDOW: usize = 60;
}
