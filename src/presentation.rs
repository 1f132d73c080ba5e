//! Presentation hooks
//!
//! The game never touches a window or an audio device. It talks to a
//! `PresentationBridge` supplied by the host and tells it what to draw and
//! which sounds to start or stop.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::Theme;
use crate::sim::{GameEvent, MatchPhase, Paddle, Rect, RenderState, Side};

/// RGBA colour, 0-255 per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const GREEN: Color = Color::rgb(0, 228, 48);
    pub const YELLOW: Color = Color::rgb(253, 249, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// CSS `rgba()` string for canvas-style APIs
    pub fn to_css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {:.3})",
            self.r,
            self.g,
            self.b,
            self.a as f32 / 255.0
        )
    }
}

/// One-shot sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundId {
    /// Ball hits a paddle or a wall
    PaddleHit,
    /// Someone scored
    Winner,
}

/// Looping music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MusicId {
    TitleTheme,
}

/// Draw and audio sink implemented by the host
pub trait PresentationBridge {
    fn clear(&mut self, color: Color);
    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn draw_rect(&mut self, rect: Rect, color: Color);
    /// Draw text with its top-left corner at `pos`
    fn draw_text(&mut self, text: &str, pos: Vec2, size: f32, color: Color);
    /// Width of `text` at `size`, in arena units
    fn measure_text(&self, text: &str, size: f32) -> f32;
    fn draw_fps(&mut self, pos: Vec2, fps: u32);

    fn play(&mut self, sound: SoundId);
    fn stop_sound(&mut self, sound: SoundId);
    /// Start a music track looping. Calling it for a track that is already
    /// playing must not restart it.
    fn play_looping(&mut self, music: MusicId);
    fn stop(&mut self, music: MusicId);
}

/// Turns phase changes and simulation events into audio calls
#[derive(Debug, Clone, Default)]
pub struct AudioDirector {
    last_phase: Option<MatchPhase>,
}

impl AudioDirector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call once per frame after the simulation has run
    pub fn update(
        &mut self,
        phase: MatchPhase,
        events: &[GameEvent],
        bridge: &mut impl PresentationBridge,
    ) {
        let was_title = matches!(self.last_phase, Some(MatchPhase::Title));
        let is_title = phase == MatchPhase::Title;
        let entered = self.last_phase != Some(phase);

        if is_title && entered {
            bridge.stop_sound(SoundId::Winner);
            bridge.play_looping(MusicId::TitleTheme);
        } else if was_title && !is_title {
            bridge.stop(MusicId::TitleTheme);
        }
        self.last_phase = Some(phase);

        for event in events {
            let sound = match event {
                GameEvent::WallHit | GameEvent::PaddleHit(_) => SoundId::PaddleHit,
                GameEvent::Goal { .. } => SoundId::Winner,
            };
            log::debug!("{:?} -> {:?}", event, sound);
            bridge.play(sound);
        }
    }
}

/// What the title screen should say
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitleHeading {
    /// First launch
    #[default]
    Launch,
    /// Came back from a finished match
    Return,
}

/// Draw one frame for `state`
pub fn draw_frame(
    state: &RenderState,
    theme: &Theme,
    heading: TitleHeading,
    fps: Option<u32>,
    bridge: &mut impl PresentationBridge,
) {
    bridge.clear(Color::BLACK);
    let center = state.arena / 2.0;

    match state.phase {
        MatchPhase::Title => {
            let title = match heading {
                TitleHeading::Launch => theme.title,
                TitleHeading::Return => theme.return_title,
            };
            draw_centered(bridge, title, center.x, center.y - 100.0, theme.title_size, Color::GREEN);
            draw_centered(
                bridge,
                theme.start_msg,
                center.x,
                center.y + 120.0,
                theme.start_msg_size,
                Color::WHITE,
            );
            draw_centered(
                bridge,
                theme.controls_msg,
                center.x,
                center.y + 180.0,
                theme.controls_size,
                Color::WHITE,
            );
        }
        MatchPhase::Playing | MatchPhase::Won(_) => {
            if let Some(winner) = state.winner() {
                let text = match winner {
                    Side::Left => theme.left_wins,
                    Side::Right => theme.right_wins,
                };
                draw_centered(bridge, text, center.x, center.y, theme.title_size, Color::YELLOW);
                draw_centered(
                    bridge,
                    theme.restart_msg,
                    center.x,
                    center.y + 160.0,
                    theme.controls_size,
                    Color::WHITE,
                );
            }

            bridge.draw_circle(state.ball.pos, state.ball.radius(), Color::WHITE);
            draw_paddle(bridge, &state.left_paddle);
            draw_paddle(bridge, &state.right_paddle);
        }
    }

    if let Some(fps) = fps {
        bridge.draw_fps(Vec2::new(10.0, 10.0), fps);
    }
}

/// Paddle body plus its collision box
fn draw_paddle(bridge: &mut impl PresentationBridge, paddle: &Paddle) {
    bridge.draw_rect(paddle.visual_rect(), Color::WHITE);
    bridge.draw_rect(paddle.hitbox(), Color::WHITE);
}

fn draw_centered(
    bridge: &mut impl PresentationBridge,
    text: &str,
    center_x: f32,
    y: f32,
    size: f32,
    color: Color,
) {
    let width = bridge.measure_text(text, size);
    bridge.draw_text(text, Vec2::new(center_x - width / 2.0, y), size, color);
}
