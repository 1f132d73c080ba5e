//! Match state and core simulation types
//!
//! `Match` is the single owner of the ball, both paddles and the phase.
//! Hosts only ever see a `RenderState` copy.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, paddle_hitbox};
use crate::config::MatchConfig;
use crate::input::Action;

/// Which player / which side of the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Title screen, waiting for confirm
    Title,
    /// Active play
    Playing,
    /// Ball left the arena; carries the winning side
    Won(Side),
}

impl MatchPhase {
    pub fn winner(&self) -> Option<Side> {
        match self {
            MatchPhase::Won(side) => Some(*side),
            _ => None,
        }
    }
}

/// Something the simulation wants the presentation layer to know about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Ball bounced off the top or bottom wall
    WallHit,
    /// Ball overlapped a paddle
    PaddleHit(Side),
    /// Ball left the arena
    Goal { winner: Side },
}

/// The ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    radius: f32,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self { pos, vel, radius }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

/// A player paddle. Only `y` changes during a match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    side: Side,
    x: f32,
    pub y: f32,
    width: f32,
    height: f32,
    speed: f32,
}

impl Paddle {
    /// Paddle for `side`, vertically centred
    pub fn new(side: Side, config: &MatchConfig) -> Self {
        let x = match side {
            Side::Left => config.paddle_inset,
            Side::Right => config.arena_width - config.paddle_inset,
        };
        Self {
            side,
            x,
            y: config.arena_height / 2.0,
            width: config.paddle_width,
            height: config.paddle_height,
            speed: config.paddle_speed,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Rectangle the ball collides with
    pub fn hitbox(&self) -> Rect {
        paddle_hitbox(self.pos(), self.width, self.height)
    }

    /// Rectangle drawn as the paddle body (centred on x)
    pub fn visual_rect(&self) -> Rect {
        Rect::new(
            self.x - self.width / 2.0,
            self.y - self.height / 2.0,
            crate::consts::PADDLE_HITBOX_WIDTH,
            crate::consts::PADDLE_HITBOX_HEIGHT,
        )
    }

    /// Move by `dy` and clamp the centre to [0, arena_height]
    pub fn shift(&mut self, dy: f32, arena_height: f32) {
        self.y += dy;
        if self.y < 0.0 {
            self.y = 0.0;
        }
        if self.y > arena_height {
            self.y = arena_height;
        }
    }
}

/// Read-only view of a match for drawing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderState {
    pub phase: MatchPhase,
    pub ball: Ball,
    pub left_paddle: Paddle,
    pub right_paddle: Paddle,
    pub arena: Vec2,
}

impl RenderState {
    pub fn winner(&self) -> Option<Side> {
        self.phase.winner()
    }
}

/// One game session: ball, both paddles and the phase
#[derive(Debug, Clone)]
pub struct Match {
    pub(crate) config: MatchConfig,
    pub(crate) phase: MatchPhase,
    pub(crate) ball: Ball,
    pub(crate) left: Paddle,
    pub(crate) right: Paddle,
}

impl Match {
    /// New match on the title screen with the ball centred
    pub fn new(config: MatchConfig) -> Self {
        Self {
            phase: MatchPhase::Title,
            ball: Ball::new(
                config.center(),
                config.ball_start_velocity,
                config.ball_radius,
            ),
            left: Paddle::new(Side::Left, &config),
            right: Paddle::new(Side::Right, &config),
            config,
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn render_state(&self) -> RenderState {
        RenderState {
            phase: self.phase,
            ball: self.ball,
            left_paddle: self.left,
            right_paddle: self.right,
            arena: Vec2::new(self.config.arena_width, self.config.arena_height),
        }
    }

    /// Put the ball back in the centre at the canonical speed
    pub fn reset_ball(&mut self) {
        self.ball.pos = self.config.center();
        self.ball.vel = self.config.ball_start_velocity;
    }

    /// Apply a discrete action. Returns the new phase if it changed.
    ///
    /// Overlay toggling is a host concern and is ignored here.
    pub fn handle_action(&mut self, action: Action) -> Option<MatchPhase> {
        let next = match (self.phase, action) {
            (MatchPhase::Title, Action::Confirm) => MatchPhase::Playing,
            (MatchPhase::Won(_), Action::Confirm) => {
                self.reset_ball();
                MatchPhase::Playing
            }
            (MatchPhase::Won(_), Action::ReturnToTitle) => {
                self.reset_ball();
                MatchPhase::Title
            }
            _ => return None,
        };

        log::info!("Phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
        Some(next)
    }
}
