//! Match simulation module
//!
//! All gameplay logic lives here. Nothing in this module draws, plays
//! sounds or reads devices:
//! - Variable timestep, driven by the host's frame clock
//! - Single owner (`Match`) for ball, paddles and phase
//! - Outward notifications as `GameEvent`s only

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Rect, circle_rect_collision, paddle_hitbox};
pub use state::{Ball, GameEvent, Match, MatchPhase, Paddle, RenderState, Side};
pub use tick::{PaddleIntents, TickInput, advance};

impl Match {
    /// Advance one frame; see [`tick::advance`]
    pub fn advance(&mut self, dt: f32, intents: PaddleIntents) -> Vec<GameEvent> {
        tick::advance(self, &TickInput { intents }, dt)
    }
}
