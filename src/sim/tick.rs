//! Per-frame simulation step
//!
//! Advances the match by a variable elapsed time while it is being played.

use serde::{Deserialize, Serialize};

use super::collision::circle_rect_collision;
use super::state::{GameEvent, Match, MatchPhase, Side};

/// Held paddle movement keys for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaddleIntents {
    pub left_up: bool,
    pub left_down: bool,
    pub right_up: bool,
    pub right_down: bool,
}

impl PaddleIntents {
    /// (up, down) for one side
    pub fn for_side(&self, side: Side) -> (bool, bool) {
        match side {
            Side::Left => (self.left_up, self.left_down),
            Side::Right => (self.right_up, self.right_down),
        }
    }
}

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub intents: PaddleIntents,
}

/// Advance the match by `dt` seconds. Does nothing unless the match is
/// being played. Returns what happened, in order.
pub fn advance(state: &mut Match, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    // Nothing moves without elapsed time
    if state.phase != MatchPhase::Playing || dt <= 0.0 {
        return events;
    }

    let width = state.config.arena_width;
    let height = state.config.arena_height;

    // Integrate
    let ball = &mut state.ball;
    ball.pos += ball.vel * dt;

    // Top and bottom walls. A ball sitting exactly on a wall only bounces
    // while it is still heading out.
    if ball.pos.y > height || (ball.pos.y == height && ball.vel.y > 0.0) {
        ball.pos.y = height;
        ball.vel.y = -ball.vel.y.abs();
        events.push(GameEvent::WallHit);
    }
    if ball.pos.y < 0.0 || (ball.pos.y == 0.0 && ball.vel.y < 0.0) {
        ball.pos.y = 0.0;
        ball.vel.y = ball.vel.y.abs();
        events.push(GameEvent::WallHit);
    }

    // Paddles: up first, then down, each clamped
    for paddle in [&mut state.left, &mut state.right] {
        let (up, down) = input.intents.for_side(paddle.side());
        let step = paddle.speed() * dt;
        if up {
            paddle.shift(-step, height);
        }
        if down {
            paddle.shift(step, height);
        }
    }

    // Paddle hits. Only bounce while heading toward the paddle so an
    // overlapping ball doesn't bounce twice.
    for paddle in [&state.left, &state.right] {
        let ball = &mut state.ball;
        if !circle_rect_collision(ball.pos, ball.radius(), &paddle.hitbox()) {
            continue;
        }
        events.push(GameEvent::PaddleHit(paddle.side()));

        let half_height = paddle.height() / 2.0;
        match paddle.side() {
            Side::Left if ball.vel.x < 0.0 => {
                ball.vel.x *= -state.config.hit_speedup;
                ball.vel.y = (ball.pos.y - paddle.y) / half_height * ball.vel.x;
            }
            Side::Right if ball.vel.x > 0.0 => {
                ball.vel.x *= -state.config.hit_speedup;
                ball.vel.y = (ball.pos.y - paddle.y) / half_height * -ball.vel.x;
            }
            _ => continue,
        }
        log::debug!(
            "{:?} paddle hit, ball vel now ({:.1}, {:.1})",
            paddle.side(),
            ball.vel.x,
            ball.vel.y
        );
    }

    // Goals
    let ball = &mut state.ball;
    let winner = if ball.pos.x < 0.0 {
        ball.pos.x = 0.0;
        Some(Side::Right)
    } else if ball.pos.x > width {
        ball.pos.x = width;
        Some(Side::Left)
    } else {
        None
    };

    if let Some(winner) = winner {
        ball.vel = glam::Vec2::ZERO;
        state.phase = MatchPhase::Won(winner);
        log::info!("Goal! {:?} player wins", winner);
        events.push(GameEvent::Goal { winner });
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchConfig;
    use crate::input::Action;
    use glam::Vec2;
    use proptest::prelude::*;

    const EPS: f32 = 1e-3;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < EPS
    }

    fn playing() -> Match {
        let mut m = Match::new(MatchConfig::default());
        m.handle_action(Action::Confirm);
        m
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn test_advance_ignored_outside_playing() {
        let mut m = Match::new(MatchConfig::default());
        let input = TickInput {
            intents: PaddleIntents {
                left_up: true,
                right_down: true,
                ..Default::default()
            },
        };
        let before = m.render_state();
        assert!(advance(&mut m, &input, 0.5).is_empty());
        assert_eq!(m.render_state(), before);

        m.phase = MatchPhase::Won(Side::Left);
        let before = m.render_state();
        assert!(advance(&mut m, &input, 0.5).is_empty());
        assert_eq!(m.render_state(), before);
    }

    #[test]
    fn test_integrates_and_bounces_off_bottom() {
        // Ball from the centre reaches the bottom wall in exactly one second
        let mut m = playing();
        let events = advance(&mut m, &idle(), 1.0);

        let ball = m.ball();
        assert!(approx(ball.pos.x, 700.0));
        assert!(approx(ball.pos.y, 600.0));
        assert_eq!(ball.vel, Vec2::new(300.0, -300.0));
        assert_eq!(events, vec![GameEvent::WallHit]);
        assert_eq!(m.phase(), MatchPhase::Playing);
    }

    #[test]
    fn test_ball_on_wall_moving_inward_does_not_bounce() {
        let mut m = playing();
        m.ball.pos = Vec2::new(400.0, 600.0);
        m.ball.vel = Vec2::new(100.0, -200.0);
        let events = advance(&mut m, &idle(), 0.01);
        assert!(approx(m.ball().pos.x, 401.0));
        assert!(approx(m.ball().pos.y, 598.0));
        assert_eq!(m.ball().vel, Vec2::new(100.0, -200.0));
        assert!(events.is_empty());

        m.ball.pos = Vec2::new(400.0, 0.0);
        m.ball.vel = Vec2::new(100.0, 200.0);
        let events = advance(&mut m, &idle(), 0.01);
        assert!(approx(m.ball().pos.y, 2.0));
        assert_eq!(m.ball().vel, Vec2::new(100.0, 200.0));
        assert!(events.is_empty());
    }

    #[test]
    fn test_bottom_wall_clamps_overshoot() {
        let mut m = playing();
        m.ball.pos = Vec2::new(400.0, 590.0);
        m.ball.vel = Vec2::new(100.0, 200.0);
        advance(&mut m, &idle(), 0.1);
        assert_eq!(m.ball().pos.y, 600.0);
        assert_eq!(m.ball().vel, Vec2::new(100.0, -200.0));
    }

    #[test]
    fn test_top_wall_bounce() {
        let mut m = playing();
        m.ball.pos = Vec2::new(400.0, 10.0);
        m.ball.vel = Vec2::new(-150.0, -200.0);
        let events = advance(&mut m, &idle(), 0.1);
        assert_eq!(m.ball().pos.y, 0.0);
        assert_eq!(m.ball().vel, Vec2::new(-150.0, 200.0));
        assert_eq!(events, vec![GameEvent::WallHit]);
    }

    #[test]
    fn test_paddles_move_and_clamp() {
        let mut m = playing();
        // Keep the ball out of the way
        m.ball.pos = Vec2::new(400.0, 300.0);
        m.ball.vel = Vec2::ZERO;

        let input = TickInput {
            intents: PaddleIntents {
                left_up: true,
                right_down: true,
                ..Default::default()
            },
        };
        advance(&mut m, &input, 0.1);
        assert!(approx(m.paddle(Side::Left).y, 250.0));
        assert!(approx(m.paddle(Side::Right).y, 350.0));

        advance(&mut m, &input, 2.0);
        assert_eq!(m.paddle(Side::Left).y, 0.0);
        assert_eq!(m.paddle(Side::Right).y, 600.0);
    }

    #[test]
    fn test_both_keys_cancel() {
        let mut m = playing();
        m.ball.vel = Vec2::ZERO;
        let input = TickInput {
            intents: PaddleIntents {
                left_up: true,
                left_down: true,
                ..Default::default()
            },
        };
        advance(&mut m, &input, 0.1);
        assert!(approx(m.paddle(Side::Left).y, 300.0));
    }

    #[test]
    fn test_left_paddle_hit_angle() {
        let mut m = playing();
        m.ball.pos = Vec2::new(48.0, 320.0);
        m.ball.vel = Vec2::new(-300.0, 50.0);

        // Tiny step so the ball stays on the paddle
        let events = advance(&mut m, &idle(), 1e-6);
        let vel = m.ball().vel;
        assert!(approx(vel.x, 330.0));
        assert!(approx(vel.y, 132.0));
        assert_eq!(events, vec![GameEvent::PaddleHit(Side::Left)]);
    }

    #[test]
    fn test_right_paddle_hit_mirrors() {
        let mut m = playing();
        // Right hitbox spans x 740..750, y 250..350
        m.ball.pos = Vec2::new(742.0, 280.0);
        m.ball.vel = Vec2::new(300.0, 0.0);

        advance(&mut m, &idle(), 1e-6);
        let vel = m.ball().vel;
        assert!(approx(vel.x, -330.0));
        // Struck above centre: deflects upward, same as the left paddle would
        assert!(approx(vel.y, -132.0));
    }

    #[test]
    fn test_no_double_bounce_while_overlapping() {
        let mut m = playing();
        m.ball.pos = Vec2::new(45.0, 300.0);
        m.ball.vel = Vec2::new(300.0, 0.0);

        let events = advance(&mut m, &idle(), 1e-3);
        // Still reported, but moving away so no bounce
        assert_eq!(events, vec![GameEvent::PaddleHit(Side::Left)]);
        assert_eq!(m.ball().vel, Vec2::new(300.0, 0.0));
    }

    #[test]
    fn test_speed_grows_every_hit() {
        let mut m = playing();
        m.ball.pos = Vec2::new(48.0, 300.0);
        m.ball.vel = Vec2::new(-1000.0, 0.0);
        advance(&mut m, &idle(), 1e-6);
        assert!(approx(m.ball().vel.x, 1100.0));

        m.ball.pos = Vec2::new(742.0, 300.0);
        advance(&mut m, &idle(), 1e-6);
        assert!(approx(m.ball().vel.x, -1210.0));
    }

    #[test]
    fn test_left_goal() {
        let mut m = playing();
        m.ball.pos = Vec2::new(2.0, 100.0);
        m.ball.vel = Vec2::new(-300.0, 0.0);

        // x = 2 - 3 = -1
        let events = advance(&mut m, &idle(), 0.01);
        assert_eq!(m.phase(), MatchPhase::Won(Side::Right));
        assert_eq!(m.ball().pos.x, 0.0);
        assert_eq!(m.ball().vel, Vec2::ZERO);
        assert_eq!(events, vec![GameEvent::Goal { winner: Side::Right }]);
    }

    #[test]
    fn test_right_goal() {
        let mut m = playing();
        m.ball.pos = Vec2::new(799.0, 500.0);
        m.ball.vel = Vec2::new(300.0, 10.0);
        advance(&mut m, &idle(), 0.01);
        assert_eq!(m.phase(), MatchPhase::Won(Side::Left));
        assert_eq!(m.ball().pos.x, 800.0);
        assert_eq!(m.ball().vel, Vec2::ZERO);
    }

    #[test]
    fn test_ball_on_side_wall_is_not_a_goal() {
        let mut m = playing();
        m.ball.pos = Vec2::new(3.0, 100.0);
        m.ball.vel = Vec2::new(-6.0, 0.0);
        advance(&mut m, &idle(), 0.5);
        assert_eq!(m.ball().pos.x, 0.0);
        assert_eq!(m.phase(), MatchPhase::Playing);
    }

    #[test]
    fn test_goal_then_movement_ignored() {
        let mut m = playing();
        m.ball.pos = Vec2::new(2.0, 100.0);
        m.ball.vel = Vec2::new(-300.0, 0.0);
        advance(&mut m, &idle(), 0.01);

        let input = TickInput {
            intents: PaddleIntents {
                left_down: true,
                ..Default::default()
            },
        };
        let before = m.paddle(Side::Left).y;
        advance(&mut m, &input, 0.1);
        assert_eq!(m.paddle(Side::Left).y, before);
    }

    fn intents_strategy() -> impl Strategy<Value = PaddleIntents> {
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(left_up, left_down, right_up, right_down)| PaddleIntents {
                left_up,
                left_down,
                right_up,
                right_down,
            },
        )
    }

    proptest! {
        #[test]
        fn prop_ball_and_paddles_stay_in_bounds(
            steps in prop::collection::vec((intents_strategy(), 0.001f32..0.1), 1..200),
        ) {
            let mut m = playing();
            for (intents, dt) in steps {
                advance(&mut m, &TickInput { intents }, dt);
                let s = m.render_state();
                prop_assert!(s.ball.pos.y >= 0.0 && s.ball.pos.y <= 600.0);
                prop_assert!(s.left_paddle.y >= 0.0 && s.left_paddle.y <= 600.0);
                prop_assert!(s.right_paddle.y >= 0.0 && s.right_paddle.y <= 600.0);
                prop_assert!(s.ball.pos.x >= 0.0 && s.ball.pos.x <= 800.0);
            }
        }

        #[test]
        fn prop_zero_elapsed_is_a_no_op(
            steps in prop::collection::vec((intents_strategy(), 0.001f32..0.05), 0..100),
        ) {
            let mut m = playing();
            for (intents, dt) in steps {
                advance(&mut m, &TickInput { intents }, dt);
            }
            let before = m.render_state();
            advance(&mut m, &idle(), 0.0);
            prop_assert_eq!(m.render_state(), before);
        }

        #[test]
        fn prop_wall_bounce_only_flips_vy(
            x in 100.0f32..700.0,
            vx in -500.0f32..500.0,
            vy in 50.0f32..800.0,
        ) {
            let mut m = playing();
            m.ball.pos = Vec2::new(x, 595.0);
            m.ball.vel = Vec2::new(vx, vy);
            advance(&mut m, &idle(), 0.1);
            prop_assert_eq!(m.ball().pos.y, 600.0);
            prop_assert_eq!(m.ball().vel.x, vx);
            prop_assert_eq!(m.ball().vel.y, -vy);
        }

        #[test]
        fn prop_paddle_hit_speeds_up_ten_percent(
            vx in 50.0f32..2000.0,
            vy in -300.0f32..300.0,
            offset in -45.0f32..45.0,
        ) {
            let mut m = playing();
            m.ball.pos = Vec2::new(45.0, 300.0 + offset);
            m.ball.vel = Vec2::new(-vx, vy);
            advance(&mut m, &idle(), 1e-6);
            prop_assert!((m.ball().vel.x - 1.1 * vx).abs() < vx * 1e-4);

            m.ball.pos = Vec2::new(745.0, 300.0 + offset);
            m.ball.vel = Vec2::new(vx, vy);
            advance(&mut m, &idle(), 1e-6);
            prop_assert!((m.ball().vel.x + 1.1 * vx).abs() < vx * 1e-4);
        }
    }
}
