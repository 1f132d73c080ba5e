//! Collision detection between the ball and paddles
//!
//! The ball is a circle and paddles are axis-aligned rectangles, so a
//! closest-point test is all that's needed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{PADDLE_HITBOX_HEIGHT, PADDLE_HITBOX_WIDTH};

/// Axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Collision rectangle for a paddle centred at `pos`.
///
/// The anchor is offset by the paddle's own width and half height, but the
/// extent is always `PADDLE_HITBOX_WIDTH` x `PADDLE_HITBOX_HEIGHT`. With
/// the stock 10x100 paddle this puts the box one full width toward the
/// left of the paddle centre line.
pub fn paddle_hitbox(pos: Vec2, width: f32, height: f32) -> Rect {
    Rect::new(
        pos.x - width,
        pos.y - height / 2.0,
        PADDLE_HITBOX_WIDTH,
        PADDLE_HITBOX_HEIGHT,
    )
}

/// Check whether a circle touches or overlaps a rectangle
pub fn circle_rect_collision(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let half = rect.half_extents();
    let d = (center - rect.center()).abs();

    if d.x > half.x + radius || d.y > half.y + radius {
        return false;
    }
    if d.x <= half.x || d.y <= half.y {
        return true;
    }

    // Near a corner
    (d - half).length_squared() <= radius * radius
}
