//! Browser presentation: canvas 2D drawing plus Web Audio

use glam::Vec2;
use web_sys::CanvasRenderingContext2d;

use crate::audio::AudioManager;
use crate::presentation::{Color, MusicId, PresentationBridge, SoundId};
use crate::sim::Rect;

const FONT_FAMILY: &str = "monospace";
const FPS_SIZE: f32 = 20.0;
const FPS_COLOR: Color = Color::rgb(0, 158, 47);

/// Draws into a 2D canvas context sized to the arena
pub struct CanvasBridge {
    ctx: CanvasRenderingContext2d,
    audio: AudioManager,
}

impl CanvasBridge {
    pub fn new(ctx: CanvasRenderingContext2d, audio: AudioManager) -> Self {
        ctx.set_text_baseline("top");
        Self { ctx, audio }
    }

    pub fn audio(&mut self) -> &mut AudioManager {
        &mut self.audio
    }

    fn set_font(&self, size: f32) {
        self.ctx.set_font(&format!("{}px {}", size, FONT_FAMILY));
    }
}

impl PresentationBridge for CanvasBridge {
    fn clear(&mut self, color: Color) {
        let canvas = self.ctx.canvas();
        let (w, h) = canvas
            .map(|c| (c.width() as f64, c.height() as f64))
            .unwrap_or((0.0, 0.0));
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(0.0, 0.0, w, h);
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.begin_path();
        let _ = self.ctx.arc(
            center.x as f64,
            center.y as f64,
            radius as f64,
            0.0,
            std::f64::consts::TAU,
        );
        self.ctx.fill();
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx
            .fill_rect(rect.x as f64, rect.y as f64, rect.width as f64, rect.height as f64);
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, size: f32, color: Color) {
        self.set_font(size);
        self.ctx.set_fill_style_str(&color.to_css());
        let _ = self.ctx.fill_text(text, pos.x as f64, pos.y as f64);
    }

    fn measure_text(&self, text: &str, size: f32) -> f32 {
        self.set_font(size);
        self.ctx
            .measure_text(text)
            .map(|m| m.width() as f32)
            .unwrap_or(text.chars().count() as f32 * size * 0.5)
    }

    fn draw_fps(&mut self, pos: Vec2, fps: u32) {
        self.draw_text(&format!("{} FPS", fps), pos, FPS_SIZE, FPS_COLOR);
    }

    fn play(&mut self, sound: SoundId) {
        self.audio.play(sound);
    }

    fn stop_sound(&mut self, sound: SoundId) {
        self.audio.stop_sound(sound);
    }

    fn play_looping(&mut self, music: MusicId) {
        self.audio.play_looping(music);
    }

    fn stop(&mut self, music: MusicId) {
        self.audio.stop(music);
    }
}
