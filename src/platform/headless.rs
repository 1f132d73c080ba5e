//! Headless presentation
//!
//! Records draw and audio commands instead of executing them. Audio calls
//! are also logged so a headless run can be followed with `RUST_LOG=debug`.

use std::collections::HashSet;

use glam::Vec2;

use crate::presentation::{Color, MusicId, PresentationBridge, SoundId};
use crate::sim::Rect;

/// A recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Circle { center: Vec2, radius: f32, color: Color },
    Rect { rect: Rect, color: Color },
    Text { text: String, pos: Vec2, size: f32, color: Color },
    Fps { pos: Vec2, fps: u32 },
}

/// A recorded audio call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCommand {
    Play(SoundId),
    StopSound(SoundId),
    PlayLooping(MusicId),
    Stop(MusicId),
}

/// `PresentationBridge` that keeps everything it is told
#[derive(Debug, Clone, Default)]
pub struct RecordingBridge {
    pub draws: Vec<DrawCommand>,
    pub audio: Vec<AudioCommand>,
    playing_music: HashSet<MusicId>,
}

impl RecordingBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the draw commands of the previous frame
    pub fn begin_frame(&mut self) {
        self.draws.clear();
    }

    /// Text draws as (text, position)
    pub fn texts(&self) -> Vec<(&str, Vec2)> {
        self.draws
            .iter()
            .filter_map(|d| match d {
                DrawCommand::Text { text, pos, .. } => Some((text.as_str(), *pos)),
                _ => None,
            })
            .collect()
    }

    pub fn is_music_playing(&self, music: MusicId) -> bool {
        self.playing_music.contains(&music)
    }

    pub fn sounds_played(&self) -> impl Iterator<Item = SoundId> + '_ {
        self.audio.iter().filter_map(|a| match a {
            AudioCommand::Play(sound) => Some(*sound),
            _ => None,
        })
    }
}

impl PresentationBridge for RecordingBridge {
    fn clear(&mut self, color: Color) {
        self.draws.push(DrawCommand::Clear(color));
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.draws.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) {
        self.draws.push(DrawCommand::Rect { rect, color });
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, size: f32, color: Color) {
        self.draws.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
            size,
            color,
        });
    }

    /// Fixed advance of half the font size per character
    fn measure_text(&self, text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size * 0.5
    }

    fn draw_fps(&mut self, pos: Vec2, fps: u32) {
        self.draws.push(DrawCommand::Fps { pos, fps });
    }

    fn play(&mut self, sound: SoundId) {
        log::debug!("play {:?}", sound);
        self.audio.push(AudioCommand::Play(sound));
    }

    fn stop_sound(&mut self, sound: SoundId) {
        log::debug!("stop {:?}", sound);
        self.audio.push(AudioCommand::StopSound(sound));
    }

    fn play_looping(&mut self, music: MusicId) {
        if self.playing_music.insert(music) {
            log::debug!("loop {:?}", music);
        }
        self.audio.push(AudioCommand::PlayLooping(music));
    }

    fn stop(&mut self, music: MusicId) {
        if self.playing_music.remove(&music) {
            log::debug!("stop {:?}", music);
        }
        self.audio.push(AudioCommand::Stop(music));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_music_tracking() {
        let mut bridge = RecordingBridge::new();
        assert!(!bridge.is_music_playing(MusicId::TitleTheme));
        bridge.play_looping(MusicId::TitleTheme);
        assert!(bridge.is_music_playing(MusicId::TitleTheme));
        bridge.stop(MusicId::TitleTheme);
        assert!(!bridge.is_music_playing(MusicId::TitleTheme));
        assert_eq!(bridge.audio.len(), 2);
    }

    #[test]
    fn test_begin_frame_keeps_audio() {
        let mut bridge = RecordingBridge::new();
        bridge.clear(Color::BLACK);
        bridge.play(SoundId::PaddleHit);
        bridge.begin_frame();
        assert!(bridge.draws.is_empty());
        assert_eq!(bridge.sounds_played().collect::<Vec<_>>(), vec![SoundId::PaddleHit]);
    }
}
