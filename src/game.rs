//! The per-frame cycle
//!
//! One call to [`Game::frame`] is one loop iteration: read input, apply
//! actions, simulate, trigger audio, draw.

use crate::config::{Settings, Theme};
use crate::consts::FPS_WINDOW;
use crate::input::{Action, InputMapper, KeySource};
use crate::presentation::{AudioDirector, PresentationBridge, TitleHeading, draw_frame};
use crate::sim::{GameEvent, Match, MatchPhase, RenderState};

/// Rolling frame-rate counter
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f32; FPS_WINDOW],
    frame_index: usize,
    filled: usize,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            filled: 0,
        }
    }
}

impl FpsCounter {
    pub fn record(&mut self, dt: f32) {
        self.frame_times[self.frame_index] = dt;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;
        self.filled = (self.filled + 1).min(FPS_WINDOW);
    }

    pub fn fps(&self) -> u32 {
        let total: f32 = self.frame_times[..self.filled].iter().sum();
        if total > 0.0 {
            (self.filled as f32 / total).round() as u32
        } else {
            0
        }
    }
}

/// A running game: the match plus host-facing frame state
pub struct Game {
    state: Match,
    theme: Theme,
    mapper: InputMapper,
    audio: AudioDirector,
    heading: TitleHeading,
    show_fps: bool,
    fps: FpsCounter,
}

impl Game {
    pub fn new(settings: &Settings) -> Self {
        let config = settings.match_config();
        log::info!(
            "{} ({}x{})",
            settings.theme().window_title,
            config.arena_width,
            config.arena_height
        );
        Self {
            state: Match::new(config),
            theme: settings.theme(),
            mapper: InputMapper::default(),
            audio: AudioDirector::new(),
            heading: TitleHeading::Launch,
            show_fps: settings.show_fps,
            fps: FpsCounter::default(),
        }
    }

    pub fn phase(&self) -> MatchPhase {
        self.state.phase()
    }

    pub fn render_state(&self) -> RenderState {
        self.state.render_state()
    }

    pub fn show_fps(&self) -> bool {
        self.show_fps
    }

    pub fn mapper(&self) -> &InputMapper {
        &self.mapper
    }

    /// Run one frame. `dt` is the time since the previous frame in seconds.
    pub fn frame(
        &mut self,
        dt: f32,
        keys: &impl KeySource,
        bridge: &mut impl PresentationBridge,
    ) -> Vec<GameEvent> {
        self.fps.record(dt);
        let input = self.mapper.map(keys);

        // At most one phase change per frame
        let mut transitioned = false;
        for action in input.actions {
            match action {
                Action::ToggleOverlay => {
                    self.show_fps = !self.show_fps;
                    log::info!("FPS overlay {}", if self.show_fps { "on" } else { "off" });
                }
                _ if transitioned => {}
                _ => {
                    if let Some(phase) = self.state.handle_action(action) {
                        transitioned = true;
                        if phase == MatchPhase::Title {
                            self.heading = TitleHeading::Return;
                        }
                    }
                }
            }
        }

        let events = if transitioned {
            Vec::new()
        } else {
            self.state.advance(dt, input.intents)
        };

        self.audio.update(self.state.phase(), &events, bridge);

        let fps = self.show_fps.then(|| self.fps.fps());
        draw_frame(&self.state.render_state(), &self.theme, self.heading, fps, bridge);

        events
    }
}
