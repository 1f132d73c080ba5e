//! Audio using the Web Audio API
//!
//! Procedurally generated sounds and title music - no asset files needed.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::presentation::{MusicId, SoundId};

/// Title theme: one bar of a minor arpeggio, looped
const TITLE_NOTES: [f32; 8] = [220.0, 261.6, 329.6, 440.0, 329.6, 261.6, 196.0, 246.9];
const TITLE_NOTE_SECS: f64 = 0.25;
/// How far ahead music notes are scheduled
const MUSIC_LOOKAHEAD_SECS: f64 = 0.5;
/// Fade applied when music is stopped
const MUSIC_FADE_SECS: f64 = 2.0;

/// Music that is currently scheduled
struct MusicTrack {
    id: MusicId,
    bus: GainNode,
    next_note_time: f64,
    note_index: usize,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    sfx_volume: f32,
    music_volume: f32,
    music: Option<MusicTrack>,
    /// Voices of the winner jingle, kept so it can be cut short
    winner_voices: Vec<OscillatorNode>,
}

impl AudioManager {
    /// `sfx_volume` and `music_volume` are final gains in 0.0 - 1.0
    pub fn new(sfx_volume: f32, music_volume: f32) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            sfx_volume: sfx_volume.clamp(0.0, 1.0),
            music_volume: music_volume.clamp(0.0, 1.0),
            music: None,
            winner_voices: Vec::new(),
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, sound: SoundId) {
        let vol = self.sfx_volume;
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = self.ctx.clone() else { return };
        self.resume();

        match sound {
            SoundId::PaddleHit => play_paddle_hit(&ctx, vol),
            SoundId::Winner => {
                self.winner_voices = play_winner(&ctx, vol);
            }
        }
    }

    /// Cut a sound effect short
    pub fn stop_sound(&mut self, sound: SoundId) {
        match sound {
            SoundId::Winner => {
                for osc in self.winner_voices.drain(..) {
                    osc.stop().ok();
                }
            }
            // Too short to bother
            SoundId::PaddleHit => {}
        }
    }

    /// Start looping music unless it is already playing
    pub fn play_looping(&mut self, music: MusicId) {
        if self.music.as_ref().is_some_and(|m| m.id == music) {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        let Ok(bus) = ctx.create_gain() else { return };
        if bus.connect_with_audio_node(&ctx.destination()).is_err() {
            return;
        }
        bus.gain().set_value(self.music_volume);

        log::info!("Music {:?} started", music);
        self.music = Some(MusicTrack {
            id: music,
            bus,
            next_note_time: ctx.current_time(),
            note_index: 0,
        });
        self.update_music();
    }

    /// Fade the music out over two seconds
    pub fn stop(&mut self, music: MusicId) {
        let Some(ctx) = &self.ctx else { return };
        if !self.music.as_ref().is_some_and(|m| m.id == music) {
            return;
        }
        if let Some(track) = self.music.take() {
            let t = ctx.current_time();
            let gain = track.bus.gain();
            gain.cancel_scheduled_values(t).ok();
            gain.set_value_at_time(gain.value(), t).ok();
            gain.linear_ramp_to_value_at_time(0.0, t + MUSIC_FADE_SECS).ok();
            log::info!("Music {:?} fading out", music);
        }
    }

    /// Keep the music scheduled ahead of the playhead. Call once per frame.
    pub fn update_music(&mut self) {
        let Some(ctx) = &self.ctx else { return };
        let Some(track) = self.music.as_mut() else {
            return;
        };

        let horizon = ctx.current_time() + MUSIC_LOOKAHEAD_SECS;
        // Don't try to catch up after the tab was backgrounded
        if track.next_note_time < ctx.current_time() {
            track.next_note_time = ctx.current_time();
        }

        while track.next_note_time < horizon {
            let freq = TITLE_NOTES[track.note_index % TITLE_NOTES.len()];
            schedule_note(ctx, &track.bus, freq, track.next_note_time, TITLE_NOTE_SECS);
            track.next_note_time += TITLE_NOTE_SECS;
            track.note_index += 1;
        }
    }
}

/// Create an oscillator wired through its own gain node into `out`
fn create_osc(
    ctx: &AudioContext,
    out: &web_sys::AudioNode,
    freq: f32,
    osc_type: OscillatorType,
) -> Option<(OscillatorNode, GainNode)> {
    let osc = ctx.create_oscillator().ok()?;
    let gain = ctx.create_gain().ok()?;

    osc.set_type(osc_type);
    osc.frequency().set_value(freq);
    osc.connect_with_audio_node(&gain).ok()?;
    gain.connect_with_audio_node(out).ok()?;

    Some((osc, gain))
}

/// Paddle or wall hit - short square blip
fn play_paddle_hit(ctx: &AudioContext, vol: f32) {
    let Some((osc, gain)) = create_osc(ctx, &ctx.destination(), 440.0, OscillatorType::Square)
    else {
        return;
    };
    let t = ctx.current_time();

    gain.gain().set_value_at_time(vol * 0.3, t).ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, t + 0.08)
        .ok();
    osc.frequency().set_value_at_time(440.0, t).ok();
    osc.frequency()
        .exponential_ramp_to_value_at_time(220.0, t + 0.08)
        .ok();

    osc.start().ok();
    osc.stop_with_when(t + 0.1).ok();
}

/// Winner - rising fanfare
fn play_winner(ctx: &AudioContext, vol: f32) -> Vec<OscillatorNode> {
    let mut voices = Vec::new();
    for (i, freq) in [523.3, 659.3, 784.0, 1046.5].iter().enumerate() {
        let delay = i as f64 * 0.15;
        if let Some((osc, gain)) = create_osc(ctx, &ctx.destination(), *freq, OscillatorType::Triangle)
        {
            let t = ctx.current_time() + delay;
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.6)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.7).ok();
            voices.push(osc);
        }
    }
    voices
}

/// One music note into the music bus
fn schedule_note(ctx: &AudioContext, bus: &GainNode, freq: f32, t: f64, len: f64) {
    let Some((osc, gain)) = create_osc(ctx, bus, freq, OscillatorType::Triangle) else {
        return;
    };
    gain.gain().set_value_at_time(0.0, t).ok();
    gain.gain().linear_ramp_to_value_at_time(0.4, t + 0.02).ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, t + len * 0.95)
        .ok();
    osc.start_with_when(t).ok();
    osc.stop_with_when(t + len).ok();
}
