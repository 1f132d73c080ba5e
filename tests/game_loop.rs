use le_pong::input::{Key, KeyboardState};
use le_pong::platform::headless::{AudioCommand, DrawCommand, RecordingBridge};
use le_pong::presentation::{MusicId, SoundId};
use le_pong::sim::{GameEvent, MatchPhase, Side};
use le_pong::{Game, Settings, Variant};

const DT: f32 = 1.0 / 60.0;

fn press(game: &mut Game, keys: &mut KeyboardState, bridge: &mut RecordingBridge, key: Key) -> Vec<GameEvent> {
    bridge.begin_frame();
    keys.key_down(key);
    let events = game.frame(DT, &*keys, bridge);
    keys.end_frame();
    keys.key_up(key);
    events
}

fn idle(game: &mut Game, keys: &mut KeyboardState, bridge: &mut RecordingBridge) -> Vec<GameEvent> {
    bridge.begin_frame();
    let events = game.frame(DT, &*keys, bridge);
    keys.end_frame();
    events
}

/// Play with nobody touching the paddles until someone scores
fn run_until_goal(game: &mut Game, keys: &mut KeyboardState, bridge: &mut RecordingBridge) -> Side {
    for _ in 0..60 * 60 {
        for event in idle(game, keys, bridge) {
            if let GameEvent::Goal { winner } = event {
                return winner;
            }
        }
    }
    panic!("no goal within a minute of play");
}

#[test]
fn test_title_to_playing_to_won() {
    let mut game = Game::new(&Settings::default());
    let mut keys = KeyboardState::new();
    let mut bridge = RecordingBridge::new();

    idle(&mut game, &mut keys, &mut bridge);
    assert_eq!(game.phase(), MatchPhase::Title);
    assert!(bridge.is_music_playing(MusicId::TitleTheme));
    let start = game.render_state();

    // The confirm frame only changes the phase
    let events = press(&mut game, &mut keys, &mut bridge, Key::Space);
    assert!(events.is_empty());
    assert_eq!(game.phase(), MatchPhase::Playing);
    assert_eq!(game.render_state().ball, start.ball);
    assert!(!bridge.is_music_playing(MusicId::TitleTheme));

    let winner = run_until_goal(&mut game, &mut keys, &mut bridge);
    let state = game.render_state();
    assert_eq!(game.phase(), MatchPhase::Won(winner));
    assert_eq!(state.winner(), Some(winner));
    assert_eq!(state.ball.vel, glam::Vec2::ZERO);
    let expected_x = match winner {
        Side::Left => state.arena.x,
        Side::Right => 0.0,
    };
    assert_eq!(state.ball.pos.x, expected_x);
    assert!(bridge.sounds_played().any(|s| s == SoundId::Winner));
    assert!(bridge.sounds_played().any(|s| s == SoundId::PaddleHit));
}

#[test]
fn test_restart_and_return_to_title() {
    let mut game = Game::new(&Settings {
        variant: Variant::Duff,
        ..Default::default()
    });
    let mut keys = KeyboardState::new();
    let mut bridge = RecordingBridge::new();

    press(&mut game, &mut keys, &mut bridge, Key::Space);
    run_until_goal(&mut game, &mut keys, &mut bridge);

    // Frozen while won
    let won = game.render_state();
    idle(&mut game, &mut keys, &mut bridge);
    assert_eq!(game.render_state(), won);

    // Play again
    press(&mut game, &mut keys, &mut bridge, Key::Space);
    let state = game.render_state();
    assert_eq!(state.phase, MatchPhase::Playing);
    assert_eq!(state.ball.pos, glam::Vec2::new(800.0, 600.0));
    assert_eq!(state.ball.vel, glam::Vec2::new(300.0, 300.0));

    run_until_goal(&mut game, &mut keys, &mut bridge);
    bridge.audio.clear();

    // Back to the title screen with the alternate heading
    press(&mut game, &mut keys, &mut bridge, Key::B);
    assert_eq!(game.phase(), MatchPhase::Title);
    assert_eq!(game.render_state().ball.pos, glam::Vec2::new(800.0, 600.0));
    assert_eq!(
        bridge.audio,
        vec![
            AudioCommand::StopSound(SoundId::Winner),
            AudioCommand::PlayLooping(MusicId::TitleTheme),
        ]
    );
    let texts = bridge.texts();
    assert_eq!(texts[0].0, "DUFF PONG");
    assert!(texts.iter().all(|(text, _)| !text.contains("Wins")));
}

#[test]
fn test_held_confirm_does_not_restart_twice() {
    let mut game = Game::new(&Settings::default());
    let mut keys = KeyboardState::new();
    let mut bridge = RecordingBridge::new();

    // Space held across many frames only fires once
    keys.key_down(Key::Space);
    game.frame(DT, &keys, &mut bridge);
    keys.end_frame();
    for _ in 0..10 {
        keys.key_down(Key::Space);
        game.frame(DT, &keys, &mut bridge);
        keys.end_frame();
    }
    assert_eq!(game.phase(), MatchPhase::Playing);
}

#[test]
fn test_paddles_follow_held_keys() {
    let mut game = Game::new(&Settings::default());
    let mut keys = KeyboardState::new();
    let mut bridge = RecordingBridge::new();

    // Ignored on the title screen
    keys.key_down(Key::W);
    idle(&mut game, &mut keys, &mut bridge);
    assert_eq!(game.render_state().left_paddle.y, 300.0);
    keys.key_up(Key::W);

    press(&mut game, &mut keys, &mut bridge, Key::Space);
    keys.key_down(Key::W);
    keys.key_down(Key::Down);
    for _ in 0..6 {
        idle(&mut game, &mut keys, &mut bridge);
    }
    let state = game.render_state();
    assert!((state.left_paddle.y - 250.0).abs() < 0.01);
    assert!((state.right_paddle.y - 350.0).abs() < 0.01);
}

#[test]
fn test_overlay_toggle() {
    let mut game = Game::new(&Settings::default());
    let mut keys = KeyboardState::new();
    let mut bridge = RecordingBridge::new();

    idle(&mut game, &mut keys, &mut bridge);
    assert!(bridge.draws.iter().any(|d| matches!(d, DrawCommand::Fps { .. })));

    press(&mut game, &mut keys, &mut bridge, Key::F);
    assert!(!game.show_fps());
    assert!(!bridge.draws.iter().any(|d| matches!(d, DrawCommand::Fps { .. })));
    // Overlay toggling never changes the phase
    assert_eq!(game.phase(), MatchPhase::Title);
}
