//! Integration tests for the headless game flow
//!
//! Runs the core and game plugins under `MinimalPlugins` and drives the
//! session through request messages, the same way clicks, the AI task and
//! the peer link do in the real app.

use bevy::input::InputPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use chess3d::core::{CorePlugin, GameSettings, GameState};
use chess3d::game::ai::AiStatus;
use chess3d::game::events::{BoardChanged, MoveOrigin, MoveRequest, ResetRequest};
use chess3d::game::{ChessSession, GameMode, GamePlugin, GameStatus};
use shakmaty::Color;
use std::time::{Duration, Instant};

/// Collects every `BoardChanged` revision seen
#[derive(Resource, Default)]
struct SeenRevisions(Vec<u64>);

fn record_board_changes(mut changed: MessageReader<BoardChanged>, mut seen: ResMut<SeenRevisions>) {
    seen.0.extend(changed.read().map(|c| c.revision));
}

fn app_in_game(mode: GameMode) -> App {
    let mut settings = GameSettings::default();
    // Never reach the real API from tests
    settings.ai.api_key_env = "CHESS3D_TEST_KEY_THAT_IS_NEVER_SET".to_string();

    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin, InputPlugin))
        .insert_resource(settings)
        .add_plugins((CorePlugin, GamePlugin))
        .insert_resource(mode)
        .init_resource::<SeenRevisions>()
        .add_systems(Update, record_board_changes);

    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::InGame);
    app.update();
    app.update();
    assert_eq!(
        *app.world().resource::<State<GameState>>().get(),
        GameState::InGame
    );
    app
}

fn play(app: &mut App, uci: &str, origin: MoveOrigin) {
    app.world_mut().write_message(MoveRequest::new(uci, origin));
    app.update();
}

fn history(app: &App) -> Vec<String> {
    app.world().resource::<ChessSession>().history().to_vec()
}

#[test]
fn test_app_starts_in_menu() {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin, InputPlugin))
        .add_plugins((CorePlugin, GamePlugin));
    app.update();

    assert_eq!(
        *app.world().resource::<State<GameState>>().get(),
        GameState::Menu
    );
    assert!(app.world().contains_resource::<GameSettings>());
}

#[test]
fn test_entering_game_announces_board() {
    let app = app_in_game(GameMode::Local);
    assert_eq!(app.world().resource::<SeenRevisions>().0, vec![0]);
}

#[test]
fn test_local_game_fools_mate() {
    //! Both sides move from this machine until Black mates
    let mut app = app_in_game(GameMode::Local);
    for uci in ["f2f3", "e7e5", "g2g4", "d8h4"] {
        play(&mut app, uci, MoveOrigin::Local);
    }

    assert_eq!(history(&app), vec!["f3", "e5", "g4", "Qh4#"]);
    let session = app.world().resource::<ChessSession>();
    assert_eq!(
        session.status(),
        GameStatus::Checkmate {
            winner: Color::Black
        }
    );
    assert_eq!(app.world().resource::<SeenRevisions>().0.len(), 5);

    // Nothing moves after mate
    play(&mut app, "a2a3", MoveOrigin::Local);
    assert_eq!(history(&app).len(), 4);
}

#[test]
fn test_illegal_move_leaves_session_untouched() {
    let mut app = app_in_game(GameMode::Local);
    let before = app.world().resource::<ChessSession>().fen();

    play(&mut app, "e2e5", MoveOrigin::Local);
    play(&mut app, "not a move", MoveOrigin::Remote);

    let session = app.world().resource::<ChessSession>();
    assert_eq!(session.fen(), before);
    assert!(session.history().is_empty());
    assert_eq!(app.world().resource::<SeenRevisions>().0, vec![0]);
}

#[test]
fn test_reset_request_loads_position() {
    let mut app = app_in_game(GameMode::Local);
    play(&mut app, "e2e4", MoveOrigin::Local);

    let fen = "8/8/8/4k3/8/8/4P3/4K3 w - - 0 1";
    app.world_mut()
        .write_message(ResetRequest::from_fen(fen, MoveOrigin::Local));
    app.update();

    let session = app.world().resource::<ChessSession>();
    assert_eq!(session.fen(), fen);
    assert!(session.history().is_empty());

    app.world_mut()
        .write_message(ResetRequest::from_fen("garbage", MoveOrigin::Local));
    app.update();
    assert_eq!(app.world().resource::<ChessSession>().fen(), fen);
}

#[test]
fn test_ai_side_cannot_be_moved_locally_and_answers_itself() {
    //! Without an API key the AI still answers, with a random legal move
    let mut app = app_in_game(GameMode::VsAi {
        ai_color: Color::Black,
    });
    play(&mut app, "e2e4", MoveOrigin::Local);
    assert_eq!(history(&app), vec!["e4"]);

    // Black belongs to the AI
    play(&mut app, "e7e5", MoveOrigin::Local);

    let deadline = Instant::now() + Duration::from_secs(10);
    while history(&app).len() < 2 && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
        app.update();
    }

    let moves = history(&app);
    assert_eq!(moves.len(), 2, "AI never moved");
    let status = app.world().resource::<AiStatus>();
    assert_eq!(status.moves_played, 1);
    assert_eq!(status.fallbacks, 1);
    assert!(status.last_was_fallback());
    assert!(!status.thinking);
    assert_eq!(app.world().resource::<ChessSession>().turn(), Color::White);
}

#[test]
fn test_ai_playing_white_opens_the_game() {
    let mut app = app_in_game(GameMode::VsAi {
        ai_color: Color::White,
    });

    let deadline = Instant::now() + Duration::from_secs(10);
    while history(&app).is_empty() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
        app.update();
    }
    assert_eq!(history(&app).len(), 1);
    assert_eq!(app.world().resource::<ChessSession>().turn(), Color::Black);
}

#[test]
fn test_leaving_game_stops_gameplay_systems() {
    let mut app = app_in_game(GameMode::Local);
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Menu);
    app.update();

    play(&mut app, "e2e4", MoveOrigin::Local);
    assert!(history(&app).is_empty());
}

#[test]
fn test_ai_move_for_replaced_position_is_dropped() {
    //! A New Game landing in the same frame as an AI answer wins; the answer
    //! was chosen for the old position
    let mut app = app_in_game(GameMode::Local);
    play(&mut app, "e2e4", MoveOrigin::Local);
    let revision = app.world().resource::<ChessSession>().revision();

    app.world_mut()
        .write_message(ResetRequest::standard(MoveOrigin::Local));
    app.world_mut()
        .write_message(MoveRequest::for_revision("e2e4", MoveOrigin::Ai, revision));
    app.update();

    let session = app.world().resource::<ChessSession>();
    assert!(session.history().is_empty());
    assert_eq!(session.revision(), revision + 1);
}
