//! Engine task tests on a paused tokio clock.

use std::time::Duration;

use tokio::time::Instant;

use blockfall::core::{Board, GameState, Piece};
use blockfall::engine::{Engine, EngineConfig};
use blockfall::types::{Command, ShapeKind};

fn o_over_gap() -> GameState {
    GameState::from_parts(
        1,
        Board::from_ascii(&["ZZZZ..ZZZZ"]),
        Piece::new(ShapeKind::O),
        Piece::new(ShapeKind::L),
    )
}

#[tokio::test(start_paused = true)]
async fn spawned_engine_shows_a_piece() {
    let handle = Engine::spawn(EngineConfig::default().with_seed(7));
    let snap = handle.snapshot();

    let active = snap.current.expect("first piece");
    assert_eq!((active.x, active.y), (4, 0));
    assert!(snap.next.is_some());
    assert_eq!(snap.level, 1);
    assert_eq!(snap.score, 0);

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn gravity_steps_once_per_period() {
    let handle = Engine::spawn(EngineConfig::default().with_seed(7));
    let mut rx = handle.subscribe();
    let start = Instant::now();

    rx.changed().await.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(1000));
    assert_eq!(rx.borrow().current.map(|a| a.y), Some(1));

    rx.changed().await.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(2000));
    assert_eq!(rx.borrow().current.map(|a| a.y), Some(2));

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn commands_apply_in_send_order() {
    let handle = Engine::spawn(EngineConfig::default().with_seed(3));
    for _ in 0..10 {
        handle.send(Command::MoveLeft).unwrap();
    }
    handle.send(Command::HardDrop).unwrap();

    let state = handle.shutdown().await.unwrap();
    let board = state.board();
    assert_eq!(board.occupied_count(), 4);
    assert!((0..20).any(|y| board.is_occupied(0, y)));
    assert!(state.current().is_some());
}

#[tokio::test(start_paused = true)]
async fn line_clear_is_delivered_once() {
    let mut handle = Engine::spawn_with_state(o_over_gap());
    handle.send(Command::HardDrop).unwrap();

    let event = handle.next_line_clear().await.expect("line clear");
    assert_eq!(event.rows.as_slice(), &[19]);
    assert_eq!(event.points, 100);
    assert!(handle.try_next_line_clear().is_none());

    let state = handle.shutdown().await.unwrap();
    assert_eq!(state.score(), 100);
    assert_eq!(state.lines(), 1);
}

#[tokio::test(start_paused = true)]
async fn drop_without_clear_sends_no_event() {
    let mut handle = Engine::spawn(EngineConfig::default().with_seed(11));
    let mut rx = handle.subscribe();

    handle.send(Command::HardDrop).unwrap();
    rx.changed().await.unwrap();

    assert!(handle.try_next_line_clear().is_none());
    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn pause_suspends_gravity() {
    let handle = Engine::spawn(EngineConfig::default().with_seed(5));
    let mut rx = handle.subscribe();

    handle.send(Command::TogglePause).unwrap();
    rx.changed().await.unwrap();
    assert!(rx.borrow().paused);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(!rx.has_changed().unwrap());
    assert_eq!(handle.snapshot().current.map(|a| a.y), Some(0));

    // Moves are ignored while paused.
    handle.send(Command::MoveRight).unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(handle.snapshot().current.map(|a| a.x), Some(4));

    handle.send(Command::TogglePause).unwrap();
    rx.changed().await.unwrap();
    assert!(!rx.borrow().paused);

    let resumed = Instant::now();
    rx.changed().await.unwrap();
    assert!(resumed.elapsed() >= Duration::from_millis(1000));
    assert_eq!(rx.borrow().current.map(|a| a.y), Some(1));

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn game_over_stops_gravity_until_reset() {
    let mut board = Board::new();
    for y in 0..20 {
        board.set(4, y, Some(ShapeKind::J));
    }
    let state = GameState::from_parts(1, board, Piece::new(ShapeKind::O), Piece::new(ShapeKind::I));
    let handle = Engine::spawn_with_state(state);
    let mut rx = handle.subscribe();

    assert!(handle.snapshot().game_over);
    assert!(handle.snapshot().current.is_none());

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(!rx.has_changed().unwrap());

    handle.send(Command::Reset).unwrap();
    rx.changed().await.unwrap();
    let snap = *rx.borrow();
    assert!(!snap.game_over);
    assert!(snap.current.is_some());
    assert_eq!(snap.board, [[0u8; 10]; 20]);

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn reset_starts_fresh_game() {
    let handle = Engine::spawn_with_state(o_over_gap());
    handle.send(Command::HardDrop).unwrap();
    handle.send(Command::Reset).unwrap();

    let state = handle.shutdown().await.unwrap();
    assert_eq!(state.score(), 0);
    assert_eq!(state.lines(), 0);
    assert_eq!(state.level(), 1);
    assert_eq!(state.board().occupied_count(), 0);
    assert!(state.current().is_some());
    assert!(state.next().is_some());
}
