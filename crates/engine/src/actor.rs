//! Single-writer engine task.
//!
//! One tokio task owns the [`GameState`]. User commands and gravity ticks are
//! funnelled through it one at a time, so no two state changes ever overlap.
//! Readers get copies: the latest snapshot over a `watch` channel and line
//! clears over their own queue.

use log::{debug, info, trace};
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use blockfall_core::{GameSnapshot, GameState, LineClearEvent};
use blockfall_types::Command;

use crate::config::EngineConfig;
use crate::gravity::{gravity_period, GravityKey};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine task has stopped")]
    Closed,
    #[error("engine task failed: {0}")]
    Join(#[from] JoinError),
}

#[derive(Debug, Clone, Copy)]
enum Message {
    Command(Command),
    Shutdown,
}

/// Entry point for starting an engine task.
pub struct Engine;

impl Engine {
    /// Start a new game on the current tokio runtime.
    pub fn spawn(config: EngineConfig) -> EngineHandle {
        info!("starting engine (seed={})", config.seed);
        Self::spawn_with_state(GameState::new(config.seed))
    }

    /// Start the engine from a prepared state (puzzles, replays, tests).
    ///
    /// A state without a falling piece is started first.
    pub fn spawn_with_state(mut state: GameState) -> EngineHandle {
        state.start();

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(state.snapshot());
        let (clear_tx, clear_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(run(state, cmd_rx, snapshot_tx, clear_tx));

        EngineHandle {
            cmd_tx,
            snapshot_rx,
            clear_rx,
            task,
        }
    }
}

/// Caller side of a running engine.
pub struct EngineHandle {
    cmd_tx: mpsc::UnboundedSender<Message>,
    snapshot_rx: watch::Receiver<GameSnapshot>,
    clear_rx: mpsc::UnboundedReceiver<LineClearEvent>,
    task: JoinHandle<GameState>,
}

impl EngineHandle {
    /// Queue a command. Commands are applied in the order they are sent.
    pub fn send(&self, command: Command) -> Result<(), EngineError> {
        self.cmd_tx
            .send(Message::Command(command))
            .map_err(|_| EngineError::Closed)
    }

    /// Copy of the most recently published state.
    pub fn snapshot(&self) -> GameSnapshot {
        *self.snapshot_rx.borrow()
    }

    /// Receiver notified after every accepted command or gravity step.
    pub fn subscribe(&self) -> watch::Receiver<GameSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Next pending line clear, if one is queued.
    pub fn try_next_line_clear(&mut self) -> Option<LineClearEvent> {
        self.clear_rx.try_recv().ok()
    }

    /// Wait for the next line clear. `None` once the engine has stopped.
    pub async fn next_line_clear(&mut self) -> Option<LineClearEvent> {
        self.clear_rx.recv().await
    }

    /// Stop the task and hand back the final state.
    pub async fn shutdown(self) -> Result<GameState, EngineError> {
        // The task may already be gone; joining still reports how it ended.
        let _ = self.cmd_tx.send(Message::Shutdown);
        Ok(self.task.await?)
    }
}

async fn run(
    mut state: GameState,
    mut cmd_rx: mpsc::UnboundedReceiver<Message>,
    snapshot_tx: watch::Sender<GameSnapshot>,
    clear_tx: mpsc::UnboundedSender<LineClearEvent>,
) -> GameState {
    let mut generation = 0u64;
    let mut key = GravityKey::of(&state, generation);
    let mut gravity = arm(&state);

    loop {
        let command = tokio::select! {
            biased;

            msg = cmd_rx.recv() => match msg {
                Some(Message::Command(command)) => command,
                Some(Message::Shutdown) | None => break,
            },
            _ = next_tick(&mut gravity) => Command::Tick,
        };

        let accepted = state.apply(command);
        if !accepted {
            trace!("ignored {}", command.as_str());
            continue;
        }

        if command == Command::Reset {
            generation += 1;
            state.start();
        }

        if let Some(event) = state.take_line_clear() {
            // Nobody listening is fine; the event is presentation only.
            let _ = clear_tx.send(event);
        }

        let next_key = GravityKey::of(&state, generation);
        if next_key != key {
            debug!(
                "gravity re-armed: level={} running={}",
                next_key.level, next_key.running
            );
            key = next_key;
            gravity = arm(&state);
        }

        snapshot_tx.send_replace(state.snapshot());
    }

    info!(
        "engine stopped (score={}, lines={}, level={})",
        state.score(),
        state.lines(),
        state.level()
    );
    state
}

/// Fresh gravity timer whose first tick is one full period from now.
fn arm(state: &GameState) -> Option<Interval> {
    gravity_period(state).map(|period| {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    })
}

async fn next_tick(gravity: &mut Option<Interval>) {
    match gravity {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
