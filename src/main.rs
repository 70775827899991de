//! Terminal block-stacking game (default binary).
//!
//! The game itself runs in an engine task on a tokio runtime. This thread
//! only polls the keyboard, forwards commands and draws the latest snapshot
//! with a framebuffer-based renderer.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use env_logger::{Env, Target};
use log::info;
use tokio::runtime::Runtime;

use blockfall::engine::{Engine, EngineConfig, EngineHandle};
use blockfall::input::{map_key, should_quit};
use blockfall::term::{ClearFlash, FrameBuffer, GameView, TerminalRenderer, Viewport};
use blockfall::types::{Command, FRAME_MS};

/// Falling-block puzzle game in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "blockfall",
    version,
    about = "Falling-block puzzle game in the terminal.",
    long_about = "Stack the falling shapes and complete rows to clear them.\n\n\
        CONTROLS:\n  Left/Right  Move       Up     Rotate     Down  Soft drop\n  \
        Space       Hard drop  P      Pause      R     Restart    Q / Esc  Quit\n\n\
        Vim (h/j/k/l) and WASD keys work too."
)]
struct Args {
    /// Shape generator seed. Overrides BLOCKFALL_SEED; random when neither is set.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Write logs to this file. Filter with RUST_LOG (default: info).
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Terminal columns per board cell.
    #[arg(long, default_value_t = 2, value_name = "COLS", value_parser = clap::value_parser!(u16).range(1..=2))]
    cell_width: u16,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let config = match args.seed {
        Some(seed) => EngineConfig::default().with_seed(seed),
        None => EngineConfig::from_env()?,
    };

    let rt = Runtime::new().context("failed to start tokio runtime")?;
    let mut handle = {
        let _guard = rt.enter();
        Engine::spawn(config)
    };

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut handle, GameView::new(args.cell_width, 1));

    // Always try to restore terminal state.
    let _ = term.exit();

    let state = rt.block_on(handle.shutdown())?;
    info!(
        "final score {} ({} lines, level {})",
        state.score(),
        state.lines(),
        state.level()
    );
    result
}

fn init_logging(path: Option<&Path>) -> Result<()> {
    // The terminal belongs to the game; without a file nothing is logged.
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn run(term: &mut TerminalRenderer, handle: &mut EngineHandle, view: GameView) -> Result<()> {
    let frame = Duration::from_millis(FRAME_MS as u64);
    let mut flash = ClearFlash::new();
    let mut fb = FrameBuffer::new(0, 0);
    let mut last_frame = Instant::now();

    loop {
        let now = Instant::now();
        let elapsed_ms = now.duration_since(last_frame).as_millis().min(u32::MAX as u128) as u32;
        last_frame = now;

        flash.tick(elapsed_ms);
        while let Some(event) = handle.try_next_line_clear() {
            flash.push(&event);
        }

        // Render.
        let snap = handle.snapshot();
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&snap, &flash, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until the next frame.
        let timeout = frame.saturating_sub(last_frame.elapsed());
        if !event::poll(timeout)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                if should_quit(key) {
                    return Ok(());
                }
                if let Some(command) = map_key(key) {
                    if command == Command::Reset {
                        flash.clear();
                    }
                    handle.send(command)?;
                }
            }
            Event::Resize(_, _) => term.invalidate(),
            _ => {}
        }
    }
}
