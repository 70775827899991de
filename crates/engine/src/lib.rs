//! Engine - serialized command processing and gravity timing
//!
//! The core crate knows nothing about time. This crate runs a
//! [`GameState`](blockfall_core::GameState) inside a tokio task, feeds it
//! commands from any number of callers in arrival order, and injects
//! [`Command::Tick`](blockfall_types::Command::Tick) on a level-dependent
//! timer.

pub mod actor;
pub mod config;
pub mod gravity;

pub use actor::{Engine, EngineError, EngineHandle};
pub use config::{ConfigError, EngineConfig, SEED_ENV};
pub use gravity::{gravity_period, GravityKey};
