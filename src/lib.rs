//! Deepdelve: a seeded, turn-based dungeon crawl. Feed the [`Engine`] one
//! [`Intent`] per tick and render the [`EngineState`] it hands back.

pub mod ai;
pub mod combat;
pub mod config;
pub mod data;
pub mod dice;
pub mod ecs;
pub mod engine;
pub mod error;
pub mod map;
pub mod scripted_input;

pub use config::EngineConfig;
pub use engine::{Direction, Engine, Intent, Phase, snapshot::EngineState};
pub use error::{ConfigError, EngineError, GenerationError, ScriptError};
pub use scripted_input::ScriptedInput;
