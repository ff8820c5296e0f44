//! Backrooms Core - Infinite Room Exploration Engine
//!
//! Owns the mutable side of a session: the generated room cache, the
//! visited set, the player, footstep ripples, flicker and status messages,
//! plus JSON save slots. Pure rules live in `backrooms-logic`.
//!
//! # Architecture
//!
//! A front end drives the engine with one [`input::InputState`] per fixed
//! step and draws the [`render::Frame`] it hands back:
//! - **World**: coordinate-keyed room cache and visited set
//! - **Engine**: `tick` applies commands, movement, footsteps and lighting
//! - **Persistence**: numbered JSON save slots
//!
//! # Example
//!
//! ```rust,no_run
//! use backrooms_core::prelude::*;
//!
//! let mut engine = SimulationEngine::new(GameConfig::default());
//!
//! loop {
//!     let input = InputState { right: true, ..Default::default() };
//!     let report = engine.tick(&input); // 60 FPS
//!     let _frame = engine.frame();
//!     if report.quit {
//!         break;
//!     }
//! }
//! ```

pub mod engine;
pub mod input;
pub mod persistence;
pub mod render;
pub mod world;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::engine::{LookupOutcome, SimulationEngine, TickReport};
    pub use crate::input::{Command, InputState};
    pub use crate::render::{DrawCommand, Frame, Hud};
    pub use backrooms_logic::config::GameConfig;
    pub use backrooms_logic::geometry::RoomCoordinate;
}
