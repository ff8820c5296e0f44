//! Pure world logic for Backrooms 2D.
//!
//! This crate contains all game logic that is independent of windowing,
//! rendering or storage. Functions take plain data and return results,
//! making them unit-testable and usable from the engine, the headless
//! harness and any front end.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Panel, player, lighting and footstep settings (JSON loadable) |
//! | [`constants`] | Generation geometry, edge thresholds, palette |
//! | [`footsteps`] | Bounded FIFO of expanding footstep ripples |
//! | [`generation`] | Deterministic per-coordinate room generation |
//! | [`geometry`] | Room coordinates, panel edges, axis-aligned rectangles |
//! | [`lighting`] | Flashlight cone raycasting and the illumination mask |
//! | [`lookup`] | `"x,y"` coordinate query parsing |
//! | [`movement`] | Edge transitions and wall collision |

pub mod config;
pub mod constants;
pub mod footsteps;
pub mod generation;
pub mod geometry;
pub mod lighting;
pub mod lookup;
pub mod movement;
