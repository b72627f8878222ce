//! Simulation core for a top-down wave survival shooter.
//!
//! Everything here is pure game logic driven by an elapsed-time tick. Level
//! geometry comes in through [`geometry::LevelGeometry`]; rendering and input
//! live in the binary.

pub mod ai;
pub mod animation;
pub mod combat;
pub mod compute;
pub mod config;
pub mod entities;
pub mod geometry;
pub mod progression;
pub mod stats;
pub mod waves;
