//! Cross-module tests driving whole games.
//!
//! - `scenarios.rs`: end-to-end rounds exercising motion, capture, crashes
//!   and win rules through the [`Game`](crate::Game) surface
//! - `determinism.rs`: identical seeds and inputs give identical games
//! - `helpers.rs`: game builders and stepping utilities

mod determinism;
mod helpers;
