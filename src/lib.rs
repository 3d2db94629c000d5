//! Skyburst - Library for simulating and rendering fireworks shows
//!
//! This library provides functionality to:
//! - Simulate fireworks as bursts of gravity-driven, fading particles
//! - Composite each simulation tick into an RGB frame
//! - Stream frames into an animated GIF or a PNG frame sequence
//! - Load show settings from `skyburst.toml`

pub mod cli;
pub mod config;
pub mod firework;
pub mod gif;
pub mod output;
pub mod particle;
pub mod shapes;
pub mod simulation;
pub mod surface;
