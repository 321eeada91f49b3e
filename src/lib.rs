//! Car Destroyer: a two-direction highway shooter.
//!
//! The library holds everything but the terminal: rasterizers, entities,
//! the world simulation, the game state machine and the render pass into a
//! cell canvas. The binary wires those to crossterm.

pub mod compute;
pub mod config;
pub mod entities;
pub mod game;
pub mod raster;
pub mod scene;
