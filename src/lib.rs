//! Gameophagy: an arcade game about autophagy.
//!
//! Draw a loop around drifting cargo to wrap it in an autophagosome, then
//! flick the autophagosome out of the cell to score what it carries.
//!
//! The gameplay core ([`session`] and the modules below it) is plain Rust
//! working in screen coordinates and can run without a window.  The Bevy
//! plugins in [`menu`], [`game`], [`rendering`] and [`particles`] wrap it in
//! a playable shell.

pub mod assets;
pub mod autophagosome;
pub mod cargo;
pub mod config;
pub mod constants;
pub mod containment;
pub mod error;
pub mod fission;
pub mod game;
pub mod geometry;
pub mod gesture;
pub mod graphics;
pub mod highscores;
pub mod menu;
pub mod particles;
pub mod rendering;
pub mod session;
