//! User Interface layer
//!
//! This module contains the terminal host for the view tree:
//! - Theme definitions and colors
//! - Reusable widgets (popups, status bar)
//! - Click regions recorded during drawing
//! - Main render loop

pub mod hit;
pub mod render;
pub mod theme;
pub mod widgets;

pub use hit::{HitMap, Target};
pub use render::render;
pub use theme::Theme;
