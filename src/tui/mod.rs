//! Full-screen terminal front end: theme, rendering, input mapping and the
//! event loop that drives a mounted display.

#![allow(missing_docs)]

pub mod input;
pub mod render;
pub mod runtime;
pub mod terminal_guard;
pub mod theme;

pub use runtime::run_display;
