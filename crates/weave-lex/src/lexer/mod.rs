//! Lexer module: the mode-stacked scanner split by scanning mode.
//!
//! - `core` — the driving loop, indentation protocol, and mode stack
//! - `command` — scanning inside `<<…>>`
//! - `option` — scanning inside `[[…]]`
//!
//! Text-mode scanning lives on `core` directly since it is the default mode
//! and drives the other two.

pub mod core;
mod command;
mod option;

pub use core::{Lexer, Mode};
