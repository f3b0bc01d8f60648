// UI module - console presentation of a session
//
// This module contains:
// - ConsoleView: Renders session events (questions, clock, scoreboard) as text
// - InputBridge: Translates typed player input into session commands

pub mod bridge;
pub mod console;

pub use bridge::{InputBridge, InputError};
pub use console::ConsoleView;
