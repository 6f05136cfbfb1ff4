//! Input capture: key model, listener thread, history, line reader.
//!
//! The listener thread polls terminal events and forwards them over a
//! channel; a [`LineReader`] drains that channel against one editable
//! region until Enter, echoing printable keys, navigating history, and
//! resolving exactly once with the submitted line.

mod history;
mod keys;
mod listener;
mod reader;

pub use history::{History, HISTORY_KEY};
pub use keys::{is_printable, InputEvent, KeyCode, KeyModifiers};
pub use listener::KeyListener;
pub use reader::LineReader;
