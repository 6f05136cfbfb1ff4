//! # Phosphor
//!
//! A retro console I/O engine: typewriter text reveal, line input with
//! history, and pluggable command dispatch, in the style of an old
//! terminal that types back at you.
//!
//! ## Core Concepts
//!
//! - **Glyph mapping**: pure character-to-unit rendering, separate from
//!   the effectful display surface
//! - **Clock-driven reveal**: the typing engine is a state machine paced
//!   by a clock port, so tests run on virtual time
//! - **One input session at a time**: a line reader owns the editable
//!   region from open to Enter
//! - **Injected registry**: command names resolve through a port, and
//!   handlers get the console back for recursive prompting
//!
//! ## Example
//!
//! ```rust,ignore
//! use phosphor::{CommandModule, Shell, StaticRegistry};
//!
//! let registry = StaticRegistry::new()
//!     .with("hello", CommandModule::new().with_output("oh, hi."));
//!
//! let mut shell = Shell::new(console, dispatcher);
//! shell.run()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod chat;
pub mod clock;
pub mod console;
pub mod dispatch;
pub mod glyph;
pub mod input;
pub mod shell;
pub mod speech;
pub mod storage;
pub mod surface;
pub mod typer;

// Re-exports for convenience
pub use chat::{ChatTransport, TcpLineTransport};
pub use clock::{Clock, SystemClock, VirtualClock};
pub use console::Console;
pub use dispatch::{
    CommandHandler, CommandModule, DispatchError, Dispatcher, ModuleRegistry, StaticRegistry,
};
pub use glyph::{render_char, DisplayUnit};
pub use input::{History, InputEvent, KeyCode, KeyListener, KeyModifiers, LineReader};
pub use shell::Shell;
pub use speech::{BellVoice, NullVoice, Voice};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use surface::{
    AssetSink, Attrs, LogAssets, MemorySurface, Surface, TermSurface, TermSurfaceConfig,
};
pub use typer::{TextSource, TypeConfig, Typist};
