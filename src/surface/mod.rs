//! Display surface port and implementations.
//!
//! The reveal and input engines never touch a screen directly; they
//! drive a [`Surface`]: append a unit, clear, scroll, plus block and
//! input-region management. Two implementations ship in-crate:
//!
//! - [`MemorySurface`] — headless transcript, used by tests and
//!   embedders that render elsewhere
//! - [`TermSurface`] — a real terminal screen via crossterm
//!
//! Splitting "what a character looks like" ([`crate::glyph`]) from
//! "where it lands" keeps the typing engine's ordering and timing logic
//! testable without a terminal.

mod block;
mod memory;
mod term;

pub use block::{BlockNode, InputRegion, RevealBlock};
pub use memory::MemorySurface;
pub use term::{Attrs, TermSurface, TermSurfaceConfig};

use crate::glyph::DisplayUnit;
use std::io;

/// Options for opening a reveal block.
#[derive(Debug, Clone, Default)]
pub struct BlockOptions {
    /// Extra style class applied to the block (empty for none).
    pub style_class: String,
    /// Write into the existing block instead of creating a new one.
    pub reuse: bool,
    /// Clear the whole surface before the first unit is revealed.
    pub clear_first: bool,
}

/// A place where revealed text and echoed input land.
///
/// Exactly one block and at most one input region are open at a time;
/// [`Surface::append`] targets the open input region if there is one,
/// otherwise the open block.
pub trait Surface {
    /// Open a reveal block (or re-enter the current one when
    /// `options.reuse` is set). The block starts in the active
    /// (cursor-blinking) state.
    fn begin_block(&mut self, options: &BlockOptions);

    /// Append one display unit to the open input region or block.
    fn append(&mut self, unit: DisplayUnit);

    /// Close the open block, optionally removing the active marker.
    fn end_block(&mut self, stop_blink: bool);

    /// Clear all visible content.
    fn clear(&mut self);

    /// Scroll so the newest content is visible.
    fn scroll_to_bottom(&mut self);

    /// Open the editable input region and focus it.
    fn open_input(&mut self, password: bool);

    /// Replace the input region's content with `text`, caret at end.
    fn input_replace(&mut self, text: &str);

    /// Clear the input region's content entirely.
    fn input_clear(&mut self);

    /// Expose (or remove) a masked representation of the input region.
    fn input_mask(&mut self, mask: Option<&str>);

    /// Freeze the input region; its content stays in the transcript.
    fn close_input(&mut self);

    /// Flush pending drawing to the underlying device.
    fn present(&mut self) -> io::Result<()>;

    /// The full visible transcript, blocks separated by newlines.
    fn visible_text(&self) -> String;
}

/// Asset hooks provided by the hosting screen/template layer.
///
/// Command modules may declare stylesheet and template assets; the
/// dispatcher hands them here. Registration is fire-and-forget.
pub trait AssetSink: Send + Sync {
    /// Register a stylesheet asset for `command`.
    fn add_stylesheet(&self, command: &str, name: &str);

    /// Fetch and register a template asset for `command`.
    fn load_template(&self, command: &str, name: &str) -> anyhow::Result<()>;
}

/// Asset sink that only logs registrations.
///
/// Terminal hosts have no document to attach stylesheets to; the
/// default sink records the request and moves on.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAssets;

impl AssetSink for LogAssets {
    fn add_stylesheet(&self, command: &str, name: &str) {
        log::info!("stylesheet registered: {command}/{name}");
    }

    fn load_template(&self, command: &str, name: &str) -> anyhow::Result<()> {
        log::info!("template registered: {command}/{name}");
        Ok(())
    }
}
