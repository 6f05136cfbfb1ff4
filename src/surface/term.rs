//! Terminal surface: draws the transcript on a real screen.
//!
//! Output is append-only: revealed units are emitted as ANSI at the
//! cursor and flushed in a single write per [`present`], which is what
//! keeps a slow reveal flicker-free. The newest line is always the one
//! being written, so the terminal handles scrolling itself.
//!
//! [`present`]: super::Surface::present

use super::block::InputRegion;
use super::{BlockOptions, Surface};
use crate::glyph::DisplayUnit;
use bitflags::bitflags;
use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::collections::{HashMap, VecDeque};
use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;

bitflags! {
    /// Text attributes a style class maps to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attrs: u8 {
        /// Bold text.
        const BOLD = 0b0000_0001;
        /// Dim/faint text.
        const DIM = 0b0000_0010;
        /// Underlined text.
        const UNDERLINE = 0b0000_0100;
        /// Reversed colors.
        const REVERSED = 0b0000_1000;
    }
}

/// Write the SGR sequence selecting `attrs` (after a reset).
fn sgr(attrs: Attrs, out: &mut Vec<u8>) {
    out.extend_from_slice(b"\x1b[0m");
    if attrs.contains(Attrs::BOLD) {
        out.extend_from_slice(b"\x1b[1m");
    }
    if attrs.contains(Attrs::DIM) {
        out.extend_from_slice(b"\x1b[2m");
    }
    if attrs.contains(Attrs::UNDERLINE) {
        out.extend_from_slice(b"\x1b[4m");
    }
    if attrs.contains(Attrs::REVERSED) {
        out.extend_from_slice(b"\x1b[7m");
    }
}

/// Configuration for the terminal surface.
#[derive(Debug, Clone)]
pub struct TermSurfaceConfig {
    /// Foreground tint, as 24-bit RGB.
    pub fg: (u8, u8, u8),
    /// Maximum transcript lines retained for [`Surface::visible_text`].
    pub max_scrollback: usize,
    /// Whether to switch to the alternate screen buffer.
    pub alternate_screen: bool,
}

impl Default for TermSurfaceConfig {
    fn default() -> Self {
        Self {
            // classic phosphor green
            fg: (51, 255, 102),
            max_scrollback: 10000,
            alternate_screen: true,
        }
    }
}

/// A crossterm-backed display surface.
///
/// Construction takes over the terminal (raw mode, alternate screen,
/// hidden cursor); `Drop` restores it.
pub struct TermSurface {
    config: TermSurfaceConfig,
    out: Vec<u8>,
    lines: VecDeque<String>,
    col: u16,
    width: u16,
    classes: HashMap<String, Attrs>,
    block_attrs: Attrs,
    input: Option<InputRegion>,
}

impl TermSurface {
    /// Take over the terminal and create the surface.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup fails (raw mode, alternate
    /// screen, size query).
    pub fn new(config: TermSurfaceConfig) -> io::Result<Self> {
        let (width, _height) = terminal::size()?;

        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        if config.alternate_screen {
            execute!(stdout, EnterAlternateScreen)?;
        }
        execute!(stdout, cursor::Hide)?;

        let mut lines = VecDeque::new();
        lines.push_back(String::new());

        let mut surface = Self {
            config,
            out: Vec::with_capacity(4096),
            lines,
            col: 0,
            width,
            classes: HashMap::new(),
            block_attrs: Attrs::empty(),
            input: None,
        };
        surface.emit_fg();
        surface.present()?;
        Ok(surface)
    }

    /// Map a style class name to text attributes.
    pub fn define_class(&mut self, name: &str, attrs: Attrs) {
        self.classes.insert(name.to_string(), attrs);
    }

    /// Adjust the wrap width after a terminal resize.
    pub const fn set_width(&mut self, width: u16) {
        self.width = width;
    }

    fn emit_fg(&mut self) {
        let (r, g, b) = self.config.fg;
        let _ = write!(self.out, "\x1b[38;2;{r};{g};{b}m");
    }

    /// Move to a fresh line, trimming the transcript at capacity.
    fn newline(&mut self) {
        self.out.extend_from_slice(b"\r\n");
        self.col = 0;
        while self.lines.len() >= self.config.max_scrollback {
            self.lines.pop_front();
        }
        self.lines.push_back(String::new());
    }

    /// Emit a run of text at the cursor, wrapping at the surface width.
    fn emit_text(&mut self, text: &str) {
        #[allow(clippy::cast_possible_truncation)]
        let w = UnicodeWidthStr::width(text) as u16;
        if self.width > 0 && self.col + w > self.width {
            self.newline();
        }
        self.out.extend_from_slice(text.as_bytes());
        self.col += w;
        if let Some(line) = self.lines.back_mut() {
            line.push_str(text);
        }
    }

    /// Erase and redraw the input line from its region state.
    fn redraw_input(&mut self) {
        let display = match &self.input {
            Some(region) => region.display().to_string(),
            None => return,
        };
        self.out.extend_from_slice(b"\r\x1b[2K");
        self.col = 0;
        if let Some(line) = self.lines.back_mut() {
            line.clear();
        }
        self.emit_text(&display);
    }

    fn current_line_is_empty(&self) -> bool {
        self.lines.back().is_none_or(String::is_empty)
    }
}

impl Surface for TermSurface {
    fn begin_block(&mut self, options: &BlockOptions) {
        if options.clear_first {
            self.clear();
        }
        if !options.reuse && !self.current_line_is_empty() {
            self.newline();
        }
        self.block_attrs = self
            .classes
            .get(&options.style_class)
            .copied()
            .unwrap_or_default();
        sgr(self.block_attrs, &mut self.out);
        self.emit_fg();
        // active marker: the hardware cursor blinks at the reveal point
        self.out.extend_from_slice(b"\x1b[?25h");
    }

    fn append(&mut self, unit: DisplayUnit) {
        if self.input.is_some() {
            if let Some(region) = self.input.as_mut() {
                region.push(&unit);
            }
            self.redraw_input();
            return;
        }
        match unit {
            DisplayUnit::Break => self.newline(),
            DisplayUnit::Text { text, .. } => self.emit_text(&text),
        }
    }

    fn end_block(&mut self, stop_blink: bool) {
        if stop_blink {
            self.out.extend_from_slice(b"\x1b[?25l");
        }
        self.block_attrs = Attrs::empty();
        sgr(Attrs::empty(), &mut self.out);
        self.emit_fg();
    }

    fn clear(&mut self) {
        self.out.extend_from_slice(b"\x1b[2J\x1b[H");
        self.emit_fg();
        self.lines.clear();
        self.lines.push_back(String::new());
        self.col = 0;
    }

    fn scroll_to_bottom(&mut self) {
        // Append-only output: the cursor already sits on the newest
        // line, so the terminal keeps it in view on its own.
    }

    fn open_input(&mut self, password: bool) {
        if !self.current_line_is_empty() {
            self.newline();
        }
        self.input = Some(InputRegion::new(password));
        self.out.extend_from_slice(b"\x1b[?25h");
    }

    fn input_replace(&mut self, text: &str) {
        if let Some(region) = self.input.as_mut() {
            region.replace(text);
        }
        self.redraw_input();
    }

    fn input_clear(&mut self) {
        if let Some(region) = self.input.as_mut() {
            region.clear();
        }
        self.redraw_input();
    }

    fn input_mask(&mut self, mask: Option<&str>) {
        if let Some(region) = self.input.as_mut() {
            region.set_mask(mask);
        }
        self.redraw_input();
    }

    fn close_input(&mut self) {
        if let Some(mut region) = self.input.take() {
            region.freeze();
            // keep the submitted line in the transcript
            let display = region.display().to_string();
            if let Some(line) = self.lines.back_mut() {
                line.clear();
                line.push_str(&display);
            }
        }
        self.out.extend_from_slice(b"\x1b[?25l");
        self.newline();
    }

    fn present(&mut self) -> io::Result<()> {
        if self.out.is_empty() {
            return Ok(());
        }
        let mut stdout = io::stdout();
        stdout.write_all(&self.out)?;
        stdout.flush()?;
        self.out.clear();
        Ok(())
    }

    fn visible_text(&self) -> String {
        // the open input line is mirrored into the transcript on every
        // redraw, so the line store is already complete
        self.lines
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Drop for TermSurface {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, cursor::Show);
        if self.config.alternate_screen {
            let _ = execute!(stdout, LeaveAlternateScreen);
        }
        let _ = terminal::disable_raw_mode();
    }
}
