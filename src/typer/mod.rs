//! Typing engine: timed, character-by-character reveal.
//!
//! A [`Typist`] reveals text on a [`Surface`] at a configured cadence,
//! driven by a [`Clock`] so the same code path runs against real time
//! in production and virtual time in tests. Sequences of lines reveal
//! strictly in order; there is no cancellation primitive — callers
//! serialize runs by awaiting completion.

mod session;

pub use session::TypingSession;

use crate::clock::Clock;
use crate::speech::Voice;
use crate::surface::{BlockOptions, Surface};
use std::io;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for one typing run.
#[derive(Debug, Clone)]
pub struct TypeConfig {
    /// Pause between revealed units.
    pub char_delay: Duration,
    /// Pause before the first unit.
    pub initial_delay: Duration,
    /// Pause around each element of a line sequence (substituted for
    /// the initial and final delay per line).
    pub line_delay: Duration,
    /// Pause after the last unit, before the run resolves.
    pub final_delay: Duration,
    /// Extra style class for the reveal block (empty for none).
    pub style_class: String,
    /// Write into the existing block instead of opening a new one.
    pub use_existing_block: bool,
    /// Remove the blinking marker once the run completes.
    pub stop_blink: bool,
    /// Expand characters through the glyph renderer; when false the
    /// text is revealed as one opaque unit.
    pub expand_chars: bool,
    /// Clear the surface before revealing.
    pub clear_first: bool,
}

impl Default for TypeConfig {
    fn default() -> Self {
        Self {
            char_delay: Duration::from_millis(30),
            initial_delay: Duration::from_millis(1000),
            line_delay: Duration::from_millis(100),
            final_delay: Duration::from_millis(500),
            style_class: String::new(),
            use_existing_block: false,
            stop_blink: true,
            expand_chars: true,
            clear_first: false,
        }
    }
}

/// Text to reveal: one line of text, or an ordered sequence of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSource {
    /// A single piece of text (may itself contain newlines).
    Line(String),
    /// An ordered sequence, one visible line per element.
    Lines(Vec<String>),
}

impl From<&str> for TextSource {
    fn from(text: &str) -> Self {
        Self::Line(text.to_string())
    }
}

impl From<String> for TextSource {
    fn from(text: String) -> Self {
        Self::Line(text)
    }
}

impl From<Vec<String>> for TextSource {
    fn from(lines: Vec<String>) -> Self {
        Self::Lines(lines)
    }
}

impl From<&[&str]> for TextSource {
    fn from(lines: &[&str]) -> Self {
        Self::Lines(lines.iter().map(|s| (*s).to_string()).collect())
    }
}

/// The typing engine: owns the pacing clock and the announce hook.
pub struct Typist {
    clock: Box<dyn Clock>,
    voice: Arc<dyn Voice>,
}

impl Typist {
    /// Create a typist over the given clock and voice.
    pub fn new(clock: Box<dyn Clock>, voice: Arc<dyn Voice>) -> Self {
        Self { clock, voice }
    }

    /// Sleep through the clock (shared pacing for callers that need a
    /// plain pause between reveals).
    pub fn pause(&mut self, duration: Duration) {
        self.clock.sleep(duration);
    }

    /// Reveal `text` on `surface`, returning once everything is
    /// visible and the final delay has elapsed.
    ///
    /// Empty text is an immediate no-op success. A sequence reveals
    /// one element at a time, each with `line_delay` substituted for
    /// the initial and final pause, never interleaved.
    pub fn run(
        &mut self,
        text: impl Into<TextSource>,
        cfg: &TypeConfig,
        surface: &mut dyn Surface,
    ) -> io::Result<()> {
        self.run_source(&text.into(), cfg, surface)
    }

    fn run_source(
        &mut self,
        source: &TextSource,
        cfg: &TypeConfig,
        surface: &mut dyn Surface,
    ) -> io::Result<()> {
        match source {
            TextSource::Lines(lines) => {
                let per_line = TypeConfig {
                    initial_delay: cfg.line_delay,
                    final_delay: cfg.line_delay,
                    ..cfg.clone()
                };
                for line in lines {
                    self.run_source(&TextSource::Line(line.clone()), &per_line, surface)?;
                }
                Ok(())
            }
            TextSource::Line(text) => self.run_line(text, cfg, surface),
        }
    }

    fn run_line(&mut self, text: &str, cfg: &TypeConfig, surface: &mut dyn Surface) -> io::Result<()> {
        if text.is_empty() {
            return Ok(());
        }

        log::trace!("revealing {} chars", text.chars().count());

        surface.begin_block(&BlockOptions {
            style_class: cfg.style_class.clone(),
            reuse: cfg.use_existing_block,
            clear_first: cfg.clear_first,
        });
        surface.present()?;

        self.clock.sleep(cfg.initial_delay);

        let mut session = if cfg.expand_chars {
            TypingSession::expand(text)
        } else {
            TypingSession::opaque(text)
        };

        // announced once per run, not per character
        self.voice.announce(text);

        while !session.is_done() {
            self.clock.sleep(cfg.char_delay);
            session.step(surface);
            surface.present()?;
        }

        self.clock.sleep(cfg.final_delay);
        surface.end_block(cfg.stop_blink);
        surface.present()
    }
}
