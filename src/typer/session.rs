//! Typing session: the reveal queue as an explicit state machine.
//!
//! One session per `Typist` run. The session owns the not-yet-revealed
//! units and advances one unit per [`step`](TypingSession::step); the
//! caller supplies the pacing. Keeping the state machine free of
//! timers is what lets tests drive a reveal on virtual time.

use crate::glyph::{render_char, DisplayUnit};
use crate::surface::Surface;
use std::collections::VecDeque;

/// One in-flight reveal: a queue of units waiting to land.
#[derive(Debug)]
pub struct TypingSession {
    queue: VecDeque<DisplayUnit>,
}

impl TypingSession {
    /// Build a session by expanding each character through the glyph
    /// renderer.
    pub fn expand(text: &str) -> Self {
        Self {
            queue: text.chars().map(render_char).collect(),
        }
    }

    /// Build a session revealing the whole text as one opaque unit.
    pub fn opaque(text: &str) -> Self {
        let mut queue = VecDeque::with_capacity(1);
        queue.push_back(DisplayUnit::text(text));
        Self { queue }
    }

    /// Reveal the next unit on `surface`.
    ///
    /// A line break triggers an immediate scroll-to-bottom. Returns
    /// `true` once the queue is empty.
    pub fn step(&mut self, surface: &mut dyn Surface) -> bool {
        if let Some(unit) = self.queue.pop_front() {
            let is_break = unit.is_break();
            surface.append(unit);
            if is_break {
                surface.scroll_to_bottom();
            }
        }
        self.is_done()
    }

    /// Whether every unit has been revealed.
    pub fn is_done(&self) -> bool {
        self.queue.is_empty()
    }

    /// Units still waiting to be revealed.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}
