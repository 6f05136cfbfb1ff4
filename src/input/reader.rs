//! Line reader: one editable region, one submission.
//!
//! A reader opens the surface's input region, echoes printable keys,
//! intercepts the control keys (submit, history navigation, delete),
//! and resolves exactly once with the normalized line on Enter. The
//! region is frozen on submission and left in the transcript.

use super::history::History;
use super::keys::{is_printable, InputEvent, KeyCode, KeyModifiers};
use crate::dispatch::normalize;
use crate::glyph::render_char;
use crate::speech::Voice;
use crate::surface::Surface;
use crossbeam_channel::Receiver;
use std::io;
use unicode_segmentation::UnicodeSegmentation;

/// A single-use line input device over the key event channel.
pub struct LineReader<'a> {
    surface: &'a mut dyn Surface,
    history: &'a mut History,
    keys: &'a Receiver<InputEvent>,
    voice: &'a dyn Voice,
    content: String,
    password: bool,
}

impl<'a> LineReader<'a> {
    /// Create a reader over the given ports.
    pub fn new(
        surface: &'a mut dyn Surface,
        history: &'a mut History,
        keys: &'a Receiver<InputEvent>,
        voice: &'a dyn Voice,
    ) -> Self {
        Self {
            surface,
            history,
            keys,
            voice,
            content: String::new(),
            password: false,
        }
    }

    /// Open the input region and block until a line is submitted.
    ///
    /// Returns the normalized (lowercased, trimmed) line. With
    /// `password` set, every echo also exposes a same-length asterisk
    /// mask on the region for masked rendering.
    pub fn read_line(mut self, password: bool) -> io::Result<String> {
        self.password = password;
        self.surface.open_input(password);
        self.surface.present()?;

        loop {
            let event = self.keys.recv().map_err(|_| {
                io::Error::new(io::ErrorKind::UnexpectedEof, "key listener disconnected")
            })?;

            match event {
                InputEvent::Key { code, modifiers } => {
                    self.voice.keypress();
                    if let Some(line) = self.handle_key(code, modifiers) {
                        self.surface.present()?;
                        return Ok(line);
                    }
                }
                InputEvent::Error(e) => log::warn!("key listener error: {e}"),
                InputEvent::Shutdown => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "key listener shut down",
                    ));
                }
                InputEvent::Resize { .. } => {}
            }

            self.surface.present()?;
        }
    }

    /// Handle one key press; `Some` carries the submitted line.
    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Option<String> {
        match code {
            KeyCode::Enter => {
                self.surface.close_input();
                let line = normalize(&self.content);
                self.history.add(&line);
                Some(line)
            }
            KeyCode::Up => {
                let recalled = self.history.navigate_up(&self.content);
                self.content = recalled;
                self.surface.input_replace(&self.content);
                None
            }
            KeyCode::Down => {
                let recalled = self.history.navigate_down();
                self.content = recalled;
                self.surface.input_replace(&self.content);
                None
            }
            KeyCode::Backspace => {
                self.backspace();
                None
            }
            KeyCode::Char(c) if is_printable(c) && !modifiers.control => {
                self.echo(c);
                None
            }
            _ => None,
        }
    }

    fn backspace(&mut self) {
        if self.content.chars().count() == 1 {
            // the last visible character: clear the region outright
            self.content.clear();
            self.surface.input_clear();
        } else if !self.content.is_empty() {
            self.content.pop();
            self.surface.input_replace(&self.content);
        }
    }

    fn echo(&mut self, c: char) {
        self.content.push(c);
        self.surface.append(render_char(c));

        if self.password {
            let visible = self.content.graphemes(true).count();
            let mask = "*".repeat(visible);
            self.surface.input_mask(Some(&mask));
        }
    }
}
