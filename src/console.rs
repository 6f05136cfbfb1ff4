//! Console: one terminal session's worth of ports, bundled.
//!
//! A [`Console`] owns the display surface, the typing engine, the
//! history store, the key event channel, and the voice. Command
//! handlers receive it mutably, which is what allows the recursive
//! prompt loop: a handler can type output and read further lines with
//! the same machinery that dispatched it.

use crate::input::{History, InputEvent, LineReader};
use crate::speech::Voice;
use crate::surface::Surface;
use crate::typer::{TextSource, TypeConfig, Typist};
use crossbeam_channel::Receiver;
use std::io;
use std::sync::Arc;
use std::time::Duration;

/// A live console session.
pub struct Console {
    surface: Box<dyn Surface>,
    typist: Typist,
    history: History,
    keys: Receiver<InputEvent>,
    voice: Arc<dyn Voice>,
}

impl Console {
    /// Assemble a console from its ports.
    pub fn new(
        surface: Box<dyn Surface>,
        typist: Typist,
        history: History,
        keys: Receiver<InputEvent>,
        voice: Arc<dyn Voice>,
    ) -> Self {
        Self {
            surface,
            typist,
            history,
            keys,
            voice,
        }
    }

    /// Reveal text through the typing engine.
    pub fn type_text(&mut self, text: impl Into<TextSource>, cfg: &TypeConfig) -> io::Result<()> {
        self.typist.run(text, cfg, self.surface.as_mut())
    }

    /// Read one line from the input device.
    ///
    /// Opens a fresh editable region; resolves on Enter with the
    /// normalized line. With `password` set, echoes are masked.
    pub fn read_line(&mut self, password: bool) -> io::Result<String> {
        LineReader::new(
            self.surface.as_mut(),
            &mut self.history,
            &self.keys,
            self.voice.as_ref(),
        )
        .read_line(password)
    }

    /// Type a prompt, then read the response.
    pub fn prompt(&mut self, text: &str, password: bool) -> io::Result<String> {
        self.type_text(text, &TypeConfig::default())?;
        self.read_line(password)
    }

    /// Pause for one second.
    pub fn pause(&mut self) {
        self.pause_for(Duration::from_secs(1));
    }

    /// Pause for the given duration, through the engine's clock.
    pub fn pause_for(&mut self, duration: Duration) {
        self.typist.pause(duration);
    }

    /// Block until any key is pressed.
    pub fn wait_for_key(&mut self) -> io::Result<()> {
        loop {
            match self.keys.recv() {
                Ok(InputEvent::Key { .. }) => return Ok(()),
                Ok(InputEvent::Shutdown) | Err(_) => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "key listener gone",
                    ));
                }
                Ok(_) => {}
            }
        }
    }

    /// Clear the display surface.
    pub fn clear(&mut self) -> io::Result<()> {
        self.surface.clear();
        self.surface.present()
    }

    /// The display surface.
    pub fn surface(&self) -> &dyn Surface {
        self.surface.as_ref()
    }

    /// The display surface, mutably.
    pub fn surface_mut(&mut self) -> &mut dyn Surface {
        self.surface.as_mut()
    }

    /// The history store.
    pub const fn history(&self) -> &History {
        &self.history
    }
}
