//! Audio/speech port.
//!
//! The engine announces revealed text once per typing run and clicks on
//! every captured key press. Both calls are fire-and-forget; hosts plug
//! in a real synthesizer or sound bank by implementing [`Voice`].

/// Fire-and-forget audio hooks.
pub trait Voice {
    /// Announce a full text once, at the start of a reveal.
    fn announce(&self, text: &str);

    /// Play the keypress sound for one captured key.
    fn keypress(&self);
}

/// Silent voice.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullVoice;

impl Voice for NullVoice {
    fn announce(&self, _text: &str) {}

    fn keypress(&self) {}
}

/// Terminal-bell voice: rings BEL on every key press.
#[derive(Debug, Default, Clone, Copy)]
pub struct BellVoice;

impl Voice for BellVoice {
    fn announce(&self, text: &str) {
        log::debug!("announce: {text}");
    }

    fn keypress(&self) {
        use std::io::Write;
        let mut out = std::io::stdout();
        let _ = out.write_all(b"\x07");
        let _ = out.flush();
    }
}
