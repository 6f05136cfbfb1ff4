//! Key model: codes, modifiers, and the printable-set classification.

/// Key codes the engine cares about.
///
/// A simplified subset of crossterm's key codes; anything else is
/// dropped at conversion time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A character key.
    Char(char),
    /// Enter/Return: submits the line.
    Enter,
    /// Backspace: deletes backwards.
    Backspace,
    /// Up arrow: history back.
    Up,
    /// Down arrow: history forward.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Tab key.
    Tab,
    /// Delete key.
    Delete,
    /// Escape key.
    Esc,
}

/// Key modifiers held during a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyModifiers {
    /// Shift key held.
    pub shift: bool,
    /// Control key held.
    pub control: bool,
    /// Alt/Option key held.
    pub alt: bool,
    /// Super/Command/Windows key held.
    pub super_key: bool,
}

impl KeyModifiers {
    /// No modifiers.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        super_key: false,
    };

    /// Check if any modifier is active.
    pub const fn any(&self) -> bool {
        self.shift || self.control || self.alt || self.super_key
    }
}

/// Events from the key listener thread.
#[derive(Debug, Clone)]
pub enum InputEvent {
    /// A key was pressed.
    Key {
        /// The key code.
        code: KeyCode,
        /// Modifiers held during the press.
        modifiers: KeyModifiers,
    },

    /// Terminal was resized.
    Resize {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },

    /// Listener thread encountered an error.
    Error(String),

    /// Listener thread is shutting down.
    Shutdown,
}

impl InputEvent {
    /// Convenience constructor for an unmodified key press.
    pub const fn key(code: KeyCode) -> Self {
        Self::Key {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }
}

/// Whether a character belongs to the fixed printable set the input
/// device echoes.
///
/// The set covers ASCII digits and letters, space, and the punctuation
/// reachable without shift plus the numeric-pad operators:
/// `` ; = , - . / ` [ \ ] ' * + ``. Everything else is ignored.
pub fn is_printable(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c == ' '
        || matches!(
            c,
            ';' | '=' | ',' | '-' | '.' | '/' | '`' | '[' | '\\' | ']' | '\'' | '*' | '+'
        )
}
