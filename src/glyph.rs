//! Glyph mapping: turns one logical character into a displayable unit.
//!
//! This is the pure half of the reveal pipeline. Deciding *what* a
//! character looks like on screen lives here; attaching it to a surface
//! lives behind the [`Surface`](crate::surface::Surface) port.

/// Non-breaking space, used so runs of whitespace survive rendering.
pub const NBSP: char = '\u{a0}';

/// The smallest thing appended to a surface per reveal tick.
///
/// Either a text-bearing unit or a line break. Text units carry a
/// `char_unit` tag: single-character units (glyphs and spaces) are
/// tagged, multi-column whitespace (tabs) is not. The tag lets
/// renderers style the most recently revealed character, and marks
/// units that originated from character expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayUnit {
    /// A line break. Triggers a scroll-to-bottom when revealed.
    Break,
    /// A text-bearing unit.
    Text {
        /// The rendered text of the unit.
        text: String,
        /// Whether this is a single-character ("char") unit.
        char_unit: bool,
    },
}

impl DisplayUnit {
    /// Create a char-tagged text unit.
    pub fn glyph(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            char_unit: true,
        }
    }

    /// Create an untagged text unit.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            char_unit: false,
        }
    }

    /// Whether this unit is a line break.
    pub const fn is_break(&self) -> bool {
        matches!(self, Self::Break)
    }

    /// The text this unit contributes to the visible transcript.
    ///
    /// A break contributes a newline; text units contribute their text.
    pub fn visible(&self) -> &str {
        match self {
            Self::Break => "\n",
            Self::Text { text, .. } => text,
        }
    }
}

/// Convert a single character into its display unit.
///
/// Newlines become a [`DisplayUnit::Break`], tabs render as three
/// non-breaking spaces, spaces as one non-breaking space, and any other
/// character as itself. Pure function of the input.
pub fn render_char(c: char) -> DisplayUnit {
    match c {
        '\n' => DisplayUnit::Break,
        '\t' => DisplayUnit::text([NBSP, NBSP, NBSP].iter().collect::<String>()),
        ' ' => DisplayUnit::glyph(NBSP.to_string()),
        _ => DisplayUnit::glyph(c.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newline_is_break() {
        assert_eq!(render_char('\n'), DisplayUnit::Break);
        assert!(render_char('\n').is_break());
        assert_eq!(render_char('\n').visible(), "\n");
    }

    #[test]
    fn test_tab_is_three_nbsp() {
        let unit = render_char('\t');
        match &unit {
            DisplayUnit::Text { text, char_unit } => {
                assert_eq!(text.chars().count(), 3);
                assert!(text.chars().all(|c| c == NBSP));
                assert!(!char_unit);
            }
            DisplayUnit::Break => panic!("tab must not break the line"),
        }
    }

    #[test]
    fn test_space_is_nbsp_char_unit() {
        let unit = render_char(' ');
        assert_eq!(
            unit,
            DisplayUnit::Text {
                text: NBSP.to_string(),
                char_unit: true,
            }
        );
    }

    #[test]
    fn test_plain_glyph() {
        let unit = render_char('x');
        assert_eq!(unit.visible(), "x");
        match unit {
            DisplayUnit::Text { char_unit, .. } => assert!(char_unit),
            DisplayUnit::Break => panic!("glyph must be a text unit"),
        }
    }

    #[test]
    fn test_non_ascii_glyph() {
        assert_eq!(render_char('é').visible(), "é");
        assert_eq!(render_char('界').visible(), "界");
    }
}
