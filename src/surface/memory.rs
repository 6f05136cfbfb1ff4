//! Headless surface: records everything, draws nothing.

use super::block::{InputRegion, RevealBlock};
use super::{BlockOptions, Surface};
use crate::glyph::DisplayUnit;
use std::io;

/// A surface that keeps the transcript in memory.
///
/// Used by the test suite and by embedders that mirror the transcript
/// into their own rendering layer.
#[derive(Debug, Default)]
pub struct MemorySurface {
    blocks: Vec<RevealBlock>,
    input: Option<InputRegion>,
    submitted: Vec<InputRegion>,
    scrolls: usize,
    clears: usize,
}

impl MemorySurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// All reveal blocks so far, oldest first.
    pub fn blocks(&self) -> &[RevealBlock] {
        &self.blocks
    }

    /// The open input region, if any.
    pub const fn input(&self) -> Option<&InputRegion> {
        self.input.as_ref()
    }

    /// Frozen input regions, oldest first.
    pub fn submitted(&self) -> &[InputRegion] {
        &self.submitted
    }

    /// How many times the surface was scrolled to the bottom.
    pub const fn scroll_count(&self) -> usize {
        self.scrolls
    }

    /// How many times the surface was cleared.
    pub const fn clear_count(&self) -> usize {
        self.clears
    }
}

impl Surface for MemorySurface {
    fn begin_block(&mut self, options: &BlockOptions) {
        if options.clear_first {
            self.clear();
        }
        if options.reuse {
            if let Some(block) = self.blocks.last_mut() {
                block.reopen();
                return;
            }
        }
        self.blocks.push(RevealBlock::new(&options.style_class));
    }

    fn append(&mut self, unit: DisplayUnit) {
        if let Some(region) = self.input.as_mut() {
            region.push(&unit);
        } else if let Some(block) = self.blocks.last_mut() {
            block.append(unit);
        }
    }

    fn end_block(&mut self, stop_blink: bool) {
        if let Some(block) = self.blocks.last_mut() {
            block.finish(stop_blink);
        }
    }

    fn clear(&mut self) {
        self.blocks.clear();
        self.submitted.clear();
        self.clears += 1;
    }

    fn scroll_to_bottom(&mut self) {
        self.scrolls += 1;
    }

    fn open_input(&mut self, password: bool) {
        self.input = Some(InputRegion::new(password));
    }

    fn input_replace(&mut self, text: &str) {
        if let Some(region) = self.input.as_mut() {
            region.replace(text);
        }
    }

    fn input_clear(&mut self) {
        if let Some(region) = self.input.as_mut() {
            region.clear();
        }
    }

    fn input_mask(&mut self, mask: Option<&str>) {
        if let Some(region) = self.input.as_mut() {
            region.set_mask(mask);
        }
    }

    fn close_input(&mut self) {
        if let Some(mut region) = self.input.take() {
            region.freeze();
            self.submitted.push(region);
        }
    }

    fn present(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn visible_text(&self) -> String {
        let mut parts: Vec<String> = self.blocks.iter().map(RevealBlock::text).collect();
        parts.extend(self.submitted.iter().map(|r| r.display().to_string()));
        if let Some(region) = &self.input {
            parts.push(region.display().to_string());
        }
        parts.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::render_char;

    #[test]
    fn test_append_targets_input_when_open() {
        let mut surface = MemorySurface::new();
        surface.begin_block(&BlockOptions::default());
        surface.append(render_char('a'));
        surface.open_input(false);
        surface.append(render_char('b'));
        assert_eq!(surface.input().unwrap().content(), "b");
        assert_eq!(surface.blocks()[0].text(), "a");
    }

    #[test]
    fn test_close_input_freezes_region() {
        let mut surface = MemorySurface::new();
        surface.open_input(false);
        surface.append(render_char('x'));
        surface.close_input();
        assert!(surface.input().is_none());
        assert_eq!(surface.submitted().len(), 1);
        assert!(!surface.submitted()[0].is_editable());
    }

    #[test]
    fn test_reuse_reopens_last_block() {
        let mut surface = MemorySurface::new();
        surface.begin_block(&BlockOptions::default());
        surface.append(render_char('a'));
        surface.end_block(true);
        surface.begin_block(&BlockOptions {
            reuse: true,
            ..BlockOptions::default()
        });
        surface.append(render_char('b'));
        surface.end_block(true);
        assert_eq!(surface.blocks().len(), 1);
        assert_eq!(surface.blocks()[0].text(), "ab");
    }

    #[test]
    fn test_clear_first_resets_transcript() {
        let mut surface = MemorySurface::new();
        surface.begin_block(&BlockOptions::default());
        surface.append(render_char('a'));
        surface.end_block(true);
        surface.begin_block(&BlockOptions {
            clear_first: true,
            ..BlockOptions::default()
        });
        surface.append(render_char('b'));
        assert_eq!(surface.visible_text(), "b");
        assert_eq!(surface.clear_count(), 1);
    }
}
