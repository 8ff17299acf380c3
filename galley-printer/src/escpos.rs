//! ESC/POS document builder
//!
//! Provides a fluent API for building print data against one printer's
//! capability profile. Semantic calls are translated through the profile's
//! command table; capabilities the hardware lacks (cutter, second colour)
//! turn into no-ops instead of stray bytes.

use crate::commands::{Align, CapabilityProfile, CharSize, CommandSet};

/// ESC/POS command builder
pub struct EscPosBuilder {
    buf: Vec<u8>,
    profile: CapabilityProfile,
    cmds: &'static dyn CommandSet,
}

impl EscPosBuilder {
    /// Create a new builder for the given printer profile
    pub fn new(profile: CapabilityProfile) -> Self {
        let cmds = profile.class.commands();
        let mut buf = Vec::with_capacity(4096);
        buf.extend_from_slice(cmds.init());
        Self { buf, profile, cmds }
    }

    /// Thermal printer with cutter, `width` characters per line
    pub fn thermal(width: usize) -> Self {
        Self::new(CapabilityProfile::thermal(width))
    }

    /// Get the configured paper width
    pub fn width(&self) -> usize {
        self.profile.width
    }

    pub fn profile(&self) -> &CapabilityProfile {
        &self.profile
    }

    // === Text Output ===

    /// Write raw text (encoded at build time)
    pub fn text(&mut self, s: &str) -> &mut Self {
        self.buf.extend_from_slice(s.as_bytes());
        self
    }

    /// Write text followed by newline
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.text(s);
        self.buf.push(b'\n');
        self
    }

    /// Write empty line
    pub fn newline(&mut self) -> &mut Self {
        self.buf.push(b'\n');
        self
    }

    /// Print and feed n lines
    pub fn feed(&mut self, lines: u8) -> &mut Self {
        let seq = self.cmds.feed(lines);
        self.buf.extend_from_slice(&seq);
        self
    }

    // === Alignment ===

    pub fn align(&mut self, align: Align) -> &mut Self {
        self.buf.extend_from_slice(self.cmds.align(align));
        self
    }

    /// Align text to center
    pub fn center(&mut self) -> &mut Self {
        self.align(Align::Center)
    }

    /// Align text to left (default)
    pub fn left(&mut self) -> &mut Self {
        self.align(Align::Left)
    }

    /// Align text to right
    pub fn right(&mut self) -> &mut Self {
        self.align(Align::Right)
    }

    // === Text Style ===

    /// Enable bold / double-strike text
    pub fn bold(&mut self) -> &mut Self {
        self.buf.extend_from_slice(self.cmds.emphasis(true));
        self
    }

    pub fn bold_off(&mut self) -> &mut Self {
        self.buf.extend_from_slice(self.cmds.emphasis(false));
        self
    }

    pub fn size(&mut self, size: CharSize) -> &mut Self {
        self.buf.extend_from_slice(self.cmds.size(size));
        self
    }

    /// Double width and height
    pub fn double_size(&mut self) -> &mut Self {
        self.size(CharSize::Double)
    }

    /// Double height only
    pub fn double_height(&mut self) -> &mut Self {
        self.size(CharSize::DoubleHeight)
    }

    /// Reset to normal size
    pub fn reset_size(&mut self) -> &mut Self {
        self.size(CharSize::Normal)
    }

    /// Start a highlighted region; no-op without a second colour
    pub fn highlight(&mut self) -> &mut Self {
        if self.profile.second_color {
            self.buf.extend_from_slice(self.cmds.highlight(true));
        }
        self
    }

    pub fn highlight_off(&mut self) -> &mut Self {
        if self.profile.second_color {
            self.buf.extend_from_slice(self.cmds.highlight(false));
        }
        self
    }

    // === Separators ===

    /// Print a full-width line of `c`
    pub fn sep_char(&mut self, c: char) -> &mut Self {
        let line: String = std::iter::repeat_n(c, self.profile.width).collect();
        self.line(&line)
    }

    // === Paper Control ===

    /// Feed and cut; only feeds when the printer has no cutter
    pub fn cut(&mut self) -> &mut Self {
        let seq = if self.profile.can_cut {
            self.cmds.cut(3)
        } else {
            self.cmds.feed(3)
        };
        self.buf.extend_from_slice(&seq);
        self
    }

    // === Build ===

    /// Build the final byte buffer in the profile's encoding
    pub fn build(self) -> Vec<u8> {
        self.profile.encoding.convert(&self.buf)
    }

    /// Build without text conversion (for debugging or inspection)
    pub fn build_raw(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for EscPosBuilder {
    fn default() -> Self {
        Self::thermal(48)
    }
}
