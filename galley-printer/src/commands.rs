//! Printer command tables
//!
//! The same semantic command (emphasis, size class, highlight, cut) maps to
//! different byte sequences depending on the print head. Thermal printers
//! take the `GS` family; impact/dot-matrix printers only understand the
//! older `ESC` print-mode commands, so their table never emits `GS` (0x1D).

use crate::encoding::Encoding;

const ESC: u8 = 0x1B;
const GS: u8 = 0x1D;

/// Horizontal alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Character size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharSize {
    #[default]
    Normal,
    DoubleHeight,
    DoubleWidth,
    Double,
}

/// Semantic printer commands for one printer class
pub trait CommandSet: Send + Sync {
    /// Reset printer to default state
    fn init(&self) -> &'static [u8];

    fn align(&self, align: Align) -> &'static [u8];

    fn emphasis(&self, on: bool) -> &'static [u8];

    fn size(&self, size: CharSize) -> &'static [u8];

    /// Inverse video (thermal) or second ribbon colour (impact)
    fn highlight(&self, on: bool) -> &'static [u8];

    /// Print and feed n lines
    fn feed(&self, lines: u8) -> Vec<u8>;

    /// Feed then cut
    fn cut(&self, feed_lines: u8) -> Vec<u8>;
}

/// ESC/POS thermal receipt printers
#[derive(Debug, Clone, Copy, Default)]
pub struct ThermalCommands;

impl CommandSet for ThermalCommands {
    fn init(&self) -> &'static [u8] {
        &[ESC, 0x40]
    }

    fn align(&self, align: Align) -> &'static [u8] {
        match align {
            Align::Left => &[ESC, 0x61, 0x00],
            Align::Center => &[ESC, 0x61, 0x01],
            Align::Right => &[ESC, 0x61, 0x02],
        }
    }

    fn emphasis(&self, on: bool) -> &'static [u8] {
        // ESC E n
        if on { &[ESC, 0x45, 0x01] } else { &[ESC, 0x45, 0x00] }
    }

    fn size(&self, size: CharSize) -> &'static [u8] {
        // GS ! n
        match size {
            CharSize::Normal => &[GS, 0x21, 0x00],
            CharSize::DoubleHeight => &[GS, 0x21, 0x01],
            CharSize::DoubleWidth => &[GS, 0x21, 0x10],
            CharSize::Double => &[GS, 0x21, 0x11],
        }
    }

    fn highlight(&self, on: bool) -> &'static [u8] {
        // GS B n - white/black reverse printing
        if on { &[GS, 0x42, 0x01] } else { &[GS, 0x42, 0x00] }
    }

    fn feed(&self, lines: u8) -> Vec<u8> {
        vec![ESC, 0x64, lines]
    }

    fn cut(&self, feed_lines: u8) -> Vec<u8> {
        // GS V 66 n - feed n lines then full cut
        vec![GS, 0x56, 0x42, feed_lines]
    }
}

/// Impact / dot-matrix kitchen printers (TM-U220 class)
#[derive(Debug, Clone, Copy, Default)]
pub struct ImpactCommands;

impl CommandSet for ImpactCommands {
    fn init(&self) -> &'static [u8] {
        &[ESC, 0x40]
    }

    fn align(&self, align: Align) -> &'static [u8] {
        match align {
            Align::Left => &[ESC, 0x61, 0x00],
            Align::Center => &[ESC, 0x61, 0x01],
            Align::Right => &[ESC, 0x61, 0x02],
        }
    }

    fn emphasis(&self, on: bool) -> &'static [u8] {
        // ESC G n - double-strike
        if on { &[ESC, 0x47, 0x01] } else { &[ESC, 0x47, 0x00] }
    }

    fn size(&self, size: CharSize) -> &'static [u8] {
        // ESC ! n - print mode, bit 4 double height, bit 5 double width
        match size {
            CharSize::Normal => &[ESC, 0x21, 0x00],
            CharSize::DoubleHeight => &[ESC, 0x21, 0x10],
            CharSize::DoubleWidth => &[ESC, 0x21, 0x20],
            CharSize::Double => &[ESC, 0x21, 0x30],
        }
    }

    fn highlight(&self, on: bool) -> &'static [u8] {
        // ESC r n - select ribbon colour (0 black, 1 red)
        if on { &[ESC, 0x72, 0x01] } else { &[ESC, 0x72, 0x00] }
    }

    fn feed(&self, lines: u8) -> Vec<u8> {
        vec![ESC, 0x64, lines]
    }

    fn cut(&self, feed_lines: u8) -> Vec<u8> {
        // ESC d n, then ESC i - partial cut
        vec![ESC, 0x64, feed_lines, ESC, 0x69]
    }
}

/// Print head technology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrinterClass {
    #[default]
    Thermal,
    Impact,
}

static THERMAL: ThermalCommands = ThermalCommands;
static IMPACT: ImpactCommands = ImpactCommands;

impl PrinterClass {
    /// Command table for this class
    pub fn commands(self) -> &'static dyn CommandSet {
        match self {
            PrinterClass::Thermal => &THERMAL,
            PrinterClass::Impact => &IMPACT,
        }
    }
}

/// What the target printer can physically do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityProfile {
    pub class: PrinterClass,
    /// Characters per line
    ///
    /// Common widths:
    /// - 58mm paper: 32 characters
    /// - 80mm paper: 48 characters
    pub width: usize,
    pub can_cut: bool,
    pub second_color: bool,
    pub encoding: Encoding,
}

impl CapabilityProfile {
    pub fn thermal(width: usize) -> Self {
        Self {
            class: PrinterClass::Thermal,
            width,
            can_cut: true,
            second_color: false,
            encoding: Encoding::Ascii,
        }
    }

    pub fn impact(width: usize) -> Self {
        Self {
            class: PrinterClass::Impact,
            width,
            can_cut: true,
            second_color: false,
            encoding: Encoding::Ascii,
        }
    }

    pub fn without_cut(mut self) -> Self {
        self.can_cut = false;
        self
    }

    pub fn with_second_color(mut self) -> Self {
        self.second_color = true;
        self
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }
}

impl Default for CapabilityProfile {
    fn default() -> Self {
        Self::thermal(48)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_static(cmds: &dyn CommandSet) -> Vec<&'static [u8]> {
        let mut out = vec![cmds.init()];
        for a in [Align::Left, Align::Center, Align::Right] {
            out.push(cmds.align(a));
        }
        for s in [
            CharSize::Normal,
            CharSize::DoubleHeight,
            CharSize::DoubleWidth,
            CharSize::Double,
        ] {
            out.push(cmds.size(s));
        }
        for on in [true, false] {
            out.push(cmds.emphasis(on));
            out.push(cmds.highlight(on));
        }
        out
    }

    #[test]
    fn test_impact_table_has_no_gs_commands() {
        let cmds = PrinterClass::Impact.commands();
        for seq in all_static(cmds) {
            assert!(!seq.contains(&GS), "impact emitted GS: {:?}", seq);
        }
        assert!(!cmds.cut(3).contains(&GS));
        assert!(!cmds.feed(3).contains(&GS));
    }

    #[test]
    fn test_same_semantics_different_bytes() {
        let thermal = PrinterClass::Thermal.commands();
        let impact = PrinterClass::Impact.commands();

        assert_ne!(thermal.emphasis(true), impact.emphasis(true));
        assert_ne!(thermal.size(CharSize::Double), impact.size(CharSize::Double));
        assert_ne!(thermal.highlight(true), impact.highlight(true));
        // Alignment is shared by both classes
        assert_eq!(thermal.align(Align::Center), impact.align(Align::Center));
    }
}
