//! Printer settings and the top-level label configuration

use std::fmt;

use crate::constants::*;
use crate::error::LabelError;
use crate::icon::IconConfig;
use crate::style::TextConfig;

/// Coerce a raw numeric form value, treating empty or unparsable input as 0
pub fn parse_numeric(raw: &str) -> f32 {
    raw.trim()
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Leading integer of a raw form value, ignoring any trailing characters.
///
/// `"3abc"` gives 3; input without leading digits gives 0.
pub fn parse_leading_integer(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    rest[..digits].parse::<i64>().map(|v| sign * v).unwrap_or(0)
}

/// Tape widths supported by the printer. The width of the tape is the label's height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TapeWidth {
    Mm6,
    Mm9,
    #[default]
    Mm12,
    Mm18,
    Mm24,
    Mm36,
}

impl TapeWidth {
    pub const ALL: [TapeWidth; 6] = [
        TapeWidth::Mm6,
        TapeWidth::Mm9,
        TapeWidth::Mm12,
        TapeWidth::Mm18,
        TapeWidth::Mm24,
        TapeWidth::Mm36,
    ];

    pub fn mm(self) -> f32 {
        match self {
            TapeWidth::Mm6 => 6.0,
            TapeWidth::Mm9 => 9.0,
            TapeWidth::Mm12 => 12.0,
            TapeWidth::Mm18 => 18.0,
            TapeWidth::Mm24 => 24.0,
            TapeWidth::Mm36 => 36.0,
        }
    }
}

impl TryFrom<f32> for TapeWidth {
    type Error = LabelError;

    fn try_from(mm: f32) -> Result<Self, Self::Error> {
        TapeWidth::ALL
            .into_iter()
            .find(|w| w.mm() == mm)
            .ok_or_else(|| LabelError::InvalidConfig(format!("Unsupported tape width {mm} mm")))
    }
}

impl fmt::Display for TapeWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mm())
    }
}

/// Unprintable border of the tape, in mm
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Margins {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Margins {
    /// Same margin on every side
    pub fn uniform(mm: f32) -> Self {
        Self {
            left: mm,
            right: mm,
            top: mm,
            bottom: mm,
        }
    }

    /// Clamp every side into `0..=tape_height_mm / 2`
    pub fn clamped(self, tape_height_mm: f32) -> Self {
        let max = (tape_height_mm / 2.0).max(0.0);
        let clamp = |m: f32| if m.is_finite() { m.clamp(0.0, max) } else { 0.0 };
        Self {
            left: clamp(self.left),
            right: clamp(self.right),
            top: clamp(self.top),
            bottom: clamp(self.bottom),
        }
    }
}

/// Physical printer and tape parameters
#[derive(Debug, Clone, PartialEq)]
pub struct PrinterConfig {
    pub dpi: u32,
    pub tape_width: TapeWidth,
    /// Derived from the content while `auto_length` is set
    pub tape_length_mm: f32,
    pub auto_length: bool,
    pub margins: Margins,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            tape_width: TapeWidth::default(),
            tape_length_mm: DEFAULT_TAPE_LENGTH_MM,
            auto_length: true,
            margins: Margins::default(),
        }
    }
}

impl PrinterConfig {
    /// Set the printer resolution
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Set the tape width, re-clamping the margins to the new height
    pub fn with_tape_width(mut self, tape_width: TapeWidth) -> Self {
        self.tape_width = tape_width;
        self.margins = self.margins.clamped(tape_width.mm());
        self
    }

    /// Fix the tape length by hand and turn automatic length off
    pub fn with_custom_length(mut self, mm: f32) -> Self {
        self.tape_length_mm = clamp_manual_length(mm);
        self.auto_length = false;
        self
    }

    /// Enable or disable automatic tape length
    pub fn with_auto_length(mut self, auto_length: bool) -> Self {
        self.auto_length = auto_length;
        self
    }

    /// Set the margins, clamped to half the tape height
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins.clamped(self.tape_width.mm());
        self
    }

    /// Height of the tape in mm
    pub fn tape_height_mm(&self) -> f32 {
        self.tape_width.mm()
    }

    /// Whether the DPI lies in the printer's supported range
    pub fn dpi_in_range(&self) -> bool {
        (MIN_DPI..=MAX_DPI).contains(&self.dpi)
    }
}

/// Clamp a user-entered tape length into the configurable range
pub fn clamp_manual_length(mm: f32) -> f32 {
    if !mm.is_finite() {
        return MIN_TAPE_LENGTH_MM;
    }
    mm.clamp(MIN_TAPE_LENGTH_MM, MAX_TAPE_LENGTH_MM)
}

/// Complete description of a label.
///
/// Treated as a value: updates produce a new configuration rather than mutating a
/// shared one, so readers never see a half-applied change.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LabelConfig {
    pub printer: PrinterConfig,
    pub icon: IconConfig,
    pub text: TextConfig,
    /// Derive the first two lines from the icon's attributes
    pub autofill: bool,
}

impl LabelConfig {
    /// Create the default label
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the printer settings
    pub fn with_printer(mut self, printer: PrinterConfig) -> Self {
        self.printer = printer;
        self
    }

    /// Set the icon
    pub fn with_icon(mut self, icon: IconConfig) -> Self {
        self.icon = icon;
        self
    }

    /// Set the text block
    pub fn with_text(mut self, text: TextConfig) -> Self {
        self.text = text;
        self
    }

    /// Enable or disable autofill
    pub fn with_autofill(mut self, autofill: bool) -> Self {
        self.autofill = autofill;
        self
    }
}
