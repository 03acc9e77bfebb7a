//! Styling structures for label text lines

use crate::config::parse_leading_integer;
use crate::constants::*;

/// Text alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Content and styling for one line of label text
#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub text: String,
    /// Font size in pixels; shared by every line while fitting to the label
    pub font_size: u32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub text_align: TextAlign,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: DEFAULT_FONT_SIZE,
            bold: false,
            italic: false,
            underline: false,
            strikethrough: false,
            text_align: TextAlign::Left,
        }
    }
}

impl LineStyle {
    /// Create a line with default styling
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Make text bold
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Make text italic
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    pub fn strikethrough(mut self) -> Self {
        self.strikethrough = true;
        self
    }

    /// Set font size, clamped to the supported range
    pub fn with_font_size(mut self, size: u32) -> Self {
        self.font_size = clamp_font_size(size);
        self
    }

    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.text_align = align;
        self
    }
}

/// Clamp a font size into the supported range
pub fn clamp_font_size(size: u32) -> u32 {
    size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

/// Canonical name of a supported font family, matched case-insensitively
pub fn font_family(name: &str) -> Option<&'static str> {
    FONT_FAMILIES
        .iter()
        .copied()
        .find(|family| family.eq_ignore_ascii_case(name.trim()))
}

/// The label's text block
#[derive(Debug, Clone, PartialEq)]
pub struct TextConfig {
    pub font: String,
    /// Solve one shared font size that fills the label
    pub fit_to_label: bool,
    pub lines: Vec<LineStyle>,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font: DEFAULT_FONT_FAMILY.to_string(),
            fit_to_label: false,
            lines: vec![LineStyle::default()],
        }
    }
}

impl TextConfig {
    /// Create a text block with no lines
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            ..Default::default()
        }
    }

    /// Add a line
    pub fn add_line(mut self, line: LineStyle) -> Self {
        if self.lines.len() < MAX_LINES {
            self.lines.push(line);
        }
        self
    }

    /// Set the font family
    pub fn with_font<S: Into<String>>(mut self, font: S) -> Self {
        self.font = font.into();
        self
    }

    pub fn with_fit_to_label(mut self, fit: bool) -> Self {
        self.fit_to_label = fit;
        self
    }

    /// Resize to `count` lines, capped at the maximum.
    ///
    /// Existing lines keep their content by index; new lines get the default style.
    pub fn set_line_count(&mut self, count: usize) {
        let count = count.min(MAX_LINES);
        self.lines.resize_with(count, LineStyle::default);
    }

    /// Resize from a raw form value, reading its leading digits.
    ///
    /// Empty or non-numeric input means no lines.
    pub fn set_line_count_raw(&mut self, raw: &str) {
        let count = parse_leading_integer(raw).clamp(0, MAX_LINES as i64) as usize;
        self.set_line_count(count);
    }

    /// Apply one font size to every line
    pub fn apply_uniform_font_size(&mut self, size: u32) {
        for line in &mut self.lines {
            line.font_size = size;
        }
    }
}
