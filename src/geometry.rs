//! Conversion of physical tape measurements into printer pixels

use crate::config::{Margins, PrinterConfig};
use crate::constants::{INCHES_PER_MM, MM_PER_INCH, POINTS_PER_INCH};

/// Convert a length in millimeters to whole printer dots at the given DPI.
///
/// Computed in f64: f32 rounds products such as 93 mm at 539 DPI the wrong way.
pub fn to_pixels(mm: f32, dpi: u32) -> u32 {
    (f64::from(mm) * INCHES_PER_MM * f64::from(dpi)).round().max(0.0) as u32
}

/// Convert a pixel count back to millimeters at the given DPI.
///
/// Returns 0 for a zero DPI, which only arises from coerced invalid input.
pub fn pixels_to_mm(px: f32, dpi: u32) -> f32 {
    if dpi == 0 {
        return 0.0;
    }
    (f64::from(px) / (f64::from(dpi) / MM_PER_INCH)) as f32
}

/// Convert printer pixels to PDF points at the given DPI
pub fn pixels_to_points(px: f32, dpi: u32) -> f32 {
    if dpi == 0 {
        return 0.0;
    }
    px * POINTS_PER_INCH / dpi as f32
}

/// Pixel size of the whole tape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelDimensions {
    /// Across the tape
    pub height: u32,
    /// Along the tape
    pub length: u32,
}

impl PixelDimensions {
    /// Compute the tape's pixel size from the printer settings
    pub fn from_printer(printer: &PrinterConfig) -> Self {
        Self {
            height: to_pixels(printer.tape_width.mm(), printer.dpi),
            length: to_pixels(printer.tape_length_mm, printer.dpi),
        }
    }
}

/// Margins in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SafeArea {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl SafeArea {
    pub fn from_margins(margins: &Margins, dpi: u32) -> Self {
        Self {
            left: to_pixels(margins.left, dpi),
            right: to_pixels(margins.right, dpi),
            top: to_pixels(margins.top, dpi),
            bottom: to_pixels(margins.bottom, dpi),
        }
    }

    pub fn horizontal(&self) -> u32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> u32 {
        self.top + self.bottom
    }

    /// The printable rectangle inside the given tape dimensions.
    ///
    /// Collapses to zero width or height when the margins exceed the tape.
    pub fn content_rect(&self, dimensions: PixelDimensions) -> Rect {
        Rect {
            x: self.left as f32,
            y: self.top as f32,
            width: dimensions.length.saturating_sub(self.horizontal()) as f32,
            height: dimensions.height.saturating_sub(self.vertical()) as f32,
        }
    }
}

/// Axis-aligned box in label pixels, origin at the top-left of the tape
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Split into `parts` equal boxes side by side
    pub fn split_horizontal(&self, parts: usize) -> Vec<Rect> {
        if parts == 0 {
            return Vec::new();
        }
        let part_width = self.width / parts as f32;
        (0..parts)
            .map(|i| Rect::new(self.x + part_width * i as f32, self.y, part_width, self.height))
            .collect()
    }
}
