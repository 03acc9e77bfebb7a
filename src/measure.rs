//! Text measurement backends for sizing label text

use std::borrow::Cow;

use crate::Result;
use crate::constants::*;
use crate::error::LabelError;
use crate::style::LineStyle;

/// Font selection for a measurement request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec<'a> {
    pub family: &'a str,
    pub size_px: f32,
    pub bold: bool,
    pub italic: bool,
}

impl<'a> FontSpec<'a> {
    pub fn new(family: &'a str, size_px: f32) -> Self {
        Self {
            family,
            size_px,
            bold: false,
            italic: false,
        }
    }

    /// Font for a line at the given size, carrying the line's weight and slant
    pub fn for_line(family: &'a str, line: &LineStyle, size_px: u32) -> Self {
        Self {
            family,
            size_px: size_px as f32,
            bold: line.bold,
            italic: line.italic,
        }
    }
}

/// Rendered size of a string in device pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextExtent {
    pub width: f32,
    pub height: f32,
}

/// Trait for measuring rendered text.
///
/// Implement this trait to plug in the environment's font rendering. Results must be
/// deterministic for a given font, size and style on one backend.
pub trait TextMeasurer {
    /// Measure `text` rendered with `font`
    fn measure(&self, text: &str, font: &FontSpec<'_>) -> Result<TextExtent>;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn measure(&self, text: &str, font: &FontSpec<'_>) -> Result<TextExtent> {
        (**self).measure(text, font)
    }
}

/// Reject sizes no backend can render
fn check_size(font: &FontSpec<'_>) -> Result<()> {
    if font.size_px.is_finite() && font.size_px >= 0.0 {
        Ok(())
    } else {
        Err(LabelError::Measurement(format!(
            "invalid font size {} for '{}'",
            font.size_px, font.family
        )))
    }
}

/// Text shown for a line: its own text, or `"Line N"` when empty
pub fn display_text(line: &LineStyle, index: usize) -> Cow<'_, str> {
    if line.text.is_empty() {
        Cow::Owned(format!("Line {}", index + 1))
    } else {
        Cow::Borrowed(&line.text)
    }
}

/// Height of one line of text, taken from the reference glyphs rather than the
/// line's content so that line pitch is stable
pub fn line_height(measurer: &dyn TextMeasurer, font: &FontSpec<'_>) -> Result<f32> {
    Ok(measurer.measure(REFERENCE_GLYPHS, font)?.height)
}

/// Width of a line as displayed at the given size
pub fn line_width(
    measurer: &dyn TextMeasurer,
    family: &str,
    line: &LineStyle,
    index: usize,
    size_px: u32,
) -> Result<f32> {
    let font = FontSpec::for_line(family, line, size_px);
    Ok(measurer.measure(&display_text(line, index), &font)?.width)
}

/// Measurer estimating glyphs from fixed ratios of the font size.
///
/// Fully deterministic and independent of installed fonts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRatioMeasurer {
    pub char_width_ratio: f32,
    pub line_height_multiplier: f32,
    pub bold_width_ratio: f32,
}

impl Default for FixedRatioMeasurer {
    fn default() -> Self {
        Self {
            char_width_ratio: DEFAULT_CHAR_WIDTH_RATIO,
            line_height_multiplier: DEFAULT_LINE_HEIGHT_MULTIPLIER,
            bold_width_ratio: BOLD_WIDTH_RATIO,
        }
    }
}

impl TextMeasurer for FixedRatioMeasurer {
    fn measure(&self, text: &str, font: &FontSpec<'_>) -> Result<TextExtent> {
        check_size(font)?;
        let mut width = text.chars().count() as f32 * font.size_px * self.char_width_ratio;
        if font.bold {
            width *= self.bold_width_ratio;
        }
        Ok(TextExtent {
            width,
            height: font.size_px * self.line_height_multiplier,
        })
    }
}

#[cfg(feature = "ttf-parser")]
pub use ttf::{FaceStyle, TtfTextMeasurer};

#[cfg(feature = "ttf-parser")]
mod ttf {
    use std::collections::HashMap;

    use tracing::{debug, trace};

    use super::{FontSpec, TextExtent, TextMeasurer, check_size};
    use crate::Result;
    use crate::constants::DEFAULT_CHAR_WIDTH_RATIO;
    use crate::error::LabelError;

    /// Weight and slant of a registered face
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum FaceStyle {
        Regular,
        Bold,
        Italic,
        BoldItalic,
    }

    impl FaceStyle {
        pub fn from_flags(bold: bool, italic: bool) -> Self {
            match (bold, italic) {
                (false, false) => FaceStyle::Regular,
                (true, false) => FaceStyle::Bold,
                (false, true) => FaceStyle::Italic,
                (true, true) => FaceStyle::BoldItalic,
            }
        }

        /// Styles to try, best match first
        fn fallbacks(self) -> &'static [FaceStyle] {
            match self {
                FaceStyle::Regular => &[FaceStyle::Regular],
                FaceStyle::Bold => &[FaceStyle::Bold, FaceStyle::Regular],
                FaceStyle::Italic => &[FaceStyle::Italic, FaceStyle::Regular],
                FaceStyle::BoldItalic => &[
                    FaceStyle::BoldItalic,
                    FaceStyle::Bold,
                    FaceStyle::Italic,
                    FaceStyle::Regular,
                ],
            }
        }
    }

    struct LoadedFace {
        font_data: Vec<u8>,
        units_per_em: f32,
    }

    impl LoadedFace {
        fn parse(&self) -> Result<ttf_parser::Face<'_>> {
            ttf_parser::Face::parse(&self.font_data, 0)
                .map_err(|e| LabelError::Measurement(format!("Registered face became unreadable: {e}")))
        }
    }

    /// TrueType text measurement using ttf-parser.
    ///
    /// Faces are registered per family and style. Requests for a missing style fall
    /// back to the closest registered one, and unknown families fall back to the first
    /// family registered.
    #[derive(Default)]
    pub struct TtfTextMeasurer {
        faces: HashMap<(String, FaceStyle), LoadedFace>,
        default_family: Option<String>,
    }

    impl TtfTextMeasurer {
        /// Create a measurer with no fonts
        pub fn new() -> Self {
            Self::default()
        }

        /// Register raw TTF/OTF data for a family and style.
        ///
        /// Validates the font by parsing it and extracting units_per_em.
        pub fn add_face(&mut self, family: &str, style: FaceStyle, font_data: Vec<u8>) -> Result<()> {
            let face = ttf_parser::Face::parse(&font_data, 0)
                .map_err(|e| LabelError::FontError(format!("Failed to parse font: {e}")))?;
            let units_per_em = face.units_per_em() as f32;
            let key = family.to_lowercase();
            debug!("Registered {:?} face for '{}'", style, key);
            if self.default_family.is_none() {
                self.default_family = Some(key.clone());
            }
            self.faces.insert(
                (key, style),
                LoadedFace {
                    font_data,
                    units_per_em,
                },
            );
            Ok(())
        }

        /// Builder form of [`TtfTextMeasurer::add_face`]
        pub fn with_face(mut self, family: &str, style: FaceStyle, font_data: Vec<u8>) -> Result<Self> {
            self.add_face(family, style, font_data)?;
            Ok(self)
        }

        pub fn is_empty(&self) -> bool {
            self.faces.is_empty()
        }

        fn lookup(&self, family: &str, style: FaceStyle) -> Option<&LoadedFace> {
            style
                .fallbacks()
                .iter()
                .find_map(|s| self.faces.get(&(family.to_string(), *s)))
        }

        fn face_for(&self, font: &FontSpec<'_>) -> Result<&LoadedFace> {
            let style = FaceStyle::from_flags(font.bold, font.italic);
            let family = font.family.to_lowercase();
            if let Some(face) = self.lookup(&family, style) {
                return Ok(face);
            }
            let default = self.default_family.as_deref().ok_or_else(|| {
                LabelError::MeasurementUnavailable("no fonts registered".to_string())
            })?;
            trace!("No face for '{}', falling back to '{}'", family, default);
            self.lookup(default, style).ok_or_else(|| {
                LabelError::MeasurementUnavailable(format!("no usable face for '{family}'"))
            })
        }
    }

    impl TextMeasurer for TtfTextMeasurer {
        fn measure(&self, text: &str, font: &FontSpec<'_>) -> Result<TextExtent> {
            check_size(font)?;
            let loaded = self.face_for(font)?;
            let face = loaded.parse()?;
            let scale = font.size_px / loaded.units_per_em;

            let mut width = 0.0;
            let mut top = f32::MIN;
            let mut bottom = f32::MAX;
            for ch in text.chars() {
                let Some(gid) = face.glyph_index(ch) else {
                    width += font.size_px * DEFAULT_CHAR_WIDTH_RATIO;
                    continue;
                };
                width += face
                    .glyph_hor_advance(gid)
                    .map(|advance| advance as f32 * scale)
                    .unwrap_or(font.size_px * DEFAULT_CHAR_WIDTH_RATIO);
                if let Some(bbox) = face.glyph_bounding_box(gid) {
                    top = top.max(bbox.y_max as f32 * scale);
                    bottom = bottom.min(bbox.y_min as f32 * scale);
                }
            }

            let height = if top >= bottom {
                top - bottom
            } else {
                // No outlines: fall back to the face's vertical metrics
                (face.ascender() as f32 - face.descender() as f32) * scale
            };

            Ok(TextExtent { width, height })
        }
    }

    impl std::fmt::Debug for TtfTextMeasurer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("TtfTextMeasurer")
                .field("faces", &self.faces.len())
                .field("default_family", &self.default_family)
                .finish()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_text_placeholder() {
        let empty = LineStyle::default();
        assert_eq!(display_text(&empty, 0), "Line 1");
        assert_eq!(display_text(&empty, 2), "Line 3");
        assert_eq!(display_text(&LineStyle::new("M4"), 0), "M4");
    }

    #[test]
    fn test_fixed_ratio_measurer() {
        let measurer = FixedRatioMeasurer::default();
        let extent = measurer
            .measure("abcd", &FontSpec::new("Arial", 10.0))
            .unwrap();
        assert_eq!(extent.width, 20.0);
        assert_eq!(extent.height, 12.0);
    }

    #[test]
    fn test_bold_is_wider() {
        let measurer = FixedRatioMeasurer::default();
        let line = LineStyle::new("Hex Torx");
        let regular = line_width(&measurer, "Arial", &line, 0, 20).unwrap();
        let bold = line_width(&measurer, "Arial", &line.clone().bold(), 0, 20).unwrap();
        assert!(bold > regular);
    }

    #[test]
    fn test_line_height_ignores_content() {
        let measurer = FixedRatioMeasurer::default();
        let font = FontSpec::new("Arial", 20.0);
        assert_eq!(line_height(&measurer, &font).unwrap(), 24.0);
    }

    #[test]
    fn test_invalid_size_is_a_measurement_error() {
        let measurer = FixedRatioMeasurer::default();
        let nan = measurer.measure("M3", &FontSpec::new("Arial", f32::NAN));
        assert!(matches!(nan, Err(LabelError::Measurement(_))));
        let negative = measurer.measure("M3", &FontSpec::new("Arial", -4.0));
        assert!(matches!(negative, Err(LabelError::Measurement(_))));
    }

    #[test]
    fn test_empty_line_measures_placeholder() {
        let measurer = FixedRatioMeasurer::default();
        let width = line_width(&measurer, "Arial", &LineStyle::default(), 0, 10).unwrap();
        // "Line 1" is six characters
        assert_eq!(width, 30.0);
    }
}
