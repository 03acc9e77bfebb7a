//! Layout calculation for labels

use tracing::{debug, instrument, trace, warn};

use crate::Result;
use crate::config::LabelConfig;
use crate::geometry::{PixelDimensions, Rect, SafeArea};
use crate::icon::{IconConfig, IconSlot};
use crate::measure::{FontSpec, TextMeasurer, display_text, line_height};
use crate::style::TextAlign;

/// Placement of one text line
#[derive(Debug, Clone, PartialEq)]
pub struct LineLayout {
    /// Text as measured; the `"Line N"` placeholder for an empty line
    pub text: String,
    /// The line has no text of its own
    pub placeholder: bool,
    pub font_size: u32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub align: TextAlign,
    /// Box covering the rendered text, one line height tall
    pub bounds: Rect,
}

/// Content that does not fit inside the safe area, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overflow {
    pub horizontal: f32,
    pub vertical: f32,
}

/// Calculated geometry of a label, in printer pixels
#[derive(Debug, Clone, PartialEq)]
pub struct LabelLayout {
    pub dpi: u32,
    /// Along the tape
    pub pixel_width: u32,
    /// Across the tape
    pub pixel_height: u32,
    pub safe_area: SafeArea,
    /// Zero-width at the content origin when no icon is shown
    pub icon_box: Rect,
    pub icon_slots: Vec<(IconSlot, Rect)>,
    pub text_box: Rect,
    pub lines: Vec<LineLayout>,
    /// Content exceeding the safe area; it is clipped when rendered
    pub overflow: Option<Overflow>,
}

impl LabelLayout {
    /// Size of the printed image, which excludes the margins
    pub fn printable_size(&self) -> (u32, u32) {
        (
            self.pixel_width.saturating_sub(self.safe_area.horizontal()),
            self.pixel_height.saturating_sub(self.safe_area.vertical()),
        )
    }

    /// Printable rectangle inside the tape
    pub fn content_rect(&self) -> Rect {
        self.safe_area.content_rect(PixelDimensions {
            height: self.pixel_height,
            length: self.pixel_width,
        })
    }
}

/// Box reserved for the icon at the start of the content area.
///
/// The icon is square with the content height as its side, halved in width when
/// both screw sub-icons are shown.
pub fn icon_box(icon: &IconConfig, content: Rect) -> Rect {
    if !icon.is_visible() {
        return Rect::new(content.x, content.y, 0.0, content.height);
    }
    let side = content.height;
    let width = if icon.is_split() { side / 2.0 } else { side };
    Rect::new(content.x, content.y, width, side)
}

/// Box left for text to the right of the icon
pub fn text_box(content: Rect, icon_box: Rect) -> Rect {
    Rect::new(
        icon_box.right(),
        content.y,
        (content.width - icon_box.width).max(0.0),
        content.height,
    )
}

/// Content, icon and text boxes for a configuration, without measuring text
pub fn boxes(config: &LabelConfig) -> (Rect, Rect, Rect) {
    let dimensions = PixelDimensions::from_printer(&config.printer);
    let safe_area = SafeArea::from_margins(&config.printer.margins, config.printer.dpi);
    let content = safe_area.content_rect(dimensions);
    let icon = icon_box(&config.icon, content);
    (content, icon, text_box(content, icon))
}

/// Compute the full label layout from a configuration.
///
/// Text lines are stacked and vertically centered in the text box, each aligned
/// horizontally on its own. Overflow is reported, not corrected.
#[instrument(skip(measurer, config), fields(lines = config.text.lines.len()))]
pub fn compose_layout(measurer: &dyn TextMeasurer, config: &LabelConfig) -> Result<LabelLayout> {
    let dpi = config.printer.dpi;
    let dimensions = PixelDimensions::from_printer(&config.printer);
    let safe_area = SafeArea::from_margins(&config.printer.margins, dpi);
    let content = safe_area.content_rect(dimensions);
    let icon = icon_box(&config.icon, content);
    let text = text_box(content, icon);

    debug!(
        "Composing {}x{} px label, text box {}x{}",
        dimensions.length, dimensions.height, text.width, text.height
    );

    let slots = config.icon.visible_slots();
    let icon_slots: Vec<(IconSlot, Rect)> = if slots.len() > 1 {
        let rects = icon.split_horizontal(slots.len());
        slots.into_iter().zip(rects).collect()
    } else {
        slots.into_iter().map(|slot| (slot, icon)).collect()
    };

    // Measure every line before placing, the block is centered as a whole
    let family = config.text.font.as_str();
    let mut measured = Vec::with_capacity(config.text.lines.len());
    for (index, line) in config.text.lines.iter().enumerate() {
        let font = FontSpec::for_line(family, line, line.font_size);
        let shown = display_text(line, index);
        let width = measurer.measure(&shown, &font)?.width;
        let height = line_height(measurer, &font)?;
        measured.push((line, shown.into_owned(), width, height));
    }

    let block_height: f32 = measured.iter().map(|(_, _, _, h)| h).sum();
    let block_width = measured.iter().map(|(_, _, w, _)| *w).fold(0.0, f32::max);

    let mut y = text.y + (text.height - block_height) / 2.0;
    let mut lines = Vec::with_capacity(measured.len());
    for (line, shown, width, height) in measured {
        let x = match line.text_align {
            TextAlign::Left => text.x,
            TextAlign::Center => text.x + (text.width - width) / 2.0,
            TextAlign::Right => text.right() - width,
        };
        trace!("Line '{}' at ({}, {})", shown, x, y);
        lines.push(LineLayout {
            text: shown,
            placeholder: line.text.is_empty(),
            font_size: line.font_size,
            bold: line.bold,
            italic: line.italic,
            underline: line.underline,
            strikethrough: line.strikethrough,
            align: line.text_align,
            bounds: Rect::new(x, y, width, height),
        });
        y += height;
    }

    let horizontal = (block_width - text.width).max(0.0);
    let vertical = (block_height - text.height).max(0.0);
    let overflow = if horizontal > 0.0 || vertical > 0.0 {
        warn!(
            "Label content overflows the safe area by {}x{} px and will be clipped",
            horizontal, vertical
        );
        Some(Overflow {
            horizontal,
            vertical,
        })
    } else {
        None
    };

    Ok(LabelLayout {
        dpi,
        pixel_width: dimensions.length,
        pixel_height: dimensions.height,
        safe_area,
        icon_box: icon,
        icon_slots,
        text_box: text,
        lines,
        overflow,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Margins, PrinterConfig, TapeWidth};
    use crate::icon::{DriveType, HeadType, NutIcon, ScrewIcon};
    use crate::measure::FixedRatioMeasurer;
    use crate::style::{LineStyle, TextConfig};

    // 254 dpi gives 10 px per mm, up to the 0.03937 factor
    fn printer(length_mm: f32) -> PrinterConfig {
        PrinterConfig::default()
            .with_dpi(254)
            .with_tape_width(TapeWidth::Mm12)
            .with_custom_length(length_mm)
    }

    fn compose(config: &LabelConfig) -> LabelLayout {
        // unit line height keeps positions exact
        let measurer = FixedRatioMeasurer {
            line_height_multiplier: 1.0,
            ..Default::default()
        };
        compose_layout(&measurer, config).unwrap()
    }

    #[test]
    fn test_dimensions_and_safe_area() {
        let config = LabelConfig::new()
            .with_printer(printer(40.0).with_margins(Margins::uniform(1.0)))
            .with_icon(IconConfig::None);
        let layout = compose(&config);

        assert_eq!(layout.pixel_height, 120);
        assert_eq!(layout.pixel_width, 400);
        assert_eq!(layout.safe_area.left, 10);
        assert_eq!(layout.printable_size(), (380, 100));
        assert_eq!(layout.icon_box.width, 0.0);
        assert_eq!(layout.text_box, Rect::new(10.0, 10.0, 380.0, 100.0));
    }

    #[test]
    fn test_split_screw_icon() {
        let config = LabelConfig::new().with_printer(printer(40.0));
        let layout = compose(&config);

        assert_eq!(layout.icon_box, Rect::new(0.0, 0.0, 60.0, 120.0));
        assert_eq!(layout.icon_slots.len(), 2);
        assert_eq!(layout.icon_slots[0].0, IconSlot::Head(HeadType::Flat));
        assert_eq!(layout.icon_slots[0].1, Rect::new(0.0, 0.0, 30.0, 120.0));
        assert_eq!(layout.icon_slots[1].0, IconSlot::Drive(DriveType::Phillips));
        assert_eq!(layout.icon_slots[1].1.x, 30.0);
        assert_eq!(layout.text_box.x, 60.0);
        assert_eq!(layout.text_box.width, 340.0);
    }

    #[test]
    fn test_single_icon_is_square() {
        let icon = IconConfig::Screw(ScrewIcon {
            show_head_icon: false,
            ..Default::default()
        });
        let layout = compose(&LabelConfig::new().with_printer(printer(40.0)).with_icon(icon));
        assert_eq!(layout.icon_box, Rect::new(0.0, 0.0, 120.0, 120.0));
        assert_eq!(layout.icon_slots.len(), 1);

        let nut = IconConfig::Nut(NutIcon::default());
        let layout = compose(&LabelConfig::new().with_printer(printer(40.0)).with_icon(nut));
        assert_eq!(layout.icon_box.width, 120.0);
        assert_eq!(layout.text_box.width, 280.0);
    }

    #[test]
    fn test_lines_centered_and_aligned() {
        let text = TextConfig::new()
            .add_line(LineStyle::new("ABCD").with_font_size(10))
            .add_line(
                LineStyle::new("AB")
                    .with_font_size(10)
                    .with_align(TextAlign::Right),
            )
            .add_line(LineStyle::new("").with_align(TextAlign::Center).with_font_size(10));
        let config = LabelConfig::new()
            .with_printer(printer(40.0))
            .with_icon(IconConfig::None)
            .with_text(text);
        let layout = compose(&config);

        // three lines of 10 px centered in 120 px
        assert_eq!(layout.lines.len(), 3);
        assert_eq!(layout.lines[0].bounds.y, 45.0);
        assert_eq!(layout.lines[1].bounds.y, 55.0);
        assert_eq!(layout.lines[0].bounds.x, 0.0);
        assert_eq!(layout.lines[1].bounds.x, 400.0 - 10.0);
        // "Line 3" is 30 px wide
        assert!(layout.lines[2].placeholder);
        assert_eq!(layout.lines[2].text, "Line 3");
        assert_eq!(layout.lines[2].bounds.x, 185.0);
        assert!(layout.overflow.is_none());
    }

    #[test]
    fn test_overflow_reported() {
        let text = TextConfig::new()
            .add_line(LineStyle::new("far too long for this").with_font_size(120))
            .add_line(LineStyle::new("second").with_font_size(120));
        let config = LabelConfig::new()
            .with_printer(printer(8.0))
            .with_text(text);
        let layout = compose(&config);
        let overflow = layout.overflow.expect("content should overflow");
        assert!(overflow.horizontal > 0.0);
        assert!(overflow.vertical > 0.0);
    }

    #[test]
    fn test_margins_wider_than_tape() {
        let config = LabelConfig::new()
            .with_printer(printer(8.0).with_margins(Margins {
                left: 6.0,
                right: 6.0,
                ..Default::default()
            }))
            .with_icon(IconConfig::None);
        let layout = compose(&config);
        assert_eq!(layout.text_box.width, 0.0);
        assert_eq!(layout.printable_size().0, 0);
    }

    #[test]
    fn test_recompose_is_identical() {
        let config = LabelConfig::new().with_printer(printer(30.0));
        assert_eq!(compose(&config), compose(&config));
    }
}
