//! Minimum tape length needed for the icon and text

use tracing::{debug, instrument};

use crate::Result;
use crate::config::Margins;
use crate::constants::*;
use crate::geometry::pixels_to_mm;
use crate::icon::IconConfig;
use crate::measure::{TextMeasurer, line_width};
use crate::style::TextConfig;

/// Tape length taken up by the icon, in mm
pub fn icon_length_mm(icon: &IconConfig, tape_height_mm: f32) -> f32 {
    match icon {
        IconConfig::None => 0.0,
        IconConfig::Screw(screw) => match (screw.show_head_icon, screw.show_drive_icon) {
            (true, true) => tape_height_mm / 2.0,
            (true, false) | (false, true) => tape_height_mm,
            (false, false) => 0.0,
        },
        IconConfig::Nut(_) | IconConfig::Washer(_) | IconConfig::Custom(_) => {
            if icon.is_visible() {
                tape_height_mm
            } else {
                0.0
            }
        }
    }
}

/// Widest line at its own font size, in pixels
pub fn widest_line_px(measurer: &dyn TextMeasurer, text: &TextConfig) -> Result<f32> {
    let mut widest: f32 = 0.0;
    for (index, line) in text.lines.iter().enumerate() {
        widest = widest.max(line_width(measurer, &text.font, line, index, line.font_size)?);
    }
    Ok(widest)
}

/// Compute the shortest tape that holds margins, icon and text.
///
/// The widest line is rounded up to whole millimeters and a fixed slack is added.
/// The result is never shorter than the minimum tape length.
#[instrument(skip(measurer, icon, text))]
pub fn solve_required_length_mm(
    measurer: &dyn TextMeasurer,
    icon: &IconConfig,
    text: &TextConfig,
    tape_height_mm: f32,
    dpi: u32,
    margins: &Margins,
) -> Result<f32> {
    let mut total = margins.left + margins.right;
    total += icon_length_mm(icon, tape_height_mm);

    let text_mm = pixels_to_mm(widest_line_px(measurer, text)?, dpi).ceil();
    total += text_mm + LENGTH_SLACK_MM;

    let length = total.max(MIN_TAPE_LENGTH_MM);
    debug!("Required tape length {} mm (text {} mm)", length, text_mm);
    Ok(length)
}

/// Whether a solved length differs enough from the stored one to replace it
pub fn needs_length_update(current_mm: f32, solved_mm: f32) -> bool {
    (solved_mm - current_mm).abs() > LENGTH_HYSTERESIS_MM
}
