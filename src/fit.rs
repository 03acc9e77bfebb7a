//! Font size fitting for the label's text block

use tracing::{debug, instrument, trace};

use crate::Result;
use crate::constants::*;
use crate::measure::{FontSpec, TextMeasurer, line_height, line_width};
use crate::style::LineStyle;

/// Size of the text block at one candidate font size
#[derive(Debug, Clone, Copy, PartialEq)]
struct BlockSize {
    width: f32,
    height: f32,
}

fn measure_block(
    measurer: &dyn TextMeasurer,
    lines: &[LineStyle],
    font: &str,
    size: u32,
) -> Result<BlockSize> {
    let mut block = BlockSize {
        width: 0.0,
        height: 0.0,
    };
    for (index, line) in lines.iter().enumerate() {
        block.height += line_height(measurer, &FontSpec::for_line(font, line, size))?;
        block.width = block
            .width
            .max(line_width(measurer, font, line, index, size)?);
    }
    Ok(block)
}

/// Find the largest font size at which every line fits the available box.
///
/// Candidates are tried upward one pixel at a time from 8. The first size whose
/// summed line height or widest line reaches the available height or width ends
/// the search, and the size before it is returned (never below 6). A block that
/// still fits at 120 gets 120; an empty block gets the default size of 12.
#[instrument(skip(measurer, lines), fields(lines = lines.len()))]
pub fn solve_font_size(
    measurer: &dyn TextMeasurer,
    lines: &[LineStyle],
    available_width: f32,
    available_height: f32,
    font: &str,
) -> Result<u32> {
    if lines.is_empty() {
        return Ok(DEFAULT_FONT_SIZE);
    }

    for size in FIT_SEARCH_START..=MAX_FONT_SIZE {
        let block = measure_block(measurer, lines, font, size)?;
        trace!("size {}: block {}x{}", size, block.width, block.height);
        if block.height >= available_height || block.width >= available_width {
            let solved = (size - 1).max(MIN_FONT_SIZE);
            debug!("Fitted font size {}", solved);
            return Ok(solved);
        }
    }

    debug!("Text fits at the maximum font size");
    Ok(MAX_FONT_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::FixedRatioMeasurer;

    fn solve(lines: &[LineStyle], width: f32, height: f32) -> u32 {
        solve_font_size(&FixedRatioMeasurer::default(), lines, width, height, "Arial").unwrap()
    }

    #[test]
    fn test_empty_lines_default_size() {
        assert_eq!(solve(&[], 10.0, 10.0), 12);
        assert_eq!(solve(&[], 1000.0, 1000.0), 12);
    }

    #[test]
    fn test_single_line_limited_by_height() {
        // height 1.2 * size reaches 85 at size 71
        let lines = vec![LineStyle::new("M3×10")];
        assert_eq!(solve(&lines, 300.0, 85.0), 70);
    }

    #[test]
    fn test_single_line_limited_by_width() {
        // width 5 chars * 0.5 * size reaches 100 at size 40
        let lines = vec![LineStyle::new("M3×10")];
        assert_eq!(solve(&lines, 100.0, 500.0), 39);
    }

    #[test]
    fn test_heights_are_summed() {
        // two lines: 2.4 * size reaches 85 at size 36
        let lines = vec![LineStyle::new("M3"), LineStyle::new("Pan")];
        assert_eq!(solve(&lines, 1000.0, 85.0), 35);
    }

    #[test]
    fn test_empty_line_uses_placeholder_width() {
        // "Line 1" is six characters: 3 * size reaches 60 at size 20
        let lines = vec![LineStyle::default()];
        assert_eq!(solve(&lines, 60.0, 1000.0), 19);
    }

    #[test]
    fn test_overflow_at_first_candidate() {
        // the search starts at 8, so immediate overflow yields 7
        let lines = vec![LineStyle::new("a very long line of text")];
        let size = solve(&lines, 1.0, 1.0);
        assert_eq!(size, FIT_SEARCH_START - 1);
        assert!(size >= MIN_FONT_SIZE);
    }

    #[test]
    fn test_ceiling() {
        let lines = vec![LineStyle::new("M3")];
        assert_eq!(solve(&lines, 10_000.0, 10_000.0), MAX_FONT_SIZE);
    }

    #[test]
    fn test_monotonic_in_available_space() {
        let lines = vec![
            LineStyle::new("M6×25").bold(),
            LineStyle::new("Hex Torx").italic(),
        ];
        let mut previous = 0;
        for width in (20..600).step_by(25) {
            let size = solve(&lines, width as f32, 85.0);
            assert!(size >= previous, "width {width}: {size} < {previous}");
            previous = size;
        }
        let mut previous = 0;
        for height in (10..300).step_by(10) {
            let size = solve(&lines, 400.0, height as f32);
            assert!(size >= previous, "height {height}: {size} < {previous}");
            previous = size;
        }
    }

    #[test]
    fn test_deterministic() {
        let lines = vec![LineStyle::new("M3×10"), LineStyle::new("Flat Phillips")];
        assert_eq!(solve(&lines, 300.0, 85.0), solve(&lines, 300.0, 85.0));
    }
}
