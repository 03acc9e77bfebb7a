//! Recompute-on-write driver tying the solvers together.
//!
//! Every change to a [`LabelConfig`] goes through [`LabelEngine::apply`], which
//! returns a new configuration with the derived values (fitted font size, automatic
//! tape length) brought up to date. The input configuration is never mutated.

use tracing::{debug, instrument};

use crate::Result;
use crate::config::{LabelConfig, Margins, TapeWidth, clamp_manual_length};
use crate::constants::MAX_TAPE_LENGTH_MM;
use crate::error::LabelError;
use crate::fit::solve_font_size;
use crate::geometry::Rect;
use crate::icon::{IconConfig, generate_autofill_text};
use crate::layout::{LabelLayout, boxes, compose_layout};
use crate::length::{needs_length_update, solve_required_length_mm};
use crate::measure::TextMeasurer;
use crate::style::{LineStyle, clamp_font_size, font_family};

/// A single user edit to a label configuration
#[derive(Debug, Clone, PartialEq)]
pub enum LabelUpdate {
    Dpi(u32),
    TapeWidth(TapeWidth),
    /// Fix the tape length by hand, turning automatic length off
    TapeLength(f32),
    AutoLength(bool),
    Margins(Margins),
    Icon(IconConfig),
    Autofill(bool),
    Font(String),
    FitToLabel(bool),
    LineCount(usize),
    LineText { index: usize, text: String },
    Line { index: usize, line: LineStyle },
}

impl LabelUpdate {
    /// Name of the edited setting, for logs
    pub fn kind(&self) -> &'static str {
        match self {
            LabelUpdate::Dpi(_) => "dpi",
            LabelUpdate::TapeWidth(_) => "tape_width",
            LabelUpdate::TapeLength(_) => "tape_length",
            LabelUpdate::AutoLength(_) => "auto_length",
            LabelUpdate::Margins(_) => "margins",
            LabelUpdate::Icon(_) => "icon",
            LabelUpdate::Autofill(_) => "autofill",
            LabelUpdate::Font(_) => "font",
            LabelUpdate::FitToLabel(_) => "fit_to_label",
            LabelUpdate::LineCount(_) => "line_count",
            LabelUpdate::LineText { .. } => "line_text",
            LabelUpdate::Line { .. } => "line",
        }
    }
}

/// A configuration with everything derived from it
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLabel {
    pub config: LabelConfig,
    pub layout: LabelLayout,
}

/// Applies updates and recomputes derived values with an injected text measurer
pub struct LabelEngine {
    measurer: Box<dyn TextMeasurer>,
}

impl LabelEngine {
    pub fn new(measurer: impl TextMeasurer + 'static) -> Self {
        Self {
            measurer: Box::new(measurer),
        }
    }

    pub fn measurer(&self) -> &dyn TextMeasurer {
        self.measurer.as_ref()
    }

    /// Apply one update and return the recomputed configuration
    #[instrument(skip(self, config, update), fields(update = update.kind()))]
    pub fn apply(&self, config: &LabelConfig, update: LabelUpdate) -> Result<LabelConfig> {
        let mut next = config.clone();
        let mut force_length = false;

        match update {
            LabelUpdate::Dpi(dpi) => next.printer.dpi = dpi,
            LabelUpdate::TapeWidth(width) => {
                next.printer = next.printer.with_tape_width(width);
            }
            LabelUpdate::TapeLength(mm) => {
                next.printer.tape_length_mm = clamp_manual_length(mm);
                next.printer.auto_length = false;
            }
            LabelUpdate::AutoLength(auto) => {
                // Re-enabling always takes the solved length, whatever the hysteresis
                force_length = auto && !next.printer.auto_length;
                next.printer.auto_length = auto;
            }
            LabelUpdate::Margins(margins) => {
                next.printer = next.printer.with_margins(margins);
            }
            LabelUpdate::Icon(icon) => set_icon(&mut next, icon),
            LabelUpdate::Autofill(autofill) => {
                next.autofill = autofill;
                if autofill {
                    write_autofill(&mut next);
                }
            }
            LabelUpdate::Font(font) => {
                let family = font_family(&font).ok_or_else(|| {
                    LabelError::InvalidConfig(format!("unsupported font family '{font}'"))
                })?;
                next.text.font = family.to_string();
            }
            LabelUpdate::FitToLabel(fit) => next.text.fit_to_label = fit,
            LabelUpdate::LineCount(count) => next.text.set_line_count(count),
            LabelUpdate::LineText { index, text } => line_mut(&mut next, index)?.text = text,
            LabelUpdate::Line { index, mut line } => {
                line.font_size = clamp_font_size(line.font_size);
                *line_mut(&mut next, index)? = line;
            }
        }

        self.recompute_with(next, force_length)
    }

    /// Bring derived values up to date.
    ///
    /// Recomputing an already recomputed configuration returns it unchanged.
    pub fn recompute(&self, config: &LabelConfig) -> Result<LabelConfig> {
        self.recompute_with(config.clone(), false)
    }

    fn recompute_with(&self, mut config: LabelConfig, force_length: bool) -> Result<LabelConfig> {
        let measurer = self.measurer();

        if config.text.fit_to_label {
            let area = fit_area(&config);
            let size = solve_font_size(
                measurer,
                &config.text.lines,
                area.width,
                area.height,
                &config.text.font,
            )?;
            config.text.apply_uniform_font_size(size);
        }

        if config.printer.auto_length {
            let solved = solve_required_length_mm(
                measurer,
                &config.icon,
                &config.text,
                config.printer.tape_height_mm(),
                config.printer.dpi,
                &config.printer.margins,
            )?;
            if force_length || needs_length_update(config.printer.tape_length_mm, solved) {
                debug!(
                    "Tape length {} mm -> {} mm",
                    config.printer.tape_length_mm, solved
                );
                config.printer.tape_length_mm = solved;
            }
        }

        Ok(config)
    }

    /// Recompute and lay out a configuration
    pub fn resolve(&self, config: &LabelConfig) -> Result<ResolvedLabel> {
        let config = self.recompute(config)?;
        let layout = compose_layout(self.measurer(), &config)?;
        Ok(ResolvedLabel { config, layout })
    }
}

impl std::fmt::Debug for LabelEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelEngine").finish_non_exhaustive()
    }
}

/// Box the text is fitted into.
///
/// With automatic length the tape grows to the text, so only the longest tape
/// bounds the width; otherwise the configured length does.
fn fit_area(config: &LabelConfig) -> Rect {
    if config.printer.auto_length {
        let mut longest = config.clone();
        longest.printer.tape_length_mm = MAX_TAPE_LENGTH_MM;
        boxes(&longest).2
    } else {
        boxes(config).2
    }
}

fn line_mut(config: &mut LabelConfig, index: usize) -> Result<&mut LineStyle> {
    let count = config.text.lines.len();
    config.text.lines.get_mut(index).ok_or_else(|| {
        LabelError::InvalidConfig(format!("Line {index} out of range ({count} lines)"))
    })
}

fn set_icon(config: &mut LabelConfig, icon: IconConfig) {
    if !config.icon.same_variant(&icon) {
        if config.autofill {
            clear_autofill(config);
        }
        config.autofill = false;
    }
    config.icon = icon;
    if config.autofill {
        write_autofill(config);
    }
}

fn write_autofill(config: &mut LabelConfig) {
    let count = config.text.lines.len().max(2);
    config.text.set_line_count(count);
    let generated = generate_autofill_text(&config.icon);
    for (line, text) in config.text.lines.iter_mut().zip(generated) {
        line.text = text;
    }
}

/// Remove text that autofill wrote for the current icon
fn clear_autofill(config: &mut LabelConfig) {
    let generated = generate_autofill_text(&config.icon);
    for (line, text) in config.text.lines.iter_mut().zip(generated) {
        if line.text == text {
            line.text.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrinterConfig;
    use crate::icon::{MetricSize, NutIcon, ScrewIcon};
    use crate::measure::FixedRatioMeasurer;
    use crate::style::TextConfig;

    fn engine() -> LabelEngine {
        LabelEngine::new(FixedRatioMeasurer::default())
    }

    /// 12 mm tape at 180 dpi is 85 px high
    fn fitted_config() -> LabelConfig {
        LabelConfig::new()
            .with_printer(PrinterConfig::default().with_dpi(180))
            .with_icon(IconConfig::None)
            .with_text(
                TextConfig::new()
                    .add_line(LineStyle::new("M3×10"))
                    .with_fit_to_label(true),
            )
    }

    #[test]
    fn test_default_label_length() {
        // screw icons 6 mm, "Line 1" at 12 px is 36 px = 5 mm at 200 dpi, slack 2 mm
        let config = engine().recompute(&LabelConfig::default()).unwrap();
        assert_eq!(config.printer.tape_length_mm, 13.0);
    }

    #[test]
    fn test_fit_and_auto_length() {
        let config = engine().recompute(&fitted_config()).unwrap();
        assert_eq!(config.text.lines[0].font_size, 70);
        // 175 px at 180 dpi rounds up to 25 mm, plus slack
        assert_eq!(config.printer.tape_length_mm, 27.0);
    }

    #[test]
    fn test_fit_applies_to_every_line() {
        let engine = engine();
        let config = engine
            .apply(&fitted_config(), LabelUpdate::LineCount(3))
            .unwrap();
        let size = config.text.lines[0].font_size;
        assert!(config.text.lines.iter().all(|l| l.font_size == size));
        // three 1.2 * size lines must stay under 85 px
        assert!(3.0 * 1.2 * (size as f32) < 85.0);
    }

    #[test]
    fn test_fit_toggle_is_deterministic() {
        let engine = engine();
        let first = engine.recompute(&fitted_config()).unwrap();
        let off = engine.apply(&first, LabelUpdate::FitToLabel(false)).unwrap();
        let on = engine.apply(&off, LabelUpdate::FitToLabel(true)).unwrap();
        assert_eq!(first, on);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let engine = engine();
        for config in [LabelConfig::default(), fitted_config()] {
            let once = engine.recompute(&config).unwrap();
            let twice = engine.recompute(&once).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_auto_length_toggle_recomputes() {
        let engine = engine();
        let auto = engine.recompute(&fitted_config()).unwrap();

        let manual = engine.apply(&auto, LabelUpdate::AutoLength(false)).unwrap();
        let manual = engine.apply(&manual, LabelUpdate::TapeLength(27.5)).unwrap();
        assert!(!manual.printer.auto_length);
        assert_eq!(manual.printer.tape_length_mm, 27.5);

        let back = engine.apply(&manual, LabelUpdate::AutoLength(true)).unwrap();
        assert_eq!(back.printer.tape_length_mm, auto.printer.tape_length_mm);
        assert_eq!(back, auto);
    }

    #[test]
    fn test_small_length_changes_are_ignored() {
        let mut config = engine().recompute(&fitted_config()).unwrap();
        config.printer.tape_length_mm = 27.5;
        let config = engine().recompute(&config).unwrap();
        assert_eq!(config.printer.tape_length_mm, 27.5);
    }

    #[test]
    fn test_manual_length_is_kept() {
        let engine = engine();
        let config = engine
            .apply(&fitted_config(), LabelUpdate::TapeLength(9.0))
            .unwrap();
        assert_eq!(config.printer.tape_length_mm, 9.0);
    }

    #[test]
    fn test_autofill_follows_icon() {
        let engine = engine();
        let config = engine
            .apply(&LabelConfig::default(), LabelUpdate::Autofill(true))
            .unwrap();
        assert_eq!(config.text.lines.len(), 2);
        assert_eq!(config.text.lines[0].text, "M3×10");
        assert_eq!(config.text.lines[1].text, "Flat Phillips");

        let bigger = IconConfig::Screw(ScrewIcon {
            size: MetricSize::M4,
            length_mm: 16.0,
            ..Default::default()
        });
        let config = engine.apply(&config, LabelUpdate::Icon(bigger)).unwrap();
        assert_eq!(config.text.lines[0].text, "M4×16");
        assert!(config.autofill);
    }

    #[test]
    fn test_switching_icon_variant_resets_autofill() {
        let engine = engine();
        let config = engine
            .apply(&LabelConfig::default(), LabelUpdate::Autofill(true))
            .unwrap();
        let config = engine
            .apply(&config, LabelUpdate::LineText {
                index: 1,
                text: "keep me".to_string(),
            })
            .unwrap();

        let config = engine
            .apply(&config, LabelUpdate::Icon(IconConfig::Nut(NutIcon::default())))
            .unwrap();
        assert!(!config.autofill);
        assert_eq!(config.text.lines[0].text, "");
        assert_eq!(config.text.lines[1].text, "keep me");
    }

    #[test]
    fn test_line_updates() {
        let engine = engine();
        let config = engine
            .apply(&LabelConfig::default(), LabelUpdate::Line {
                index: 0,
                line: LineStyle::new("Torx").bold().with_font_size(20),
            })
            .unwrap();
        assert_eq!(config.text.lines[0].text, "Torx");
        assert!(config.text.lines[0].bold);

        let err = engine.apply(&config, LabelUpdate::LineText {
            index: 4,
            text: "x".to_string(),
        });
        assert!(matches!(err, Err(LabelError::InvalidConfig(_))));
    }

    #[test]
    fn test_font_update_uses_supported_families() {
        let engine = engine();
        let config = engine
            .apply(&LabelConfig::default(), LabelUpdate::Font("georgia".to_string()))
            .unwrap();
        assert_eq!(config.text.font, "Georgia");

        let err = engine.apply(&config, LabelUpdate::Font("Wingdings".to_string()));
        assert!(matches!(err, Err(LabelError::InvalidConfig(_))));
    }

    #[test]
    fn test_update_kind_omits_payload() {
        let icon = IconConfig::Custom(crate::icon::CustomIcon::from_bytes(vec![0u8; 64]));
        assert_eq!(LabelUpdate::Icon(icon).kind(), "icon");
        assert_eq!(
            LabelUpdate::LineText {
                index: 0,
                text: "M5".to_string()
            }
            .kind(),
            "line_text"
        );
    }

    #[test]
    fn test_apply_does_not_touch_input() {
        let original = LabelConfig::default();
        let snapshot = original.clone();
        engine()
            .apply(&original, LabelUpdate::Dpi(300))
            .unwrap();
        assert_eq!(original, snapshot);
    }

    #[test]
    fn test_resolve_lays_out_recomputed_config() {
        let resolved = engine().resolve(&fitted_config()).unwrap();
        assert_eq!(resolved.layout.pixel_height, 85);
        assert_eq!(resolved.layout.lines.len(), 1);
        assert_eq!(resolved.layout.lines[0].font_size, 70);
        assert_eq!(resolved.config.printer.tape_length_mm, 27.0);
    }
}
