//! Screw label example: autofilled text fitted to a 12 mm tape, exported as PDF
//!
//! Set `LABEL_FONT` to a TTF file to measure with real font metrics.

use label_layout::{
    FaceStyle, FixedRatioMeasurer, LabelConfig, LabelEngine, LabelUpdate, PrinterConfig,
    TapeWidth, TtfTextMeasurer, export_pdf,
};
use tracing_subscriber::EnvFilter;

fn engine() -> Result<LabelEngine, Box<dyn std::error::Error>> {
    match std::env::var("LABEL_FONT") {
        Ok(path) => {
            let measurer =
                TtfTextMeasurer::new().with_face("Arial", FaceStyle::Regular, std::fs::read(path)?)?;
            Ok(LabelEngine::new(measurer))
        }
        Err(_) => Ok(LabelEngine::new(FixedRatioMeasurer::default())),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging with debug level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()))
        .init();

    let engine = engine()?;

    let config = LabelConfig::new().with_printer(
        PrinterConfig::default()
            .with_dpi(180)
            .with_tape_width(TapeWidth::Mm12),
    );
    let config = engine.apply(&config, LabelUpdate::Autofill(true))?;
    let config = engine.apply(&config, LabelUpdate::FitToLabel(true))?;

    let label = engine.resolve(&config)?;
    println!(
        "Tape {} mm, {}x{} px, font size {}",
        label.config.printer.tape_length_mm,
        label.layout.pixel_width,
        label.layout.pixel_height,
        label.config.text.lines[0].font_size
    );
    if let Some(overflow) = label.layout.overflow {
        println!("Content overflows by {:?}", overflow);
    }

    let mut doc = export_pdf(&label)?;
    doc.save("screw_label.pdf")?;
    println!("PDF saved as 'screw_label.pdf'");

    Ok(())
}
