//! A layout engine for tape label printers
//!
//! This library turns a label description (printer DPI, tape size and margins, an
//! icon and a few lines of styled text) into exact pixel geometry. It can fit the
//! text to the tape, work out the shortest tape that holds the content, and export
//! the result as a PDF page sized to the physical printable area.

use lopdf::{Document, ObjectId, content::Operation};
use tracing::{debug, instrument};

pub mod config;
pub mod constants;
pub mod drawing;
pub mod engine;
pub mod error;
pub mod fit;
pub mod geometry;
pub mod icon;
pub mod layout;
pub mod length;
pub mod measure;
pub mod style;

pub use config::{LabelConfig, Margins, PrinterConfig, TapeWidth};
pub use engine::{LabelEngine, LabelUpdate, ResolvedLabel};
pub use error::{LabelError, Result};
pub use fit::solve_font_size;
pub use geometry::{PixelDimensions, Rect, SafeArea, to_pixels};
pub use icon::{
    CustomIcon, DriveType, HeadType, IconConfig, MetricSize, NutIcon, NutType, ScrewIcon,
    WasherIcon, WasherType,
};
pub use layout::{LabelLayout, LineLayout, Overflow, compose_layout};
pub use length::solve_required_length_mm;
#[cfg(feature = "ttf-parser")]
pub use measure::{FaceStyle, TtfTextMeasurer};
pub use measure::{FixedRatioMeasurer, FontSpec, TextExtent, TextMeasurer};
pub use style::{LineStyle, TextAlign, TextConfig};

/// Extension trait for lopdf::Document to add label drawing capabilities
pub trait LabelDrawing {
    /// Draw a resolved label onto a page
    ///
    /// # Arguments
    /// * `page_id` - The object ID of the page to draw on
    /// * `label` - The label to draw
    ///
    /// The page should be sized with [`drawing::page_size`]; content outside it is clipped.
    fn draw_label(&mut self, page_id: ObjectId, label: &ResolvedLabel) -> Result<()>;

    /// Create label content operations without adding to document
    ///
    /// Custom icon images are not included, they are embedded by `draw_label`
    fn create_label_content(&self, label: &ResolvedLabel) -> Vec<Operation>;
}

impl LabelDrawing for Document {
    #[instrument(skip(self, label), fields(lines = label.layout.lines.len()))]
    fn draw_label(&mut self, page_id: ObjectId, label: &ResolvedLabel) -> Result<()> {
        debug!(
            "Drawing {}x{} px label on page {:?}",
            label.layout.pixel_width, label.layout.pixel_height, page_id
        );
        drawing::draw_label_on_page(self, page_id, &label.layout, &label.config.text.font)
    }

    fn create_label_content(&self, label: &ResolvedLabel) -> Vec<Operation> {
        drawing::generate_label_operations(&label.layout, &label.config.text.font)
    }
}

/// Export a resolved label as a single-page PDF sized to its printable area
pub fn export_pdf(label: &ResolvedLabel) -> Result<Document> {
    let (mut doc, page_id) = drawing::new_label_document(&label.layout);
    doc.draw_label(page_id, label)?;
    Ok(doc)
}
