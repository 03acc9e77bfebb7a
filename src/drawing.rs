//! PDF drawing operations for labels.
//!
//! A label is exported as one page covering exactly the printable area of the tape:
//! the margins are excluded, and one printer pixel maps to `72 / dpi` points.

use lopdf::{
    Dictionary, Document, Object, ObjectId, Stream, StringFormat,
    content::{Content, Operation},
    dictionary,
};
use tracing::{debug, trace};

use crate::Result;
use crate::constants::*;
use crate::error::LabelError;
use crate::geometry::{Rect, pixels_to_points};
use crate::icon::IconSlot;
use crate::layout::{LabelLayout, LineLayout};

/// Families drawn with a serif base-14 face
const SERIF_FAMILIES: [&str; 4] = ["Cambria", "Georgia", "Palatino", "Times New Roman"];

/// Families drawn with a monospaced base-14 face
const MONO_FAMILIES: [&str; 3] = ["Consolas", "Courier New", "Lucida Console"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FontClass {
    Sans,
    Serif,
    Mono,
}

/// One of the twelve base-14 text faces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdfFace {
    class: FontClass,
    bold: bool,
    italic: bool,
}

impl PdfFace {
    /// Closest base-14 face for a font family and style
    pub fn for_family(family: &str, bold: bool, italic: bool) -> Self {
        let class = if SERIF_FAMILIES.iter().any(|f| f.eq_ignore_ascii_case(family)) {
            FontClass::Serif
        } else if MONO_FAMILIES.iter().any(|f| f.eq_ignore_ascii_case(family)) {
            FontClass::Mono
        } else {
            FontClass::Sans
        };
        Self {
            class,
            bold,
            italic,
        }
    }

    fn all() -> impl Iterator<Item = PdfFace> {
        [FontClass::Sans, FontClass::Serif, FontClass::Mono]
            .into_iter()
            .flat_map(|class| {
                [(false, false), (true, false), (false, true), (true, true)]
                    .into_iter()
                    .map(move |(bold, italic)| PdfFace {
                        class,
                        bold,
                        italic,
                    })
            })
    }

    pub fn base_font(&self) -> &'static str {
        match (self.class, self.bold, self.italic) {
            (FontClass::Sans, false, false) => "Helvetica",
            (FontClass::Sans, true, false) => "Helvetica-Bold",
            (FontClass::Sans, false, true) => "Helvetica-Oblique",
            (FontClass::Sans, true, true) => "Helvetica-BoldOblique",
            (FontClass::Serif, false, false) => "Times-Roman",
            (FontClass::Serif, true, false) => "Times-Bold",
            (FontClass::Serif, false, true) => "Times-Italic",
            (FontClass::Serif, true, true) => "Times-BoldItalic",
            (FontClass::Mono, false, false) => "Courier",
            (FontClass::Mono, true, false) => "Courier-Bold",
            (FontClass::Mono, false, true) => "Courier-Oblique",
            (FontClass::Mono, true, true) => "Courier-BoldOblique",
        }
    }

    /// Name of the face in the page's font resources
    pub fn resource_name(&self) -> String {
        format!("L{}", self.base_font().replace('-', ""))
    }
}

/// Maps label pixels onto the PDF page
#[derive(Debug, Clone, Copy)]
struct PageMapping {
    origin_x: f32,
    origin_y: f32,
    height_pt: f32,
    dpi: u32,
}

impl PageMapping {
    fn new(layout: &LabelLayout) -> Self {
        let (_, height_px) = layout.printable_size();
        Self {
            origin_x: layout.safe_area.left as f32,
            origin_y: layout.safe_area.top as f32,
            height_pt: pixels_to_points(height_px as f32, layout.dpi),
            dpi: layout.dpi,
        }
    }

    fn len(&self, px: f32) -> f32 {
        pixels_to_points(px, self.dpi)
    }

    fn x(&self, px: f32) -> f32 {
        self.len(px - self.origin_x)
    }

    /// PDF y grows upward from the bottom of the page
    fn y(&self, px: f32) -> f32 {
        self.height_pt - self.len(px - self.origin_y)
    }
}

/// Page size in points for a label
pub fn page_size(layout: &LabelLayout) -> (f32, f32) {
    let (width, height) = layout.printable_size();
    (
        pixels_to_points(width as f32, layout.dpi),
        pixels_to_points(height as f32, layout.dpi),
    )
}

/// Encode text for a WinAnsi base-14 font; characters outside Latin-1 become '?'
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| u8::try_from(u32::from(ch)).unwrap_or(b'?'))
        .collect()
}

fn set_black() -> Vec<Operation> {
    vec![
        Operation::new("rg", vec![0.into(), 0.into(), 0.into()]),
        Operation::new("RG", vec![0.into(), 0.into(), 0.into()]),
    ]
}

fn stroke_line(start: (f32, f32), end: (f32, f32), width: f32) -> Vec<Operation> {
    vec![
        Operation::new("w", vec![width.into()]),
        Operation::new("m", vec![start.0.into(), start.1.into()]),
        Operation::new("l", vec![end.0.into(), end.1.into()]),
        Operation::new("S", vec![]),
    ]
}

fn text_operations(face: PdfFace, size_pt: f32, x: f32, y: f32, text: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![
                Object::Name(face.resource_name().into_bytes()),
                size_pt.into(),
            ],
        ),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
        ),
        Operation::new("ET", vec![]),
    ]
}

/// Draw one text line with its decorations
fn draw_line_operations(line: &LineLayout, family: &str, mapping: &PageMapping) -> Vec<Operation> {
    let mut operations = Vec::new();
    let face = PdfFace::for_family(family, line.bold, line.italic);
    let size = line.font_size as f32;
    let baseline = line.bounds.y + line.bounds.height * BASELINE_RATIO;

    operations.extend(text_operations(
        face,
        mapping.len(size),
        mapping.x(line.bounds.x),
        mapping.y(baseline),
        &line.text,
    ));

    let decoration_width = mapping.len(size * DECORATION_WIDTH_RATIO);
    let mut decorate = |y_px: f32| {
        operations.extend(stroke_line(
            (mapping.x(line.bounds.x), mapping.y(y_px)),
            (mapping.x(line.bounds.right()), mapping.y(y_px)),
            decoration_width,
        ));
    };
    if line.underline {
        decorate(baseline + size * 0.1);
    }
    if line.strikethrough {
        decorate(baseline - size * 0.3);
    }

    operations
}

/// Outline a fastener icon slot and caption it with its name
fn draw_icon_slot_operations(slot: &IconSlot, rect: Rect, mapping: &PageMapping) -> Vec<Operation> {
    let mut operations = Vec::new();
    let width = mapping.len(rect.width);
    let height = mapping.len(rect.height);
    if width <= 0.0 || height <= 0.0 {
        return operations;
    }

    operations.push(Operation::new("w", vec![(height * 0.02).into()]));
    operations.push(Operation::new(
        "re",
        vec![
            mapping.x(rect.x).into(),
            mapping.y(rect.bottom()).into(),
            width.into(),
            height.into(),
        ],
    ));
    operations.push(Operation::new("S", vec![]));

    let caption = slot.caption();
    if caption.is_empty() {
        return operations;
    }
    // Estimated Helvetica width keeps the caption inside the slot
    let chars = caption.chars().count() as f32;
    let size = (height * ICON_CAPTION_RATIO).min(width * 0.9 / (chars * DEFAULT_CHAR_WIDTH_RATIO));
    let text_width = chars * size * DEFAULT_CHAR_WIDTH_RATIO;
    let x = mapping.x(rect.x) + (width - text_width) / 2.0;
    let y = mapping.y(rect.bottom()) + (height - size) / 2.0;
    operations.extend(text_operations(
        PdfFace::for_family("Helvetica", false, false),
        size,
        x,
        y,
        &caption,
    ));
    operations
}

/// Generate the page content for a label.
///
/// Everything is clipped to the printable area. Placeholder lines and custom images
/// are not part of the content stream; images are embedded separately.
pub fn generate_label_operations(layout: &LabelLayout, family: &str) -> Vec<Operation> {
    let mapping = PageMapping::new(layout);
    let (width, height) = page_size(layout);
    let mut operations = vec![
        Operation::new("q", vec![]),
        Operation::new(
            "re",
            vec![0.into(), 0.into(), width.into(), height.into()],
        ),
        Operation::new("W", vec![]),
        Operation::new("n", vec![]),
    ];
    operations.extend(set_black());

    for (slot, rect) in &layout.icon_slots {
        if !matches!(slot, IconSlot::Custom(_)) {
            operations.extend(draw_icon_slot_operations(slot, *rect, &mapping));
        }
    }

    for line in layout.lines.iter().filter(|line| !line.placeholder) {
        trace!("Drawing line '{}'", line.text);
        operations.extend(draw_line_operations(line, family, &mapping));
    }

    operations.push(Operation::new("Q", vec![]));
    debug!("Generated {} operations", operations.len());
    operations
}

/// Font resource dictionary with every base-14 text face, added to `doc`
pub fn add_font_resources(doc: &mut Document) -> Dictionary {
    let mut fonts = Dictionary::new();
    for face in PdfFace::all() {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => face.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(face.resource_name(), font_id);
    }
    fonts
}

fn merge_fonts(resources: &mut Dictionary, fonts: &Dictionary) {
    match resources.get_mut(b"Font") {
        Ok(Object::Dictionary(existing)) => {
            for (name, font) in fonts.iter() {
                existing.set(name.clone(), font.clone());
            }
        }
        _ => resources.set("Font", fonts.clone()),
    }
}

/// Make the label fonts available on a page
pub fn attach_font_resources(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let fonts = add_font_resources(doc);
    let resources_ref = match doc.get_object(page_id)?.as_dict()?.get(b"Resources") {
        Ok(Object::Reference(id)) => Some(*id),
        _ => None,
    };

    if let Some(resources_id) = resources_ref {
        merge_fonts(doc.get_object_mut(resources_id)?.as_dict_mut()?, &fonts);
        return Ok(());
    }

    let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
    match page.get_mut(b"Resources") {
        Ok(Object::Dictionary(resources)) => merge_fonts(resources, &fonts),
        _ => page.set("Resources", dictionary! { "Font" => fonts }),
    }
    Ok(())
}

/// Fit an image's pixel size inside a box, keeping its aspect ratio
fn contain(image: &Stream, width: f32, height: f32) -> (f32, f32) {
    let dimension = |key: &[u8]| {
        image
            .dict
            .get(key)
            .and_then(Object::as_i64)
            .ok()
            .filter(|v| *v > 0)
            .map(|v| v as f32)
    };
    match (dimension(b"Width"), dimension(b"Height")) {
        (Some(image_width), Some(image_height)) => {
            let scale = (width / image_width).min(height / image_height);
            (image_width * scale, image_height * scale)
        }
        _ => (width, height),
    }
}

/// Embed custom icon images into a page
pub fn embed_custom_icons(doc: &mut Document, page_id: ObjectId, layout: &LabelLayout) -> Result<()> {
    let mapping = PageMapping::new(layout);
    for (slot, rect) in &layout.icon_slots {
        let IconSlot::Custom(Some(bytes)) = slot else {
            continue;
        };
        let image = lopdf::xobject::image_from(bytes.to_vec())
            .map_err(|e| LabelError::ImageError(e.to_string()))?;

        let (width, height) = contain(&image, mapping.len(rect.width), mapping.len(rect.height));
        let x = mapping.x(rect.x) + (mapping.len(rect.width) - width) / 2.0;
        let y = mapping.y(rect.bottom()) + (mapping.len(rect.height) - height) / 2.0;
        debug!("Embedding custom icon {}x{} pt at ({}, {})", width, height, x, y);
        doc.insert_image(page_id, image, (x, y), (width, height))?;
    }
    Ok(())
}

/// Draw a label onto an existing page, which should be sized with [`page_size`]
pub fn draw_label_on_page(
    doc: &mut Document,
    page_id: ObjectId,
    layout: &LabelLayout,
    family: &str,
) -> Result<()> {
    attach_font_resources(doc, page_id)?;
    let content = Content {
        operations: generate_label_operations(layout, family),
    };
    doc.add_page_contents(page_id, content.encode()?)?;
    embed_custom_icons(doc, page_id, layout)
}

/// Create a single-page document sized to the label's printable area.
///
/// Returns the document and the id of its page, which is still empty.
pub fn new_label_document(layout: &LabelLayout) -> (Document, ObjectId) {
    let (width, height) = page_size(layout);
    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
        "Resources" => dictionary! {},
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    (doc, page_id)
}
