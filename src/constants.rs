//! Constants for label geometry, text fitting and tape length solving

/// Inches per millimeter, as used for every mm to pixel conversion
pub const INCHES_PER_MM: f64 = 0.03937;

/// Millimeters per inch, used when converting measured pixels back to mm
pub const MM_PER_INCH: f64 = 25.4;

/// PDF points per inch
pub const POINTS_PER_INCH: f32 = 72.0;

/// Shortest tape a label can be printed on, in mm
pub const MIN_TAPE_LENGTH_MM: f32 = 8.0;

/// Longest tape a user may configure by hand, in mm
pub const MAX_TAPE_LENGTH_MM: f32 = 100.0;

/// Extra tape added after icon, text and margins when solving the length
pub const LENGTH_SLACK_MM: f32 = 2.0;

/// A solved length only replaces the stored one when it differs by more than this
pub const LENGTH_HYSTERESIS_MM: f32 = 1.0;

/// Lowest supported printer resolution
pub const MIN_DPI: u32 = 100;

/// Highest supported printer resolution
pub const MAX_DPI: u32 = 600;

/// Default printer resolution
pub const DEFAULT_DPI: u32 = 200;

/// Default tape length in mm
pub const DEFAULT_TAPE_LENGTH_MM: f32 = 36.0;

/// Smallest font size the fit solver will ever return
pub const MIN_FONT_SIZE: u32 = 6;

/// First candidate size tried by the fit solver
pub const FIT_SEARCH_START: u32 = 8;

/// Largest font size, both for the fit solver and for manual sizes
pub const MAX_FONT_SIZE: u32 = 120;

/// Font size of a freshly added line, and the fit result for an empty label
pub const DEFAULT_FONT_SIZE: u32 = 12;

/// Maximum number of text lines on a label
pub const MAX_LINES: usize = 5;

/// Glyphs measured to obtain a line height: an ascender, three descenders and a
/// dotted letter, so the pitch does not depend on the line's own text
pub const REFERENCE_GLYPHS: &str = "Ajgqi";

/// Default font family
pub const DEFAULT_FONT_FAMILY: &str = "Arial";

/// Font families offered for label text
pub const FONT_FAMILIES: [&str; 25] = [
    "Arial",
    "Arial Black",
    "Calibri",
    "Cambria",
    "Century Gothic",
    "Comic Sans MS",
    "Consolas",
    "Courier New",
    "Franklin Gothic Medium",
    "Futura",
    "Georgia",
    "Gill Sans",
    "Helvetica",
    "Impact",
    "Lucida Console",
    "Lucida Sans",
    "Palatino",
    "Roboto",
    "Segoe UI",
    "Tahoma",
    "Times New Roman",
    "Trebuchet MS",
    "Ubuntu",
    "Verdana",
    "Open Sans",
];

/// Default character width ratio for text estimation
/// (average character width as a fraction of font size)
pub const DEFAULT_CHAR_WIDTH_RATIO: f32 = 0.5;

/// Extra width of bold glyphs relative to regular ones, for estimation
pub const BOLD_WIDTH_RATIO: f32 = 1.1;

/// Default line height multiplier
pub const DEFAULT_LINE_HEIGHT_MULTIPLIER: f32 = 1.2;

/// Baseline position within a line box, as a fraction of the font size
pub const BASELINE_RATIO: f32 = 0.8;

/// Stroke width of underline and strikethrough, as a fraction of the font size
pub const DECORATION_WIDTH_RATIO: f32 = 0.05;

/// Icon caption size as a fraction of the icon slot height
pub const ICON_CAPTION_RATIO: f32 = 0.25;
