//! Icon selection: fastener icons built from their attributes, or a custom image

use std::fmt;
use std::sync::Arc;

/// Metric thread size shared by screws, nuts and washers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MetricSize {
    M2,
    #[default]
    M3,
    M4,
    M5,
    M6,
    M7,
    M8,
    M10,
    M12,
    M14,
    M16,
    M18,
    M20,
}

impl MetricSize {
    pub const ALL: [MetricSize; 13] = [
        MetricSize::M2,
        MetricSize::M3,
        MetricSize::M4,
        MetricSize::M5,
        MetricSize::M6,
        MetricSize::M7,
        MetricSize::M8,
        MetricSize::M10,
        MetricSize::M12,
        MetricSize::M14,
        MetricSize::M16,
        MetricSize::M18,
        MetricSize::M20,
    ];

    /// Nominal thread diameter in mm
    pub fn diameter_mm(self) -> u32 {
        match self {
            MetricSize::M2 => 2,
            MetricSize::M3 => 3,
            MetricSize::M4 => 4,
            MetricSize::M5 => 5,
            MetricSize::M6 => 6,
            MetricSize::M7 => 7,
            MetricSize::M8 => 8,
            MetricSize::M10 => 10,
            MetricSize::M12 => 12,
            MetricSize::M14 => 14,
            MetricSize::M16 => 16,
            MetricSize::M18 => 18,
            MetricSize::M20 => 20,
        }
    }
}

impl fmt::Display for MetricSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{}", self.diameter_mm())
    }
}

/// Screw head shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HeadType {
    #[default]
    Flat,
    Hex,
    Pan,
    Round,
}

impl HeadType {
    pub const ALL: [HeadType; 4] = [HeadType::Flat, HeadType::Hex, HeadType::Pan, HeadType::Round];

    pub fn name(self) -> &'static str {
        match self {
            HeadType::Flat => "Flat",
            HeadType::Hex => "Hex",
            HeadType::Pan => "Pan",
            HeadType::Round => "Round",
        }
    }
}

/// Screw drive recess
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DriveType {
    Hex,
    #[default]
    Phillips,
    Slotted,
    Square,
    Torx,
}

impl DriveType {
    pub const ALL: [DriveType; 5] = [
        DriveType::Hex,
        DriveType::Phillips,
        DriveType::Slotted,
        DriveType::Square,
        DriveType::Torx,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DriveType::Hex => "Hex",
            DriveType::Phillips => "Phillips",
            DriveType::Slotted => "Slotted",
            DriveType::Square => "Square",
            DriveType::Torx => "Torx",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NutType {
    #[default]
    Standard,
    Lock,
    Cap,
}

impl NutType {
    pub const ALL: [NutType; 3] = [NutType::Standard, NutType::Lock, NutType::Cap];

    pub fn name(self) -> &'static str {
        match self {
            NutType::Standard => "Standard",
            NutType::Lock => "Lock",
            NutType::Cap => "Cap",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WasherType {
    #[default]
    Flat,
    Fender,
    Split,
    StarExterior,
    StarInterior,
}

impl WasherType {
    pub const ALL: [WasherType; 5] = [
        WasherType::Flat,
        WasherType::Fender,
        WasherType::Split,
        WasherType::StarExterior,
        WasherType::StarInterior,
    ];

    pub fn name(self) -> &'static str {
        match self {
            WasherType::Flat => "Flat",
            WasherType::Fender => "Fender",
            WasherType::Split => "Split",
            WasherType::StarExterior => "Star Exterior",
            WasherType::StarInterior => "Star Interior",
        }
    }
}

macro_rules! display_by_name {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        })*
    };
}

display_by_name!(HeadType, DriveType, NutType, WasherType);

#[derive(Debug, Clone, PartialEq)]
pub struct ScrewIcon {
    pub size: MetricSize,
    pub head: HeadType,
    pub drive: DriveType,
    pub length_mm: f32,
    pub show_head_icon: bool,
    pub show_drive_icon: bool,
}

impl Default for ScrewIcon {
    fn default() -> Self {
        Self {
            size: MetricSize::M3,
            head: HeadType::Flat,
            drive: DriveType::Phillips,
            length_mm: 10.0,
            show_head_icon: true,
            show_drive_icon: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NutIcon {
    pub size: MetricSize,
    pub nut_type: NutType,
    pub show_icon: bool,
}

impl Default for NutIcon {
    fn default() -> Self {
        Self {
            size: MetricSize::default(),
            nut_type: NutType::default(),
            show_icon: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WasherIcon {
    pub size: MetricSize,
    pub washer_type: WasherType,
    pub show_icon: bool,
}

impl Default for WasherIcon {
    fn default() -> Self {
        Self {
            size: MetricSize::default(),
            washer_type: WasherType::default(),
            show_icon: true,
        }
    }
}

/// User-supplied icon image (PNG or JPEG bytes)
#[derive(Debug, Clone, PartialEq)]
pub struct CustomIcon {
    pub image: Option<Arc<[u8]>>,
    pub show_icon: bool,
}

impl Default for CustomIcon {
    fn default() -> Self {
        Self {
            image: None,
            show_icon: true,
        }
    }
}

impl CustomIcon {
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            image: Some(bytes.into()),
            show_icon: true,
        }
    }
}

/// The icon printed at the start of the label
#[derive(Debug, Clone, PartialEq)]
pub enum IconConfig {
    None,
    Screw(ScrewIcon),
    Nut(NutIcon),
    Washer(WasherIcon),
    Custom(CustomIcon),
}

impl Default for IconConfig {
    fn default() -> Self {
        IconConfig::Screw(ScrewIcon::default())
    }
}

/// One drawable piece of an icon
#[derive(Debug, Clone, PartialEq)]
pub enum IconSlot {
    Head(HeadType),
    Drive(DriveType),
    Nut(NutType),
    Washer(WasherType),
    Custom(Option<Arc<[u8]>>),
}

impl IconSlot {
    /// Short caption naming the slot
    pub fn caption(&self) -> String {
        match self {
            IconSlot::Head(head) => head.to_string(),
            IconSlot::Drive(drive) => drive.to_string(),
            IconSlot::Nut(nut) => nut.to_string(),
            IconSlot::Washer(washer) => washer.to_string(),
            IconSlot::Custom(_) => String::new(),
        }
    }
}

impl IconConfig {
    /// Whether `other` is the same kind of icon, regardless of its attributes
    pub fn same_variant(&self, other: &IconConfig) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Both screw sub-icons are shown side by side
    pub fn is_split(&self) -> bool {
        matches!(
            self,
            IconConfig::Screw(ScrewIcon {
                show_head_icon: true,
                show_drive_icon: true,
                ..
            })
        )
    }

    /// The pieces that are actually drawn, in order
    pub fn visible_slots(&self) -> Vec<IconSlot> {
        match self {
            IconConfig::None => Vec::new(),
            IconConfig::Screw(screw) => {
                let mut slots = Vec::with_capacity(2);
                if screw.show_head_icon {
                    slots.push(IconSlot::Head(screw.head));
                }
                if screw.show_drive_icon {
                    slots.push(IconSlot::Drive(screw.drive));
                }
                slots
            }
            IconConfig::Nut(nut) if nut.show_icon => vec![IconSlot::Nut(nut.nut_type)],
            IconConfig::Washer(washer) if washer.show_icon => {
                vec![IconSlot::Washer(washer.washer_type)]
            }
            IconConfig::Custom(custom) if custom.show_icon => {
                vec![IconSlot::Custom(custom.image.clone())]
            }
            IconConfig::Nut(_) | IconConfig::Washer(_) | IconConfig::Custom(_) => Vec::new(),
        }
    }

    /// Whether any part of the icon takes up space on the label
    pub fn is_visible(&self) -> bool {
        match self {
            IconConfig::None => false,
            IconConfig::Screw(screw) => screw.show_head_icon || screw.show_drive_icon,
            IconConfig::Nut(nut) => nut.show_icon,
            IconConfig::Washer(washer) => washer.show_icon,
            IconConfig::Custom(custom) => custom.show_icon,
        }
    }
}

/// Text for the first two lines derived from the icon's attributes
pub fn generate_autofill_text(icon: &IconConfig) -> [String; 2] {
    match icon {
        IconConfig::Screw(screw) => [
            format!("{}×{}", screw.size, screw.length_mm),
            format!("{} {}", screw.head, screw.drive),
        ],
        IconConfig::Nut(nut) => [nut.size.to_string(), nut.nut_type.to_string()],
        IconConfig::Washer(washer) => [washer.size.to_string(), washer.washer_type.to_string()],
        IconConfig::None | IconConfig::Custom(_) => [String::new(), String::new()],
    }
}
