//! Floor plans: rooms, walls, and furniture symbols on a pixel canvas.
//!
//! Symbols follow the usual Japanese floor-plan conventions. Each furniture
//! symbol is drawn in its own native box and scaled to the item's size.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::svg::{self, Canvas, Escaped, Placement};

/// Pixels per metre when a plan does not say.
pub const DEFAULT_SCALE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

// =============================================================================
// ROOMS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoomKind {
    Living,
    Kitchen,
    Bedroom,
    Bathroom,
    Toilet,
    Entrance,
    Corridor,
    #[default]
    Other,
}

impl RoomKind {
    pub const ALL: [Self; 8] = [
        Self::Living,
        Self::Kitchen,
        Self::Bedroom,
        Self::Bathroom,
        Self::Toilet,
        Self::Entrance,
        Self::Corridor,
        Self::Other,
    ];

    #[must_use]
    pub fn fill(self) -> &'static str {
        match self {
            Self::Living => "#fff7ed",
            Self::Kitchen => "#ecfdf5",
            Self::Bedroom => "#fefce8",
            Self::Bathroom => "#ecfeff",
            Self::Toilet => "#fdf4ff",
            Self::Entrance => "#fafaf9",
            Self::Corridor => "#f3f4f6",
            Self::Other => "#ffffff",
        }
    }

    /// Default display name for a new room of this kind.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Living => "リビング",
            Self::Kitchen => "台所",
            Self::Bedroom => "寝室/和室",
            Self::Bathroom => "浴室",
            Self::Toilet => "トイレ",
            Self::Entrance => "玄関",
            Self::Corridor => "廊下",
            Self::Other => "その他",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: RoomKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
}

impl Room {
    /// A new unrotated room named after its kind.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: RoomKind, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { id: id.into(), name: kind.label().to_owned(), kind, x, y, width, height, rotation: 0.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub id: String,
    pub start: Point,
    pub end: Point,
    pub thickness: f64,
}

// =============================================================================
// FURNITURE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FurnitureKind {
    Bed,
    Wheelchair,
    Table,
    Toilet,
    Bath,
    Door,
    Window,
    Stairs,
    Handrail,
}

impl FurnitureKind {
    pub const ALL: [Self; 9] = [
        Self::Bed,
        Self::Wheelchair,
        Self::Table,
        Self::Toilet,
        Self::Bath,
        Self::Door,
        Self::Window,
        Self::Stairs,
        Self::Handrail,
    ];

    /// Width and height of the symbol as drawn by [`Self::symbol`].
    #[must_use]
    pub fn native_size(self) -> (f64, f64) {
        match self {
            Self::Bed => (40.0, 70.0),
            Self::Wheelchair | Self::Toilet | Self::Door => (30.0, 30.0),
            Self::Table => (60.0, 40.0),
            Self::Bath => (60.0, 50.0),
            Self::Window => (40.0, 6.0),
            Self::Stairs => (30.0, 60.0),
            Self::Handrail => (40.0, 8.0),
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Bed => "ベッド",
            Self::Wheelchair => "車椅子",
            Self::Table => "机",
            Self::Toilet => "トイレ",
            Self::Bath => "浴室",
            Self::Door => "扉",
            Self::Window => "窓",
            Self::Stairs => "階段",
            Self::Handrail => "手すり",
        }
    }

    /// SVG fragment for the symbol in its native box, origin top-left.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Bed => concat!(
                r##"<rect width="40" height="70" rx="2" fill="white" stroke="#333"/>"##,
                r##"<rect x="5" y="5" width="30" height="15" rx="2" fill="white" stroke="#333"/>"##,
                r##"<line x1="0" y1="25" x2="40" y2="25" stroke="#333" stroke-width="0.5"/>"##,
                r##"<text x="5" y="63" font-size="8" fill="#555">ベッド</text>"##,
            ),
            Self::Wheelchair => concat!(
                r##"<circle cx="15" cy="15" r="13" fill="white" stroke="#333"/>"##,
                r##"<text x="15" y="21" font-size="16" text-anchor="middle">♿</text>"##,
            ),
            Self::Table => concat!(
                r##"<rect width="60" height="40" rx="2" fill="#fefce8" stroke="#d97706"/>"##,
                r##"<text x="20" y="25" font-size="10" fill="#92400e">食卓</text>"##,
            ),
            Self::Toilet => concat!(
                r##"<rect x="2" y="2" width="26" height="8" fill="white" stroke="#333"/>"##,
                r##"<path d="M 5 12 L 5 20 Q 5 28 15 28 Q 25 28 25 20 L 25 12 Z" fill="white" stroke="#333"/>"##,
                r##"<circle cx="15" cy="18" r="3" fill="none" stroke="#333" stroke-width="0.5"/>"##,
            ),
            Self::Bath => concat!(
                r##"<rect width="60" height="50" rx="2" fill="#ecfeff" stroke="#333"/>"##,
                r##"<path d="M 5 5 L 5 45 L 50 45 Q 55 45 55 40 L 55 10 Q 55 5 50 5 Z" fill="white" stroke="#333"/>"##,
                r##"<circle cx="50" cy="10" r="2" fill="#333"/>"##,
            ),
            Self::Door => concat!(
                r##"<path d="M 0 0 L 0 30 A 30 30 0 0 1 30 0 Z" fill="rgba(0,0,0,0.05)" stroke="#333"/>"##,
                r##"<text x="2" y="23" font-size="8" opacity="0.5">扉</text>"##,
            ),
            Self::Window => concat!(
                r##"<rect width="40" height="6" fill="white" stroke="#94a3b8"/>"##,
                r##"<line x1="0" y1="3" x2="40" y2="3" stroke="#94a3b8"/>"##,
            ),
            Self::Stairs => concat!(
                r##"<rect width="30" height="60" fill="white" stroke="#333"/>"##,
                r##"<path d="M 0 10 H 30 M 0 20 H 30 M 0 30 H 30 M 0 40 H 30 M 0 50 H 30" stroke="#333"/>"##,
                r##"<path d="M 15 5 V 55 M 12 52 L 15 55 L 18 52" fill="none" stroke="#333"/>"##,
            ),
            Self::Handrail => concat!(
                r##"<rect width="40" height="8" rx="4" fill="#fca5a5" opacity="0.5"/>"##,
                r##"<line x1="2" y1="4" x2="38" y2="4" stroke="#ef4444" stroke-width="2" stroke-linecap="round"/>"##,
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Furniture {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FurnitureKind,
    pub x: f64,
    pub y: f64,
    /// Zero means "native symbol width".
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Furniture {
    /// Scale factors mapping the native symbol box onto the item's size.
    #[must_use]
    pub fn scale(&self) -> (f64, f64) {
        let (native_w, native_h) = self.kind.native_size();
        let factor = |size: f64, native: f64| if size > 0.0 { size / native } else { 1.0 };
        (factor(self.width, native_w), factor(self.height, native_h))
    }
}

// =============================================================================
// PLAN
// =============================================================================

/// A whole floor plan as stored in the `floor-plans` namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorPlan {
    pub rooms: Vec<Room>,
    pub walls: Vec<Wall>,
    pub furniture: Vec<Furniture>,
    /// Pixels per metre.
    pub scale: f64,
}

impl Default for FloorPlan {
    fn default() -> Self {
        Self { rooms: Vec::new(), walls: Vec::new(), furniture: Vec::new(), scale: DEFAULT_SCALE }
    }
}

impl FloorPlan {
    /// Render the plan as a standalone SVG document.
    #[must_use]
    pub fn to_svg(&self, canvas: Canvas) -> String {
        FloorPlanSvg { plan: self, canvas }.to_string()
    }
}

struct FloorPlanSvg<'a> {
    plan: &'a FloorPlan,
    canvas: Canvas,
}

impl fmt::Display for FloorPlanSvg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        svg::document(f, self.canvas, |f| {
            for room in &self.plan.rooms {
                write_room(f, room, self.plan.scale)?;
            }
            for wall in &self.plan.walls {
                writeln!(
                    f,
                    r##"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#334155" stroke-width="{:.1}" stroke-linecap="square"/>"##,
                    wall.start.x, wall.start.y, wall.end.x, wall.end.y, wall.thickness
                )?;
            }
            for item in &self.plan.furniture {
                write_furniture(f, item)?;
            }
            Ok(())
        })
    }
}

fn write_room(f: &mut fmt::Formatter<'_>, room: &Room, scale: f64) -> fmt::Result {
    let placement = Placement { x: room.x, y: room.y, rotation: room.rotation };
    writeln!(f, r#"<g id="{}" transform="{placement}">"#, Escaped(&room.id))?;
    writeln!(
        f,
        r##"<rect width="{:.1}" height="{:.1}" fill="{}" stroke="#94a3b8"/>"##,
        room.width,
        room.height,
        room.kind.fill()
    )?;
    writeln!(f, r##"<text x="5" y="19" font-size="14" font-weight="bold" fill="#64748b">{}</text>"##, Escaped(&room.name))?;
    if scale > 0.0 {
        writeln!(
            f,
            r##"<text x="5" y="35" font-size="10" fill="#94a3b8">{:.1}m x {:.1}m</text>"##,
            room.width / scale,
            room.height / scale
        )?;
    }
    writeln!(f, "</g>")
}

fn write_furniture(f: &mut fmt::Formatter<'_>, item: &Furniture) -> fmt::Result {
    let placement = Placement { x: item.x, y: item.y, rotation: item.rotation };
    let (sx, sy) = item.scale();
    let (_, native_h) = item.kind.native_size();
    writeln!(f, r#"<g id="{}" transform="{placement}">"#, Escaped(&item.id))?;
    writeln!(f, r#"<g transform="scale({sx:.3} {sy:.3})">{}</g>"#, item.kind.symbol())?;
    if let Some(label) = item.label.as_deref().filter(|l| !l.is_empty()) {
        writeln!(f, r##"<text x="0" y="{:.1}" font-size="10" fill="#333">{}</text>"##, native_h * sy + 12.0, Escaped(label))?;
    }
    writeln!(f, "</g>")
}

#[cfg(test)]
#[path = "floor_plan_test.rs"]
mod tests;
