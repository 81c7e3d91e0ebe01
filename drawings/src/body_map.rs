//! Body maps: condition markers placed on a front/back body outline.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::svg::{self, Canvas, Escaped, Placement};

/// Radius of a point marker.
const MARKER_RADIUS: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerKind {
    Paralysis,
    Missing,
    FunctionLoss,
    Comment,
}

impl MarkerKind {
    pub const ALL: [Self; 4] = [Self::Paralysis, Self::Missing, Self::FunctionLoss, Self::Comment];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Paralysis => "マヒ",
            Self::Missing => "欠損",
            Self::FunctionLoss => "機能低下",
            Self::Comment => "コメント",
        }
    }

    /// Outline colour.
    #[must_use]
    pub fn stroke(self) -> &'static str {
        match self {
            Self::Paralysis => "#ef4444",
            Self::Missing => "#3b82f6",
            Self::FunctionLoss => "#eab308",
            Self::Comment => "#6b7280",
        }
    }

    /// Translucent area fill.
    #[must_use]
    pub fn fill(self) -> &'static str {
        match self {
            Self::Paralysis => "rgba(239,68,68,0.3)",
            Self::Missing => "rgba(59,130,246,0.3)",
            Self::FunctionLoss => "rgba(234,179,8,0.3)",
            Self::Comment => "rgba(107,114,128,0.3)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyView {
    #[default]
    Front,
    Back,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyMarker {
    pub id: String,
    pub x: f64,
    pub y: f64,
    #[serde(rename = "type")]
    pub kind: MarkerKind,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub view: BodyView,
    /// Freehand outline as flat `x, y` pairs relative to the marker origin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<f64>>,
}

impl BodyMarker {
    /// The freehand outline, when it has at least three vertices. A trailing
    /// unpaired coordinate is ignored.
    #[must_use]
    pub fn outline(&self) -> Option<Vec<(f64, f64)>> {
        let points = self.points.as_deref()?;
        let vertices: Vec<(f64, f64)> = points.chunks_exact(2).map(|p| (p[0], p[1])).collect();
        (vertices.len() >= 3).then_some(vertices)
    }
}

/// A body map as stored in the `body-maps` namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyMap {
    pub markers: Vec<BodyMarker>,
    pub scale: f64,
}

impl Default for BodyMap {
    fn default() -> Self {
        Self { markers: Vec::new(), scale: 1.0 }
    }
}

impl BodyMap {
    pub fn markers_on(&self, view: BodyView) -> impl Iterator<Item = &BodyMarker> {
        self.markers.iter().filter(move |m| m.view == view)
    }

    #[must_use]
    pub fn to_svg(&self, canvas: Canvas) -> String {
        BodyMapSvg { map: self, canvas }.to_string()
    }
}

struct BodyMapSvg<'a> {
    map: &'a BodyMap,
    canvas: Canvas,
}

impl fmt::Display for BodyMapSvg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        svg::document(f, self.canvas, |f| {
            for marker in &self.map.markers {
                write_marker(f, marker)?;
            }
            Ok(())
        })
    }
}

fn write_marker(f: &mut fmt::Formatter<'_>, marker: &BodyMarker) -> fmt::Result {
    let kind = marker.kind;
    let placement = Placement { x: marker.x, y: marker.y, rotation: 0.0 };
    writeln!(
        f,
        r#"<g id="{}" data-kind="{kind:?}" data-view="{}" transform="{placement}">"#,
        Escaped(&marker.id),
        match marker.view {
            BodyView::Front => "front",
            BodyView::Back => "back",
        }
    )?;

    match marker.outline() {
        Some(vertices) => {
            f.write_str(r#"<path d=""#)?;
            for (i, (x, y)) in vertices.iter().enumerate() {
                write!(f, "{}{x:.1} {y:.1} ", if i == 0 { "M " } else { "L " })?;
            }
            writeln!(f, r#"Z" fill="{}" stroke="{}" stroke-width="3"/>"#, kind.fill(), kind.stroke())?;
        }
        None => writeln!(
            f,
            r#"<circle r="{MARKER_RADIUS}" fill="{}" stroke="{}" stroke-width="2"/>"#,
            kind.fill(),
            kind.stroke()
        )?,
    }

    if !marker.text.is_empty() {
        #[allow(clippy::cast_precision_loss)]
        let width = (marker.text.chars().count() as f64 * 14.0).max(120.0);
        writeln!(
            f,
            r##"<rect x="-60" y="40" width="{width:.1}" height="30" rx="6" fill="rgba(255,255,255,0.95)" stroke="#ddd"/>"##
        )?;
        writeln!(f, r##"<text x="-50" y="60" font-size="14" fill="#333">{}</text>"##, Escaped(&marker.text))?;
    }
    writeln!(f, "</g>")
}

#[cfg(test)]
#[path = "body_map_test.rs"]
mod tests;
