//! SVG writing helpers shared by both drawing families.

use std::fmt;

/// Output canvas size in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self { width: 1400.0, height: 900.0 }
    }
}

/// Text escaped for use in SVG character data and attribute values.
pub struct Escaped<'a>(pub &'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rest = self.0;
        while let Some(pos) = rest.find(['&', '<', '>', '"', '\'']) {
            f.write_str(&rest[..pos])?;
            f.write_str(match rest.as_bytes()[pos] {
                b'&' => "&amp;",
                b'<' => "&lt;",
                b'>' => "&gt;",
                b'"' => "&quot;",
                _ => "&apos;",
            })?;
            rest = &rest[pos + 1..];
        }
        f.write_str(rest)
    }
}

/// Escape `input` into an owned string.
#[must_use]
pub fn escape_xml(input: &str) -> String {
    Escaped(input).to_string()
}

/// Write the `<svg>` root around `body`.
///
/// # Errors
///
/// Propagates formatter errors from `body`.
pub fn document(
    f: &mut fmt::Formatter<'_>,
    canvas: Canvas,
    body: impl FnOnce(&mut fmt::Formatter<'_>) -> fmt::Result,
) -> fmt::Result {
    writeln!(
        f,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = canvas.width,
        h = canvas.height,
    )?;
    body(f)?;
    writeln!(f, "</svg>")
}

/// `transform` attribute for a group placed at `(x, y)` and rotated about
/// that point. Rotation is omitted when zero.
pub(crate) struct Placement {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "translate({:.1} {:.1})", self.x, self.y)?;
        if self.rotation != 0.0 {
            write!(f, " rotate({:.1})", self.rotation)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "svg_test.rs"]
mod tests;
