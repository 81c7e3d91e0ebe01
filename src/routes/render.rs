//! Drawing render routes: stored floor-plan and body-map JSON in, SVG out.

use axum::extract::Query;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Json, Response};
use drawings::{BodyMap, Canvas, FloorPlan};
use serde::Deserialize;

pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";

/// Optional canvas override, e.g. `?width=800&height=600`.
#[derive(Debug, Default, Deserialize)]
pub struct CanvasQuery {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl CanvasQuery {
    fn canvas(&self) -> Canvas {
        let default = Canvas::default();
        Canvas {
            width: self.width.filter(|w| *w > 0.0).unwrap_or(default.width),
            height: self.height.filter(|h| *h > 0.0).unwrap_or(default.height),
        }
    }
}

fn svg(body: String) -> Response {
    ([(CONTENT_TYPE, SVG_CONTENT_TYPE)], body).into_response()
}

/// `POST /api/render/floor-plan`.
pub async fn render_floor_plan(Query(query): Query<CanvasQuery>, Json(plan): Json<FloorPlan>) -> Response {
    svg(plan.to_svg(query.canvas()))
}

/// `POST /api/render/body-map`.
pub async fn render_body_map(Query(query): Query<CanvasQuery>, Json(map): Json<BodyMap>) -> Response {
    svg(map.to_svg(query.canvas()))
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
