//! Floor-plan and body-map drawings with an SVG renderer.
//!
//! Both drawing families are plain serde models stored as JSON documents.
//! Rendering walks each model once and dispatches on the symbol kind with an
//! exhaustive `match`, so adding a kind without a symbol fails to compile.
//!
//! | Module | Role |
//! |--------|------|
//! | [`floor_plan`] | Rooms, walls, furniture symbols |
//! | [`body_map`] | Condition markers on a front/back body outline |
//! | [`svg`] | Shared SVG writing helpers |

pub mod body_map;
pub mod floor_plan;
pub mod svg;

pub use body_map::{BodyMap, BodyMarker, BodyView, MarkerKind};
pub use floor_plan::{FloorPlan, Furniture, FurnitureKind, Point, Room, RoomKind, Wall};
pub use svg::Canvas;
