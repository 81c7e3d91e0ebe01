#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

fn plan() -> FloorPlan {
    serde_json::from_value(json!({
        "rooms": [
            { "id": "r1", "name": "Living & Dining", "type": "Living", "x": 0, "y": 0, "width": 200, "height": 150, "rotation": 0 }
        ],
        "walls": [
            { "id": "w1", "start": { "x": 0, "y": 0 }, "end": { "x": 200, "y": 0 }, "thickness": 6 }
        ],
        "furniture": [
            { "id": "f1", "type": "Bed", "x": 10, "y": 20, "width": 80, "height": 70, "rotation": 90, "label": "介護ベッド" }
        ],
        "scale": 50
    }))
    .unwrap()
}

#[test]
fn decodes_stored_plan() {
    let plan = plan();
    assert_eq!(plan.rooms[0].kind, RoomKind::Living);
    assert_eq!(plan.walls[0].end, Point { x: 200.0, y: 0.0 });
    assert_eq!(plan.furniture[0].kind, FurnitureKind::Bed);
    assert_eq!(plan.furniture[0].label.as_deref(), Some("介護ベッド"));
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let plan: FloorPlan = serde_json::from_value(json!({ "rooms": [{ "id": "r", "x": 0, "y": 0, "width": 1, "height": 1 }] })).unwrap();
    assert_eq!(plan.scale, DEFAULT_SCALE);
    assert_eq!(plan.rooms[0].kind, RoomKind::Other);
    assert!(plan.walls.is_empty() && plan.furniture.is_empty());
}

#[test]
fn renders_rooms_walls_and_furniture() {
    let svg = plan().to_svg(Canvas::default());
    assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="1400" height="900""#));
    assert!(svg.trim_end().ends_with("</svg>"));
    assert!(svg.contains(r##"fill="#fff7ed""##));
    assert!(svg.contains("Living &amp; Dining"));
    assert!(svg.contains("4.0m x 3.0m"));
    assert!(svg.contains(r#"stroke-width="6.0""#));
    assert!(svg.contains("translate(10.0 20.0) rotate(90.0)"));
    assert!(svg.contains("scale(2.000 1.000)"));
    assert!(svg.contains(">介護ベッド</text>"));
}

#[test]
fn rooms_render_below_furniture() {
    let svg = plan().to_svg(Canvas::default());
    let room = svg.find(r#"id="r1""#).unwrap();
    let item = svg.find(r#"id="f1""#).unwrap();
    assert!(room < item);
}

#[test]
fn every_furniture_kind_has_a_symbol() {
    for kind in FurnitureKind::ALL {
        let item = Furniture { id: "f".into(), kind, x: 0.0, y: 0.0, width: 0.0, height: 0.0, rotation: 0.0, label: None };
        assert_eq!(item.scale(), (1.0, 1.0));
        let plan = FloorPlan { furniture: vec![item], ..FloorPlan::default() };
        let svg = plan.to_svg(Canvas::default());
        assert!(svg.contains(kind.symbol()), "{kind:?} symbol missing");
        assert!(!kind.label().is_empty());
    }
}

#[test]
fn every_room_kind_has_fill_and_label() {
    for kind in RoomKind::ALL {
        let room = Room::new("r", kind, 0.0, 0.0, 100.0, 100.0);
        assert_eq!(room.name, kind.label());
        assert!(kind.fill().starts_with('#'));
    }
}

#[test]
fn zero_scale_skips_dimensions() {
    let plan = FloorPlan { rooms: vec![Room::new("r", RoomKind::Kitchen, 0.0, 0.0, 50.0, 50.0)], scale: 0.0, ..FloorPlan::default() };
    assert!(!plan.to_svg(Canvas::default()).contains("m x "));
}

#[test]
fn unknown_furniture_kind_is_rejected() {
    let result = serde_json::from_value::<Furniture>(json!({ "id": "f", "type": "Piano", "x": 0, "y": 0 }));
    assert!(result.is_err());
}
