#![allow(clippy::float_cmp)]

use super::*;
use crate::model::Gender;

fn person_at(id: &str, x: f64, y: f64) -> PositionedNode {
    PositionedNode { id: id.into(), x, y, data: NodeData::Person(Person::new(id, id, Gender::Unknown, 0)) }
}

fn union_at(id: &str, x: f64, y: f64) -> PositionedNode {
    PositionedNode { id: id.into(), x, y, data: NodeData::Union(UnionPayload { status: UnionStatus::Married }) }
}

fn two_people() -> Diagram {
    Diagram { nodes: vec![person_at("a", 100.0, 100.0), person_at("b", 300.0, 220.0)], edges: Vec::new() }
}

fn edge_between<'a>(diagram: &'a Diagram, from: &str, to: &str) -> &'a Edge {
    diagram
        .edges
        .iter()
        .find(|e| e.from == from && e.to == to)
        .unwrap_or_else(|| panic!("missing edge {from} -> {to}"))
}

// =============================================================================
// CONNECT
// =============================================================================

#[test]
fn connecting_two_people_inserts_a_union() {
    let mut diagram = two_people();
    let connection = diagram.connect("a", "b", "u1").unwrap();
    assert_eq!(connection, Connection::Union { union_id: "u1".into() });

    let union = diagram.node("u1").unwrap();
    assert!(union.is_union());
    assert_eq!((union.x, union.y), (200.0, 100.0));
    // Target snaps onto the source's row; its x is kept.
    let target = diagram.node("b").unwrap();
    assert_eq!((target.x, target.y), (300.0, 100.0));

    assert_eq!(diagram.edges.len(), 2);
    let source_edge = edge_between(&diagram, "a", "u1");
    assert_eq!((source_edge.from_side, source_edge.to_side), (Side::Right, Side::Left));
    assert_eq!(source_edge.id, "edge-a-u1");
    let target_edge = edge_between(&diagram, "b", "u1");
    assert_eq!((target_edge.from_side, target_edge.to_side), (Side::Left, Side::Right));
    assert!(diagram.edges.iter().all(|e| e.style == EdgeStyle::Straight));
}

#[test]
fn connecting_right_to_left_mirrors_sides() {
    let mut diagram = two_people();
    diagram.connect("b", "a", "u1").unwrap();

    let union = diagram.node("u1").unwrap();
    assert_eq!((union.x, union.y), (200.0, 220.0));
    assert_eq!(diagram.node("a").unwrap().y, 220.0);

    let source_edge = edge_between(&diagram, "b", "u1");
    assert_eq!((source_edge.from_side, source_edge.to_side), (Side::Left, Side::Right));
    let target_edge = edge_between(&diagram, "a", "u1");
    assert_eq!((target_edge.from_side, target_edge.to_side), (Side::Right, Side::Left));
}

#[test]
fn vertically_aligned_partners_use_source_left_connector() {
    let mut diagram = Diagram { nodes: vec![person_at("a", 100.0, 100.0), person_at("b", 100.0, 300.0)], edges: Vec::new() };
    diagram.connect("b", "a", "u1").unwrap();
    let source_edge = edge_between(&diagram, "b", "u1");
    assert_eq!(source_edge.from_side, Side::Left);
    let target_edge = edge_between(&diagram, "a", "u1");
    assert_eq!(target_edge.from_side, Side::Right);
}

#[test]
fn connecting_union_and_person_adds_descent_edge() {
    let mut diagram = two_people();
    diagram.nodes.push(union_at("u", 200.0, 100.0));

    let connection = diagram.connect("u", "b", "ignored").unwrap();
    assert_eq!(connection, Connection::Descent { edge_id: "edge-u-b".into() });
    let edge = edge_between(&diagram, "u", "b");
    assert_eq!((edge.from_side, edge.to_side, edge.style), (Side::Bottom, Side::Top, EdgeStyle::Step));
    assert!(diagram.node("ignored").is_none());
    // Nothing moves for a descent edge.
    assert_eq!(diagram.node("b").unwrap().y, 220.0);
}

#[test]
fn child_to_union_is_normalised_to_union_to_child() {
    let mut diagram = two_people();
    diagram.nodes.push(union_at("u", 200.0, 100.0));

    diagram.connect("b", "u", "ignored").unwrap();
    assert_eq!(edge_between(&diagram, "u", "b").id, "edge-u-b");
    assert_eq!(
        diagram.connect("u", "b", "ignored").unwrap_err(),
        DiagramError::DuplicateEdge("edge-u-b".into())
    );
}

#[test]
fn connecting_two_unions_is_rejected() {
    let mut diagram = two_people();
    diagram.nodes.push(union_at("u1", 200.0, 100.0));
    diagram.nodes.push(union_at("u2", 400.0, 260.0));
    let before = diagram.clone();

    assert_eq!(diagram.connect("u1", "u2", "ignored").unwrap_err(), DiagramError::NotAPerson("u1".into()));
    assert_eq!(diagram, before);
}

#[test]
fn connect_errors_leave_diagram_untouched() {
    let mut diagram = two_people();
    diagram.nodes.push(union_at("u", 200.0, 100.0));
    let before = diagram.clone();

    assert_eq!(diagram.connect("a", "a", "u1").unwrap_err(), DiagramError::SelfConnection("a".into()));
    assert_eq!(diagram.connect("a", "ghost", "u1").unwrap_err(), DiagramError::UnknownNode("ghost".into()));
    assert_eq!(diagram.connect("ghost", "a", "u1").unwrap_err(), DiagramError::UnknownNode("ghost".into()));
    assert_eq!(diagram.connect("a", "b", "u").unwrap_err(), DiagramError::DuplicateNode("u".into()));
    assert_eq!(diagram, before);
}

// =============================================================================
// EDITING
// =============================================================================

#[test]
fn add_person_uses_origin_then_offsets_from_last_node() {
    let mut diagram = Diagram::default();
    diagram.add_person(Person::new("a", "A", Gender::Female, 0), (100.0, 100.0)).unwrap();
    diagram.add_person(Person::new("b", "B", Gender::Male, 0), (100.0, 100.0)).unwrap();

    assert_eq!((diagram.nodes[0].x, diagram.nodes[0].y), (100.0, 100.0));
    assert_eq!((diagram.nodes[1].x, diagram.nodes[1].y), (150.0, 150.0));
    assert_eq!(
        diagram.add_person(Person::new("a", "again", Gender::Unknown, 0), (0.0, 0.0)),
        Err(DiagramError::DuplicateNode("a".into()))
    );
}

#[test]
fn update_person_keeps_position() {
    let mut diagram = two_people();
    let mut updated = Person::new("a", "Alice", Gender::Female, 0);
    updated.is_deceased = true;
    diagram.update_person(updated.clone()).unwrap();

    let node = diagram.node("a").unwrap();
    assert_eq!((node.x, node.y), (100.0, 100.0));
    assert_eq!(node.data, NodeData::Person(updated));

    diagram.nodes.push(union_at("u", 0.0, 0.0));
    assert_eq!(
        diagram.update_person(Person::new("u", "x", Gender::Unknown, 0)),
        Err(DiagramError::NotAPerson("u".into()))
    );
    assert_eq!(
        diagram.update_person(Person::new("nobody", "x", Gender::Unknown, 0)),
        Err(DiagramError::UnknownNode("nobody".into()))
    );
}

#[test]
fn union_status_can_change() {
    let mut diagram = two_people();
    diagram.connect("a", "b", "u").unwrap();
    diagram.set_union_status("u", UnionStatus::Divorced).unwrap();
    assert_eq!(diagram.node("u").unwrap().data, NodeData::Union(UnionPayload { status: UnionStatus::Divorced }));
    assert_eq!(diagram.set_union_status("a", UnionStatus::Married), Err(DiagramError::NotAUnion("a".into())));
}

#[test]
fn moving_a_node_does_not_rewire_edges() {
    let mut diagram = two_people();
    diagram.connect("a", "b", "u").unwrap();
    let edges_before = diagram.edges.clone();

    diagram.move_node("a", 500.0, 40.0).unwrap();
    let node = diagram.node("a").unwrap();
    assert_eq!((node.x, node.y), (500.0, 40.0));
    assert_eq!(diagram.edges, edges_before);
    assert_eq!(diagram.move_node("ghost", 0.0, 0.0), Err(DiagramError::UnknownNode("ghost".into())));
}

#[test]
fn removing_a_node_cascades_to_its_edges() {
    let mut diagram = two_people();
    diagram.add_person(Person::new("c", "C", Gender::Unknown, 1), (0.0, 0.0)).unwrap();
    diagram.connect("a", "b", "u").unwrap();
    diagram.connect("u", "c", "").unwrap();
    assert_eq!(diagram.edges.len(), 3);

    diagram.remove_node("u").unwrap();
    assert!(diagram.node("u").is_none());
    assert!(diagram.edges.is_empty());
    assert_eq!(diagram.nodes.len(), 3);
}

#[test]
fn clear_empties_everything() {
    let mut diagram = two_people();
    diagram.connect("a", "b", "u").unwrap();
    diagram.clear();
    assert_eq!(diagram, Diagram::default());
}
