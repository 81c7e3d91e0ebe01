//! Structural properties of the layout engine, checked over a handful of
//! family shapes rather than one fixed scenario.
#![allow(clippy::float_cmp)]

use std::collections::{HashMap, HashSet};

use genogram::{layout_value, GenogramDocument, LayoutConfig, LayoutResult, NodeData, PositionedNode};
use serde_json::{json, Value};

fn families() -> Vec<Value> {
    vec![
        json!({ "members": [], "marriages": [] }),
        json!({
            "members": [
                { "id": "gf", "gender": "M", "generation": -1, "isDeceased": true },
                { "id": "gm", "gender": "F", "generation": -1 },
                { "id": "self", "gender": "F", "generation": 0, "isSelf": true },
                { "id": "bro", "gender": "M", "generation": 0 },
                { "id": "husband", "gender": "M", "generation": 0 },
                { "id": "son", "gender": "M", "generation": 1 },
                { "id": "daughter", "gender": "F", "generation": 1 },
                { "id": "grandkid", "generation": 2 }
            ],
            "marriages": [
                { "husband": "gf", "wife": "gm", "children": ["self", "bro"] },
                { "husband": "husband", "wife": "self", "status": "separated", "children": ["son", "daughter"] },
                { "wife": "daughter", "children": ["grandkid"] }
            ]
        }),
        json!({
            "members": [
                { "id": "a", "generation": 3 },
                { "id": "b", "generation": -7 },
                { "id": "c", "generation": 3 },
                { "id": "a", "generation": 0 },
                { "id": "d" }
            ],
            "marriages": [
                { "husband": "a", "wife": "b" },
                { "husband": "ghost", "wife": "c", "children": ["d", "nobody"] },
                { "children": ["d"] },
                { "id": "named", "husband": "d", "wife": "d" }
            ]
        }),
        json!({
            "members": [
                { "id": "a" }, { "id": "b" }, { "id": "c" }, { "id": "d" }, { "id": "e" },
                { "id": "union-1" },
                { "id": "kid", "generation": 1 }
            ],
            "marriages": [
                { "id": "m", "husband": "a", "wife": "b", "children": ["kid"] },
                { "id": "m", "husband": "c", "wife": "d", "children": ["kid"] },
                { "id": "e", "husband": "e" }
            ]
        }),
    ]
}

fn run(doc: &Value) -> LayoutResult {
    layout_value(doc, &LayoutConfig::default()).unwrap()
}

fn person_nodes(result: &LayoutResult) -> Vec<&PositionedNode> {
    result.diagram.nodes.iter().filter(|n| n.is_person()).collect()
}

fn generation_of(node: &PositionedNode) -> i32 {
    match &node.data {
        NodeData::Person(person) => person.generation,
        NodeData::Union(_) => panic!("{} is a union", node.id),
    }
}

#[test]
fn layout_is_idempotent() {
    for doc in families() {
        assert_eq!(run(&doc), run(&doc));
    }
}

#[test]
fn every_distinct_member_is_placed_once() {
    for doc in families() {
        let parsed = GenogramDocument::from_value(&doc).unwrap();
        let distinct: HashSet<&str> = parsed.members.iter().map(|p| p.id.as_str()).collect();

        let result = run(&doc);
        let placed: Vec<&str> = person_nodes(&result).iter().map(|n| n.id.as_str()).collect();
        assert_eq!(placed.len(), distinct.len());
        assert_eq!(placed.iter().copied().collect::<HashSet<_>>(), distinct);
    }
}

#[test]
fn node_and_edge_ids_are_unique_and_edges_resolve() {
    for doc in families() {
        let result = run(&doc);
        let node_ids: HashSet<&str> = result.diagram.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(node_ids.len(), result.diagram.nodes.len());

        let edge_ids: HashSet<&str> = result.diagram.edges.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(edge_ids.len(), result.diagram.edges.len());

        for edge in &result.diagram.edges {
            assert!(node_ids.contains(edge.from.as_str()), "dangling source {}", edge.from);
            assert!(node_ids.contains(edge.to.as_str()), "dangling target {}", edge.to);
        }
    }
}

#[test]
fn bands_are_monotonic_in_generation() {
    for doc in families() {
        let result = run(&doc);
        let people = person_nodes(&result);
        for a in &people {
            for b in &people {
                let (ga, gb) = (generation_of(a), generation_of(b));
                if ga < gb {
                    assert!(a.y < b.y, "{} (gen {ga}) should be above {} (gen {gb})", a.id, b.id);
                } else if ga == gb {
                    assert_eq!(a.y, b.y);
                }
            }
        }
    }
}

#[test]
fn people_in_a_band_never_overlap() {
    let config = LayoutConfig::default();
    for doc in families() {
        let result = run(&doc);
        let mut rows: HashMap<i32, Vec<f64>> = HashMap::new();
        for node in person_nodes(&result) {
            rows.entry(generation_of(node)).or_default().push(node.x);
        }
        for xs in rows.values_mut() {
            xs.sort_by(f64::total_cmp);
            for pair in xs.windows(2) {
                assert!(pair[1] - pair[0] >= config.slot_width);
            }
        }
    }
}

#[test]
fn unions_sit_between_same_band_partners() {
    for doc in families() {
        let result = run(&doc);
        let position: HashMap<&str, (f64, f64)> =
            result.diagram.nodes.iter().map(|n| (n.id.as_str(), (n.x, n.y))).collect();

        for union in result.diagram.nodes.iter().filter(|n| n.is_union()) {
            let partners: Vec<(f64, f64)> = result
                .diagram
                .edges
                .iter()
                .filter(|e| e.to == union.id)
                .map(|e| position[e.from.as_str()])
                .collect();
            assert!(!partners.is_empty(), "union {} has no partner edge", union.id);
            assert!(partners.iter().any(|&(_, y)| y == union.y), "union {} is off its anchor's row", union.id);

            if let [(ax, ay), (bx, by)] = partners[..] {
                if ay == by {
                    assert_eq!(union.x, f64::midpoint(ax, bx));
                }
            }
        }
    }
}
