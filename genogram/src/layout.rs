//! Layout engine: converts a genogram document into positioned nodes and edges.
//!
//! Members are banded by generation, most senior first. Within a band, couples
//! are placed side by side before single members, and every union node sits on
//! its anchor partner's row so partner edges render horizontally. Placement is
//! a deterministic greedy sweep; no crossing minimisation is attempted.
//!
//! The engine never fails on incomplete input. Anything it cannot place is
//! omitted and reported as a [`Diagnostic`] next to the result.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::diagram::{Diagram, Edge, NodeData, PositionedNode, UnionPayload};
use crate::model::{GenogramDocument, Person, PersonId, Union, UnionStatus};

// Layout defaults (canvas units).
pub const DEFAULT_ORIGIN_X: f64 = 100.0;
pub const DEFAULT_ORIGIN_Y: f64 = 100.0;
pub const DEFAULT_SLOT_WIDTH: f64 = 180.0;
pub const DEFAULT_BAND_SPACING: f64 = 160.0;
pub const DEFAULT_BAND_STAGGER: f64 = 50.0;

/// Placement constants for one layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    pub origin_x: f64,
    pub origin_y: f64,
    /// Horizontal distance between neighbouring people in a band.
    pub slot_width: f64,
    /// Vertical distance between consecutive bands.
    pub band_spacing: f64,
    /// Extra left offset per band index. Purely visual.
    pub band_stagger: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            origin_x: DEFAULT_ORIGIN_X,
            origin_y: DEFAULT_ORIGIN_Y,
            slot_width: DEFAULT_SLOT_WIDTH,
            band_spacing: DEFAULT_BAND_SPACING,
            band_stagger: DEFAULT_BAND_STAGGER,
        }
    }
}

// =============================================================================
// ERRORS AND DIAGNOSTICS
// =============================================================================

/// The only fatal layout failure: input not shaped as a document at all.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Why part of a union could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "type", content = "id", rename_all = "camelCase")]
pub enum UnresolvedReason {
    #[error("no partner references a known member")]
    NoPartner,
    #[error("partner {0} is not a known member")]
    UnknownPartner(PersonId),
    #[error("child {0} is not a known member")]
    UnknownChild(PersonId),
}

/// Non-fatal anomaly found during layout. Collected, never thrown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Diagnostic {
    #[error("union {union_id}: {reason}")]
    UnresolvedUnion { union_id: String, reason: UnresolvedReason },
    #[error(
        "union {union_id}: partners disagree on generation ({anchor}={anchor_generation}, {partner}={partner_generation})"
    )]
    MalformedGeneration {
        union_id: String,
        anchor: PersonId,
        anchor_generation: i32,
        partner: PersonId,
        partner_generation: i32,
    },
    #[error("member {person_id} at index {index} repeats an earlier id")]
    DuplicateMember { person_id: PersonId, index: usize },
    #[error("union {declared} at index {index} reuses a taken node id; laid out as {assigned}")]
    DuplicateUnionId { declared: String, index: usize, assigned: String },
}

/// Layout output: the diagram plus whatever could not be laid out cleanly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutResult {
    #[serde(flatten)]
    pub diagram: Diagram,
    pub diagnostics: Vec<Diagnostic>,
}

// =============================================================================
// LAYOUT
// =============================================================================

/// A union whose partner and child references have been checked.
struct ResolvedUnion<'a> {
    id: String,
    status: UnionStatus,
    anchor: &'a Person,
    partner: Option<&'a Person>,
    children: Vec<&'a str>,
}

/// Parse and lay out a raw JSON document.
///
/// # Errors
///
/// Returns [`LayoutError::InvalidInput`] when the value is not shaped as a
/// genogram document.
pub fn layout_value(value: &serde_json::Value, config: &LayoutConfig) -> Result<LayoutResult, LayoutError> {
    let doc = GenogramDocument::from_value(value)?;
    Ok(layout(&doc, config))
}

/// Lay out a parsed document. Pure: the same document and config always
/// produce the same result.
#[must_use]
pub fn layout(doc: &GenogramDocument, config: &LayoutConfig) -> LayoutResult {
    let mut diagnostics = Vec::new();

    // First occurrence of an id wins; later ones are only reported.
    let mut members: Vec<&Person> = Vec::with_capacity(doc.members.len());
    let mut by_id: HashMap<&str, &Person> = HashMap::with_capacity(doc.members.len());
    for (index, person) in doc.members.iter().enumerate() {
        if by_id.contains_key(person.id.as_str()) {
            diagnostics.push(Diagnostic::DuplicateMember { person_id: person.id.clone(), index });
            continue;
        }
        by_id.insert(person.id.as_str(), person);
        members.push(person);
    }

    // Union node ids share one namespace with member ids.
    let mut taken: HashSet<String> = by_id.keys().map(|id| (*id).to_owned()).collect();
    let unions: Vec<ResolvedUnion<'_>> = doc
        .marriages
        .iter()
        .enumerate()
        .filter_map(|(index, union)| resolve_union(union, index, &by_id, &mut taken, &mut diagnostics))
        .collect();

    let positions = place_members(&members, &unions, config);

    let mut diagram = Diagram::default();
    for person in &members {
        if let Some(&(x, y)) = positions.get(person.id.as_str()) {
            diagram.nodes.push(PositionedNode {
                id: person.id.clone(),
                x,
                y,
                data: NodeData::Person((*person).clone()),
            });
        }
    }

    for union in &unions {
        let Some(&(anchor_x, anchor_y)) = positions.get(union.anchor.id.as_str()) else {
            continue;
        };
        let partner_pos = union
            .partner
            .and_then(|p| positions.get(p.id.as_str()).map(|&pos| (p, pos)));

        let x = match partner_pos {
            Some((_, (partner_x, _))) => f64::midpoint(anchor_x, partner_x),
            None => anchor_x + config.slot_width / 2.0,
        };
        diagram.nodes.push(PositionedNode {
            id: union.id.clone(),
            x,
            y: anchor_y,
            data: NodeData::Union(UnionPayload { status: union.status }),
        });

        match partner_pos {
            Some((partner, (partner_x, _))) => {
                let anchor_is_left = anchor_x <= partner_x;
                diagram.edges.push(Edge::partner(&union.anchor.id, &union.id, anchor_is_left));
                diagram.edges.push(Edge::partner(&partner.id, &union.id, !anchor_is_left));
            }
            None => diagram.edges.push(Edge::partner(&union.anchor.id, &union.id, true)),
        }

        for (i, child) in union.children.iter().enumerate() {
            diagram.edges.push(Edge::descent(format!("edge-{}-child-{i}", union.id), &union.id, child));
        }
    }

    for diagnostic in &diagnostics {
        debug!(%diagnostic, "genogram layout diagnostic");
    }
    debug!(
        people = members.len(),
        unions = unions.len(),
        edges = diagram.edges.len(),
        diagnostics = diagnostics.len(),
        "genogram layout complete"
    );

    LayoutResult { diagram, diagnostics }
}

/// Check a union's references. Returns `None` (with a diagnostic) when no
/// partner resolves, since such a union has no position to derive.
fn resolve_union<'a>(
    union: &'a Union,
    index: usize,
    by_id: &HashMap<&str, &'a Person>,
    taken: &mut HashSet<String>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<ResolvedUnion<'a>> {
    let id = free_union_id(union.node_id(index), index, taken, diagnostics);

    let mut lookup_partner = |partner: Option<&str>| -> Option<&'a Person> {
        let partner = partner.filter(|p| !p.is_empty())?;
        let found = by_id.get(partner).copied();
        if found.is_none() {
            diagnostics.push(Diagnostic::UnresolvedUnion {
                union_id: id.clone(),
                reason: UnresolvedReason::UnknownPartner(partner.to_owned()),
            });
        }
        found
    };
    let partner_a = lookup_partner(union.partner_a.as_deref());
    let partner_b = lookup_partner(union.partner_b.as_deref());

    let (anchor, partner) = match (partner_a, partner_b) {
        (Some(a), b) => (a, b.filter(|b| b.id != a.id)),
        (None, Some(b)) => (b, None),
        (None, None) => {
            diagnostics.push(Diagnostic::UnresolvedUnion { union_id: id, reason: UnresolvedReason::NoPartner });
            return None;
        }
    };

    if let Some(partner) = partner.filter(|p| p.generation != anchor.generation) {
        diagnostics.push(Diagnostic::MalformedGeneration {
            union_id: id.clone(),
            anchor: anchor.id.clone(),
            anchor_generation: anchor.generation,
            partner: partner.id.clone(),
            partner_generation: partner.generation,
        });
    }

    let mut children = Vec::with_capacity(union.children.len());
    for child in &union.children {
        if by_id.contains_key(child.as_str()) {
            children.push(child.as_str());
        } else {
            diagnostics.push(Diagnostic::UnresolvedUnion {
                union_id: id.clone(),
                reason: UnresolvedReason::UnknownChild(child.clone()),
            });
        }
    }

    taken.insert(id.clone());
    Some(ResolvedUnion { id, status: union.status, anchor, partner, children })
}

/// `declared` if no member or earlier union uses it, otherwise the first
/// free id among `union-{index}`, `union-{index}-1`, `union-{index}-2`, ...
fn free_union_id(declared: String, index: usize, taken: &HashSet<String>, diagnostics: &mut Vec<Diagnostic>) -> String {
    if !taken.contains(&declared) {
        return declared;
    }
    let base = format!("union-{index}");
    let mut assigned = base.clone();
    let mut suffix = 0_usize;
    while taken.contains(&assigned) {
        suffix += 1;
        assigned = format!("{base}-{suffix}");
    }
    diagnostics.push(Diagnostic::DuplicateUnionId { declared, index, assigned: assigned.clone() });
    assigned
}

/// Assign every member a position, one band per generation present.
fn place_members<'a>(
    members: &[&'a Person],
    unions: &[ResolvedUnion<'a>],
    config: &LayoutConfig,
) -> HashMap<&'a str, (f64, f64)> {
    let mut bands: BTreeMap<i32, Vec<&'a Person>> = BTreeMap::new();
    for &person in members {
        bands.entry(person.generation).or_default().push(person);
    }

    let mut positions: HashMap<&'a str, (f64, f64)> = HashMap::with_capacity(members.len());
    for (band, (&generation, band_members)) in bands.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let band = band as f64;
        let y = config.origin_y + band * config.band_spacing;
        let mut cursor = config.origin_x + band * config.band_stagger;

        let mut place = |person: &'a Person| {
            positions.entry(person.id.as_str()).or_insert_with(|| {
                let pos = (cursor, y);
                cursor += config.slot_width;
                pos
            });
        };

        // Couples first, anchored by partner A's band.
        for union in unions.iter().filter(|u| u.anchor.generation == generation) {
            place(union.anchor);
            if let Some(partner) = union.partner.filter(|p| p.generation == generation) {
                place(partner);
            }
        }

        for &person in band_members {
            place(person);
        }
    }
    positions
}

#[cfg(test)]
#[path = "layout_test.rs"]
mod tests;
