//! Render-ready diagram: positioned person/union nodes, edges, and the
//! interactive edits a user can make to them.
//!
//! The layout engine produces a [`Diagram`]; the editor then mutates it in
//! place. Every mutation either succeeds completely or leaves the diagram
//! untouched, so a single gesture is never observably split.

use serde::{Deserialize, Serialize};

use crate::model::{Person, UnionStatus};

// =============================================================================
// NODES
// =============================================================================

/// Status payload carried by a union node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnionPayload {
    pub status: UnionStatus,
}

/// What a node represents, serialized as `kind` + `payload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "lowercase")]
pub enum NodeData {
    Person(Person),
    Union(UnionPayload),
}

/// A person or union at a fixed canvas position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    #[serde(flatten)]
    pub data: NodeData,
}

impl PositionedNode {
    #[must_use]
    pub fn is_person(&self) -> bool {
        matches!(self.data, NodeData::Person(_))
    }

    #[must_use]
    pub fn is_union(&self) -> bool {
        matches!(self.data, NodeData::Union(_))
    }
}

// =============================================================================
// EDGES
// =============================================================================

/// Connector attachment point on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStyle {
    /// Partnership line.
    Straight,
    /// Orthogonal descent connector.
    Step,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub from: String,
    pub to: String,
    pub from_side: Side,
    pub to_side: Side,
    pub style: EdgeStyle,
}

impl Edge {
    /// Partner → union edge. The left partner leaves from its right side into
    /// the union's left side; the right partner mirrors that.
    #[must_use]
    pub fn partner(person_id: &str, union_id: &str, is_left_partner: bool) -> Self {
        let (from_side, to_side) = if is_left_partner { (Side::Right, Side::Left) } else { (Side::Left, Side::Right) };
        Self {
            id: format!("edge-{person_id}-{union_id}"),
            from: person_id.to_owned(),
            to: union_id.to_owned(),
            from_side,
            to_side,
            style: EdgeStyle::Straight,
        }
    }

    /// Union → child descent edge, bottom to top.
    #[must_use]
    pub fn descent(id: String, from: &str, to: &str) -> Self {
        Self { id, from: from.to_owned(), to: to.to_owned(), from_side: Side::Bottom, to_side: Side::Top, style: EdgeStyle::Step }
    }

    #[must_use]
    pub fn touches(&self, node_id: &str) -> bool {
        self.from == node_id || self.to == node_id
    }
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DiagramError {
    #[error("node not found: {0}")]
    UnknownNode(String),
    #[error("node already exists: {0}")]
    DuplicateNode(String),
    #[error("edge already exists: {0}")]
    DuplicateEdge(String),
    #[error("cannot connect node {0} to itself")]
    SelfConnection(String),
    #[error("node {0} is not a person")]
    NotAPerson(String),
    #[error("node {0} is not a union")]
    NotAUnion(String),
}

/// What a connect gesture produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connection {
    /// Two people were joined through a newly inserted union node.
    Union { union_id: String },
    /// A plain descent edge was added.
    Descent { edge_id: String },
}

/// Offset applied to a newly added person relative to the last node.
const NEW_NODE_OFFSET: f64 = 50.0;

// =============================================================================
// DIAGRAM
// =============================================================================

/// On-canvas node and edge collection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Diagram {
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<Edge>,
}

impl Diagram {
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn node_index(&self, id: &str) -> Result<usize, DiagramError> {
        self.nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| DiagramError::UnknownNode(id.to_owned()))
    }

    /// Handle a user drawing a connection from `source` to `target`.
    ///
    /// Two people are joined through a new union node `union_id`, placed on
    /// the source's row at the horizontal midpoint of both partners; the
    /// target is moved onto the source's row. Connector sides are fixed now
    /// from the partners' current x order and are not revisited when nodes
    /// are dragged later. Any other pairing yields a plain descent edge.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::UnknownNode`] when either end is missing,
    /// [`DiagramError::SelfConnection`] when both ends are the same node,
    /// [`DiagramError::NotAPerson`] when neither end is a person,
    /// [`DiagramError::DuplicateNode`] when `union_id` is taken, and
    /// [`DiagramError::DuplicateEdge`] when the descent edge already exists.
    pub fn connect(&mut self, source: &str, target: &str, union_id: &str) -> Result<Connection, DiagramError> {
        if source == target {
            return Err(DiagramError::SelfConnection(source.to_owned()));
        }
        let source_idx = self.node_index(source)?;
        let target_idx = self.node_index(target)?;
        let (source_node, target_node) = (&self.nodes[source_idx], &self.nodes[target_idx]);

        if !source_node.is_person() && !target_node.is_person() {
            return Err(DiagramError::NotAPerson(source.to_owned()));
        }
        if !(source_node.is_person() && target_node.is_person()) {
            let (from, to) = if target_node.is_union() && source_node.is_person() { (target, source) } else { (source, target) };
            let edge_id = format!("edge-{from}-{to}");
            if self.edges.iter().any(|e| e.id == edge_id) {
                return Err(DiagramError::DuplicateEdge(edge_id));
            }
            self.edges.push(Edge::descent(edge_id.clone(), from, to));
            return Ok(Connection::Descent { edge_id });
        }

        if self.node(union_id).is_some() {
            return Err(DiagramError::DuplicateNode(union_id.to_owned()));
        }

        let row_y = source_node.y;
        let source_is_left = source_node.x < target_node.x;
        let union = PositionedNode {
            id: union_id.to_owned(),
            x: f64::midpoint(source_node.x, target_node.x),
            y: row_y,
            data: NodeData::Union(UnionPayload { status: UnionStatus::default() }),
        };
        let edges = [Edge::partner(source, union_id, source_is_left), Edge::partner(target, union_id, !source_is_left)];

        self.nodes[target_idx].y = row_y;
        self.nodes.push(union);
        self.edges.extend(edges);
        Ok(Connection::Union { union_id: union_id.to_owned() })
    }

    /// Add a person near the most recently added node, or at `origin` when
    /// the diagram is empty.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::DuplicateNode`] when the id is already used.
    pub fn add_person(&mut self, person: Person, origin: (f64, f64)) -> Result<(), DiagramError> {
        if self.node(&person.id).is_some() {
            return Err(DiagramError::DuplicateNode(person.id));
        }
        let (x, y) = self
            .nodes
            .last()
            .map_or(origin, |last| (last.x + NEW_NODE_OFFSET, last.y + NEW_NODE_OFFSET));
        self.nodes.push(PositionedNode { id: person.id.clone(), x, y, data: NodeData::Person(person) });
        Ok(())
    }

    /// Replace the payload of an existing person node, keeping its position.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::UnknownNode`] or [`DiagramError::NotAPerson`].
    pub fn update_person(&mut self, person: Person) -> Result<(), DiagramError> {
        let idx = self.node_index(&person.id)?;
        let node = &mut self.nodes[idx];
        if !node.is_person() {
            return Err(DiagramError::NotAPerson(person.id));
        }
        node.data = NodeData::Person(person);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`DiagramError::UnknownNode`] or [`DiagramError::NotAUnion`].
    pub fn set_union_status(&mut self, union_id: &str, status: UnionStatus) -> Result<(), DiagramError> {
        let idx = self.node_index(union_id)?;
        match &mut self.nodes[idx].data {
            NodeData::Union(payload) => {
                payload.status = status;
                Ok(())
            }
            NodeData::Person(_) => Err(DiagramError::NotAUnion(union_id.to_owned())),
        }
    }

    /// Drag a node to a new position. Edge connector sides are left as-is.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::UnknownNode`].
    pub fn move_node(&mut self, id: &str, x: f64, y: f64) -> Result<(), DiagramError> {
        let idx = self.node_index(id)?;
        self.nodes[idx].x = x;
        self.nodes[idx].y = y;
        Ok(())
    }

    /// Remove a node and every edge touching it.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::UnknownNode`].
    pub fn remove_node(&mut self, id: &str) -> Result<(), DiagramError> {
        let idx = self.node_index(id)?;
        self.nodes.remove(idx);
        self.edges.retain(|e| !e.touches(id));
        Ok(())
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }
}

#[cfg(test)]
#[path = "diagram_test.rs"]
mod tests;
