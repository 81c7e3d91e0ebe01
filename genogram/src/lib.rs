//! Genogram normalization and layout.
//!
//! Takes a loosely structured family description (people plus marriage and
//! parent-child relations, typically produced by a language model) and turns
//! it into a render-ready graph of person nodes, union nodes, and edges with
//! generation-banded coordinates. Also owns the interactive edits a user makes
//! to that graph afterwards and the undo/redo history around them.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`model`] | Input document: people, unions, lenient JSON decoding |
//! | [`layout`] | Banded greedy placement, edge emission, diagnostics |
//! | [`diagram`] | Positioned nodes/edges and interactive edits (connect, move, remove) |
//! | [`history`] | Bounded undo/redo buffer |
//! | [`session`] | One editor's diagram plus its history |

pub mod diagram;
pub mod history;
pub mod layout;
pub mod model;
pub mod session;

pub use diagram::{Connection, Diagram, DiagramError, Edge, EdgeStyle, NodeData, PositionedNode, Side, UnionPayload};
pub use history::History;
pub use layout::{Diagnostic, LayoutConfig, LayoutError, LayoutResult, UnresolvedReason, layout, layout_value};
pub use model::{Gender, GenogramDocument, Person, PersonId, Union, UnionStatus};
pub use session::EditorSession;
