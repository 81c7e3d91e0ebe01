//! Editor session: one diagram plus its undo/redo history.
//!
//! Every mutating gesture runs against a copy of the present diagram and is
//! recorded as a single snapshot only if it succeeds, so a failed edit leaves
//! both the diagram and the history untouched.

use tracing::debug;

use crate::diagram::{Connection, Diagram, DiagramError};
use crate::history::History;
use crate::layout::{LayoutConfig, LayoutResult};
use crate::model::{Person, UnionStatus};

#[derive(Debug, Clone)]
pub struct EditorSession {
    history: History<Diagram>,
    origin: (f64, f64),
}

impl EditorSession {
    #[must_use]
    pub fn new(diagram: Diagram, config: &LayoutConfig) -> Self {
        Self { history: History::new(diagram), origin: (config.origin_x, config.origin_y) }
    }

    /// Start a session from a finished layout pass.
    #[must_use]
    pub fn from_layout(result: LayoutResult, config: &LayoutConfig) -> Self {
        Self::new(result.diagram, config)
    }

    #[must_use]
    pub fn diagram(&self) -> &Diagram {
        self.history.present()
    }

    fn apply<T>(&mut self, edit: impl FnOnce(&mut Diagram) -> Result<T, DiagramError>) -> Result<T, DiagramError> {
        let mut next = self.history.present().clone();
        let out = edit(&mut next)?;
        self.history.record(next);
        Ok(out)
    }

    /// Replace the whole diagram, e.g. with a freshly generated layout.
    pub fn replace(&mut self, diagram: Diagram) {
        self.history.record(diagram);
    }

    /// # Errors
    ///
    /// See [`Diagram::connect`].
    pub fn connect(&mut self, source: &str, target: &str, union_id: &str) -> Result<Connection, DiagramError> {
        let connection = self.apply(|d| d.connect(source, target, union_id))?;
        debug!(%source, %target, ?connection, "connected nodes");
        Ok(connection)
    }

    /// # Errors
    ///
    /// See [`Diagram::add_person`].
    pub fn add_person(&mut self, person: Person) -> Result<(), DiagramError> {
        let origin = self.origin;
        self.apply(|d| d.add_person(person, origin))
    }

    /// # Errors
    ///
    /// See [`Diagram::update_person`].
    pub fn update_person(&mut self, person: Person) -> Result<(), DiagramError> {
        self.apply(|d| d.update_person(person))
    }

    /// # Errors
    ///
    /// See [`Diagram::set_union_status`].
    pub fn set_union_status(&mut self, union_id: &str, status: UnionStatus) -> Result<(), DiagramError> {
        self.apply(|d| d.set_union_status(union_id, status))
    }

    /// # Errors
    ///
    /// See [`Diagram::move_node`].
    pub fn move_node(&mut self, id: &str, x: f64, y: f64) -> Result<(), DiagramError> {
        self.apply(|d| d.move_node(id, x, y))
    }

    /// # Errors
    ///
    /// See [`Diagram::remove_node`].
    pub fn remove_node(&mut self, id: &str) -> Result<(), DiagramError> {
        self.apply(|d| d.remove_node(id))
    }

    pub fn clear(&mut self) {
        self.history.record(Diagram::default());
    }

    /// Returns `false` when there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.history.undo().is_some()
    }

    /// Returns `false` when there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.history.redo().is_some()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
