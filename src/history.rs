use crate::{EditError, Operation, RecordDocument, statics};
use std::collections::VecDeque;

/// Undo/redo stacks of executed operations.
/// A failed undo or redo puts the operation back, so history is never lost on error.
#[derive(Debug)]
pub struct History {
    undo_stack: VecDeque<Operation>,
    redo_stack: Vec<Operation>,
    max_entries: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_limit(statics::HISTORY_LIMIT)
    }
}

impl History {
    pub fn with_limit(max_entries: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Execute `op` against its target record and record it.
    /// Returns the operation's description.
    pub fn submit(
        &mut self,
        doc: &mut RecordDocument,
        mut op: Operation,
    ) -> Result<String, EditError> {
        let record = doc
            .record_mut(op.target())
            .ok_or(EditError::RecordNotFound(op.target()))?;
        op.execute(record)?;
        doc.refresh_dirty();

        let description = op.description();
        tracing::debug!(record = %op.target(), change = %description, "executed operation");
        self.undo_stack.push_back(op);
        self.redo_stack.clear();
        while self.undo_stack.len() > self.max_entries {
            self.undo_stack.pop_front();
        }
        Ok(description)
    }

    /// Revoke the most recent operation. `Ok(None)` when there is nothing to undo.
    pub fn undo(&mut self, doc: &mut RecordDocument) -> Result<Option<String>, EditError> {
        let Some(mut op) = self.undo_stack.pop_back() else {
            return Ok(None);
        };

        match Self::apply(doc, &mut op, false) {
            Ok(()) => {
                let description = op.description();
                tracing::debug!(record = %op.target(), change = %description, "undone");
                self.redo_stack.push(op);
                Ok(Some(description))
            }
            Err(e) => {
                tracing::warn!(record = %op.target(), error = %e, "undo failed");
                self.undo_stack.push_back(op);
                Err(e)
            }
        }
    }

    /// Re-execute the most recently undone operation.
    pub fn redo(&mut self, doc: &mut RecordDocument) -> Result<Option<String>, EditError> {
        let Some(mut op) = self.redo_stack.pop() else {
            return Ok(None);
        };

        match Self::apply(doc, &mut op, true) {
            Ok(()) => {
                let description = op.description();
                tracing::debug!(record = %op.target(), change = %description, "redone");
                self.undo_stack.push_back(op);
                Ok(Some(description))
            }
            Err(e) => {
                tracing::warn!(record = %op.target(), error = %e, "redo failed");
                self.redo_stack.push(op);
                Err(e)
            }
        }
    }

    fn apply(doc: &mut RecordDocument, op: &mut Operation, forward: bool) -> Result<(), EditError> {
        let record = doc
            .record_mut(op.target())
            .ok_or(EditError::RecordNotFound(op.target()))?;
        if forward {
            op.execute(record)?;
        } else {
            op.revoke(record)?;
        }
        doc.refresh_dirty();
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Descriptions of undoable operations, oldest first.
    pub fn descriptions(&self) -> impl Iterator<Item = String> + '_ {
        self.undo_stack.iter().map(Operation::description)
    }

    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }
}
