use crate::{NodeKind, RecordId, RecordType};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving, building or applying edits.
///
/// Contract violations between the tree builder, the editor host and the
/// dispatchers are fatal (see [`EditError::is_fatal`]); the host should log
/// them and never retry. The rest are reportable conditions that leave the
/// record untouched.
#[derive(Error, Debug)]
pub enum EditError {
    /// Node kind/slot combination has no meaning for this record type.
    #[error("unsupported {kind} node at slot {index} for {record_type}")]
    UnsupportedNode {
        record_type: RecordType,
        kind: NodeKind,
        index: usize,
    },

    /// A dispatcher was handed a record of another type.
    #[error("expected a {expected} record, got a {actual} record")]
    RecordTypeMismatch {
        expected: RecordType,
        actual: RecordType,
    },

    /// Committed value does not have the field's expected type.
    #[error("expected a {expected} value, got a {found} value")]
    ValueType {
        expected: &'static str,
        found: &'static str,
    },

    #[error("choice index {index} is out of range for {len} values")]
    ChoiceOutOfRange { index: usize, len: usize },

    /// Negative widget index other than `-1`.
    #[error("invalid choice index {0}")]
    InvalidChoiceIndex(i32),

    #[error("list index {index} is out of range for {len} items")]
    ListIndexOutOfRange { index: usize, len: usize },

    /// The record no longer holds the value an operation expects to replace.
    #[error("stale operation on record {record}: {description}")]
    StaleOperation {
        record: RecordId,
        description: String,
    },

    #[error("operation targets record {expected}, applied to record {actual}")]
    TargetMismatch { expected: RecordId, actual: RecordId },

    #[error("cannot {action} an operation that is {state}")]
    OutOfSequence {
        action: &'static str,
        state: &'static str,
    },

    #[error("record {0} not found")]
    RecordNotFound(RecordId),

    #[error("could not read file '{}', reverting to previous value", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EditError {
    /// Whether the error signals a programming-contract violation rather than
    /// a condition to report to the user.
    pub fn is_fatal(&self) -> bool {
        match self {
            EditError::UnsupportedNode { .. }
            | EditError::RecordTypeMismatch { .. }
            | EditError::ValueType { .. }
            | EditError::ChoiceOutOfRange { .. }
            | EditError::InvalidChoiceIndex(_) => true,
            EditError::ListIndexOutOfRange { .. }
            | EditError::StaleOperation { .. }
            | EditError::TargetMismatch { .. }
            | EditError::OutOfSequence { .. }
            | EditError::RecordNotFound(_)
            | EditError::Load { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EditError;
    use crate::{NodeKind, RecordId, RecordType};

    #[test]
    fn dispatch_errors_are_fatal_and_load_errors_are_not() {
        let err = EditError::UnsupportedNode {
            record_type: RecordType::Uri,
            kind: NodeKind::PropertyListItem,
            index: 3,
        };
        assert!(err.is_fatal());
        assert_eq!(
            err.to_string(),
            "unsupported property list item node at slot 3 for URI Record"
        );

        let err = EditError::Load {
            path: "missing.bin".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(!err.is_fatal());
        assert_eq!(
            err.to_string(),
            "could not read file 'missing.bin', reverting to previous value"
        );

        assert!(!EditError::RecordNotFound(RecordId::new(7)).is_fatal());
        assert!(EditError::InvalidChoiceIndex(-7).is_fatal());
    }
}
