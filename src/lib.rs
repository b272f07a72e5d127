//! Core library for NDEFED, an NDEF record editor.
//! Records are shown as a tree of typed nodes; per-record-type editing support turns
//! committed cell values into reversible operations, which the undo history executes.
//! Record documents are stored as (optionally gzipped) JSON5.

mod document;
pub mod editing;
mod error;
pub mod file_dialog;
mod gui;
mod history;
mod loader;
pub mod node;
pub mod operation;
mod record;
pub mod statics;
mod value;

pub use document::{DocumentFormat, RecordDocument};
pub use editing::{CellEditor, CellValue, ChoiceEditor, EditingSupport, RecordEditingSupport};
pub use error::EditError;
pub use file_dialog::{FileDialogFilters, FileFilter};
pub use gui::run_gui;
pub use history::History;
pub use loader::{FileLoader, FsLoader};
pub use node::{NodeKind, TreeNode, build_tree};
pub use operation::{Edit, Field, FieldValue, ListField, Operation, OperationState};
pub use record::{
    ActionKind, ActionRecord, AlternativeCarrierRecord, CarrierPowerState, Enumerated,
    MimeRecord, Record, RecordBody, RecordId, RecordType, TextEncoding, TextRecord, UriRecord,
};
pub use value::DocValue;
