//! Per-record-type editing support: what a tree node displays, which editor it uses
//! and which [`Operation`] a committed value turns into.
//!
//! Dispatch happens on the node kind (exhaustively) and then on the node's slot index,
//! see [`crate::node::slot`]. Nothing here mutates a record; operations are returned to
//! the caller, who hands them to [`crate::History`] for execution.

mod action;
mod alternative_carrier;
mod default;
mod mime;
mod text;
mod uri;

pub use action::ActionEditingSupport;
pub use alternative_carrier::AlternativeCarrierEditingSupport;
pub use default::{DefaultRecordEditingSupport, choice_editor, record_type_choice_editor};
pub use mime::MimeEditingSupport;
pub use text::TextEditingSupport;
pub use uri::UriEditingSupport;

use crate::{
    EditError, FileLoader, FsLoader, NodeKind, Record, RecordType, TreeNode,
    operation::{Edit, Field, FieldValue, ListField, Operation},
    statics,
};

/// A value as committed by (or displayed in) a cell editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Text(String),
    /// Ordinal in the field's value domain; `None` is unset.
    Choice(Option<usize>),
}

impl CellValue {
    /// Decode a raw choice-widget index; `-1` (nothing selected) means unset.
    pub fn from_choice_index(index: i32) -> Result<Self, EditError> {
        match index {
            -1 => Ok(CellValue::Choice(None)),
            i => usize::try_from(i)
                .map(|i| CellValue::Choice(Some(i)))
                .map_err(|_| EditError::InvalidChoiceIndex(index)),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Text(_) => "text",
            CellValue::Choice(_) => "choice",
        }
    }

    pub fn into_text(self) -> Result<String, EditError> {
        match self {
            CellValue::Text(s) => Ok(s),
            other => Err(EditError::ValueType {
                expected: "text",
                found: other.type_name(),
            }),
        }
    }

    pub fn into_choice(self) -> Result<Option<usize>, EditError> {
        match self {
            CellValue::Choice(selection) => Ok(selection),
            other => Err(EditError::ValueType {
                expected: "choice",
                found: other.type_name(),
            }),
        }
    }
}

/// Items of a choice editor, optionally headed by an "unset" entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceEditor {
    items: Vec<String>,
    nullable: bool,
}

impl ChoiceEditor {
    pub fn new(values: Vec<String>, nullable: bool) -> Self {
        let items = if nullable {
            std::iter::once(statics::EN_CHOICE_UNSET.to_string())
                .chain(values)
                .collect()
        } else {
            values
        };
        Self { items, nullable }
    }

    /// Items as shown in the widget, including the leading unset entry if any.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }

    /// Widget index showing `selection`; `-1` when nothing is selected.
    pub fn widget_index(&self, selection: Option<usize>) -> i32 {
        let index = match (selection, self.nullable) {
            (None, true) => Some(0),
            (None, false) => None,
            (Some(i), true) => Some(i + 1),
            (Some(i), false) => Some(i),
        };
        index.and_then(|i| i32::try_from(i).ok()).unwrap_or(-1)
    }

    /// Committed value for a raw widget index.
    pub fn selection(&self, widget_index: i32) -> Result<CellValue, EditError> {
        match CellValue::from_choice_index(widget_index)? {
            CellValue::Choice(Some(i)) if i >= self.items.len() => Err(EditError::ChoiceOutOfRange {
                index: i,
                len: self.items.len(),
            }),
            CellValue::Choice(Some(i)) if self.nullable => Ok(CellValue::Choice(i.checked_sub(1))),
            other => Ok(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellEditor {
    /// Single-line free text.
    Text,
    Choice(ChoiceEditor),
    /// Value is imported from a file picked by the host; commits the path as text.
    ///
    /// The cell displays a size summary of the imported bytes, not the path, so a
    /// committed path does not read back. The bytes themselves do: revoking restores
    /// the previous content and its summary. Committing an empty path changes nothing.
    File { mime_type_hint: Option<String> },
}

/// Resolves value, editor and operation for the nodes of one record type.
pub trait RecordEditingSupport {
    /// Static classification by node kind: list containers only group their items.
    fn can_edit(&self, node: &TreeNode) -> bool {
        match node.kind() {
            NodeKind::PropertyList => false,
            NodeKind::Record
            | NodeKind::ParentProperty
            | NodeKind::Property
            | NodeKind::PropertyListItem => true,
        }
    }

    fn value(&self, record: &Record, node: &TreeNode) -> Result<CellValue, EditError>;

    /// Build the operation for a committed value, `None` if nothing changes.
    /// The operation is not executed.
    fn set_value(
        &self,
        record: &Record,
        node: &TreeNode,
        value: CellValue,
    ) -> Result<Option<Operation>, EditError>;

    /// `None` for nodes edited only through their children.
    fn cell_editor(&self, record: &Record, node: &TreeNode)
    -> Result<Option<CellEditor>, EditError>;

    /// The list field behind a list container or list item node.
    fn list_field(&self, node: &TreeNode) -> Result<ListField, EditError> {
        Err(unsupported(node))
    }
}

pub(crate) fn unsupported(node: &TreeNode) -> EditError {
    EditError::UnsupportedNode {
        record_type: node.record_type(),
        kind: node.kind(),
        index: node.parent_index(),
    }
}

/// Committed text for a nullable field: empty means unset.
pub(crate) fn text_or_unset(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}

pub(crate) fn decode_choice<E: crate::Enumerated>(
    selection: Option<usize>,
) -> Result<Option<E>, EditError> {
    selection
        .map(|index| {
            E::from_ordinal(index).ok_or(EditError::ChoiceOutOfRange {
                index,
                len: E::VALUES.len(),
            })
        })
        .transpose()
}

/// Operation replacing `field` with `next`, or `None` when the value is unchanged.
pub(crate) fn property_edit(
    record: &Record,
    field: Field,
    next: FieldValue,
) -> Result<Option<Operation>, EditError> {
    let previous = field.read(record)?;
    if previous.same_as(&next) {
        return Ok(None);
    }
    Ok(Some(Operation::new(
        record.id(),
        Edit::Property {
            field,
            previous,
            next,
        },
    )))
}

pub(crate) fn list_item_edit(
    record: &Record,
    list: ListField,
    index: usize,
    next: String,
) -> Result<Option<Operation>, EditError> {
    let previous = list.get(record, index)?;
    if previous == next {
        return Ok(None);
    }
    Ok(Some(Operation::new(
        record.id(),
        Edit::ListItem {
            list,
            index,
            previous: previous.to_string(),
            next,
        },
    )))
}

/// Entry point for editor hosts: picks the editing support for a node's record type.
pub struct EditingSupport {
    alternative_carrier: AlternativeCarrierEditingSupport,
    text: TextEditingSupport,
    uri: UriEditingSupport,
    action: ActionEditingSupport,
    mime: MimeEditingSupport,
}

impl Default for EditingSupport {
    fn default() -> Self {
        Self::new(Box::new(FsLoader))
    }
}

impl EditingSupport {
    pub fn new(loader: Box<dyn FileLoader>) -> Self {
        Self {
            alternative_carrier: AlternativeCarrierEditingSupport::default(),
            text: TextEditingSupport::default(),
            uri: UriEditingSupport::default(),
            action: ActionEditingSupport::default(),
            mime: MimeEditingSupport::new(loader),
        }
    }

    pub fn for_record_type(&self, record_type: RecordType) -> &dyn RecordEditingSupport {
        match record_type {
            RecordType::AlternativeCarrier => &self.alternative_carrier,
            RecordType::Text => &self.text,
            RecordType::Uri => &self.uri,
            RecordType::Action => &self.action,
            RecordType::Mime => &self.mime,
        }
    }

    pub fn can_edit(&self, node: &TreeNode) -> bool {
        self.for_record_type(node.record_type()).can_edit(node)
    }

    pub fn value(&self, record: &Record, node: &TreeNode) -> Result<CellValue, EditError> {
        check_node_record(record, node)?;
        self.for_record_type(node.record_type()).value(record, node)
    }

    pub fn set_value(
        &self,
        record: &Record,
        node: &TreeNode,
        value: CellValue,
    ) -> Result<Option<Operation>, EditError> {
        check_node_record(record, node)?;
        let op = self
            .for_record_type(node.record_type())
            .set_value(record, node, value)?;
        if let Some(op) = &op {
            tracing::debug!(record = %record.id(), change = %op.description(), "built operation");
        }
        Ok(op)
    }

    pub fn cell_editor(
        &self,
        record: &Record,
        node: &TreeNode,
    ) -> Result<Option<CellEditor>, EditError> {
        check_node_record(record, node)?;
        self.for_record_type(node.record_type())
            .cell_editor(record, node)
    }

    /// Operation inserting `value` into a list: appended when `node` is the list
    /// container, placed right after `node` when it is a list item.
    pub fn insert_list_item(
        &self,
        record: &Record,
        node: &TreeNode,
        value: String,
    ) -> Result<Operation, EditError> {
        check_node_record(record, node)?;
        let list = self.for_record_type(node.record_type()).list_field(node)?;
        let index = match node.kind() {
            NodeKind::PropertyList => list.len(record)?,
            NodeKind::PropertyListItem => node.parent_index() + 1,
            NodeKind::Record | NodeKind::ParentProperty | NodeKind::Property => {
                return Err(unsupported(node));
            }
        };
        let len = list.len(record)?;
        if index > len {
            return Err(EditError::ListIndexOutOfRange { index, len });
        }
        Ok(Operation::new(
            record.id(),
            Edit::InsertListItem { list, index, value },
        ))
    }

    /// Operation removing the list item at `node`.
    pub fn remove_list_item(&self, record: &Record, node: &TreeNode) -> Result<Operation, EditError> {
        check_node_record(record, node)?;
        if node.kind() != NodeKind::PropertyListItem {
            return Err(unsupported(node));
        }
        let list = self.for_record_type(node.record_type()).list_field(node)?;
        let index = node.parent_index();
        let value = list.get(record, index)?.to_string();
        Ok(Operation::new(
            record.id(),
            Edit::RemoveListItem { list, index, value },
        ))
    }
}

fn check_node_record(record: &Record, node: &TreeNode) -> Result<(), EditError> {
    if node.record() != record.id() {
        return Err(EditError::TargetMismatch {
            expected: node.record(),
            actual: record.id(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{CellValue, ChoiceEditor};
    use crate::EditError;

    #[test]
    fn choice_index_minus_one_is_unset() {
        assert_eq!(CellValue::from_choice_index(-1).unwrap(), CellValue::Choice(None));
        assert_eq!(CellValue::from_choice_index(2).unwrap(), CellValue::Choice(Some(2)));
    }

    #[test]
    fn other_negative_choice_indices_are_rejected() {
        let err = CellValue::from_choice_index(-7).unwrap_err();
        assert!(matches!(err, EditError::InvalidChoiceIndex(-7)));
        assert!(err.is_fatal());

        let editor = ChoiceEditor::new(vec!["A".to_string()], true);
        assert!(matches!(
            editor.selection(-2),
            Err(EditError::InvalidChoiceIndex(-2))
        ));
        assert!(matches!(
            editor.selection(2),
            Err(EditError::ChoiceOutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn nullable_choice_editor_shifts_widget_indices() {
        let editor = ChoiceEditor::new(vec!["A".to_string(), "B".to_string()], true);
        assert_eq!(editor.items(), ["-", "A", "B"]);
        assert_eq!(editor.widget_index(None), 0);
        assert_eq!(editor.widget_index(Some(1)), 2);
        assert_eq!(editor.selection(0).unwrap(), CellValue::Choice(None));
        assert_eq!(editor.selection(2).unwrap(), CellValue::Choice(Some(1)));
        assert_eq!(editor.selection(-1).unwrap(), CellValue::Choice(None));

        let editor = ChoiceEditor::new(vec!["A".to_string()], false);
        assert_eq!(editor.widget_index(None), -1);
        assert_eq!(editor.selection(0).unwrap(), CellValue::Choice(Some(0)));
    }
}
