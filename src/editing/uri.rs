use super::{
    CellEditor, CellValue, DefaultRecordEditingSupport, RecordEditingSupport, property_edit,
    text_or_unset, unsupported,
};
use crate::{
    EditError, NodeKind, Record, TreeNode,
    node::slot,
    operation::{Field, FieldValue, Operation},
};

#[derive(Debug, Clone, Copy, Default)]
pub struct UriEditingSupport {
    base: DefaultRecordEditingSupport,
}

impl RecordEditingSupport for UriEditingSupport {
    fn value(&self, record: &Record, node: &TreeNode) -> Result<CellValue, EditError> {
        match node.kind() {
            NodeKind::Property if node.parent_index() == slot::URI => Ok(CellValue::Text(
                record.uri()?.uri().unwrap_or_default().to_string(),
            )),
            NodeKind::Property => Err(unsupported(node)),
            NodeKind::Record
            | NodeKind::ParentProperty
            | NodeKind::PropertyList
            | NodeKind::PropertyListItem => self.base.value(record, node),
        }
    }

    fn set_value(
        &self,
        record: &Record,
        node: &TreeNode,
        value: CellValue,
    ) -> Result<Option<Operation>, EditError> {
        match node.kind() {
            NodeKind::Property if node.parent_index() == slot::URI => {
                let next = text_or_unset(value.into_text()?);
                property_edit(record, Field::Uri, FieldValue::Text(next))
            }
            NodeKind::Property => Err(unsupported(node)),
            NodeKind::Record
            | NodeKind::ParentProperty
            | NodeKind::PropertyList
            | NodeKind::PropertyListItem => self.base.set_value(record, node, value),
        }
    }

    fn cell_editor(
        &self,
        record: &Record,
        node: &TreeNode,
    ) -> Result<Option<CellEditor>, EditError> {
        match node.kind() {
            NodeKind::Property if node.parent_index() == slot::URI => Ok(Some(CellEditor::Text)),
            NodeKind::Property => Err(unsupported(node)),
            NodeKind::Record
            | NodeKind::ParentProperty
            | NodeKind::PropertyList
            | NodeKind::PropertyListItem => self.base.cell_editor(record, node),
        }
    }
}
