use super::{
    CellEditor, CellValue, DefaultRecordEditingSupport, RecordEditingSupport, choice_editor,
    decode_choice, property_edit, text_or_unset, unsupported,
};
use crate::{
    EditError, Enumerated, NodeKind, Record, TextEncoding, TreeNode,
    node::slot,
    operation::{Field, FieldValue, Operation},
};

#[derive(Debug, Clone, Copy, Default)]
pub struct TextEditingSupport {
    base: DefaultRecordEditingSupport,
}

impl TextEditingSupport {
    fn text_field(node: &TreeNode) -> Result<Field, EditError> {
        match node.parent_index() {
            slot::TEXT_LOCALE => Ok(Field::TextLocale),
            slot::TEXT => Ok(Field::Text),
            _ => Err(unsupported(node)),
        }
    }
}

impl RecordEditingSupport for TextEditingSupport {
    fn value(&self, record: &Record, node: &TreeNode) -> Result<CellValue, EditError> {
        match node.kind() {
            NodeKind::Property => {
                let text = record.text()?;
                let value = match node.parent_index() {
                    slot::TEXT_ENCODING => {
                        return Ok(CellValue::Choice(text.encoding().map(Enumerated::ordinal)));
                    }
                    slot::TEXT_LOCALE => text.locale(),
                    slot::TEXT => text.text(),
                    _ => return Err(unsupported(node)),
                };
                Ok(CellValue::Text(value.unwrap_or_default().to_string()))
            }
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
            NodeKind::Property if node.parent_index() == slot::TEXT_ENCODING => {
                let next = decode_choice::<TextEncoding>(value.into_choice()?)?;
                property_edit(record, Field::TextEncoding, FieldValue::Encoding(next))
            }
            NodeKind::Property => {
                let field = Self::text_field(node)?;
                let next = text_or_unset(value.into_text()?);
                property_edit(record, field, FieldValue::Text(next))
            }
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
            NodeKind::Property if node.parent_index() == slot::TEXT_ENCODING => {
                Ok(Some(choice_editor(TextEncoding::VALUES, true)))
            }
            NodeKind::Property => Self::text_field(node).map(|_| Some(CellEditor::Text)),
            NodeKind::Record
            | NodeKind::ParentProperty
            | NodeKind::PropertyList
            | NodeKind::PropertyListItem => self.base.cell_editor(record, node),
        }
    }
}
