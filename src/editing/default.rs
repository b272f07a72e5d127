use super::{CellEditor, CellValue, ChoiceEditor, RecordEditingSupport, unsupported};
use crate::{
    EditError, NodeKind, Record, RecordType, TreeNode,
    operation::{Edit, Operation},
};
use std::fmt::Display;

/// Editing shared by all record types: the record key on the record node.
/// Every other node is rejected, record-specific supports handle those first.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRecordEditingSupport;

impl RecordEditingSupport for DefaultRecordEditingSupport {
    fn value(&self, record: &Record, node: &TreeNode) -> Result<CellValue, EditError> {
        match node.kind() {
            NodeKind::Record => Ok(CellValue::Text(record.key().to_string())),
            NodeKind::ParentProperty
            | NodeKind::Property
            | NodeKind::PropertyList
            | NodeKind::PropertyListItem => Err(unsupported(node)),
        }
    }

    fn set_value(
        &self,
        record: &Record,
        node: &TreeNode,
        value: CellValue,
    ) -> Result<Option<Operation>, EditError> {
        match node.kind() {
            NodeKind::Record => {
                let key = value.into_text()?;
                if key == record.key() {
                    return Ok(None);
                }
                Ok(Some(Operation::new(
                    record.id(),
                    Edit::Key {
                        previous: record.key().to_string(),
                        next: key,
                    },
                )))
            }
            NodeKind::ParentProperty
            | NodeKind::Property
            | NodeKind::PropertyList
            | NodeKind::PropertyListItem => Err(unsupported(node)),
        }
    }

    fn cell_editor(
        &self,
        _record: &Record,
        node: &TreeNode,
    ) -> Result<Option<CellEditor>, EditError> {
        match node.kind() {
            NodeKind::Record => Ok(Some(CellEditor::Text)),
            NodeKind::PropertyList => Ok(None),
            NodeKind::ParentProperty | NodeKind::Property | NodeKind::PropertyListItem => {
                Err(unsupported(node))
            }
        }
    }
}

/// Choice editor listing `values` by their display text.
pub fn choice_editor<T: Display>(values: &[T], nullable: bool) -> CellEditor {
    CellEditor::Choice(ChoiceEditor::new(
        values.iter().map(ToString::to_string).collect(),
        nullable,
    ))
}

/// Choice editor listing record types by their human-readable label.
pub fn record_type_choice_editor(types: &[RecordType], nullable: bool) -> CellEditor {
    let labels: Vec<&str> = types.iter().map(|t| t.record_label()).collect();
    choice_editor(&labels, nullable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RecordBody, RecordId, build_tree};

    fn uri_record() -> Record {
        Record::new(RecordId::new(1), "rec1", RecordBody::empty(RecordType::Uri))
    }

    #[test]
    fn key_edit_builds_operation_without_executing_it() {
        let record = uri_record();
        let tree = build_tree(&record, 0);
        let support = DefaultRecordEditingSupport;

        assert_eq!(
            support.value(&record, &tree).unwrap(),
            CellValue::Text("rec1".to_string())
        );
        let op = support
            .set_value(&record, &tree, CellValue::Text("rec2".to_string()))
            .unwrap()
            .unwrap();
        assert_eq!(
            op.edit(),
            &Edit::Key {
                previous: "rec1".to_string(),
                next: "rec2".to_string()
            }
        );
        assert_eq!(record.key(), "rec1");

        assert!(
            support
                .set_value(&record, &tree, CellValue::Text("rec1".to_string()))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn key_edit_rejects_choice_values() {
        let record = uri_record();
        let tree = build_tree(&record, 0);
        assert!(matches!(
            DefaultRecordEditingSupport.set_value(&record, &tree, CellValue::Choice(Some(0))),
            Err(EditError::ValueType {
                expected: "text",
                found: "choice"
            })
        ));
    }

    #[test]
    fn property_nodes_are_rejected() {
        let record = uri_record();
        let tree = build_tree(&record, 0);
        let property = &tree.children()[0];
        let support = DefaultRecordEditingSupport;
        assert!(matches!(
            support.value(&record, property),
            Err(EditError::UnsupportedNode { .. })
        ));
        assert!(matches!(
            support.cell_editor(&record, property),
            Err(EditError::UnsupportedNode { .. })
        ));
    }

    #[test]
    fn choice_helpers_label_values() {
        let CellEditor::Choice(editor) = record_type_choice_editor(&RecordType::ALL, false) else {
            panic!("expected a choice editor");
        };
        assert_eq!(editor.items()[0], "Alternative Carrier Record");
        assert_eq!(editor.items().len(), RecordType::ALL.len());

        let CellEditor::Choice(editor) = choice_editor(&["x", "y"], true) else {
            panic!("expected a choice editor");
        };
        assert_eq!(editor.items(), ["-", "x", "y"]);
    }
}
