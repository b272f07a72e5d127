use super::{
    CellEditor, CellValue, DefaultRecordEditingSupport, RecordEditingSupport, choice_editor,
    decode_choice, property_edit, unsupported,
};
use crate::{
    ActionKind, EditError, Enumerated, NodeKind, Record, TreeNode,
    node::slot,
    operation::{Field, FieldValue, Operation},
};

#[derive(Debug, Clone, Copy, Default)]
pub struct ActionEditingSupport {
    base: DefaultRecordEditingSupport,
}

impl RecordEditingSupport for ActionEditingSupport {
    fn value(&self, record: &Record, node: &TreeNode) -> Result<CellValue, EditError> {
        match node.kind() {
            NodeKind::Property if node.parent_index() == slot::ACTION => Ok(CellValue::Choice(
                record.action()?.action().map(Enumerated::ordinal),
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
            NodeKind::Property if node.parent_index() == slot::ACTION => {
                let next = decode_choice::<ActionKind>(value.into_choice()?)?;
                property_edit(record, Field::Action, FieldValue::Action(next))
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
            NodeKind::Property if node.parent_index() == slot::ACTION => {
                Ok(Some(choice_editor(ActionKind::VALUES, true)))
            }
            NodeKind::Property => Err(unsupported(node)),
            NodeKind::Record
            | NodeKind::ParentProperty
            | NodeKind::PropertyList
            | NodeKind::PropertyListItem => self.base.cell_editor(record, node),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RecordBody, RecordId, RecordType, build_tree};

    #[test]
    fn selecting_then_unsetting_action() {
        let mut record = Record::new(RecordId::new(2), "", RecordBody::empty(RecordType::Action));
        let tree = build_tree(&record, 0);
        let node = tree.find(NodeKind::Property, slot::ACTION).unwrap();
        let support = ActionEditingSupport::default();

        let mut op = support
            .set_value(&record, node, CellValue::from_choice_index(1).unwrap())
            .unwrap()
            .unwrap();
        op.execute(&mut record).unwrap();
        assert_eq!(
            record.action().unwrap().action(),
            Some(ActionKind::SaveForLater)
        );

        let mut op = support
            .set_value(&record, node, CellValue::from_choice_index(-1).unwrap())
            .unwrap()
            .unwrap();
        op.execute(&mut record).unwrap();
        assert_eq!(support.value(&record, node).unwrap(), CellValue::Choice(None));
    }
}
