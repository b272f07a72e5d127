use super::{
    CellEditor, CellValue, DefaultRecordEditingSupport, RecordEditingSupport, choice_editor,
    decode_choice, list_item_edit, property_edit, text_or_unset, unsupported,
};
use crate::{
    CarrierPowerState, EditError, Enumerated, NodeKind, Record, TreeNode,
    node::slot,
    operation::{Field, FieldValue, ListField, Operation},
};

/// Alternative Carrier: power state, data reference and the auxiliary data reference list.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlternativeCarrierEditingSupport {
    base: DefaultRecordEditingSupport,
}

impl RecordEditingSupport for AlternativeCarrierEditingSupport {
    fn value(&self, record: &Record, node: &TreeNode) -> Result<CellValue, EditError> {
        match node.kind() {
            NodeKind::Property => {
                let ac = record.alternative_carrier()?;
                match node.parent_index() {
                    slot::CARRIER_POWER_STATE => Ok(CellValue::Choice(
                        ac.carrier_power_state().map(Enumerated::ordinal),
                    )),
                    slot::CARRIER_DATA_REFERENCE => Ok(CellValue::Text(
                        ac.carrier_data_reference().unwrap_or_default().to_string(),
                    )),
                    _ => Err(unsupported(node)),
                }
            }
            NodeKind::PropertyListItem => {
                let item = ListField::AuxiliaryDataReferences.get(record, node.parent_index())?;
                Ok(CellValue::Text(item.to_string()))
            }
            NodeKind::Record | NodeKind::ParentProperty | NodeKind::PropertyList => {
                self.base.value(record, node)
            }
        }
    }

    fn set_value(
        &self,
        record: &Record,
        node: &TreeNode,
        value: CellValue,
    ) -> Result<Option<Operation>, EditError> {
        match node.kind() {
            NodeKind::Property => match node.parent_index() {
                slot::CARRIER_POWER_STATE => {
                    let next = decode_choice::<CarrierPowerState>(value.into_choice()?)?;
                    property_edit(
                        record,
                        Field::CarrierPowerState,
                        FieldValue::PowerState(next),
                    )
                }
                slot::CARRIER_DATA_REFERENCE => {
                    let next = text_or_unset(value.into_text()?);
                    property_edit(record, Field::CarrierDataReference, FieldValue::Text(next))
                }
                _ => Err(unsupported(node)),
            },
            NodeKind::PropertyListItem => list_item_edit(
                record,
                ListField::AuxiliaryDataReferences,
                node.parent_index(),
                value.into_text()?,
            ),
            NodeKind::Record | NodeKind::ParentProperty | NodeKind::PropertyList => {
                self.base.set_value(record, node, value)
            }
        }
    }

    fn cell_editor(
        &self,
        record: &Record,
        node: &TreeNode,
    ) -> Result<Option<CellEditor>, EditError> {
        match node.kind() {
            NodeKind::Property => match node.parent_index() {
                slot::CARRIER_POWER_STATE => {
                    Ok(Some(choice_editor(CarrierPowerState::VALUES, true)))
                }
                slot::CARRIER_DATA_REFERENCE => Ok(Some(CellEditor::Text)),
                _ => Err(unsupported(node)),
            },
            NodeKind::PropertyListItem => Ok(Some(CellEditor::Text)),
            NodeKind::Record | NodeKind::ParentProperty | NodeKind::PropertyList => {
                self.base.cell_editor(record, node)
            }
        }
    }

    fn list_field(&self, node: &TreeNode) -> Result<ListField, EditError> {
        match (node.kind(), node.parent_index()) {
            (NodeKind::PropertyList, slot::AUXILIARY_DATA_REFERENCES)
            | (NodeKind::PropertyListItem, _) => Ok(ListField::AuxiliaryDataReferences),
            _ => Err(unsupported(node)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RecordBody, RecordId, RecordType, build_tree};

    fn record() -> Record {
        let mut record = Record::new(
            RecordId::new(9),
            "ac",
            RecordBody::empty(RecordType::AlternativeCarrier),
        );
        let ac = record.alternative_carrier_mut().unwrap();
        ac.insert_auxiliary_data_reference(0, "a".to_string())
            .unwrap();
        ac.insert_auxiliary_data_reference(1, "b".to_string())
            .unwrap();
        record
    }

    #[test]
    fn unset_fields_show_empty_sentinels() {
        let record = record();
        let tree = build_tree(&record, 0);
        let support = AlternativeCarrierEditingSupport::default();

        let power = tree
            .find(NodeKind::Property, slot::CARRIER_POWER_STATE)
            .unwrap();
        let reference = tree
            .find(NodeKind::Property, slot::CARRIER_DATA_REFERENCE)
            .unwrap();
        assert_eq!(support.value(&record, power).unwrap(), CellValue::Choice(None));
        assert_eq!(
            support.value(&record, reference).unwrap(),
            CellValue::Text(String::new())
        );
    }

    #[test]
    fn empty_text_on_unset_field_is_unchanged() {
        let record = record();
        let tree = build_tree(&record, 0);
        let reference = tree
            .find(NodeKind::Property, slot::CARRIER_DATA_REFERENCE)
            .unwrap();
        let op = AlternativeCarrierEditingSupport::default()
            .set_value(&record, reference, CellValue::Text(String::new()))
            .unwrap();
        assert!(op.is_none());
    }

    #[test]
    fn list_container_has_no_editor_and_is_not_editable() {
        let record = record();
        let tree = build_tree(&record, 0);
        let list = tree
            .find(NodeKind::PropertyList, slot::AUXILIARY_DATA_REFERENCES)
            .unwrap();
        let support = AlternativeCarrierEditingSupport::default();
        assert!(!support.can_edit(list));
        assert_eq!(support.cell_editor(&record, list).unwrap(), None);
        assert!(support.can_edit(&list.children()[0]));
    }

    #[test]
    fn unknown_slot_is_a_dispatch_error() {
        let record = record();
        let bogus = TreeNode::new(
            record.id(),
            RecordType::AlternativeCarrier,
            NodeKind::Property,
            7,
            "bogus",
        );
        let support = AlternativeCarrierEditingSupport::default();
        assert!(matches!(
            support.value(&record, &bogus),
            Err(EditError::UnsupportedNode { index: 7, .. })
        ));
        assert!(matches!(
            support.set_value(&record, &bogus, CellValue::Text("x".to_string())),
            Err(EditError::UnsupportedNode { .. })
        ));
        assert!(matches!(
            support.cell_editor(&record, &bogus),
            Err(EditError::UnsupportedNode { .. })
        ));
    }

    #[test]
    fn out_of_range_choice_fails_closed() {
        let record = record();
        let tree = build_tree(&record, 0);
        let power = tree
            .find(NodeKind::Property, slot::CARRIER_POWER_STATE)
            .unwrap();
        assert!(matches!(
            AlternativeCarrierEditingSupport::default().set_value(
                &record,
                power,
                CellValue::Choice(Some(4))
            ),
            Err(EditError::ChoiceOutOfRange { index: 4, len: 4 })
        ));
    }
}
