//! Reversible edits on a single record.
//!
//! An [`Operation`] is plain data: the target record id plus an [`Edit`] holding the
//! previous and next values. Applying either direction goes through the pure mutation
//! functions on [`Field`] and [`ListField`], after checking that the record still holds
//! the value being replaced, so a failed apply never leaves a partial mutation behind.

use crate::{ActionKind, CarrierPowerState, EditError, Record, RecordId, TextEncoding, statics};

/// A scalar or enumerated field of some record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    CarrierPowerState,
    CarrierDataReference,
    TextEncoding,
    TextLocale,
    Text,
    Uri,
    Action,
    MimeContentType,
    MimeContent,
}

/// Typed value of a [`Field`]; `None` is the unset state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(Option<String>),
    PowerState(Option<CarrierPowerState>),
    Encoding(Option<TextEncoding>),
    Action(Option<ActionKind>),
    Bytes(Option<Vec<u8>>),
}

impl FieldValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::PowerState(_) => "carrier power state",
            FieldValue::Encoding(_) => "text encoding",
            FieldValue::Action(_) => "action",
            FieldValue::Bytes(_) => "bytes",
        }
    }

    pub fn is_unset(&self) -> bool {
        match self {
            FieldValue::Text(v) => v.is_none(),
            FieldValue::PowerState(v) => v.is_none(),
            FieldValue::Encoding(v) => v.is_none(),
            FieldValue::Action(v) => v.is_none(),
            FieldValue::Bytes(v) => v.is_none(),
        }
    }

    /// Equality that treats an empty text as unset, the way editors display it.
    pub fn same_as(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => {
                a.as_deref().filter(|s| !s.is_empty()) == b.as_deref().filter(|s| !s.is_empty())
            }
            (a, b) => a == b,
        }
    }

    /// Short human-readable rendering for history descriptions.
    pub fn preview(&self) -> String {
        fn or_unset<T: ToString>(v: &Option<T>) -> String {
            v.as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| statics::EN_CHOICE_UNSET.to_string())
        }

        match self {
            FieldValue::Text(Some(s)) => format!("'{s}'"),
            FieldValue::Text(None) => statics::EN_CHOICE_UNSET.to_string(),
            FieldValue::PowerState(v) => or_unset(v),
            FieldValue::Encoding(v) => or_unset(v),
            FieldValue::Action(v) => or_unset(v),
            FieldValue::Bytes(Some(b)) => format!("{} bytes", b.len()),
            FieldValue::Bytes(None) => statics::EN_CHOICE_UNSET.to_string(),
        }
    }
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::CarrierPowerState => statics::EN_NODE_CARRIER_POWER_STATE,
            Field::CarrierDataReference => statics::EN_NODE_CARRIER_DATA_REFERENCE,
            Field::TextEncoding => statics::EN_NODE_ENCODING,
            Field::TextLocale => statics::EN_NODE_LOCALE,
            Field::Text => statics::EN_NODE_TEXT,
            Field::Uri => statics::EN_NODE_URI,
            Field::Action => statics::EN_NODE_ACTION,
            Field::MimeContentType => statics::EN_NODE_CONTENT_TYPE,
            Field::MimeContent => statics::EN_NODE_CONTENT,
        }
    }

    fn value_type(self) -> &'static str {
        match self {
            Field::CarrierPowerState => "carrier power state",
            Field::TextEncoding => "text encoding",
            Field::Action => "action",
            Field::MimeContent => "bytes",
            Field::CarrierDataReference
            | Field::TextLocale
            | Field::Text
            | Field::Uri
            | Field::MimeContentType => "text",
        }
    }

    pub fn read(self, record: &Record) -> Result<FieldValue, EditError> {
        let owned = |s: Option<&str>| s.map(str::to_string);
        Ok(match self {
            Field::CarrierPowerState => {
                FieldValue::PowerState(record.alternative_carrier()?.carrier_power_state())
            }
            Field::CarrierDataReference => {
                FieldValue::Text(owned(record.alternative_carrier()?.carrier_data_reference()))
            }
            Field::TextEncoding => FieldValue::Encoding(record.text()?.encoding()),
            Field::TextLocale => FieldValue::Text(owned(record.text()?.locale())),
            Field::Text => FieldValue::Text(owned(record.text()?.text())),
            Field::Uri => FieldValue::Text(owned(record.uri()?.uri())),
            Field::Action => FieldValue::Action(record.action()?.action()),
            Field::MimeContentType => FieldValue::Text(owned(record.mime()?.content_type())),
            Field::MimeContent => FieldValue::Bytes(record.mime()?.content().map(<[u8]>::to_vec)),
        })
    }

    /// Write `value` through the record's setter for this field.
    pub fn apply(self, record: &mut Record, value: &FieldValue) -> Result<(), EditError> {
        match (self, value) {
            (Field::CarrierPowerState, FieldValue::PowerState(v)) => {
                record.alternative_carrier_mut()?.set_carrier_power_state(*v)
            }
            (Field::CarrierDataReference, FieldValue::Text(v)) => record
                .alternative_carrier_mut()?
                .set_carrier_data_reference(v.clone()),
            (Field::TextEncoding, FieldValue::Encoding(v)) => record.text_mut()?.set_encoding(*v),
            (Field::TextLocale, FieldValue::Text(v)) => record.text_mut()?.set_locale(v.clone()),
            (Field::Text, FieldValue::Text(v)) => record.text_mut()?.set_text(v.clone()),
            (Field::Uri, FieldValue::Text(v)) => record.uri_mut()?.set_uri(v.clone()),
            (Field::Action, FieldValue::Action(v)) => record.action_mut()?.set_action(*v),
            (Field::MimeContentType, FieldValue::Text(v)) => {
                record.mime_mut()?.set_content_type(v.clone())
            }
            (Field::MimeContent, FieldValue::Bytes(v)) => record.mime_mut()?.set_content(v.clone()),
            (field, value) => {
                return Err(EditError::ValueType {
                    expected: field.value_type(),
                    found: value.type_name(),
                });
            }
        }
        Ok(())
    }
}

/// A list-valued field of some record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListField {
    AuxiliaryDataReferences,
}

impl ListField {
    pub fn label(self) -> &'static str {
        match self {
            ListField::AuxiliaryDataReferences => statics::EN_NODE_AUXILIARY_DATA_REFERENCES,
        }
    }

    pub fn len(self, record: &Record) -> Result<usize, EditError> {
        match self {
            ListField::AuxiliaryDataReferences => Ok(record
                .alternative_carrier()?
                .auxiliary_data_references()
                .len()),
        }
    }

    pub fn get(self, record: &Record, index: usize) -> Result<&str, EditError> {
        let len = self.len(record)?;
        let item = match self {
            ListField::AuxiliaryDataReferences => record
                .alternative_carrier()?
                .auxiliary_data_reference_at(index),
        };
        item.ok_or(EditError::ListIndexOutOfRange { index, len })
    }

    pub fn set(self, record: &mut Record, index: usize, value: String) -> Result<(), EditError> {
        match self {
            ListField::AuxiliaryDataReferences => record
                .alternative_carrier_mut()?
                .set_auxiliary_data_reference(index, value),
        }
    }

    pub fn insert(self, record: &mut Record, index: usize, value: String) -> Result<(), EditError> {
        match self {
            ListField::AuxiliaryDataReferences => record
                .alternative_carrier_mut()?
                .insert_auxiliary_data_reference(index, value),
        }
    }

    pub fn remove(self, record: &mut Record, index: usize) -> Result<String, EditError> {
        match self {
            ListField::AuxiliaryDataReferences => record
                .alternative_carrier_mut()?
                .remove_auxiliary_data_reference(index),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Key {
        previous: String,
        next: String,
    },
    Property {
        field: Field,
        previous: FieldValue,
        next: FieldValue,
    },
    /// Replace the item at `index`; the index is fixed when the edit is built.
    ListItem {
        list: ListField,
        index: usize,
        previous: String,
        next: String,
    },
    InsertListItem {
        list: ListField,
        index: usize,
        value: String,
    },
    RemoveListItem {
        list: ListField,
        index: usize,
        value: String,
    },
}

impl Edit {
    fn apply(&self, record: &mut Record, forward: bool) -> Result<(), EditError> {
        let id = record.id();
        let stale = |what: String| EditError::StaleOperation {
            record: id,
            description: format!("{what} no longer holds the expected value"),
        };

        match self {
            Edit::Key { previous, next } => {
                let (expected, target) = if forward { (previous, next) } else { (next, previous) };
                if record.key() != expected {
                    return Err(stale("record key".to_string()));
                }
                record.set_key(target.clone());
            }
            Edit::Property {
                field,
                previous,
                next,
            } => {
                let (expected, target) = if forward { (previous, next) } else { (next, previous) };
                if field.read(record)? != *expected {
                    return Err(stale(format!("'{}'", field.label())));
                }
                field.apply(record, target)?;
            }
            Edit::ListItem {
                list,
                index,
                previous,
                next,
            } => {
                let (expected, target) = if forward { (previous, next) } else { (next, previous) };
                if list.get(record, *index)? != expected {
                    return Err(stale(format!("'{}' [{index}]", list.label())));
                }
                list.set(record, *index, target.clone())?;
            }
            Edit::InsertListItem { list, index, value } => {
                if forward {
                    list.insert(record, *index, value.clone())?;
                } else {
                    if list.get(record, *index)? != value {
                        return Err(stale(format!("'{}' [{index}]", list.label())));
                    }
                    list.remove(record, *index)?;
                }
            }
            Edit::RemoveListItem { list, index, value } => {
                if forward {
                    if list.get(record, *index)? != value {
                        return Err(stale(format!("'{}' [{index}]", list.label())));
                    }
                    list.remove(record, *index)?;
                } else {
                    list.insert(record, *index, value.clone())?;
                }
            }
        }
        Ok(())
    }

    pub fn description(&self) -> String {
        match self {
            Edit::Key { previous, next } => format!("Set key '{previous}' -> '{next}'"),
            Edit::Property {
                field,
                previous,
                next,
            } => {
                if next.is_unset() {
                    format!("Cleared '{}'", field.label())
                } else {
                    format!(
                        "Updated '{}': {} -> {}",
                        field.label(),
                        previous.preview(),
                        next.preview()
                    )
                }
            }
            Edit::ListItem {
                list,
                index,
                previous,
                next,
            } => format!("Updated '{}' [{index}]: '{previous}' -> '{next}'", list.label()),
            Edit::InsertListItem { list, index, .. } => {
                format!("Added '{}' [{index}]", list.label())
            }
            Edit::RemoveListItem { list, index, .. } => {
                format!("Removed '{}' [{index}]", list.label())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    Pending,
    Executed,
    Revoked,
}

impl OperationState {
    fn as_str(self) -> &'static str {
        match self {
            OperationState::Pending => "pending",
            OperationState::Executed => "executed",
            OperationState::Revoked => "revoked",
        }
    }
}

/// The unit of undo history: one reversible edit on one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    target: RecordId,
    edit: Edit,
    state: OperationState,
}

impl Operation {
    pub fn new(target: RecordId, edit: Edit) -> Self {
        Self {
            target,
            edit,
            state: OperationState::Pending,
        }
    }

    pub fn target(&self) -> RecordId {
        self.target
    }

    pub fn edit(&self) -> &Edit {
        &self.edit
    }

    pub fn state(&self) -> OperationState {
        self.state
    }

    pub fn description(&self) -> String {
        self.edit.description()
    }

    /// Apply the next value. Valid on a pending or revoked operation.
    pub fn execute(&mut self, record: &mut Record) -> Result<(), EditError> {
        if self.state == OperationState::Executed {
            return Err(EditError::OutOfSequence {
                action: "execute",
                state: self.state.as_str(),
            });
        }
        self.check_target(record)?;
        self.edit.apply(record, true)?;
        self.state = OperationState::Executed;
        Ok(())
    }

    /// Restore the previous value. Valid on an executed operation only.
    pub fn revoke(&mut self, record: &mut Record) -> Result<(), EditError> {
        if self.state != OperationState::Executed {
            return Err(EditError::OutOfSequence {
                action: "revoke",
                state: self.state.as_str(),
            });
        }
        self.check_target(record)?;
        self.edit.apply(record, false)?;
        self.state = OperationState::Revoked;
        Ok(())
    }

    fn check_target(&self, record: &Record) -> Result<(), EditError> {
        if record.id() != self.target {
            return Err(EditError::TargetMismatch {
                expected: self.target,
                actual: record.id(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RecordBody, RecordType};

    fn carrier(id: u64, items: &[&str]) -> Record {
        let mut record = Record::new(
            RecordId::new(id),
            "ac",
            RecordBody::empty(RecordType::AlternativeCarrier),
        );
        let ac = record.alternative_carrier_mut().unwrap();
        for (i, item) in items.iter().enumerate() {
            ac.insert_auxiliary_data_reference(i, item.to_string())
                .unwrap();
        }
        record
    }

    #[test]
    fn empty_text_is_the_same_as_unset() {
        let empty = FieldValue::Text(Some(String::new()));
        assert!(empty.same_as(&FieldValue::Text(None)));
        assert!(!empty.same_as(&FieldValue::Text(Some("x".to_string()))));
        assert!(!FieldValue::Bytes(Some(Vec::new())).same_as(&FieldValue::Bytes(None)));
    }

    #[test]
    fn execute_revoke_execute_round_trips() {
        let mut record = carrier(1, &[]);
        let mut op = Operation::new(
            record.id(),
            Edit::Property {
                field: Field::CarrierPowerState,
                previous: FieldValue::PowerState(None),
                next: FieldValue::PowerState(Some(CarrierPowerState::Activating)),
            },
        );

        for _ in 0..2 {
            op.execute(&mut record).unwrap();
            assert_eq!(
                record.alternative_carrier().unwrap().carrier_power_state(),
                Some(CarrierPowerState::Activating)
            );
            op.revoke(&mut record).unwrap();
            assert_eq!(
                record.alternative_carrier().unwrap().carrier_power_state(),
                None
            );
        }
    }

    #[test]
    fn out_of_sequence_calls_are_rejected() {
        let mut record = carrier(1, &[]);
        let mut op = Operation::new(
            record.id(),
            Edit::Key {
                previous: "ac".to_string(),
                next: "b".to_string(),
            },
        );

        assert!(matches!(
            op.revoke(&mut record),
            Err(EditError::OutOfSequence {
                action: "revoke",
                state: "pending"
            })
        ));
        op.execute(&mut record).unwrap();
        assert!(matches!(
            op.execute(&mut record),
            Err(EditError::OutOfSequence { .. })
        ));
        assert_eq!(record.key(), "b");
    }

    #[test]
    fn wrong_target_leaves_record_untouched() {
        let mut other = carrier(2, &[]);
        let mut op = Operation::new(
            RecordId::new(1),
            Edit::Key {
                previous: "ac".to_string(),
                next: "b".to_string(),
            },
        );
        assert!(matches!(
            op.execute(&mut other),
            Err(EditError::TargetMismatch { .. })
        ));
        assert_eq!(other.key(), "ac");
        assert_eq!(op.state(), OperationState::Pending);
    }

    #[test]
    fn mismatched_value_type_is_rejected_before_mutation() {
        let mut record = carrier(1, &[]);
        let err = Field::CarrierPowerState
            .apply(&mut record, &FieldValue::Text(Some("x".to_string())))
            .unwrap_err();
        assert!(matches!(
            err,
            EditError::ValueType {
                expected: "carrier power state",
                found: "text"
            }
        ));
    }

    #[test]
    fn list_item_edit_detects_shifted_items() {
        let mut record = carrier(1, &["a", "b", "c"]);
        let mut op = Operation::new(
            record.id(),
            Edit::ListItem {
                list: ListField::AuxiliaryDataReferences,
                index: 2,
                previous: "c".to_string(),
                next: "z".to_string(),
            },
        );
        op.execute(&mut record).unwrap();

        // Someone removed an earlier item behind the operation's back.
        ListField::AuxiliaryDataReferences
            .remove(&mut record, 0)
            .unwrap();

        assert!(matches!(
            op.revoke(&mut record),
            Err(EditError::ListIndexOutOfRange { index: 2, len: 2 })
        ));
        assert_eq!(
            record.alternative_carrier().unwrap().auxiliary_data_references(),
            ["b", "z"]
        );
    }

    #[test]
    fn insert_and_remove_are_inverse() {
        let mut record = carrier(1, &["a", "c"]);
        let mut insert = Operation::new(
            record.id(),
            Edit::InsertListItem {
                list: ListField::AuxiliaryDataReferences,
                index: 1,
                value: "b".to_string(),
            },
        );
        insert.execute(&mut record).unwrap();
        assert_eq!(
            record.alternative_carrier().unwrap().auxiliary_data_references(),
            ["a", "b", "c"]
        );

        let mut remove = Operation::new(
            record.id(),
            Edit::RemoveListItem {
                list: ListField::AuxiliaryDataReferences,
                index: 0,
                value: "b".to_string(),
            },
        );
        assert!(matches!(
            remove.execute(&mut record),
            Err(EditError::StaleOperation { .. })
        ));

        insert.revoke(&mut record).unwrap();
        assert_eq!(
            record.alternative_carrier().unwrap().auxiliary_data_references(),
            ["a", "c"]
        );
    }

    #[test]
    fn descriptions_name_the_field() {
        let edit = Edit::Property {
            field: Field::Uri,
            previous: FieldValue::Text(None),
            next: FieldValue::Text(Some("https://example.com".to_string())),
        };
        assert_eq!(
            edit.description(),
            "Updated 'URI': - -> 'https://example.com'"
        );

        let edit = Edit::Property {
            field: Field::Action,
            previous: FieldValue::Action(Some(ActionKind::SaveForLater)),
            next: FieldValue::Action(None),
        };
        assert_eq!(edit.description(), "Cleared 'Action'");
    }
}
