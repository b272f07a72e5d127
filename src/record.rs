//! NDEF records as edited through the tree.
//! Each record type exposes typed getters/setters, `has_*` presence predicates for
//! nullable fields and index-addressed accessors for list-valued fields.

use crate::{EditError, statics};
use std::fmt;

/// Identifies a record inside a [`crate::RecordDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(u64);

impl RecordId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A small, fixed, ordered value domain edited through a choice editor.
pub trait Enumerated: Copy + Eq + fmt::Display + 'static {
    /// All values, in declaration order.
    const VALUES: &'static [Self];

    fn ordinal(self) -> usize;

    /// Stable name used by the record document format.
    fn as_str(self) -> &'static str;

    fn from_ordinal(index: usize) -> Option<Self> {
        Self::VALUES.get(index).copied()
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::VALUES.iter().copied().find(|v| v.as_str() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    AlternativeCarrier,
    Text,
    Uri,
    Action,
    Mime,
}

impl RecordType {
    pub const ALL: [RecordType; 5] = [
        RecordType::AlternativeCarrier,
        RecordType::Text,
        RecordType::Uri,
        RecordType::Action,
        RecordType::Mime,
    ];

    pub fn record_label(self) -> &'static str {
        match self {
            RecordType::AlternativeCarrier => statics::EN_RECORD_ALTERNATIVE_CARRIER,
            RecordType::Text => statics::EN_RECORD_TEXT,
            RecordType::Uri => statics::EN_RECORD_URI,
            RecordType::Action => statics::EN_RECORD_ACTION,
            RecordType::Mime => statics::EN_RECORD_MIME,
        }
    }

    /// Stable name used by the record document format.
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::AlternativeCarrier => "alternative-carrier",
            RecordType::Text => "text",
            RecordType::Uri => "uri",
            RecordType::Action => "action",
            RecordType::Mime => "mime",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.record_label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CarrierPowerState {
    Inactive,
    Active,
    Activating,
    Unknown,
}

impl Enumerated for CarrierPowerState {
    const VALUES: &'static [Self] = &[
        CarrierPowerState::Inactive,
        CarrierPowerState::Active,
        CarrierPowerState::Activating,
        CarrierPowerState::Unknown,
    ];

    fn ordinal(self) -> usize {
        self as usize
    }

    fn as_str(self) -> &'static str {
        match self {
            CarrierPowerState::Inactive => "inactive",
            CarrierPowerState::Active => "active",
            CarrierPowerState::Activating => "activating",
            CarrierPowerState::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CarrierPowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CarrierPowerState::Inactive => "Inactive",
            CarrierPowerState::Active => "Active",
            CarrierPowerState::Activating => "Activating",
            CarrierPowerState::Unknown => "Unknown",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    Utf8,
    Utf16,
}

impl Enumerated for TextEncoding {
    const VALUES: &'static [Self] = &[TextEncoding::Utf8, TextEncoding::Utf16];

    fn ordinal(self) -> usize {
        self as usize
    }

    fn as_str(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Utf16 => "utf-16",
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::Utf16 => "UTF-16",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    DefaultAction,
    SaveForLater,
    OpenForEditing,
}

impl Enumerated for ActionKind {
    const VALUES: &'static [Self] = &[
        ActionKind::DefaultAction,
        ActionKind::SaveForLater,
        ActionKind::OpenForEditing,
    ];

    fn ordinal(self) -> usize {
        self as usize
    }

    fn as_str(self) -> &'static str {
        match self {
            ActionKind::DefaultAction => "default-action",
            ActionKind::SaveForLater => "save-for-later",
            ActionKind::OpenForEditing => "open-for-editing",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActionKind::DefaultAction => "Default action",
            ActionKind::SaveForLater => "Save for later",
            ActionKind::OpenForEditing => "Open for editing",
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlternativeCarrierRecord {
    carrier_power_state: Option<CarrierPowerState>,
    carrier_data_reference: Option<String>,
    auxiliary_data_references: Vec<String>,
}

impl AlternativeCarrierRecord {
    pub fn carrier_power_state(&self) -> Option<CarrierPowerState> {
        self.carrier_power_state
    }

    pub fn has_carrier_power_state(&self) -> bool {
        self.carrier_power_state.is_some()
    }

    pub fn set_carrier_power_state(&mut self, state: Option<CarrierPowerState>) {
        self.carrier_power_state = state;
    }

    pub fn carrier_data_reference(&self) -> Option<&str> {
        self.carrier_data_reference.as_deref()
    }

    pub fn has_carrier_data_reference(&self) -> bool {
        self.carrier_data_reference.is_some()
    }

    pub fn set_carrier_data_reference(&mut self, reference: Option<String>) {
        self.carrier_data_reference = reference;
    }

    pub fn auxiliary_data_references(&self) -> &[String] {
        &self.auxiliary_data_references
    }

    pub fn auxiliary_data_reference_at(&self, index: usize) -> Option<&str> {
        self.auxiliary_data_references.get(index).map(String::as_str)
    }

    pub fn set_auxiliary_data_reference(
        &mut self,
        index: usize,
        reference: String,
    ) -> Result<(), EditError> {
        let len = self.auxiliary_data_references.len();
        let slot = self
            .auxiliary_data_references
            .get_mut(index)
            .ok_or(EditError::ListIndexOutOfRange { index, len })?;
        *slot = reference;
        Ok(())
    }

    pub fn insert_auxiliary_data_reference(
        &mut self,
        index: usize,
        reference: String,
    ) -> Result<(), EditError> {
        let len = self.auxiliary_data_references.len();
        if index > len {
            return Err(EditError::ListIndexOutOfRange { index, len });
        }
        self.auxiliary_data_references.insert(index, reference);
        Ok(())
    }

    pub fn remove_auxiliary_data_reference(&mut self, index: usize) -> Result<String, EditError> {
        let len = self.auxiliary_data_references.len();
        if index >= len {
            return Err(EditError::ListIndexOutOfRange { index, len });
        }
        Ok(self.auxiliary_data_references.remove(index))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextRecord {
    encoding: Option<TextEncoding>,
    locale: Option<String>,
    text: Option<String>,
}

impl TextRecord {
    pub fn encoding(&self) -> Option<TextEncoding> {
        self.encoding
    }

    pub fn has_encoding(&self) -> bool {
        self.encoding.is_some()
    }

    pub fn set_encoding(&mut self, encoding: Option<TextEncoding>) {
        self.encoding = encoding;
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    pub fn has_locale(&self) -> bool {
        self.locale.is_some()
    }

    pub fn set_locale(&mut self, locale: Option<String>) {
        self.locale = locale;
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn has_text(&self) -> bool {
        self.text.is_some()
    }

    pub fn set_text(&mut self, text: Option<String>) {
        self.text = text;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UriRecord {
    uri: Option<String>,
}

impl UriRecord {
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    pub fn has_uri(&self) -> bool {
        self.uri.is_some()
    }

    pub fn set_uri(&mut self, uri: Option<String>) {
        self.uri = uri;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionRecord {
    action: Option<ActionKind>,
}

impl ActionRecord {
    pub fn action(&self) -> Option<ActionKind> {
        self.action
    }

    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }

    pub fn set_action(&mut self, action: Option<ActionKind>) {
        self.action = action;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MimeRecord {
    content_type: Option<String>,
    content: Option<Vec<u8>>,
}

impl MimeRecord {
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn has_content_type(&self) -> bool {
        self.content_type.is_some()
    }

    pub fn set_content_type(&mut self, content_type: Option<String>) {
        self.content_type = content_type;
    }

    pub fn content(&self) -> Option<&[u8]> {
        self.content.as_deref()
    }

    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }

    pub fn set_content(&mut self, content: Option<Vec<u8>>) {
        self.content = content;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordBody {
    AlternativeCarrier(AlternativeCarrierRecord),
    Text(TextRecord),
    Uri(UriRecord),
    Action(ActionRecord),
    Mime(MimeRecord),
}

impl RecordBody {
    pub fn empty(record_type: RecordType) -> Self {
        match record_type {
            RecordType::AlternativeCarrier => {
                RecordBody::AlternativeCarrier(AlternativeCarrierRecord::default())
            }
            RecordType::Text => RecordBody::Text(TextRecord::default()),
            RecordType::Uri => RecordBody::Uri(UriRecord::default()),
            RecordType::Action => RecordBody::Action(ActionRecord::default()),
            RecordType::Mime => RecordBody::Mime(MimeRecord::default()),
        }
    }

    pub fn record_type(&self) -> RecordType {
        match self {
            RecordBody::AlternativeCarrier(_) => RecordType::AlternativeCarrier,
            RecordBody::Text(_) => RecordType::Text,
            RecordBody::Uri(_) => RecordType::Uri,
            RecordBody::Action(_) => RecordType::Action,
            RecordBody::Mime(_) => RecordType::Mime,
        }
    }
}

/// A record open for editing: a key plus a typed body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    id: RecordId,
    key: String,
    body: RecordBody,
}

macro_rules! body_accessors {
    ($get:ident, $get_mut:ident, $variant:ident, $ty:ty) => {
        pub fn $get(&self) -> Result<&$ty, EditError> {
            match &self.body {
                RecordBody::$variant(body) => Ok(body),
                other => Err(EditError::RecordTypeMismatch {
                    expected: RecordType::$variant,
                    actual: other.record_type(),
                }),
            }
        }

        pub fn $get_mut(&mut self) -> Result<&mut $ty, EditError> {
            match &mut self.body {
                RecordBody::$variant(body) => Ok(body),
                other => Err(EditError::RecordTypeMismatch {
                    expected: RecordType::$variant,
                    actual: other.record_type(),
                }),
            }
        }
    };
}

impl Record {
    pub fn new(id: RecordId, key: impl Into<String>, body: RecordBody) -> Self {
        Self {
            id,
            key: key.into(),
            body,
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn set_key(&mut self, key: String) {
        self.key = key;
    }

    pub fn record_type(&self) -> RecordType {
        self.body.record_type()
    }

    pub fn body(&self) -> &RecordBody {
        &self.body
    }

    body_accessors!(
        alternative_carrier,
        alternative_carrier_mut,
        AlternativeCarrier,
        AlternativeCarrierRecord
    );
    body_accessors!(text, text_mut, Text, TextRecord);
    body_accessors!(uri, uri_mut, Uri, UriRecord);
    body_accessors!(action, action_mut, Action, ActionRecord);
    body_accessors!(mime, mime_mut, Mime, MimeRecord);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumerations_keep_declaration_order() {
        assert_eq!(CarrierPowerState::VALUES.len(), 4);
        for (i, v) in CarrierPowerState::VALUES.iter().enumerate() {
            assert_eq!(v.ordinal(), i);
            assert_eq!(CarrierPowerState::from_ordinal(i), Some(*v));
        }
        assert_eq!(CarrierPowerState::from_ordinal(4), None);
        assert_eq!(
            ActionKind::from_name("save-for-later"),
            Some(ActionKind::SaveForLater)
        );
        assert_eq!(TextEncoding::from_name("latin-1"), None);
    }

    #[test]
    fn list_accessors_are_index_addressed() {
        let mut ac = AlternativeCarrierRecord::default();
        ac.insert_auxiliary_data_reference(0, "b".to_string())
            .unwrap();
        ac.insert_auxiliary_data_reference(0, "a".to_string())
            .unwrap();
        assert_eq!(ac.auxiliary_data_references(), ["a", "b"]);

        ac.set_auxiliary_data_reference(1, "c".to_string()).unwrap();
        assert_eq!(ac.auxiliary_data_reference_at(1), Some("c"));

        assert!(matches!(
            ac.set_auxiliary_data_reference(2, "x".to_string()),
            Err(EditError::ListIndexOutOfRange { index: 2, len: 2 })
        ));
        assert!(ac.insert_auxiliary_data_reference(3, "x".to_string()).is_err());
        assert_eq!(ac.remove_auxiliary_data_reference(0).unwrap(), "a");
        assert_eq!(ac.auxiliary_data_references(), ["c"]);
    }

    #[test]
    fn body_accessors_reject_other_record_types() {
        let mut record = Record::new(
            RecordId::new(1),
            "k",
            RecordBody::empty(RecordType::Uri),
        );
        assert!(record.uri().is_ok());
        assert!(matches!(
            record.text_mut(),
            Err(EditError::RecordTypeMismatch {
                expected: RecordType::Text,
                actual: RecordType::Uri,
            })
        ));
    }
}
