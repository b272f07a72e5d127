// Central place for UI strings and other non-localized constants.
// Keep these out of gui.rs and the editing modules to reduce duplication.

// English UI strings (EN_ prefix to make future localization easier)
pub const EN_APP_TITLE: &str = "NDEFED: NDEF Record Editor";

pub const EN_BTN_NEW: &str = "New";
pub const EN_BTN_OPEN: &str = "Open...";
pub const EN_BTN_SAVE_AS: &str = "Save As...";
pub const EN_BTN_ABOUT: &str = "About";
pub const EN_BTN_TOGGLE_THEME: &str = "Theme";
pub const EN_BTN_UNDO: &str = "Undo";
pub const EN_BTN_REDO: &str = "Redo";
pub const EN_BTN_CHANGES: &str = "Changes";
pub const EN_BTN_ADD_RECORD: &str = "Add";
pub const EN_BTN_REMOVE_RECORD: &str = "Remove";
pub const EN_BTN_ADD_ITEM: &str = "+";
pub const EN_BTN_REMOVE_ITEM: &str = "-";
pub const EN_BTN_LOAD_FILE: &str = "Load...";
pub const EN_BTN_APPLY: &str = "Apply";
pub const EN_BTN_CLEAR: &str = "Clear";

pub const EN_WINDOW_ABOUT: &str = "About";
pub const EN_WINDOW_CHANGES: &str = "Changes";

pub const EN_ABOUT_HEADING: &str = "NDEFED: NDEF Record Editor";
pub const EN_ABOUT_VERSION: &str = "Version:";
pub const EN_ABOUT_SHORTCUTS: &str = "Shortcuts:";
pub const EN_ABOUT_SHORTCUT_UNDO: &str = "- Ctrl+Z: Undo";
pub const EN_ABOUT_SHORTCUT_REDO: &str = "- Ctrl+Y / Ctrl+Shift+Z: Redo";

pub const EN_HOME_HEADING: &str = "NDEFED: NDEF Record Editor";
pub const EN_HOME_HINT: &str = "Open a record document or start a new one.";
pub const EN_SELECT_RECORD_HINT: &str = "Select a record on the left.";

pub const EN_HEADING_RECORDS: &str = "Records";
pub const EN_COL_NUMBER: &str = "#";
pub const EN_COL_CHANGE: &str = "Change";
pub const EN_CHANGES_NONE: &str = "No changes yet.";

pub const EN_PREFIX_UNDO: &str = "Undo:";
pub const EN_PREFIX_REDO: &str = "Redo:";
pub const EN_LABEL_ERROR: &str = "Error:";
pub const EN_LABEL_RECORD_TYPE: &str = "Type:";
pub const EN_LABEL_RECORDS_COUNT: &str = "records:";
pub const EN_LABEL_CHANGES_COUNT: &str = "changes:";
pub const EN_BADGE_DIRTY: &str = "modified";

pub const EN_ERR_NO_RECORD: &str = "Could not locate the selected record.";

pub const EN_FILTER_DOCUMENT: &str = "NDEF Record Document";
pub const EN_FILTER_ALL_FILES: &str = "All Files";
pub const EN_UNTITLED_DOCUMENT: &str = "untitled.ndef.json5";

// Record type labels
pub const EN_RECORD_ALTERNATIVE_CARRIER: &str = "Alternative Carrier Record";
pub const EN_RECORD_TEXT: &str = "Text Record";
pub const EN_RECORD_URI: &str = "URI Record";
pub const EN_RECORD_ACTION: &str = "Action Record";
pub const EN_RECORD_MIME: &str = "MIME Record";

// Tree node labels
pub const EN_NODE_CARRIER_POWER_STATE: &str = "Carrier power state";
pub const EN_NODE_CARRIER_DATA_REFERENCE: &str = "Carrier data reference";
pub const EN_NODE_AUXILIARY_DATA_REFERENCES: &str = "Auxiliary data references";
pub const EN_NODE_AUXILIARY_DATA_REFERENCE: &str = "Auxiliary data reference";
pub const EN_NODE_ENCODING: &str = "Encoding";
pub const EN_NODE_LOCALE: &str = "Locale";
pub const EN_NODE_TEXT: &str = "Text";
pub const EN_NODE_URI: &str = "URI";
pub const EN_NODE_ACTION: &str = "Action";
pub const EN_NODE_CONTENT_TYPE: &str = "Content type";
pub const EN_NODE_CONTENT: &str = "Content";
pub const EN_NODE_CONTENT_FILE: &str = "Content file";

// Choice labels
pub const EN_CHOICE_UNSET: &str = "-";
pub const PRESENT_OR_NOT: [&str; 2] = ["Not present", "Present"];

// Record document field names
pub const DOC_FIELD_RECORDS: &str = "records";
pub const DOC_FIELD_TYPE: &str = "type";
pub const DOC_FIELD_KEY: &str = "key";
pub const DOC_FIELD_CARRIER_POWER_STATE: &str = "carrierPowerState";
pub const DOC_FIELD_CARRIER_DATA_REFERENCE: &str = "carrierDataReference";
pub const DOC_FIELD_AUXILIARY_DATA_REFERENCES: &str = "auxiliaryDataReferences";
pub const DOC_FIELD_ENCODING: &str = "encoding";
pub const DOC_FIELD_LOCALE: &str = "locale";
pub const DOC_FIELD_TEXT: &str = "text";
pub const DOC_FIELD_URI: &str = "uri";
pub const DOC_FIELD_ACTION: &str = "action";
pub const DOC_FIELD_CONTENT_TYPE: &str = "contentType";
pub const DOC_FIELD_CONTENT: &str = "content";

pub const DOCUMENT_EXTENSIONS: [&str; 3] = ["json", "json5", "gz"];

/// Maximum number of operations kept on the undo stack.
pub const HISTORY_LIMIT: usize = 100;

pub const NL_LF: &str = "\n";
