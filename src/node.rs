//! Tree positions over a record.
//! Nodes are rebuilt from the record after every edit; they carry the record id, never the record.

use crate::{Record, RecordBody, RecordId, RecordType, statics};
use std::fmt;

/// Fixed slot indices agreed between [`build_tree`] and the dispatchers.
pub mod slot {
    pub const CARRIER_POWER_STATE: usize = 0;
    pub const CARRIER_DATA_REFERENCE: usize = 1;
    pub const AUXILIARY_DATA_REFERENCES: usize = 2;

    pub const TEXT_ENCODING: usize = 0;
    pub const TEXT_LOCALE: usize = 1;
    pub const TEXT: usize = 2;

    pub const URI: usize = 0;

    pub const ACTION: usize = 0;

    pub const MIME_CONTENT_TYPE: usize = 0;
    pub const MIME_CONTENT: usize = 1;
    pub const MIME_CONTENT_FILE: usize = 2;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The record itself; edits the record key.
    Record,
    /// An optional group whose presence is toggled.
    ParentProperty,
    /// A scalar or enumerated field.
    Property,
    /// Container for the items of a list-valued field.
    PropertyList,
    /// One item of a list-valued field, `parent_index` is the list index.
    PropertyListItem,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeKind::Record => "record",
            NodeKind::ParentProperty => "parent property",
            NodeKind::Property => "property",
            NodeKind::PropertyList => "property list",
            NodeKind::PropertyListItem => "property list item",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    record: RecordId,
    record_type: RecordType,
    kind: NodeKind,
    parent_index: usize,
    label: String,
    children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(
        record: RecordId,
        record_type: RecordType,
        kind: NodeKind,
        parent_index: usize,
        label: impl Into<String>,
    ) -> Self {
        Self {
            record,
            record_type,
            kind,
            parent_index,
            label: label.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }

    pub fn record(&self) -> RecordId {
        self.record
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn parent_index(&self) -> usize {
        self.parent_index
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    /// Depth-first search for the first node of `kind` at `parent_index`.
    pub fn find(&self, kind: NodeKind, parent_index: usize) -> Option<&TreeNode> {
        if self.kind == kind && self.parent_index == parent_index {
            return Some(self);
        }
        self.children
            .iter()
            .find_map(|child| child.find(kind, parent_index))
    }
}

/// Build the tree for `record`; `position` is the record's index in its document.
pub fn build_tree(record: &Record, position: usize) -> TreeNode {
    let id = record.id();
    let record_type = record.record_type();
    let node = |kind, index, label: &str| TreeNode::new(id, record_type, kind, index, label);

    let children = match record.body() {
        RecordBody::AlternativeCarrier(ac) => {
            let items = (0..ac.auxiliary_data_references().len())
                .map(|i| {
                    node(
                        NodeKind::PropertyListItem,
                        i,
                        statics::EN_NODE_AUXILIARY_DATA_REFERENCE,
                    )
                })
                .collect();
            vec![
                node(
                    NodeKind::Property,
                    slot::CARRIER_POWER_STATE,
                    statics::EN_NODE_CARRIER_POWER_STATE,
                ),
                node(
                    NodeKind::Property,
                    slot::CARRIER_DATA_REFERENCE,
                    statics::EN_NODE_CARRIER_DATA_REFERENCE,
                ),
                node(
                    NodeKind::PropertyList,
                    slot::AUXILIARY_DATA_REFERENCES,
                    statics::EN_NODE_AUXILIARY_DATA_REFERENCES,
                )
                .with_children(items),
            ]
        }
        RecordBody::Text(_) => vec![
            node(
                NodeKind::Property,
                slot::TEXT_ENCODING,
                statics::EN_NODE_ENCODING,
            ),
            node(NodeKind::Property, slot::TEXT_LOCALE, statics::EN_NODE_LOCALE),
            node(NodeKind::Property, slot::TEXT, statics::EN_NODE_TEXT),
        ],
        RecordBody::Uri(_) => vec![node(NodeKind::Property, slot::URI, statics::EN_NODE_URI)],
        RecordBody::Action(_) => vec![node(
            NodeKind::Property,
            slot::ACTION,
            statics::EN_NODE_ACTION,
        )],
        RecordBody::Mime(mime) => {
            let content_children = if mime.has_content() {
                vec![node(
                    NodeKind::Property,
                    slot::MIME_CONTENT_FILE,
                    statics::EN_NODE_CONTENT_FILE,
                )]
            } else {
                Vec::new()
            };
            vec![
                node(
                    NodeKind::Property,
                    slot::MIME_CONTENT_TYPE,
                    statics::EN_NODE_CONTENT_TYPE,
                ),
                node(
                    NodeKind::ParentProperty,
                    slot::MIME_CONTENT,
                    statics::EN_NODE_CONTENT,
                )
                .with_children(content_children),
            ]
        }
    };

    node(NodeKind::Record, position, record_type.record_label()).with_children(children)
}

#[cfg(test)]
mod tests {
    use super::{NodeKind, build_tree, slot};
    use crate::{Record, RecordBody, RecordId, RecordType};

    #[test]
    fn alternative_carrier_tree_lists_auxiliary_items() {
        let mut record = Record::new(
            RecordId::new(3),
            "ac",
            RecordBody::empty(RecordType::AlternativeCarrier),
        );
        let ac = record.alternative_carrier_mut().unwrap();
        ac.insert_auxiliary_data_reference(0, "a".to_string())
            .unwrap();
        ac.insert_auxiliary_data_reference(1, "b".to_string())
            .unwrap();

        let tree = build_tree(&record, 5);
        assert_eq!(tree.kind(), NodeKind::Record);
        assert_eq!(tree.parent_index(), 5);
        assert_eq!(tree.children().len(), 3);

        let list = tree
            .find(NodeKind::PropertyList, slot::AUXILIARY_DATA_REFERENCES)
            .unwrap();
        let indices: Vec<usize> = list.children().iter().map(|n| n.parent_index()).collect();
        assert_eq!(indices, vec![0, 1]);
        assert!(
            list.children()
                .iter()
                .all(|n| n.kind() == NodeKind::PropertyListItem && n.record() == RecordId::new(3))
        );
    }

    #[test]
    fn mime_content_file_only_appears_when_content_is_present() {
        let mut record = Record::new(RecordId::new(1), "", RecordBody::empty(RecordType::Mime));
        let tree = build_tree(&record, 0);
        assert!(tree.find(NodeKind::ParentProperty, slot::MIME_CONTENT).is_some());
        assert!(tree.find(NodeKind::Property, slot::MIME_CONTENT_FILE).is_none());

        record.mime_mut().unwrap().set_content(Some(vec![1, 2]));
        let tree = build_tree(&record, 0);
        let content = tree.find(NodeKind::ParentProperty, slot::MIME_CONTENT).unwrap();
        assert_eq!(content.children().len(), 1);
        assert_eq!(content.children()[0].parent_index(), slot::MIME_CONTENT_FILE);
    }
}
