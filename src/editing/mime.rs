use super::{
    CellEditor, CellValue, DefaultRecordEditingSupport, RecordEditingSupport, choice_editor,
    property_edit, text_or_unset, unsupported,
};
use crate::{
    EditError, FileLoader, NodeKind, Record, TreeNode,
    node::slot,
    operation::{Field, FieldValue, Operation},
    statics,
};
use std::path::PathBuf;

const CONTENT_ABSENT: usize = 0;
const CONTENT_PRESENT: usize = 1;

/// MIME record: content type, content presence and content imported from a file.
pub struct MimeEditingSupport {
    base: DefaultRecordEditingSupport,
    loader: Box<dyn FileLoader>,
}

impl MimeEditingSupport {
    pub fn new(loader: Box<dyn FileLoader>) -> Self {
        Self {
            base: DefaultRecordEditingSupport,
            loader,
        }
    }

    fn content_presence(record: &Record, selection: Option<usize>) -> Result<FieldValue, EditError> {
        let current = record.mime()?.content();
        let next = match selection {
            None | Some(CONTENT_ABSENT) => None,
            Some(CONTENT_PRESENT) => Some(current.map(<[u8]>::to_vec).unwrap_or_default()),
            Some(index) => {
                return Err(EditError::ChoiceOutOfRange {
                    index,
                    len: statics::PRESENT_OR_NOT.len(),
                });
            }
        };
        Ok(FieldValue::Bytes(next))
    }

    fn load_content(&self, path: String) -> Result<Option<Vec<u8>>, EditError> {
        if path.is_empty() {
            return Ok(None);
        }
        let path = PathBuf::from(path);
        match self.loader.load(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(source) => {
                tracing::warn!(path = %path.display(), error = %source, "could not load content");
                Err(EditError::Load { path, source })
            }
        }
    }
}

impl RecordEditingSupport for MimeEditingSupport {
    fn value(&self, record: &Record, node: &TreeNode) -> Result<CellValue, EditError> {
        let mime = record.mime()?;
        match (node.kind(), node.parent_index()) {
            (NodeKind::Property, slot::MIME_CONTENT_TYPE) => Ok(CellValue::Text(
                mime.content_type().unwrap_or_default().to_string(),
            )),
            (NodeKind::ParentProperty, slot::MIME_CONTENT) => Ok(CellValue::Choice(Some(
                if mime.has_content() {
                    CONTENT_PRESENT
                } else {
                    CONTENT_ABSENT
                },
            ))),
            (NodeKind::Property, slot::MIME_CONTENT_FILE) => Ok(CellValue::Text(
                mime.content()
                    .map(|bytes| format!("{} bytes", bytes.len()))
                    .unwrap_or_default(),
            )),
            (NodeKind::Property | NodeKind::ParentProperty, _) => Err(unsupported(node)),
            (NodeKind::Record | NodeKind::PropertyList | NodeKind::PropertyListItem, _) => {
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
        match (node.kind(), node.parent_index()) {
            (NodeKind::Property, slot::MIME_CONTENT_TYPE) => {
                let next = text_or_unset(value.into_text()?);
                property_edit(record, Field::MimeContentType, FieldValue::Text(next))
            }
            (NodeKind::ParentProperty, slot::MIME_CONTENT) => {
                let next = Self::content_presence(record, value.into_choice()?)?;
                property_edit(record, Field::MimeContent, next)
            }
            (NodeKind::Property, slot::MIME_CONTENT_FILE) => {
                let path = value.into_text()?;
                record.mime()?;
                match self.load_content(path)? {
                    Some(bytes) => {
                        property_edit(record, Field::MimeContent, FieldValue::Bytes(Some(bytes)))
                    }
                    None => Ok(None),
                }
            }
            (NodeKind::Property | NodeKind::ParentProperty, _) => Err(unsupported(node)),
            (NodeKind::Record | NodeKind::PropertyList | NodeKind::PropertyListItem, _) => {
                self.base.set_value(record, node, value)
            }
        }
    }

    fn cell_editor(
        &self,
        record: &Record,
        node: &TreeNode,
    ) -> Result<Option<CellEditor>, EditError> {
        match (node.kind(), node.parent_index()) {
            (NodeKind::Property, slot::MIME_CONTENT_TYPE) => Ok(Some(CellEditor::Text)),
            (NodeKind::ParentProperty, slot::MIME_CONTENT) => {
                Ok(Some(choice_editor(&statics::PRESENT_OR_NOT, false)))
            }
            (NodeKind::Property, slot::MIME_CONTENT_FILE) => Ok(Some(CellEditor::File {
                mime_type_hint: record.mime()?.content_type().map(str::to_string),
            })),
            (NodeKind::Property | NodeKind::ParentProperty, _) => Err(unsupported(node)),
            (NodeKind::Record | NodeKind::PropertyList | NodeKind::PropertyListItem, _) => {
                self.base.cell_editor(record, node)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RecordBody, RecordId, RecordType, build_tree};
    use std::{collections::HashMap, io, path::Path};

    struct MapLoader(HashMap<PathBuf, Vec<u8>>);

    impl FileLoader for MapLoader {
        fn load(&self, path: &Path) -> io::Result<Vec<u8>> {
            self.0
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
        }
    }

    fn support() -> MimeEditingSupport {
        let mut files = HashMap::new();
        files.insert(PathBuf::from("card.vcf"), b"BEGIN:VCARD".to_vec());
        MimeEditingSupport::new(Box::new(MapLoader(files)))
    }

    fn mime_record() -> Record {
        Record::new(RecordId::new(4), "m", RecordBody::empty(RecordType::Mime))
    }

    #[test]
    fn presence_toggle_creates_and_clears_content() {
        let mut record = mime_record();
        let support = support();
        let tree = build_tree(&record, 0);
        let content = tree
            .find(NodeKind::ParentProperty, slot::MIME_CONTENT)
            .unwrap();
        assert_eq!(
            support.value(&record, content).unwrap(),
            CellValue::Choice(Some(CONTENT_ABSENT))
        );

        let mut op = support
            .set_value(&record, content, CellValue::Choice(Some(CONTENT_PRESENT)))
            .unwrap()
            .unwrap();
        op.execute(&mut record).unwrap();
        assert_eq!(record.mime().unwrap().content(), Some(&[][..]));

        // Already present: nothing to do.
        assert!(
            support
                .set_value(&record, content, CellValue::Choice(Some(CONTENT_PRESENT)))
                .unwrap()
                .is_none()
        );

        op.revoke(&mut record).unwrap();
        assert!(!record.mime().unwrap().has_content());
    }

    #[test]
    fn content_file_is_loaded_through_the_loader() {
        let mut record = mime_record();
        record
            .mime_mut()
            .unwrap()
            .set_content_type(Some("text/vcard".to_string()));
        record.mime_mut().unwrap().set_content(Some(Vec::new()));
        let support = support();
        let tree = build_tree(&record, 0);
        let file = tree
            .find(NodeKind::Property, slot::MIME_CONTENT_FILE)
            .unwrap();

        assert_eq!(
            support.cell_editor(&record, file).unwrap(),
            Some(CellEditor::File {
                mime_type_hint: Some("text/vcard".to_string())
            })
        );

        let mut op = support
            .set_value(&record, file, CellValue::Text("card.vcf".to_string()))
            .unwrap()
            .unwrap();
        op.execute(&mut record).unwrap();
        assert_eq!(
            support.value(&record, file).unwrap(),
            CellValue::Text("11 bytes".to_string())
        );
        op.revoke(&mut record).unwrap();
        assert_eq!(
            support.value(&record, file).unwrap(),
            CellValue::Text("0 bytes".to_string())
        );
        assert!(
            support
                .set_value(&record, file, CellValue::Text(String::new()))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn failed_load_is_reported_without_an_operation() {
        let mut record = mime_record();
        record.mime_mut().unwrap().set_content(Some(vec![1, 2, 3]));
        let support = support();
        let tree = build_tree(&record, 0);
        let file = tree
            .find(NodeKind::Property, slot::MIME_CONTENT_FILE)
            .unwrap();

        let err = support
            .set_value(&record, file, CellValue::Text("missing.bin".to_string()))
            .unwrap_err();
        assert!(matches!(err, EditError::Load { .. }));
        assert!(!err.is_fatal());
        assert_eq!(record.mime().unwrap().content(), Some(&[1, 2, 3][..]));
    }
}
