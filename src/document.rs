use crate::{
    ActionKind, CarrierPowerState, DocValue, Enumerated, Record, RecordBody, RecordId,
    RecordType, TextEncoding, TreeNode, build_tree, statics,
};
use anyhow::{Context, bail};
use flate2::{Compression, GzBuilder, read::GzDecoder};
use indexmap::IndexMap;
use std::{
    fs,
    io::{Read, Write},
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json5,
    GzipJson5,
}

/// The set of records open for editing, plus where they came from.
/// Keeps the loaded bytes so an unmodified document saves byte-for-byte identical.
#[derive(Debug, Clone)]
pub struct RecordDocument {
    pub source_path: Option<PathBuf>,
    pub format: DocumentFormat,
    pub original_bytes: Vec<u8>,
    pub dirty: bool,
    records: IndexMap<RecordId, Record>,
    next_id: u64,
    /// Canonical text of the records as loaded/saved; dirtiness compares against it.
    baseline: String,
}

impl Default for RecordDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordDocument {
    pub fn new() -> Self {
        let mut doc = Self {
            source_path: None,
            format: DocumentFormat::Json5,
            original_bytes: Vec::new(),
            dirty: false,
            records: IndexMap::new(),
            next_id: 1,
            baseline: String::new(),
        };
        doc.baseline = doc.to_text();
        doc.original_bytes = doc.baseline.clone().into_bytes();
        doc
    }

    pub fn load_path(path: &Path) -> anyhow::Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("reading {path:?}"))?;
        let format = detect_format(path, &bytes);
        let mut doc = Self::from_bytes(bytes, format)?;
        doc.source_path = Some(path.to_path_buf());
        tracing::info!(path = %path.display(), records = doc.len(), "loaded record document");
        Ok(doc)
    }

    pub fn from_bytes(bytes: Vec<u8>, format: DocumentFormat) -> anyhow::Result<Self> {
        let text_bytes = match format {
            DocumentFormat::Json5 => bytes.clone(),
            DocumentFormat::GzipJson5 => {
                let mut decoder = GzDecoder::new(&bytes[..]);
                let mut out = Vec::new();
                decoder.read_to_end(&mut out).context("gzip decompress")?;
                out
            }
        };

        let text = std::str::from_utf8(&text_bytes).context("document is not valid UTF-8")?;
        let root = DocValue::parse_json5(text).context("parsing JSON5")?;

        let mut doc = Self::new();
        for (key, body) in records_from_value(&root)? {
            doc.insert_record(key, body);
        }
        doc.format = format;
        doc.original_bytes = bytes;
        doc.baseline = doc.to_text();
        doc.dirty = false;
        Ok(doc)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    pub fn record(&self, id: RecordId) -> Option<&Record> {
        self.records.get(&id)
    }

    pub fn record_mut(&mut self, id: RecordId) -> Option<&mut Record> {
        self.records.get_mut(&id)
    }

    /// Append an empty record of `record_type`.
    pub fn add_record(&mut self, record_type: RecordType) -> RecordId {
        let id = self.insert_record(String::new(), RecordBody::empty(record_type));
        self.refresh_dirty();
        tracing::info!(record = %id, record_type = %record_type, "added record");
        id
    }

    pub fn remove_record(&mut self, id: RecordId) -> Option<Record> {
        let removed = self.records.shift_remove(&id)?;
        self.refresh_dirty();
        tracing::info!(record = %id, "removed record");
        Some(removed)
    }

    fn insert_record(&mut self, key: String, body: RecordBody) -> RecordId {
        let id = RecordId::new(self.next_id);
        self.next_id += 1;
        self.records.insert(id, Record::new(id, key, body));
        id
    }

    /// Tree for the record `id`, rebuilt from its current state.
    pub fn tree(&self, id: RecordId) -> Option<TreeNode> {
        let (position, _, record) = self.records.get_full(&id)?;
        Some(build_tree(record, position))
    }

    /// Recompute `dirty` by comparing the current records to the loaded/saved ones,
    /// so it clears again when changes are undone.
    pub fn refresh_dirty(&mut self) {
        self.dirty = self.to_text() != self.baseline;
    }

    pub fn to_text(&self) -> String {
        records_to_value(self.records.values()).to_json5_pretty()
    }

    /// Generate bytes for a format regardless of current `dirty` state.
    pub fn generate_bytes_for_format(&self, format: DocumentFormat) -> anyhow::Result<Vec<u8>> {
        let text = self.to_text();
        let text_bytes = text.as_bytes();

        match format {
            DocumentFormat::Json5 => Ok(text_bytes.to_vec()),
            DocumentFormat::GzipJson5 => {
                let mut encoder = GzBuilder::new()
                    .mtime(0)
                    .write(Vec::new(), Compression::default());
                encoder.write_all(text_bytes).context("gzip compress")?;
                let bytes = encoder.finish().context("gzip finish")?;
                Ok(bytes)
            }
        }
    }

    pub fn save_bytes_for_format(&self, format: DocumentFormat) -> anyhow::Result<Vec<u8>> {
        if !self.dirty && format == self.format && !self.original_bytes.is_empty() {
            return Ok(self.original_bytes.clone());
        }

        self.generate_bytes_for_format(format)
    }

    pub fn save_to_path(&mut self, path: &Path) -> anyhow::Result<()> {
        let target_format = if path.extension().and_then(|e| e.to_str()) == Some("gz") {
            DocumentFormat::GzipJson5
        } else {
            DocumentFormat::Json5
        };

        let bytes = self.save_bytes_for_format(target_format)?;
        fs::write(path, &bytes).with_context(|| format!("writing {path:?}"))?;

        self.source_path = Some(path.to_path_buf());
        self.format = target_format;
        self.original_bytes = bytes;
        self.baseline = self.to_text();
        self.dirty = false;
        tracing::info!(path = %path.display(), "saved record document");
        Ok(())
    }
}

fn detect_format(path: &Path, bytes: &[u8]) -> DocumentFormat {
    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        return DocumentFormat::GzipJson5;
    }
    // Gzip magic: 1F 8B
    if bytes.len() >= 2 && bytes[0] == 0x1F && bytes[1] == 0x8B {
        return DocumentFormat::GzipJson5;
    }
    DocumentFormat::Json5
}

fn records_from_value(root: &DocValue) -> anyhow::Result<Vec<(String, RecordBody)>> {
    let Some(items) = root.get(statics::DOC_FIELD_RECORDS) else {
        return Ok(Vec::new());
    };
    let Some(items) = items.as_array() else {
        bail!("'{}' must be an array", statics::DOC_FIELD_RECORDS);
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| record_from_value(item).with_context(|| format!("record {i}")))
        .collect()
}

fn record_from_value(item: &DocValue) -> anyhow::Result<(String, RecordBody)> {
    if item.as_object().is_none() {
        bail!("expected an object, got {}", item.type_name());
    }
    let type_name = opt_str(item, statics::DOC_FIELD_TYPE)?
        .with_context(|| format!("missing '{}'", statics::DOC_FIELD_TYPE))?;
    let record_type = RecordType::from_name(&type_name)
        .with_context(|| format!("unknown record type '{type_name}'"))?;
    let key = opt_str(item, statics::DOC_FIELD_KEY)?.unwrap_or_default();

    let mut body = RecordBody::empty(record_type);
    match &mut body {
        RecordBody::AlternativeCarrier(ac) => {
            ac.set_carrier_power_state(opt_enum::<CarrierPowerState>(
                item,
                statics::DOC_FIELD_CARRIER_POWER_STATE,
            )?);
            ac.set_carrier_data_reference(opt_str(
                item,
                statics::DOC_FIELD_CARRIER_DATA_REFERENCE,
            )?);
            let references = match item.get(statics::DOC_FIELD_AUXILIARY_DATA_REFERENCES) {
                None | Some(DocValue::Null) => Vec::new(),
                Some(DocValue::Array(values)) => values
                    .iter()
                    .map(|v| {
                        v.as_str().map(str::to_string).with_context(|| {
                            format!(
                                "'{}' items must be strings",
                                statics::DOC_FIELD_AUXILIARY_DATA_REFERENCES
                            )
                        })
                    })
                    .collect::<anyhow::Result<_>>()?,
                Some(other) => bail!(
                    "'{}' must be an array, got {}",
                    statics::DOC_FIELD_AUXILIARY_DATA_REFERENCES,
                    other.type_name()
                ),
            };
            for (i, reference) in references.into_iter().enumerate() {
                ac.insert_auxiliary_data_reference(i, reference)?;
            }
        }
        RecordBody::Text(text) => {
            text.set_encoding(opt_enum::<TextEncoding>(item, statics::DOC_FIELD_ENCODING)?);
            text.set_locale(opt_str(item, statics::DOC_FIELD_LOCALE)?);
            text.set_text(opt_str(item, statics::DOC_FIELD_TEXT)?);
        }
        RecordBody::Uri(uri) => uri.set_uri(opt_str(item, statics::DOC_FIELD_URI)?),
        RecordBody::Action(action) => {
            action.set_action(opt_enum::<ActionKind>(item, statics::DOC_FIELD_ACTION)?)
        }
        RecordBody::Mime(mime) => {
            mime.set_content_type(opt_str(item, statics::DOC_FIELD_CONTENT_TYPE)?);
            mime.set_content(
                opt_str(item, statics::DOC_FIELD_CONTENT)?
                    .map(|hex| decode_hex(&hex))
                    .transpose()?,
            );
        }
    }
    Ok((key, body))
}

fn opt_str(item: &DocValue, field: &str) -> anyhow::Result<Option<String>> {
    match item.get(field) {
        None | Some(DocValue::Null) => Ok(None),
        Some(DocValue::String(s)) => Ok(Some(s.clone())),
        Some(other) => bail!("'{field}' must be a string, got {}", other.type_name()),
    }
}

fn opt_enum<E: Enumerated>(item: &DocValue, field: &str) -> anyhow::Result<Option<E>> {
    opt_str(item, field)?
        .map(|name| {
            E::from_name(&name).with_context(|| format!("unknown value '{name}' for '{field}'"))
        })
        .transpose()
}

fn records_to_value<'a>(records: impl Iterator<Item = &'a Record>) -> DocValue {
    let items = records.map(record_to_value).collect();
    let mut root = IndexMap::new();
    root.insert(
        statics::DOC_FIELD_RECORDS.to_string(),
        DocValue::Array(items),
    );
    DocValue::Object(root)
}

fn record_to_value(record: &Record) -> DocValue {
    let mut map = IndexMap::new();
    let mut put = |field: &str, value: Option<DocValue>| {
        if let Some(value) = value {
            map.insert(field.to_string(), value);
        }
    };
    let string = |s: Option<&str>| s.map(|s| DocValue::String(s.to_string()));
    let name = |s: Option<&'static str>| s.map(|s| DocValue::String(s.to_string()));

    put(statics::DOC_FIELD_TYPE, string(Some(record.record_type().as_str())));
    put(statics::DOC_FIELD_KEY, string(Some(record.key())));

    match record.body() {
        RecordBody::AlternativeCarrier(ac) => {
            put(
                statics::DOC_FIELD_CARRIER_POWER_STATE,
                name(ac.carrier_power_state().map(Enumerated::as_str)),
            );
            put(
                statics::DOC_FIELD_CARRIER_DATA_REFERENCE,
                string(ac.carrier_data_reference()),
            );
            put(
                statics::DOC_FIELD_AUXILIARY_DATA_REFERENCES,
                Some(DocValue::Array(
                    ac.auxiliary_data_references()
                        .iter()
                        .map(|s| DocValue::String(s.clone()))
                        .collect(),
                )),
            );
        }
        RecordBody::Text(text) => {
            put(
                statics::DOC_FIELD_ENCODING,
                name(text.encoding().map(Enumerated::as_str)),
            );
            put(statics::DOC_FIELD_LOCALE, string(text.locale()));
            put(statics::DOC_FIELD_TEXT, string(text.text()));
        }
        RecordBody::Uri(uri) => put(statics::DOC_FIELD_URI, string(uri.uri())),
        RecordBody::Action(action) => put(
            statics::DOC_FIELD_ACTION,
            name(action.action().map(Enumerated::as_str)),
        ),
        RecordBody::Mime(mime) => {
            put(statics::DOC_FIELD_CONTENT_TYPE, string(mime.content_type()));
            put(
                statics::DOC_FIELD_CONTENT,
                mime.content().map(|b| DocValue::String(encode_hex(b))),
            );
        }
    }
    DocValue::Object(map)
}

fn encode_hex(bytes: &[u8]) -> String {
    use std::fmt::Write as _;
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        write!(out, "{b:02x}").ok();
    }
    out
}

fn decode_hex(text: &str) -> anyhow::Result<Vec<u8>> {
    if text.len() % 2 != 0 {
        bail!("hex content has odd length {}", text.len());
    }
    (0..text.len())
        .step_by(2)
        .map(|i| {
            let pair = text.get(i..i + 2).context("hex content is not ASCII")?;
            u8::from_str_radix(pair, 16).with_context(|| format!("invalid hex byte '{pair}'"))
        })
        .collect()
}
