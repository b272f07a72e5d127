//! Remembers MIME types and extensions used in file dialogs, and turns them into
//! ordered dialog filters.

use crate::statics;
use indexmap::IndexSet;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    pub name: String,
    /// Extensions without the leading dot; `*` matches any file.
    pub extensions: Vec<String>,
}

impl FileFilter {
    fn new(name: impl Into<String>, extensions: &[&str]) -> Self {
        Self {
            name: name.into(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FileDialogFilters {
    mime_types: IndexSet<String>,
    extensions: IndexSet<String>,
    last_mime_type: Option<String>,
}

/// Known extensions for a MIME type; empty when the type is unknown.
pub fn extensions_for_mime(mime_type: &str) -> &'static [&'static str] {
    mime_guess::get_mime_extensions_str(mime_type).unwrap_or(&[])
}

pub fn mime_types_for_extension(extension: &str) -> Vec<&'static str> {
    mime_guess::from_ext(extension).iter_raw().collect()
}

impl FileDialogFilters {
    /// Returns false if already registered.
    pub fn register_mime_type(&mut self, mime_type: &str) -> bool {
        self.mime_types.insert(mime_type.to_string())
    }

    pub fn register_extension(&mut self, extension: &str) -> bool {
        self.extensions.insert(extension.to_ascii_lowercase())
    }

    /// Record a picked file: its extension gets a filter of its own, and the MIME
    /// type it maps to heads the list when no hint is given.
    pub fn remember_path(&mut self, path: &Path) {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return;
        };
        let ext = ext.to_ascii_lowercase();
        self.register_extension(&ext);
        if let Some(mime_type) = mime_guess::from_ext(&ext).first_raw() {
            tracing::debug!(extension = %ext, mime_type, "remembered file type");
            self.last_mime_type = Some(mime_type.to_string());
        }
    }

    /// Filters in display order: the hint's extensions (the last picked MIME type
    /// without a hint), each registered extension, the other registered MIME
    /// types, then "All Files".
    pub fn filters(&self, mime_type_hint: Option<&str>) -> Vec<FileFilter> {
        let mut filters = Vec::new();
        let mime_type_hint = mime_type_hint.or(self.last_mime_type.as_deref());

        if let Some(hint) = mime_type_hint {
            let exts = extensions_for_mime(hint);
            if !exts.is_empty() {
                filters.push(FileFilter::new(hint, exts));
            }
        }

        for ext in &self.extensions {
            let mime_types = mime_types_for_extension(ext);
            let name = if mime_types.is_empty() {
                format!("{} file", ext.to_uppercase())
            } else {
                mime_types.join(", ")
            };
            filters.push(FileFilter::new(name, &[ext.as_str()]));
        }

        for mime_type in &self.mime_types {
            if Some(mime_type.as_str()) == mime_type_hint {
                continue;
            }
            let exts = extensions_for_mime(mime_type);
            if !exts.is_empty() {
                filters.push(FileFilter::new(mime_type.as_str(), exts));
            }
        }

        filters.push(FileFilter::new(statics::EN_FILTER_ALL_FILES, &["*"]));
        filters
    }

    pub fn apply_to(&self, mut dialog: rfd::FileDialog, mime_type_hint: Option<&str>) -> rfd::FileDialog {
        for filter in self.filters(mime_type_hint) {
            dialog = dialog.add_filter(filter.name, &filter.extensions[..]);
        }
        dialog
    }
}

#[cfg(test)]
mod tests {
    use super::{FileDialogFilters, FileFilter, extensions_for_mime, mime_types_for_extension};
    use pretty_assertions::assert_eq;
    use std::path::Path;

    #[test]
    fn lookups_go_through_the_mime_database() {
        assert!(extensions_for_mime("image/jpeg").contains(&"jpg"));
        assert!(extensions_for_mime("application/x-unknown-ndef").is_empty());
        assert_eq!(mime_types_for_extension("png"), vec!["image/png"]);
        assert!(mime_types_for_extension("ndefx").is_empty());
    }

    #[test]
    fn filters_are_ordered_hint_extensions_mime_types_all() {
        let mut filters = FileDialogFilters::default();
        assert!(filters.register_mime_type("text/plain"));
        assert!(filters.register_mime_type("image/png"));
        assert!(!filters.register_mime_type("image/png"));
        filters.register_extension("ndefx");
        filters.register_extension("png");

        let built = filters.filters(Some("text/plain"));
        let names: Vec<&str> = built.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["text/plain", "NDEFX file", "image/png", "image/png", "All Files"]
        );
        assert!(built[0].extensions.iter().any(|e| e == "txt"));
        assert_eq!(built[1].extensions, vec!["ndefx"]);
    }

    #[test]
    fn unknown_hint_only_yields_all_files() {
        let filters = FileDialogFilters::default();
        assert_eq!(
            filters.filters(Some("application/x-unknown-ndef")),
            vec![FileFilter {
                name: "All Files".to_string(),
                extensions: vec!["*".to_string()],
            }]
        );
    }

    #[test]
    fn remembered_file_type_heads_filters_without_hint() {
        let mut filters = FileDialogFilters::default();
        filters.remember_path(Path::new("/tmp/photo.JPG"));

        let built = filters.filters(None);
        assert_eq!(built[0].name, "image/jpeg");
        assert!(built[0].extensions.iter().any(|e| e == "jpg"));
        assert_eq!(built[1].extensions, vec!["jpg"]);
        assert_eq!(built.len(), 3);

        // An explicit hint still wins.
        assert_eq!(filters.filters(Some("image/png"))[0].name, "image/png");

        filters.remember_path(Path::new("/tmp/no_extension"));
        assert_eq!(filters.filters(None)[0].name, "image/jpeg");
    }
}
