use std::{fs, io, path::Path};

/// Reads whole files for fields whose value is imported from disk.
pub trait FileLoader {
    fn load(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Loads from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl FileLoader for FsLoader {
    fn load(&self, path: &Path) -> io::Result<Vec<u8>> {
        let bytes = fs::read(path)?;
        tracing::debug!(path = %path.display(), len = bytes.len(), "loaded file");
        Ok(bytes)
    }
}
