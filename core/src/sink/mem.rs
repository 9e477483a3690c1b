use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use anyhow::{Result, anyhow};

use super::{Sink, check_fully_relative};

type FileMap = BTreeMap<PathBuf, Arc<[u8]>>;

/// Shared handle to the files written by a [MemSink]. Clones refer to the same files.
#[derive(Clone, Debug, Default)]
pub struct MemFiles {
    file_map: Arc<Mutex<FileMap>>,
}

impl MemFiles {
    /// Returns the contents of the file at `path`, if it was written.
    pub fn get(&self, path: &Path) -> Option<Arc<[u8]>> {
        self.file_map
            .lock()
            .ok()
            .and_then(|files| files.get(path).cloned())
    }

    /// Returns the paths of all written files, in sorted order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.file_map
            .lock()
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default()
    }
}

/// Keeps written files in memory.
#[derive(Debug, Default)]
pub struct MemSink {
    files: MemFiles,
}

impl MemSink {
    pub fn new(files: MemFiles) -> Self {
        Self { files }
    }
}

impl Sink for MemSink {
    fn write_file(&mut self, path: &Path, contents: &[u8]) -> Result<()> {
        check_fully_relative(path)?;
        let mut files_guard = self
            .files
            .file_map
            .lock()
            .map_err(|e| anyhow!("failed to lock file map: {}", e))?;
        files_guard.insert(path.to_owned(), contents.into());
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}
