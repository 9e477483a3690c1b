use std::{
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;

use super::{Sink, check_fully_relative};

/// Writes files into a directory, creating it and any parent directories as needed. Each file
/// replaces its predecessor atomically.
#[derive(Debug)]
pub struct DirSink {
    dir_path: PathBuf,
}

impl DirSink {
    pub fn new<P>(dir_path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            dir_path: dir_path.into(),
        }
    }
}

impl Sink for DirSink {
    fn write_file(&mut self, path: &Path, contents: &[u8]) -> Result<()> {
        check_fully_relative(path)?;
        let full_path = self.dir_path.join(path);

        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {parent:?}"))?;
        }

        let mut file = AtomicWriteFile::open(&full_path)?;
        file.write_all(contents)?;
        file.commit()?;
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}
