use std::{
    collections::HashSet,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Result, anyhow, bail};
use atomic_write_file::AtomicWriteFile;
use zip::{ZipWriter, write::SimpleFileOptions};

use super::{Sink, check_fully_relative};

/// Writes files into a new ZIP archive. The archive only replaces any existing file at its path
/// once [Sink::close] succeeds.
pub struct ZipSink {
    dest_path: PathBuf,
    zip_writer: ZipWriter<AtomicWriteFile>,
    written: HashSet<String>,
}

impl ZipSink {
    pub fn new(path: &Path) -> Result<Self> {
        let file = AtomicWriteFile::open(path)?;
        Ok(Self {
            dest_path: path.to_owned(),
            zip_writer: ZipWriter::new(file),
            written: HashSet::new(),
        })
    }
}

impl Sink for ZipSink {
    fn write_file(&mut self, path: &Path, contents: &[u8]) -> Result<()> {
        check_fully_relative(path)?;
        let name = normalise_path_slashes(path)?;

        // ZIP entries cannot be replaced once written.
        if !self.written.insert(name.clone()) {
            bail!("{name:?} was already written to {:?}", self.dest_path);
        }

        self.zip_writer
            .start_file(name, SimpleFileOptions::default())?;
        self.zip_writer.write_all(contents)?;
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<()> {
        let Self {
            dest_path,
            zip_writer,
            written,
        } = *self;
        let file = zip_writer.finish()?;
        file.commit()?;
        log::debug!("Wrote {} files to {:?}.", written.len(), dest_path);
        Ok(())
    }
}

/// Normalise a [Path] to use forward slashes, for uniformity of ZIP file entry
/// names between platforms.
fn normalise_path_slashes(p: &Path) -> Result<String> {
    Ok(p.to_str()
        .ok_or_else(|| anyhow!("could not convert path {:?} to UTF-8 string", p))?
        .replace('\\', "/"))
}
