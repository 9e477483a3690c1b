//! Destinations for exported files.

mod dir;
mod mem;
mod zipfile;

use std::path::{Component, Path};

use anyhow::{Context, Result};

pub use dir::DirSink;
pub use mem::{MemFiles, MemSink};
pub use zipfile::ZipSink;

/// Error returned by [Sink] implementations for paths that would escape the destination.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum SinkError {
    #[error("path is not relative because it contains a {0} component")]
    NonRelativePath(NonRelativePathType),
}

/// Type of path [Component] causing a path to be non-relative.
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum_macros::Display)]
pub enum NonRelativePathType {
    #[strum(to_string = "prefix")]
    Prefix,
    #[strum(to_string = "root directory")]
    RootDir,
}

/// Protocol for writing files into a collection such as a directory or archive.
pub trait Sink {
    /// Writes `contents` to the file at the relative `path`, replacing any existing file.
    fn write_file(&mut self, path: &Path, contents: &[u8]) -> Result<()>;

    /// Completes all writes. Files may not be visible at the destination until this returns.
    fn close(self: Box<Self>) -> Result<()>;
}

/// Kind of [Sink] to create for an output path.
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, strum_macros::Display, strum_macros::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum IoType {
    Dir,
    Zip,
}

impl IoType {
    /// Returns `io_type` if given, otherwise guesses from `path`: an existing directory or a path
    /// without a `.zip` suffix is a [IoType::Dir].
    pub fn resolve_auto(io_type: Option<IoType>, path: &Path) -> IoType {
        if let Some(io_type) = io_type {
            return io_type;
        }
        if path.is_dir() {
            return IoType::Dir;
        }
        match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("zip") => IoType::Zip,
            _ => IoType::Dir,
        }
    }

    /// Creates a new [Sink] of this type writing to `path`.
    pub fn new_sink(self, path: &Path) -> Result<Box<dyn Sink>> {
        let sink: Box<dyn Sink> = match self {
            IoType::Dir => Box::new(DirSink::new(path)),
            IoType::Zip => Box::new(
                ZipSink::new(path).with_context(|| format!("creating ZIP archive {path:?}"))?,
            ),
        };
        Ok(sink)
    }
}

/// Returns an error if `path` is not strictly relative. That is satisfying both:
/// * Has no prefix component.
/// * Has no root component.
fn check_fully_relative(path: &Path) -> Result<(), SinkError> {
    match path.components().next() {
        Some(Component::Prefix(_)) => Err(SinkError::NonRelativePath(NonRelativePathType::Prefix)),
        Some(Component::RootDir) => Err(SinkError::NonRelativePath(NonRelativePathType::RootDir)),
        _ => Ok(()),
    }
}
