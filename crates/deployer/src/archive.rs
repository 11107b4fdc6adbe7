//! Packs a generated virtual file set into a single in-memory zip blob.
//!
//! Relative paths are preserved exactly as given, so extracting reproduces
//! the same tree the generator emitted.

use sitekit_core::VirtualFile;
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// Uploading an empty payload wastes a remote deploy slot, so zero
    /// files is a hard failure at this layer.
    #[error("no files to archive")]
    Empty,

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Compress the file set into a deflate zip blob.
pub fn archive(files: &[VirtualFile]) -> Result<Vec<u8>, ArchiveError> {
    if files.is_empty() {
        return Err(ArchiveError::Empty);
    }

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for file in files {
        zip.start_file(file.path.as_str(), options)?;
        zip.write_all(&file.content)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

/// Unpack a blob produced by [`archive`] back into virtual files.
pub fn extract(blob: &[u8]) -> Result<Vec<VirtualFile>, ArchiveError> {
    let mut zip = ZipArchive::new(Cursor::new(blob))?;
    let mut files = Vec::with_capacity(zip.len());
    for index in 0..zip.len() {
        let mut entry = zip.by_index(index)?;
        if entry.is_dir() {
            continue;
        }
        let mut content = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut content)?;
        files.push(VirtualFile {
            path: entry.name().to_string(),
            content,
        });
    }
    Ok(files)
}
