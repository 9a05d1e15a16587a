//! Helpers for reading archives back in tests

use anyhow::Result;
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// Entry names and contents of an in-memory ZIP, in archive order
pub fn read_archive(bytes: &[u8]) -> Result<Vec<(String, Vec<u8>)>> {
    read_entries(Cursor::new(bytes))
}

/// Entry names and contents of a ZIP file on disk, in archive order
pub fn read_archive_file(path: &Path) -> Result<Vec<(String, Vec<u8>)>> {
    read_entries(File::open(path)?)
}

/// Entry names of an in-memory ZIP, in archive order
pub fn entry_names(bytes: &[u8]) -> Result<Vec<String>> {
    Ok(read_archive(bytes)?
        .into_iter()
        .map(|(name, _)| name)
        .collect())
}

fn read_entries<R: Read + Seek>(reader: R) -> Result<Vec<(String, Vec<u8>)>> {
    let mut archive = ZipArchive::new(reader)?;
    let mut entries = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let mut content = Vec::new();
        file.read_to_end(&mut content)?;
        entries.push((file.name().to_string(), content));
    }

    Ok(entries)
}
