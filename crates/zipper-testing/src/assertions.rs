//! Common assertions for zipper testing

use crate::helpers::read_archive;
use anyhow::Result;
use std::path::Path;

/// Asserts that an archive holds exactly `expected` entries, in that order,
/// each byte-identical to the same relative path under `base_dir`
pub fn assert_archive_matches(bytes: &[u8], base_dir: &Path, expected: &[&str]) -> Result<()> {
    let entries = read_archive(bytes)?;
    let names: Vec<&str> = entries.iter().map(|(name, _)| name.as_str()).collect();

    assert_eq!(names, expected, "Archive entries differ");

    for (name, content) in &entries {
        let original = std::fs::read(base_dir.join(name))?;
        assert_eq!(
            content, &original,
            "Content mismatch for archive entry {}",
            name
        );
    }

    Ok(())
}

/// Asserts that an archive has no entry called `name`
pub fn assert_no_entry(bytes: &[u8], name: &str) -> Result<()> {
    let entries = read_archive(bytes)?;
    assert!(
        entries.iter().all(|(entry, _)| entry != name),
        "Unexpected archive entry {}",
        name
    );
    Ok(())
}
