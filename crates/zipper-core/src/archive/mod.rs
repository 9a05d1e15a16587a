//! Archive operations module
//!
//! The entry points scan a base directory, select files with a filter and
//! write them into a ZIP archive, either on a caller supplied sink or into an
//! in-memory buffer.

pub mod budget;
pub mod writer;

pub use budget::{ratio_estimate, SizeBudget, SizeEstimator};
pub use writer::write_archive;

use crate::filter::FilterPatterns;
use crate::selector::select_files;
use crate::{Error, Result};
use flate2::Compression;
use std::io::{Cursor, Seek, Write};
use std::path::Path;

/// Called before each file is compressed with the file's relative path and
/// the number of compressed bytes written so far
pub type ProgressListener<'a> = &'a mut dyn FnMut(&str, u64);

/// Highest deflate level understood by the writer
pub const MAX_COMPRESSION_LEVEL: u32 = 9;

/// Options for archive creation
#[derive(Debug, Clone, Copy)]
pub struct ZipOptions {
    /// Compressed size limit in bytes, checked on file boundaries (0 = unlimited)
    pub max_zip_size: u64,
    /// Deflate level 0-9 (default 6); 0 stores entries uncompressed
    pub compression_level: Option<u32>,
    /// Estimates a file's compressed size for the budget check
    pub estimator: SizeEstimator,
}

impl Default for ZipOptions {
    fn default() -> Self {
        Self {
            max_zip_size: 0,
            compression_level: None,
            estimator: ratio_estimate,
        }
    }
}

impl ZipOptions {
    /// Default options with a size limit
    pub fn with_max_zip_size(max_zip_size: u64) -> Self {
        Self {
            max_zip_size,
            ..Default::default()
        }
    }

    pub fn budget(&self) -> SizeBudget {
        SizeBudget::new(self.max_zip_size, self.estimator)
    }

    /// Validated deflate level
    pub fn compression(&self) -> Result<Compression> {
        match self.compression_level {
            None => Ok(Compression::default()),
            Some(level) if level <= MAX_COMPRESSION_LEVEL => Ok(Compression::new(level)),
            Some(level) => Err(Error::Config(format!(
                "Compression level {} is out of range 0-{}",
                level, MAX_COMPRESSION_LEVEL
            ))),
        }
    }
}

/// Zip the files under `base_dir` that pass a delimited filter string
/// (see [`FilterPatterns::parse`]) onto `output`.
///
/// Returns the sink after the archive has been finished. Fails with
/// [`Error::NoFilesToArchive`] when nothing was selected and with
/// [`Error::BudgetExceeded`] when `options.max_zip_size` is reached; the
/// sink is dropped in both cases.
pub fn zip_directory<P, W>(
    base_dir: P,
    filter: Option<&str>,
    output: W,
    options: &ZipOptions,
    listener: Option<ProgressListener<'_>>,
) -> Result<W>
where
    P: AsRef<Path>,
    W: Write + Seek,
{
    zip_filtered(
        base_dir.as_ref(),
        &FilterPatterns::parse(filter),
        output,
        options,
        listener,
    )
}

/// Like [`zip_directory`], with separate include and exclude pattern lists
pub fn zip_directory_with_patterns<P, I, E, W>(
    base_dir: P,
    includes: &[I],
    excludes: &[E],
    output: W,
    options: &ZipOptions,
    listener: Option<ProgressListener<'_>>,
) -> Result<W>
where
    P: AsRef<Path>,
    I: AsRef<str>,
    E: AsRef<str>,
    W: Write + Seek,
{
    zip_filtered(
        base_dir.as_ref(),
        &FilterPatterns::new(includes, excludes),
        output,
        options,
        listener,
    )
}

/// Like [`zip_directory`], returning the archive bytes
pub fn zip_directory_to_bytes<P: AsRef<Path>>(
    base_dir: P,
    filter: Option<&str>,
    options: &ZipOptions,
    listener: Option<ProgressListener<'_>>,
) -> Result<Vec<u8>> {
    let buffer = zip_directory(base_dir, filter, Cursor::new(Vec::new()), options, listener)?;
    Ok(buffer.into_inner())
}

/// Like [`zip_directory_with_patterns`], returning the archive bytes
pub fn zip_directory_with_patterns_to_bytes<P, I, E>(
    base_dir: P,
    includes: &[I],
    excludes: &[E],
    options: &ZipOptions,
    listener: Option<ProgressListener<'_>>,
) -> Result<Vec<u8>>
where
    P: AsRef<Path>,
    I: AsRef<str>,
    E: AsRef<str>,
{
    let buffer = zip_directory_with_patterns(
        base_dir,
        includes,
        excludes,
        Cursor::new(Vec::new()),
        options,
        listener,
    )?;
    Ok(buffer.into_inner())
}

fn zip_filtered<W: Write + Seek>(
    base_dir: &Path,
    filter: &FilterPatterns,
    output: W,
    options: &ZipOptions,
    listener: Option<ProgressListener<'_>>,
) -> Result<W> {
    let selection = select_files(base_dir, filter)?;
    write_archive(base_dir, selection.files(), output, options, listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ZipOptions::default();
        assert_eq!(options.max_zip_size, 0);
        assert!(options.budget().is_unlimited());
        assert_eq!(options.compression().unwrap().level(), 6);
    }

    #[test]
    fn test_compression_level_range() {
        let mut options = ZipOptions::with_max_zip_size(10);
        options.compression_level = Some(0);
        assert_eq!(options.compression().unwrap().level(), 0);
        options.compression_level = Some(9);
        assert_eq!(options.compression().unwrap().level(), 9);
        options.compression_level = Some(10);
        assert!(options.compression().is_err());
    }
}
