//! Streaming ZIP writer with size budget and progress notification

use super::budget::SizeBudget;
use super::{ProgressListener, ZipOptions};
use crate::{Error, Result};
use flate2::write::DeflateEncoder;
use flate2::Compression;
use std::fs::{File, Metadata};
use std::io::{self, Seek, Write};
use std::path::Path;
use tracing::{debug, info, warn};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Entries at or above this size need ZIP64 extensions
const ZIP64_THRESHOLD: u64 = u32::MAX as u64;

/// Write `files` (relative to `base_dir`, in order) into a ZIP archive on
/// `output`.
///
/// For every file: unreadable files are skipped with a warning, then the
/// budget is checked, then the listener is told about the file together with
/// the compressed bytes written so far, then the file is compressed.
///
/// An empty `files` list drops `output` and fails with
/// [`Error::NoFilesToArchive`]. When the budget would be crossed the archive
/// is finished with the entries written so far, `output` is dropped, and
/// [`Error::BudgetExceeded`] names the file that did not fit.
pub fn write_archive<P, S, W>(
    base_dir: P,
    files: &[S],
    output: W,
    options: &ZipOptions,
    mut listener: Option<ProgressListener<'_>>,
) -> Result<W>
where
    P: AsRef<Path>,
    S: AsRef<str>,
    W: Write + Seek,
{
    let base_dir = base_dir.as_ref();

    if files.is_empty() {
        drop(output);
        info!("No files to zip");
        return Err(Error::NoFilesToArchive);
    }

    let mut session = ArchiveSession::new(output, options)?;

    for name in files {
        let name = name.as_ref();
        debug!("Adding file to zip: {}", name);

        let path = base_dir.join(name);
        let Some((file, metadata)) = open_readable(&path) else {
            continue;
        };

        if session.budget.would_exceed(session.compressed_size, metadata.len()) {
            info!(
                "Maximum zip file size reached. Zip size: {} bytes Limit: {} bytes",
                session.compressed_size,
                session.budget.limit()
            );
            let bytes_so_far = session.compressed_size;
            let budget = session.budget.limit();
            drop(session.finish()?);
            return Err(Error::BudgetExceeded {
                file_name: name.to_string(),
                bytes_so_far,
                budget,
            });
        }

        if let Some(notify) = listener.as_deref_mut() {
            notify(name, session.compressed_size);
        }

        session.append(name, file, &metadata)?;
    }

    session.finish()
}

/// Open a selected file, or log and return `None` if it cannot be read
fn open_readable(path: &Path) -> Option<(File, Metadata)> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            warn!("Skipping unreadable file: {:?} ({})", path, e);
            return None;
        }
    };

    match file.metadata() {
        Ok(metadata) if metadata.is_file() => Some((file, metadata)),
        Ok(_) => {
            warn!("Skipping unreadable file: {:?} (not a regular file)", path);
            None
        }
        Err(e) => {
            warn!("Skipping unreadable file: {:?} ({})", path, e);
            None
        }
    }
}

/// State of one archive write
struct ArchiveSession<W: Write + Seek> {
    zip: ZipWriter<W>,
    budget: SizeBudget,
    level: Compression,
    compressed_size: u64,
}

impl<W: Write + Seek> ArchiveSession<W> {
    fn new(output: W, options: &ZipOptions) -> Result<Self> {
        Ok(Self {
            zip: ZipWriter::new(output),
            budget: options.budget(),
            level: options.compression()?,
            compressed_size: 0,
        })
    }

    /// Compress one file into a new entry and account for its compressed size
    fn append(&mut self, name: &str, mut file: File, metadata: &Metadata) -> Result<()> {
        let options = self.entry_options(metadata);
        self.zip.start_file(name, options)?;

        let entry_size = if self.is_stored() {
            io::copy(&mut file, &mut self.zip)?
        } else {
            // Entry size is counted by a same-level deflate stream into a sink
            let mut probe = DeflateEncoder::new(io::sink(), self.level);
            io::copy(
                &mut file,
                &mut TeeWriter {
                    primary: &mut self.zip,
                    secondary: &mut probe,
                },
            )?;
            probe.try_finish()?;
            probe.total_out()
        };

        self.compressed_size += entry_size;
        debug!(
            "Compressed {} ({} bytes -> {} bytes, total {} bytes)",
            name,
            metadata.len(),
            entry_size,
            self.compressed_size
        );
        Ok(())
    }

    /// Level 0 writes entries uncompressed
    fn is_stored(&self) -> bool {
        self.level.level() == 0
    }

    fn entry_options(&self, metadata: &Metadata) -> FileOptions<'static, ()> {
        let options =
            FileOptions::<'static, ()>::default().large_file(metadata.len() >= ZIP64_THRESHOLD);
        let options = if self.is_stored() {
            options
                .compression_method(CompressionMethod::Stored)
                .compression_level(None)
        } else {
            options
                .compression_method(CompressionMethod::Deflated)
                .compression_level(Some(i64::from(self.level.level())))
        };

        #[cfg(unix)]
        let options = {
            use std::os::unix::fs::PermissionsExt;
            options.unix_permissions(metadata.permissions().mode())
        };

        options
    }

    /// Write the central directory and hand back the flushed sink
    fn finish(self) -> Result<W> {
        let mut output = self.zip.finish()?;
        output.flush()?;
        Ok(output)
    }
}

/// Copies every write to a second writer
struct TeeWriter<'a, A: Write, B: Write> {
    primary: &'a mut A,
    secondary: &'a mut B,
}

impl<A: Write, B: Write> Write for TeeWriter<'_, A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.primary.write(buf)?;
        self.secondary.write_all(&buf[..written])?;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.primary.flush()?;
        self.secondary.flush()
    }
}
