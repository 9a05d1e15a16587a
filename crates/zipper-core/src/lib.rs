//! Zipper - filtered, size-bounded ZIP archiving
//!
//! Scans a base directory, selects files with include/exclude glob patterns
//! and streams them into a ZIP archive whose compressed size is kept under a
//! budget, reporting progress as each file starts.
//!
//! ```no_run
//! use zipper_core::{zip_directory_to_bytes, ZipOptions};
//!
//! let mut listener = |file: &str, compressed: u64| {
//!     println!("{} (after {} compressed bytes)", file, compressed);
//! };
//! let bytes = zip_directory_to_bytes(
//!     "project",
//!     Some("**/*.java, !**/test/**"),
//!     &ZipOptions::with_max_zip_size(10 * 1024 * 1024),
//!     Some(&mut listener),
//! )?;
//! # Ok::<(), zipper_core::Error>(())
//! ```

pub mod archive;
pub mod config;
pub mod error;
pub mod filter;
pub mod pattern;
pub mod selector;

pub use error::{Error, Result};

// Re-export commonly used types
pub use archive::{
    write_archive, zip_directory, zip_directory_to_bytes, zip_directory_with_patterns,
    zip_directory_with_patterns_to_bytes, ProgressListener, ZipOptions,
};
pub use filter::FilterPatterns;
pub use selector::{select_files, FileSelector, Selection};
