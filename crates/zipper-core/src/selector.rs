//! Directory scanning and file selection

use crate::filter::FilterPatterns;
use crate::pattern::PatternSet;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn, Level};
use walkdir::WalkDir;

/// Outcome of a directory scan
///
/// `files` holds base-relative, `/`-separated paths in traversal order.
/// The other lists are kept for diagnostics only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    files: Vec<String>,
    excluded: Vec<String>,
    not_followed_symlinks: Vec<String>,
}

impl Selection {
    /// Selected files, in traversal order
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Files that matched an include pattern but were rejected by an exclude
    pub fn excluded_files(&self) -> &[String] {
        &self.excluded
    }

    /// Symlinked directories that were not descended into
    pub fn not_followed_symlinks(&self) -> &[String] {
        &self.not_followed_symlinks
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn into_files(self) -> Vec<String> {
        self.files
    }
}

/// Selects the files under a base directory that pass a filter
#[derive(Debug, Clone)]
pub struct FileSelector {
    base_dir: PathBuf,
    patterns: PatternSet,
}

impl FileSelector {
    pub fn new<P: AsRef<Path>>(base_dir: P, filter: &FilterPatterns) -> Result<Self> {
        Ok(Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            patterns: PatternSet::compile(filter)?,
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Walk the base directory and collect the selected files.
    ///
    /// Symlinked directories are not descended into; a symlink to a regular
    /// file is selected under its own name. A missing or unreadable base
    /// directory gives an empty selection, and unreadable subdirectories are
    /// skipped.
    pub fn select(&self) -> Selection {
        let mut selection = Selection::default();

        if !self.base_dir.is_dir() {
            info!("Base directory {:?} does not exist or is not a directory", self.base_dir);
            return selection;
        }

        let walker = WalkDir::new(&self.base_dir)
            .follow_links(false)
            .min_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                continue;
            }

            let Some(relative) = relative_name(&self.base_dir, entry.path()) else {
                warn!("Skipping path that is not valid UTF-8: {:?}", entry.path());
                continue;
            };

            if file_type.is_symlink() {
                match fs::metadata(entry.path()) {
                    Ok(target) if target.is_file() => {}
                    Ok(target) if target.is_dir() => {
                        selection.not_followed_symlinks.push(relative);
                        continue;
                    }
                    _ => {
                        debug!("Skipping dangling or special symlink: {}", relative);
                        continue;
                    }
                }
            } else if !file_type.is_file() {
                continue;
            }

            if !self.patterns.is_included(&relative) {
                continue;
            }

            if self.patterns.is_excluded(&relative) {
                selection.excluded.push(relative);
            } else {
                selection.files.push(relative);
            }
        }

        if tracing::enabled!(Level::DEBUG) {
            log_selection(&self.base_dir, &selection);
        }

        selection
    }
}

/// Scan `base_dir` with the given filter
pub fn select_files<P: AsRef<Path>>(base_dir: P, filter: &FilterPatterns) -> Result<Selection> {
    Ok(FileSelector::new(base_dir, filter)?.select())
}

/// Base-relative path joined with `/`, or `None` if not valid UTF-8
fn relative_name(base: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(base).ok()?;
    let parts = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}

fn log_selection(base_dir: &Path, selection: &Selection) {
    debug!("Base Directory: {:?}", base_dir);
    for file in selection.files() {
        debug!("Included: {}", file);
    }
    for file in selection.excluded_files() {
        debug!("Excluded File: {}", file);
    }
    for link in selection.not_followed_symlinks() {
        debug!("Not followed symbolic link: {}", link);
    }
}
