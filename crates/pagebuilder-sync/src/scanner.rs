//! Directory scanner for the template root.
//!
//! Lists template directories one level under the root, non-recursively.
//! Each directory name is a template identifier. Output order follows the
//! filesystem; callers must not assume sorted output.
//!
//! # Layout consumed
//!
//! ```text
//! {root}/
//!   home/
//!     config.toml
//!   about/
//!   dynamic/
//!     config.toml
//! ```
//!
//! A directory whose path contains the dynamic-namespace marker is treated
//! as the dynamic namespace, by path convention only.

use crate::error::SyncError;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the per-template configuration descriptor.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// A template directory discovered under the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDir {
    /// Directory name, used as the template identifier.
    pub folder_name: String,
    /// Full path of the directory.
    pub path: PathBuf,
    /// Path of the configuration descriptor, when one exists. A missing
    /// descriptor means "no sections for this template", not an error.
    pub config_path: Option<PathBuf>,
    /// Whether the directory resides under the dynamic namespace.
    pub is_dynamic: bool,
}

/// Scans a template root for template directories.
#[derive(Debug, Clone)]
pub struct Scanner {
    root: PathBuf,
    dynamic_marker: String,
}

impl Scanner {
    /// Creates a scanner with the default dynamic-namespace marker
    /// (`"dynamic"`).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            dynamic_marker: "dynamic".to_string(),
        }
    }

    /// Overrides the dynamic-namespace marker.
    #[must_use]
    pub fn with_dynamic_marker(mut self, marker: impl Into<String>) -> Self {
        self.dynamic_marker = marker.into();
        self
    }

    /// Returns the root path this scanner walks.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Starts a lazy scan of the root.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Io` when the root does not exist or is
    /// unreadable. The caller aborts the run in that case.
    pub fn scan(&self) -> Result<Scan, SyncError> {
        let entries = fs::read_dir(&self.root).map_err(|e| SyncError::io(&self.root, e))?;
        Ok(Scan {
            entries,
            root: self.root.clone(),
            dynamic_marker: self.dynamic_marker.clone(),
        })
    }
}

/// Lazy iterator over template directories. Non-directory entries under the
/// root are skipped.
#[derive(Debug)]
pub struct Scan {
    entries: fs::ReadDir,
    root: PathBuf,
    dynamic_marker: String,
}

impl Iterator for Scan {
    type Item = Result<TemplateDir, SyncError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(SyncError::io(&self.root, e))),
            };

            let path = entry.path();
            if !path.is_dir() {
                continue;
            }

            let folder_name = entry.file_name().to_string_lossy().into_owned();
            let config = path.join(CONFIG_FILE_NAME);
            let config_path = config.is_file().then_some(config);
            let is_dynamic = path.to_string_lossy().contains(&self.dynamic_marker);

            return Some(Ok(TemplateDir {
                folder_name,
                path,
                config_path,
                is_dynamic,
            }));
        }
    }
}
