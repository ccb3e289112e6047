// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration files on disk.
//!
//! Reads the text of a configuration source given its path, or locates it in
//! the OS-appropriate configuration directory.

use crate::domain::{ConfigError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum allowed size for configuration files (10MB)
const MAX_SOURCE_FILE_SIZE: u64 = 10 * 1024 * 1024;

const SOURCE_NAME: &str = "file";

/// The text of a configuration file together with where it was read from.
///
/// # Examples
///
/// ```rust,no_run
/// use treecfg::adapters::SourceFile;
///
/// let source = SourceFile::read("/etc/myapp/app.xml").unwrap();
/// assert_eq!(source.extension(), Some("xml"));
/// ```
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: PathBuf,
    content: String,
}

impl SourceFile {
    /// Reads a configuration file.
    ///
    /// The path is canonicalized and the file size is checked before reading.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file_path = path.as_ref();

        let canonical_path = file_path.canonicalize().map_err(|e| ConfigError::SourceError {
            source_name: SOURCE_NAME.to_string(),
            message: format!("Invalid or inaccessible path: {}", display_name(file_path)),
            source: Some(Box::new(e)),
        })?;

        let metadata = fs::metadata(&canonical_path).map_err(|e| ConfigError::SourceError {
            source_name: SOURCE_NAME.to_string(),
            message: format!(
                "Failed to read file metadata: {}",
                display_name(&canonical_path)
            ),
            source: Some(Box::new(e)),
        })?;

        if metadata.len() > MAX_SOURCE_FILE_SIZE {
            return Err(ConfigError::SourceError {
                source_name: SOURCE_NAME.to_string(),
                message: format!(
                    "Configuration file too large: {} bytes (max {} bytes)",
                    metadata.len(),
                    MAX_SOURCE_FILE_SIZE
                ),
                source: None,
            });
        }

        let content = fs::read_to_string(&canonical_path).map_err(|e| ConfigError::SourceError {
            source_name: SOURCE_NAME.to_string(),
            message: format!(
                "Failed to read configuration file: {}",
                display_name(&canonical_path)
            ),
            source: Some(Box::new(e)),
        })?;

        tracing::debug!(
            "Read configuration file {} ({} bytes)",
            canonical_path.display(),
            content.len()
        );

        Ok(Self {
            path: canonical_path,
            content,
        })
    }

    /// Reads `filename` from the OS-appropriate configuration directory.
    ///
    /// # Arguments
    ///
    /// * `app_name` - The application name (e.g., "myapp")
    /// * `qualifier` - The organization/qualifier (e.g., "com.example")
    /// * `filename` - The configuration file name (e.g., "app.xml")
    pub fn from_default_location(app_name: &str, qualifier: &str, filename: &str) -> Result<Self> {
        Self::read(Self::default_path(app_name, qualifier, filename)?)
    }

    /// Returns where [`from_default_location`](Self::from_default_location) looks.
    pub fn default_path(app_name: &str, qualifier: &str, filename: &str) -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| ConfigError::SourceError {
                source_name: SOURCE_NAME.to_string(),
                message: "Failed to determine project directories".to_string(),
                source: None,
            })?;

        Ok(proj_dirs.config_dir().join(filename))
    }

    /// Returns the canonical path the file was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the file extension, which selects a parser when no format is given.
    pub fn extension(&self) -> Option<&str> {
        self.path.extension().and_then(|ext| ext.to_str())
    }

    /// Returns the file's text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consumes the source, returning its text.
    pub fn into_content(self) -> String {
        self.content
    }
}

fn display_name(path: &Path) -> &str {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
}
