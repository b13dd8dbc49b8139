//! Locating the bundled data file.
//!
//! The dataset ships next to the application as `BA_Dataset.xlsx`. An explicit
//! file path always wins; otherwise the file is looked up in a base directory,
//! which defaults to the current directory and can be overridden at runtime.

use std::path::{Path, PathBuf};

/// Default data file name.
pub const DEFAULT_DATA_FILE: &str = "BA_Dataset.xlsx";

/// Environment variable overriding the base directory.
pub const BASE_PATH_ENV: &str = "SALESBOARD_BASE_PATH";

/// Resolved location of the data file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    /// Directory the data file is looked up in.
    pub base_dir: PathBuf,
    /// Full path to the data file.
    pub data_file: PathBuf,
}

impl DataPaths {
    /// Resolve the data file.
    ///
    /// # Arguments
    /// * `data_file` - Explicit file path; relative paths are kept as given
    /// * `base_dir` - Base directory override
    pub fn resolve(data_file: Option<&Path>, base_dir: Option<&Path>) -> Self {
        let base_dir = base_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let data_file = match data_file {
            Some(path) => path.to_path_buf(),
            None => base_dir.join(DEFAULT_DATA_FILE),
        };

        Self { base_dir, data_file }
    }
}
