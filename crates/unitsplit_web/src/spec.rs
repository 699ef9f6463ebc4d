//! Service state, request payloads and response models.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

////////////////////////////////////////////////////////////////////////////////
// #region State

/// Directories the service reads uploads from and writes outputs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecStorageDirs {
    pub dir_uploads: PathBuf,
    pub dir_outputs: PathBuf,
}

impl SpecStorageDirs {
    /// Create both directories if missing.
    pub fn ensure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir_uploads)?;
        std::fs::create_dir_all(&self.dir_outputs)
    }
}

/// Shared handler state. Holds no per-request data.
#[derive(Debug, Clone)]
pub struct AppState {
    pub dirs: Arc<SpecStorageDirs>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(dirs: SpecStorageDirs, max_upload_bytes: usize) -> Self {
        Self {
            dirs: Arc::new(dirs),
            max_upload_bytes,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Requests

/// Which uploaded table(s) to work on and how to pick the org-unit column.
#[derive(Debug, Clone, Deserialize)]
pub struct SpecSelectionRequest {
    /// Path (or file name) of the uploaded main table.
    pub main_file_path: String,
    /// Org-unit column; detected from the table when absent.
    #[serde(default)]
    pub college_column: Option<String>,
    /// Drop check-file rows already present in the main file.
    #[serde(default)]
    pub use_deduplication: bool,
    /// Path (or file name) of the uploaded check table.
    #[serde(default)]
    pub check_file_path: Option<String>,
}

impl SpecSelectionRequest {
    /// Check file path when deduplication is requested and a check file was given.
    pub fn check_file_for_dedup(&self) -> Option<&str> {
        if !self.use_deduplication {
            return None;
        }
        self.check_file_path
            .as_deref()
            .filter(|val| !val.trim().is_empty())
    }
}

/// Payload of `POST /process-college`.
#[derive(Debug, Clone, Deserialize)]
pub struct SpecProcessRequest {
    #[serde(flatten)]
    pub selection: SpecSelectionRequest,
    /// Org-unit value to split on, typed as it was reported by the upload.
    #[serde(default)]
    pub selected_college: Value,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Responses

#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub filename: String,
    pub file_path: String,
    pub file_type: String,
    pub record_count: usize,
    pub college_column: Option<String>,
    pub colleges: Vec<Value>,
    pub has_wos: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatisticsResponse {
    pub success: bool,
    pub college_stats: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessResponse {
    pub success: bool,
    pub college_file: String,
    pub remaining_file: String,
    pub college_count: usize,
    pub remaining_count: usize,
    pub original_count: usize,
    pub removed_count: usize,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
