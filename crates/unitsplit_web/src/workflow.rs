//! Blocking request pipelines: load -> (dedup) -> select -> partition -> renumber -> export.
//!
//! Handlers run these on the blocking thread pool.

use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;
use serde_json::{Map, Value};
use unitsplit_io_xlsx::{C_EXT_XLSX, EnumExportPath, export_with_template, load_table};
use unitsplit_table::{
    C_COLNAME_ACCESSION, MissingColumnError, TableError, count_values,
    deduplicate, derive_cell_display_text, derive_distinct_values, find_org_unit_column,
    partition, renumber, require_column,
};

use crate::conf::C_STEM_REMAINING;
use crate::error::WebError;
use crate::spec::{ProcessResponse, SpecSelectionRequest, SpecStorageDirs};
use crate::storage::derive_unique_output_path;
use crate::util::{derive_cell_from_json, derive_json_from_cell};

const C_LABEL_MAIN: &str = "main file";
const C_LABEL_CHECK: &str = "check file";

////////////////////////////////////////////////////////////////////////////////
// #region Upload

/// What the client needs to know about a freshly uploaded table.
#[derive(Debug, Clone)]
pub struct SpecUploadSummary {
    pub record_count: usize,
    pub college_column: Option<String>,
    pub colleges: Vec<Value>,
    pub has_wos: bool,
}

/// Load an uploaded table and report its size, org-unit column and distinct org units.
pub fn summarize_upload(path: &Path) -> Result<SpecUploadSummary, WebError> {
    let df = load_table(path)?;
    let college_column = find_org_unit_column(&df);
    let colleges = match &college_column {
        Some(c_col) => derive_distinct_values(&df, c_col)?
            .iter()
            .map(derive_json_from_cell)
            .collect(),
        None => Vec::new(),
    };
    let has_wos = require_column(&df, C_COLNAME_ACCESSION, C_LABEL_MAIN).is_ok();

    tracing::info!(
        path = %path.display(),
        n_rows = df.height(),
        college_column = college_column.as_deref().unwrap_or(""),
        n_colleges = colleges.len(),
        has_wos,
        "Upload loaded"
    );

    Ok(SpecUploadSummary {
        record_count: df.height(),
        college_column,
        colleges,
        has_wos,
    })
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WorkingTable

/// Table a selection request operates on, after optional deduplication.
#[derive(Debug, Clone)]
pub struct SpecWorkingTable {
    pub df: DataFrame,
    /// Workbook whose look the outputs replicate.
    pub path_template: PathBuf,
    /// Row count before deduplication.
    pub n_original: usize,
    /// Rows dropped by deduplication.
    pub n_removed: usize,
    /// Label used in missing-column messages.
    pub c_label: &'static str,
}

/// Load the main table, or the check table minus rows already in the main table.
pub fn load_working_table(
    dirs: &SpecStorageDirs,
    request: &SpecSelectionRequest,
) -> Result<SpecWorkingTable, WebError> {
    let path_main = dirs.resolve_uploaded(&request.main_file_path)?;
    let df_main = load_table(&path_main)?;

    let Some(c_path_check) = request.check_file_for_dedup() else {
        return Ok(SpecWorkingTable {
            n_original: df_main.height(),
            df: df_main,
            path_template: path_main,
            n_removed: 0,
            c_label: C_LABEL_MAIN,
        });
    };

    let path_check = dirs.resolve_uploaded(c_path_check)?;
    let df_check = load_table(&path_check)?;
    let result = deduplicate(&df_check, &df_main, C_COLNAME_ACCESSION)
        .map_err(derive_dedup_error)?;

    tracing::info!(
        n_rows_check = df_check.height(),
        n_rows_main = df_main.height(),
        n_removed = result.n_removed,
        "Deduplicated check file against main file"
    );

    Ok(SpecWorkingTable {
        n_original: df_check.height(),
        df: result.df_kept,
        path_template: path_check,
        n_removed: result.n_removed,
        c_label: C_LABEL_CHECK,
    })
}

/// Re-label dedup errors with the names the client knows the tables by.
fn derive_dedup_error(err: TableError) -> WebError {
    match err {
        TableError::MissingColumn(err) => {
            let c_label = if err.table == "candidate table" {
                C_LABEL_CHECK
            } else {
                C_LABEL_MAIN
            };
            WebError::MissingColumn(MissingColumnError::new(err.column, c_label))
        }
        other => other.into(),
    }
}

/// Requested org-unit column, else the detected one; must exist in the working table.
fn resolve_college_column(
    working: &SpecWorkingTable,
    request: &SpecSelectionRequest,
) -> Result<String, WebError> {
    let c_col = match request
        .college_column
        .as_deref()
        .filter(|val| !val.is_empty())
    {
        Some(val) => val.to_string(),
        None => find_org_unit_column(&working.df)
            .ok_or_else(|| WebError::BadRequest("table has no columns".to_string()))?,
    };
    require_column(&working.df, &c_col, working.c_label)?;
    Ok(c_col)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Statistics

/// Row count per org unit, ordered by count descending then first appearance.
///
/// Keys are the units' display texts.
pub fn derive_college_statistics(
    dirs: &SpecStorageDirs,
    request: &SpecSelectionRequest,
) -> Result<Map<String, Value>, WebError> {
    let working = load_working_table(dirs, request)?;
    let c_col = resolve_college_column(&working, request)?;

    let mut dict_stats = Map::new();
    for (value, n_count) in count_values(&working.df, &c_col)? {
        dict_stats.insert(derive_cell_display_text(&value), Value::from(n_count));
    }

    tracing::info!(
        college_column = %c_col,
        n_colleges = dict_stats.len(),
        "College statistics computed"
    );
    Ok(dict_stats)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Process

/// Split the working table on `selected_college` and export both sides.
pub fn process_college(
    dirs: &SpecStorageDirs,
    request: &SpecSelectionRequest,
    selected_college: &Value,
) -> Result<ProcessResponse, WebError> {
    let value = derive_cell_from_json(selected_college).ok_or_else(|| {
        WebError::BadRequest("selected_college must be a scalar value".to_string())
    })?;
    let c_value = derive_cell_display_text(&value);

    let working = load_working_table(dirs, request)?;
    let c_col = resolve_college_column(&working, request)?;

    let parts = partition(&working.df, &c_col, &value)?;
    if parts.df_matching.height() == 0 {
        return Err(WebError::BadRequest(format!(
            "no records found for \"{c_value}\""
        )));
    }
    let df_college = renumber(parts.df_matching)?;
    let df_remaining = renumber(parts.df_non_matching)?;

    // The second name is derived after the first file exists, so the two never collide.
    let path_college = derive_unique_output_path(&dirs.dir_outputs, &c_value, C_EXT_XLSX);
    write_output(&working.path_template, &df_college, &path_college)?;
    let path_remaining =
        derive_unique_output_path(&dirs.dir_outputs, C_STEM_REMAINING, C_EXT_XLSX);
    write_output(&working.path_template, &df_remaining, &path_remaining)?;

    let response = ProcessResponse {
        success: true,
        college_file: derive_file_name(&path_college),
        remaining_file: derive_file_name(&path_remaining),
        college_count: df_college.height(),
        remaining_count: df_remaining.height(),
        original_count: working.n_original,
        removed_count: working.n_removed,
    };
    tracing::info!(
        college = %c_value,
        college_column = %c_col,
        college_file = %response.college_file,
        remaining_file = %response.remaining_file,
        college_count = response.college_count,
        remaining_count = response.remaining_count,
        "College processed"
    );
    Ok(response)
}

fn write_output(path_template: &Path, df: &DataFrame, path_out: &Path) -> Result<(), WebError> {
    let report = export_with_template(path_template, df, path_out)?;
    if report.export_path == EnumExportPath::Fallback {
        tracing::warn!(
            output = %path_out.display(),
            "Output written without template styles"
        );
    }
    for c_warning in &report.warnings {
        tracing::debug!(output = %path_out.display(), "{c_warning}");
    }
    Ok(())
}

fn derive_file_name(path: &Path) -> String {
    path.file_name()
        .map(|c_name| c_name.to_string_lossy().to_string())
        .unwrap_or_default()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
