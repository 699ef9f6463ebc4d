//! Shared XLSX specification models.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell format specification, one named style slot of a template.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<f64>,
    /// Bold style.
    pub bold: Option<bool>,
    /// Italic style.
    pub italic: Option<bool>,
    /// Underline code (`0` none, `1` single, `2` double, `33`/`34` accounting).
    pub underline: Option<i64>,

    /// Horizontal alignment.
    pub align: Option<String>,
    /// Vertical alignment.
    pub valign: Option<String>,
    /// Border style for all sides.
    pub border: Option<i64>,
    /// Text wrap.
    pub text_wrap: Option<bool>,

    /// Top border override.
    pub top: Option<i64>,
    /// Bottom border override.
    pub bottom: Option<i64>,
    /// Left border override.
    pub left: Option<i64>,
    /// Right border override.
    pub right: Option<i64>,

    /// Number format code.
    pub num_format: Option<String>,
    /// Background fill color (`#RRGGBB`).
    pub bg_color: Option<String>,
    /// Font color (`#RRGGBB`).
    pub font_color: Option<String>,
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            font_name: other.font_name.clone().or_else(|| self.font_name.clone()),
            font_size: other.font_size.or(self.font_size),
            bold: other.bold.or(self.bold),
            italic: other.italic.or(self.italic),
            underline: other.underline.or(self.underline),
            align: other.align.clone().or_else(|| self.align.clone()),
            valign: other.valign.clone().or_else(|| self.valign.clone()),
            border: other.border.or(self.border),
            text_wrap: other.text_wrap.or(self.text_wrap),
            top: other.top.or(self.top),
            bottom: other.bottom.or(self.bottom),
            left: other.left.or(self.left),
            right: other.right.or(self.right),
            num_format: other.num_format.clone().or_else(|| self.num_format.clone()),
            bg_color: other.bg_color.clone().or_else(|| self.bg_color.clone()),
            font_color: other.font_color.clone().or_else(|| self.font_color.clone()),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region TemplateSpecification

/// One header cell of a template: its text and its style.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecTemplateCell {
    /// Displayed cell text; empty for blank cells.
    pub text: String,
    /// Cell style.
    pub fmt: SpecCellFormat,
}

/// In-memory styled-document model read from a template workbook.
///
/// Holds named style slots (header row, data row) plus sheet geometry. Column vectors are
/// indexed by 0-based column; `dict_heights_by_row` is keyed by 0-based row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecTemplateStyle {
    /// Worksheet name of the template's first sheet.
    pub sheet_name: String,
    /// Row-1 cells for every template column.
    pub l_cells_header: Vec<SpecTemplateCell>,
    /// Data style per column (row 2, else row 1), boldness forced off.
    pub l_fmts_data: Vec<SpecCellFormat>,
    /// Column widths in Excel character units as stored in the template.
    pub l_widths_by_col: Vec<Option<f64>>,
    /// Explicit row heights in points.
    pub dict_heights_by_row: BTreeMap<u32, f64>,
    /// Number of used rows in the template.
    pub n_rows: usize,
}

impl SpecTemplateStyle {
    /// Number of template columns.
    pub fn n_cols(&self) -> usize {
        self.l_cells_header.len()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportSpecification

/// Export path actually used to produce an output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumExportPath {
    /// Styles replicated from the template.
    Template,
    /// Degraded export with bold header and autofit widths.
    Fallback,
}

impl fmt::Display for EnumExportPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template => write!(f, "template"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// Per-export report.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecXlsxExportReport {
    /// Output file written.
    pub path_file_out: PathBuf,
    /// Path taken.
    pub export_path: EnumExportPath,
    /// Number of data rows written.
    pub n_rows_data: usize,
    /// Number of columns written.
    pub n_cols: usize,
    /// Primary-path failure text when the fallback ran.
    pub primary_error: Option<String>,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecXlsxExportReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Input workbook could not be read as a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    /// Path of the input file.
    pub path: PathBuf,
    /// Failure description.
    pub reason: String,
}

impl LoadError {
    pub fn new(path: &Path, reason: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to read spreadsheet {}: {}",
            self.path.display(),
            self.reason
        )
    }
}

impl std::error::Error for LoadError {}

/// Both the template path and the fallback path failed to produce an output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportError {
    /// Output file that could not be written.
    pub path_file_out: PathBuf,
    /// Template path failure, if the template path ran.
    pub primary_error: Option<String>,
    /// Fallback path failure.
    pub fallback_error: String,
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to export {}: {}",
            self.path_file_out.display(),
            self.fallback_error
        )?;
        if let Some(msg) = &self.primary_error {
            write!(f, " (template export failed first: {msg})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ExportError {}

// #endregion
////////////////////////////////////////////////////////////////////////////////
