//! XLSX constants and default preset factories.

use crate::spec::SpecCellFormat;

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];

/// Sheet name used by the fallback writer.
pub const C_SHEET_NAME_DEFAULT: &str = "Sheet1";
/// Extension appended to generated workbooks.
pub const C_EXT_XLSX: &str = ".xlsx";
/// MIME type of generated workbooks.
pub const C_MIME_XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
/// Upload extensions accepted as spreadsheet input.
pub const TUP_EXT_UPLOAD_ACCEPTED: [&str; 2] = [".xlsx", ".xls"];

/// Padding added to autofit widths in the fallback writer.
pub const N_WIDTH_CELL_PADDING: usize = 2;
/// Upper bound of autofit widths (Excel column width limit).
pub const N_WIDTH_CELL_MAX: usize = 255;

/// Number format string meaning "no explicit format".
pub const C_NUM_FORMAT_GENERAL: &str = "General";

/// Build the header format used by the fallback writer.
pub fn derive_fallback_header_format() -> SpecCellFormat {
    SpecCellFormat {
        bold: Some(true),
        ..Default::default()
    }
}

/// Build the data-row format used by the fallback writer.
pub fn derive_fallback_data_format() -> SpecCellFormat {
    SpecCellFormat {
        bold: Some(false),
        ..Default::default()
    }
}
