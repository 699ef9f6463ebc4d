//! Stateless helper utilities used by the XLSX loader and writer kernels.

use std::collections::BTreeSet;

use rust_xlsxwriter::XlsxError;
use unitsplit_table::EnumCellValue;

use crate::conf::{
    N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, N_WIDTH_CELL_MAX,
    N_WIDTH_CELL_PADDING, TUP_EXCEL_ILLEGAL,
};

////////////////////////////////////////////////////////////////////////////////
// #region HeaderNormalization

/// Make raw header texts non-empty and unique.
///
/// Empty names become `Unnamed: <idx>`; repeated names get `.1`, `.2`, ... suffixes.
pub fn derive_unique_header_names(l_names_raw: &[String]) -> Vec<String> {
    let mut set_names_seen: BTreeSet<String> = BTreeSet::new();
    let mut l_names = Vec::with_capacity(l_names_raw.len());

    for (n_idx_col, c_name_raw) in l_names_raw.iter().enumerate() {
        let c_name_base = if c_name_raw.trim().is_empty() {
            format!("Unnamed: {n_idx_col}")
        } else {
            c_name_raw.clone()
        };

        let mut c_name = c_name_base.clone();
        let mut n_dup = 0usize;
        while set_names_seen.contains(&c_name) {
            n_dup += 1;
            c_name = format!("{c_name_base}.{n_dup}");
        }
        set_names_seen.insert(c_name.clone());
        l_names.push(c_name);
    }
    l_names
}

/// Render a cell value as plain text, as used for column names and width estimates.
///
/// Integral numbers drop the fractional part (`2024`, not `2024.0`).
pub fn derive_cell_text(value: &EnumCellValue) -> String {
    match value {
        EnumCellValue::None => String::new(),
        EnumCellValue::String(val) => val.clone(),
        EnumCellValue::Integer(val) => val.to_string(),
        EnumCellValue::Number(val) => derive_number_text(*val),
        EnumCellValue::Boolean(val) => if *val { "True" } else { "False" }.to_string(),
    }
}

/// Render a number as text; integral finite values have no fractional part.
pub fn derive_number_text(val: f64) -> String {
    if val.is_finite() && val.fract() == 0.0 && val.abs() < 1e15 {
        format!("{}", val as i64)
    } else {
        val.to_string()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().to_string();
    if c_name.is_empty() {
        c_name = "Sheet".to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

/// Fail when a table with one header row does not fit one worksheet.
pub fn validate_excel_limits(n_height_data: usize, n_width: usize) -> Result<(), String> {
    if n_height_data + 1 > N_NROWS_EXCEL_MAX {
        return Err(format!(
            "Table has {n_height_data} rows; Excel allows {} data rows per sheet.",
            N_NROWS_EXCEL_MAX - 1
        ));
    }
    if n_width > N_NCOLS_EXCEL_MAX {
        return Err(format!(
            "Table has {n_width} columns; Excel allows {N_NCOLS_EXCEL_MAX}."
        ));
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WidthUtils

/// Width of a text in characters; every character counts as one.
pub fn derive_text_width(s: &str) -> usize {
    s.chars().count()
}

/// Autofit width from the widest recorded value: `max + padding`, capped at Excel's limit.
pub fn derive_autofit_width(n_width_recorded: usize) -> usize {
    usize::min(
        N_WIDTH_CELL_MAX,
        usize::max(1, n_width_recorded + N_WIDTH_CELL_PADDING),
    )
}

/// Convert a width stored in a workbook into the character width `set_column_width` expects.
///
/// Stored widths include cell padding (e.g. `20` characters is stored as `20.7109375`); the
/// conversion goes through pixels at the default 7px character width.
pub fn convert_stored_width_to_char_width(width_stored: f64) -> f64 {
    let n_pixels = (width_stored * 7.0).round();
    if n_pixels <= 12.0 {
        n_pixels / 12.0
    } else {
        (n_pixels - 5.0) / 7.0
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StyleCodeConversion

/// Convert an `AARRGGBB`/`RRGGBB` color into `#RRGGBB`; `None` for theme/indexed colors.
pub fn derive_hex_color(argb: &str) -> Option<String> {
    let c_hex = argb.trim();
    if !c_hex.is_ascii() {
        return None;
    }
    let c_rgb = match c_hex.len() {
        8 => &c_hex[2..],
        6 => c_hex,
        _ => return None,
    };
    if !c_rgb.chars().all(|chr| chr.is_ascii_hexdigit()) {
        return None;
    }
    Some(format!("#{}", c_rgb.to_ascii_uppercase()))
}

/// Map an OOXML border style name onto the numeric border code.
pub fn derive_border_code(style: &str) -> i64 {
    match style {
        "thin" => 1,
        "medium" => 2,
        "dashed" => 3,
        "dotted" => 4,
        "thick" => 5,
        "double" => 6,
        "hair" => 7,
        "mediumDashed" => 8,
        "dashDot" => 9,
        "mediumDashDot" => 10,
        "dashDotDot" => 11,
        "mediumDashDotDot" => 12,
        "slantDashDot" => 13,
        _ => 0,
    }
}

/// Map an OOXML underline name onto the numeric underline code.
pub fn derive_underline_code(style: &str) -> i64 {
    match style {
        "single" => 1,
        "double" => 2,
        "singleAccounting" => 33,
        "doubleAccounting" => 34,
        _ => 0,
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WriterCasts

pub fn cast_row_num(value: usize) -> Result<u32, String> {
    u32::try_from(value).map_err(|_| format!("row index overflow: {value}"))
}

pub fn cast_col_num(value: usize) -> Result<u16, String> {
    u16::try_from(value).map_err(|_| format!("column index overflow: {value}"))
}

pub fn derive_xlsx_error_text(err: XlsxError) -> String {
    format!("xlsx write error: {err}")
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
