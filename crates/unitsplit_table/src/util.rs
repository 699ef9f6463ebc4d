//! Stateless helper utilities shared by the table kernels.

use polars::prelude::{AnyValue, BooleanChunked, DataFrame, NamedFrom, PlSmallStr};

use crate::spec::{EnumCellValue, MissingColumnError, TableError};

////////////////////////////////////////////////////////////////////////////////
// #region CellValueConversion

/// Convert one polars cell into a normalized [`EnumCellValue`].
pub fn derive_cell_value_from_any_value(value: AnyValue<'_>) -> EnumCellValue {
    match value {
        AnyValue::Null => EnumCellValue::None,
        AnyValue::String(val) => EnumCellValue::String(val.to_string()),
        AnyValue::StringOwned(val) => EnumCellValue::String(val.to_string()),
        AnyValue::Boolean(val) => EnumCellValue::Boolean(val),
        AnyValue::UInt32(val) => EnumCellValue::Integer(val as i64),
        AnyValue::UInt64(val) => match i64::try_from(val) {
            Ok(val) => EnumCellValue::Integer(val),
            Err(_) => EnumCellValue::Number(val as f64),
        },
        AnyValue::Int32(val) => EnumCellValue::Integer(val as i64),
        AnyValue::Int64(val) => EnumCellValue::Integer(val),
        AnyValue::Float32(val) => EnumCellValue::Number(val as f64),
        AnyValue::Float64(val) => EnumCellValue::Number(val),
        _ => EnumCellValue::String(value.to_string()),
    }
}

/// Render a cell the way it reads in a spreadsheet/file name.
///
/// Integral floats keep one decimal (`3.0`), booleans read `true`/`false` as in JSON,
/// missing values render empty.
pub fn derive_cell_display_text(value: &EnumCellValue) -> String {
    match value {
        EnumCellValue::None => String::new(),
        EnumCellValue::String(val) => val.clone(),
        EnumCellValue::Integer(val) => val.to_string(),
        EnumCellValue::Number(val) => {
            if val.is_finite() && val.fract() == 0.0 {
                format!("{val:.1}")
            } else {
                val.to_string()
            }
        }
        EnumCellValue::Boolean(val) => val.to_string(),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region DataFrameLikeUtils

/// Return column names in order.
pub fn derive_column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names_str()
        .into_iter()
        .map(ToString::to_string)
        .collect()
}

/// Fail with [`MissingColumnError`] when `column` is absent from `df`.
pub fn require_column(
    df: &DataFrame,
    column: &str,
    table_label: &str,
) -> Result<(), MissingColumnError> {
    if df.get_column_names_str().contains(&column) {
        Ok(())
    } else {
        Err(MissingColumnError::new(column, table_label))
    }
}

/// Materialize all cells of `column` in row order.
pub fn derive_column_cells(
    df: &DataFrame,
    column: &str,
    table_label: &str,
) -> Result<Vec<EnumCellValue>, TableError> {
    require_column(df, column, table_label)?;
    let col = df
        .column(column)
        .map_err(|err| TableError::Frame(err.to_string()))?;

    let mut l_cells = Vec::with_capacity(df.height());
    for n_idx_row in 0..df.height() {
        let value = col
            .get(n_idx_row)
            .map_err(|err| TableError::Frame(format!("Failed to access cell value: {err}")))?;
        l_cells.push(derive_cell_value_from_any_value(value));
    }
    Ok(l_cells)
}

/// Keep rows whose mask entry is `true`, preserving order.
pub fn filter_rows_by_mask(df: &DataFrame, mask: &[bool]) -> Result<DataFrame, TableError> {
    if mask.len() != df.height() {
        return Err(TableError::Frame(format!(
            "Mask length {} does not match table height {}.",
            mask.len(),
            df.height()
        )));
    }
    let ca_mask = BooleanChunked::new(PlSmallStr::from_static("mask"), mask);
    df.filter(&ca_mask)
        .map_err(|err| TableError::Frame(err.to_string()))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
