//! Spreadsheet loader: first worksheet of a workbook into a typed `DataFrame`.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use polars::prelude::{Column, DataFrame, NamedFrom, PlSmallStr, Series};
use unitsplit_table::EnumCellValue;

use crate::spec::LoadError;
use crate::util::{derive_cell_text, derive_unique_header_names};

/// Read the first worksheet of `path` into a table; row 1 is the header.
///
/// Accepts every format `calamine` detects by extension (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`,
/// `.ods`). Leading blank columns are kept so column positions match the sheet.
pub fn load_table(path: impl AsRef<Path>) -> Result<DataFrame, LoadError> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path).map_err(|err| LoadError::new(path, err.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::new(path, "Workbook has no worksheet."))?
        .map_err(|err| LoadError::new(path, err.to_string()))?;

    let n_col_offset = range.start().map_or(0, |(_, n_col)| n_col as usize);
    let l_rows: Vec<Vec<EnumCellValue>> = range
        .rows()
        .map(|row| {
            let mut l_cells = vec![EnumCellValue::None; n_col_offset];
            l_cells.extend(row.iter().map(derive_cell_value_from_data));
            l_cells
        })
        .collect();

    derive_dataframe_from_rows(&l_rows).map_err(|err| LoadError::new(path, err))
}

/// Build a typed table from a header row followed by body rows.
pub fn derive_dataframe_from_rows(l_rows: &[Vec<EnumCellValue>]) -> Result<DataFrame, String> {
    let Some((l_header, l_body)) = l_rows.split_first() else {
        return Ok(DataFrame::empty());
    };

    let n_width = l_rows.iter().map(Vec::len).max().unwrap_or(0);
    let l_names_raw: Vec<String> = (0..n_width)
        .map(|n_idx_col| {
            l_header
                .get(n_idx_col)
                .map(derive_cell_text)
                .unwrap_or_default()
        })
        .collect();
    let l_names = derive_unique_header_names(&l_names_raw);

    let l_body_kept: Vec<&Vec<EnumCellValue>> = l_body
        .iter()
        .filter(|row| !row.iter().all(EnumCellValue::is_missing))
        .collect();

    let mut l_cols = Vec::with_capacity(n_width);
    for (n_idx_col, c_name) in l_names.iter().enumerate() {
        let l_cells: Vec<EnumCellValue> = l_body_kept
            .iter()
            .map(|row| row.get(n_idx_col).cloned().unwrap_or(EnumCellValue::None))
            .collect();
        l_cols.push(Column::from(derive_typed_series(c_name, &l_cells)));
    }

    DataFrame::new(l_cols).map_err(|err| format!("Failed to build table: {err}"))
}

/// Normalize one `calamine` cell.
///
/// Empty strings and error cells are missing; date/time cells become
/// `YYYY-MM-DD HH:MM:SS` text.
pub fn derive_cell_value_from_data(data: &Data) -> EnumCellValue {
    match data {
        Data::Empty | Data::Error(_) => EnumCellValue::None,
        Data::String(val) if val.is_empty() => EnumCellValue::None,
        Data::String(val) => EnumCellValue::String(val.clone()),
        Data::Int(val) => EnumCellValue::Integer(*val),
        Data::Float(val) => EnumCellValue::Number(*val),
        Data::Bool(val) => EnumCellValue::Boolean(*val),
        Data::DateTime(val) => match val.as_datetime() {
            Some(dt) => EnumCellValue::String(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => EnumCellValue::Number(val.as_f64()),
        },
        Data::DateTimeIso(val) | Data::DurationIso(val) => EnumCellValue::String(val.clone()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EnumColumnKind {
    Integer,
    Decimal,
    Boolean,
    Text,
}

fn derive_column_kind(l_cells: &[EnumCellValue]) -> EnumColumnKind {
    let mut if_any = false;
    let mut if_all_integral = true;
    let mut if_all_numeric = true;
    let mut if_all_boolean = true;

    for cell in l_cells.iter().filter(|cell| !cell.is_missing()) {
        if_any = true;
        match cell {
            EnumCellValue::Integer(_) => if_all_boolean = false,
            EnumCellValue::Number(val) => {
                if_all_boolean = false;
                if !val.is_finite() || val.fract() != 0.0 || val.abs() >= 9.0e15 {
                    if_all_integral = false;
                }
            }
            EnumCellValue::Boolean(_) => {
                if_all_integral = false;
                if_all_numeric = false;
            }
            _ => {
                if_all_integral = false;
                if_all_numeric = false;
                if_all_boolean = false;
            }
        }
    }

    if !if_any {
        EnumColumnKind::Text
    } else if if_all_numeric && if_all_integral {
        EnumColumnKind::Integer
    } else if if_all_numeric {
        EnumColumnKind::Decimal
    } else if if_all_boolean {
        EnumColumnKind::Boolean
    } else {
        EnumColumnKind::Text
    }
}

fn derive_typed_series(c_name: &str, l_cells: &[EnumCellValue]) -> Series {
    let name = PlSmallStr::from(c_name);
    match derive_column_kind(l_cells) {
        EnumColumnKind::Integer => {
            let l_values: Vec<Option<i64>> = l_cells
                .iter()
                .map(|cell| match cell {
                    EnumCellValue::Integer(val) => Some(*val),
                    EnumCellValue::Number(val) if !val.is_nan() => Some(*val as i64),
                    _ => None,
                })
                .collect();
            Series::new(name, l_values)
        }
        EnumColumnKind::Decimal => {
            let l_values: Vec<Option<f64>> = l_cells
                .iter()
                .map(|cell| match cell {
                    EnumCellValue::Integer(val) => Some(*val as f64),
                    EnumCellValue::Number(val) if !val.is_nan() => Some(*val),
                    _ => None,
                })
                .collect();
            Series::new(name, l_values)
        }
        EnumColumnKind::Boolean => {
            let l_values: Vec<Option<bool>> = l_cells
                .iter()
                .map(|cell| match cell {
                    EnumCellValue::Boolean(val) => Some(*val),
                    _ => None,
                })
                .collect();
            Series::new(name, l_values)
        }
        EnumColumnKind::Text => {
            let l_values: Vec<Option<String>> = l_cells
                .iter()
                .map(|cell| match cell {
                    EnumCellValue::None => None,
                    EnumCellValue::Number(val) if val.is_nan() => None,
                    other => Some(derive_cell_text(other)),
                })
                .collect();
            Series::new(name, l_values)
        }
    }
}
