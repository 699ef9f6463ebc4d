//! JSON conversion and file-name helpers.

use serde_json::{Number, Value};
use unitsplit_table::EnumCellValue;

use crate::conf::{N_LEN_FILE_STEM_MAX, TUP_FILENAME_UNSAFE};

////////////////////////////////////////////////////////////////////////////////
// #region JsonCellConversion

/// Render a cell as JSON, keeping its type (`3` vs `3.0` vs `"3"`).
pub fn derive_json_from_cell(value: &EnumCellValue) -> Value {
    match value {
        EnumCellValue::None => Value::Null,
        EnumCellValue::String(val) => Value::String(val.clone()),
        EnumCellValue::Integer(val) => Value::Number(Number::from(*val)),
        EnumCellValue::Number(val) => Number::from_f64(*val).map_or(Value::Null, Value::Number),
        EnumCellValue::Boolean(val) => Value::Bool(*val),
    }
}

/// Read a JSON scalar back into a cell; arrays and objects have no cell form.
pub fn derive_cell_from_json(value: &Value) -> Option<EnumCellValue> {
    match value {
        Value::Null => Some(EnumCellValue::None),
        Value::String(val) => Some(EnumCellValue::String(val.clone())),
        Value::Bool(val) => Some(EnumCellValue::Boolean(*val)),
        Value::Number(val) => {
            if let Some(n) = val.as_i64() {
                Some(EnumCellValue::Integer(n))
            } else {
                val.as_f64().map(EnumCellValue::Number)
            }
        }
        Value::Array(_) | Value::Object(_) => None,
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FileNames

/// Replace path-hostile characters with `_` and cap the stem length.
pub fn sanitize_filename(name: &str) -> String {
    let c_safe: String = name
        .chars()
        .map(|chr| {
            if TUP_FILENAME_UNSAFE.contains(&chr) {
                '_'
            } else {
                chr
            }
        })
        .take(N_LEN_FILE_STEM_MAX)
        .collect();
    if c_safe.is_empty() {
        "_".to_string()
    } else {
        c_safe
    }
}

/// `Content-Disposition` value for an attachment, with an RFC 5987 UTF-8 name.
pub fn derive_attachment_disposition(filename: &str) -> String {
    let c_ascii: String = filename
        .chars()
        .map(|chr| {
            if (chr.is_ascii_graphic() && chr != '"' && chr != '\\') || chr == ' ' {
                chr
            } else {
                '_'
            }
        })
        .collect();

    let mut c_encoded = String::with_capacity(filename.len() * 3);
    for byte in filename.bytes() {
        if byte.is_ascii_alphanumeric() || b"-._~".contains(&byte) {
            c_encoded.push(byte as char);
        } else {
            c_encoded.push_str(&format!("%{byte:02X}"));
        }
    }

    format!("attachment; filename=\"{c_ascii}\"; filename*=UTF-8''{c_encoded}")
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
