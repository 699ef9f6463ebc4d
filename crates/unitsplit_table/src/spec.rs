//! Table kernel models, options and errors.

use std::fmt;

use polars::prelude::DataFrame;

use crate::conf::{TUP_KEYWORDS_ORG_UNIT, TUP_KEYWORDS_SERIAL};

////////////////////////////////////////////////////////////////////////////////
// #region CellValues

/// Normalized scalar cell value.
///
/// Equality between cells is exact and type-sensitive, see [`EnumCellValue::is_same_value`].
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Missing/blank value.
    None,
    /// Text value.
    String(String),
    /// Integral numeric value.
    Integer(i64),
    /// Floating numeric value.
    Number(f64),
    /// Boolean value.
    Boolean(bool),
}

/// Hashable identity of a non-missing cell value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EnumCellKey {
    /// Text identity.
    String(String),
    /// Integer identity.
    Integer(i64),
    /// Float identity (bit pattern, `-0.0` folded into `0.0`).
    Number(u64),
    /// Boolean identity.
    Boolean(bool),
}

impl EnumCellValue {
    /// Whether the value is missing (`None` or a NaN float).
    pub fn is_missing(&self) -> bool {
        match self {
            Self::None => true,
            Self::Number(val) => val.is_nan(),
            _ => false,
        }
    }

    /// Exact, type-sensitive equality. Missing values never compare equal.
    pub fn is_same_value(&self, other: &EnumCellValue) -> bool {
        match (self.to_key(), other.to_key()) {
            (Some(key_left), Some(key_right)) => key_left == key_right,
            _ => false,
        }
    }

    /// Hashable identity, or `None` for missing values.
    pub fn to_key(&self) -> Option<EnumCellKey> {
        match self {
            Self::None => None,
            Self::String(val) => Some(EnumCellKey::String(val.clone())),
            Self::Integer(val) => Some(EnumCellKey::Integer(*val)),
            Self::Number(val) => {
                if val.is_nan() {
                    None
                } else if *val == 0.0 {
                    Some(EnumCellKey::Number(0f64.to_bits()))
                } else {
                    Some(EnumCellKey::Number(val.to_bits()))
                }
            }
            Self::Boolean(val) => Some(EnumCellKey::Boolean(*val)),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ColumnKeywords

/// Keyword strategy used to detect the organizational-unit and serial-number columns.
///
/// A column matches when its name contains any keyword as a substring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecColumnKeywords {
    /// Keywords for the organizational-unit column.
    pub keywords_org_unit: Vec<String>,
    /// Keywords for the serial-number column.
    pub keywords_serial: Vec<String>,
}

impl Default for SpecColumnKeywords {
    fn default() -> Self {
        Self {
            keywords_org_unit: TUP_KEYWORDS_ORG_UNIT.iter().map(ToString::to_string).collect(),
            keywords_serial: TUP_KEYWORDS_SERIAL.iter().map(ToString::to_string).collect(),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Results

/// Output of [`crate::dedup::deduplicate`].
#[derive(Debug, Clone)]
pub struct SpecDedupResult {
    /// Candidate rows whose identifier is absent from the reference table.
    pub df_kept: DataFrame,
    /// Number of candidate rows dropped as duplicates.
    pub n_removed: usize,
}

/// Output of [`crate::partition::partition`].
#[derive(Debug, Clone)]
pub struct SpecPartition {
    /// Rows equal to the selected value, in original order.
    pub df_matching: DataFrame,
    /// All other rows, in original order.
    pub df_non_matching: DataFrame,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// A required column is absent from a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingColumnError {
    /// Missing column name.
    pub column: String,
    /// Human-readable label of the table that lacks the column.
    pub table: String,
}

impl MissingColumnError {
    /// Build an error for `column` missing from `table`.
    pub fn new(column: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            table: table.into(),
        }
    }
}

impl fmt::Display for MissingColumnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Column {:?} not found in {}", self.column, self.table)
    }
}

impl std::error::Error for MissingColumnError {}

/// Table kernel failure.
#[derive(Debug)]
pub enum TableError {
    /// Required column is absent.
    MissingColumn(MissingColumnError),
    /// Underlying dataframe operation failed.
    Frame(String),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingColumn(err) => write!(f, "{err}"),
            Self::Frame(msg) => write!(f, "Table operation failed: {msg}"),
        }
    }
}

impl std::error::Error for TableError {}

impl From<MissingColumnError> for TableError {
    fn from(err: MissingColumnError) -> Self {
        Self::MissingColumn(err)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
