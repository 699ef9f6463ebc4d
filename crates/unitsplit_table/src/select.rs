//! Keyword-based detection of the organizational-unit and serial-number columns.

use polars::prelude::DataFrame;

use crate::spec::SpecColumnKeywords;
use crate::util::derive_column_names;

impl SpecColumnKeywords {
    /// First column containing an org-unit keyword, else the second column, else the first.
    ///
    /// Returns `None` only when there are no columns.
    pub fn find_org_unit_column(&self, columns: &[String]) -> Option<String> {
        if let Some(c_name) = _find_first_matching(columns, &self.keywords_org_unit) {
            return Some(c_name);
        }
        columns.get(1).or_else(|| columns.first()).cloned()
    }

    /// First column containing a serial keyword; `None` means "do not renumber".
    pub fn find_serial_column(&self, columns: &[String]) -> Option<String> {
        _find_first_matching(columns, &self.keywords_serial)
    }
}

fn _find_first_matching(columns: &[String], keywords: &[String]) -> Option<String> {
    columns
        .iter()
        .find(|c_name| keywords.iter().any(|kw| c_name.contains(kw.as_str())))
        .cloned()
}

/// Detect the organizational-unit column with the default keywords.
pub fn find_org_unit_column(df: &DataFrame) -> Option<String> {
    SpecColumnKeywords::default().find_org_unit_column(&derive_column_names(df))
}

/// Detect the serial-number column with the default keywords.
pub fn find_serial_column(df: &DataFrame) -> Option<String> {
    SpecColumnKeywords::default().find_serial_column(&derive_column_names(df))
}
