//! Column name constants and keyword presets.

/// Accession identifier column used for deduplication.
pub const C_COLNAME_ACCESSION: &str = "WOS Accession Number";

/// Substrings identifying the organizational-unit column.
pub const TUP_KEYWORDS_ORG_UNIT: [&str; 3] = ["院系", "学院", "Address"];

/// Substrings identifying the serial-number column.
pub const TUP_KEYWORDS_SERIAL: [&str; 5] = ["Number", "序号", "编号", "No.", "NO"];
