//! `unitsplit_table` v1:
//! In-memory table kernel for splitting record tables by organizational unit.
//!
//! Module layout:
//! - `conf`      : column names and keyword presets
//! - `spec`      : cell values, options, results and errors
//! - `util`      : pure helper functions over `DataFrame`
//! - `select`    : keyword-based column detection
//! - `dedup`     : accession-identifier set difference
//! - `partition` : stable split on column equality, value statistics
//! - `renumber`  : serial-number column rewrite
pub mod conf;
pub mod dedup;
pub mod partition;
pub mod renumber;
pub mod select;
pub mod spec;
pub mod util;

pub use conf::{C_COLNAME_ACCESSION, TUP_KEYWORDS_ORG_UNIT, TUP_KEYWORDS_SERIAL};
pub use dedup::deduplicate;
pub use partition::{count_values, derive_distinct_values, partition};
pub use renumber::{renumber, renumber_with};
pub use select::{find_org_unit_column, find_serial_column};
pub use spec::{
    EnumCellKey, EnumCellValue, MissingColumnError, SpecColumnKeywords, SpecDedupResult,
    SpecPartition, TableError,
};
pub use util::{derive_cell_display_text, require_column};
