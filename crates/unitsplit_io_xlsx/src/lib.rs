//! `unitsplit_io_xlsx` v1:
//! Spreadsheet IO kernel for record tables.
//!
//! Module layout:
//! - `conf`     : Excel limits, file constants and fallback presets
//! - `spec`     : format/template models, export reports and errors
//! - `util`     : pure helper functions
//! - `reader`   : first-sheet loader into a typed `DataFrame`
//! - `template` : template styles into an in-memory styled-document model
//! - `writer`   : template-styled writer with plain fallback
pub mod conf;
pub mod reader;
pub mod spec;
pub mod template;
pub mod util;
pub mod writer;

pub use conf::{
    C_EXT_XLSX, C_MIME_XLSX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, TUP_EXT_UPLOAD_ACCEPTED,
};
pub use reader::load_table;
pub use spec::{
    EnumExportPath, ExportError, LoadError, SpecCellFormat, SpecTemplateCell, SpecTemplateStyle,
    SpecXlsxExportReport,
};
pub use template::read_template_style;
pub use writer::{XlsxWriter, export_plain, export_with_template};
