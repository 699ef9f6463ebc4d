//! XLSX writer kernel: template-styled export with a plain fallback.

use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, FormatUnderline, Workbook, Worksheet};
use unitsplit_table::EnumCellValue;
use unitsplit_table::util::{derive_column_cells, derive_column_names};

use crate::conf::{
    C_SHEET_NAME_DEFAULT, derive_fallback_data_format, derive_fallback_header_format,
};
use crate::spec::{
    EnumExportPath, ExportError, SpecCellFormat, SpecTemplateStyle, SpecXlsxExportReport,
};
use crate::template::read_template_style;
use crate::util::{
    cast_col_num, cast_row_num, convert_stored_width_to_char_width, derive_autofit_width,
    derive_cell_text, derive_xlsx_error_text, derive_text_width, sanitize_sheet_name,
    validate_excel_limits,
};

////////////////////////////////////////////////////////////////////////////////
// #region Export

/// Export `df` to `output_path`, replicating the look of the template at `template_path`.
///
/// Any failure on the template path is logged and recovered by a plain export (bold header,
/// autofit widths). [`ExportError`] is returned only when the plain export fails as well.
pub fn export_with_template(
    template_path: &Path,
    df: &DataFrame,
    output_path: &Path,
) -> Result<SpecXlsxExportReport, ExportError> {
    let err_primary = match _export_template(template_path, df, output_path) {
        Ok(report) => return Ok(report),
        Err(msg) => msg,
    };

    tracing::warn!(
        template = %template_path.display(),
        output = %output_path.display(),
        error = %err_primary,
        "template export failed, writing plain workbook"
    );

    let mut report = export_plain(df, output_path).map_err(|err| ExportError {
        path_file_out: output_path.to_path_buf(),
        primary_error: Some(err_primary.clone()),
        fallback_error: err.fallback_error,
    })?;
    report.warn(format!("Template styles not applied: {err_primary}"));
    report.primary_error = Some(err_primary);
    Ok(report)
}

/// Export `df` without a template: bold header of column names, non-bold data, autofit widths.
pub fn export_plain(df: &DataFrame, output_path: &Path) -> Result<SpecXlsxExportReport, ExportError> {
    let mut writer = XlsxWriter::new(
        output_path.to_path_buf(),
        derive_fallback_header_format(),
        derive_fallback_data_format(),
    );
    let n_cols = writer
        .write_sheet_plain(df)
        .and_then(|n_cols| writer.close().map(|_| n_cols))
        .map_err(|err| ExportError {
            path_file_out: output_path.to_path_buf(),
            primary_error: None,
            fallback_error: err,
        })?;

    Ok(SpecXlsxExportReport {
        path_file_out: output_path.to_path_buf(),
        export_path: EnumExportPath::Fallback,
        n_rows_data: df.height(),
        n_cols,
        primary_error: None,
        warnings: writer.warnings(),
    })
}

fn _export_template(
    template_path: &Path,
    df: &DataFrame,
    output_path: &Path,
) -> Result<SpecXlsxExportReport, String> {
    let style = read_template_style(template_path)?;

    let mut writer = XlsxWriter::new(
        output_path.to_path_buf(),
        derive_fallback_header_format(),
        derive_fallback_data_format(),
    );
    let n_cols = writer.write_sheet_with_template(df, &style)?;
    writer.close()?;

    tracing::debug!(
        output = %writer.file_out(),
        n_rows = df.height(),
        n_cols,
        "template export written"
    );

    Ok(SpecXlsxExportReport {
        path_file_out: output_path.to_path_buf(),
        export_path: EnumExportPath::Template,
        n_rows_data: df.height(),
        n_cols,
        primary_error: None,
        warnings: writer.warnings(),
    })
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Writer

/// Stateful single-sheet workbook writer.
pub struct XlsxWriter {
    path_file_out: PathBuf,
    workbook: Workbook,
    fmt_header: SpecCellFormat,
    fmt_data: SpecCellFormat,
    l_warnings: Vec<String>,
    if_closed: bool,
}

impl XlsxWriter {
    /// Create writer bound to output path and the plain-sheet format presets.
    ///
    /// The workbook is buffered in memory until [`Self::close`] is called.
    pub fn new(path_file_out: PathBuf, fmt_header: SpecCellFormat, fmt_data: SpecCellFormat) -> Self {
        Self {
            path_file_out,
            workbook: Workbook::new(),
            fmt_header,
            fmt_data,
            l_warnings: Vec::new(),
            if_closed: false,
        }
    }

    /// Return output file path as string.
    pub fn file_out(&self) -> String {
        self.path_file_out.to_string_lossy().to_string()
    }

    /// Return non-fatal warnings collected so far.
    pub fn warnings(&self) -> Vec<String> {
        self.l_warnings.clone()
    }

    /// Flush workbook to disk. Idempotent.
    pub fn close(&mut self) -> Result<(), String> {
        if self.if_closed {
            return Ok(());
        }
        self.workbook
            .save(&self.path_file_out)
            .map_err(derive_xlsx_error_text)?;
        self.if_closed = true;
        Ok(())
    }

    /// Write `df` under the template's header row, styling data cells per template column.
    ///
    /// Returns the number of table columns written.
    pub fn write_sheet_with_template(
        &mut self,
        df: &DataFrame,
        style: &SpecTemplateStyle,
    ) -> Result<usize, String> {
        if self.if_closed {
            return Err("Cannot write after close().".to_string());
        }
        let n_cols_template = style.n_cols();
        validate_excel_limits(df.height(), usize::max(n_cols_template, 1))?;

        let n_cols_data = usize::min(n_cols_template, df.width());
        if df.width() > n_cols_template {
            self.l_warnings.push(format!(
                "Dropped {} table column(s) beyond the template width of {n_cols_template}.",
                df.width() - n_cols_template
            ));
        }

        let l_colnames = derive_column_names(df);
        let mut l_cols_cells = Vec::with_capacity(n_cols_data);
        for c_name in &l_colnames[..n_cols_data] {
            l_cols_cells.push(derive_column_cells(df, c_name, "table").map_err(|err| err.to_string())?);
        }

        let worksheet = self.workbook.add_worksheet();
        worksheet
            .set_name(sanitize_sheet_name(&style.sheet_name, "_"))
            .map_err(derive_xlsx_error_text)?;

        for (n_idx_col, cell) in style.l_cells_header.iter().enumerate() {
            let value = if cell.text.is_empty() {
                EnumCellValue::None
            } else {
                EnumCellValue::String(cell.text.clone())
            };
            write_cell_with_format(
                worksheet,
                0,
                n_idx_col,
                &value,
                &derive_rust_xlsx_format(&cell.fmt),
            )?;
        }

        let l_fmt_data_by_col: Vec<Format> = style.l_fmts_data[..n_cols_data]
            .iter()
            .map(derive_rust_xlsx_format)
            .collect();
        for (n_idx_col, l_cells) in l_cols_cells.iter().enumerate() {
            for (n_idx_row, value) in l_cells.iter().enumerate() {
                write_cell_with_format(
                    worksheet,
                    n_idx_row + 1,
                    n_idx_col,
                    value,
                    &l_fmt_data_by_col[n_idx_col],
                )?;
            }
        }

        for (n_idx_col, width) in style.l_widths_by_col.iter().enumerate() {
            if let Some(width) = width {
                worksheet
                    .set_column_width(
                        cast_col_num(n_idx_col)?,
                        convert_stored_width_to_char_width(*width),
                    )
                    .map_err(derive_xlsx_error_text)?;
            }
        }

        // Heights only for rows that exist in the output: header plus data rows.
        for (n_idx_row, height) in style
            .dict_heights_by_row
            .range(..=cast_row_num(df.height())?)
        {
            worksheet
                .set_row_height(*n_idx_row, *height)
                .map_err(derive_xlsx_error_text)?;
        }

        Ok(n_cols_data)
    }

    /// Write `df` with column names as a bold header and autofit column widths.
    ///
    /// Returns the number of table columns written.
    pub fn write_sheet_plain(&mut self, df: &DataFrame) -> Result<usize, String> {
        if self.if_closed {
            return Err("Cannot write after close().".to_string());
        }
        validate_excel_limits(df.height(), df.width())?;

        let l_colnames = derive_column_names(df);
        let fmt_header = derive_rust_xlsx_format(&self.fmt_header);
        let fmt_data = derive_rust_xlsx_format(&self.fmt_data);

        let worksheet = self.workbook.add_worksheet();
        worksheet
            .set_name(C_SHEET_NAME_DEFAULT)
            .map_err(derive_xlsx_error_text)?;

        for (n_idx_col, c_name) in l_colnames.iter().enumerate() {
            write_cell_with_format(
                worksheet,
                0,
                n_idx_col,
                &EnumCellValue::String(c_name.clone()),
                &fmt_header,
            )?;

            let l_cells = derive_column_cells(df, c_name, "table").map_err(|err| err.to_string())?;
            let mut n_width_recorded = derive_text_width(c_name);
            for (n_idx_row, value) in l_cells.iter().enumerate() {
                n_width_recorded = usize::max(
                    n_width_recorded,
                    derive_text_width(&derive_cell_text(value)),
                );
                write_cell_with_format(worksheet, n_idx_row + 1, n_idx_col, value, &fmt_data)?;
            }

            worksheet
                .set_column_width(
                    cast_col_num(n_idx_col)?,
                    derive_autofit_width(n_width_recorded) as f64,
                )
                .map_err(derive_xlsx_error_text)?;
        }

        Ok(l_colnames.len())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellWriting

fn write_cell_with_format(
    worksheet: &mut Worksheet,
    row_idx: usize,
    col_idx: usize,
    value: &EnumCellValue,
    format: &Format,
) -> Result<(), String> {
    let n_row = cast_row_num(row_idx)?;
    let n_col = cast_col_num(col_idx)?;
    match value {
        EnumCellValue::None => {
            worksheet
                .write_blank(n_row, n_col, format)
                .map_err(derive_xlsx_error_text)?;
        }
        EnumCellValue::Number(val) if !val.is_finite() => {
            worksheet
                .write_blank(n_row, n_col, format)
                .map_err(derive_xlsx_error_text)?;
        }
        EnumCellValue::String(val) => {
            worksheet
                .write_string_with_format(n_row, n_col, val, format)
                .map_err(derive_xlsx_error_text)?;
        }
        EnumCellValue::Integer(val) => {
            worksheet
                .write_number_with_format(n_row, n_col, *val as f64, format)
                .map_err(derive_xlsx_error_text)?;
        }
        EnumCellValue::Number(val) => {
            worksheet
                .write_number_with_format(n_row, n_col, *val, format)
                .map_err(derive_xlsx_error_text)?;
        }
        EnumCellValue::Boolean(val) => {
            worksheet
                .write_boolean_with_format(n_row, n_col, *val, format)
                .map_err(derive_xlsx_error_text)?;
        }
    }
    Ok(())
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.clone());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }
    if spec.italic.unwrap_or(false) {
        format = format.set_italic();
    }
    if let Some(val) = spec.underline
        && let Some(underline) = derive_format_underline(val)
    {
        format = format.set_underline(underline);
    }

    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.valign
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }

    if let Some(val) = &spec.num_format {
        format = format.set_num_format(val.clone());
    }
    if let Some(val) = &spec.bg_color {
        format = format.set_background_color(val.as_str());
    }
    if let Some(val) = &spec.font_color {
        format = format.set_font_color(val.as_str());
    }

    if let Some(val) = spec.border {
        format = format.set_border(derive_format_border(val));
    }
    if let Some(val) = spec.top {
        format = format.set_border_top(derive_format_border(val));
    }
    if let Some(val) = spec.bottom {
        format = format.set_border_bottom(derive_format_border(val));
    }
    if let Some(val) = spec.left {
        format = format.set_border_left(derive_format_border(val));
    }
    if let Some(val) = spec.right {
        format = format.set_border_right(derive_format_border(val));
    }

    if spec.text_wrap.unwrap_or(false) {
        format = format.set_text_wrap();
    }

    format
}

fn derive_format_border(border: i64) -> FormatBorder {
    match border {
        0 => FormatBorder::None,
        1 => FormatBorder::Thin,
        2 => FormatBorder::Medium,
        3 => FormatBorder::Dashed,
        4 => FormatBorder::Dotted,
        5 => FormatBorder::Thick,
        6 => FormatBorder::Double,
        7 => FormatBorder::Hair,
        8 => FormatBorder::MediumDashed,
        9 => FormatBorder::DashDot,
        10 => FormatBorder::MediumDashDot,
        11 => FormatBorder::DashDotDot,
        12 => FormatBorder::MediumDashDotDot,
        13 => FormatBorder::SlantDashDot,
        _ => FormatBorder::None,
    }
}

fn derive_format_underline(underline: i64) -> Option<FormatUnderline> {
    match underline {
        1 => Some(FormatUnderline::Single),
        2 => Some(FormatUnderline::Double),
        33 => Some(FormatUnderline::SingleAccounting),
        34 => Some(FormatUnderline::DoubleAccounting),
        _ => None,
    }
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    let value = align.trim().to_ascii_lowercase();
    match value.as_str() {
        "general" => Some(FormatAlign::General),
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "fill" => Some(FormatAlign::Fill),
        "justify" => Some(FormatAlign::Justify),
        "center_across" => Some(FormatAlign::CenterAcross),
        "distributed" => Some(FormatAlign::Distributed),
        "top" => Some(FormatAlign::Top),
        "bottom" => Some(FormatAlign::Bottom),
        "vcenter" | "vertical_center" => Some(FormatAlign::VerticalCenter),
        "vjustify" | "vertical_justify" => Some(FormatAlign::VerticalJustify),
        "vdistributed" | "vertical_distributed" => Some(FormatAlign::VerticalDistributed),
        _ => None,
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
