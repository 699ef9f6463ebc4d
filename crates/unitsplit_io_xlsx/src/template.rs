//! Template reader: first worksheet of an `.xlsx` template into a [`SpecTemplateStyle`].

use std::collections::BTreeMap;
use std::path::Path;

use umya_spreadsheet::{
    HorizontalAlignmentValues, PatternValues, Style, VerticalAlignmentValues, Worksheet,
};

use crate::conf::C_NUM_FORMAT_GENERAL;
use crate::spec::{SpecCellFormat, SpecTemplateCell, SpecTemplateStyle};
use crate::util::{derive_border_code, derive_hex_color, derive_underline_code};

/// Read header cells, the data style row and sheet geometry from `path`.
///
/// Only `.xlsx`/`.xlsm` templates carry readable styles; anything else is an error the caller
/// is expected to recover from.
pub fn read_template_style(path: &Path) -> Result<SpecTemplateStyle, String> {
    let book = umya_spreadsheet::reader::xlsx::read(path)
        .map_err(|err| format!("Failed to read template workbook: {err}"))?;
    let ws = book
        .get_sheet_collection()
        .first()
        .ok_or_else(|| "Template workbook has no worksheet.".to_string())?;

    derive_template_style(ws)
}

/// Build the styled-document model of one worksheet.
pub fn derive_template_style(ws: &Worksheet) -> Result<SpecTemplateStyle, String> {
    let n_cols = ws.get_highest_column();
    let n_rows = ws.get_highest_row();
    if n_cols == 0 || n_rows == 0 {
        return Err("Template worksheet has no header row.".to_string());
    }

    // Row 2 styles the data rows; a header-only template reuses row 1.
    let n_row_data_style = if n_rows >= 2 { 2 } else { 1 };

    let mut l_cells_header = Vec::with_capacity(n_cols as usize);
    let mut l_fmts_data = Vec::with_capacity(n_cols as usize);
    let mut l_widths_by_col = Vec::with_capacity(n_cols as usize);
    for n_col in 1..=n_cols {
        let fmt_header = ws
            .get_cell((n_col, 1))
            .map(|cell| derive_format_from_style(cell.get_style()))
            .unwrap_or_default();
        l_cells_header.push(SpecTemplateCell {
            text: ws.get_value((n_col, 1)),
            fmt: fmt_header.clone(),
        });

        let fmt_data = ws
            .get_cell((n_col, n_row_data_style))
            .map(|cell| derive_format_from_style(cell.get_style()))
            .unwrap_or(fmt_header);
        l_fmts_data.push(fmt_data.with_(SpecCellFormat {
            bold: Some(false),
            ..Default::default()
        }));

        l_widths_by_col.push(
            ws.get_column_dimension_by_number(&n_col)
                .map(|col| *col.get_width())
                .filter(|width| *width > 0.0),
        );
    }

    let mut dict_heights_by_row = BTreeMap::new();
    for n_row in 1..=n_rows {
        if let Some(row) = ws.get_row_dimension(&n_row)
            && *row.get_height() > 0.0
        {
            dict_heights_by_row.insert(n_row - 1, *row.get_height());
        }
    }

    Ok(SpecTemplateStyle {
        sheet_name: ws.get_name().to_string(),
        l_cells_header,
        l_fmts_data,
        l_widths_by_col,
        dict_heights_by_row,
        n_rows: n_rows as usize,
    })
}

/// Flatten a cell style into a [`SpecCellFormat`].
pub fn derive_format_from_style(style: &Style) -> SpecCellFormat {
    let mut fmt = SpecCellFormat::default();

    if let Some(font) = style.get_font() {
        let c_font_name = font.get_name().to_string();
        if !c_font_name.is_empty() {
            fmt.font_name = Some(c_font_name);
        }
        if *font.get_size() > 0.0 {
            fmt.font_size = Some(*font.get_size());
        }
        fmt.bold = Some(*font.get_bold());
        fmt.italic = Some(*font.get_italic());
        fmt.underline = Some(derive_underline_code(&font.get_underline()));
        fmt.font_color = derive_hex_color(&font.get_color().get_argb());
    }

    if let Some(fill) = style.get_fill()
        && let Some(pattern_fill) = fill.get_pattern_fill()
        && !matches!(pattern_fill.get_pattern_type(), PatternValues::None)
        && let Some(color) = pattern_fill.get_foreground_color()
    {
        fmt.bg_color = derive_hex_color(&color.get_argb());
    }

    if let Some(borders) = style.get_borders() {
        fmt.top = Some(derive_border_code(&borders.get_top().get_border_style()));
        fmt.bottom = Some(derive_border_code(&borders.get_bottom().get_border_style()));
        fmt.left = Some(derive_border_code(&borders.get_left().get_border_style()));
        fmt.right = Some(derive_border_code(&borders.get_right().get_border_style()));
    }

    if let Some(alignment) = style.get_alignment() {
        fmt.align = derive_align_name(alignment.get_horizontal()).map(ToString::to_string);
        fmt.valign = derive_valign_name(alignment.get_vertical()).map(ToString::to_string);
        fmt.text_wrap = Some(*alignment.get_wrap_text());
    }

    if let Some(number_format) = style.get_number_format() {
        let c_code = number_format.get_format_code().to_string();
        if !c_code.is_empty() && c_code != C_NUM_FORMAT_GENERAL {
            fmt.num_format = Some(c_code);
        }
    }

    fmt
}

fn derive_align_name(value: &HorizontalAlignmentValues) -> Option<&'static str> {
    match value {
        HorizontalAlignmentValues::Left => Some("left"),
        HorizontalAlignmentValues::Center => Some("center"),
        HorizontalAlignmentValues::Right => Some("right"),
        HorizontalAlignmentValues::Fill => Some("fill"),
        HorizontalAlignmentValues::Justify => Some("justify"),
        HorizontalAlignmentValues::CenterContinuous => Some("center_across"),
        HorizontalAlignmentValues::Distributed => Some("distributed"),
        _ => None,
    }
}

fn derive_valign_name(value: &VerticalAlignmentValues) -> Option<&'static str> {
    match value {
        VerticalAlignmentValues::Top => Some("top"),
        VerticalAlignmentValues::Center => Some("vcenter"),
        VerticalAlignmentValues::Justify => Some("vjustify"),
        VerticalAlignmentValues::Distributed => Some("vdistributed"),
        _ => None,
    }
}
