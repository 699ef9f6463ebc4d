//! Serial-number column rewrite.

use polars::prelude::{DataFrame, NamedFrom, PlSmallStr, Series};

use crate::spec::{SpecColumnKeywords, TableError};
use crate::util::derive_column_names;

/// Rewrite the detected serial column to `1..=N` using the default keywords.
pub fn renumber(df: DataFrame) -> Result<DataFrame, TableError> {
    renumber_with(df, &SpecColumnKeywords::default())
}

/// Rewrite the serial column detected by `keywords` to `1..=N` in current row order.
///
/// A table without a serial column is returned unchanged.
pub fn renumber_with(
    mut df: DataFrame,
    keywords: &SpecColumnKeywords,
) -> Result<DataFrame, TableError> {
    let Some(c_col_serial) = keywords.find_serial_column(&derive_column_names(&df)) else {
        return Ok(df);
    };

    let n_height = df.height() as i64;
    let l_serial: Vec<i64> = (1..=n_height).collect();
    df.with_column(Series::new(PlSmallStr::from(c_col_serial.as_str()), l_serial))
        .map_err(|err| TableError::Frame(err.to_string()))?;
    Ok(df)
}

#[cfg(test)]
mod tests {
    use polars::prelude::{Column, DataFrame, NamedFrom, PlSmallStr, Series};

    use super::*;
    use crate::spec::EnumCellValue;
    use crate::util::derive_column_cells;

    fn build_df(serial_name: &str) -> DataFrame {
        DataFrame::new(vec![
            Column::from(Series::new(PlSmallStr::from(serial_name), &[7i64, 3, 9])),
            Column::from(Series::new(
                PlSmallStr::from_static("dept"),
                &[Some("A"), None, Some("B")],
            )),
        ])
        .expect("build dataframe")
    }

    #[test]
    fn renumber_rewrites_serial_column_only() {
        let df = renumber(build_df("序号")).expect("renumber");
        assert_eq!(df.height(), 3);
        assert_eq!(df.get_column_names_str(), vec!["序号", "dept"]);
        assert_eq!(
            derive_column_cells(&df, "序号", "t").expect("serial"),
            vec![
                EnumCellValue::Integer(1),
                EnumCellValue::Integer(2),
                EnumCellValue::Integer(3)
            ]
        );
        assert_eq!(
            derive_column_cells(&df, "dept", "t").expect("dept"),
            vec![
                EnumCellValue::String("A".to_string()),
                EnumCellValue::None,
                EnumCellValue::String("B".to_string())
            ]
        );
    }

    #[test]
    fn renumber_without_serial_column_is_identity() {
        let df = renumber(build_df("id")).expect("renumber");
        assert_eq!(
            derive_column_cells(&df, "id", "t").expect("id"),
            vec![
                EnumCellValue::Integer(7),
                EnumCellValue::Integer(3),
                EnumCellValue::Integer(9)
            ]
        );
    }

    #[test]
    fn partition_then_renumber_both_sides() {
        let df = DataFrame::new(vec![
            Column::from(Series::new(PlSmallStr::from_static("No."), &[1i64, 2, 3])),
            Column::from(Series::new(
                PlSmallStr::from_static("dept"),
                &["A", "B", "A"],
            )),
            Column::from(Series::new(PlSmallStr::from_static("id"), &[1i64, 2, 3])),
        ])
        .expect("build dataframe");

        let parts = crate::partition::partition(&df, "dept", &EnumCellValue::String("A".into()))
            .expect("partition");
        let df_matching = renumber(parts.df_matching).expect("renumber");
        let df_rest = renumber(parts.df_non_matching).expect("renumber");

        assert_eq!(
            derive_column_cells(&df_matching, "id", "t").expect("id"),
            vec![EnumCellValue::Integer(1), EnumCellValue::Integer(3)]
        );
        assert_eq!(
            derive_column_cells(&df_matching, "No.", "t").expect("serial"),
            vec![EnumCellValue::Integer(1), EnumCellValue::Integer(2)]
        );
        assert_eq!(
            derive_column_cells(&df_rest, "id", "t").expect("id"),
            vec![EnumCellValue::Integer(2)]
        );
        assert_eq!(
            derive_column_cells(&df_rest, "No.", "t").expect("serial"),
            vec![EnumCellValue::Integer(1)]
        );
    }

    #[test]
    fn renumber_empty_table() {
        let df = build_df("No.").head(Some(0));
        let df = renumber(df).expect("renumber");
        assert_eq!(df.height(), 0);
    }
}
