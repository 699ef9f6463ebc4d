//! Stable split of a table on one column value, plus per-value statistics.

use std::collections::BTreeMap;

use polars::prelude::DataFrame;

use crate::spec::{EnumCellKey, EnumCellValue, SpecPartition, TableError};
use crate::util::{derive_column_cells, filter_rows_by_mask};

/// Split `df` into rows where `column == value` and all remaining rows.
///
/// Comparison is exact and type-sensitive ([`EnumCellValue::is_same_value`]); relative row
/// order is preserved on both sides. An empty matching side is not an error.
pub fn partition(
    df: &DataFrame,
    column: &str,
    value: &EnumCellValue,
) -> Result<SpecPartition, TableError> {
    let l_cells = derive_column_cells(df, column, "table")?;
    let l_mask_matching: Vec<bool> = l_cells
        .iter()
        .map(|cell| cell.is_same_value(value))
        .collect();
    let l_mask_non_matching: Vec<bool> = l_mask_matching.iter().map(|if_match| !if_match).collect();

    Ok(SpecPartition {
        df_matching: filter_rows_by_mask(df, &l_mask_matching)?,
        df_non_matching: filter_rows_by_mask(df, &l_mask_non_matching)?,
    })
}

/// Distinct non-missing values of `column` in first-seen order.
pub fn derive_distinct_values(
    df: &DataFrame,
    column: &str,
) -> Result<Vec<EnumCellValue>, TableError> {
    Ok(_tally_values(df, column)?
        .into_iter()
        .map(|(value, _)| value)
        .collect())
}

/// Row count per distinct non-missing value of `column`.
///
/// Ordered by count descending; ties keep first-seen order.
pub fn count_values(
    df: &DataFrame,
    column: &str,
) -> Result<Vec<(EnumCellValue, usize)>, TableError> {
    let mut l_counts = _tally_values(df, column)?;
    // `sort_by` is stable, so equal counts stay in first-seen order.
    l_counts.sort_by(|(_, n_left), (_, n_right)| n_right.cmp(n_left));
    Ok(l_counts)
}

fn _tally_values(df: &DataFrame, column: &str) -> Result<Vec<(EnumCellValue, usize)>, TableError> {
    let l_cells = derive_column_cells(df, column, "table")?;

    let mut dict_pos: BTreeMap<EnumCellKey, usize> = BTreeMap::new();
    let mut l_counts: Vec<(EnumCellValue, usize)> = Vec::new();
    for cell in l_cells {
        let Some(key) = cell.to_key() else {
            continue;
        };
        match dict_pos.get(&key) {
            Some(n_pos) => l_counts[*n_pos].1 += 1,
            None => {
                dict_pos.insert(key, l_counts.len());
                l_counts.push((cell, 1));
            }
        }
    }
    Ok(l_counts)
}
