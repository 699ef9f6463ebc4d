//! Accession-identifier deduplication between a candidate and a reference table.

use std::collections::BTreeSet;

use polars::prelude::DataFrame;

use crate::spec::{EnumCellKey, SpecDedupResult, TableError};
use crate::util::{derive_column_cells, filter_rows_by_mask};

/// Drop candidate rows whose `id_column` value also appears in `df_reference`.
///
/// Missing identifiers are never treated as duplicates. Matching is exact equality,
/// without trimming or case folding.
///
/// Returns [`TableError::MissingColumn`] when either table lacks `id_column`.
pub fn deduplicate(
    df_candidate: &DataFrame,
    df_reference: &DataFrame,
    id_column: &str,
) -> Result<SpecDedupResult, TableError> {
    let l_ids_candidate = derive_column_cells(df_candidate, id_column, "candidate table")?;
    let l_ids_reference = derive_column_cells(df_reference, id_column, "reference table")?;

    let set_ids_reference: BTreeSet<EnumCellKey> = l_ids_reference
        .iter()
        .filter_map(|value| value.to_key())
        .collect();

    let l_mask_keep: Vec<bool> = l_ids_candidate
        .iter()
        .map(|value| match value.to_key() {
            Some(key) => !set_ids_reference.contains(&key),
            None => true,
        })
        .collect();

    let df_kept = filter_rows_by_mask(df_candidate, &l_mask_keep)?;
    let n_removed = df_candidate.height() - df_kept.height();

    Ok(SpecDedupResult { df_kept, n_removed })
}
