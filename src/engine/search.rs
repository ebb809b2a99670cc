use rayon::prelude::*;

use super::row::Row;

/// Snapshots at least this large are filtered on the rayon pool.
pub const PARALLEL_FILTER_THRESHOLD: usize = 4096;

/// Normalizes raw search text into the query that is actually applied.
pub fn normalize_query(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Fields to search: the declared ones, or the fields of the first row.
pub fn resolve_fields<T: Row>(declared: Option<&[String]>, rows: &[T]) -> Vec<String> {
    match declared {
        Some(fields) if !fields.is_empty() => fields.to_vec(),
        _ => rows.first().map(|r| r.field_names()).unwrap_or_default(),
    }
}

/// True if any of `fields` of `row`, lower-cased, contains `query`.
/// `query` must already be normalized.
pub fn row_matches<T: Row>(row: &T, fields: &[String], query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    fields.iter().any(|name| {
        row.field(name)
            .map(|v| v.to_string().to_lowercase().contains(query))
            .unwrap_or(false)
    })
}

/// Indices of the rows matching `query`, in snapshot order.
pub fn filter_indices<T: Row + Sync>(rows: &[T], fields: &[String], query: &str) -> Vec<usize> {
    if query.is_empty() {
        return (0..rows.len()).collect();
    }
    if rows.len() >= PARALLEL_FILTER_THRESHOLD {
        rows.par_iter()
            .enumerate()
            .filter(|(_, row)| row_matches(*row, fields, query))
            .map(|(idx, _)| idx)
            .collect()
    } else {
        rows.iter()
            .enumerate()
            .filter(|(_, row)| row_matches(*row, fields, query))
            .map(|(idx, _)| idx)
            .collect()
    }
}
