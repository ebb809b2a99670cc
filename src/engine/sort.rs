use std::fmt;

use super::column::ColumnDef;
use super::row::Row;
use super::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Header indicator glyph.
    pub fn glyph(self) -> &'static str {
        match self {
            SortDirection::Ascending => " ↑",
            SortDirection::Descending => " ↓",
        }
    }
}

/// The single active sort. "No sort" is `Option::<SortState>::None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

impl SortState {
    pub fn ascending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Descending,
        }
    }
}

impl fmt::Display for SortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column, self.direction.glyph())
    }
}

/// Next sort state after the header of `column` was activated.
///
/// Same column cycles ascending -> descending -> none; any other column starts
/// ascending and replaces the previous one.
pub fn toggle(current: Option<&SortState>, column: &str) -> Option<SortState> {
    match current {
        Some(s) if s.column == column => match s.direction {
            SortDirection::Ascending => Some(SortState::descending(column)),
            SortDirection::Descending => None,
        },
        _ => Some(SortState::ascending(column)),
    }
}

/// Stable in-place sort of `order` (indices into `rows`) by the values of `column`.
pub fn sort_indices<T: Row>(
    order: &mut Vec<usize>,
    rows: &[T],
    column: &ColumnDef<T>,
    direction: SortDirection,
) {
    // Resolve every key once, sorting (index, key) pairs keeps the sort stable.
    let mut keyed: Vec<(usize, Value)> = order
        .iter()
        .map(|&idx| (idx, column.value(&rows[idx])))
        .collect();

    match direction {
        SortDirection::Ascending => keyed.sort_by(|(_, a), (_, b)| a.sort_cmp(b)),
        SortDirection::Descending => keyed.sort_by(|(_, a), (_, b)| b.sort_cmp(a)),
    }

    *order = keyed.into_iter().map(|(idx, _)| idx).collect();
}
