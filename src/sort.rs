//! Stable, type-aware sorting of rows.
//!
//! Rows without a value in the sort field always end up after all rows with
//! a value, in both directions. Equal keys keep their input order.

use std::cmp::Ordering;
use std::fmt;
use std::time::Instant;

use serde::Serialize;
use tracing::trace;

use crate::dataset::Row;
use crate::value::{self, SemanticType, SortKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    pub fn toggled(self) -> Self {
        match self {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(Direction::Ascending),
            "desc" | "descending" => Some(Direction::Descending),
            _ => None,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Direction::Ascending => "▲",
            Direction::Descending => "▼",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Ascending => write!(f, "asc"),
            Direction::Descending => write!(f, "desc"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: Direction,
}

impl SortSpec {
    pub fn new(field: &str, direction: Direction) -> Self {
        Self {
            field: field.to_string(),
            direction,
        }
    }

    /// Clicking the active column flips the direction, any other column
    /// starts ascending.
    pub fn toggle(&self, field: &str) -> Self {
        if self.field == field {
            Self::new(field, self.direction.toggled())
        } else {
            Self::new(field, Direction::Ascending)
        }
    }
}

/// Orders two keys for `direction`, placing missing keys last.
pub fn compare_keys(a: &SortKey, b: &SortKey, direction: Direction) -> Ordering {
    match (a.is_missing(), b.is_missing()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ord = a.cmp_present(b);
            match direction {
                Direction::Ascending => ord,
                Direction::Descending => ord.reverse(),
            }
        }
    }
}

/// Index form of [`sort_rows`]: reorders the entries of `mask` (indices into
/// `rows`).
pub fn sort_mask(
    rows: &[Row],
    mask: &[usize],
    field: &str,
    semantic: SemanticType,
    direction: Direction,
) -> Vec<usize> {
    let start_time = Instant::now();

    // Keys are computed once per row, not once per comparison.
    let mut indexed_rows: Vec<(usize, SortKey)> = mask
        .iter()
        .map(|&idx| (idx, value::sort_key(rows[idx].get(field), semantic)))
        .collect();

    // sort_by is stable, which keeps ties in mask order.
    indexed_rows.sort_by(|(_, a), (_, b)| compare_keys(a, b, direction));

    trace!(
        "Sorted {} rows by '{field}' {direction} in {}us",
        indexed_rows.len(),
        start_time.elapsed().as_micros()
    );
    indexed_rows.into_iter().map(|(idx, _)| idx).collect()
}

pub fn sort_rows(rows: &[Row], field: &str, semantic: SemanticType, direction: Direction) -> Vec<Row> {
    let mask: Vec<usize> = (0..rows.len()).collect();
    sort_mask(rows, &mask, field, semantic, direction)
        .into_iter()
        .map(|idx| rows[idx].clone())
        .collect()
}
