//! Row filtering. Every active predicate must hold (logical AND); the
//! result keeps the input order.

use tracing::{trace, warn};

use crate::dataset::Row;
use crate::value::{self, SemanticType};

/// Option value of exact filters that lets every row pass.
pub const ALL: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl Comparison {
    pub fn holds(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            Comparison::Lt => lhs < rhs,
            Comparison::Le => lhs <= rhs,
            Comparison::Gt => lhs > rhs,
            Comparison::Ge => lhs >= rhs,
            Comparison::Eq => lhs == rhs,
            Comparison::Ne => lhs != rhs,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldPredicate {
    /// Case-folded containment; empty text passes everything.
    Substring { field: String, text: String },
    /// Equality with the selected option; `"all"` and empty pass everything.
    Exact { field: String, value: String },
    /// Inclusive bounds on the numeric projection of the field.
    Range {
        field: String,
        semantic: SemanticType,
        from: Option<f64>,
        to: Option<f64>,
    },
    /// Compares a numeric field against a constant.
    Threshold {
        field: String,
        comparison: Comparison,
        value: f64,
    },
    /// Passes if any of the fields contains the case-folded text.
    Search { fields: Vec<String>, text: String },
}

impl FieldPredicate {
    pub fn substring(field: &str, text: &str) -> Self {
        FieldPredicate::Substring {
            field: field.to_string(),
            text: text.to_lowercase(),
        }
    }

    pub fn exact(field: &str, value: &str) -> Self {
        FieldPredicate::Exact {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// Builds a range from user text. Empty bounds are absent, unparsable
    /// bounds are dropped.
    pub fn range(field: &str, semantic: SemanticType, from: &str, to: &str) -> Self {
        let parse = |bound: &str| {
            if bound.trim().is_empty() {
                return None;
            }
            let parsed = value::parse_bound(bound, semantic);
            if parsed.is_none() {
                warn!("Ignoring unparsable bound '{bound}' for '{field}'");
            }
            parsed
        };
        FieldPredicate::Range {
            field: field.to_string(),
            semantic,
            from: parse(from),
            to: parse(to),
        }
    }

    pub fn threshold(field: &str, comparison: Comparison, value: f64) -> Self {
        FieldPredicate::Threshold {
            field: field.to_string(),
            comparison,
            value,
        }
    }

    pub fn search(fields: &[&str], text: &str) -> Self {
        FieldPredicate::Search {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            text: text.to_lowercase(),
        }
    }

    /// An inactive predicate lets every row pass.
    pub fn is_active(&self) -> bool {
        match self {
            FieldPredicate::Substring { text, .. } | FieldPredicate::Search { text, .. } => {
                !text.is_empty()
            }
            FieldPredicate::Exact { value, .. } => !value.is_empty() && value != ALL,
            FieldPredicate::Range { from, to, .. } => from.is_some() || to.is_some(),
            FieldPredicate::Threshold { .. } => true,
        }
    }

    pub fn matches(&self, row: &Row) -> bool {
        if !self.is_active() {
            return true;
        }
        match self {
            FieldPredicate::Substring { field, text } => contains(row, field, text),
            FieldPredicate::Exact { field, value } => match row.get(field) {
                Some(v) => value::display(Some(v)) == *value,
                None => false,
            },
            FieldPredicate::Range {
                field,
                semantic,
                from,
                to,
            } => match value::numeric(row.get(field), *semantic) {
                // Rows without a value are never excluded by a range.
                None => true,
                Some(n) => from.is_none_or(|lo| n >= lo) && to.is_none_or(|hi| n <= hi),
            },
            FieldPredicate::Threshold {
                field,
                comparison,
                value,
            } => match value::numeric(row.get(field), SemanticType::Float) {
                Some(n) => comparison.holds(n, *value),
                None => false,
            },
            FieldPredicate::Search { fields, text } => fields.iter().any(|f| contains(row, f, text)),
        }
    }
}

fn contains(row: &Row, field: &str, text: &str) -> bool {
    match row.get(field) {
        Some(v) => value::display(Some(v)).to_lowercase().contains(text),
        None => false,
    }
}

fn passes(row: &Row, predicates: &[FieldPredicate]) -> bool {
    predicates.iter().all(|p| p.matches(row))
}

pub fn filter_rows(rows: &[Row], predicates: &[FieldPredicate]) -> Vec<Row> {
    rows.iter()
        .filter(|row| passes(row, predicates))
        .cloned()
        .collect()
}

/// Index form of [`filter_rows`]: returns the entries of `mask` (indices into
/// `rows`) whose row passes, in mask order.
pub fn filter_mask(rows: &[Row], mask: &[usize], predicates: &[FieldPredicate]) -> Vec<usize> {
    let active = predicates.iter().filter(|p| p.is_active()).count();
    let matches: Vec<usize> = mask
        .iter()
        .copied()
        .filter(|&idx| passes(&rows[idx], predicates))
        .collect();
    trace!(
        "Filter with {active} active predicates kept {}/{} rows",
        matches.len(),
        mask.len()
    );
    matches
}

/// Options of an exact filter: `"all"` followed by the distinct values of
/// `field` in first-seen order.
pub fn distinct_values(rows: &[Row], field: &str) -> Vec<String> {
    let mut options = vec![ALL.to_string()];
    for row in rows {
        if let Some(v) = row.get(field) {
            let v = value::display(Some(v));
            if !options.contains(&v) {
                options.push(v);
            }
        }
    }
    options
}
