//! Semantic types of dashboard fields and the coercions used to compare,
//! filter and render them.
//!
//! The JSON datasets carry most values pre-formatted for display
//! (`"$12,345.67"`, `"12.5%"`, `"2024-01-05"`). Comparisons therefore never
//! look at the JSON type alone but at the semantic type declared by the
//! column.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    Text,
    Enum,
    Currency,
    Percent,
    Date,
    Integer,
    Float,
}

impl SemanticType {
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            SemanticType::Currency
                | SemanticType::Percent
                | SemanticType::Date
                | SemanticType::Integer
                | SemanticType::Float
        )
    }
}

/// Comparable projection of a field value.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Missing,
    Number(f64),
    Text(String),
}

impl SortKey {
    pub fn is_missing(&self) -> bool {
        matches!(self, SortKey::Missing)
    }

    /// Ascending order between two present keys. Missing keys are placed by
    /// the caller, this only orders the keys themselves.
    pub fn cmp_present(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            // Mixed keys only appear for malformed data, numbers first.
            (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
            (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
            (SortKey::Missing, SortKey::Missing) => Ordering::Equal,
            (SortKey::Missing, _) => Ordering::Greater,
            (_, SortKey::Missing) => Ordering::Less,
        }
    }
}

/// Largest magnitude below which every integral f64 is exact.
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

/// Treats JSON `null` the same as an absent key.
pub fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

/// Text used for display, CSV export and substring matching.
pub fn display(value: Option<&Value>) -> String {
    match present(value) {
        None => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                match n.as_f64() {
                    // 45.0 shows as 45, like the integer it stands for.
                    Some(f) if f.fract() == 0.0 && f.abs() < MAX_EXACT_FLOAT => {
                        format!("{}", f as i64)
                    }
                    _ => n.to_string(),
                }
            }
        }
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

pub fn parse_currency(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    let (negative, body) = if trimmed.starts_with('(') && trimmed.ends_with(')') {
        (true, &trimmed[1..trimmed.len() - 1])
    } else {
        (false, trimmed)
    };
    let cleaned: String = body
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    let value = cleaned.parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(if negative { -value } else { value })
}

pub fn parse_percent(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| !matches!(c, '%' | '+' | ',' | ' '))
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_number(s: &str) -> Option<f64> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%b %d, %Y", "%B %d, %Y", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];
const MONTH_FORMATS: &[&str] = &["%Y-%m-%d", "%b %Y %d", "%B %Y %d"];

/// Milliseconds since the unix epoch (UTC) for the date formats found in the
/// dashboard datasets.
pub fn parse_date(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return date_millis(d);
        }
    }
    // Month labels ("2024-03", "Mar 2024") resolve to the first of the month.
    let month_candidates = [format!("{s}-01"), format!("{s} 01")];
    for candidate in month_candidates.iter() {
        for fmt in MONTH_FORMATS {
            if let Ok(d) = NaiveDate::parse_from_str(candidate, fmt) {
                return date_millis(d);
            }
        }
    }
    None
}

fn date_millis(d: NaiveDate) -> Option<i64> {
    d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp_millis())
}

/// Numeric projection of a value for range and threshold predicates.
/// `None` means the value is absent; unparsable values yield `Some(0.0)`.
pub fn numeric(value: Option<&Value>, semantic: SemanticType) -> Option<f64> {
    match sort_key(value, semantic) {
        SortKey::Missing => None,
        SortKey::Number(n) => Some(n),
        SortKey::Text(_) => Some(0.0),
    }
}

/// Parses user supplied text (a filter bound) with the rules of `semantic`.
pub fn parse_bound(s: &str, semantic: SemanticType) -> Option<f64> {
    match semantic {
        SemanticType::Date => parse_date(s).map(|ms| ms as f64),
        SemanticType::Currency => parse_currency(s),
        SemanticType::Percent => parse_percent(s),
        _ => parse_number(s),
    }
}

pub fn sort_key(value: Option<&Value>, semantic: SemanticType) -> SortKey {
    let Some(value) = present(value) else {
        return SortKey::Missing;
    };
    match semantic {
        SemanticType::Text | SemanticType::Enum => SortKey::Text(display(Some(value)).to_lowercase()),
        SemanticType::Date => match value {
            Value::String(s) => SortKey::Number(parse_date(s).unwrap_or(0) as f64),
            Value::Number(n) => SortKey::Number(n.as_f64().unwrap_or(0.0)),
            _ => SortKey::Number(0.0),
        },
        SemanticType::Currency | SemanticType::Percent | SemanticType::Integer | SemanticType::Float => {
            let parsed = match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => match semantic {
                    SemanticType::Currency => parse_currency(s),
                    SemanticType::Percent => parse_percent(s),
                    _ => parse_number(s),
                },
                _ => None,
            };
            SortKey::Number(parsed.unwrap_or(0.0))
        }
    }
}
