use serde::Serialize;

use crate::value::SemanticType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Substring,
    Exact,
    Range,
}

/// One column of a dashboard table: which field it shows, how it is labelled
/// and how it takes part in sorting, filtering and export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDef {
    pub field: String,
    pub label: String,
    pub semantic: SemanticType,
    pub nullable: bool,
    pub sortable: bool,
    pub filter: Option<FilterKind>,
}

impl ColumnDef {
    pub fn new(field: &str, label: &str, semantic: SemanticType) -> Self {
        Self {
            field: field.to_string(),
            label: label.to_string(),
            semantic,
            nullable: false,
            sortable: true,
            filter: None,
        }
    }

    pub fn text(field: &str, label: &str) -> Self {
        Self::new(field, label, SemanticType::Text)
    }

    pub fn enumeration(field: &str, label: &str) -> Self {
        Self::new(field, label, SemanticType::Enum)
    }

    pub fn currency(field: &str, label: &str) -> Self {
        Self::new(field, label, SemanticType::Currency)
    }

    pub fn percent(field: &str, label: &str) -> Self {
        Self::new(field, label, SemanticType::Percent)
    }

    pub fn date(field: &str, label: &str) -> Self {
        Self::new(field, label, SemanticType::Date)
    }

    pub fn integer(field: &str, label: &str) -> Self {
        Self::new(field, label, SemanticType::Integer)
    }

    pub fn float(field: &str, label: &str) -> Self {
        Self::new(field, label, SemanticType::Float)
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    pub fn filter(mut self, kind: FilterKind) -> Self {
        self.filter = Some(kind);
        self
    }

    /// Filter kind used when the column is filtered without an explicit one.
    pub fn default_filter(&self) -> FilterKind {
        self.filter.unwrap_or(match self.semantic {
            SemanticType::Enum => FilterKind::Exact,
            SemanticType::Text => FilterKind::Substring,
            _ => FilterKind::Range,
        })
    }
}
