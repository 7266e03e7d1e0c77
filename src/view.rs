//! Declarative dashboard views and the immutable filter/sort state the user
//! builds up while looking at one.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::warn;

use crate::column::{ColumnDef, FilterKind};
use crate::dataset::Row;
use crate::filter::{self, FieldPredicate};
use crate::sort::{self, Direction, SortSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Sales,
    Inventory,
    Finance,
    Logistics,
    Repairs,
    Management,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Sales,
        Tab::Inventory,
        Tab::Finance,
        Tab::Logistics,
        Tab::Repairs,
        Tab::Management,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Sales => "Sales",
            Tab::Inventory => "Inventory",
            Tab::Finance => "Finance",
            Tab::Logistics => "Logistics",
            Tab::Repairs => "Repairs",
            Tab::Management => "Management",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A named group of mutually exclusive filter options, e.g. the "late
/// payments" selector of the payables table. The first option is the
/// default and usually lets every row pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeFilter {
    pub name: String,
    pub options: Vec<(String, Vec<FieldPredicate>)>,
}

impl ModeFilter {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            options: Vec::new(),
        }
    }

    pub fn option(mut self, label: &str, predicates: Vec<FieldPredicate>) -> Self {
        self.options.push((label.to_string(), predicates));
        self
    }

    pub fn default_option(&self) -> Option<&str> {
        self.options.first().map(|(label, _)| label.as_str())
    }

    pub fn predicates(&self, option: &str) -> Option<&[FieldPredicate]> {
        self.options
            .iter()
            .find(|(label, _)| label == option)
            .map(|(_, p)| p.as_slice())
    }

    /// The option after `current`, wrapping around.
    pub fn next_option(&self, current: &str) -> Option<&str> {
        let idx = self.options.iter().position(|(label, _)| label == current);
        let next = idx.map_or(0, |i| (i + 1) % self.options.len());
        self.options.get(next).map(|(label, _)| label.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewDef {
    pub id: String,
    pub title: String,
    pub tab: Tab,
    pub source: String,
    pub pointer: String,
    pub columns: Vec<ColumnDef>,
    pub default_sort: SortSpec,
    pub search: Vec<String>,
    pub modes: Vec<ModeFilter>,
}

impl ViewDef {
    pub fn new(id: &str, title: &str, tab: Tab, source: &str, pointer: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            tab,
            source: source.to_string(),
            pointer: pointer.to_string(),
            columns: Vec::new(),
            default_sort: SortSpec::new("", Direction::Ascending),
            search: Vec::new(),
            modes: Vec::new(),
        }
    }

    pub fn columns(mut self, columns: Vec<ColumnDef>) -> Self {
        self.columns = columns;
        self
    }

    pub fn sorted_by(mut self, field: &str, direction: Direction) -> Self {
        self.default_sort = SortSpec::new(field, direction);
        self
    }

    pub fn search(mut self, fields: &[&str]) -> Self {
        self.search = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn mode(mut self, mode: ModeFilter) -> Self {
        self.modes.push(mode);
        self
    }

    pub fn column(&self, field: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.field == field)
    }

    pub fn mode_filter(&self, name: &str) -> Option<&ModeFilter> {
        self.modes.iter().find(|m| m.name == name)
    }

    /// Translates the UI state into engine predicates. Filters naming unknown
    /// columns or modes are ignored.
    pub fn predicates(&self, state: &ViewState) -> Vec<FieldPredicate> {
        let mut predicates = Vec::new();

        for (field, value) in state.filters.iter() {
            if let FilterValue::Mode(option) = value {
                match self.mode_filter(field).and_then(|m| m.predicates(option)) {
                    Some(p) => predicates.extend_from_slice(p),
                    None => warn!("{}: unknown mode filter {field}={option}", self.id),
                }
                continue;
            }
            let Some(column) = self.column(field) else {
                warn!("{}: filter on unknown column '{field}'", self.id);
                continue;
            };
            predicates.push(match value {
                FilterValue::Text(text) => FieldPredicate::substring(field, text),
                FilterValue::Choice(choice) => FieldPredicate::exact(field, choice),
                FilterValue::Range { from, to } => {
                    FieldPredicate::range(field, column.semantic, from, to)
                }
                FilterValue::Mode(_) => continue,
            });
        }

        // Mode groups the user has not touched apply their first option.
        for mode in self.modes.iter() {
            if state.filter(&mode.name).is_none()
                && let Some((_, p)) = mode.options.first()
            {
                predicates.extend_from_slice(p);
            }
        }

        if let Some(text) = state.search.as_deref() {
            let fields: Vec<&str> = self.search.iter().map(String::as_str).collect();
            if !fields.is_empty() {
                predicates.push(FieldPredicate::search(&fields, text));
            }
        }
        predicates
    }

    /// Indices into `rows` of the filtered and sorted view.
    pub fn apply_mask(&self, rows: &[Row], state: &ViewState) -> Vec<usize> {
        let mask: Vec<usize> = (0..rows.len()).collect();
        let filtered = filter::filter_mask(rows, &mask, &self.predicates(state));
        match self.column(&state.sort.field) {
            Some(column) if column.sortable => sort::sort_mask(
                rows,
                &filtered,
                &column.field,
                column.semantic,
                state.sort.direction,
            ),
            _ => filtered,
        }
    }

    pub fn apply(&self, rows: &[Row], state: &ViewState) -> Vec<Row> {
        self.apply_mask(rows, state)
            .into_iter()
            .map(|idx| rows[idx].clone())
            .collect()
    }

    /// Turns text typed for a column into a filter value according to the
    /// column's filter kind. Ranges are written as `from..to`, either side
    /// may be empty.
    pub fn parse_filter(&self, field: &str, input: &str) -> Option<FilterValue> {
        let column = self.column(field)?;
        let input = input.trim();
        Some(match column.default_filter() {
            FilterKind::Substring => FilterValue::Text(input.to_string()),
            FilterKind::Exact => FilterValue::Choice(input.to_string()),
            FilterKind::Range => match input.split_once("..") {
                Some((from, to)) => FilterValue::Range {
                    from: from.trim().to_string(),
                    to: to.trim().to_string(),
                },
                None => FilterValue::Range {
                    from: input.to_string(),
                    to: input.to_string(),
                },
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Choice(String),
    Range { from: String, to: String },
    Mode(String),
}

impl FilterValue {
    /// Values equivalent to "no filter".
    pub fn is_default(&self) -> bool {
        match self {
            FilterValue::Text(t) => t.is_empty(),
            FilterValue::Choice(c) => c.is_empty() || c == filter::ALL,
            FilterValue::Range { from, to } => from.is_empty() && to.is_empty(),
            FilterValue::Mode(_) => false,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Text(t) => write!(f, "~{t}"),
            FilterValue::Choice(c) => write!(f, "={c}"),
            FilterValue::Range { from, to } => write!(f, ":{from}..{to}"),
            FilterValue::Mode(m) => write!(f, "={m}"),
        }
    }
}

/// Filter and sort state of one view. Never mutated in place; every setter
/// returns the updated state.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub filters: BTreeMap<String, FilterValue>,
    pub search: Option<String>,
    pub sort: SortSpec,
}

impl ViewState {
    pub fn for_view(view: &ViewDef) -> Self {
        Self {
            filters: BTreeMap::new(),
            search: None,
            sort: view.default_sort.clone(),
        }
    }

    pub fn with_filter(&self, field: &str, value: FilterValue) -> Self {
        if value.is_default() {
            return self.without_filter(field);
        }
        let mut next = self.clone();
        next.filters.insert(field.to_string(), value);
        next
    }

    pub fn without_filter(&self, field: &str) -> Self {
        let mut next = self.clone();
        next.filters.remove(field);
        next
    }

    pub fn with_search(&self, text: &str) -> Self {
        let mut next = self.clone();
        next.search = if text.trim().is_empty() {
            None
        } else {
            Some(text.trim().to_string())
        };
        next
    }

    pub fn with_sort(&self, sort: SortSpec) -> Self {
        let mut next = self.clone();
        next.sort = sort;
        next
    }

    pub fn toggle_sort(&self, field: &str) -> Self {
        self.with_sort(self.sort.toggle(field))
    }

    /// Drops every filter and the search text, keeping the sort order.
    pub fn cleared(&self) -> Self {
        Self {
            filters: BTreeMap::new(),
            search: None,
            sort: self.sort.clone(),
        }
    }

    pub fn filter(&self, field: &str) -> Option<&FilterValue> {
        self.filters.get(field)
    }

    pub fn describe(&self) -> String {
        let mut parts: Vec<String> = self
            .filters
            .iter()
            .map(|(field, value)| format!("{field}{value}"))
            .collect();
        if let Some(search) = &self.search {
            parts.push(format!("/{search}"));
        }
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Comparison;
    use serde_json::json;

    fn payables() -> ViewDef {
        ViewDef::new("account-payables", "Account Payables", Tab::Finance, "finance.json", "/payables")
            .columns(vec![
                ColumnDef::text("vendor", "Vendor").filter(FilterKind::Substring),
                ColumnDef::enumeration("status", "Status").filter(FilterKind::Exact),
                ColumnDef::integer("aging", "Aging"),
                ColumnDef::date("dueDate", "Due Date").filter(FilterKind::Range),
                ColumnDef::currency("amount", "Amount"),
            ])
            .sorted_by("dueDate", Direction::Ascending)
            .search(&["vendor", "status"])
            .mode(
                ModeFilter::new("late")
                    .option("all", vec![])
                    .option("overdue", vec![FieldPredicate::exact("status", "Overdue")])
                    .option("late", vec![FieldPredicate::threshold("aging", Comparison::Ge, 30.0)]),
            )
    }

    fn rows() -> Vec<Row> {
        vec![
            Row::from(json!({"vendor": "Acme", "status": "Open", "aging": 10, "dueDate": "2024-02-01", "amount": "$10.00"})),
            Row::from(json!({"vendor": "Globex", "status": "Overdue", "aging": 40, "dueDate": "2024-01-01", "amount": "$20.00"})),
            Row::from(json!({"vendor": "Initech", "status": "Paid", "aging": 35, "dueDate": null, "amount": "$30.00"})),
        ]
    }

    fn vendors(rows: &[Row]) -> Vec<String> {
        rows.iter().map(|r| r.display("vendor")).collect()
    }

    #[test]
    fn default_state_sorts_by_default_field() {
        let view = payables();
        let state = ViewState::for_view(&view);
        assert_eq!(vendors(&view.apply(&rows(), &state)), vec!["Globex", "Acme", "Initech"]);
    }

    #[test]
    fn setters_leave_the_original_untouched() {
        let view = payables();
        let state = ViewState::for_view(&view);
        let filtered = state.with_filter("status", FilterValue::Choice("Paid".into()));
        assert!(state.filters.is_empty());
        assert_eq!(filtered.filters.len(), 1);
        assert_eq!(vendors(&view.apply(&rows(), &filtered)), vec!["Initech"]);
    }

    #[test]
    fn default_values_remove_filters() {
        let view = payables();
        let state = ViewState::for_view(&view)
            .with_filter("status", FilterValue::Choice("Paid".into()))
            .with_filter("status", FilterValue::Choice("all".into()));
        assert!(state.filters.is_empty());
    }

    #[test]
    fn mode_filters() {
        let view = payables();
        let state = ViewState::for_view(&view);
        let late = state.with_filter("late", FilterValue::Mode("late".into()));
        assert_eq!(vendors(&view.apply(&rows(), &late)), vec!["Globex", "Initech"]);
        let overdue = state.with_filter("late", FilterValue::Mode("overdue".into()));
        assert_eq!(vendors(&view.apply(&rows(), &overdue)), vec!["Globex"]);
        let mode = view.mode_filter("late").unwrap();
        assert_eq!(mode.next_option("late"), Some("all"));
        assert_eq!(mode.next_option("all"), Some("overdue"));
    }

    #[test]
    fn search_uses_view_fields() {
        let view = payables();
        let state = ViewState::for_view(&view).with_search("  ini ");
        assert_eq!(vendors(&view.apply(&rows(), &state)), vec!["Initech"]);
        assert_eq!(state.with_search("").search, None);
    }

    #[test]
    fn toggle_sort_flips_then_resets() {
        let view = payables();
        let state = ViewState::for_view(&view).toggle_sort("dueDate");
        assert_eq!(state.sort.direction, Direction::Descending);
        assert_eq!(vendors(&view.apply(&rows(), &state)), vec!["Acme", "Globex", "Initech"]);
        let by_amount = state.toggle_sort("amount");
        assert_eq!(by_amount.sort, SortSpec::new("amount", Direction::Ascending));
    }

    #[test]
    fn parse_filter_by_kind() {
        let view = payables();
        assert_eq!(view.parse_filter("vendor", " acme "), Some(FilterValue::Text("acme".into())));
        assert_eq!(
            view.parse_filter("dueDate", "2024-01-01..").unwrap(),
            FilterValue::Range { from: "2024-01-01".into(), to: "".into() }
        );
        assert_eq!(view.parse_filter("nope", "x"), None);
    }

    #[test]
    fn untouched_mode_applies_first_option() {
        let view = payables().mode(
            ModeFilter::new("status group")
                .option("open", vec![FieldPredicate::exact("status", "Open")])
                .option("any", vec![]),
        );
        let state = ViewState::for_view(&view);
        assert_eq!(vendors(&view.apply(&rows(), &state)), vec!["Acme"]);
        let any = state.with_filter("status group", FilterValue::Mode("any".into()));
        assert_eq!(view.apply(&rows(), &any).len(), 3);
    }

    #[test]
    fn describe_lists_filters_and_search() {
        let view = payables();
        let state = ViewState::for_view(&view)
            .with_filter("status", FilterValue::Choice("Open".into()))
            .with_filter("dueDate", FilterValue::Range { from: "2024-01-01".into(), to: "".into() })
            .with_search("acme");
        assert_eq!(state.describe(), "dueDate:2024-01-01.. status=Open /acme");
    }

    #[test]
    fn cleared_keeps_sort() {
        let view = payables();
        let state = ViewState::for_view(&view)
            .toggle_sort("amount")
            .with_search("x")
            .with_filter("vendor", FilterValue::Text("a".into()));
        let cleared = state.cleared();
        assert!(cleared.filters.is_empty());
        assert_eq!(cleared.search, None);
        assert_eq!(cleared.sort, state.sort);
    }
}
