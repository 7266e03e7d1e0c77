use std::path::{Path, PathBuf};

use dashview::dataset::{Catalog, Row, ViewData};
use dashview::export;
use dashview::view::{FilterValue, ViewDef, ViewState};
use dashview::views;
use polars::prelude::*;

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn view(id: &str) -> ViewDef {
    views::find(&views::registry(), id).unwrap().clone()
}

fn rows<'a>(catalog: &'a Catalog, id: &str) -> &'a [Row] {
    match catalog.get(id) {
        Some(ViewData::Ready(dataset)) => &dataset.rows,
        other => panic!("{id} not ready: {other:?}"),
    }
}

fn column(rows: &[Row], field: &str) -> Vec<String> {
    rows.iter().map(|r| r.display(field)).collect()
}

#[test]
fn loads_every_view_or_reports_why_not() {
    let registry = views::registry();
    let catalog = Catalog::load(&fixtures(), &registry);

    assert_eq!(rows(&catalog, "account-payables").len(), 3);
    assert_eq!(rows(&catalog, "account-receivables").len(), 1);

    match catalog.get("sales-orders") {
        Some(ViewData::Failed(reason)) => assert!(reason.contains("file not found")),
        other => panic!("unexpected {other:?}"),
    }
    match catalog.get("monthly-finance-summary") {
        Some(ViewData::Failed(reason)) => assert!(reason.contains("not an array")),
        other => panic!("unexpected {other:?}"),
    }
    match catalog.get("overdue-payables") {
        Some(ViewData::Failed(reason)) => assert!(reason.contains("no data")),
        other => panic!("unexpected {other:?}"),
    }
    assert!(registry.iter().all(|v| catalog.get(&v.id).is_some()));
}

#[test]
fn payables_default_and_mode_states() {
    let payables = view("account-payables");
    let catalog = Catalog::load(&fixtures(), std::slice::from_ref(&payables));
    let data = rows(&catalog, "account-payables");

    let state = ViewState::for_view(&payables);
    assert_eq!(
        column(&payables.apply(data, &state), "apCtrlNumber"),
        vec!["AP-1001", "AP-1003", "AP-1002"]
    );

    let late = state.with_filter("late payments", FilterValue::Mode("late".into()));
    assert_eq!(
        column(&payables.apply(data, &late), "apCtrlNumber"),
        vec!["AP-1001", "AP-1003"]
    );

    let overdue = state.with_filter("late payments", FilterValue::Mode("overdue".into()));
    assert_eq!(column(&payables.apply(data, &overdue), "apCtrlNumber"), vec!["AP-1001"]);

    let searched = state.with_search("globex");
    assert_eq!(column(&payables.apply(data, &searched), "apCtrlNumber"), vec!["AP-1002"]);

    let entered = state.with_filter(
        "entryDate",
        payables.parse_filter("entryDate", "2024-02-01..2024-12-31").unwrap(),
    );
    assert_eq!(
        column(&payables.apply(data, &entered), "apCtrlNumber"),
        vec!["AP-1003", "AP-1002"]
    );
}

#[test]
fn exported_csv_reads_back() {
    let payables = view("account-payables");
    let catalog = Catalog::load(&fixtures(), std::slice::from_ref(&payables));
    let data = payables.apply(rows(&catalog, "account-payables"), &ViewState::for_view(&payables));

    let dir = tempfile::tempdir().unwrap();
    let path = export::export_csv(&data, &payables.columns, dir.path(), &payables.id).unwrap();
    assert_eq!(path.file_name().unwrap(), "account-payables.csv");

    let frame = LazyCsvReader::new(PlPath::Local(path.as_path().into()))
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .finish()
        .unwrap()
        .collect()
        .unwrap();

    assert_eq!(frame.height(), data.len());
    let labels: Vec<&str> = frame.get_column_names().iter().map(|n| n.as_str()).collect();
    let expected: Vec<&str> = payables.columns.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, expected);

    for column in payables.columns.iter() {
        let cells = frame
            .column(&column.label)
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .clone();
        for (idx, row) in data.iter().enumerate() {
            let text = row.display(&column.field);
            let expected = if text.is_empty() { None } else { Some(text.as_str()) };
            assert_eq!(cells.get(idx), expected, "{} row {idx}", column.field);
        }
    }
}
