use dashview::dataset::Row;
use dashview::filter::{self, Comparison, FieldPredicate};
use dashview::sort::{self, Direction};
use dashview::value::SemanticType;
use proptest::prelude::*;
use serde_json::{Value, json};

fn field(rows: &[Row], name: &str) -> Vec<String> {
    rows.iter().map(|r| r.display(name)).collect()
}

fn ids(rows: &[Row]) -> Vec<u64> {
    rows.iter()
        .filter_map(|r| r.get("id").and_then(Value::as_u64))
        .collect()
}

#[test]
fn sorts_dates_and_currency() {
    let rows = vec![
        Row::from(json!({"amount": "$100.00", "due": "2024-01-05"})),
        Row::from(json!({"amount": "$50.00", "due": null})),
        Row::from(json!({"amount": "$200.00", "due": "2024-01-01"})),
    ];
    let by_due = sort::sort_rows(&rows, "due", SemanticType::Date, Direction::Ascending);
    assert_eq!(field(&by_due, "due"), vec!["2024-01-01", "2024-01-05", ""]);

    let by_amount = sort::sort_rows(&rows, "amount", SemanticType::Currency, Direction::Descending);
    assert_eq!(field(&by_amount, "amount"), vec!["$200.00", "$100.00", "$50.00"]);
}

#[test]
fn exact_filter_and_all_sentinel() {
    let rows = vec![
        Row::from(json!({"status": "Open"})),
        Row::from(json!({"status": "Paid"})),
        Row::from(json!({"status": "Overdue"})),
    ];
    let overdue = filter::filter_rows(&rows, &[FieldPredicate::exact("status", "Overdue")]);
    assert_eq!(field(&overdue, "status"), vec!["Overdue"]);

    let all = filter::filter_rows(&rows, &[FieldPredicate::exact("status", filter::ALL)]);
    assert_eq!(field(&all, "status"), vec!["Open", "Paid", "Overdue"]);
}

#[test]
fn unparsable_dates_sort_as_epoch() {
    let rows = vec![
        Row::from(json!({"id": 0, "due": "2024-01-01"})),
        Row::from(json!({"id": 1, "due": "soon"})),
        Row::from(json!({"id": 2, "due": "later"})),
    ];
    let asc = sort::sort_rows(&rows, "due", SemanticType::Date, Direction::Ascending);
    assert_eq!(ids(&asc), vec![1, 2, 0]);
    let desc = sort::sort_rows(&rows, "due", SemanticType::Date, Direction::Descending);
    assert_eq!(ids(&desc), vec![0, 1, 2]);
}

#[test]
fn nulls_fail_text_filters_but_pass_ranges() {
    let rows = vec![
        Row::from(json!({"id": 0, "vendor": null, "due": null})),
        Row::from(json!({"id": 1, "vendor": "Acme", "due": "2024-03-01"})),
    ];
    let substring = filter::filter_rows(&rows, &[FieldPredicate::substring("vendor", "a")]);
    assert_eq!(ids(&substring), vec![1]);

    let range = FieldPredicate::range("due", SemanticType::Date, "2024-01-01", "2024-12-31");
    assert_eq!(ids(&filter::filter_rows(&rows, &[range])), vec![0, 1]);
}

#[test]
fn nulls_fail_exact_filters_unless_all() {
    let rows = vec![
        Row::from(json!({"id": 0, "status": null})),
        Row::from(json!({"id": 1})),
        Row::from(json!({"id": 2, "status": "Open"})),
    ];
    let open = filter::filter_rows(&rows, &[FieldPredicate::exact("status", "Open")]);
    assert_eq!(ids(&open), vec![2]);

    let all = filter::filter_rows(&rows, &[FieldPredicate::exact("status", filter::ALL)]);
    assert_eq!(ids(&all), vec![0, 1, 2]);
}

#[test]
fn integral_floats_match_like_integers() {
    let rows = vec![
        Row::from(json!({"id": 0, "aging": 45.0})),
        Row::from(json!({"id": 1, "aging": 45})),
        Row::from(json!({"id": 2, "aging": 45.5})),
    ];
    let out = filter::filter_rows(&rows, &[FieldPredicate::exact("aging", "45")]);
    assert_eq!(ids(&out), vec![0, 1]);
}

#[test]
fn threshold_modes() {
    let rows = vec![
        Row::from(json!({"id": 0, "aging": 29})),
        Row::from(json!({"id": 1, "aging": 30})),
        Row::from(json!({"id": 2, "aging": null})),
    ];
    let late = FieldPredicate::threshold("aging", Comparison::Ge, 30.0);
    assert_eq!(ids(&filter::filter_rows(&rows, &[late])), vec![1]);
}

fn arb_rows() -> impl Strategy<Value = Vec<Row>> {
    let record = (
        proptest::option::of(-5i64..5),
        proptest::option::of(prop::sample::select(vec!["alpha", "Bravo", "charlie", "ALPHA"])),
        proptest::option::of(prop::sample::select(vec!["Open", "Paid", "Overdue"])),
    );
    proptest::collection::vec(record, 0..40).prop_map(|records| {
        records
            .into_iter()
            .enumerate()
            .map(|(idx, (amount, name, status))| {
                Row::from(json!({"id": idx, "amount": amount, "name": name, "status": status}))
            })
            .collect()
    })
}

fn arb_predicate() -> impl Strategy<Value = FieldPredicate> {
    prop_oneof![
        prop::sample::select(vec!["", "a", "ALP", "brav", "x"])
            .prop_map(|text| FieldPredicate::substring("name", text)),
        prop::sample::select(vec!["all", "Open", "Paid", "Overdue", "Closed"])
            .prop_map(|value| FieldPredicate::exact("status", value)),
        (prop::sample::select(vec!["", "-2", "0"]), prop::sample::select(vec!["", "1", "3"]))
            .prop_map(|(from, to)| FieldPredicate::range("amount", SemanticType::Integer, from, to)),
        (-5i64..5).prop_map(|v| FieldPredicate::threshold("amount", Comparison::Gt, v as f64)),
        prop::sample::select(vec!["op", "a", "du"])
            .prop_map(|text| FieldPredicate::search(&["name", "status"], text)),
    ]
}

fn arb_sort() -> impl Strategy<Value = (&'static str, SemanticType, Direction)> {
    (
        prop::sample::select(vec![
            ("amount", SemanticType::Integer),
            ("name", SemanticType::Text),
            ("status", SemanticType::Enum),
        ]),
        prop::sample::select(vec![Direction::Ascending, Direction::Descending]),
    )
        .prop_map(|((field, semantic), direction)| (field, semantic, direction))
}

fn amount(row: &Row) -> Option<i64> {
    row.get("amount").and_then(Value::as_i64)
}

proptest! {
    #[test]
    fn filter_keeps_an_ordered_subset(rows in arb_rows(), predicates in proptest::collection::vec(arb_predicate(), 0..4)) {
        let out = filter::filter_rows(&rows, &predicates);
        let mut remaining = rows.iter();
        for row in out.iter() {
            prop_assert!(remaining.any(|r| r.ptr_eq(row)));
        }
    }

    #[test]
    fn filter_is_idempotent(rows in arb_rows(), predicates in proptest::collection::vec(arb_predicate(), 0..4)) {
        let once = filter::filter_rows(&rows, &predicates);
        let twice = filter::filter_rows(&once, &predicates);
        prop_assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn exact_filters_drop_missing_values(rows in arb_rows(), value in prop::sample::select(vec!["Open", "Paid", "Overdue"])) {
        let out = filter::filter_rows(&rows, &[FieldPredicate::exact("status", value)]);
        prop_assert!(out.iter().all(|r| r.get("status").and_then(Value::as_str) == Some(value)));
        let all = filter::filter_rows(&rows, &[FieldPredicate::exact("status", filter::ALL)]);
        prop_assert_eq!(all.len(), rows.len());
    }

    #[test]
    fn sort_is_a_permutation(rows in arb_rows(), (field, semantic, direction) in arb_sort()) {
        let out = sort::sort_rows(&rows, field, semantic, direction);
        prop_assert_eq!(out.len(), rows.len());
        let mut sorted_ids = ids(&out);
        sorted_ids.sort_unstable();
        prop_assert_eq!(sorted_ids, ids(&rows));
    }

    #[test]
    fn sort_is_stable(rows in arb_rows(), direction in prop::sample::select(vec![Direction::Ascending, Direction::Descending])) {
        let out = sort::sort_rows(&rows, "amount", SemanticType::Integer, direction);
        for pair in out.windows(2) {
            if amount(&pair[0]) == amount(&pair[1]) {
                prop_assert!(ids(&pair[..1])[0] < ids(&pair[1..])[0]);
            }
        }
    }

    #[test]
    fn nulls_sort_last(rows in arb_rows(), (field, semantic, direction) in arb_sort()) {
        let out = sort::sort_rows(&rows, field, semantic, direction);
        let first_null = out.iter().position(|r| r.get(field).is_none()).unwrap_or(out.len());
        prop_assert!(out[first_null..].iter().all(|r| r.get(field).is_none()));
    }

    #[test]
    fn directions_mirror_each_other(rows in arb_rows()) {
        let asc = sort::sort_rows(&rows, "amount", SemanticType::Integer, Direction::Ascending);
        let desc = sort::sort_rows(&rows, "amount", SemanticType::Integer, Direction::Descending);
        let mut asc_keys: Vec<i64> = asc.iter().filter_map(amount).collect();
        asc_keys.reverse();
        let desc_keys: Vec<i64> = desc.iter().filter_map(amount).collect();
        prop_assert_eq!(asc_keys, desc_keys);

        let nulls = rows.iter().filter(|r| amount(r).is_none()).count();
        prop_assert!(desc[desc.len() - nulls..].iter().all(|r| amount(r).is_none()));
    }
}
