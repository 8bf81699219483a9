use googletest::prelude::*;

use super::*;

fn table(labels: &[&str], rows: &[&[&str]]) -> ProjectedTable {
    let mut table = Dataset::new(labels.iter().collect());
    for row in rows {
        table.push_row(row.iter().map(|&cell| Cell::from(cell)).collect());
    }
    table
}

fn labels(dataset: &Dataset) -> Vec<&str> {
    dataset.labels().iter().map(String::as_str).collect()
}

#[gtest]
fn test_combine_unions_columns_in_first_seen_order() {
    let combined = combine([
        table(&["isin", "qty"], &[&["XS1", "1"]]),
        table(&["value", "isin"], &[&["9.5", "XS2"]]),
    ]);

    expect_eq!(labels(&combined), vec!["isin", "qty", "value"]);
    expect_eq!(
        combined.rows(),
        &[
            vec![Cell::from("XS1"), Cell::from("1"), Cell::Absent],
            vec![Cell::from("XS2"), Cell::Absent, Cell::from("9.5")],
        ][..]
    );
}

#[gtest]
fn test_combine_keeps_duplicate_rows_in_order() {
    let combined = combine([
        table(&["isin"], &[&["XS1"], &["XS2"]]),
        table(&["isin"], &[&["XS1"]]),
    ]);

    expect_eq!(
        combined.column("isin"),
        Some(vec![&Cell::from("XS1"), &Cell::from("XS2"), &Cell::from("XS1")])
    );
}

#[gtest]
fn test_combine_zero_width_tables_contribute_absent_rows() {
    let combined = combine([
        Dataset::zero_width(2),
        table(&["isin"], &[&["XS1"]]),
        Dataset::zero_width(0),
    ]);

    expect_eq!(labels(&combined), vec!["isin"]);
    expect_eq!(
        combined.rows(),
        &[
            vec![Cell::Absent],
            vec![Cell::Absent],
            vec![Cell::from("XS1")],
        ][..]
    );
}

#[gtest]
fn test_combine_only_zero_width_tables_keeps_row_count() {
    let combined = combine([Dataset::zero_width(2), Dataset::zero_width(1)]);

    expect_true!(combined.labels().is_empty());
    expect_eq!(combined.num_rows(), 3);
}

#[gtest]
fn test_combine_nothing_is_empty() {
    let combined = combine(Vec::new());

    expect_true!(combined.labels().is_empty());
    expect_eq!(combined.num_rows(), 0);
}

#[gtest]
fn test_combine_columns_grow_monotonically() {
    let a = || vec![table(&["b", "a"], &[&["1", "2"]])];
    let b = table(&["c", "a"], &[&["3", "4"]]);

    let combined_a = combine(a());
    let mut a_and_b = a();
    a_and_b.push(b);
    let combined_ab = combine(a_and_b);

    for label in combined_a.labels() {
        expect_true!(combined_ab.columns().contains(label));
    }
    expect_eq!(labels(&combined_ab), vec!["b", "a", "c"]);
}
