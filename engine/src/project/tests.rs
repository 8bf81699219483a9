use googletest::prelude::*;

use super::*;
use crate::{matcher::match_table, spec, table::Row};

fn text_row(cells: &[&str]) -> Vec<Cell> {
    cells.iter().map(|&cell| Cell::from(cell)).collect()
}

fn first_section(yaml: &str) -> Section {
    spec::load_str(yaml).expect("test specification must be valid").sections()[0].clone()
}

#[gtest]
fn test_project_renames_and_reorders() {
    let section = first_section("sec1:\n  isin: ISIN\n  qty: Quantity\n");
    let table = RawTable::new(["Quantity", "ISIN", "Extra"], [["100", "XS123", "ignored"]]);

    let projected = project(&table, &section);

    expect_eq!(projected.labels(), &["isin".to_string(), "qty".to_string()][..]);
    expect_eq!(projected.rows(), &[text_row(&["XS123", "100"])][..]);
}

#[gtest]
fn test_project_skips_entries_without_source() {
    let section = first_section("sec1:\n  isin: ISIN\n  note:\n  qty: Quantity\n");
    let table = RawTable::new(["ISIN", "Quantity"], [["XS123", "5"]]);

    let projected = project(&table, &section);

    expect_eq!(projected.labels(), &["isin".to_string(), "qty".to_string()][..]);
}

#[gtest]
fn test_project_output_independent_of_source_column_order() {
    let section = first_section("sec1:\n  isin: ISIN\n  qty: Quantity\n");
    let table_a = RawTable::new(["ISIN", "Quantity"], [["XS1", "1"], ["XS2", "2"]]);
    let table_b = RawTable::new(["Quantity", "ISIN"], [["1", "XS1"], ["2", "XS2"]]);

    expect_eq!(project(&table_a, &section), project(&table_b, &section));
}

#[gtest]
fn test_project_filter_section_keeps_row_count() {
    let section = first_section("sec1: [Foo, Bar]\n");
    let table = RawTable::new(["Foo", "Bar", "Baz"], [["1", "2", "3"], ["4", "5", "6"]]);

    let projected = project(&table, &section);

    expect_true!(projected.labels().is_empty());
    expect_eq!(projected.num_rows(), 2);
    expect_true!(projected.rows()[0].is_empty());
}

#[gtest]
fn test_project_short_row_is_absent() {
    let section = first_section("sec1:\n  a: A\n  b: B\n");
    let table = RawTable::new(["A", "B"], [vec!["only-a"]]);

    let projected = project(&table, &section);

    expect_eq!(
        projected.rows(),
        &[vec![Cell::from("only-a"), Cell::Absent]][..]
    );
}

#[gtest]
fn test_project_duplicate_header_uses_first_occurrence() {
    let section = first_section("sec1:\n  amount: Amount\n");
    let table = RawTable::new(["Amount", "Amount"], [["first", "second"]]);

    let projected = project(&table, &section);

    expect_eq!(projected.rows(), &[text_row(&["first"])][..]);
}

#[gtest]
fn test_project_matches_joins_sections() {
    let spec = spec::load_str(
        "
positions:
  isin: ISIN
  qty: Quantity
valuation:
  value: Market Value
  isin: ISIN
layout: [Pos.]
",
    )
    .expect("test specification must be valid");
    let table = RawTable::new(
        ["Pos.", "Market Value", "ISIN", "Quantity"],
        [["1", "10.5", "XS1", "3"], ["2", "20.0", "XS2", "4"]],
    );

    let matched = match_table(&table, &spec);
    let projected = project_matches(&table, &matched).expect("table must qualify");

    expect_eq!(
        projected.labels(),
        &[
            "isin".to_string(),
            "qty".to_string(),
            "value".to_string()
        ][..]
    );
    expect_eq!(
        projected.rows(),
        &[
            text_row(&["XS1", "3", "10.5"]),
            text_row(&["XS2", "4", "20.0"]),
        ][..]
    );
}

#[gtest]
fn test_project_matches_none_when_unqualified() {
    let spec = spec::load_str("sec1: [Foo]\n").expect("test specification must be valid");
    let table = RawTable::new(["Bar"], Vec::<Row>::new());

    let matched = match_table(&table, &spec);

    expect_eq!(project_matches(&table, &matched), None);
}
