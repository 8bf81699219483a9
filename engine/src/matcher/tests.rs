use googletest::prelude::*;
use test_casing::{TestCases, cases, test_casing};

use super::*;
use crate::{spec, table::Row};

const SPEC_YAML: &str = "
positions:
  isin: ISIN
  qty: Quantity
valuation:
  isin: ISIN
  value: Market Value
layout:
  - Pos.
";

fn load_spec() -> Specification {
    spec::load_str(SPEC_YAML).expect("test specification must be valid")
}

fn section_names<'s>(result: &MatchResult<'s>) -> Vec<&'s str> {
    result.sections.iter().map(|section| section.name()).collect()
}

#[derive(Debug)]
struct MatchCase {
    header: &'static [&'static str],
    expect_sections: &'static [&'static str],
}

const MATCH_CASES: TestCases<MatchCase> = cases! {
    [
        // Extra headers are ignored.
        MatchCase {
            header: &["Quantity", "ISIN", "Extra"],
            expect_sections: &["positions"],
        },
        // Header order does not matter.
        MatchCase {
            header: &["ISIN", "Extra", "Quantity"],
            expect_sections: &["positions"],
        },
        // Several sections at once.
        MatchCase {
            header: &["Market Value", "Quantity", "ISIN"],
            expect_sections: &["positions", "valuation"],
        },
        // A filter section alone.
        MatchCase {
            header: &["Pos.", "Description"],
            expect_sections: &["layout"],
        },
        // Partial coverage of a section does not qualify.
        MatchCase {
            header: &["ISIN", "Description"],
            expect_sections: &[],
        },
        // Matching is case sensitive.
        MatchCase {
            header: &["isin", "quantity"],
            expect_sections: &[],
        },
        // No whitespace normalisation.
        MatchCase {
            header: &["ISIN ", "Quantity"],
            expect_sections: &[],
        },
    ]
};

#[test]
fn test_match_cases_count() {
    assert_eq!(7, MATCH_CASES.into_iter().count());
}

#[test_casing(7, MATCH_CASES)]
fn test_match_table(test_case: MatchCase) {
    let spec = load_spec();
    let table = RawTable::new(test_case.header.to_vec(), Vec::<Row>::new());

    let result = match_table(&table, &spec);

    assert_that!(section_names(&result), eq(&test_case.expect_sections.to_vec()));
    assert_that!(result.qualifies(), eq(!test_case.expect_sections.is_empty()));
}

#[gtest]
fn test_present_labels_are_union_across_sections() {
    let spec = load_spec();
    let table = RawTable::new(["ISIN", "Pos.", "Other"], Vec::<Row>::new());

    let result = match_table(&table, &spec);

    expect_eq!(
        result.present_labels.iter().copied().collect::<Vec<_>>(),
        vec!["ISIN", "Pos."]
    );
    expect_eq!(section_names(&result), vec!["layout"]);
}

#[gtest]
fn test_match_ignores_rows() {
    let spec = load_spec();
    let empty = RawTable::new(["ISIN", "Quantity"], Vec::<Row>::new());
    let filled = RawTable::new(
        ["ISIN", "Quantity"],
        [["CH0012345678", "10"], ["Pos.", "Quantity"]],
    );

    expect_eq!(match_table(&empty, &spec), match_table(&filled, &spec));
}
