use lazy_regex::regex_find;

/// Output label of the column holding security identifiers.
pub const IDENTIFIER_COLUMN: &str = "isin";

/// Locates an ISIN within `raw`.
///
/// Characters around the ISIN are dropped with a warning. Returns `None`
/// when `raw` holds no ISIN.
pub fn normalize_isin(raw: &str) -> Option<&str> {
    let isin = find_isin(raw)?;
    if isin != raw.trim() {
        log::warn!("Stripped extra characters around ISIN {isin} in {raw:?}");
    }
    Some(isin)
}

/// As [normalize_isin], without logging.
pub fn find_isin(raw: &str) -> Option<&str> {
    regex_find!(r"[A-Z]{2}[A-Z0-9]{10}", raw)
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use test_casing::{TestCases, cases, test_casing};

    use super::*;

    const NORMALIZE_CASES: TestCases<(&str, Option<&str>)> = cases! {
        [
            ("CH0012032048", Some("CH0012032048")),
            ("  CH0012032048 ", Some("CH0012032048")),
            ("ISIN: US0378331005", Some("US0378331005")),
            ("IE00B4L5Y983 (acc)", Some("IE00B4L5Y983")),
            ("XS999", None),
            ("ch0012032048", None),
            ("", None),
        ]
    };

    #[test]
    fn normalize_cases_count() {
        assert_eq!(NORMALIZE_CASES.into_iter().count(), 7);
    }

    #[test_casing(7, NORMALIZE_CASES)]
    fn normalizes(raw: &str, expected: Option<&str>) {
        assert_that!(normalize_isin(raw), eq(expected));
    }
}
