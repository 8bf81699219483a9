
use crate::cell::Cell;

/// Separators used to write numbers in the source documents.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NumberFormat {
    pub thousand_sep: Option<char>,
    pub decimal_sep: Option<char>,
}

impl NumberFormat {
    pub fn new(thousand_sep: Option<char>, decimal_sep: Option<char>) -> Self {
        Self {
            thousand_sep,
            decimal_sep,
        }
    }

    /// Parses `text` as a number written with this format.
    ///
    /// The integer part is either plain digits or digits grouped in threes
    /// by the thousand separator (`1'234'567`). Anything after the last
    /// decimal separator must be digits. Without a decimal separator, `.`
    /// is the decimal point. Returns `None` when the text is not a number,
    /// so dates such as `31.12.2024` stay text.
    pub fn parse(&self, text: &str) -> Option<Cell> {
        let text = text.trim();
        let (sign, unsigned) = match text.strip_prefix(['+', '-']) {
            Some(rest) => (&text[..1], rest),
            None => ("", text),
        };

        let decimal_sep = self.decimal_sep.unwrap_or('.');
        let (integer, fraction) = match unsigned.rsplit_once(decimal_sep) {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (unsigned, None),
        };

        let integer_digits = self.integer_digits(integer)?;
        let mut normalized = format!("{sign}{integer_digits}");
        match fraction {
            Some(fraction) => {
                if !fraction.bytes().all(|b| b.is_ascii_digit())
                    || (integer_digits.is_empty() && fraction.is_empty())
                {
                    return None;
                }
                normalized.push('.');
                normalized.push_str(fraction);
                normalized.parse::<f64>().ok().map(Cell::Decimal)
            }
            None => {
                if integer_digits.is_empty() {
                    return None;
                }
                match normalized.parse::<i64>() {
                    Ok(value) => Some(Cell::Integer(value)),
                    Err(_) => normalized.parse::<f64>().ok().map(Cell::Decimal),
                }
            }
        }
    }

    /// Returns the digits of `integer`, which must be plain digits or
    /// well-formed groups of three separated by the thousand separator.
    fn integer_digits(&self, integer: &str) -> Option<String> {
        if integer.bytes().all(|b| b.is_ascii_digit()) {
            return Some(integer.to_owned());
        }

        let thousand_sep = self.thousand_sep?;
        let mut groups = integer.split(thousand_sep);
        let leading = groups.next()?;
        if !(1..=3).contains(&leading.len()) || !leading.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let mut digits = leading.to_owned();
        for group in groups {
            if group.len() != 3 || !group.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            digits.push_str(group);
        }
        Some(digits)
    }

    /// Converts a text cell holding a number into a numeric cell. Any other
    /// cell is returned unchanged.
    pub fn normalize(&self, cell: Cell) -> Cell {
        match cell {
            Cell::Text(text) => match self.parse(&text) {
                Some(number) => number,
                None => {
                    log::debug!("Keeping non-numeric cell {text:?} as text");
                    Cell::Text(text)
                }
            },
            other => other,
        }
    }
}
