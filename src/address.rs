//! Column letters, A1 addresses and reading order.
//!
//! Spreadsheet columns are numbered in *bijective base-26*: the digits are
//! `A`=1 through `Z`=26 and there is no zero digit, so `Z` is followed by
//! `AA` instead of wrapping. [`letter_to_number`] and [`number_to_letter`]
//! convert between the two forms and are exact inverses for every index ≥ 1.
//!
//! [`CellAddress`] holds a 1-based column and a 0-based row. Its A1 form shows
//! the row 1-based, so column 1 / row 0 displays as `A1`.
//!
//! ## Reading Order
//!
//! Grids are walked column by column: lower column index first, then lower
//! row. This is the derived [`Ord`] of [`CellAddress`], and
//! [`cmp_reading_order`] applies the same order to A1 strings. Letters are
//! compared by their numeric value, never as text:
//!
//! ```rust
//! use serde_grid::address::sort_reading_order;
//!
//! let mut cells = vec!["B1", "A2", "A1", "Z1", "AA1"];
//! sort_reading_order(&mut cells).unwrap();
//! assert_eq!(cells, vec!["A1", "A2", "B1", "Z1", "AA1"]);
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Interprets `letters` as a bijective base-26 column number.
///
/// Lower-case letters are accepted.
///
/// # Examples
///
/// ```rust
/// use serde_grid::address::letter_to_number;
///
/// assert_eq!(letter_to_number("A").unwrap(), 1);
/// assert_eq!(letter_to_number("Z").unwrap(), 26);
/// assert_eq!(letter_to_number("AA").unwrap(), 27);
/// assert_eq!(letter_to_number("xfd").unwrap(), 16384);
/// ```
///
/// # Errors
///
/// Returns [`Error::MalformedAddress`] for an empty string, a non-letter, or
/// a column number that overflows `u32`.
pub fn letter_to_number(letters: &str) -> Result<u32> {
    if letters.is_empty() {
        return Err(Error::malformed_address(letters));
    }

    let mut number: u32 = 0;
    for byte in letters.bytes() {
        if !byte.is_ascii_alphabetic() {
            return Err(Error::malformed_address(letters));
        }
        let digit = u32::from(byte.to_ascii_uppercase() - b'A' + 1);
        number = number
            .checked_mul(26)
            .and_then(|n| n.checked_add(digit))
            .ok_or_else(|| Error::malformed_address(letters))?;
    }
    Ok(number)
}

/// Renders a 1-based column number as letters.
///
/// # Examples
///
/// ```rust
/// use serde_grid::address::number_to_letter;
///
/// assert_eq!(number_to_letter(1).unwrap(), "A");
/// assert_eq!(number_to_letter(26).unwrap(), "Z");
/// assert_eq!(number_to_letter(27).unwrap(), "AA");
/// assert_eq!(number_to_letter(53).unwrap(), "BA");
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidColumnIndex`] for `0`.
pub fn number_to_letter(number: u32) -> Result<String> {
    if number == 0 {
        return Err(Error::InvalidColumnIndex(number));
    }
    let mut letters = String::new();
    push_letters(&mut letters, number);
    Ok(letters)
}

// `number` must be >= 1.
fn push_letters(out: &mut String, number: u32) {
    if number > 26 {
        push_letters(out, (number - 1) / 26);
    }
    out.push(char::from(b'A' + ((number - 1) % 26) as u8));
}

/// Splits an A1 string into its letter run and its row number as written.
///
/// # Examples
///
/// ```rust
/// use serde_grid::address::parse_address;
///
/// assert_eq!(parse_address("AB12").unwrap(), ("AB", 12));
/// assert!(parse_address("12").is_err());
/// assert!(parse_address("AB").is_err());
/// ```
///
/// # Errors
///
/// Returns [`Error::MalformedAddress`] if either run is empty, the string
/// holds anything else, or the row does not fit `u32`.
pub fn parse_address(s: &str) -> Result<(&str, u32)> {
    let split = s
        .bytes()
        .position(|b| !b.is_ascii_alphabetic())
        .unwrap_or(s.len());
    let (letters, digits) = s.split_at(split);

    if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::malformed_address(s));
    }

    let row = digits.parse().map_err(|_| Error::malformed_address(s))?;
    Ok((letters, row))
}

/// Decodes an A1 string into its `(column, row)` sort key.
fn reading_key(s: &str) -> Result<(u32, u32)> {
    let (letters, row) = parse_address(s)?;
    Ok((letter_to_number(letters)?, row))
}

/// Compares two A1 strings in reading order.
///
/// Columns compare by their decoded number and rows break ties, so `"Z1"`
/// sorts before `"AA1"` and letter case never matters.
///
/// # Errors
///
/// Returns [`Error::MalformedAddress`] if either address cannot be parsed.
pub fn cmp_reading_order(a: &str, b: &str) -> Result<Ordering> {
    Ok(reading_key(a)?.cmp(&reading_key(b)?))
}

/// Sorts A1 strings in reading order.
///
/// Every entry is parsed once up front. The sort is stable.
///
/// # Errors
///
/// Returns [`Error::MalformedAddress`] for the first entry that cannot be
/// parsed; the slice is left unchanged in that case.
pub fn sort_reading_order<S: AsRef<str>>(addresses: &mut [S]) -> Result<()> {
    let mut keyed = addresses
        .iter()
        .enumerate()
        .map(|(index, address)| Ok((reading_key(address.as_ref())?, index)))
        .collect::<Result<Vec<_>>>()?;
    keyed.sort_by_key(|&(key, _)| key);

    // Position `i` takes the entry originally at `order[i]`. Sources below `i`
    // were already swapped away, so follow the chain to where they went.
    let order: Vec<usize> = keyed.into_iter().map(|(_, index)| index).collect();
    for i in 0..order.len() {
        let mut source = order[i];
        while source < i {
            source = order[source];
        }
        addresses.swap(i, source);
    }
    Ok(())
}

/// A cell position: 1-based column, 0-based row.
///
/// Fields are declared column first so that the derived ordering is the
/// reading order used to walk a grid.
///
/// # Examples
///
/// ```rust
/// use serde_grid::CellAddress;
///
/// let addr: CellAddress = "AB12".parse().unwrap();
/// assert_eq!(addr.column, 28);
/// assert_eq!(addr.row, 11);
/// assert_eq!(addr.to_string(), "AB12");
///
/// assert!(CellAddress::new(26, 0) < CellAddress::new(27, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellAddress {
    pub column: u32,
    pub row: u32,
}

impl CellAddress {
    #[inline]
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        CellAddress { column, row }
    }

    /// Parses an A1 string such as `"C7"`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedAddress`] for unparseable input, including
    /// row `0` which has no 0-based equivalent.
    pub fn parse(s: &str) -> Result<Self> {
        let (letters, row) = parse_address(s)?;
        let column = letter_to_number(letters)?;
        let row = row.checked_sub(1).ok_or_else(|| Error::malformed_address(s))?;
        Ok(CellAddress { column, row })
    }

    /// The address `offset` columns to the right on the same row.
    #[inline]
    #[must_use]
    pub const fn right(self, offset: u32) -> Self {
        CellAddress {
            column: self.column + offset,
            row: self.row,
        }
    }

    /// The column as letters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColumnIndex`] when the column is `0`.
    pub fn column_letters(&self) -> Result<String> {
        number_to_letter(self.column)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match number_to_letter(self.column) {
            Ok(letters) => write!(f, "{}{}", letters, u64::from(self.row) + 1),
            Err(_) => write!(f, "?{}", u64::from(self.row) + 1),
        }
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        CellAddress::parse(s)
    }
}

impl Serialize for CellAddress {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CellAddress {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        CellAddress::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_and_numbers_are_inverse() {
        for letters in ["A", "Z", "AA", "AZ", "BA"] {
            let number = letter_to_number(letters).unwrap();
            assert_eq!(number_to_letter(number).unwrap(), letters);
        }
        for number in [1, 26, 27, 52, 53] {
            let letters = number_to_letter(number).unwrap();
            assert_eq!(letter_to_number(&letters).unwrap(), number);
        }
    }

    #[test]
    fn test_bijective_boundaries() {
        assert_eq!(letter_to_number("AZ").unwrap(), 52);
        assert_eq!(letter_to_number("ZZ").unwrap(), 702);
        assert_eq!(number_to_letter(702).unwrap(), "ZZ");
        assert_eq!(number_to_letter(703).unwrap(), "AAA");
        for number in 1..=2000 {
            let letters = number_to_letter(number).unwrap();
            assert_eq!(letter_to_number(&letters).unwrap(), number);
        }
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            number_to_letter(0),
            Err(Error::InvalidColumnIndex(0))
        ));
        assert!(matches!(
            letter_to_number(""),
            Err(Error::MalformedAddress(_))
        ));
        assert!(matches!(
            letter_to_number("A1"),
            Err(Error::MalformedAddress(_))
        ));
        assert!(letter_to_number("ZZZZZZZZZZ").is_err());
    }

    #[test]
    fn test_parse_address() {
        assert_eq!(parse_address("A1").unwrap(), ("A", 1));
        assert_eq!(parse_address("XFD1048576").unwrap(), ("XFD", 1048576));
        for bad in ["", "A", "1", "1A", "A1B", "A-1", "$A$1"] {
            assert!(parse_address(bad).is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn test_cell_address_display_roundtrip() {
        let addr = CellAddress::new(1, 0);
        assert_eq!(addr.to_string(), "A1");
        assert_eq!("A1".parse::<CellAddress>().unwrap(), addr);
        assert!(CellAddress::parse("A0").is_err());
        assert_eq!(addr.right(2), CellAddress::new(3, 0));
        assert_eq!(CellAddress::new(28, 4).column_letters().unwrap(), "AB");
    }

    #[test]
    fn test_reading_order() {
        let mut cells = vec!["B1", "A2", "A1", "Z1", "AA1"];
        sort_reading_order(&mut cells).unwrap();
        assert_eq!(cells, vec!["A1", "A2", "B1", "Z1", "AA1"]);

        assert_eq!(cmp_reading_order("A10", "A9").unwrap(), Ordering::Greater);
        assert_eq!(cmp_reading_order("Z100", "AA1").unwrap(), Ordering::Less);
        assert!(cmp_reading_order("A1", "oops").is_err());
    }

    #[test]
    fn test_reading_order_matches_address_ord() {
        let mut parsed: Vec<CellAddress> = ["B1", "A2", "A1", "Z1", "AA1"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        parsed.sort();
        let rendered: Vec<String> = parsed.iter().map(|a| a.to_string()).collect();
        assert_eq!(rendered, vec!["A1", "A2", "B1", "Z1", "AA1"]);
    }

    #[test]
    fn test_sort_rejects_malformed_entries() {
        let mut cells = vec!["B1", "nope"];
        assert!(sort_reading_order(&mut cells).is_err());
        assert_eq!(cells, vec!["B1", "nope"]);
    }

    #[test]
    fn test_reading_order_ignores_letter_case() {
        assert_eq!(cmp_reading_order("a2", "A1").unwrap(), Ordering::Greater);
        assert_eq!(cmp_reading_order("a2", "A2").unwrap(), Ordering::Equal);
        assert_eq!(cmp_reading_order("A1", "a2").unwrap(), Ordering::Less);
        assert_eq!(cmp_reading_order("z9", "AA1").unwrap(), Ordering::Less);

        let mut cells = vec!["b1", "A3", "a2", "AA1", "A1", "z1", "B2"];
        sort_reading_order(&mut cells).unwrap();
        assert_eq!(cells, vec!["A1", "a2", "A3", "b1", "B2", "z1", "AA1"]);
    }

    #[test]
    fn test_sort_agrees_with_address_ord() {
        let mut cells: Vec<String> = Vec::new();
        for column in [1u32, 2, 26, 27, 28, 52, 703] {
            for row in [1u32, 2, 9, 10, 100] {
                let letters = number_to_letter(column).unwrap();
                let letters = if (column + row) % 2 == 0 {
                    letters.to_ascii_lowercase()
                } else {
                    letters
                };
                cells.push(format!("{letters}{row}"));
            }
        }
        cells.reverse();
        sort_reading_order(&mut cells).unwrap();

        let parsed: Vec<CellAddress> = cells.iter().map(|s| s.parse().unwrap()).collect();
        assert!(parsed.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(parsed.len(), 35);
    }
}
