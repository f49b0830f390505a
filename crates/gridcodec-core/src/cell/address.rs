//! A1-style cell references

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// Location of a cell within a worksheet.
///
/// Both indices are 0-based; the A1 form written to documents is 1-based
/// for rows and lettered for columns (`A`..`XFD`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    /// Row index (0-based)
    pub row: u32,
    /// Column index (0-based, A=0)
    pub col: u16,
}

impl CellAddress {
    /// Create an address from 0-based indices
    pub fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// Create an address from grid positions, checking sheet limits
    pub fn from_position(row: usize, col: usize) -> Result<Self> {
        let row = u32::try_from(row)
            .ok()
            .filter(|r| *r < MAX_ROWS)
            .ok_or(Error::RowOutOfBounds(row.min(u32::MAX as usize) as u32, MAX_ROWS - 1))?;
        let col = u16::try_from(col)
            .ok()
            .filter(|c| *c < MAX_COLS)
            .ok_or(Error::ColumnOutOfBounds(col.min(u16::MAX as usize) as u16, MAX_COLS - 1))?;
        Ok(Self { row, col })
    }

    /// Parse an A1-style reference. `$` markers are accepted and ignored.
    ///
    /// ```
    /// use gridcodec_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("C12").unwrap();
    /// assert_eq!((addr.row, addr.col), (11, 2));
    /// assert_eq!(CellAddress::parse("$C$12").unwrap(), addr);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidAddress("empty address".into()));
        }

        let stripped: String = s.chars().filter(|c| *c != '$').collect();
        let split = stripped
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(stripped.len());
        let (letters, digits) = stripped.split_at(split);

        if letters.is_empty() {
            return Err(Error::InvalidAddress(format!("no column letters in '{}'", s)));
        }
        if digits.is_empty() {
            return Err(Error::InvalidAddress(format!("no row number in '{}'", s)));
        }

        let col = Self::letters_to_column(letters)?;
        let row: u32 = digits
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("invalid row number in '{}'", s)))?;
        if row == 0 {
            return Err(Error::InvalidAddress(format!("row number must be >= 1 in '{}'", s)));
        }
        if row > MAX_ROWS {
            return Err(Error::RowOutOfBounds(row - 1, MAX_ROWS - 1));
        }

        Ok(Self { row: row - 1, col })
    }

    /// Convert a column index to letters (0 = A, 25 = Z, 26 = AA)
    pub fn column_to_letters(col: u16) -> String {
        let mut letters = Vec::with_capacity(3);
        let mut n = col as u32 + 1;
        while n > 0 {
            n -= 1;
            letters.push(b'A' + (n % 26) as u8);
            n /= 26;
        }
        letters.iter().rev().map(|b| *b as char).collect()
    }

    /// Convert column letters to an index (A = 0, case-insensitive)
    pub fn letters_to_column(letters: &str) -> Result<u16> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty column letters".into()));
        }

        let mut col: u32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::InvalidAddress(format!("invalid column letter '{}'", c)));
            }
            col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
            if col > MAX_COLS as u32 {
                return Err(Error::ColumnOutOfBounds(
                    col.min(u16::MAX as u32) as u16,
                    MAX_COLS - 1,
                ));
            }
        }

        Ok((col - 1) as u16)
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        self.to_string()
    }

    /// The `A1:B2` reference spanning `self` to `end`, or just `A1` when they match
    pub fn range_to(&self, end: CellAddress) -> String {
        if *self == end {
            self.to_string()
        } else {
            format!("{}:{}", self, end)
        }
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::column_to_letters(self.col), self.row + 1)
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_column_letters_round_trip() {
        assert_eq!(CellAddress::column_to_letters(0), "A");
        assert_eq!(CellAddress::column_to_letters(25), "Z");
        assert_eq!(CellAddress::column_to_letters(26), "AA");
        assert_eq!(CellAddress::column_to_letters(701), "ZZ");
        assert_eq!(CellAddress::column_to_letters(16383), "XFD");

        assert_eq!(CellAddress::letters_to_column("g").unwrap(), 6);
        assert_eq!(CellAddress::letters_to_column("AAA").unwrap(), 702);
        assert_eq!(CellAddress::letters_to_column("XFD").unwrap(), 16383);
    }

    #[test]
    fn test_parse() {
        assert_eq!(CellAddress::parse("A1").unwrap(), CellAddress::new(0, 0));
        assert_eq!(CellAddress::parse("g4").unwrap(), CellAddress::new(3, 6));
        assert_eq!(CellAddress::parse("$B$2").unwrap(), CellAddress::new(1, 1));
        assert_eq!(
            CellAddress::parse("XFD1048576").unwrap(),
            CellAddress::new(1_048_575, 16383)
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(CellAddress::parse("").is_err());
        assert!(CellAddress::parse("A").is_err());
        assert!(CellAddress::parse("12").is_err());
        assert!(CellAddress::parse("A0").is_err());
        assert!(CellAddress::parse("A1B").is_err());
        assert!(matches!(
            CellAddress::parse("A1048577"),
            Err(Error::RowOutOfBounds(..))
        ));
        assert!(matches!(
            CellAddress::parse("XFE1"),
            Err(Error::ColumnOutOfBounds(..))
        ));
    }

    #[test]
    fn test_from_position_limits() {
        assert_eq!(
            CellAddress::from_position(2, 3).unwrap().to_string(),
            "D3"
        );
        assert!(CellAddress::from_position(MAX_ROWS as usize, 0).is_err());
        assert!(CellAddress::from_position(0, MAX_COLS as usize).is_err());
    }

    #[test]
    fn test_range_to() {
        let a1 = CellAddress::new(0, 0);
        assert_eq!(a1.range_to(a1), "A1");
        assert_eq!(a1.range_to(CellAddress::new(9, 6)), "A1:G10");
    }
}
