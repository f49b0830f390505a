//! Serial day numbers <-> date-times
//!
//! Spreadsheets store dates as a count of days since an epoch, with the
//! time of day as the fractional part. Two epochs exist: the default
//! (1899-12-30, which absorbs the 1900 leap-year bug for every date after
//! 1900-03-01) and the 1904 system used by old Mac workbooks.
//!
//! Negative serials follow the OLE automation convention: the integer part
//! counts days backwards while the fraction is still a forward time of day,
//! so `-1.25` is 1899-12-29 06:00.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Days between the 1900-system epoch and the 1904-system epoch
const EPOCH_1904_OFFSET: f64 = 1462.0;

/// Smallest serial accepted in the 1900 system (0100-01-01)
const MIN_SERIAL_1900: f64 = -657_435.0;

/// Upper bound (exclusive) in the 1900 system (9999-12-31 24:00)
const MAX_SERIAL_1900: f64 = 2_958_466.0;

/// Which epoch a document counts serial days from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DateSystem {
    /// Epoch 1899-12-30
    #[default]
    Excel1900,
    /// Epoch 1904-01-01 (`<workbookPr date1904="1"/>`)
    Excel1904,
}

impl DateSystem {
    /// Select the system from the workbook's `date1904` flag
    pub fn from_date1904(date1904: bool) -> Self {
        if date1904 {
            DateSystem::Excel1904
        } else {
            DateSystem::Excel1900
        }
    }

    /// The date-time that serial 0 stands for; also the decode fallback value
    pub fn epoch(self) -> NaiveDateTime {
        let date = match self {
            DateSystem::Excel1900 => NaiveDate::from_ymd_opt(1899, 12, 30),
            DateSystem::Excel1904 => NaiveDate::from_ymd_opt(1904, 1, 1),
        }
        .unwrap_or_default();
        date.and_time(NaiveTime::MIN)
    }

    fn serial_range(self) -> (f64, f64) {
        match self {
            DateSystem::Excel1900 => (MIN_SERIAL_1900, MAX_SERIAL_1900),
            DateSystem::Excel1904 => (
                MIN_SERIAL_1900 - EPOCH_1904_OFFSET,
                MAX_SERIAL_1900 - EPOCH_1904_OFFSET,
            ),
        }
    }

    /// Convert a serial day number to a date-time, rounded to the millisecond.
    ///
    /// Returns `None` for non-finite values and for serials outside the
    /// representable range (years 100 through 9999).
    pub fn from_serial(self, serial: f64) -> Option<NaiveDateTime> {
        let (min, max) = self.serial_range();
        if !serial.is_finite() || serial <= min || serial >= max {
            return None;
        }

        let rounding = if serial >= 0.0 { 0.5 } else { -0.5 };
        let mut millis = (serial * MILLIS_PER_DAY as f64 + rounding) as i64;
        if millis < 0 {
            millis -= (millis % MILLIS_PER_DAY) * 2;
        }

        self.epoch()
            .checked_add_signed(Duration::milliseconds(millis))
    }

    /// Convert a date-time to a serial day number (millisecond precision)
    pub fn to_serial(self, value: NaiveDateTime) -> f64 {
        let mut millis = (value - self.epoch()).num_milliseconds();
        if millis < 0 {
            let frac = millis % MILLIS_PER_DAY;
            if frac != 0 {
                millis -= (MILLIS_PER_DAY + frac) * 2;
            }
        }
        millis as f64 / MILLIS_PER_DAY as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_time(NaiveTime::MIN)
    }

    #[test]
    fn test_known_serials_1900() {
        let sys = DateSystem::Excel1900;
        assert_eq!(sys.from_serial(44197.0), Some(date(2021, 1, 1)));
        assert_eq!(sys.from_serial(1.0), Some(date(1899, 12, 31)));
        assert_eq!(sys.from_serial(61.0), Some(date(1900, 3, 1)));
        assert_eq!(sys.to_serial(date(2021, 1, 1)), 44197.0);
    }

    #[test]
    fn test_time_fraction() {
        let sys = DateSystem::Excel1900;
        let noon = date(2021, 1, 1) + Duration::hours(12);
        assert_eq!(sys.from_serial(44197.5), Some(noon));
        assert_eq!(sys.to_serial(noon), 44197.5);

        // rounds to the nearest millisecond
        let almost = sys.from_serial(44197.0 + 0.4 / MILLIS_PER_DAY as f64);
        assert_eq!(almost, Some(date(2021, 1, 1)));
    }

    #[test]
    fn test_negative_serials() {
        let sys = DateSystem::Excel1900;
        let expected = date(1899, 12, 29) + Duration::hours(6);
        assert_eq!(sys.from_serial(-1.25), Some(expected));
        assert_eq!(sys.to_serial(expected), -1.25);
    }

    #[test]
    fn test_1904_system() {
        let sys = DateSystem::Excel1904;
        assert_eq!(sys.epoch(), date(1904, 1, 1));
        assert_eq!(sys.from_serial(0.0), Some(date(1904, 1, 1)));
        assert_eq!(sys.from_serial(44197.0 - 1462.0), Some(date(2021, 1, 1)));
        assert_eq!(DateSystem::from_date1904(true), sys);
    }

    #[test]
    fn test_out_of_range() {
        let sys = DateSystem::Excel1900;
        assert_eq!(sys.from_serial(f64::NAN), None);
        assert_eq!(sys.from_serial(f64::INFINITY), None);
        assert_eq!(sys.from_serial(2_958_466.0), None);
        assert_eq!(sys.from_serial(-657_435.0), None);
        assert!(sys.from_serial(2_958_465.999).is_some());
    }
}
