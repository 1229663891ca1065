//! Julian day number <-> Gregorian calendar conversion.
//!
//! Integer arithmetic throughout (truncating division), valid for every
//! non-negative Julian day number. Day numbers carry the astronomical
//! convention that `.0` is noon, so a fractional day number belongs to the
//! civil date of `floor(day_number + 0.5)`.

use serde::{Deserialize, Serialize};

/// A proleptic Gregorian calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDate {
    pub year: i64,
    pub month: u32,
    pub day: u32,
}

impl CalendarDate {
    pub fn new(year: i64, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }
}

/// Convert an integer Julian day number to a calendar date.
///
/// First step splits the day count into 400-year cycles and years counted
/// from March; second step splits the remainder into months and days. Months
/// come out March-based, so anything past 12 rolls into the next year.
pub fn julian_to_gregorian(jd: i64) -> CalendarDate {
    let l = jd + 68569;
    let n = 4 * l / 146097;
    let l = l - (146097 * n + 3) / 4;
    let i = 4000 * (l + 1) / 1461001;
    let l = l - 1461 * i / 4 + 31;

    let j = 80 * l / 2447;
    let day = l - 2447 * j / 80;
    let mut month = j + 2;
    let mut year = 100 * (n - 49) + i;
    if month > 12 {
        month -= 12;
        year += 1;
    }

    CalendarDate::new(year, month as u32, day as u32)
}

/// Convert a calendar date back to its integer Julian day number.
pub fn gregorian_to_julian(date: CalendarDate) -> i64 {
    let y = date.year;
    let m = date.month as i64;
    let d = date.day as i64;
    let a = (m - 14) / 12;
    (1461 * (y + 4800 + a)) / 4 + (367 * (m - 2 - 12 * a)) / 12
        - (3 * ((y + 4900 + a) / 100)) / 4
        + d
        - 32075
}

/// Calendar date of a (possibly fractional) day number.
pub fn day_number_to_date(day_number: f64) -> CalendarDate {
    julian_to_gregorian((day_number + 0.5).floor() as i64)
}
