//! Date parsing and age arithmetic for date-sanity checks

use chrono::{Datelike, NaiveDate};

/// Earliest year accepted from a document. chrono's `%Y` takes any number of
/// digits, so a two-digit year like `27` would otherwise parse as 27 AD.
const MIN_YEAR: i32 = 1000;

/// Parse a date value against each accepted format in turn
pub fn parse_date<S: AsRef<str>>(value: &str, formats: &[S]) -> Option<NaiveDate> {
    let value = value.trim();
    formats
        .iter()
        .filter_map(|format| NaiveDate::parse_from_str(value, format.as_ref()).ok())
        .find(|date| date.year() >= MIN_YEAR)
}

/// Whole years elapsed between `birth` and `today`.
///
/// The count only goes up on the birthday itself; a birth date later than
/// `today` gives a negative age.
pub fn age_in_years(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    years
}
