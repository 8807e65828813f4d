//! Serial-date conversion and text date recognition.

use crate::datamodel::DateSystem;
use crate::error::SerialDateError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

/// Largest serial a workbook can hold (9999-12-31 in Excel).
pub const MAX_SERIAL_DATE: f64 = 2_958_465.0;

/// Serial that Excel renders as the non-existent 1900-02-29.
const LEAP_BUG_SERIAL: i64 = 60;

const SECONDS_PER_DAY: f64 = 86_400.0;

const ISO_DATE_FORMATS: [&str; 1] = ["%Y-%m-%d"];
const ISO_DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];
const US_DATE_FORMATS: [&str; 1] = ["%m/%d/%Y"];
const EU_DATE_FORMATS: [&str; 1] = ["%d/%m/%Y"];
const LOCALE_DATE_FORMATS: [&str; 7] = [
    "%d.%m.%Y",
    "%Y/%m/%d",
    "%d-%m-%Y",
    "%d-%b-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %B %Y",
];

fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate, SerialDateError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or(SerialDateError::InvalidCalendarDate)
}

fn add_days(date: NaiveDate, days: i64) -> Result<NaiveDate, SerialDateError> {
    TimeDelta::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .ok_or(SerialDateError::InvalidCalendarDate)
}

/// Converts a workbook serial number into a timestamp.
///
/// 1900 system: serials up to 59 count from 1899-12-30, serial 60 (the
/// fictitious 1900-02-29) is pinned to 1900-03-01 and later serials count on
/// from that pinned date. 1904 system: serials count from 1904-01-01.
/// The fractional part of the serial is the time of day.
pub fn serial_to_datetime(
    serial: f64,
    date_system: DateSystem,
) -> Result<NaiveDateTime, SerialDateError> {
    if !serial.is_finite() || !(0.0..=MAX_SERIAL_DATE).contains(&serial) {
        return Err(SerialDateError::OutOfRange(serial));
    }

    let mut days = serial.trunc() as i64;
    let mut seconds = ((serial - serial.trunc()) * SECONDS_PER_DAY).round() as u32;
    if seconds >= SECONDS_PER_DAY as u32 {
        days += 1;
        seconds = 0;
    }

    let date = match date_system {
        DateSystem::Date1900 => {
            let epoch = ymd(1899, 12, 30)?;
            let leap_bug_date = ymd(1900, 3, 1)?;
            match days {
                d if d < LEAP_BUG_SERIAL => add_days(epoch, d)?,
                d => add_days(leap_bug_date, d - LEAP_BUG_SERIAL)?,
            }
        }
        DateSystem::Date1904 => add_days(ymd(1904, 1, 1)?, days)?,
    };

    let time = NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)
        .ok_or(SerialDateError::InvalidCalendarDate)?;
    Ok(date.and_time(time))
}

fn parse_with(text: &str, formats: &[&str]) -> Option<NaiveDateTime> {
    formats.iter().find_map(|format| {
        NaiveDate::parse_from_str(text, format)
            .ok()
            .filter(|date| chrono::Datelike::year(date) >= 1000)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    })
}

fn parse_datetime_with(text: &str, formats: &[&str]) -> Option<NaiveDateTime> {
    formats
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

/// Recognizes a date written as text. Tries ISO, then US (`MM/dd/yyyy`),
/// then European (`dd/MM/yyyy`), then common locale layouts.
pub fn parse_text_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() || !text.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    parse_with(text, &ISO_DATE_FORMATS)
        .or_else(|| parse_datetime_with(text, &ISO_DATETIME_FORMATS))
        .or_else(|| parse_with(text, &US_DATE_FORMATS))
        .or_else(|| parse_with(text, &EU_DATE_FORMATS))
        .or_else(|| parse_with(text, &LOCALE_DATE_FORMATS))
}
