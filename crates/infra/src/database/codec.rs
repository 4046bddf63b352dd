//! Column encoding helpers
//!
//! Everything is stored as text. Decode failures surface as
//! `FromSqlConversionFailure` so the column index ends up in the error.

use std::error::Error as StdError;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::Row;
use rust_decimal::Decimal;
use tripdesk_domain::{Recorded, Vocabulary};
use uuid::Uuid;

type BoxError = Box<dyn StdError + Send + Sync>;

fn conversion_error(idx: usize, err: impl Into<BoxError>) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, err.into())
}

fn parse_at<T, E>(idx: usize, raw: &str, parse: impl FnOnce(&str) -> Result<T, E>) -> rusqlite::Result<T>
where
    E: Into<BoxError>,
{
    parse(raw).map_err(|err| conversion_error(idx, err))
}

pub(crate) fn uuid(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    parse_at(idx, &raw, Uuid::parse_str)
}

pub(crate) fn opt_uuid(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Uuid>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|raw| parse_at(idx, &raw, Uuid::parse_str)).transpose()
}

pub(crate) fn date(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    parse_at(idx, &raw, |s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
}

pub(crate) fn opt_date(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|raw| parse_at(idx, &raw, |s| NaiveDate::parse_from_str(s, "%Y-%m-%d")))
        .transpose()
}

pub(crate) fn timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    parse_at(idx, &raw, |s| DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc)))
}

pub(crate) fn opt_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|raw| {
        parse_at(idx, &raw, |s| DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc)))
    })
    .transpose()
}

pub(crate) fn decimal(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    parse_at(idx, &raw, Decimal::from_str)
}

/// A closed-vocabulary column that must hold a known key.
pub(crate) fn known<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = String>,
{
    let raw: String = row.get(idx)?;
    parse_at(idx, &raw, T::from_str)
}

pub(crate) fn opt_known<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<T>>
where
    T: FromStr<Err = String>,
{
    let raw: Option<String> = row.get(idx)?;
    raw.map(|raw| parse_at(idx, &raw, T::from_str)).transpose()
}

/// A status column that keeps unknown keys as [`Recorded::Unrecognized`].
pub(crate) fn recorded<T: Vocabulary>(row: &Row<'_>, idx: usize) -> rusqlite::Result<Recorded<T>> {
    let raw: String = row.get(idx)?;
    Ok(Recorded::from_raw(&raw))
}

pub(crate) fn date_text(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub(crate) fn timestamp_text(at: DateTime<Utc>) -> String {
    at.to_rfc3339()
}

pub(crate) fn bool_flag(row: &Row<'_>, idx: usize) -> rusqlite::Result<bool> {
    Ok(row.get::<_, i64>(idx)? != 0)
}
