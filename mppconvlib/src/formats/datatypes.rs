//! Скалярные типы MSPDI: даты, время, длительности, деньги, проценты.

use crate::{
    error::{ProjError, Result},
    model::{Duration, TimeUnit},
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

const DATETIME_FMT: &str = "%Y-%m-%dT%H:%M:%S";
const TIME_FMT: &str = "%H:%M:%S";

// ISO-8601 без лет и месяцев: MSPDI пишет длительности как PT8H0M0S.
static DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<neg>-)?P(?:(?P<d>\d+(?:\.\d+)?)D)?(?:T(?:(?P<h>\d+(?:\.\d+)?)H)?(?:(?P<m>\d+(?:\.\d+)?)M)?(?:(?P<s>\d+(?:\.\d+)?)S)?)?$",
    )
    .expect("duration regex is valid")
});

pub fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DATETIME_FMT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .or_else(|_| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::default()))
        })
        .map_err(|e| ProjError::Parse(format!("date '{s}': {e}")))
}

pub fn print_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FMT).to_string()
}

pub fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, TIME_FMT)
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|e| ProjError::Parse(format!("time '{s}': {e}")))
}

pub fn print_time(t: &NaiveTime) -> String {
    t.format(TIME_FMT).to_string()
}

pub fn parse_bool(s: &str) -> bool {
    matches!(s, "1" | "true" | "True" | "TRUE")
}

pub fn print_bool(b: bool) -> &'static str {
    if b {
        "1"
    } else {
        "0"
    }
}

pub fn parse_int<T: std::str::FromStr>(field: &str, s: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    s.parse()
        .map_err(|e| ProjError::Parse(format!("{field} '{s}': {e}")))
}

pub fn parse_f64(field: &str, s: &str) -> Result<f64> {
    parse_int(field, s)
}

/// Дни считаются календарными (24 ч), как в ISO-8601.
pub fn parse_duration(s: &str, format: TimeUnit) -> Result<Duration> {
    let caps = DURATION_RE
        .captures(s)
        .ok_or_else(|| ProjError::Parse(format!("duration '{s}'")))?;

    let part = |name: &str| -> Result<f64> {
        match caps.name(name) {
            Some(m) => parse_f64("duration", m.as_str()),
            None => Ok(0.0),
        }
    };

    let mut minutes = part("d")? * 24.0 * 60.0 + part("h")? * 60.0 + part("m")? + part("s")? / 60.0;
    if caps.name("neg").is_some() {
        minutes = -minutes;
    }
    Ok(Duration::new(minutes, format))
}

pub fn print_duration(d: &Duration) -> String {
    let total = (d.minutes * 60.0).round() as i64;
    let sign = if total < 0 { "-" } else { "" };
    let secs = total.abs();
    format!(
        "{sign}PT{}H{}M{}S",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}

/// LinkLag хранится в десятых долях минуты.
pub fn parse_lag(tenths: &str, format: TimeUnit) -> Result<Duration> {
    let value = parse_f64("LinkLag", tenths)?;
    Ok(Duration::new(value / 10.0, format))
}

pub fn print_lag(d: &Duration) -> String {
    ((d.minutes * 10.0).round() as i64).to_string()
}

/// Денежные поля MSPDI хранятся в сотых долях валюты.
pub fn parse_currency(s: &str) -> Result<Decimal> {
    let raw: Decimal = s
        .parse()
        .map_err(|e| ProjError::Parse(format!("currency '{s}': {e}")))?;
    Ok((raw / Decimal::ONE_HUNDRED).normalize())
}

pub fn print_currency(d: &Decimal) -> String {
    (*d * Decimal::ONE_HUNDRED).round_dp(2).normalize().to_string()
}

pub fn parse_rate(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .map(|d| d.normalize())
        .map_err(|e| ProjError::Parse(format!("rate '{s}': {e}")))
}

pub fn print_rate(d: &Decimal) -> String {
    d.round_dp(4).normalize().to_string()
}

/// Доли MSPDI (1 = 100 %) в проценты модели.
pub fn parse_units(s: &str) -> Result<f64> {
    Ok(parse_f64("units", s)? * 100.0)
}

pub fn print_units(percent: f64) -> String {
    let fraction = (percent / 100.0 * 10_000.0).round() / 10_000.0;
    fraction.to_string()
}

pub fn print_number(value: f64) -> String {
    ((value * 100.0).round() / 100.0).to_string()
}
