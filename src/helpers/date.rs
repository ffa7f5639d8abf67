//! Date helper functions

use chrono::{DateTime, TimeZone, Utc};

/// Format a publication date as `dd mon yyyy`.
///
/// The month abbreviation is English and the whole string is lowercased.
///
/// # Examples
/// ```ignore
/// format_publication_date(&date, chrono_tz::UTC) // -> "05 jan 2023"
/// ```
pub fn format_publication_date<Tz: TimeZone>(date: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.with_timezone(tz)
        .format("%d %b %Y")
        .to_string()
        .to_lowercase()
}

/// Format an optional publication date, empty when the CMS has none
pub fn publication_date<Tz: TimeZone>(date: Option<&DateTime<Utc>>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.map(|d| format_publication_date(d, tz))
        .unwrap_or_default()
}

/// Format a date in ISO 8601 for `<time datetime>`
pub fn date_xml(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
