use crate::feed::error::ConfigurationError;
use crate::worksheet::DATE_FORMAT;
use chrono::DateTime;
use chrono::FixedOffset;
use chrono::NaiveDate;
use chrono::NaiveTime;
use chrono::TimeDelta;
use std::fmt::Write;

/// One item of the feed, built from a selected row.
#[derive(Clone, Debug, PartialEq)]
pub struct FeedEntry {
    /// Worksheet row the entry came from
    pub row: usize,
    pub date: NaiveDate,
    pub published: DateTime<FixedOffset>,
    pub title: String,
    pub description: String,
    pub enclosure_url: String,
    /// `None` when the length lookup failed
    pub enclosure_length: Option<u64>,
}

/// The instant `hours` after midnight of `date` at a fixed offset.
pub fn publish_instant(date: NaiveDate, hours: i64, offset: FixedOffset) -> DateTime<FixedOffset> {
    let local = date.and_time(NaiveTime::MIN) + TimeDelta::hours(hours);
    let utc = local - TimeDelta::seconds(offset.local_minus_utc() as i64);
    DateTime::from_naive_utc_and_offset(utc, offset)
}

/// Formats an instant with a `strftime` pattern, rejecting malformed patterns.
pub fn format_timestamp(instant: &DateTime<FixedOffset>, pattern: &str) -> Result<String, ConfigurationError> {
    let mut text = String::new();
    write!(text, "{}", instant.format(pattern))
        .map_err(|_| ConfigurationError::InvalidPattern(pattern.to_owned()))?;
    Ok(text)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a fixed UTC offset such as `+00:00` or `-06:00`.
pub fn parse_offset(offset: &str) -> Result<FixedOffset, ConfigurationError> {
    offset
        .trim()
        .parse::<FixedOffset>()
        .map_err(|_| ConfigurationError::InvalidOffset(offset.to_owned()))
}

/// Fills `{title}` and `{date}` in a fallback description template.
pub fn fallback_description(template: &str, title: &str, date: NaiveDate) -> String {
    template
        .replace("{title}", title)
        .replace("{date}", &format_date(date))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn published_ten_hours_into_the_day() {
        let utc = parse_offset("+00:00").unwrap();
        let instant = publish_instant(date(2015, 3, 1), 10, utc);
        assert_eq!(
            format_timestamp(&instant, "%a, %d %b %Y %H:%M:%S %z").unwrap(),
            "Sun, 01 Mar 2015 10:00:00 +0000"
        );

        let central = parse_offset("-06:00").unwrap();
        let instant = publish_instant(date(2015, 3, 1), 10, central);
        assert_eq!(instant.to_rfc3339(), "2015-03-01T10:00:00-06:00");
        assert_eq!(instant.naive_utc().to_string(), "2015-03-01 16:00:00");
    }

    #[test]
    fn bad_settings_are_rejected() {
        assert_eq!(parse_offset("CST"), Err(ConfigurationError::InvalidOffset("CST".to_owned())));
        let instant = publish_instant(date(2015, 3, 1), 10, parse_offset("+00:00").unwrap());
        assert_eq!(
            format_timestamp(&instant, "%Q"),
            Err(ConfigurationError::InvalidPattern("%Q".to_owned()))
        );
    }

    #[test]
    fn fallback_names_title_and_date() {
        assert_eq!(
            fallback_description("{title} message from {date}", "Grace", date(2015, 3, 1)),
            "Grace message from 2015-03-01"
        );
    }
}
