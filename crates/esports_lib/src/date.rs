//! Lenient parsing of the dates sent by the forms and stored in the site settings.
//!
//! HTML date inputs send values like `2026-03-01T18:30` (without seconds) or `2026-03-01`,
//! which the default chrono deserializer refuses.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, de};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses the provided date, returning it as a naive UTC date.
///
/// Dates with a timezone offset are converted to UTC. A date without time is at midnight.
pub fn parse(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(date) = DateTime::parse_from_rfc3339(s) {
        return Some(date.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Deserializes an optional date with the [`parse`] function.
///
/// An empty string is treated as a missing date.
pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse(&s)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid date `{s}`"))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::parse;

    #[test]
    fn formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(18, 30, 0)
            .unwrap();

        assert_eq!(parse("2026-03-01T18:30"), Some(expected));
        assert_eq!(parse("2026-03-01 18:30:00"), Some(expected));
        assert_eq!(parse("2026-03-01T18:30:00"), Some(expected));
        assert_eq!(parse("2026-03-01T19:30:00+01:00"), Some(expected));
        assert_eq!(
            parse("2026-03-01"),
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse(""), None);
        assert_eq!(parse("tomorrow"), None);
    }

    #[test]
    fn deserialize_empty_string() {
        #[derive(serde::Deserialize)]
        struct Form {
            #[serde(default, deserialize_with = "super::deserialize_opt")]
            date: Option<chrono::NaiveDateTime>,
        }

        let form: Form = serde_json::from_str(r#"{"date": ""}"#).unwrap();
        assert_eq!(form.date, None);
        let form: Form = serde_json::from_str("{}").unwrap();
        assert_eq!(form.date, None);
        assert!(serde_json::from_str::<Form>(r#"{"date": "soon"}"#).is_err());
    }
}
