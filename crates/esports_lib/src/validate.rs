//! Field validation helpers shared by the admin forms and the registration workflow.
//!
//! Every check runs before any write, and returns a [`EsportsError::Validation`] error
//! with a message meant to be shown as is to the user.

use chrono::NaiveDateTime;

use crate::{
    error::{EsportsError, EsportsResult},
    invalid,
};

/// Returns the provided string trimmed, or `None` if it is missing or blank.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    })
}

/// Returns the trimmed value of a required text field.
pub fn required_str(field: &str, value: Option<String>) -> EsportsResult<String> {
    non_blank(value).ok_or_else(|| missing(field))
}

/// Returns the value of a required field.
pub fn required<T>(field: &str, value: Option<T>) -> EsportsResult<T> {
    value.ok_or_else(|| missing(field))
}

/// Returns the error of a missing required field.
pub fn missing(field: &str) -> EsportsError {
    invalid!("{field} is required")
}

/// Checks that the provided date isn't before `now`.
pub fn not_in_past(field: &str, date: NaiveDateTime, now: NaiveDateTime) -> EsportsResult {
    if date < now {
        return Err(invalid!("{field} cannot be in the past"));
    }
    Ok(())
}

/// Checks that the end date, if any, isn't before the start date.
pub fn end_not_before_start(start: NaiveDateTime, end: Option<NaiveDateTime>) -> EsportsResult {
    match end {
        Some(end) if end < start => Err(invalid!("end date cannot be before start date")),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn date(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn blank_strings_are_missing() {
        assert_eq!(non_blank(Some("  ".to_owned())), None);
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some(" Alice ".to_owned())).as_deref(), Some("Alice"));
    }

    #[test]
    fn required_field_message() {
        let err = required_str("captain_name", Some(String::new())).unwrap_err();
        assert_eq!(err.to_string(), "captain_name is required");
        assert!(required("game_id", Some(3)).is_ok());
    }

    #[test]
    fn past_dates() {
        assert!(not_in_past("event_date", date(1), date(2)).is_err());
        assert!(not_in_past("event_date", date(2), date(2)).is_ok());
        assert!(not_in_past("event_date", date(3), date(2)).is_ok());
    }

    #[test]
    fn end_before_start() {
        assert!(end_not_before_start(date(2), Some(date(1))).is_err());
        assert!(end_not_before_start(date(2), Some(date(2))).is_ok());
        assert!(end_not_before_start(date(2), None).is_ok());
    }
}
