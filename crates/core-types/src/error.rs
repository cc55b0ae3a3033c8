use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Observation dates must be strictly increasing: {previous} is followed by {next}")]
    UnorderedDates { previous: NaiveDate, next: NaiveDate },

    #[error("Observation on {date} has an invalid {field} value: {value}")]
    InvalidValue {
        date: NaiveDate,
        field: &'static str,
        value: f64,
    },
}
