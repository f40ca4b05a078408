//! Error types for pitch-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PitchError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Booking {candidate} conflicts with existing booking {existing}")]
    Conflict { candidate: String, existing: String },

    #[error("Booking {start_hour}:00-{end_hour}:00 falls outside opening hours on {date}")]
    OutsideOpeningHours {
        date: chrono::NaiveDate,
        start_hour: u32,
        end_hour: u32,
    },

    #[error("Field {0} is not available for booking")]
    FieldUnavailable(String),

    #[error("Field {field} is closed for maintenance {start_hour}:00-{end_hour}:00 on {date}")]
    UnderMaintenance {
        field: String,
        date: chrono::NaiveDate,
        start_hour: u32,
        end_hour: u32,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PitchError>;
