//! Error types.
//!
//! The matcher never fails because no perfect grouping exists; leftover
//! participants are reported in the outcome instead. Errors cover bad
//! input, bad configuration, and manual edits that reference unknown
//! groups or participants.

use thiserror::Error;

use crate::validation::ValidationError;

/// Bracketing error.
#[derive(Debug, Error)]
pub enum BracketError {
    #[error("invalid roster: {}", join_errors(.0))]
    InvalidRoster(Vec<ValidationError>),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("row {row}: missing required field '{field}'")]
    MissingField { row: usize, field: &'static str },

    #[error("row {row}: malformed {field} '{value}'")]
    MalformedField {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("row {row}: roster has more records than participant ids")]
    RosterTooLarge { row: usize },

    #[error("group {0} not found")]
    GroupNotFound(usize),

    #[error("participant {0} not found")]
    ParticipantNotFound(u32),

    #[error("group {group_id} is full ({capacity} participants)")]
    GroupFull { group_id: usize, capacity: usize },
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
