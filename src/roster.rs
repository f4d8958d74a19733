//! Raw roster records.
//!
//! Spreadsheet readers hand over loosely typed rows; [`roster_from_records`]
//! turns them into [`Participant`]s, assigning ids by row index and failing
//! fast on the first missing or malformed field. A blank text cell counts
//! as missing. Rows are reported by their
//! spreadsheet line (the header is line 1, so record `i` is line `i + 2`).

use serde::{Deserialize, Serialize};

use crate::error::BracketError;
use crate::models::{parse_grade, Participant};

/// Grade as it appears in a spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GradeCell {
    Number(i64),
    Text(String),
}

/// One loosely typed roster row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterRecord {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub grade: Option<GradeCell>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub rank: Option<i64>,
    #[serde(default)]
    pub school: Option<String>,
}

impl RosterRecord {
    /// Converts this row into a participant with the given id.
    ///
    /// `row` is the spreadsheet line used in error messages.
    pub fn into_participant(self, id: u32, row: usize) -> Result<Participant, BracketError> {
        let first_name = required_text(self.first_name, row, "first_name")?;
        let last_name = required_text(self.last_name, row, "last_name")?;
        let school = required_text(self.school, row, "school")?;
        let weight = self.weight.ok_or(BracketError::MissingField { row, field: "weight" })?;
        let rank = self.rank.ok_or(BracketError::MissingField { row, field: "rank" })?;
        let rank = i32::try_from(rank).map_err(|_| BracketError::MalformedField {
            row,
            field: "rank",
            value: rank.to_string(),
        })?;
        let grade = match self.grade {
            None => return Err(BracketError::MissingField { row, field: "grade" }),
            Some(GradeCell::Number(n)) => i32::try_from(n).map_err(|_| {
                BracketError::MalformedField {
                    row,
                    field: "grade",
                    value: n.to_string(),
                }
            })?,
            Some(GradeCell::Text(text)) => {
                parse_grade(&text).ok_or(BracketError::MalformedField {
                    row,
                    field: "grade",
                    value: text,
                })?
            }
        };

        Ok(Participant {
            id,
            first_name,
            last_name,
            grade,
            weight,
            rank,
            school,
        })
    }
}

/// Converts raw rows into participants, ids assigned by row index.
pub fn roster_from_records(
    records: impl IntoIterator<Item = RosterRecord>,
) -> Result<Vec<Participant>, BracketError> {
    records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| record.into_participant(participant_id(idx)?, idx + 2))
        .collect()
}

/// Participant id for the record at `idx`.
fn participant_id(idx: usize) -> Result<u32, BracketError> {
    u32::try_from(idx).map_err(|_| BracketError::RosterTooLarge { row: idx + 2 })
}

fn required_text(
    value: Option<String>,
    row: usize,
    field: &'static str,
) -> Result<String, BracketError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(BracketError::MissingField { row, field })
}
