//! Participant model.
//!
//! A participant is one entrant on the roster. Participants are created
//! once from parsed input and never mutated afterwards; groups hold their
//! own copies.

use serde::{Deserialize, Serialize};

/// Grade sentinel for pre-kindergarten.
pub const GRADE_PRE_K: i32 = -1;
/// Grade sentinel for kindergarten.
pub const GRADE_K: i32 = 0;
/// Highest accepted grade.
pub const GRADE_MAX: i32 = 12;

/// A roster entrant.
///
/// `grade` is ordinal: [`GRADE_PRE_K`] and [`GRADE_K`] sit below the
/// normal 1..=[`GRADE_MAX`] range. `rank` is relative (lower is stronger)
/// and is reported but never used to admit a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Stable identifier, unique within a roster.
    pub id: u32,
    pub first_name: String,
    pub last_name: String,
    /// Ordinal grade.
    pub grade: i32,
    /// Body weight.
    pub weight: f64,
    /// Relative rank.
    pub rank: i32,
    /// Originating school (diversity key).
    pub school: String,
}

impl Participant {
    /// Creates a participant with empty name and school.
    pub fn new(id: u32, grade: i32, weight: f64) -> Self {
        Self {
            id,
            first_name: String::new(),
            last_name: String::new(),
            grade,
            weight,
            rank: 0,
            school: String::new(),
        }
    }

    /// Sets first and last name.
    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.last_name = last.into();
        self
    }

    /// Sets the school.
    pub fn with_school(mut self, school: impl Into<String>) -> Self {
        self.school = school.into();
        self
    }

    /// Sets the rank.
    pub fn with_rank(mut self, rank: i32) -> Self {
        self.rank = rank;
        self
    }

    /// "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Display label for the grade ("Pre-K", "K", or the number).
    pub fn grade_label(&self) -> String {
        grade_label(self.grade)
    }
}

/// Display label for an ordinal grade.
pub fn grade_label(grade: i32) -> String {
    match grade {
        GRADE_PRE_K => "Pre-K".to_string(),
        GRADE_K => "K".to_string(),
        g => g.to_string(),
    }
}

/// Parses a textual grade.
///
/// Accepts "Pre-K" spellings and "K" (case-insensitive) as well as plain
/// integers. Returns `None` for anything else.
pub fn parse_grade(raw: &str) -> Option<i32> {
    let normalized = raw.trim().to_lowercase();
    match normalized.as_str() {
        "pre-k" | "prek" | "pre k" => Some(GRADE_PRE_K),
        "k" => Some(GRADE_K),
        other => other.parse().ok(),
    }
}
