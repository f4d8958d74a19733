//! Bracketing domain models.
//!
//! Provides the core data types for a grouped tournament: the entrants,
//! the round-robin groups they are placed in, and the event that owns
//! the finished groups.
//!
//! # Lifecycle
//!
//! | Type | Created | Mutated |
//! |------|---------|---------|
//! | Participant | once, from the roster | never |
//! | Group | by the matcher | only through methods that refresh its flags |
//! | Event | after matching | manual member moves |

mod event;
mod group;
mod participant;

pub use event::Event;
pub use group::{Group, Relaxation};
pub use participant::{
    grade_label, parse_grade, Participant, GRADE_K, GRADE_MAX, GRADE_PRE_K,
};
