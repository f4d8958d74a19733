//! Round-robin bracket formation for youth tournaments.
//!
//! Partitions a roster into small groups (3 to `group_size` participants)
//! whose members are close in weight and grade and come from a mix of
//! schools, then balances the groups across mats. Groups are filled
//! strict-first; tolerances loosen one tier at a time, and every group that
//! needed a loosened tolerance is flagged for the organizer.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Participant`, `Group`, `Relaxation`, `Event`
//! - **`compat`**: Group analysis and the `Tolerance` tiers
//! - **`isolation`**: Hardest-to-place-first ordering
//! - **`matcher`**: Formation phases, straggler handling, mat assignment, statistics
//! - **`roster`**: Tabular roster records into participants
//! - **`validation`**: Input integrity checks (duplicate IDs, names, weights, grades)
//! - **`config`**: Matcher settings, optionally from TOML
//! - **`error`**: Crate error type
//!
//! # Logging
//!
//! Emits structured `tracing` events (`match_start`, `phase_end`,
//! `group_formed`, `absorbed`, `swapped`, `unmatched`, `match_end`).
//! Install a subscriber to see them.
//!
//! # Example
//!
//! ```
//! use mat_brackets::{BracketMatcher, MatcherConfig, Participant};
//!
//! let roster: Vec<Participant> = (0..8)
//!     .map(|i| {
//!         Participant::new(i, 4, 60.0 + f64::from(i))
//!             .with_name("Sam", format!("Doe{i}"))
//!             .with_school(format!("School {}", i % 4))
//!     })
//!     .collect();
//!
//! let matcher = BracketMatcher::new(MatcherConfig::new().with_mat_count(2)).unwrap();
//! let outcome = matcher.match_roster(&roster);
//! assert_eq!(outcome.groups.len(), 2);
//! assert!(outcome.is_complete());
//! ```

pub mod compat;
pub mod config;
pub mod error;
pub mod isolation;
pub mod matcher;
pub mod models;
pub mod roster;
pub mod validation;

pub use compat::{analyze, Analysis, Tolerance};
pub use config::MatcherConfig;
pub use error::BracketError;
pub use matcher::{BracketMatcher, GroupStatistics, MatchOutcome};
pub use models::{Event, Group, Participant, Relaxation};
