//! Bracket matching engine.
//!
//! Partitions a roster into round-robin groups of 3 to `group_size`
//! participants and spreads them across mats.
//!
//! # Algorithm
//!
//! 1. Phases 0–6 ([`RelaxationScheduler`]): strict-first group formation,
//!    hardest participants first, relaxing tolerances one tier at a time.
//! 2. Phases 7–8 ([`StragglerResolver`]): absorb leftovers into groups with
//!    room, swapping a member out when that is the only way in.
//! 3. [`assign_mats`]: least-loaded mat first.
//!
//! The result is best-effort, not optimal: there is no backtracking.
//! Participants that no phase can place are returned as `unmatched`
//! rather than forced into a group beyond the emergency tolerance.
//!
//! # Determinism
//! Every scan runs in roster order and every tie goes to the earlier
//! candidate, so identical rosters and settings give identical groups.
//!
//! # Complexity
//! Dominated by repeated O(n²) pool scans per phase; intended for rosters
//! of tens to low hundreds.

mod builder;
mod mats;
mod phases;
mod stats;
mod stragglers;

pub use builder::{find_partners, BracketFinder};
pub use mats::{assign_mats, mat_loads};
pub use phases::{Formation, RelaxationScheduler, OUTLIER_LADDER, TIERS};
pub use stats::GroupStatistics;
pub use stragglers::StragglerResolver;

use tracing::info;

use crate::config::MatcherConfig;
use crate::error::BracketError;
use crate::isolation::IsolationScorer;
use crate::models::{Event, Group, Participant};
use crate::validation::validate_roster;

/// Groups and leftovers from one matcher run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchOutcome {
    /// Finished groups with mat numbers assigned.
    pub groups: Vec<Group>,
    /// Participants no phase could place.
    pub unmatched: Vec<Participant>,
}

impl MatchOutcome {
    /// Whether every participant was placed.
    pub fn is_complete(&self) -> bool {
        self.unmatched.is_empty()
    }

    /// Statistics over the groups.
    pub fn statistics(&self) -> GroupStatistics {
        GroupStatistics::calculate(&self.groups)
    }
}

/// Bracket matcher.
///
/// # Example
///
/// ```
/// use mat_brackets::config::MatcherConfig;
/// use mat_brackets::matcher::BracketMatcher;
/// use mat_brackets::models::Participant;
///
/// let roster: Vec<Participant> = [100.0, 102.0, 105.0, 108.0]
///     .iter()
///     .enumerate()
///     .map(|(i, &w)| {
///         Participant::new(i as u32, 5, w)
///             .with_name("First", format!("Last{i}"))
///             .with_school(format!("School {i}"))
///     })
///     .collect();
///
/// let matcher = BracketMatcher::new(MatcherConfig::default()).unwrap();
/// let event = matcher.create_event("Spring Open", "2026-04-11", &roster).unwrap();
/// assert_eq!(event.groups.len(), 1);
/// assert!(event.groups[0].relaxations().is_empty());
/// assert!(event.unmatched.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct BracketMatcher {
    config: MatcherConfig,
    scorer: IsolationScorer,
}

impl BracketMatcher {
    /// Creates a matcher after validating `config`.
    pub fn new(config: MatcherConfig) -> Result<Self, BracketError> {
        config.validate()?;
        Ok(Self {
            config,
            scorer: IsolationScorer::new(),
        })
    }

    /// Replaces the isolation scorer used to order seeds.
    pub fn with_scorer(mut self, scorer: IsolationScorer) -> Self {
        self.scorer = scorer;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Groups a roster. Assumes the roster already passed validation.
    pub fn match_roster(&self, roster: &[Participant]) -> MatchOutcome {
        let group_size = self.config.group_size;
        info!(
            event = "match_start",
            participants = roster.len(),
            group_size,
            mat_count = self.config.mat_count,
        );

        let formation = RelaxationScheduler::new(group_size, self.scorer.clone()).run(roster);
        let mut groups: Vec<Group> = formation
            .groups
            .into_iter()
            .enumerate()
            .map(|(id, members)| Group::new(id, members.into_iter().cloned().collect()))
            .collect();

        let unmatched =
            StragglerResolver::new(group_size).resolve(&mut groups, formation.remaining);
        assign_mats(&mut groups, self.config.mat_count);

        let outcome = MatchOutcome {
            groups,
            unmatched: unmatched.into_iter().cloned().collect(),
        };
        debug_check_invariants(roster, &outcome, group_size);

        info!(
            event = "match_end",
            groups = outcome.groups.len(),
            unmatched = outcome.unmatched.len(),
        );
        outcome
    }

    /// Validates the roster, groups it, and wraps the result in an [`Event`].
    pub fn create_event(
        &self,
        name: impl Into<String>,
        date: impl Into<String>,
        roster: &[Participant],
    ) -> Result<Event, BracketError> {
        validate_roster(roster).map_err(BracketError::InvalidRoster)?;

        let outcome = self.match_roster(roster);
        let mut event = Event::new(name, date, self.config.mat_count, self.config.group_size);
        event.groups = outcome.groups;
        event.unmatched = outcome.unmatched;
        Ok(event)
    }
}

/// Partition and size invariants. A failure is a bookkeeping defect.
fn debug_check_invariants(roster: &[Participant], outcome: &MatchOutcome, group_size: usize) {
    if !cfg!(debug_assertions) {
        return;
    }

    let mut seen: Vec<u32> = outcome
        .groups
        .iter()
        .flat_map(|g| g.members().iter().map(|m| m.id))
        .chain(outcome.unmatched.iter().map(|p| p.id))
        .collect();
    seen.sort_unstable();
    let mut expected: Vec<u32> = roster.iter().map(|p| p.id).collect();
    expected.sort_unstable();
    debug_assert_eq!(seen, expected, "participants lost or duplicated");

    for group in &outcome.groups {
        debug_assert!(
            (crate::config::MIN_GROUP_SIZE..=group_size).contains(&group.size()),
            "group {} has {} members",
            group.id,
            group.size()
        );
    }
}
