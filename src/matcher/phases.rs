//! Multi-phase group formation with monotone relaxation.
//!
//! # Phases
//!
//! | Phase | Seeds | Size | Tolerance |
//! |-------|-------|------|-----------|
//! | 0 | outliers, most isolated first | target | outlier ladder, first success |
//! | 1–4 | [`BracketFinder`] | target | strict → weight relaxed → weight max → emergency |
//! | 5–6 | [`BracketFinder`] | target − 1 | same ladder (only when target > 3) |
//!
//! Each phase of 1–6 repeats until the finder fails, then the next,
//! more permissive tier takes over. Placed participants leave the pool
//! immediately, so later searches see an accurate pool.
//!
//! Outliers are participants with fewer than `target − 1` peers inside the
//! baseline grade and weight tolerance: they provably cannot fill a strict
//! group and get first pick before the ordinary phases consume the pool.

use tracing::{debug, info};

use super::builder::{find_partners, BracketFinder};
use crate::compat::Tolerance;
use crate::config::MIN_GROUP_SIZE;
use crate::isolation::IsolationScorer;
use crate::models::Participant;

/// Tolerance tiers tried in order by phases 1–4 and 5–6.
pub const TIERS: [(&str, Tolerance); 4] = [
    ("strict", Tolerance::STRICT),
    ("weight_relaxed", Tolerance::WEIGHT_RELAXED),
    ("weight_max", Tolerance::WEIGHT_MAX),
    ("emergency", Tolerance::EMERGENCY),
];

/// Ascending (weight, grade) pairs tried for each outlier in phase 0.
pub const OUTLIER_LADDER: [Tolerance; 4] = [
    Tolerance::new(10.0, 1, 2),
    Tolerance::new(25.0, 1, 2),
    Tolerance::new(44.0, 1, 2),
    Tolerance::new(44.0, 2, 2),
];

/// Result of phases 0–6.
#[derive(Debug, Clone, Default)]
pub struct Formation<'a> {
    /// Groups in creation order.
    pub groups: Vec<Vec<&'a Participant>>,
    /// Participants no phase could place, in roster order.
    pub remaining: Vec<&'a Participant>,
}

/// Drives phases 0–6 over a roster.
#[derive(Debug, Clone)]
pub struct RelaxationScheduler {
    target_size: usize,
    scorer: IsolationScorer,
    finder: BracketFinder,
}

impl RelaxationScheduler {
    /// Creates a scheduler for groups of `target_size`.
    pub fn new(target_size: usize, scorer: IsolationScorer) -> Self {
        Self {
            target_size,
            finder: BracketFinder::new(scorer.clone()),
            scorer,
        }
    }

    /// Runs phases 0–6.
    pub fn run<'a>(&self, roster: &'a [Participant]) -> Formation<'a> {
        let mut formation = Formation {
            groups: Vec::new(),
            remaining: roster.iter().collect(),
        };

        self.place_outliers(&mut formation);

        for (name, tolerance) in &TIERS {
            self.fill(&mut formation, name, self.target_size, tolerance);
        }

        if self.target_size > MIN_GROUP_SIZE {
            let reduced = self.target_size - 1;
            for (name, tolerance) in &TIERS {
                self.fill(&mut formation, name, reduced, tolerance);
            }
        }

        formation
    }

    /// Phase 0: seeds outliers directly across [`OUTLIER_LADDER`].
    fn place_outliers<'a>(&self, formation: &mut Formation<'a>) {
        let baseline = Tolerance::BASELINE;
        let needed = self.target_size - 1;
        let outliers: Vec<&'a Participant> = self
            .scorer
            .order(&formation.remaining, baseline.max_weight_spread)
            .into_iter()
            .filter(|p| strict_peer_count(p, &formation.remaining, &baseline) < needed)
            .collect();

        let before = formation.groups.len();
        for outlier in outliers {
            if !formation.remaining.iter().any(|p| p.id == outlier.id) {
                continue;
            }
            let placed = OUTLIER_LADDER.iter().find_map(|tolerance| {
                find_partners(outlier, &formation.remaining, self.target_size, tolerance)
            });
            if let Some(group) = placed {
                debug!(
                    event = "group_formed",
                    phase = "outliers",
                    seed = outlier.id,
                    members = ?member_ids(&group),
                );
                commit(formation, group);
            }
        }

        info!(
            event = "phase_end",
            phase = "outliers",
            size = self.target_size,
            groups = formation.groups.len() - before,
            remaining = formation.remaining.len(),
        );
    }

    /// Repeats the finder at one tier until it fails.
    fn fill<'a>(
        &self,
        formation: &mut Formation<'a>,
        phase: &str,
        size: usize,
        tolerance: &Tolerance,
    ) {
        let before = formation.groups.len();
        while let Some(group) = self.finder.find(&formation.remaining, size, tolerance) {
            debug!(
                event = "group_formed",
                phase,
                size,
                members = ?member_ids(&group),
            );
            commit(formation, group);
        }

        info!(
            event = "phase_end",
            phase,
            size,
            groups = formation.groups.len() - before,
            remaining = formation.remaining.len(),
        );
    }
}

/// Other pool members within the baseline grade and weight tolerance.
fn strict_peer_count(
    participant: &Participant,
    pool: &[&Participant],
    baseline: &Tolerance,
) -> usize {
    let max_grade = baseline.max_grade_spread.unsigned_abs();
    pool.iter()
        .filter(|p| {
            p.id != participant.id
                && p.grade.abs_diff(participant.grade) <= max_grade
                && (p.weight - participant.weight).abs() <= baseline.max_weight_spread
        })
        .count()
}

fn commit<'a>(formation: &mut Formation<'a>, group: Vec<&'a Participant>) {
    formation
        .remaining
        .retain(|p| !group.iter().any(|m| m.id == p.id));
    formation.groups.push(group);
}

fn member_ids(group: &[&Participant]) -> Vec<u32> {
    group.iter().map(|p| p.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(id: u32, grade: i32, weight: f64, school: &str) -> Participant {
        Participant::new(id, grade, weight).with_school(school)
    }

    fn group_ids(formation: &Formation<'_>) -> Vec<Vec<u32>> {
        formation.groups.iter().map(|g| member_ids(g)).collect()
    }

    #[test]
    fn test_single_strict_group() {
        let roster = vec![
            p(0, 5, 100.0, "A"),
            p(1, 5, 102.0, "B"),
            p(2, 5, 105.0, "C"),
            p(3, 5, 108.0, "D"),
        ];
        let formation = RelaxationScheduler::new(4, IsolationScorer::new()).run(&roster);
        assert_eq!(formation.groups.len(), 1);
        assert_eq!(formation.groups[0].len(), 4);
        assert!(formation.remaining.is_empty());
    }

    #[test]
    fn test_emergency_tier_allows_same_school() {
        let roster: Vec<Participant> = (0..4).map(|i| p(i, 5, 100.0 + i as f64, "A")).collect();
        let formation = RelaxationScheduler::new(4, IsolationScorer::new()).run(&roster);
        assert_eq!(formation.groups.len(), 1);
        assert!(formation.remaining.is_empty());
    }

    #[test]
    fn test_reduced_size_mops_up() {
        let roster: Vec<Participant> = (0..7)
            .map(|i| p(i, 4, 70.0 + i as f64, &format!("S{i}")))
            .collect();
        let formation = RelaxationScheduler::new(4, IsolationScorer::new()).run(&roster);

        let mut sizes: Vec<usize> = formation.groups.iter().map(Vec::len).collect();
        sizes.sort();
        assert_eq!(sizes, vec![3, 4]);
        assert!(formation.remaining.is_empty());
    }

    #[test]
    fn test_target_three_skips_reduced_phase() {
        let roster: Vec<Participant> = (0..5)
            .map(|i| p(i, 4, 70.0 + i as f64, &format!("S{i}")))
            .collect();
        let formation = RelaxationScheduler::new(3, IsolationScorer::new()).run(&roster);
        assert_eq!(formation.groups.len(), 1);
        assert_eq!(formation.remaining.len(), 2);
    }

    #[test]
    fn test_outlier_placed_first() {
        // Id 0 is light with no strict peers; phase 0 must build its group
        // from the lightest others under a relaxed weight window before the
        // strict phase spends them.
        let mut roster = vec![p(0, 4, 40.0, "X")];
        roster.extend((1..8).map(|i| p(i, 4, 58.0 + i as f64, &format!("S{i}"))));

        let formation = RelaxationScheduler::new(4, IsolationScorer::new()).run(&roster);
        assert!(formation.remaining.is_empty());
        assert_eq!(group_ids(&formation)[0][0], 0);
        assert_eq!(group_ids(&formation)[0].len(), 4);
    }

    #[test]
    fn test_stranded_grade_stays_in_pool() {
        let mut roster: Vec<Participant> = (0..4)
            .map(|i| p(i, 3, 60.0 + i as f64, &format!("S{i}")))
            .collect();
        roster.push(p(4, 12, 160.0, "Adults"));

        let formation = RelaxationScheduler::new(4, IsolationScorer::new()).run(&roster);
        assert_eq!(formation.groups.len(), 1);
        assert_eq!(member_ids(&formation.remaining), vec![4]);
    }

    #[test]
    fn test_strict_peer_count() {
        let roster = [
            p(0, 3, 60.0, "A"),
            p(1, 4, 70.0, "B"),
            p(2, 5, 60.0, "C"),
            p(3, 3, 70.5, "D"),
        ];
        let pool: Vec<&Participant> = roster.iter().collect();
        assert_eq!(strict_peer_count(&roster[0], &pool, &Tolerance::BASELINE), 1);
    }
}
