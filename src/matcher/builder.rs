//! Greedy group construction.
//!
//! # Algorithm
//!
//! [`find_partners`] grows one group from a seed: each step scans the
//! unused pool, drops candidates the tolerance rejects, and appends the
//! lowest-scoring one. The score ranks strictly by
//!
//! 1. school diversity (penalty for a repeated school, bonus for a new one)
//! 2. resulting grade spread
//! 3. resulting weight spread
//!
//! Ties go to the earlier candidate in pool order.
//!
//! [`BracketFinder`] tries seeds most-isolated-first and returns the first
//! full-size group. The search is not exhaustive.
//!
//! # Complexity
//! O(k · n · k) per [`find_partners`] call, k = target size, n = pool size.

use std::iter;

use crate::compat::{analyze, Analysis, Tolerance};
use crate::isolation::IsolationScorer;
use crate::models::Participant;

const SAME_SCHOOL_PENALTY: f64 = 1000.0;
const NEW_SCHOOL_BONUS: f64 = -100.0;
const GRADE_SPREAD_WEIGHT: f64 = 100.0;

/// Placement score for adding one participant (lower is better).
///
/// `school_taken` tells whether the participant's school is already in
/// the group; `after` analyzes the group with the participant added.
pub(crate) fn placement_score(school_taken: bool, after: &Analysis) -> f64 {
    let school = if school_taken {
        SAME_SCHOOL_PENALTY
    } else {
        NEW_SCHOOL_BONUS
    };
    school + after.grade_spread as f64 * GRADE_SPREAD_WEIGHT + after.weight_spread
}

/// Grows a group of exactly `target_size` around `seed`.
///
/// `pool` may contain the seed. Returns `None` when the group cannot be
/// completed within `tolerance`, even if a partial group was built.
pub fn find_partners<'a>(
    seed: &'a Participant,
    pool: &[&'a Participant],
    target_size: usize,
    tolerance: &Tolerance,
) -> Option<Vec<&'a Participant>> {
    let mut group = vec![seed];
    let mut candidates: Vec<&'a Participant> = pool
        .iter()
        .copied()
        .filter(|p| p.id != seed.id)
        .collect();

    while group.len() < target_size {
        let mut best: Option<(usize, f64)> = None;

        for (idx, &candidate) in candidates.iter().enumerate() {
            let after = analyze(group.iter().copied().chain(iter::once(candidate)));
            if !tolerance.admits(&after) {
                continue;
            }

            let school_taken = group.iter().any(|m| m.school == candidate.school);
            let score = placement_score(school_taken, &after);
            if best.map_or(true, |(_, best_score)| score < best_score) {
                best = Some((idx, score));
            }
        }

        let Some((idx, _)) = best else {
            break;
        };
        group.push(candidates.remove(idx));
    }

    (group.len() == target_size).then_some(group)
}

/// Isolation-ordered seed search over a pool.
#[derive(Debug, Clone, Default)]
pub struct BracketFinder {
    scorer: IsolationScorer,
}

impl BracketFinder {
    /// Creates a finder ordering seeds with `scorer`.
    pub fn new(scorer: IsolationScorer) -> Self {
        Self { scorer }
    }

    /// Returns the first full-size group found, seeding most isolated first.
    ///
    /// Isolation is measured with the tolerance's weight spread.
    pub fn find<'a>(
        &self,
        pool: &[&'a Participant],
        target_size: usize,
        tolerance: &Tolerance,
    ) -> Option<Vec<&'a Participant>> {
        if pool.len() < target_size {
            return None;
        }

        self.scorer
            .order(pool, tolerance.max_weight_spread)
            .into_iter()
            .find_map(|seed| find_partners(seed, pool, target_size, tolerance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(id: u32, grade: i32, weight: f64, school: &str) -> Participant {
        Participant::new(id, grade, weight).with_school(school)
    }

    fn ids(group: &[&Participant]) -> Vec<u32> {
        group.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_prefers_new_school_over_closer_weight() {
        let roster = [
            p(1, 3, 60.0, "A"),
            p(2, 3, 60.5, "A"), // closest, same school
            p(3, 3, 68.0, "B"),
        ];
        let pool: Vec<&Participant> = roster.iter().collect();

        let group = find_partners(&roster[0], &pool, 2, &Tolerance::STRICT).unwrap();
        assert_eq!(ids(&group), vec![1, 3]);
    }

    #[test]
    fn test_grade_outranks_weight() {
        let roster = [
            p(1, 3, 60.0, "A"),
            p(2, 4, 61.0, "B"),
            p(3, 3, 69.0, "C"),
        ];
        let pool: Vec<&Participant> = roster.iter().collect();

        let group = find_partners(&roster[0], &pool, 2, &Tolerance::STRICT).unwrap();
        assert_eq!(ids(&group), vec![1, 3]);
    }

    #[test]
    fn test_tie_goes_to_pool_order() {
        let roster = [
            p(1, 3, 60.0, "A"),
            p(2, 3, 62.0, "B"),
            p(3, 3, 58.0, "C"),
        ];
        let pool: Vec<&Participant> = roster.iter().collect();

        let group = find_partners(&roster[0], &pool, 2, &Tolerance::STRICT).unwrap();
        assert_eq!(ids(&group), vec![1, 2]);
    }

    #[test]
    fn test_rejects_outside_tolerance() {
        let roster = [
            p(1, 3, 60.0, "A"),
            p(2, 3, 65.0, "B"),
            p(3, 3, 90.0, "C"),
        ];
        let pool: Vec<&Participant> = roster.iter().collect();

        assert!(find_partners(&roster[0], &pool, 3, &Tolerance::STRICT).is_none());
        assert!(find_partners(&roster[0], &pool, 3, &Tolerance::WEIGHT_RELAXED).is_none());
        let wide = find_partners(&roster[0], &pool, 3, &Tolerance::WEIGHT_MAX).unwrap();
        assert_eq!(ids(&wide), vec![1, 2, 3]);
    }

    #[test]
    fn test_school_cap() {
        let roster = [
            p(1, 3, 60.0, "A"),
            p(2, 3, 61.0, "A"),
            p(3, 3, 62.0, "A"),
        ];
        let pool: Vec<&Participant> = roster.iter().collect();

        assert!(find_partners(&roster[0], &pool, 3, &Tolerance::STRICT).is_none());
        assert!(find_partners(&roster[0], &pool, 3, &Tolerance::EMERGENCY).is_some());
    }

    #[test]
    fn test_finder_seeds_most_isolated_first() {
        // Id 5 is the heaviest; as the most isolated seed, its group is
        // built first and pulls in its nearest neighbours.
        let roster = [
            p(1, 3, 50.0, "A"),
            p(2, 3, 51.0, "B"),
            p(3, 3, 52.0, "C"),
            p(4, 3, 58.0, "D"),
            p(5, 3, 61.0, "E"),
        ];
        let pool: Vec<&Participant> = roster.iter().collect();

        let group = BracketFinder::default()
            .find(&pool, 3, &Tolerance::STRICT)
            .unwrap();
        assert_eq!(group[0].id, 5);
        assert_eq!(ids(&group), vec![5, 4, 3]);
    }

    #[test]
    fn test_finder_small_pool() {
        let roster = [p(1, 3, 50.0, "A"), p(2, 3, 51.0, "B")];
        let pool: Vec<&Participant> = roster.iter().collect();
        assert!(BracketFinder::default()
            .find(&pool, 3, &Tolerance::EMERGENCY)
            .is_none());
    }
}
