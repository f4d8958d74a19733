//! Group quality statistics.
//!
//! Derived entirely from the finished groups, so they can be recomputed
//! at any time (for example after manual edits).
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Size distribution | groups per member count |
//! | No violations | groups with no relaxation flag |
//! | Weight / grade / school relaxed | groups carrying that flag |
//! | Weight spread | average and maximum over groups of 2+ |
//! | Grade spread | average and maximum over groups of 2+ |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::compat::analyze;
use crate::models::{Group, Relaxation};

/// Summary statistics over a set of groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupStatistics {
    /// Number of groups.
    pub total_groups: usize,
    /// Member count → number of groups.
    pub size_distribution: BTreeMap<usize, usize>,
    /// Groups with no relaxation flag.
    pub no_violations: usize,
    /// Groups flagged for weight.
    pub weight_relaxed: usize,
    /// Groups flagged for grade.
    pub grade_relaxed: usize,
    /// Groups flagged for school.
    pub school_relaxed: usize,
    /// Mean weight spread over groups of 2+.
    pub avg_weight_spread: f64,
    /// Largest weight spread.
    pub max_weight_spread: f64,
    /// Mean grade spread over groups of 2+.
    pub avg_grade_spread: f64,
    /// Largest grade spread.
    pub max_grade_spread: i32,
}

impl GroupStatistics {
    /// Computes statistics over `groups`.
    pub fn calculate(groups: &[Group]) -> Self {
        let mut stats = Self {
            total_groups: groups.len(),
            ..Self::default()
        };

        let mut weight_total = 0.0;
        let mut grade_total = 0i64;
        let mut measured = 0usize;

        for group in groups {
            *stats.size_distribution.entry(group.size()).or_insert(0) += 1;

            if group.relaxations().is_empty() {
                stats.no_violations += 1;
            }
            if group.has_relaxation(Relaxation::Weight) {
                stats.weight_relaxed += 1;
            }
            if group.has_relaxation(Relaxation::Grade) {
                stats.grade_relaxed += 1;
            }
            if group.has_relaxation(Relaxation::School) {
                stats.school_relaxed += 1;
            }

            if group.size() >= 2 {
                let analysis = analyze(group.members());
                measured += 1;
                weight_total += analysis.weight_spread;
                grade_total += i64::from(analysis.grade_spread);
                stats.max_weight_spread = stats.max_weight_spread.max(analysis.weight_spread);
                stats.max_grade_spread = stats.max_grade_spread.max(analysis.grade_spread);
            }
        }

        if measured > 0 {
            stats.avg_weight_spread = weight_total / measured as f64;
            stats.avg_grade_spread = grade_total as f64 / measured as f64;
        }

        stats
    }

    /// Fraction of groups with no relaxation flag (1.0 when empty).
    pub fn clean_rate(&self) -> f64 {
        if self.total_groups == 0 {
            1.0
        } else {
            self.no_violations as f64 / self.total_groups as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Participant;

    fn p(id: u32, grade: i32, weight: f64, school: &str) -> Participant {
        Participant::new(id, grade, weight).with_school(school)
    }

    #[test]
    fn test_statistics_basic() {
        let groups = vec![
            Group::new(
                0,
                vec![
                    p(1, 3, 60.0, "A"),
                    p(2, 3, 62.0, "B"),
                    p(3, 3, 64.0, "C"),
                    p(4, 3, 66.0, "D"),
                ],
            ),
            Group::new(
                1,
                vec![p(5, 4, 80.0, "A"), p(6, 6, 100.0, "A"), p(7, 5, 90.0, "B")],
            ),
        ];

        let stats = GroupStatistics::calculate(&groups);
        assert_eq!(stats.total_groups, 2);
        assert_eq!(stats.size_distribution[&4], 1);
        assert_eq!(stats.size_distribution[&3], 1);
        assert_eq!(stats.no_violations, 1);
        assert_eq!(stats.weight_relaxed, 1);
        assert_eq!(stats.grade_relaxed, 1);
        assert_eq!(stats.school_relaxed, 1);
        assert!((stats.avg_weight_spread - 13.0).abs() < 1e-10); // (6 + 20) / 2
        assert!((stats.max_weight_spread - 20.0).abs() < 1e-10);
        assert!((stats.avg_grade_spread - 1.0).abs() < 1e-10); // (0 + 2) / 2
        assert_eq!(stats.max_grade_spread, 2);
        assert!((stats.clean_rate() - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_statistics_empty() {
        let stats = GroupStatistics::calculate(&[]);
        assert_eq!(stats.total_groups, 0);
        assert!(stats.size_distribution.is_empty());
        assert_eq!(stats.avg_weight_spread, 0.0);
        assert!((stats.clean_rate() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_singleton_not_measured() {
        let groups = vec![Group::new(0, vec![p(1, 3, 60.0, "A")])];
        let stats = GroupStatistics::calculate(&groups);
        assert_eq!(stats.size_distribution[&1], 1);
        assert_eq!(stats.max_weight_spread, 0.0);
        assert_eq!(stats.avg_grade_spread, 0.0);
    }
}
