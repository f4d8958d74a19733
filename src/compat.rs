//! Group compatibility analysis and tolerance tuples.
//!
//! [`analyze`] reduces a group to its spread metrics; a [`Tolerance`]
//! decides whether those metrics are admissible. The named tolerances
//! below form the escalation ladder used by the matcher.
//!
//! | Tolerance | Weight | Grade | Same school |
//! |-----------|--------|-------|-------------|
//! | `BASELINE` | 10 | 1 | 1 |
//! | `STRICT` | 10 | 1 | 2 |
//! | `WEIGHT_RELAXED` | 25 | 1 | 2 |
//! | `WEIGHT_MAX` | 44 | 1 | 2 |
//! | `EMERGENCY` | 44 | 2 | 4 |
//!
//! `BASELINE` is only used for reporting relaxation flags.

use std::collections::BTreeMap;

use crate::models::{Participant, Relaxation};

/// Maximum permitted spreads for admitting a group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Max weight − min weight.
    pub max_weight_spread: f64,
    /// Max grade − min grade.
    pub max_grade_spread: i32,
    /// Most participants allowed from a single school.
    pub max_from_one_school: usize,
}

/// Most participants one school may ever place in a group.
pub const SCHOOL_CAP_ABSOLUTE: usize = 4;

impl Tolerance {
    /// Reporting baseline for relaxation flags.
    pub const BASELINE: Tolerance = Tolerance::new(10.0, 1, 1);
    /// First pass: baseline weight and grade, at most two per school.
    pub const STRICT: Tolerance = Tolerance::new(10.0, 1, 2);
    /// Wider weight window.
    pub const WEIGHT_RELAXED: Tolerance = Tolerance::new(25.0, 1, 2);
    /// Widest weight window accepted for a hand-made bracket.
    pub const WEIGHT_MAX: Tolerance = Tolerance::new(44.0, 1, 2);
    /// Last resort: grade ±2 and the absolute school cap.
    pub const EMERGENCY: Tolerance = Tolerance::new(44.0, 2, SCHOOL_CAP_ABSOLUTE);

    /// Creates a tolerance tuple.
    pub const fn new(
        max_weight_spread: f64,
        max_grade_spread: i32,
        max_from_one_school: usize,
    ) -> Self {
        Self {
            max_weight_spread,
            max_grade_spread,
            max_from_one_school,
        }
    }

    /// Whether the analyzed group fits within this tolerance.
    pub fn admits(&self, analysis: &Analysis) -> bool {
        analysis.weight_spread <= self.max_weight_spread
            && analysis.grade_spread <= self.max_grade_spread
            && analysis.max_from_one_school <= self.max_from_one_school
    }
}

/// Spread metrics of a group.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// Max weight − min weight.
    pub weight_spread: f64,
    /// Max grade − min grade.
    pub grade_spread: i32,
    /// Members per school.
    pub school_counts: BTreeMap<String, usize>,
    /// Largest value in `school_counts`.
    pub max_from_one_school: usize,
    /// Number of keys in `school_counts`.
    pub distinct_schools: usize,
}

impl Analysis {
    /// Flags for every baseline tolerance this group exceeds.
    pub fn violations(&self) -> Vec<Relaxation> {
        self.violations_against(&Tolerance::BASELINE)
    }

    /// Flags for every bound of `tolerance` this group exceeds.
    pub fn violations_against(&self, tolerance: &Tolerance) -> Vec<Relaxation> {
        let mut flags = Vec::new();
        if self.weight_spread > tolerance.max_weight_spread {
            flags.push(Relaxation::Weight);
        }
        if self.grade_spread > tolerance.max_grade_spread {
            flags.push(Relaxation::Grade);
        }
        if self.max_from_one_school > tolerance.max_from_one_school {
            flags.push(Relaxation::School);
        }
        flags
    }
}

/// Computes spread metrics over a group.
///
/// An empty group yields all-zero metrics.
pub fn analyze<'a, I>(members: I) -> Analysis
where
    I: IntoIterator<Item = &'a Participant>,
{
    let mut min_weight = f64::INFINITY;
    let mut max_weight = f64::NEG_INFINITY;
    let mut min_grade = i32::MAX;
    let mut max_grade = i32::MIN;
    let mut school_counts: BTreeMap<String, usize> = BTreeMap::new();

    for p in members {
        min_weight = min_weight.min(p.weight);
        max_weight = max_weight.max(p.weight);
        min_grade = min_grade.min(p.grade);
        max_grade = max_grade.max(p.grade);
        *school_counts.entry(p.school.clone()).or_insert(0) += 1;
    }

    if school_counts.is_empty() {
        return Analysis {
            weight_spread: 0.0,
            grade_spread: 0,
            school_counts,
            max_from_one_school: 0,
            distinct_schools: 0,
        };
    }

    Analysis {
        weight_spread: max_weight - min_weight,
        grade_spread: max_grade.saturating_sub(min_grade),
        max_from_one_school: school_counts.values().copied().max().unwrap_or(0),
        distinct_schools: school_counts.len(),
        school_counts,
    }
}
