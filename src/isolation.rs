//! Isolation scoring: how hard a participant is to place.
//!
//! The matcher seeds groups with the most isolated participants first, so
//! the hardest cases get first pick while the pool is richest. The score
//! only decides processing order; it never admits or rejects a group.
//!
//! # Formula
//!
//! With `peers` = other pool members within ±1 grade:
//!
//! - no peers → `stranded` (a fixed sentinel)
//! - otherwise `max(0, peer_target − close) × peer_step`
//!   `+ |weight − median| × deviation_scale`
//!
//! where `close` counts peers within the weight tolerance and `median` is
//! the median weight of same-grade pool members (`missing_deviation` is
//! used in place of the deviation when there are none).
//!
//! # Score Convention
//! **Higher score = process earlier.**

use std::cmp::Ordering;

use crate::models::Participant;

/// Isolation scorer with tunable constants.
///
/// The constants only shape processing order. One matcher run uses a
/// single scorer, so orderings stay reproducible.
#[derive(Debug, Clone, PartialEq)]
pub struct IsolationScorer {
    stranded: f64,
    peer_target: usize,
    peer_step: f64,
    deviation_scale: f64,
    missing_deviation: f64,
}

impl IsolationScorer {
    /// Creates a scorer with the default constants.
    pub fn new() -> Self {
        Self {
            stranded: 1000.0,
            peer_target: 10,
            peer_step: 10.0,
            deviation_scale: 0.5,
            missing_deviation: 50.0,
        }
    }

    /// Sets the score returned when no grade-compatible peer exists.
    pub fn with_stranded(mut self, stranded: f64) -> Self {
        self.stranded = stranded;
        self
    }

    /// Sets the peer count below which the step penalty applies, and its weight.
    pub fn with_peer_step(mut self, peer_target: usize, peer_step: f64) -> Self {
        self.peer_target = peer_target;
        self.peer_step = peer_step;
        self
    }

    /// Sets the median-deviation scale and the deviation used without same-grade peers.
    pub fn with_deviation(mut self, scale: f64, missing: f64) -> Self {
        self.deviation_scale = scale;
        self.missing_deviation = missing;
        self
    }

    /// Scores `participant` against `pool`.
    ///
    /// `pool` may contain the participant itself; it is never counted as
    /// its own peer.
    pub fn score(&self, participant: &Participant, pool: &[&Participant], max_weight: f64) -> f64 {
        let peers: Vec<&Participant> = pool
            .iter()
            .copied()
            .filter(|p| p.id != participant.id && p.grade.abs_diff(participant.grade) <= 1)
            .collect();

        if peers.is_empty() {
            return self.stranded;
        }

        let close = peers
            .iter()
            .filter(|p| (p.weight - participant.weight).abs() <= max_weight)
            .count();
        let peer_factor = self.peer_target.saturating_sub(close) as f64 * self.peer_step;

        let mut same_grade: Vec<f64> = pool
            .iter()
            .filter(|p| p.grade == participant.grade)
            .map(|p| p.weight)
            .collect();
        let deviation = match median(&mut same_grade) {
            Some(m) => (participant.weight - m).abs(),
            None => self.missing_deviation,
        };

        peer_factor + deviation * self.deviation_scale
    }

    /// Returns `pool` reordered most isolated first.
    ///
    /// Scores are computed once against the whole pool. Equal scores keep
    /// their pool order.
    pub fn order<'a>(&self, pool: &[&'a Participant], max_weight: f64) -> Vec<&'a Participant> {
        let mut scored: Vec<(f64, &'a Participant)> = pool
            .iter()
            .map(|&p| (self.score(p, pool, max_weight), p))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        scored.into_iter().map(|(_, p)| p).collect()
    }
}

impl Default for IsolationScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Median of `values`; averages the two middle values for even lengths.
fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}
