//! Straggler absorption and swap-based redistribution.
//!
//! Runs after group formation on whatever the phases could not place.
//!
//! # Phase 7: absorption
//! Repeatedly commits the single best (participant, group) pair over all
//! stragglers and all groups with room, until no admissible pair is left.
//!
//! # Phase 8: swaps
//! For each remaining straggler: retry absorption, else look for a full
//! group where one member can be pulled out so that the straggler fits in
//! its place and the pulled member fits another group with room. The
//! cheapest swap (sum of both resulting weight spreads) wins. Stragglers
//! with no absorption and no swap stay unmatched.
//!
//! Admissibility everywhere is the emergency tolerance: grade ±2, the
//! maximum weight window, and the absolute school cap.

use std::iter;

use tracing::{debug, warn};

use super::builder::placement_score;
use crate::compat::{analyze, Tolerance};
use crate::models::{Group, Participant};

const GROUP_SIZE_PENALTY: f64 = 10.0;

/// A committed three-way move: `pulled` leaves `source` for `destination`,
/// and the straggler takes its place in `source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Swap {
    source: usize,
    pulled: u32,
    destination: usize,
}

/// Places leftover participants into existing groups.
#[derive(Debug, Clone)]
pub struct StragglerResolver {
    target_size: usize,
    limits: Tolerance,
}

impl StragglerResolver {
    /// Creates a resolver that never grows a group beyond `target_size`.
    pub fn new(target_size: usize) -> Self {
        Self {
            target_size,
            limits: Tolerance::EMERGENCY,
        }
    }

    /// Runs phases 7 and 8. Returns the participants still unmatched.
    pub fn resolve<'a>(
        &self,
        groups: &mut [Group],
        remaining: Vec<&'a Participant>,
    ) -> Vec<&'a Participant> {
        let remaining = self.absorb(groups, remaining);
        self.redistribute(groups, remaining)
    }

    /// Phase 7: commit the globally best absorption until none is admissible.
    pub fn absorb<'a>(
        &self,
        groups: &mut [Group],
        mut remaining: Vec<&'a Participant>,
    ) -> Vec<&'a Participant> {
        loop {
            let mut best: Option<(f64, usize, usize)> = None;
            for (pi, participant) in remaining.iter().enumerate() {
                if let Some((gi, score)) = self.best_fit(groups, participant) {
                    if best.map_or(true, |(best_score, _, _)| score < best_score) {
                        best = Some((score, pi, gi));
                    }
                }
            }

            let Some((_, pi, gi)) = best else {
                break;
            };
            let participant = remaining.remove(pi);
            debug!(
                event = "absorbed",
                participant = participant.id,
                group = groups[gi].id,
            );
            groups[gi].push(participant.clone());
        }

        remaining
    }

    /// Phase 8: absorption retry, then swaps; leftovers are reported.
    pub fn redistribute<'a>(
        &self,
        groups: &mut [Group],
        remaining: Vec<&'a Participant>,
    ) -> Vec<&'a Participant> {
        let mut unmatched = Vec::new();

        for participant in remaining {
            if let Some((gi, _)) = self.best_fit(groups, participant) {
                debug!(
                    event = "absorbed",
                    participant = participant.id,
                    group = groups[gi].id,
                );
                groups[gi].push(participant.clone());
                continue;
            }

            let swapped = self
                .best_swap(groups, participant)
                .is_some_and(|swap| self.apply_swap(groups, participant, swap));
            if !swapped {
                warn!(
                    event = "unmatched",
                    participant = participant.id,
                    grade = participant.grade,
                    weight = participant.weight,
                );
                unmatched.push(participant);
            }
        }

        unmatched
    }

    /// Best group with room for `participant`, with its score.
    fn best_fit(&self, groups: &[Group], participant: &Participant) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;

        for (gi, group) in groups.iter().enumerate() {
            if group.size() >= self.target_size {
                continue;
            }
            let after = analyze(group.members().iter().chain(iter::once(participant)));
            if !self.limits.admits(&after) {
                continue;
            }

            let school_taken = group.members().iter().any(|m| m.school == participant.school);
            let score = placement_score(school_taken, &after)
                + group.size() as f64 * GROUP_SIZE_PENALTY;
            if best.map_or(true, |(_, best_score)| score < best_score) {
                best = Some((gi, score));
            }
        }

        best
    }

    /// Cheapest admissible swap that makes room for `participant`.
    fn best_swap(&self, groups: &[Group], participant: &Participant) -> Option<Swap> {
        let mut best: Option<(f64, Swap)> = None;

        for (si, source) in groups.iter().enumerate() {
            if source.size() != self.target_size {
                continue;
            }

            for pulled in source.members() {
                let source_after = analyze(
                    source
                        .members()
                        .iter()
                        .filter(|m| m.id != pulled.id)
                        .chain(iter::once(participant)),
                );
                if !self.limits.admits(&source_after) {
                    continue;
                }

                for (di, destination) in groups.iter().enumerate() {
                    if di == si || destination.size() >= self.target_size {
                        continue;
                    }
                    let destination_after =
                        analyze(destination.members().iter().chain(iter::once(pulled)));
                    if !self.limits.admits(&destination_after) {
                        continue;
                    }

                    let cost = source_after.weight_spread + destination_after.weight_spread;
                    if best.map_or(true, |(best_cost, _)| cost < best_cost) {
                        best = Some((
                            cost,
                            Swap {
                                source: si,
                                pulled: pulled.id,
                                destination: di,
                            },
                        ));
                    }
                }
            }
        }

        best.map(|(_, swap)| swap)
    }

    fn apply_swap(&self, groups: &mut [Group], participant: &Participant, swap: Swap) -> bool {
        let Some(pulled) = groups[swap.source].remove(swap.pulled) else {
            return false;
        };
        debug!(
            event = "swapped",
            participant = participant.id,
            pulled = pulled.id,
            source = groups[swap.source].id,
            destination = groups[swap.destination].id,
        );
        groups[swap.source].push(participant.clone());
        groups[swap.destination].push(pulled);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Relaxation;

    fn p(id: u32, grade: i32, weight: f64, school: &str) -> Participant {
        Participant::new(id, grade, weight).with_school(school)
    }

    fn ids(group: &Group) -> Vec<u32> {
        group.members().iter().map(|m| m.id).collect()
    }

    #[test]
    fn test_absorb_prefers_new_school() {
        let mut groups = vec![
            Group::new(0, vec![p(1, 3, 60.0, "A"), p(2, 3, 61.0, "B"), p(3, 3, 62.0, "C")]),
            Group::new(1, vec![p(4, 3, 70.0, "D"), p(5, 3, 71.0, "E"), p(6, 3, 72.0, "F")]),
        ];
        // Closer in weight to group 0, but its school is already there.
        let straggler = p(7, 3, 63.0, "A");

        let left = StragglerResolver::new(4).absorb(&mut groups, vec![&straggler]);
        assert!(left.is_empty());
        assert_eq!(ids(&groups[1]), vec![4, 5, 6, 7]);
    }

    #[test]
    fn test_absorb_never_exceeds_target() {
        let mut groups = vec![Group::new(
            0,
            vec![p(1, 3, 60.0, "A"), p(2, 3, 61.0, "B"), p(3, 3, 62.0, "C")],
        )];
        let s1 = p(4, 3, 60.5, "D");
        let s2 = p(5, 3, 61.5, "E");

        let left = StragglerResolver::new(4).absorb(&mut groups, vec![&s1, &s2]);
        assert_eq!(groups[0].size(), 4);
        assert_eq!(left.len(), 1);
    }

    #[test]
    fn test_absorb_picks_global_best_pair() {
        let mut groups = vec![Group::new(
            0,
            vec![p(1, 3, 60.0, "A"), p(2, 3, 61.0, "B"), p(3, 3, 62.0, "C")],
        )];
        let far = p(4, 3, 80.0, "D");
        let near = p(5, 3, 61.5, "E");

        let left = StragglerResolver::new(4).absorb(&mut groups, vec![&far, &near]);
        assert_eq!(left[0].id, 4);
        assert!(groups[0].contains(5));
    }

    #[test]
    fn test_absorb_respects_grade_bound() {
        let mut groups = vec![Group::new(
            0,
            vec![p(1, 3, 60.0, "A"), p(2, 3, 61.0, "B"), p(3, 3, 62.0, "C")],
        )];
        let older = p(4, 6, 61.0, "D");

        let left = StragglerResolver::new(4).absorb(&mut groups, vec![&older]);
        assert_eq!(left.len(), 1);
        assert_eq!(groups[0].size(), 3);
    }

    #[test]
    fn test_swap_makes_room() {
        let mut groups = vec![
            Group::new(
                0,
                vec![
                    p(1, 3, 60.0, "S1"),
                    p(2, 3, 62.0, "S2"),
                    p(3, 3, 64.0, "S3"),
                    p(4, 5, 63.0, "S4"),
                ],
            ),
            Group::new(
                1,
                vec![p(5, 5, 63.0, "S5"), p(6, 5, 65.0, "S6"), p(7, 6, 64.0, "S7")],
            ),
        ];
        let straggler = p(8, 3, 61.0, "S8");

        let left = StragglerResolver::new(4).resolve(&mut groups, vec![&straggler]);
        assert!(left.is_empty());
        assert_eq!(ids(&groups[0]), vec![1, 2, 3, 8]);
        assert_eq!(ids(&groups[1]), vec![5, 6, 7, 4]);
        assert!(!groups[0].has_relaxation(Relaxation::Grade));
        assert!(!groups[1].has_relaxation(Relaxation::Grade));
    }

    #[test]
    fn test_no_swap_leaves_unmatched() {
        let mut groups = vec![Group::new(
            0,
            vec![
                p(1, 3, 60.0, "A"),
                p(2, 3, 61.0, "B"),
                p(3, 3, 62.0, "C"),
                p(4, 3, 63.0, "D"),
            ],
        )];
        let straggler = p(5, 3, 61.0, "E");

        let left = StragglerResolver::new(4).resolve(&mut groups, vec![&straggler]);
        assert_eq!(left.len(), 1);
        assert_eq!(groups[0].size(), 4);
    }
}
