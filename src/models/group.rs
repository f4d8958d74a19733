//! Group (bracket) model.
//!
//! A group is a small round-robin pool of participants sharing one mat.
//! Its relaxation flags are derived from its members: every mutation goes
//! through methods that re-analyze the membership, so the stored flags
//! always equal [`analyze`](crate::compat::analyze) of the current members.

use serde::{Deserialize, Serialize};

use super::Participant;
use crate::compat::analyze;

/// A baseline tolerance a group exceeds. Reporting only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Relaxation {
    /// Weight spread above the baseline.
    #[serde(rename = "weight_relaxed")]
    Weight,
    /// Grade spread above the baseline.
    #[serde(rename = "grade_relaxed")]
    Grade,
    /// More than one participant from the same school.
    #[serde(rename = "school_relaxed")]
    School,
}

impl Relaxation {
    /// Human-readable warning for display.
    pub fn warning(&self) -> &'static str {
        match self {
            Relaxation::Weight => "Weight constraint relaxed (>10lbs)",
            Relaxation::Grade => "Grade constraint relaxed (>±1)",
            Relaxation::School => "School constraint relaxed (same-school opponents)",
        }
    }
}

/// A bracket of participants competing round-robin.
///
/// Stored flags are ignored on deserialization and recomputed from the
/// members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "GroupRecord")]
pub struct Group {
    /// Creation index; see [`Group::letter_label`].
    pub id: usize,
    members: Vec<Participant>,
    /// 1-based mat number, set by mat assignment.
    pub mat_number: Option<u32>,
    relaxations: Vec<Relaxation>,
}

/// Serialized form of a [`Group`], without its derived flags.
#[derive(Deserialize)]
struct GroupRecord {
    id: usize,
    members: Vec<Participant>,
    #[serde(default)]
    mat_number: Option<u32>,
}

impl From<GroupRecord> for Group {
    fn from(record: GroupRecord) -> Self {
        let mut group = Group::new(record.id, record.members);
        group.mat_number = record.mat_number;
        group
    }
}

impl Group {
    /// Creates a group and records its relaxation flags.
    pub fn new(id: usize, members: Vec<Participant>) -> Self {
        let mut group = Self {
            id,
            members,
            mat_number: None,
            relaxations: Vec::new(),
        };
        group.refresh();
        group
    }

    /// Members in insertion order.
    pub fn members(&self) -> &[Participant] {
        &self.members
    }

    /// Recorded relaxation flags.
    pub fn relaxations(&self) -> &[Relaxation] {
        &self.relaxations
    }

    /// Whether a flag is recorded.
    pub fn has_relaxation(&self, relaxation: Relaxation) -> bool {
        self.relaxations.contains(&relaxation)
    }

    /// Appends a member.
    pub fn push(&mut self, participant: Participant) {
        self.members.push(participant);
        self.refresh();
    }

    /// Removes a member by participant id.
    pub fn remove(&mut self, participant_id: u32) -> Option<Participant> {
        let pos = self.members.iter().position(|m| m.id == participant_id)?;
        let removed = self.members.remove(pos);
        self.refresh();
        Some(removed)
    }

    /// Whether a participant is a member.
    pub fn contains(&self, participant_id: u32) -> bool {
        self.members.iter().any(|m| m.id == participant_id)
    }

    /// Number of members.
    #[inline]
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Spreadsheet-style label: 0 → "A", 25 → "Z", 26 → "AA".
    pub fn letter_label(&self) -> String {
        let mut n = self.id as i64;
        let mut label = Vec::new();
        loop {
            label.push(b'A' + (n % 26) as u8);
            n = n / 26 - 1;
            if n < 0 {
                break;
            }
        }
        label.reverse();
        String::from_utf8_lossy(&label).into_owned()
    }

    /// (min, max) weight, or `None` when empty.
    pub fn weight_range(&self) -> Option<(f64, f64)> {
        let first = self.members.first()?.weight;
        Some(self.members.iter().fold((first, first), |(lo, hi), m| {
            (lo.min(m.weight), hi.max(m.weight))
        }))
    }

    /// (min, max) grade, or `None` when empty.
    pub fn grade_range(&self) -> Option<(i32, i32)> {
        let lo = self.members.iter().map(|m| m.grade).min()?;
        let hi = self.members.iter().map(|m| m.grade).max()?;
        Some((lo, hi))
    }

    /// (min, max) rank, or `None` when empty.
    pub fn rank_range(&self) -> Option<(i32, i32)> {
        let lo = self.members.iter().map(|m| m.rank).min()?;
        let hi = self.members.iter().map(|m| m.rank).max()?;
        Some((lo, hi))
    }

    /// Warning texts for the recorded flags.
    pub fn warnings(&self) -> Vec<&'static str> {
        self.relaxations.iter().map(Relaxation::warning).collect()
    }

    /// Round-robin bouts ordered so competitors rest between matches.
    ///
    /// Circle method: the first member stays fixed while the others
    /// rotate one seat per round. Odd sizes get a bye seat, and any
    /// pairing with the bye is skipped.
    pub fn bout_order(&self) -> Vec<(&Participant, &Participant)> {
        let n = self.members.len();
        if n < 2 {
            return Vec::new();
        }

        let mut seats: Vec<Option<usize>> = (0..n).map(Some).collect();
        if n % 2 == 1 {
            seats.push(None);
        }
        let total = seats.len();
        let fixed = seats[0];
        let mut rotating: Vec<Option<usize>> = seats[1..].to_vec();
        let mut bouts = Vec::with_capacity(n * (n - 1) / 2);

        for _ in 0..total - 1 {
            if let (Some(a), Some(b)) = (fixed, rotating[0]) {
                bouts.push((&self.members[a], &self.members[b]));
            }
            for k in 1..total / 2 {
                if let (Some(a), Some(b)) = (rotating[k], rotating[rotating.len() - k]) {
                    bouts.push((&self.members[a], &self.members[b]));
                }
            }
            rotating.rotate_right(1);
        }

        bouts
    }

    fn refresh(&mut self) {
        self.relaxations = if self.members.is_empty() {
            Vec::new()
        } else {
            analyze(&self.members).violations()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(id: u32, grade: i32, weight: f64, school: &str) -> Participant {
        Participant::new(id, grade, weight).with_school(school)
    }

    #[test]
    fn test_flags_recorded_on_creation() {
        let g = Group::new(
            0,
            vec![p(1, 3, 60.0, "A"), p(2, 3, 75.0, "A"), p(3, 5, 62.0, "B")],
        );
        assert_eq!(
            g.relaxations(),
            &[Relaxation::Weight, Relaxation::Grade, Relaxation::School]
        );
    }

    #[test]
    fn test_flags_recomputed_on_mutation() {
        let mut g = Group::new(0, vec![p(1, 3, 60.0, "A"), p(2, 3, 62.0, "B")]);
        assert!(g.relaxations().is_empty());

        g.push(p(3, 3, 90.0, "C"));
        assert!(g.has_relaxation(Relaxation::Weight));

        let removed = g.remove(3).unwrap();
        assert_eq!(removed.id, 3);
        assert!(g.relaxations().is_empty());
        assert!(g.remove(42).is_none());
    }

    #[test]
    fn test_letter_label() {
        assert_eq!(Group::new(0, vec![]).letter_label(), "A");
        assert_eq!(Group::new(25, vec![]).letter_label(), "Z");
        assert_eq!(Group::new(26, vec![]).letter_label(), "AA");
        assert_eq!(Group::new(27, vec![]).letter_label(), "AB");
        assert_eq!(Group::new(701, vec![]).letter_label(), "ZZ");
        assert_eq!(Group::new(702, vec![]).letter_label(), "AAA");
    }

    #[test]
    fn test_ranges() {
        let g = Group::new(
            0,
            vec![
                p(1, 2, 55.0, "A").with_rank(3),
                p(2, 1, 58.5, "B").with_rank(1),
                p(3, 2, 51.0, "C").with_rank(4),
            ],
        );
        assert_eq!(g.weight_range(), Some((51.0, 58.5)));
        assert_eq!(g.grade_range(), Some((1, 2)));
        assert_eq!(g.rank_range(), Some((1, 4)));
        assert_eq!(Group::new(1, vec![]).weight_range(), None);
    }

    #[test]
    fn test_bout_order_four() {
        let g = Group::new(0, (1..=4).map(|i| p(i, 3, 60.0, "S")).collect());
        let ids: Vec<(u32, u32)> = g.bout_order().iter().map(|(a, b)| (a.id, b.id)).collect();
        assert_eq!(ids, vec![(1, 2), (3, 4), (1, 4), (2, 3), (1, 3), (4, 2)]);
    }

    #[test]
    fn test_bout_order_three_covers_all_pairs() {
        let g = Group::new(0, (1..=3).map(|i| p(i, 3, 60.0, "S")).collect());
        let bouts = g.bout_order();
        assert_eq!(bouts.len(), 3);
        // Every pairing appears exactly once.
        let mut pairs: Vec<(u32, u32)> = bouts
            .iter()
            .map(|(a, b)| (a.id.min(b.id), a.id.max(b.id)))
            .collect();
        pairs.sort();
        assert_eq!(pairs, vec![(1, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn test_bout_order_trivial() {
        assert!(Group::new(0, vec![p(1, 3, 60.0, "S")]).bout_order().is_empty());
    }

    #[test]
    fn test_warnings() {
        let g = Group::new(0, vec![p(1, 3, 60.0, "A"), p(2, 3, 61.0, "A")]);
        assert_eq!(g.warnings(), vec![Relaxation::School.warning()]);
    }

    #[test]
    fn test_deserialize_recomputes_flags() {
        let g = Group::new(0, vec![p(1, 3, 60.0, "A"), p(2, 3, 62.0, "B"), p(3, 3, 64.0, "C")]);
        let json = serde_json::to_string(&g).unwrap();
        assert!(json.contains(r#""relaxations":[]"#));

        let tampered = json.replace(
            r#""relaxations":[]"#,
            r#""relaxations":["weight_relaxed","school_relaxed"]"#,
        );
        let back: Group = serde_json::from_str(&tampered).unwrap();
        assert!(back.relaxations().is_empty());
        assert_eq!(back, g);

        let unflagged = r#"{"id":4,"members":[
            {"id":1,"first_name":"","last_name":"","grade":3,"weight":60.0,"rank":0,"school":"A"},
            {"id":2,"first_name":"","last_name":"","grade":3,"weight":61.0,"rank":0,"school":"A"}
        ],"mat_number":2}"#;
        let back: Group = serde_json::from_str(unflagged).unwrap();
        assert_eq!(back.mat_number, Some(2));
        assert_eq!(back.relaxations(), &[Relaxation::School]);
    }
}
