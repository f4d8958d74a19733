//! Event model.
//!
//! An event owns the finished groups and the participants that could not
//! be placed. Every participant sits in exactly one group or in the
//! unmatched list. Manual edits move participants between the two while
//! keeping that partition and the recorded flags intact.

use serde::{Deserialize, Serialize};

use super::{Group, Participant};
use crate::error::BracketError;

/// A grouped tournament event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    /// Free-form date string.
    pub date: String,
    pub mat_count: u32,
    /// Target participants per group.
    pub group_size: usize,
    pub groups: Vec<Group>,
    /// Participants that could not be placed.
    pub unmatched: Vec<Participant>,
}

impl Event {
    /// Creates an event with no groups.
    pub fn new(
        name: impl Into<String>,
        date: impl Into<String>,
        mat_count: u32,
        group_size: usize,
    ) -> Self {
        Self {
            name: name.into(),
            date: date.into(),
            mat_count,
            group_size,
            groups: Vec::new(),
            unmatched: Vec::new(),
        }
    }

    /// Finds a group by id.
    pub fn group(&self, group_id: usize) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    /// Participants across all groups plus the unmatched list.
    pub fn total_participants(&self) -> usize {
        self.groups.iter().map(Group::size).sum::<usize>() + self.unmatched.len()
    }

    /// Moves a member out of a group into the unmatched list.
    pub fn remove_participant(
        &mut self,
        group_id: usize,
        participant_id: u32,
    ) -> Result<&Group, BracketError> {
        let idx = self.group_index(group_id)?;
        let removed = self.groups[idx]
            .remove(participant_id)
            .ok_or(BracketError::ParticipantNotFound(participant_id))?;
        self.unmatched.push(removed);
        Ok(&self.groups[idx])
    }

    /// Moves an unmatched participant into a group.
    ///
    /// Fails when the group already holds `group_size` members.
    pub fn add_participant(
        &mut self,
        group_id: usize,
        participant_id: u32,
    ) -> Result<&Group, BracketError> {
        let idx = self.group_index(group_id)?;
        let pos = self
            .unmatched
            .iter()
            .position(|p| p.id == participant_id)
            .ok_or(BracketError::ParticipantNotFound(participant_id))?;
        if self.groups[idx].size() >= self.group_size {
            return Err(BracketError::GroupFull {
                group_id,
                capacity: self.group_size,
            });
        }
        let participant = self.unmatched.remove(pos);
        self.groups[idx].push(participant);
        Ok(&self.groups[idx])
    }

    fn group_index(&self, group_id: usize) -> Result<usize, BracketError> {
        self.groups
            .iter()
            .position(|g| g.id == group_id)
            .ok_or(BracketError::GroupNotFound(group_id))
    }
}
