//! Mat load balancing.
//!
//! Each group, in order, goes to the mat with the fewest groups so far;
//! ties go to the lowest mat. Loads therefore never differ by more than
//! one, whatever order the groups arrive in.

use crate::models::Group;

/// Assigns 1-based mat numbers. Does nothing when `mat_count` is zero.
pub fn assign_mats(groups: &mut [Group], mat_count: u32) {
    let mut loads = vec![0usize; mat_count as usize];

    for group in groups.iter_mut() {
        let Some(mat) = (0..loads.len()).min_by_key(|&m| loads[m]) else {
            return;
        };
        loads[mat] += 1;
        group.mat_number = Some(mat as u32 + 1);
    }
}

/// Groups per mat, index 0 = mat 1. Unassigned groups are not counted.
pub fn mat_loads(groups: &[Group], mat_count: u32) -> Vec<usize> {
    let mut loads = vec![0usize; mat_count as usize];
    for mat in groups.iter().filter_map(|g| g.mat_number) {
        if let Some(load) = (mat as usize).checked_sub(1).and_then(|i| loads.get_mut(i)) {
            *load += 1;
        }
    }
    loads
}
