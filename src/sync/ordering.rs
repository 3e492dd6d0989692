/*!
 * Temporal ordering of resolved sync groups.
 *
 * Groups only share a basis for comparison when both have a primary side or
 * both have a secondary side, so ordering is a partial order. Groups are
 * placed by insertion and the result is checked for monotonic indices on
 * both sides.
 */

use crate::errors::SyncError;
use crate::sync::resolver::SyncGroup;

/// Outcome of comparing two groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOrdering {
    Less,
    Greater,
    Incomparable,
}

fn compare_indices(left: usize, right: usize) -> GroupOrdering {
    match left.cmp(&right) {
        std::cmp::Ordering::Less => GroupOrdering::Less,
        std::cmp::Ordering::Greater => GroupOrdering::Greater,
        // Partitioned groups never share an index
        std::cmp::Ordering::Equal => GroupOrdering::Incomparable,
    }
}

/// Compare by first primary index when both groups have one, otherwise by
/// first secondary index.
pub fn compare_groups(left: &SyncGroup, right: &SyncGroup) -> GroupOrdering {
    if let (Some(l), Some(r)) = (left.min_primary(), right.min_primary()) {
        return compare_indices(l, r);
    }
    if let (Some(l), Some(r)) = (left.min_secondary(), right.min_secondary()) {
        return compare_indices(l, r);
    }
    GroupOrdering::Incomparable
}

/// Arrange groups so primary and secondary indices both increase.
///
/// Each group is inserted before the first placed group it sorts before;
/// incomparable neighbours are skipped. Errors carry block index 0.
pub fn order_groups(groups: Vec<SyncGroup>) -> Result<Vec<SyncGroup>, SyncError> {
    let mut ordered: Vec<SyncGroup> = Vec::with_capacity(groups.len());

    for group in groups {
        let position = ordered
            .iter()
            .position(|placed| compare_groups(&group, placed) == GroupOrdering::Less)
            .unwrap_or(ordered.len());
        ordered.insert(position, group);
    }

    verify_monotonic(&ordered)?;
    Ok(ordered)
}

fn verify_monotonic(ordered: &[SyncGroup]) -> Result<(), SyncError> {
    let mut last_primary: Option<usize> = None;
    let mut last_secondary: Option<usize> = None;

    for group in ordered {
        let primary_ok = advances(&group.primary, &mut last_primary);
        let secondary_ok = advances(&group.secondary, &mut last_secondary);

        if !primary_ok || !secondary_ok {
            return Err(SyncError::InconsistentOrdering {
                block: 0,
                a_indices: group.primary.clone(),
                b_indices: group.secondary.clone(),
            });
        }
    }

    Ok(())
}

/// Check that `indices` strictly continue after `last`, then move `last`.
fn advances(indices: &[usize], last: &mut Option<usize>) -> bool {
    for &index in indices {
        if last.is_some_and(|previous| index <= previous) {
            return false;
        }
        *last = Some(index);
    }
    true
}
