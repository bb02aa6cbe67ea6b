//! Bay groups: contiguous runs of bays repeated as one unit

use std::collections::HashSet;

use crate::error::{reject, EditError};
use crate::model::{BayGroup, BayId, Facade, GroupId, RepeatBounds, RepeatMax};

/// Facade-order indices of `ids`, de-duplicated and sorted. `Err` names the first unknown bay.
fn member_indices(facade: &Facade, ids: &[BayId]) -> Result<Vec<usize>, BayId> {
    let mut indices = Vec::with_capacity(ids.len());
    for id in ids {
        match facade.index_of(id) {
            Some(index) => indices.push(index),
            None => return Err(id.clone()),
        }
    }
    indices.sort_unstable();
    indices.dedup();
    Ok(indices)
}

fn is_contiguous(sorted: &[usize]) -> bool {
    sorted.windows(2).all(|pair| pair[1] == pair[0] + 1)
}

/// First `group_N` id not used by any group of the facade
fn next_group_id(facade: &Facade) -> GroupId {
    let used: HashSet<&str> = facade.groups.iter().map(|g| g.id.as_str()).collect();
    let mut serial = facade.groups.len() + 1;
    loop {
        let candidate = format!("group_{}", serial);
        if !used.contains(candidate.as_str()) {
            return GroupId(candidate);
        }
        serial += 1;
    }
}

/// Create a group from at least two distinct, contiguous, ungrouped bays.
///
/// Members are stored in facade order regardless of the order of `ids`.
pub fn create_group(facade: &mut Facade, ids: &[BayId]) -> Result<GroupId, EditError> {
    let indices = match member_indices(facade, ids) {
        Ok(indices) => indices,
        Err(missing) => return reject(EditError::UnknownBay(missing)),
    };
    if indices.len() < 2 {
        return reject(EditError::GroupTooSmall(indices.len()));
    }
    if !is_contiguous(&indices) {
        return reject(EditError::GroupNotContiguous);
    }

    let members: Vec<BayId> = indices.iter().map(|&i| facade.bays[i].id.clone()).collect();
    for member in &members {
        if let Some(existing) = facade.group_of(member) {
            return reject(EditError::GroupOverlap {
                bay: member.clone(),
                group: existing.id.clone(),
            });
        }
    }

    let id = next_group_id(facade);
    tracing::debug!(group = %id, members = members.len(), "bay group created");
    facade.groups.push(BayGroup {
        id: id.clone(),
        bays: members,
        repeat: RepeatBounds::default(),
    });
    Ok(id)
}

/// Delete a group. Removing an unknown group is a no-op.
pub fn remove_group(facade: &mut Facade, id: &GroupId) -> bool {
    let before = facade.groups.len();
    facade.groups.retain(|g| &g.id != id);
    let removed = facade.groups.len() != before;
    if removed {
        tracing::debug!(group = %id, "bay group removed");
    }
    removed
}

/// Set the repeat bounds of a group
pub fn set_group_repeat(
    facade: &mut Facade,
    id: &GroupId,
    min: u32,
    max: RepeatMax,
) -> Result<(), EditError> {
    if min < 1 {
        return reject(EditError::invalid_repeat("minimum repeats must be at least 1"));
    }
    if let RepeatMax::Count(max) = max {
        if max < min {
            return reject(EditError::invalid_repeat(format!(
                "maximum repeats {} is below minimum {}",
                max, min
            )));
        }
    }
    let Some(group) = facade.group_mut(id) else {
        return reject(EditError::UnknownGroup(id.clone()));
    };
    group.repeat = RepeatBounds { min, max };
    Ok(())
}

/// Re-check every group against the current bay order.
///
/// A group is dropped when a member is missing, fewer than two members remain,
/// or the members are no longer contiguous; otherwise its member list is
/// rewritten in facade order. Returns the ids of dropped groups.
pub fn revalidate_groups(facade: &mut Facade) -> Vec<GroupId> {
    let mut dropped = Vec::new();
    let mut claimed: HashSet<BayId> = HashSet::new();
    let mut kept = Vec::with_capacity(facade.groups.len());

    for mut group in std::mem::take(&mut facade.groups) {
        let indices = match member_indices(facade, &group.bays) {
            Ok(indices) if indices.len() >= 2 && is_contiguous(&indices) => indices,
            _ => {
                dropped.push(group.id);
                continue;
            }
        };

        let members: Vec<BayId> = indices.iter().map(|&i| facade.bays[i].id.clone()).collect();
        if members.iter().any(|m| claimed.contains(m)) {
            dropped.push(group.id);
            continue;
        }
        claimed.extend(members.iter().cloned());
        group.bays = members;
        kept.push(group);
    }

    facade.groups = kept;
    for id in &dropped {
        tracing::debug!(group = %id, "bay group dropped after bay change");
    }
    dropped
}

/// Revalidate groups after bays were reordered
pub fn on_bays_reordered(facade: &mut Facade) -> Vec<GroupId> {
    revalidate_groups(facade)
}

/// Revalidate groups after `bay` was removed from the facade
pub fn on_bay_deleted(facade: &mut Facade, bay: &BayId) -> Vec<GroupId> {
    tracing::debug!(bay = %bay, "revalidating groups after bay deletion");
    revalidate_groups(facade)
}

/// Width a group adds on top of its members' own minimums: one unit per extra repeat
pub fn extra_repeat_width(group: &BayGroup, unit_width: f64) -> f64 {
    unit_width * f64::from(group.repeat.min.saturating_sub(1))
}
