//! Bay link graph
//!
//! `link_from` pointers form a forest: every chain ends at an unlinked master.
//! Linking always points a bay at the root of its new master's chain and
//! redirects the bay's own slaves there too, so chains stay one hop deep.

use std::collections::HashSet;

use crate::error::{reject, EditError};
use crate::model::{BayId, Facade};

/// Walk `link_from` starting at `start` until an unlinked bay, a dangling
/// pointer, a repeated bay, or the hop bound. Returns the last bay reached.
pub fn resolve_link_root(facade: &Facade, start: &BayId, max_hops: usize) -> BayId {
    let mut current = start.clone();
    let mut visited = HashSet::new();
    visited.insert(current.clone());

    for _ in 0..max_hops {
        let next = match facade.bay(&current).and_then(|b| b.link_from.as_ref()) {
            Some(next) => next,
            None => break,
        };
        if !facade.contains_bay(next) || !visited.insert(next.clone()) {
            break;
        }
        current = next.clone();
    }
    current
}

/// Link `bay` to `master`, or clear its link when `master` is `None`.
///
/// Rejects self-links, unknown masters, and links whose chain would lead back
/// to `bay`. On success the bay and its former slaves all point at the root of
/// `master`'s chain, and the bay's own wall material override is dropped.
pub fn set_link(
    facade: &mut Facade,
    bay: &BayId,
    master: Option<&BayId>,
    max_hops: usize,
) -> Result<(), EditError> {
    if !facade.contains_bay(bay) {
        return reject(EditError::UnknownBay(bay.clone()));
    }

    let Some(master) = master else {
        if let Some(target) = facade.bay_mut(bay) {
            target.link_from = None;
        }
        tracing::debug!(bay = %bay, "bay link cleared");
        return Ok(());
    };

    if master == bay {
        return reject(EditError::SelfLink(bay.clone()));
    }
    if !facade.contains_bay(master) {
        return reject(EditError::UnknownBay(master.clone()));
    }

    let root = resolve_link_root(facade, master, max_hops);
    if &root == bay {
        return reject(EditError::LinkCycle {
            bay: bay.clone(),
            master: master.clone(),
        });
    }

    for other in facade.bays.iter_mut() {
        if &other.id == bay {
            other.link_from = Some(root.clone());
            other.wall_material_override = None;
        } else if other.link_from.as_ref() == Some(bay) {
            other.link_from = Some(root.clone());
        }
    }

    tracing::debug!(bay = %bay, master = %master, root = %root, "bay linked");
    Ok(())
}

/// Reject a direct edit of a linked bay
pub fn ensure_editable(facade: &Facade, bay: &BayId, max_hops: usize) -> Result<(), EditError> {
    let Some(target) = facade.bay(bay) else {
        return reject(EditError::UnknownBay(bay.clone()));
    };
    if target.is_linked() {
        return reject(EditError::LinkedBayReadOnly {
            bay: bay.clone(),
            source_bay: resolve_link_root(facade, bay, max_hops),
        });
    }
    Ok(())
}

/// Clear every link pointing at `bay`
pub(crate) fn unlink_slaves(facade: &mut Facade, bay: &BayId) {
    for other in facade.bays.iter_mut() {
        if other.link_from.as_ref() == Some(bay) {
            other.link_from = None;
        }
    }
}

/// First bay whose `link_from` chain leads back to itself, self-links included
pub fn find_link_cycle(facade: &Facade) -> Option<BayId> {
    facade.bays.iter().find_map(|start| {
        let mut visited = HashSet::new();
        let mut current = &start.id;
        while let Some(next) = facade.bay(current).and_then(|b| b.link_from.as_ref()) {
            if next == &start.id {
                return Some(start.id.clone());
            }
            if !visited.insert(next) {
                break;
            }
            current = next;
        }
        None
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Bay;

    const HOPS: usize = 32;

    fn id(s: &str) -> BayId {
        BayId::from(s)
    }

    fn facade(ids: &[&str]) -> Facade {
        Facade::with_bays(ids.iter().map(|i| Bay::range(*i, 1.0, None)).collect())
    }

    fn link_of(facade: &Facade, bay: &str) -> Option<BayId> {
        facade.bay(&id(bay)).unwrap().link_from.clone()
    }

    #[test]
    fn test_link_and_clear() {
        let mut f = facade(&["a", "b"]);
        set_link(&mut f, &id("b"), Some(&id("a")), HOPS).unwrap();
        assert_eq!(link_of(&f, "b"), Some(id("a")));

        set_link(&mut f, &id("b"), None, HOPS).unwrap();
        assert_eq!(link_of(&f, "b"), None);
    }

    #[test]
    fn test_self_link_rejected() {
        let mut f = facade(&["a"]);
        let err = set_link(&mut f, &id("a"), Some(&id("a")), HOPS).unwrap_err();
        assert_eq!(err, EditError::SelfLink(id("a")));
        assert_eq!(link_of(&f, "a"), None);
    }

    #[test]
    fn test_unknown_master_rejected() {
        let mut f = facade(&["a"]);
        let err = set_link(&mut f, &id("a"), Some(&id("zz")), HOPS).unwrap_err();
        assert_eq!(err, EditError::UnknownBay(id("zz")));
    }

    #[test]
    fn test_link_targets_chain_root() {
        let mut f = facade(&["a", "b", "c"]);
        f.bays[1].link_from = Some(id("a"));
        set_link(&mut f, &id("c"), Some(&id("b")), HOPS).unwrap();
        assert_eq!(link_of(&f, "c"), Some(id("a")));
    }

    #[test]
    fn test_cycle_rejected_without_changes() {
        let mut f = facade(&["a", "b", "c"]);
        f.bays[1].link_from = Some(id("a"));
        f.bays[2].link_from = Some(id("b"));
        let before = f.clone();

        let err = set_link(&mut f, &id("a"), Some(&id("c")), HOPS).unwrap_err();
        assert!(matches!(err, EditError::LinkCycle { .. }));
        assert_eq!(f, before);
    }

    #[test]
    fn test_slaves_redirected_to_new_root() {
        let mut f = facade(&["a", "b", "c"]);
        set_link(&mut f, &id("c"), Some(&id("b")), HOPS).unwrap();
        set_link(&mut f, &id("b"), Some(&id("a")), HOPS).unwrap();
        assert_eq!(link_of(&f, "b"), Some(id("a")));
        assert_eq!(link_of(&f, "c"), Some(id("a")));
    }

    #[test]
    fn test_link_drops_material_override() {
        let mut f = facade(&["a", "b"]);
        f.bays[1].wall_material_override = Some("brick".to_string());
        set_link(&mut f, &id("b"), Some(&id("a")), HOPS).unwrap();
        assert_eq!(f.bays[1].wall_material_override, None);
    }

    #[test]
    fn test_root_walk_survives_malformed_cycle() {
        let mut f = facade(&["a", "b"]);
        f.bays[0].link_from = Some(id("b"));
        f.bays[1].link_from = Some(id("a"));
        let root = resolve_link_root(&f, &id("a"), HOPS);
        assert!(root == id("a") || root == id("b"));
    }

    #[test]
    fn test_linked_bay_is_read_only() {
        let mut f = facade(&["a", "b"]);
        set_link(&mut f, &id("b"), Some(&id("a")), HOPS).unwrap();
        assert!(ensure_editable(&f, &id("a"), HOPS).is_ok());
        assert_eq!(
            ensure_editable(&f, &id("b"), HOPS).unwrap_err(),
            EditError::LinkedBayReadOnly {
                bay: id("b"),
                source_bay: id("a"),
            }
        );
    }

    #[test]
    fn test_find_link_cycle() {
        let mut f = facade(&["a", "b", "c"]);
        set_link(&mut f, &id("b"), Some(&id("a")), HOPS).unwrap();
        assert_eq!(find_link_cycle(&f), None);

        f.bays[0].link_from = Some(id("c"));
        f.bays[2].link_from = Some(id("b"));
        assert_eq!(find_link_cycle(&f), Some(id("a")));

        let mut lone = facade(&["x"]);
        lone.bays[0].link_from = Some(id("x"));
        assert_eq!(find_link_cycle(&lone), Some(id("x")));
    }
}
