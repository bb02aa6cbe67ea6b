//! Face locks: a face may mirror the bay configuration of another face on the same layer

use std::collections::HashSet;

use crate::error::{reject, EditError};
use crate::model::{FaceId, FaceLockMap};

/// Follow lock pointers from `face` to the face whose facade is authoritative.
///
/// Stops at an unlocked face, a repeated face, or after `max_hops` hops.
pub fn resolve_master_face(locks: &FaceLockMap, face: FaceId, max_hops: usize) -> FaceId {
    let mut current = face;
    let mut visited = HashSet::from([face]);

    for _ in 0..max_hops {
        match locks.master_of(current) {
            Some(next) if visited.insert(next) => current = next,
            _ => break,
        }
    }
    current
}

/// Lock `face` to `master`, or unlock it when `master` is `None`
pub fn set_face_lock(
    locks: &mut FaceLockMap,
    face: FaceId,
    master: Option<FaceId>,
    max_hops: usize,
) -> Result<(), EditError> {
    if let Some(master) = master {
        if master == face {
            return reject(EditError::SelfLock(face));
        }
        if resolve_master_face(locks, master, max_hops) == face {
            return reject(EditError::LockCycle { face, master });
        }
    }

    locks.set(face, master);
    tracing::debug!(face = %face, master = ?master, "face lock updated");
    Ok(())
}

/// First face whose lock chain leads back to itself, self-locks included
pub fn find_lock_cycle(locks: &FaceLockMap) -> Option<FaceId> {
    FaceId::ALL.into_iter().find(|&face| {
        let mut current = face;
        for _ in 0..FaceId::ALL.len() {
            match locks.master_of(current) {
                Some(next) if next == face => return true,
                Some(next) => current = next,
                None => return false,
            }
        }
        false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlocked_face_is_its_own_master() {
        let locks = FaceLockMap::new();
        assert_eq!(resolve_master_face(&locks, FaceId::B, 4), FaceId::B);
    }

    #[test]
    fn test_chain_resolves_to_end() {
        let mut locks = FaceLockMap::new();
        set_face_lock(&mut locks, FaceId::C, Some(FaceId::A), 4).unwrap();
        set_face_lock(&mut locks, FaceId::D, Some(FaceId::C), 4).unwrap();
        assert_eq!(resolve_master_face(&locks, FaceId::D, 4), FaceId::A);
    }

    #[test]
    fn test_self_lock_rejected() {
        let mut locks = FaceLockMap::new();
        assert_eq!(
            set_face_lock(&mut locks, FaceId::A, Some(FaceId::A), 4).unwrap_err(),
            EditError::SelfLock(FaceId::A)
        );
    }

    #[test]
    fn test_lock_cycle_rejected() {
        let mut locks = FaceLockMap::new();
        set_face_lock(&mut locks, FaceId::B, Some(FaceId::A), 4).unwrap();
        let err = set_face_lock(&mut locks, FaceId::A, Some(FaceId::B), 4).unwrap_err();
        assert!(matches!(err, EditError::LockCycle { .. }));
        assert_eq!(locks.master_of(FaceId::A), None);
    }

    #[test]
    fn test_malformed_cycle_terminates() {
        let mut locks = FaceLockMap::new();
        locks.set(FaceId::A, Some(FaceId::B));
        locks.set(FaceId::B, Some(FaceId::A));
        let master = resolve_master_face(&locks, FaceId::A, 4);
        assert!(master == FaceId::A || master == FaceId::B);
    }

    #[test]
    fn test_find_lock_cycle() {
        let mut locks = FaceLockMap::new();
        set_face_lock(&mut locks, FaceId::C, Some(FaceId::A), 4).unwrap();
        assert_eq!(find_lock_cycle(&locks), None);

        locks.set(FaceId::A, Some(FaceId::D));
        locks.set(FaceId::D, Some(FaceId::C));
        assert_eq!(find_lock_cycle(&locks), Some(FaceId::A));
    }
}
