//! Snapshot identifiers.
//!
//! A pool can be snapshotted in two ways that never mix:
//!
//! * Pool snapshots are created, removed and rolled back by a name chosen by the caller. The
//!   identifier the cluster assigns to them is only needed for selecting them as the read snapshot
//!   (see [`IoContext::lookup_pool_snapshot`](crate::IoContext::lookup_pool_snapshot)).
//! * Self-managed snapshots don't have a name; the cluster allocates an identifier that the client
//!   must remember and eventually remove.

use std::fmt;

/// Opaque identifier of a snapshot.
///
/// It doesn't expose any numeric operation; it can only be compared and handed back to the
/// cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnapId(u64);

impl SnapId {
    /// Identifies the live version of the objects rather than a snapshot. Reads use it unless
    /// another snapshot is selected.
    pub const HEAD: SnapId = SnapId(u64::MAX - 1);

    pub(crate) fn from_raw(id: u64) -> Self {
        SnapId(id)
    }

    pub(crate) fn as_raw(self) -> u64 {
        self.0
    }

    /// Returns `true` when this is [`Self::HEAD`].
    pub fn is_head(&self) -> bool {
        *self == Self::HEAD
    }
}

impl fmt::Display for SnapId {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        if self.is_head() {
            write!(f, "head")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// A pool-wide snapshot resolved from its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSnapshot {
    /// The name of the snapshot.
    pub name: String,
    /// The identifier that the cluster assigned to it.
    pub id: SnapId,
}

/// A self-managed snapshot allocated by
/// [`IoContext::create_managed_snapshot`](crate::IoContext::create_managed_snapshot).
///
/// It isn't `Clone` because removing it with
/// [`IoContext::remove_managed_snapshot`](crate::IoContext::remove_managed_snapshot) consumes it.
#[derive(Debug, PartialEq, Eq)]
pub struct ManagedSnapshot {
    id: SnapId,
}

impl ManagedSnapshot {
    pub(crate) fn new(id: SnapId) -> Self {
        ManagedSnapshot { id }
    }

    /// Returns the identifier of this snapshot, for example to select it with
    /// [`IoContext::set_read_snapshot`](crate::IoContext::set_read_snapshot).
    pub fn id(&self) -> SnapId {
        self.id
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_snap_id_display() {
        assert_eq!(SnapId::HEAD.to_string(), "head");
        assert_eq!(SnapId::from_raw(7).to_string(), "7");
    }

    #[test]
    fn test_snap_id_head() {
        assert!(SnapId::HEAD.is_head());
        assert!(!SnapId::from_raw(1).is_head());
        assert_eq!(SnapId::HEAD.as_raw(), u64::MAX - 1, "same value than LIBRADOS_SNAP_HEAD");
    }
}
