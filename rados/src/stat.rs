//! Pool and object statistics.

use std::time::Duration;

/// Statistics of a pool at the time they were requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStat {
    /// Space used in bytes.
    pub num_bytes: u64,
    /// Space used in KiB.
    pub num_kb: u64,
    /// Number of objects in the pool.
    pub num_objects: u64,
    /// Number of clones of objects.
    pub num_object_clones: u64,
    /// Number of objects multiplied by the number of replicas.
    pub num_object_copies: u64,
    /// Number of objects missing on the primary.
    pub num_objects_missing_on_primary: u64,
    /// Number of objects found on no OSD.
    pub num_objects_unfound: u64,
    /// Number of objects replicated fewer times than they should be (but found on at least one
    /// OSD).
    pub num_objects_degraded: u64,
    /// Number of read operations.
    pub num_rd: u64,
    /// KiB read.
    pub num_rd_kb: u64,
    /// Number of write operations.
    pub num_wr: u64,
    /// KiB written.
    pub num_wr_kb: u64,
}

/// Size and modification time of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectStat {
    /// Size in bytes.
    pub size: u64,
    /// Unix Epoch time when the object was last modified.
    pub modified: Duration,
}
