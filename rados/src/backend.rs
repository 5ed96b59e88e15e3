//! The primitive calls of the storage cluster that an [`IoContext`](crate::IoContext) is built on.
//!
//! A [`Backend`] is bound to exactly one pool and mirrors the calls of the native client: every
//! call returns the native status code untouched when it fails. The crate ships two
//! implementations, [`crate::mem::MemPool`] which simulates a pool in memory and, with the
//! `librados` feature, `crate::ffi::Librados` which calls into `librados`.
//!
//! Implementations must not retain any of the buffers that they receive beyond the call.

use crate::stat::{ObjectStat, PoolStat};

use std::ffi::CStr;

/// The outcome of a primitive call: a value or the status code that the native client returned.
///
/// Failure codes are negative `errno` values and they are surfaced to the caller verbatim. An
/// `Err(0)` breaks the contract; the binding turns it into an
/// [`Error::Internal`](crate::Error::Internal) rather than a cluster error.
pub type RawResult<T> = std::result::Result<T, i32>;

/// Status codes which have a meaning for the binding. Any other negative code is surfaced to the
/// caller without interpretation.
pub mod status {
    /// The buffer passed for copying a value back is too small.
    pub const BUFFER_TOO_SMALL: i32 = -libc::ERANGE;
    /// An object listing doesn't have more entries.
    pub const END_OF_LISTING: i32 = -libc::ENOENT;
}

/// Server side state of an object listing.
///
/// Dropping it releases the cursor.
pub trait ListCursor {
    /// Returns the name of the next object or [`status::END_OF_LISTING`] when there aren't more.
    ///
    /// The returned name is only valid until the following call.
    fn next_entry(&mut self) -> RawResult<&CStr>;
}

/// The primitive calls of the storage cluster for one pool.
///
/// Dropping a backend releases the underlying context; the cluster may reclaim its resources
/// later.
pub trait Backend {
    /// The listing cursor that [`Self::list_open`] returns. It cannot outlive the backend.
    type Cursor<'a>: ListCursor
    where
        Self: 'a;

    /// Writes `buf` into the object `oid` starting at `off`.
    fn write(&self, oid: &CStr, buf: &[u8], off: u64) -> RawResult<()>;
    /// Replaces the content of the object `oid` with `buf`.
    fn write_full(&self, oid: &CStr, buf: &[u8]) -> RawResult<()>;
    /// Appends `buf` to the object `oid`.
    fn append(&self, oid: &CStr, buf: &[u8]) -> RawResult<()>;
    /// Reads up to `buf.len()` bytes of the object `oid` starting at `off` and returns how many
    /// were read.
    fn read(&self, oid: &CStr, buf: &mut [u8], off: u64) -> RawResult<usize>;
    /// Removes the object `oid`.
    fn remove(&self, oid: &CStr) -> RawResult<()>;
    /// Resizes the object `oid` to `size` bytes.
    fn trunc(&self, oid: &CStr, size: u64) -> RawResult<()>;
    /// Returns the size and modification time of the object `oid`.
    fn stat(&self, oid: &CStr) -> RawResult<ObjectStat>;

    /// Returns the statistics of the pool.
    fn pool_stat(&self) -> RawResult<PoolStat>;
    /// Copies the NUL terminated pool name into `buf` and returns its length without the NUL
    /// byte, or [`status::BUFFER_TOO_SMALL`] if it doesn't fit.
    fn pool_name(&self, buf: &mut [u8]) -> RawResult<usize>;

    /// Opens a cursor for listing the objects of the pool.
    fn list_open(&self) -> RawResult<Self::Cursor<'_>>;

    /// Creates the pool snapshot `name`.
    fn snap_create(&self, name: &CStr) -> RawResult<()>;
    /// Removes the pool snapshot `name`.
    fn snap_remove(&self, name: &CStr) -> RawResult<()>;
    /// Rolls back the object `oid` to its state in the pool snapshot `name`.
    fn snap_rollback(&self, oid: &CStr, name: &CStr) -> RawResult<()>;
    /// Returns the identifier of the pool snapshot `name`.
    fn snap_lookup(&self, name: &CStr) -> RawResult<u64>;

    /// Allocates a self-managed snapshot identifier.
    fn selfmanaged_snap_create(&self) -> RawResult<u64>;
    /// Removes the self-managed snapshot `snap`.
    fn selfmanaged_snap_remove(&self, snap: u64) -> RawResult<()>;
    /// Rolls back the object `oid` to its state in the self-managed snapshot `snap`.
    fn selfmanaged_snap_rollback(&self, oid: &CStr, snap: u64) -> RawResult<()>;

    /// Sets the snapshot from which the following reads are served.
    fn snap_set_read(&mut self, snap: u64);
}
