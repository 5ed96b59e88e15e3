//! Idiomatic and safe Rust binding for the Ceph RADOS object I/O context.
//!
//! An [`IoContext`] issues synchronous object operations against the pool that its
//! [`Backend`](backend::Backend) is bound to: byte range I/O, pool statistics, object listing and
//! snapshots. With the `librados` feature the backend is `librados` (see `ffi`); the
//! [`mem`] backend simulates a pool in memory.
//!
//! ```
//! use rados::mem::MemPool;
//! use rados::IoContext;
//!
//! let mut ioctx = IoContext::new(MemPool::new("data").unwrap());
//! ioctx.write_full("report", b"draft").unwrap();
//!
//! let snap = ioctx.create_managed_snapshot().unwrap();
//! ioctx.write_full("report", b"final").unwrap();
//!
//! ioctx.set_read_snapshot(snap.id());
//! let mut buf = [0u8; 5];
//! ioctx.read("report", &mut buf, 0).unwrap();
//! assert_eq!(&buf, b"draft");
//! ```

#![deny(missing_docs)]

pub(crate) mod config;
pub(crate) mod helpers;
pub(crate) mod ioctx;

pub mod backend;
#[cfg(doc)]
pub mod docs;
pub mod error;
#[cfg(feature = "librados")]
pub mod ffi;
pub mod mem;
pub mod snapshot;
pub mod stat;

pub use config::Config;
pub use error::Error;
pub use ioctx::{IoContext, ObjectIter};
pub use snapshot::{ManagedSnapshot, PoolSnapshot, SnapId};
pub use stat::{ObjectStat, PoolStat};

/// A specialized [`Result`](https://doc.rust-lang.org/std/result/enum.Result.html)
/// type for RADOS operations.
///
/// This type is broadly used across this crate for any operations which may
/// produce an error.
///
/// This type is generally used to avoid writing out `rados::Error`
/// directly and reduce repetition making the signature functions more concise.
pub type Result<T> = std::result::Result<T, error::Error>;
