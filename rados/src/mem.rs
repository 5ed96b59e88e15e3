//! A pool simulated in memory.
//!
//! [`MemPool`] implements [`Backend`] following the status codes of `librados`, so an
//! [`IoContext`](crate::IoContext) behaves over it as it does over a real cluster as far as this
//! crate is concerned. It's meant for tests: nothing is persisted and there is no replication, so
//! the counters about missing, unfound and degraded objects are always zero.
//!
//! Objects cannot grow beyond [`MAX_OBJECT_SIZE`] bytes, or the limit passed to
//! [`MemPool::with_max_object_size`]; writes and truncations past it fail with `-EFBIG`, like
//! a cluster enforcing `osd_max_object_size` does.
//!
//! Snapshots capture the pool when they are created, for both pool and self-managed snapshots.
//! As in a real pool, once a pool has a snapshot of one kind it refuses snapshots of the other
//! one with `-EINVAL`.
//!
//! ```
//! use rados::mem::MemPool;
//! use rados::IoContext;
//!
//! let ioctx = IoContext::new(MemPool::new("data").unwrap());
//! ioctx.write("greeting", b"hello", 0).unwrap();
//!
//! let mut buf = [0u8; 5];
//! assert_eq!(ioctx.read("greeting", &mut buf, 0).unwrap(), 5);
//! assert_eq!(&buf, b"hello");
//! ```

use crate::backend::{status, Backend, ListCursor, RawResult};
use crate::stat::{ObjectStat, PoolStat};
use crate::{helpers, snapshot::SnapId, Result};

use std::collections::{BTreeMap, HashMap};
use std::ffi::{CStr, CString};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use parking_lot::Mutex;

/// The default maximum size of an object, which matches the default `osd_max_object_size` of a
/// cluster.
pub const MAX_OBJECT_SIZE: u64 = 128 << 20;

/// Identifies the primitive calls of a [`MemPool`] for counting them and injecting failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemOp {
    /// [`Backend::write`], [`Backend::write_full`] and [`Backend::append`].
    Write,
    /// [`Backend::read`].
    Read,
    /// [`Backend::remove`].
    Remove,
    /// [`Backend::trunc`].
    Trunc,
    /// [`Backend::stat`].
    Stat,
    /// [`Backend::pool_stat`].
    PoolStat,
    /// [`Backend::pool_name`].
    PoolName,
    /// [`Backend::list_open`].
    ListOpen,
    /// [`ListCursor::next_entry`].
    ListNext,
    /// Dropping a listing cursor. Failures cannot be injected into it.
    ListClose,
    /// Any snapshot call.
    Snap,
}

/// A pool simulated in memory.
///
/// Instances opened from the same pool through [`MemPool::open`] share its objects and
/// snapshots, but each of them has its own read snapshot like separate contexts of a real
/// cluster do.
#[derive(Debug)]
pub struct MemPool {
    state: Arc<Mutex<PoolState>>,
    read_snap: u64,
}

impl MemPool {
    /// Creates an empty pool named `name`.
    ///
    /// It returns an [`Error::InvalidArguments`](crate::Error::InvalidArguments) if `name`
    /// contains a NUL byte because a real cluster cannot hold such a name.
    pub fn new(name: &str) -> Result<Self> {
        Self::with_max_object_size(name, MAX_OBJECT_SIZE)
    }

    /// Creates an empty pool named `name` whose objects cannot exceed `max_object_size` bytes.
    pub fn with_max_object_size(name: &str, max_object_size: u64) -> Result<Self> {
        helpers::cstring_from_str_fn_arg("name", name)?;

        Ok(MemPool {
            state: Arc::new(Mutex::new(PoolState::new(name, max_object_size))),
            read_snap: SnapId::HEAD.as_raw(),
        })
    }

    /// Returns another handle to the same pool that reads from the current data.
    pub fn open(&self) -> Self {
        MemPool {
            state: Arc::clone(&self.state),
            read_snap: SnapId::HEAD.as_raw(),
        }
    }

    /// Makes the next call identified by `op` to fail with the status `code` without doing
    /// anything. It affects the calls issued by any handle of the pool.
    ///
    /// `code` is returned as it is, so a non-negative one simulates a client that breaks the
    /// [`RawResult`] contract.
    pub fn fail_next(&self, op: MemOp, code: i32) {
        self.state.lock().faults.insert(op, code);
    }

    /// Returns how many calls identified by `op` the handles of the pool have issued, including
    /// the ones that have failed.
    pub fn calls(&self, op: MemOp) -> usize {
        self.state.lock().calls.get(&op).copied().unwrap_or(0)
    }
}

/// An object stored in the pool.
#[derive(Debug, Clone)]
struct Object {
    data: Vec<u8>,
    modified: Duration,
}

impl Object {
    fn empty() -> Self {
        Object {
            data: Vec::new(),
            modified: now(),
        }
    }

    fn touch(&mut self) {
        self.modified = now();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SnapMode {
    Pool,
    SelfManaged,
}

/// A point in time copy of the objects of the pool.
#[derive(Debug)]
struct Snap {
    /// Only pool snapshots have a name.
    name: Option<String>,
    objects: BTreeMap<String, Object>,
}

#[derive(Debug)]
struct PoolState {
    name: String,
    max_object_size: u64,
    objects: BTreeMap<String, Object>,
    snaps: BTreeMap<u64, Snap>,
    /// Fixed by the first snapshot; a pool never mixes both kinds.
    snap_mode: Option<SnapMode>,
    snap_seq: u64,
    num_rd: u64,
    rd_bytes: u64,
    num_wr: u64,
    wr_bytes: u64,
    faults: HashMap<MemOp, i32>,
    calls: HashMap<MemOp, usize>,
}

impl PoolState {
    fn new(name: &str, max_object_size: u64) -> Self {
        PoolState {
            name: String::from(name),
            max_object_size,
            objects: BTreeMap::new(),
            snaps: BTreeMap::new(),
            snap_mode: None,
            snap_seq: 0,
            num_rd: 0,
            rd_bytes: 0,
            num_wr: 0,
            wr_bytes: 0,
            faults: HashMap::new(),
            calls: HashMap::new(),
        }
    }

    /// Accounts a call of `op` and returns the injected failure if there is one.
    fn enter(&mut self, op: MemOp) -> RawResult<()> {
        *self.calls.entry(op).or_insert(0) += 1;
        match self.faults.remove(&op) {
            Some(code) => Err(code),
            None => Ok(()),
        }
    }

    /// Checks that an object of `size` bytes fits in the pool.
    fn check_size(&self, size: u64) -> RawResult<usize> {
        if size > self.max_object_size {
            return Err(-libc::EFBIG);
        }
        usize::try_from(size).map_err(|_| -libc::EFBIG)
    }

    fn object_mut(&mut self, oid: &CStr) -> RawResult<&mut Object> {
        self.objects.get_mut(&key(oid)?).ok_or(-libc::ENOENT)
    }

    /// Returns the objects as they are seen from the snapshot `snap`.
    fn view(&self, snap: u64) -> RawResult<&BTreeMap<String, Object>> {
        if snap == SnapId::HEAD.as_raw() {
            return Ok(&self.objects);
        }

        self.snaps
            .get(&snap)
            .map(|s| &s.objects)
            .ok_or(-libc::ENOENT)
    }

    fn write_at(&mut self, oid: &CStr, buf: &[u8], off: u64) -> RawResult<()> {
        let end = off.checked_add(buf.len() as u64).ok_or(-libc::EFBIG)?;
        let end = self.check_size(end)?;
        let off = end - buf.len();

        let obj = self.objects.entry(key(oid)?).or_insert_with(Object::empty);
        if obj.data.len() < end {
            obj.data.resize(end, 0);
        }
        obj.data[off..end].copy_from_slice(buf);
        obj.touch();

        self.num_wr += 1;
        self.wr_bytes += buf.len() as u64;
        Ok(())
    }

    fn snap_by_name(&self, name: &CStr) -> RawResult<u64> {
        let name = name.to_str().map_err(|_| -libc::EINVAL)?;
        self.snaps
            .iter()
            .find(|(_, s)| s.name.as_deref() == Some(name))
            .map(|(id, _)| *id)
            .ok_or(-libc::ENOENT)
    }

    fn take_snap(&mut self, mode: SnapMode, name: Option<String>) -> RawResult<u64> {
        match self.snap_mode {
            Some(m) if m != mode => return Err(-libc::EINVAL),
            _ => self.snap_mode = Some(mode),
        }

        self.snap_seq += 1;
        let id = self.snap_seq;
        self.snaps.insert(
            id,
            Snap {
                name,
                objects: self.objects.clone(),
            },
        );
        Ok(id)
    }

    fn rollback(&mut self, oid: &CStr, snap: u64) -> RawResult<()> {
        let oid = key(oid)?;
        let snap = self.snaps.get(&snap).ok_or(-libc::ENOENT)?;
        match snap.objects.get(&oid).cloned() {
            Some(mut obj) => {
                obj.touch();
                self.objects.insert(oid, obj);
            }
            // The object didn't exist when the snapshot was taken.
            None => {
                self.objects.remove(&oid);
            }
        }

        Ok(())
    }
}

impl Backend for MemPool {
    type Cursor<'a> = MemCursor;

    fn write(&self, oid: &CStr, buf: &[u8], off: u64) -> RawResult<()> {
        let mut state = self.state.lock();
        state.enter(MemOp::Write)?;
        state.write_at(oid, buf, off)
    }

    fn write_full(&self, oid: &CStr, buf: &[u8]) -> RawResult<()> {
        let mut state = self.state.lock();
        state.enter(MemOp::Write)?;
        state.check_size(buf.len() as u64)?;
        state.objects.insert(
            key(oid)?,
            Object {
                data: buf.to_vec(),
                modified: now(),
            },
        );

        state.num_wr += 1;
        state.wr_bytes += buf.len() as u64;
        Ok(())
    }

    fn append(&self, oid: &CStr, buf: &[u8]) -> RawResult<()> {
        let mut state = self.state.lock();
        state.enter(MemOp::Write)?;
        let off = state
            .objects
            .get(&key(oid)?)
            .map_or(0, |o| o.data.len() as u64);
        state.write_at(oid, buf, off)
    }

    fn read(&self, oid: &CStr, buf: &mut [u8], off: u64) -> RawResult<usize> {
        let mut state = self.state.lock();
        state.enter(MemOp::Read)?;

        let n = {
            let objects = state.view(self.read_snap)?;
            let data = &objects.get(&key(oid)?).ok_or(-libc::ENOENT)?.data;
            let start = usize::try_from(off).map_or(data.len(), |o| o.min(data.len()));
            let n = buf.len().min(data.len() - start);
            buf[..n].copy_from_slice(&data[start..start + n]);
            n
        };

        state.num_rd += 1;
        state.rd_bytes += n as u64;
        Ok(n)
    }

    fn remove(&self, oid: &CStr) -> RawResult<()> {
        let mut state = self.state.lock();
        state.enter(MemOp::Remove)?;
        state
            .objects
            .remove(&key(oid)?)
            .map(|_| ())
            .ok_or(-libc::ENOENT)
    }

    fn trunc(&self, oid: &CStr, size: u64) -> RawResult<()> {
        let mut state = self.state.lock();
        state.enter(MemOp::Trunc)?;

        let size = state.check_size(size)?;
        let obj = state.objects.entry(key(oid)?).or_insert_with(Object::empty);
        obj.data.resize(size, 0);
        obj.touch();
        Ok(())
    }

    fn stat(&self, oid: &CStr) -> RawResult<ObjectStat> {
        let mut state = self.state.lock();
        state.enter(MemOp::Stat)?;

        let obj = state.object_mut(oid)?;
        Ok(ObjectStat {
            size: obj.data.len() as u64,
            modified: obj.modified,
        })
    }

    fn pool_stat(&self) -> RawResult<PoolStat> {
        let mut state = self.state.lock();
        state.enter(MemOp::PoolStat)?;

        let num_bytes = state.objects.values().map(|o| o.data.len() as u64).sum();
        let num_objects = state.objects.len() as u64;
        Ok(PoolStat {
            num_bytes,
            num_kb: kb(num_bytes),
            num_objects,
            num_object_clones: state.snaps.values().map(|s| s.objects.len() as u64).sum(),
            num_object_copies: num_objects,
            num_objects_missing_on_primary: 0,
            num_objects_unfound: 0,
            num_objects_degraded: 0,
            num_rd: state.num_rd,
            num_rd_kb: kb(state.rd_bytes),
            num_wr: state.num_wr,
            num_wr_kb: kb(state.wr_bytes),
        })
    }

    fn pool_name(&self, buf: &mut [u8]) -> RawResult<usize> {
        let mut state = self.state.lock();
        state.enter(MemOp::PoolName)?;

        let name = state.name.as_bytes();
        if name.len() >= buf.len() {
            return Err(status::BUFFER_TOO_SMALL);
        }

        buf[..name.len()].copy_from_slice(name);
        buf[name.len()] = 0;
        Ok(name.len())
    }

    fn list_open(&self) -> RawResult<Self::Cursor<'_>> {
        let mut state = self.state.lock();
        state.enter(MemOp::ListOpen)?;

        let names = state
            .objects
            .keys()
            .map(|k| CString::new(k.as_str()).map_err(|_| -libc::EINVAL))
            .collect::<RawResult<Vec<_>>>()?;
        Ok(MemCursor {
            state: Arc::clone(&self.state),
            names: names.into_iter(),
            current: None,
        })
    }

    fn snap_create(&self, name: &CStr) -> RawResult<()> {
        let mut state = self.state.lock();
        state.enter(MemOp::Snap)?;

        if state.snap_by_name(name).is_ok() {
            return Err(-libc::EEXIST);
        }
        let name = name.to_str().map_err(|_| -libc::EINVAL)?;
        state.take_snap(SnapMode::Pool, Some(String::from(name)))?;
        Ok(())
    }

    fn snap_remove(&self, name: &CStr) -> RawResult<()> {
        let mut state = self.state.lock();
        state.enter(MemOp::Snap)?;

        let id = state.snap_by_name(name)?;
        state.snaps.remove(&id);
        Ok(())
    }

    fn snap_rollback(&self, oid: &CStr, name: &CStr) -> RawResult<()> {
        let mut state = self.state.lock();
        state.enter(MemOp::Snap)?;

        let id = state.snap_by_name(name)?;
        state.rollback(oid, id)
    }

    fn snap_lookup(&self, name: &CStr) -> RawResult<u64> {
        let mut state = self.state.lock();
        state.enter(MemOp::Snap)?;
        state.snap_by_name(name)
    }

    fn selfmanaged_snap_create(&self) -> RawResult<u64> {
        let mut state = self.state.lock();
        state.enter(MemOp::Snap)?;
        state.take_snap(SnapMode::SelfManaged, None)
    }

    fn selfmanaged_snap_remove(&self, snap: u64) -> RawResult<()> {
        let mut state = self.state.lock();
        state.enter(MemOp::Snap)?;

        match state.snaps.get(&snap) {
            Some(s) if s.name.is_none() => {
                state.snaps.remove(&snap);
                Ok(())
            }
            _ => Err(-libc::ENOENT),
        }
    }

    fn selfmanaged_snap_rollback(&self, oid: &CStr, snap: u64) -> RawResult<()> {
        let mut state = self.state.lock();
        state.enter(MemOp::Snap)?;

        match state.snaps.get(&snap) {
            Some(s) if s.name.is_none() => state.rollback(oid, snap),
            _ => Err(-libc::ENOENT),
        }
    }

    fn snap_set_read(&mut self, snap: u64) {
        self.read_snap = snap;
    }
}

/// Listing cursor of a [`MemPool`].
///
/// It lists the objects that existed when it was opened.
#[derive(Debug)]
pub struct MemCursor {
    state: Arc<Mutex<PoolState>>,
    names: std::vec::IntoIter<CString>,
    current: Option<CString>,
}

impl ListCursor for MemCursor {
    fn next_entry(&mut self) -> RawResult<&CStr> {
        self.state.lock().enter(MemOp::ListNext)?;

        self.current = self.names.next();
        self.current.as_deref().ok_or(status::END_OF_LISTING)
    }
}

impl Drop for MemCursor {
    fn drop(&mut self) {
        *self.state.lock().calls.entry(MemOp::ListClose).or_insert(0) += 1;
    }
}

/// Object names reach the pool as C strings built from `&str` values.
fn key(oid: &CStr) -> RawResult<String> {
    oid.to_str().map(String::from).map_err(|_| -libc::EINVAL)
}

fn kb(bytes: u64) -> u64 {
    bytes.div_ceil(1024)
}

fn now() -> Duration {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
}
