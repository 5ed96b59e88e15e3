//! Object I/O context.

use crate::backend::{status, Backend, ListCursor};
use crate::snapshot::{ManagedSnapshot, PoolSnapshot, SnapId};
use crate::stat::{ObjectStat, PoolStat};
use crate::{helpers, Config, Error, Result};

use std::ops::ControlFlow;

use log::{debug, trace};

/// A context for performing I/O within the pool that its backend is bound to.
///
/// An instance is used by one thread at a time: the methods that only issue calls take `&self`
/// and [`Self::set_read_snapshot`], which changes the state that those calls observe, takes
/// `&mut self`. Callers that need to share a context between threads must wrap it in a lock.
///
/// Dropping the context releases it in the same way that [`Self::destroy`] does.
#[derive(Debug)]
pub struct IoContext<B: Backend> {
    /// The backend that an instance of this struct represents and guards its life time until this
    /// instance drops.
    inner: B,
    config: Config,
    /// The snapshot that reads are served from; the backend doesn't expose it.
    read_snap: SnapId,
}

impl<B: Backend> IoContext<B> {
    /// Creates a context over `backend` with the default configuration.
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, Config::default())
    }

    /// Creates a context over `backend` with the specified configuration.
    pub fn with_config(backend: B, config: Config) -> Self {
        IoContext {
            inner: backend,
            config,
            read_snap: SnapId::HEAD,
        }
    }

    /// Returns the backend of this context.
    pub fn backend(&self) -> &B {
        &self.inner
    }

    /// Returns the configuration of this context.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Writes `data` into the object `oid` starting at byte `offset`.
    ///
    /// It overwrites the range that `data` covers without truncating the object. Writing empty
    /// data succeeds without contacting the cluster.
    pub fn write(&self, oid: &str, data: &[u8], offset: u64) -> Result<()> {
        let c_oid = helpers::cstring_from_str_fn_arg("oid", oid)?;
        if data.is_empty() {
            return Ok(());
        }

        trace!("write {} bytes to {:?} at offset {}", data.len(), oid, offset);
        self.inner
            .write(&c_oid, data, offset)
            .map_err(Error::new_rados)
    }

    /// Replaces the whole content of the object `oid` with `data`, creating it if it doesn't
    /// exist.
    pub fn write_full(&self, oid: &str, data: &[u8]) -> Result<()> {
        let c_oid = helpers::cstring_from_str_fn_arg("oid", oid)?;

        trace!("write full {} bytes to {:?}", data.len(), oid);
        self.inner
            .write_full(&c_oid, data)
            .map_err(Error::new_rados)
    }

    /// Appends `data` to the object `oid`. Appending empty data succeeds without contacting the
    /// cluster.
    pub fn append(&self, oid: &str, data: &[u8]) -> Result<()> {
        let c_oid = helpers::cstring_from_str_fn_arg("oid", oid)?;
        if data.is_empty() {
            return Ok(());
        }

        trace!("append {} bytes to {:?}", data.len(), oid);
        self.inner.append(&c_oid, data).map_err(Error::new_rados)
    }

    /// Reads up to `buf.len()` bytes from the object `oid` starting at byte `offset` and returns
    /// the number of bytes read, which is lower than requested when the object ends before.
    ///
    /// Reads observe the snapshot selected with [`Self::set_read_snapshot`]. An empty `buf`
    /// returns 0 without contacting the cluster.
    pub fn read(&self, oid: &str, buf: &mut [u8], offset: u64) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        let c_oid = helpers::cstring_from_str_fn_arg("oid", oid)?;

        trace!("read {} bytes from {:?} at offset {}", buf.len(), oid, offset);
        self.inner
            .read(&c_oid, buf, offset)
            .map_err(Error::new_rados)
    }

    /// Deletes the object `oid`.
    pub fn delete(&self, oid: &str) -> Result<()> {
        let c_oid = helpers::cstring_from_str_fn_arg("oid", oid)?;

        trace!("remove {:?}", oid);
        self.inner.remove(&c_oid).map_err(Error::new_rados)
    }

    /// Resizes the object `oid` to `size` bytes. Enlarging fills the new area with zeroes and
    /// shrinking discards the excess data.
    pub fn truncate(&self, oid: &str, size: u64) -> Result<()> {
        let c_oid = helpers::cstring_from_str_fn_arg("oid", oid)?;

        trace!("truncate {:?} to {} bytes", oid, size);
        self.inner.trunc(&c_oid, size).map_err(Error::new_rados)
    }

    /// Returns the size and the modification time of the object `oid`.
    pub fn stat(&self, oid: &str) -> Result<ObjectStat> {
        let c_oid = helpers::cstring_from_str_fn_arg("oid", oid)?;
        self.inner.stat(&c_oid).map_err(Error::new_rados)
    }

    /// Informs the cluster that this context isn't used anymore.
    ///
    /// The resources associated with the context may not be freed immediately.
    pub fn destroy(self) {
        debug!("destroying I/O context");
        drop(self);
    }

    /// Returns the statistics of the pool associated with this context.
    pub fn pool_stats(&self) -> Result<PoolStat> {
        self.inner.pool_stat().map_err(Error::new_rados)
    }

    /// Returns the name of the pool associated with this context.
    ///
    /// The name is copied into a buffer that starts with
    /// [`Config::pool_name_initial_len`] bytes and doubles while the cluster reports that it's too
    /// small, never exceeding [`Config::pool_name_max_len`]. Once the limit is reached, the last
    /// status is returned as an error.
    pub fn pool_name(&self) -> Result<String> {
        let mut buf = vec![0u8; self.config.pool_name_initial_len()];
        loop {
            match self.inner.pool_name(&mut buf) {
                Ok(len) => {
                    buf.truncate(len);
                    return String::from_utf8(buf).map_err(|e| {
                        Error::new_internal(
                            "invalid pool name because it contains invalid UTF-8 characters",
                            e.into(),
                        )
                    });
                }
                Err(status::BUFFER_TOO_SMALL) if buf.len() < self.config.pool_name_max_len() => {
                    let len = (buf.len() * 2).min(self.config.pool_name_max_len());
                    debug!(
                        "pool name doesn't fit in {} bytes, retrying with {}",
                        buf.len(),
                        len
                    );
                    buf = vec![0u8; len];
                }
                Err(code) => return Err(Error::new_rados(code)),
            }
        }
    }

    /// Returns an iterator over the names of the objects of the pool associated with this
    /// context.
    ///
    /// The order is defined by the cluster. The iterator holds a listing cursor which is released
    /// when it's dropped, so it's fine to stop consuming it at any point. It doesn't yield
    /// anything after the first error.
    pub fn objects(&self) -> Result<ObjectIter<'_, B>> {
        let cursor = self.inner.list_open().map_err(Error::new_rados)?;
        Ok(ObjectIter {
            cursor,
            done: false,
        })
    }

    /// Calls `visit` with the name of each object of the pool associated with this context,
    /// until all the objects are visited or `visit` returns [`ControlFlow::Break`].
    ///
    /// Each name is visited once, in the order defined by the cluster, and `visit` returns before
    /// the next one is requested. Stopping is not an error.
    pub fn list_objects<F>(&self, mut visit: F) -> Result<()>
    where
        F: FnMut(&str) -> ControlFlow<()>,
    {
        let mut cursor = self.inner.list_open().map_err(Error::new_rados)?;
        let mut visited = 0usize;
        loop {
            let entry = match cursor.next_entry() {
                Ok(entry) => entry,
                Err(status::END_OF_LISTING) => break,
                Err(code) => return Err(Error::new_rados(code)),
            };

            visited += 1;
            if visit(helpers::str_from_cstr("object name", entry)?).is_break() {
                debug!("object listing stopped after {} objects", visited);
                return Ok(());
            }
        }

        debug!("object listing finished after {} objects", visited);
        Ok(())
    }

    /// Creates a pool-wide snapshot named `name`.
    pub fn create_pool_snapshot(&self, name: &str) -> Result<()> {
        let c_name = helpers::cstring_from_str_fn_arg("name", name)?;
        self.inner.snap_create(&c_name).map_err(Error::new_rados)?;

        debug!("created pool snapshot {:?}", name);
        Ok(())
    }

    /// Removes the pool-wide snapshot named `name`.
    pub fn remove_pool_snapshot(&self, name: &str) -> Result<()> {
        let c_name = helpers::cstring_from_str_fn_arg("name", name)?;
        self.inner.snap_remove(&c_name).map_err(Error::new_rados)?;

        debug!("removed pool snapshot {:?}", name);
        Ok(())
    }

    /// Restores the object `oid` to its state in the pool-wide snapshot named `snap`.
    pub fn rollback_object(&self, oid: &str, snap: &str) -> Result<()> {
        let c_oid = helpers::cstring_from_str_fn_arg("oid", oid)?;
        let c_snap = helpers::cstring_from_str_fn_arg("snap", snap)?;
        self.inner
            .snap_rollback(&c_oid, &c_snap)
            .map_err(Error::new_rados)
    }

    /// Resolves the pool-wide snapshot named `name`.
    pub fn lookup_pool_snapshot(&self, name: &str) -> Result<PoolSnapshot> {
        let c_name = helpers::cstring_from_str_fn_arg("name", name)?;
        let id = self.inner.snap_lookup(&c_name).map_err(Error::new_rados)?;

        Ok(PoolSnapshot {
            name: String::from(name),
            id: SnapId::from_raw(id),
        })
    }

    /// Allocates a self-managed snapshot.
    pub fn create_managed_snapshot(&self) -> Result<ManagedSnapshot> {
        let id = self
            .inner
            .selfmanaged_snap_create()
            .map(SnapId::from_raw)
            .map_err(Error::new_rados)?;

        debug!("created self-managed snapshot {}", id);
        Ok(ManagedSnapshot::new(id))
    }

    /// Removes a self-managed snapshot.
    pub fn remove_managed_snapshot(&self, snap: ManagedSnapshot) -> Result<()> {
        self.inner
            .selfmanaged_snap_remove(snap.id().as_raw())
            .map_err(Error::new_rados)?;

        debug!("removed self-managed snapshot {}", snap.id());
        Ok(())
    }

    /// Restores the object `oid` to its state in the self-managed snapshot `snap`.
    pub fn rollback_managed_object(&self, oid: &str, snap: &ManagedSnapshot) -> Result<()> {
        let c_oid = helpers::cstring_from_str_fn_arg("oid", oid)?;
        self.inner
            .selfmanaged_snap_rollback(&c_oid, snap.id().as_raw())
            .map_err(Error::new_rados)
    }

    /// Sets the snapshot from which the following reads of this context are served; it doesn't
    /// affect writes. [`SnapId::HEAD`] goes back to reading the current data.
    pub fn set_read_snapshot(&mut self, snap: SnapId) {
        self.inner.snap_set_read(snap.as_raw());
        self.read_snap = snap;

        debug!("reading from snapshot {}", snap);
    }

    /// Returns the snapshot from which reads are served.
    pub fn read_snapshot(&self) -> SnapId {
        self.read_snap
    }
}

/// Iterates over the names of the objects of a pool.
///
/// See [`IoContext::objects`].
pub struct ObjectIter<'a, B: Backend + 'a> {
    /// The cursor that an instance of this struct guards its life time until this instance drops.
    cursor: B::Cursor<'a>,
    done: bool,
}

impl<'a, B: Backend + 'a> Iterator for ObjectIter<'a, B> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let res = match self.cursor.next_entry() {
            Ok(entry) => helpers::str_from_cstr("object name", entry).map(String::from),
            Err(status::END_OF_LISTING) => {
                self.done = true;
                return None;
            }
            Err(code) => Err(Error::new_rados(code)),
        };

        if res.is_err() {
            self.done = true;
        }
        Some(res)
    }
}

impl<'a, B: Backend + 'a> std::iter::FusedIterator for ObjectIter<'a, B> {}
