//! The backend over `librados`.
//!
//! Connecting to the cluster and creating the I/O context isn't covered by this crate; an
//! [`IoContext`] is built from a `rados_ioctx_t` that the caller has already created with
//! `rados_ioctx_create`.

use crate::backend::{Backend, ListCursor, RawResult};
use crate::stat::{ObjectStat, PoolStat};
use crate::IoContext;

use std::ffi::CStr;
use std::marker::PhantomData;
use std::os::raw::{c_char, c_int, c_uint};
use std::ptr;
use std::time::Duration;

use rados_sys as radsys;

/// Converts a status that is 0 on success; any other value is a failure.
fn check(ret: c_int) -> RawResult<()> {
    if ret == 0 {
        Ok(())
    } else {
        Err(ret)
    }
}

/// Converts a status that carries a length when it succeeds.
fn check_len(ret: c_int) -> RawResult<usize> {
    if ret < 0 {
        Err(ret)
    } else {
        Ok(ret as usize)
    }
}

/// A `librados` I/O context.
#[derive(Debug)]
pub struct Librados {
    /// The I/O context of the FFI that an instance of this struct represents and guards its life
    /// time until this instance drops.
    inner: radsys::rados_ioctx_t,
}

// SAFETY: a librados I/O context can be used from any thread as long as it isn't used by several
// at the same time, which `Librados` not being `Sync` guarantees.
unsafe impl Send for Librados {}

impl Librados {
    /// Takes ownership of a `librados` I/O context.
    ///
    /// # Safety
    ///
    /// `ioctx` must be a valid context returned by `rados_ioctx_create` that isn't destroyed nor
    /// owned by anything else; the returned instance destroys it when it drops. The cluster
    /// handle that created it must outlive the returned instance.
    ///
    /// It panics if `ioctx` is `NULL`.
    pub unsafe fn from_raw(ioctx: radsys::rados_ioctx_t) -> Self {
        assert!(!ioctx.is_null(), "BUG: rados_ioctx_t cannot be NULL");
        Librados { inner: ioctx }
    }
}

impl IoContext<Librados> {
    /// Creates a context with the default configuration which takes ownership of a `librados`
    /// I/O context.
    ///
    /// # Safety
    ///
    /// See [`Librados::from_raw`].
    pub unsafe fn from_raw(ioctx: radsys::rados_ioctx_t) -> Self {
        IoContext::new(Librados::from_raw(ioctx))
    }
}

impl Drop for Librados {
    fn drop(&mut self) {
        // SAFETY: we own the context and we trust that the FFI is safe freeing the memory of a
        // correct `rados_ioctx_t` value.
        unsafe { radsys::rados_ioctx_destroy(self.inner) }
    }
}

impl Backend for Librados {
    type Cursor<'a> = Cursor<'a>;

    fn write(&self, oid: &CStr, buf: &[u8], off: u64) -> RawResult<()> {
        // SAFETY: `oid` and `buf` are valid during the call and the FFI doesn't keep them.
        check(unsafe {
            radsys::rados_write(
                self.inner,
                oid.as_ptr(),
                buf.as_ptr() as *const c_char,
                buf.len(),
                off,
            )
        })
    }

    fn write_full(&self, oid: &CStr, buf: &[u8]) -> RawResult<()> {
        // SAFETY: `oid` and `buf` are valid during the call and the FFI doesn't keep them.
        check(unsafe {
            radsys::rados_write_full(
                self.inner,
                oid.as_ptr(),
                buf.as_ptr() as *const c_char,
                buf.len(),
            )
        })
    }

    fn append(&self, oid: &CStr, buf: &[u8]) -> RawResult<()> {
        // SAFETY: `oid` and `buf` are valid during the call and the FFI doesn't keep them.
        check(unsafe {
            radsys::rados_append(
                self.inner,
                oid.as_ptr(),
                buf.as_ptr() as *const c_char,
                buf.len(),
            )
        })
    }

    fn read(&self, oid: &CStr, buf: &mut [u8], off: u64) -> RawResult<usize> {
        // SAFETY: `buf` is exclusively borrowed during the call and the FFI writes at most
        // `buf.len()` bytes into it.
        check_len(unsafe {
            radsys::rados_read(
                self.inner,
                oid.as_ptr(),
                buf.as_mut_ptr() as *mut c_char,
                buf.len(),
                off,
            )
        })
    }

    fn remove(&self, oid: &CStr) -> RawResult<()> {
        // SAFETY: we trust the FFI is behaving correctly when called with correct value.
        check(unsafe { radsys::rados_remove(self.inner, oid.as_ptr()) })
    }

    fn trunc(&self, oid: &CStr, size: u64) -> RawResult<()> {
        // SAFETY: we trust the FFI is behaving correctly when called with correct value.
        check(unsafe { radsys::rados_trunc(self.inner, oid.as_ptr(), size) })
    }

    fn stat(&self, oid: &CStr) -> RawResult<ObjectStat> {
        let mut size = 0u64;
        let mut mtime: radsys::time_t = 0;
        // SAFETY: the out pointers reference local variables that outlive the call.
        check(unsafe { radsys::rados_stat(self.inner, oid.as_ptr(), &mut size, &mut mtime) })?;

        Ok(ObjectStat {
            size,
            modified: Duration::from_secs(u64::try_from(mtime).unwrap_or(0)),
        })
    }

    fn pool_stat(&self) -> RawResult<PoolStat> {
        // SAFETY: `rados_pool_stat_t` only contains integers so all zeroes is a valid value.
        let mut c_stat: radsys::rados_pool_stat_t = unsafe { std::mem::zeroed() };
        // SAFETY: the out pointer references a local variable that outlives the call.
        check(unsafe { radsys::rados_ioctx_pool_stat(self.inner, &mut c_stat) })?;

        Ok(PoolStat {
            num_bytes: c_stat.num_bytes,
            num_kb: c_stat.num_kb,
            num_objects: c_stat.num_objects,
            num_object_clones: c_stat.num_object_clones,
            num_object_copies: c_stat.num_object_copies,
            num_objects_missing_on_primary: c_stat.num_objects_missing_on_primary,
            num_objects_unfound: c_stat.num_objects_unfound,
            num_objects_degraded: c_stat.num_objects_degraded,
            num_rd: c_stat.num_rd,
            num_rd_kb: c_stat.num_rd_kb,
            num_wr: c_stat.num_wr,
            num_wr_kb: c_stat.num_wr_kb,
        })
    }

    fn pool_name(&self, buf: &mut [u8]) -> RawResult<usize> {
        // The configuration limits the buffer to u32::MAX bytes.
        let len = c_uint::try_from(buf.len()).unwrap_or(c_uint::MAX);
        // SAFETY: `buf` is exclusively borrowed during the call and the FFI writes at most `len`
        // bytes into it.
        check_len(unsafe {
            radsys::rados_ioctx_get_pool_name(self.inner, buf.as_mut_ptr() as *mut c_char, len)
        })
    }

    fn list_open(&self) -> RawResult<Self::Cursor<'_>> {
        let mut ctx: radsys::rados_list_ctx_t = ptr::null_mut();
        // SAFETY: the out pointer references a local variable that outlives the call.
        check(unsafe { radsys::rados_nobjects_list_open(self.inner, &mut ctx) })?;

        Ok(Cursor {
            inner: ctx,
            _ioctx: PhantomData,
        })
    }

    fn snap_create(&self, name: &CStr) -> RawResult<()> {
        // SAFETY: we trust the FFI is behaving correctly when called with correct value.
        check(unsafe { radsys::rados_ioctx_snap_create(self.inner, name.as_ptr()) })
    }

    fn snap_remove(&self, name: &CStr) -> RawResult<()> {
        // SAFETY: we trust the FFI is behaving correctly when called with correct value.
        check(unsafe { radsys::rados_ioctx_snap_remove(self.inner, name.as_ptr()) })
    }

    fn snap_rollback(&self, oid: &CStr, name: &CStr) -> RawResult<()> {
        // SAFETY: we trust the FFI is behaving correctly when called with correct value.
        check(unsafe {
            radsys::rados_ioctx_snap_rollback(self.inner, oid.as_ptr(), name.as_ptr())
        })
    }

    fn snap_lookup(&self, name: &CStr) -> RawResult<u64> {
        let mut id: radsys::rados_snap_t = 0;
        // SAFETY: the out pointer references a local variable that outlives the call.
        check(unsafe { radsys::rados_ioctx_snap_lookup(self.inner, name.as_ptr(), &mut id) })?;
        Ok(id)
    }

    fn selfmanaged_snap_create(&self) -> RawResult<u64> {
        let mut id: radsys::rados_snap_t = 0;
        // SAFETY: the out pointer references a local variable that outlives the call.
        check(unsafe { radsys::rados_ioctx_selfmanaged_snap_create(self.inner, &mut id) })?;
        Ok(id)
    }

    fn selfmanaged_snap_remove(&self, snap: u64) -> RawResult<()> {
        // SAFETY: we trust the FFI is behaving correctly when called with correct value.
        check(unsafe { radsys::rados_ioctx_selfmanaged_snap_remove(self.inner, snap) })
    }

    fn selfmanaged_snap_rollback(&self, oid: &CStr, snap: u64) -> RawResult<()> {
        // SAFETY: we trust the FFI is behaving correctly when called with correct value.
        check(unsafe {
            radsys::rados_ioctx_selfmanaged_snap_rollback(self.inner, oid.as_ptr(), snap)
        })
    }

    fn snap_set_read(&mut self, snap: u64) {
        // SAFETY: we trust the FFI is behaving correctly when called with correct value.
        unsafe { radsys::rados_ioctx_snap_set_read(self.inner, snap) }
    }
}

/// A `librados` object listing cursor.
#[derive(Debug)]
pub struct Cursor<'a> {
    /// The listing context of the FFI that an instance of this struct represents and guards its
    /// life time until this instance drops.
    inner: radsys::rados_list_ctx_t,
    /// The listing context cannot outlive the I/O context that opened it.
    _ioctx: PhantomData<&'a Librados>,
}

impl ListCursor for Cursor<'_> {
    fn next_entry(&mut self) -> RawResult<&CStr> {
        let mut entry: *const c_char = ptr::null();
        // SAFETY: the out pointer references a local variable that outlives the call. We don't
        // ask for the locator key nor the namespace.
        check(unsafe {
            radsys::rados_nobjects_list_next(
                self.inner,
                &mut entry,
                ptr::null_mut(),
                ptr::null_mut(),
            )
        })?;

        assert!(
            !entry.is_null(),
            "FFI returned an invalid object listing entry; the entry is NULL"
        );
        // SAFETY: we checked that the pointer isn't NULL and the FFI keeps the entry valid until
        // the next call on the cursor, which the returned lifetime ensures.
        Ok(unsafe { CStr::from_ptr(entry) })
    }
}

impl Drop for Cursor<'_> {
    fn drop(&mut self) {
        // SAFETY: we trust that the FFI is safe freeing the memory of a correct `rados_list_ctx_t`
        // value.
        unsafe { radsys::rados_nobjects_list_close(self.inner) }
    }
}
