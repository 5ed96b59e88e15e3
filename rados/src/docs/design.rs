//! # Implementation design
//!
//! ## Errors
//!
//! All the public functions and methods of this crate that can return an error, they return this
//! specific [`Result` type](crate::Result).
//!
//! [`Error`](crate::Error) is an `enum` which each variant is of a certain type. Each of these
//! types expose different information accordingly to what they represent.
//!
//! The [`Error::Rados` variant](crate::Error::Rados) wraps the negative status code returned by
//! the cluster without interpreting it; [`error::Rados::code`](crate::error::Rados::code) returns
//! it. The binding only gives meaning to two statuses:
//!
//! * [`BUFFER_TOO_SMALL`](crate::backend::status::BUFFER_TOO_SMALL) makes
//!   [`IoContext::pool_name`](crate::IoContext::pool_name) grow its buffer.
//! * [`END_OF_LISTING`](crate::backend::status::END_OF_LISTING) finishes an object listing.
//!
//! No operation is retried.
//!
//! ### Panics
//!
//! This crate explicitly panics if it finds inconsistency in values returned by the FFI, for
//! example a `NULL` listing entry with a successful status.
//!
//! A backend that reports a failure with the status 0 results in an
//! [`Error::Internal`](crate::Error::Internal) rather than a panic; any other failure code,
//! positive ones included, is kept verbatim in [`Error::Rados`](crate::Error::Rados).
//!
//! We consider them bugs and it doesn't make sense to continue the execution in that case.
//!
//! Outside of the mentioned specific case, we never panic explicitly, we return errors as
//! mentioned.
//!
//! ## Buffers
//!
//! Buffers are borrowed slices that the backends only access during the call. Empty buffers are
//! handled before reaching the backend: reading into an empty buffer returns 0 and writing or
//! appending empty data succeeds, in both cases without calling the cluster.
//!
//! ## Resources
//!
//! The types that own an FFI resource release it when they drop:
//!
//! * [`IoContext`](crate::IoContext) owns its backend, whose drop destroys the native I/O
//!   context. [`IoContext::destroy`](crate::IoContext::destroy) consumes the context, so it can be
//!   neither used nor destroyed again afterwards.
//! * [`ObjectIter`](crate::ObjectIter) owns a listing cursor borrowed from the context and closes
//!   it when it drops, whether the listing finished, failed or the caller stopped consuming it.
//!   [`IoContext::list_objects`](crate::IoContext::list_objects) closes its cursor on every return
//!   path in the same way.
//!
//! ## Concurrency
//!
//! All the operations block until the cluster answers. A context is driven by one thread at a time:
//! the read snapshot is a property of the context, so
//! [`IoContext::set_read_snapshot`](crate::IoContext::set_read_snapshot) takes `&mut self` and
//! cannot happen while a read is in flight.
