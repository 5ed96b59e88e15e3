//! Raw FFI bindings to `librados`, generated by `bindgen` at build time.
//!
//! Everything here is `unsafe` and mirrors `<rados/librados.h>` one to one. Use the `rados`
//! crate for a safe interface.

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
#![allow(deref_nullptr)]

include!(concat!(env!("OUT_DIR"), "/bindings.rs"));
