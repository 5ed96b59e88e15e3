#![allow(dead_code)]

use rados::mem::MemPool;
use rados::{Error, IoContext};

use std::time::SystemTime;

use rand::{Rng, RngCore};

pub fn generate_name(ctx: &str) -> String {
    let d = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .expect("system time since Unix epoch failed");
    format!("rados-rust-{}-{}", ctx, d.as_nanos())
}

/// Returns a context over a new simulated pool.
pub fn mem_ioctx(ctx: &str) -> IoContext<MemPool> {
    IoContext::new(MemPool::new(&generate_name(ctx)).expect("create simulated pool"))
}

/// Returns `len` random bytes.
pub fn random_data(len: usize) -> Vec<u8> {
    let mut data = vec![0u8; len];
    rand::rng().fill_bytes(&mut data);
    data
}

/// Returns a random length in `[1, max]`.
pub fn random_len(max: usize) -> usize {
    rand::rng().random_range(1..=max)
}

/// Asserts that `err` is an `Error::Rados` with the status `code`.
pub fn assert_rados_code(err: Error, code: i32, ctx_msg: &str) {
    match err {
        Error::Rados(r) => assert_eq!(r.code(), code, "{}: rados status code", ctx_msg),
        other => panic!("{}: expected an Error::Rados, got {:?}", ctx_msg, other),
    }
}
