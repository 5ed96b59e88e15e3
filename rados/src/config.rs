//! Binding configuration.

use crate::{Error, Result};

/// Default size of the first buffer used for retrieving the pool name.
const POOL_NAME_INITIAL_LEN: usize = 128;
/// Default limit of the buffer used for retrieving the pool name.
const POOL_NAME_MAX_LEN: usize = 64 * 1024;

/// Defines the tunables of an [`IoContext`](crate::IoContext).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Size of the first buffer handed to the cluster for copying the pool name.
    pool_name_initial_len: usize,
    /// The buffer for the pool name doubles each time the cluster reports that it's too small
    /// until it would exceed this size.
    pool_name_max_len: usize,
}

impl Config {
    /// Creates a configuration with the specific initial and maximum buffer sizes for retrieving
    /// the pool name.
    ///
    /// It returns an [`Error::InvalidArguments`] if `pool_name_initial_len` is 0 or greater than
    /// `pool_name_max_len`, or if `pool_name_max_len` doesn't fit in an `u32`.
    pub fn new(pool_name_initial_len: usize, pool_name_max_len: usize) -> Result<Self> {
        if pool_name_initial_len == 0 {
            return Err(Error::new_invalid_arguments(
                "pool_name_initial_len",
                "cannot be 0",
            ));
        }

        if pool_name_initial_len > pool_name_max_len {
            return Err(Error::new_invalid_arguments(
                "(pool_name_initial_len,pool_name_max_len)",
                "initial length cannot be greater than the maximum length",
            ));
        }

        if u32::try_from(pool_name_max_len).is_err() {
            return Err(Error::new_invalid_arguments(
                "pool_name_max_len",
                "cannot be greater than u32::MAX",
            ));
        }

        Ok(Config {
            pool_name_initial_len,
            pool_name_max_len,
        })
    }

    /// Returns the configured initial buffer size for retrieving the pool name.
    pub fn pool_name_initial_len(&self) -> usize {
        self.pool_name_initial_len
    }

    /// Returns the configured maximum buffer size for retrieving the pool name.
    pub fn pool_name_max_len(&self) -> usize {
        self.pool_name_max_len
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            pool_name_initial_len: POOL_NAME_INITIAL_LEN,
            pool_name_max_len: POOL_NAME_MAX_LEN,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default() {
        let config = Config::default();
        assert_eq!(config.pool_name_initial_len(), 128, "initial length");
        assert_eq!(config.pool_name_max_len(), 65536, "max length");
    }

    #[test]
    fn test_new() {
        {
            // Case: valid values.
            let config = Config::new(4, 16).expect("valid config");
            assert_eq!(config.pool_name_initial_len(), 4);
            assert_eq!(config.pool_name_max_len(), 16);
        }
        {
            // Case: initial length equal to maximum length.
            Config::new(16, 16).expect("valid config");
        }
        {
            // Case: initial length 0.
            let err = Config::new(0, 16).expect_err("zero initial length");
            if let Error::InvalidArguments(args) = err {
                assert_eq!(args.names, "pool_name_initial_len");
            } else {
                panic!("expected an Error::InvalidArguments");
            }
        }
        {
            // Case: initial length greater than maximum length.
            let err = Config::new(32, 16).expect_err("initial greater than max");
            if let Error::InvalidArguments(args) = err {
                assert_eq!(args.names, "(pool_name_initial_len,pool_name_max_len)");
            } else {
                panic!("expected an Error::InvalidArguments");
            }
        }
    }
}
