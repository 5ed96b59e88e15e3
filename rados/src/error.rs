//! Errors returned by this crate.

use std::error as stderr;
use std::io;

use thiserror::Error as ThisError;

/// Convenient type alias to shorten the signature on every usage.
pub(crate) type BoxError = Box<dyn stderr::Error + Send + Sync>;

/// The error type that this crate use for wrapping errors.
#[non_exhaustive]
#[derive(Debug, ThisError)]
pub enum Error {
    /// Identifies errors produced by the internal implementation (e.g. a name returned by the
    /// cluster that isn't valid UTF-8) that aren't expected to happen.
    #[error(transparent)]
    Internal(Internal),
    /// Identifies invalid arguments passed to a function or method.
    #[error(transparent)]
    InvalidArguments(Args),
    /// Identifies a native status code returned by the storage cluster.
    #[error(transparent)]
    Rados(Rados),
}

impl Error {
    /// Creates an [`Internal` variant](Self::Internal) from the provided context message and the
    /// error that originated it.
    pub(crate) fn new_internal(ctx_msg: &str, err: BoxError) -> Self {
        Error::Internal(Internal {
            ctx_msg: String::from(ctx_msg),
            inner: err,
        })
    }

    /// Convenient constructor for creating an [`InvalidArguments` variant](Self::InvalidArguments)
    /// Error.
    ///
    /// See [`Args`] documentation to know about the convention for the value of the `names`
    /// parameter.
    pub(crate) fn new_invalid_arguments(names: &str, msg: &str) -> Self {
        Self::InvalidArguments(Args::new(names, msg))
    }

    /// Convenient constructor for creating a [`Rados` variant](Self::Rados) from a failure
    /// status code.
    ///
    /// A backend reporting a failure with the success status 0 breaks its contract, so it
    /// results in an [`Internal` variant](Self::Internal).
    pub(crate) fn new_rados(code: i32) -> Self {
        if code == 0 {
            return Self::new_internal(
                "backend reported a failure with the success status code 0",
                "status code 0 isn't an error".into(),
            );
        }

        Self::Rados(Rados { code })
    }

    /// Returns the native status code when this is a [`Rados` variant](Self::Rados).
    pub fn rados_code(&self) -> Option<i32> {
        match self {
            Self::Rados(r) => Some(r.code()),
            _ => None,
        }
    }
}

/// Represents invalid arguments error regarding the business domain.
#[derive(Debug, ThisError)]
#[error("{names} arguments have invalid values. {msg}")]
pub struct Args {
    /// One or several parameters names; it has several conventions for expressing the involved
    /// parameters.
    ///
    /// * When a specific parameter is invalid its value is the exact parameter name.
    /// * When several parameters are invalid, its values is the parameters names wrapped in round
    ///   brackets (e.g. `(p1,p3)`).
    /// * When all the function parameters are invalid, `<all>` is used.
    pub names: String,
    /// A human friendly message that explains why the argument(s) are invalid.
    pub msg: String,
}

impl Args {
    fn new(names: &str, msg: &str) -> Self {
        Args {
            names: String::from(names),
            msg: String::from(msg),
        }
    }
}

/// Wraps a failure status code returned by the storage cluster.
///
/// The code is kept verbatim, usually a negative `errno` value; the binding gives no local meaning to it apart from the few
/// statuses documented on the operations that handle them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
#[error(r#"code: {code}, details: "{}""#, describe(.code))]
pub struct Rados {
    code: i32,
}

impl Rados {
    /// Returns the native status code, never 0.
    pub fn code(&self) -> i32 {
        self.code
    }

    /// Returns the positive `errno` value corresponding to the status code.
    pub fn errno(&self) -> i32 {
        self.code.wrapping_abs()
    }
}

impl From<Rados> for io::Error {
    fn from(err: Rados) -> Self {
        io::Error::from_raw_os_error(err.errno())
    }
}

fn describe(code: &i32) -> String {
    io::Error::from_raw_os_error(code.wrapping_abs()).to_string()
}

/// Represents an error that happen because of the violation of an internal assumption.
///
/// An assumption example is: an object name returned by the cluster must always contain UTF-8
/// valid characters.
#[derive(Debug, ThisError)]
#[error("{ctx_msg}")]
pub struct Internal {
    /// A human friendly message to provide context of the error.
    pub ctx_msg: String,
    /// The inner error that caused this internal error
    #[source]
    inner: BoxError,
}

#[cfg(test)]
mod test {
    use super::*;

    use std::error::Error as _;

    #[test]
    fn test_rados_code() {
        let err = Error::new_rados(-libc::ENOENT);
        assert_eq!(err.rados_code(), Some(-libc::ENOENT));

        if let Error::Rados(r) = &err {
            assert_eq!(r.errno(), libc::ENOENT, "errno is the positive code");
        } else {
            panic!("expected an Error::Rados");
        }

        let msg = err.to_string();
        assert!(
            msg.starts_with(&format!("code: {}", -libc::ENOENT)),
            "invalid display: {}",
            msg
        );
        assert!(
            msg.contains(&format!("os error {}", libc::ENOENT)),
            "invalid display: {}",
            msg
        );
    }

    #[test]
    fn test_rados_positive_code() {
        let err = Error::new_rados(5);
        assert_eq!(err.rados_code(), Some(5), "positive codes are kept verbatim");

        if let Error::Rados(r) = &err {
            assert_eq!(r.errno(), 5);
        } else {
            panic!("expected an Error::Rados");
        }
    }

    #[test]
    fn test_rados_zero_code() {
        let err = Error::new_rados(0);
        assert_eq!(err.rados_code(), None);
        if let Error::Internal(internal) = err {
            assert_eq!(
                internal.ctx_msg,
                "backend reported a failure with the success status code 0"
            );
        } else {
            panic!("expected an Error::Internal");
        }
    }

    #[test]
    fn test_rados_into_io_error() {
        let ioerr: io::Error = Rados { code: -libc::EEXIST }.into();
        assert_eq!(ioerr.raw_os_error(), Some(libc::EEXIST));
    }

    #[test]
    fn test_invalid_arguments_display() {
        let err = Error::new_invalid_arguments("oid", "cannot be empty");
        assert_eq!(err.rados_code(), None);
        assert_eq!(
            err.to_string(),
            "oid arguments have invalid values. cannot be empty"
        );
    }

    #[test]
    fn test_internal_source() {
        let inner = String::from_utf8(vec![0xff]).expect_err("invalid UTF-8");
        let err = Error::new_internal("invalid object name", inner.into());
        assert_eq!(err.to_string(), "invalid object name");
        assert!(err.source().is_some(), "internal errors keep their source");
    }
}
