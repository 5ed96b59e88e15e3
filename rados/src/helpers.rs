//! Helper functions which are used across the modules of this crate.

use crate::{Error, Result};

use std::ffi::{CStr, CString};

/// creates a CString from a function &str function argument and if there is an
/// error it returns an Error::InvalidArguments with the passed argument's
/// name.
pub(crate) fn cstring_from_str_fn_arg(arg_name: &str, arg_val: &str) -> Result<CString> {
    CString::new(arg_val).map_err(|e| {
        Error::new_invalid_arguments(
            arg_name,
            &format!(
                "cannot contains null bytes (0 byte). Null byte found at {}",
                e.nul_position()
            ),
        )
    })
}

/// Borrows a `&str` from a C string returned by the cluster. It returns an Error::Internal if it
/// isn't valid UTF-8; `what` describes the value for the error message.
pub(crate) fn str_from_cstr<'a>(what: &str, val: &'a CStr) -> Result<&'a str> {
    val.to_str().map_err(|e| {
        Error::new_internal(
            &format!("invalid {} because it contains invalid UTF-8 characters", what),
            e.into(),
        )
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_cstring_from_str_fn_arg() {
        let val = cstring_from_str_fn_arg("some", "this is fine")
            .expect("returned error on a valid CString");
        assert_eq!(
            val,
            CString::new("this is fine").unwrap(),
            "returned a CString with an invalid value"
        );

        let err = cstring_from_str_fn_arg("some", "this is invalid\0 ")
            .expect_err("returned Ok on an invalid CString");
        if let Error::InvalidArguments(args) = err {
            assert_eq!(
                args.names, "some",
                "invalid Error::InvalidArguments name field value"
            );
            assert_eq!(
                args.msg, "cannot contains null bytes (0 byte). Null byte found at 15",
                "invalid Error::InvalidArguments msg field value"
            )
        } else {
            panic!("expected an Error::InvalidArguments");
        }
    }

    #[test]
    fn test_str_from_cstr() {
        {
            // Case: valid UTF-8.
            let val = CString::new("pool-é").unwrap();
            assert_eq!(
                str_from_cstr("pool name", &val).expect("valid UTF-8"),
                "pool-é"
            );
        }
        {
            // Case: invalid UTF-8.
            let val = CString::new(vec![b'a', 0xfe, b'b']).unwrap();
            let err = str_from_cstr("object name", &val).expect_err("invalid UTF-8");
            if let Error::Internal(internal) = err {
                assert_eq!(
                    internal.ctx_msg,
                    "invalid object name because it contains invalid UTF-8 characters"
                );
            } else {
                panic!("expected an Error::Internal");
            }
        }
    }
}
