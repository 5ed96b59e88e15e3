use std::env;
use std::ffi::{CStr, CString};
use std::ptr;

#[test]
fn list_objects() {
    let conf = env::var("CEPH_CONF").expect("CEPH_CONF env var isn't defined");
    let conf = CString::new(conf).expect("CString::new failed");
    let pool = env::var("RADOS_POOL").expect("RADOS_POOL env var isn't defined");
    let pool = CString::new(pool).expect("CString::new failed");

    unsafe {
        // Connect to the cluster
        let mut cluster: rados_sys::rados_t = ptr::null_mut();
        assert_eq!(rados_sys::rados_create(&mut cluster, ptr::null()), 0);
        assert_eq!(rados_sys::rados_conf_read_file(cluster, conf.as_ptr()), 0);
        assert_eq!(rados_sys::rados_connect(cluster), 0);

        // Open the pool
        let mut ioctx: rados_sys::rados_ioctx_t = ptr::null_mut();
        assert_eq!(
            rados_sys::rados_ioctx_create(cluster, pool.as_ptr(), &mut ioctx),
            0
        );

        // Store one object so the listing isn't empty
        let oid = CString::new("rados-sys-list-objects").expect("CString::new failed");
        let data = b"rados-sys";
        assert_eq!(
            rados_sys::rados_write_full(
                ioctx,
                oid.as_ptr(),
                data.as_ptr() as *const _,
                data.len()
            ),
            0
        );

        // Request list cursor
        let mut list: rados_sys::rados_list_ctx_t = ptr::null_mut();
        assert_eq!(rados_sys::rados_nobjects_list_open(ioctx, &mut list), 0);

        // Iterate through all objects
        let mut found = false;
        loop {
            let mut entry: *const std::os::raw::c_char = ptr::null();
            let ret = rados_sys::rados_nobjects_list_next(
                list,
                &mut entry,
                ptr::null_mut(),
                ptr::null_mut(),
            );
            if ret == -2 {
                break; // ENOENT ends the listing
            }

            assert_eq!(ret, 0);
            assert_ne!(entry, ptr::null()); // verify non-null pointer
            if CStr::from_ptr(entry).to_str().unwrap() == "rados-sys-list-objects" {
                found = true;
            }
        }
        assert!(found, "written object must be listed");

        // Free resources
        rados_sys::rados_nobjects_list_close(list);
        assert_eq!(rados_sys::rados_remove(ioctx, oid.as_ptr()), 0);
        rados_sys::rados_ioctx_destroy(ioctx);
        rados_sys::rados_shutdown(cluster);
    }
}
