extern crate bindgen;

use std::env;
use std::path::PathBuf;

fn main() {
    // librados is a shared system library installed with the Ceph client packages
    // (e.g. librados-dev or librados-devel).
    println!("cargo:rustc-link-lib=dylib=rados");

    // Allow pointing to a non standard installation prefix.
    if let Ok(dir) = env::var("RADOS_LIB_DIR") {
        println!("cargo:rustc-link-search={}", dir);
    }
    println!("cargo:rerun-if-env-changed=RADOS_LIB_DIR");
    println!("cargo:rerun-if-env-changed=RADOS_INCLUDE_DIR");
    println!("cargo:rerun-if-changed=wrapper.h");

    let mut builder = bindgen::Builder::default()
        // Use 'allow lists' to avoid generating bindings for system header includes
        // a lot of which isn't required and can't be handled safely anyway.
        // All librados types and functions start with rados_
        .allowlist_type("rados_.*")
        .allowlist_function("rados_.*")
        // and its constants with LIBRADOS_
        .allowlist_var("LIBRADOS_.*")
        .header("wrapper.h")
        // Also make headers included by main header dependencies of the build
        .parse_callbacks(Box::new(bindgen::CargoCallbacks::new()));

    if let Ok(dir) = env::var("RADOS_INCLUDE_DIR") {
        builder = builder.clang_arg(format!("-I{}", dir));
    }

    builder
        // Generate bindings
        .generate()
        .expect("Error generating bindings.")
        // Write bindings to file to be referenced by main build
        .write_to_file(
            PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not defined")).join("bindings.rs"),
        )
        .expect("Error writing bindings to file.");
}
