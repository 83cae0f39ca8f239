//! Build script for lumen-core
//!
//! Checks the toolchain before compilation. The engine uses let-else and
//! `usize::div_ceil`, the latter stable since Rust 1.73.0.

fn main()
{
    println!("cargo:rerun-if-changed=build.rs");

    let Ok(rustc_version) = rustc_version::version() else {
        // Some build environments hide rustc; warn instead of failing
        println!("cargo:warning=could not verify Rust version");
        return;
    };

    let min_rust_version = rustc_version::Version::new(1, 73, 0);
    assert!(
        rustc_version >= min_rust_version,
        "lumen-core requires Rust {min_rust_version} or newer, found {rustc_version}"
    );
}
