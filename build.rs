use std::env;

fn main() {
    // Accelerate provides BLAS/LAPACK on macOS when no bundled backend is built
    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if target_os == "macos" && env::var_os("CARGO_FEATURE_ACCELERATE").is_some() {
        println!("cargo:rustc-link-lib=framework=Accelerate");
    }
    println!("cargo:rerun-if-changed=build.rs");
}
