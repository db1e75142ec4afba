//! Build script stamping the CI build number into the version string
//!
//! `BUILD_NUMBER` from the build environment becomes the patch component of
//! `0.1.<build>`; local builds get `0`.

fn main() {
    println!("cargo:rerun-if-env-changed=BUILD_NUMBER");

    let build = std::env::var("BUILD_NUMBER")
        .ok()
        .filter(|b| !b.is_empty() && b.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or_else(|| "0".to_string());

    println!("cargo:rustc-env=PODSIZER_BUILD={}", build);
}
