use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=XSIGN_LIB_DIR");

    // Only the real device adapter links against the vendor library
    if env::var_os("CARGO_FEATURE_XSIGN").is_none() {
        return;
    }

    if let Some(dir) = env::var_os("XSIGN_LIB_DIR") {
        println!("cargo:rustc-link-search=native={}", dir.to_string_lossy());
    }
}
