use std::env;

fn main() {
    // Surface the toolchain version for `parley version`
    println!(
        "cargo:rustc-env=CARGO_PKG_RUST_VERSION={}",
        env::var("RUSTC_VERSION").unwrap_or_else(|_| "unknown".to_string())
    );
    println!("cargo:rerun-if-env-changed=RUSTC_VERSION");

    if env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("windows") {
        println!("cargo:rustc-link-arg=/SUBSYSTEM:CONSOLE");
    }
}
