use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .env("RUSTFLAGS", "-D warnings")
        .args(["check", "--quiet", "--bin", "frostmaul"])
        .status()
        .expect("failed to invoke cargo check for the frostmaul CLI binary");

    assert!(status.success(), "cargo check --bin frostmaul should succeed without warnings");
}
