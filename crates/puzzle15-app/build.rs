use std::fs;
use std::path::Path;

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir");
    let version_path = Path::new(&manifest_dir).join("../../VERSION");
    println!("cargo:rerun-if-changed={}", version_path.display());

    let version = fs::read_to_string(&version_path)
        .expect("read workspace VERSION file")
        .trim()
        .to_string();

    let parts: Vec<&str> = version.split('.').collect();
    assert!(
        parts.len() == 3 && parts.iter().all(|part| part.parse::<u32>().is_ok()),
        "VERSION must be MAJOR.MINOR.PATCH, got {version:?}"
    );

    println!("cargo:rustc-env=PUZZLE15_VERSION={version}");
}
