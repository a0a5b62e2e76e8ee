use std::path::Path;
use std::process::Command;

/// Short commit id of the workspace checkout, or `None` outside a git tree.
fn git_short_sha(workspace: &Path) -> Option<String> {
    let out = Command::new("git")
        .arg("-C")
        .arg(workspace)
        .args(["rev-parse", "--short=10", "HEAD"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let sha = String::from_utf8(out.stdout).ok()?;
    let sha = sha.trim();
    (!sha.is_empty()).then(|| sha.to_string())
}

fn main() {
    let manifest = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_default();
    let workspace = Path::new(&manifest).join("..");

    // Release tarballs have no .git; packagers can pass the id in.
    let sha = std::env::var("RUNWAY_BUILD_SHA")
        .ok()
        .filter(|s| !s.is_empty())
        .or_else(|| git_short_sha(&workspace))
        .unwrap_or_else(|| "dev".to_string());

    println!("cargo:rustc-env=RUNWAY_BUILD_SHA={sha}");
    println!("cargo:rerun-if-env-changed=RUNWAY_BUILD_SHA");
    println!("cargo:rerun-if-changed=../.git/HEAD");
    println!("cargo:rerun-if-changed=../.git/refs/heads");
}
