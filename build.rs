//! Captures git metadata for `sysmenu -v`.

use std::process::Command;

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn main() {
    let message = git(&["log", "-1", "--format=%s"]).unwrap_or_else(|| "unknown".to_string());
    let date = git(&["log", "-1", "--format=%cd"]).unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=SYSMENU_GIT_COMMIT_MESSAGE={message}");
    println!("cargo:rustc-env=SYSMENU_GIT_COMMIT_DATE={date}");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=build.rs");
}
