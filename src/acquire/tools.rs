use std::process::Command;

use crate::model::ToolVersions;

pub fn collect_tool_versions() -> ToolVersions {
    ToolVersions {
        pdftotext: command_version_optional("pdftotext", &["-v"]),
        pdftoppm: command_version_optional("pdftoppm", &["-v"]),
        tesseract: command_version_optional("tesseract", &["--version"]),
    }
}

pub(super) fn command_available(program: &str) -> bool {
    Command::new(program).arg("--version").output().is_ok()
}

// poppler prints its version banner on stderr, tesseract on stdout.
fn command_version_optional(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let source = if stdout.trim().is_empty() {
        &*stderr
    } else {
        &*stdout
    };
    first_nonempty_line(source)
}

fn first_nonempty_line(source: &str) -> Option<String> {
    source
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(ToOwned::to_owned)
}
