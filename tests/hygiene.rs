//! Hygiene: enforces coding standards at test time
//!
//! Scans the gate's production sources (everything under `src/` except
//! `*_test.rs` and the shared test doubles) for constructs that could throw
//! past the page boundary or silently drop an error. The gate must never be
//! the reason the page stops responding, so every budget is zero.

use std::fs;
use std::path::Path;

struct Budget {
    label: &'static str,
    pattern: &'static str,
    max: usize,
}

const BUDGETS: &[Budget] = &[
    // Panics: these abort the wasm instance.
    Budget { label: ".unwrap()", pattern: ".unwrap()", max: 0 },
    Budget { label: ".expect()", pattern: ".expect(", max: 0 },
    Budget { label: "panic!()", pattern: "panic!(", max: 0 },
    Budget { label: "unreachable!()", pattern: "unreachable!(", max: 0 },
    Budget { label: "todo!()", pattern: "todo!(", max: 0 },
    Budget { label: "unimplemented!()", pattern: "unimplemented!(", max: 0 },
    // Silent loss: discards errors without inspecting.
    Budget { label: "let _ =", pattern: "let _ =", max: 0 },
    Budget { label: ".ok()", pattern: ".ok()", max: 0 },
    // Style / structure.
    Budget { label: "#[allow(dead_code)]", pattern: "#[allow(dead_code)]", max: 0 },
];

const SKIPPED_FILES: &[&str] = &["test_helpers.rs"];

struct SourceFile {
    path: String,
    content: String,
}

fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
            continue;
        }
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
            continue;
        };
        if !name.ends_with(".rs") || name.ends_with("_test.rs") || SKIPPED_FILES.contains(&name.as_str()) {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path.to_string_lossy().to_string(), content });
        }
    }
}

/// Per-file hit counts, ignoring `//` comment lines.
fn hits(files: &[SourceFile], pattern: &str) -> Vec<(String, usize)> {
    files
        .iter()
        .filter_map(|file| {
            let count = file
                .content
                .lines()
                .filter(|line| !line.trim_start().starts_with("//"))
                .filter(|line| line.contains(pattern))
                .count();
            (count > 0).then(|| (file.path.clone(), count))
        })
        .collect()
}

#[test]
fn sources_are_found() {
    let files = source_files();
    assert!(
        files.iter().any(|f| f.path.ends_with("session.rs")),
        "hygiene scan must run from the crate root"
    );
}

#[test]
fn budgets_hold() {
    let files = source_files();
    let mut report = Vec::new();
    for budget in BUDGETS {
        let found = hits(&files, budget.pattern);
        let count: usize = found.iter().map(|(_, c)| c).sum();
        if count > budget.max {
            let detail: Vec<String> = found.iter().map(|(path, c)| format!("    {path}: {c}")).collect();
            report.push(format!(
                "  {} budget exceeded: found {count}, max {}\n{}",
                budget.label,
                budget.max,
                detail.join("\n")
            ));
        }
    }
    assert!(report.is_empty(), "hygiene budgets exceeded:\n{}", report.join("\n"));
}

#[test]
fn test_modules_use_sibling_files() {
    let files = source_files();
    let inline: Vec<&str> = files
        .iter()
        .filter(|f| f.content.contains("mod tests {"))
        .map(|f| f.path.as_str())
        .collect();
    assert!(inline.is_empty(), "inline test modules found, use a sibling *_test.rs: {inline:?}");
}
