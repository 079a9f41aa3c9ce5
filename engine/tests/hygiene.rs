//! Hygiene: production sources stay free of panicking and error-dropping
//! constructs.
//!
//! Every pattern has a budget of zero. Test files (`*_test.rs`) are exempt.

use std::fs;
use std::path::{Path, PathBuf};

/// `(pattern, budget, what it costs)`.
const BUDGETS: &[(&str, usize, &str)] = &[
    (".unwrap()", 0, "panics on None/Err"),
    (".expect(", 0, "panics on None/Err"),
    ("panic!(", 0, "aborts the gesture"),
    ("unreachable!(", 0, "aborts the gesture"),
    ("todo!(", 0, "unfinished stub"),
    ("unimplemented!(", 0, "unfinished stub"),
    ("let _ =", 0, "discards a result unseen"),
    (".ok()", 0, "discards an error unseen"),
    ("#[allow(dead_code)]", 0, "hides unused code"),
];

struct SourceFile {
    path: PathBuf,
    content: String,
}

fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect(&Path::new(env!("CARGO_MANIFEST_DIR")).join("src"), &mut files);
    files
}

fn collect(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect(&path, out);
            continue;
        }
        let is_rs = path.extension().is_some_and(|e| e == "rs");
        let is_test = path.to_string_lossy().ends_with("_test.rs");
        if is_rs && !is_test {
            if let Ok(content) = fs::read_to_string(&path) {
                out.push(SourceFile { path, content });
            }
        }
    }
}

fn hits(files: &[SourceFile], pattern: &str) -> Vec<String> {
    files
        .iter()
        .flat_map(|file| {
            file.content
                .lines()
                .enumerate()
                .filter(|(_, line)| line.contains(pattern))
                .map(|(i, line)| format!("  {}:{}: {}", file.path.display(), i + 1, line.trim()))
        })
        .collect()
}

#[test]
fn sources_are_found() {
    let files = source_files();
    assert!(files.iter().any(|f| f.path.ends_with("engine.rs")), "scanner found no sources");
}

#[test]
fn pattern_budgets_hold() {
    let files = source_files();
    let mut failures = Vec::new();
    for (pattern, budget, cost) in BUDGETS {
        let found = hits(&files, pattern);
        if found.len() > *budget {
            failures.push(format!(
                "{pattern} ({cost}): found {}, max {budget}\n{}",
                found.len(),
                found.join("\n")
            ));
        }
    }
    assert!(failures.is_empty(), "hygiene budgets exceeded:\n{}", failures.join("\n"));
}
