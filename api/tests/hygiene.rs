//! Hygiene: source-level budgets checked at test time.
//!
//! Scans the production sources of this crate (sibling `*_test.rs` files are
//! skipped) for constructs the client must not contain. Budgets only ever go
//! down.

use std::fs;
use std::path::Path;

/// `(pattern, budget, why)` for every checked construct.
const BUDGETS: &[(&str, usize, &str)] = &[
    // Panics: a bad response is an ApiError, never a crash.
    (".unwrap()", 0, "propagate with ? or handle the None/Err"),
    (".expect(", 0, "propagate with ? or handle the None/Err"),
    ("panic!(", 0, "return an error instead"),
    ("unreachable!(", 0, "make the state unrepresentable instead"),
    ("todo!(", 0, "finish the stub"),
    ("unimplemented!(", 0, "finish the stub"),
    // Silent loss.
    ("let _ =", 0, "inspect or log the discarded value"),
    (".ok()", 0, "match on the error instead of dropping it"),
    // Output goes through tracing, never straight to the terminal.
    ("println!(", 0, "use tracing"),
    ("eprintln!(", 0, "use tracing"),
    ("dbg!(", 0, "remove debugging output"),
    // Structure.
    ("#[allow(dead_code)]", 0, "delete the dead code"),
];

struct SourceFile {
    path: String,
    content: String,
}

fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect(Path::new("src"), &mut files);
    files
}

fn collect(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|e| e.path()) {
        if path.is_dir() {
            collect(&path, out);
            continue;
        }
        let path_str = path.to_string_lossy().to_string();
        if path.extension().is_none_or(|e| e != "rs") || path_str.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

fn hits(files: &[SourceFile], pattern: &str) -> Vec<(String, usize)> {
    files
        .iter()
        .map(|f| (f.path.clone(), f.content.lines().filter(|l| l.contains(pattern)).count()))
        .filter(|(_, n)| *n > 0)
        .collect()
}

#[test]
fn sources_are_found() {
    assert!(!source_files().is_empty(), "no sources under src/; run from the crate root");
}

#[test]
fn budgets_hold() {
    let files = source_files();
    let mut failures = Vec::new();
    for (pattern, budget, why) in BUDGETS {
        let found = hits(&files, pattern);
        let count: usize = found.iter().map(|(_, n)| n).sum();
        if count > *budget {
            let detail: Vec<String> = found.iter().map(|(p, n)| format!("    {p}: {n}")).collect();
            failures.push(format!("{pattern} found {count}, max {budget} ({why})\n{}", detail.join("\n")));
        }
    }
    assert!(failures.is_empty(), "hygiene budgets exceeded:\n{}", failures.join("\n"));
}
