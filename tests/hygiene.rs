//! Hygiene — source-level budgets for the lazyload crate.
//!
//! Scans production `.rs` files under `src/` (sibling `*_test.rs` modules are
//! skipped) and counts lines containing each forbidden pattern. Budgets only
//! ever go down.

use std::fs;
use std::path::Path;

struct Budget {
    pattern: &'static str,
    max: usize,
    why: &'static str,
}

// Panics.
const UNWRAP: Budget = Budget { pattern: ".unwrap()", max: 0, why: "propagate or handle the error" };
const EXPECT: Budget = Budget { pattern: ".expect(", max: 0, why: "propagate or handle the error" };
const PANIC: Budget = Budget { pattern: "panic!(", max: 0, why: "no candidate failure may take down the page" };
const UNREACHABLE: Budget = Budget { pattern: "unreachable!(", max: 0, why: "model the state instead" };
const TODO: Budget = Budget { pattern: "todo!(", max: 0, why: "finish the stub" };
const UNIMPLEMENTED: Budget = Budget { pattern: "unimplemented!(", max: 0, why: "finish the stub" };

// Silent loss.
const SILENT_DISCARD: Budget = Budget { pattern: "let _ =", max: 0, why: "inspect and log DOM results" };
const DOT_OK: Budget = Budget { pattern: ".ok()", max: 0, why: "inspect and log DOM results" };

// Runtime model: single-threaded, logged through the `log` facade.
const THREAD_SPAWN: Budget = Budget { pattern: "thread::spawn", max: 0, why: "the controller never runs work in parallel" };
const PRINTLN: Budget = Budget { pattern: "println!(", max: 0, why: "use the log facade" };
const EPRINTLN: Budget = Budget { pattern: "eprintln!(", max: 0, why: "use the log facade" };

// Structure.
const ALLOW_DEAD_CODE: Budget = Budget { pattern: "#[allow(dead_code)]", max: 0, why: "delete unused code" };

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
        let path_str = path.to_string_lossy().to_string();
        if !path_str.ends_with(".rs") || path_str.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

fn check(budget: &Budget) {
    let files = source_files();
    assert!(!files.is_empty(), "no sources found under src/; run from the crate root");

    let hits = files
        .iter()
        .filter_map(|file| {
            let count = file.content.lines().filter(|line| line.contains(budget.pattern)).count();
            (count > 0).then(|| (file.path.as_str(), count))
        })
        .collect::<Vec<_>>();
    let total = hits.iter().map(|(_, count)| count).sum::<usize>();
    let listing = hits
        .iter()
        .map(|(path, count)| format!("  {path}: {count}"))
        .collect::<Vec<_>>()
        .join("\n");

    assert!(
        total <= budget.max,
        "`{}` budget exceeded: found {total}, max {} ({}).\n{listing}",
        budget.pattern,
        budget.max,
        budget.why
    );
}

#[test]
fn unwrap_budget() {
    check(&UNWRAP);
}

#[test]
fn expect_budget() {
    check(&EXPECT);
}

#[test]
fn panic_budget() {
    check(&PANIC);
}

#[test]
fn unreachable_budget() {
    check(&UNREACHABLE);
}

#[test]
fn todo_budget() {
    check(&TODO);
}

#[test]
fn unimplemented_budget() {
    check(&UNIMPLEMENTED);
}

#[test]
fn silent_discard_budget() {
    check(&SILENT_DISCARD);
}

#[test]
fn dot_ok_budget() {
    check(&DOT_OK);
}

#[test]
fn thread_spawn_budget() {
    check(&THREAD_SPAWN);
}

#[test]
fn println_budget() {
    check(&PRINTLN);
}

#[test]
fn eprintln_budget() {
    check(&EPRINTLN);
}

#[test]
fn allow_dead_code_budget() {
    check(&ALLOW_DEAD_CODE);
}
