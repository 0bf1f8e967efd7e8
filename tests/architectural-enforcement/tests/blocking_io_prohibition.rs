//! Integration Test: Blocking I/O Prohibition
//!
//! **Policy**: async functions in production code MUST NOT block the
//! runtime. Use `tokio::fs`, `tokio::net` and async `reqwest`.
//! **Acceptable**: blocking I/O in non-async functions (config loading
//! before the UI starts, log file setup) and test code.

use architectural_enforcement::{
    assert_no_violations, is_in_async_function, scan, workspace_path, Violation,
};

fn blocking_reason(code: &str) -> Option<&'static str> {
    if code.contains("std::fs::") {
        Some("Blocking file I/O in async fn")
    } else if code.contains("std::net::") {
        Some("Blocking network I/O in async fn")
    } else if code.contains("std::process::Command") {
        Some("Blocking process I/O in async fn")
    } else if code.contains("reqwest::blocking") {
        Some("Blocking HTTP client")
    } else {
        None
    }
}

fn find_blocking_io_violations(dir: &str) -> Vec<Violation> {
    let dir = workspace_path(dir);
    assert!(dir.exists(), "{} should exist", dir.display());

    scan(&dir, |_, lines, idx, code| {
        let reason = blocking_reason(code)?;
        // The blocking client is never acceptable, async or not
        if code.contains("reqwest::blocking") || is_in_async_function(lines, idx) {
            Some(reason)
        } else {
            None
        }
    })
}

#[test]
fn test_no_blocking_io_in_core() {
    assert_no_violations(
        "All I/O in async shelf-core code must be async",
        &find_blocking_io_violations("shelf/core/src"),
    );
}

#[test]
fn test_no_blocking_io_in_tui() {
    assert_no_violations(
        "All I/O in async TUI code must be async",
        &find_blocking_io_violations("tui/src"),
    );
}
