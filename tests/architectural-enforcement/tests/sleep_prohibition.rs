//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code MUST NOT call sleep methods. Waiting happens
//! on I/O, channels or timeouts.
//! **Exceptions**: the frame tick in the TUI event loop, test code.

use std::path::Path;

use architectural_enforcement::{assert_no_violations, scan, workspace_path, Violation};

fn is_sleep_call(code: &str) -> bool {
    code.contains("::sleep(") || code.contains(".sleep(")
}

/// The event loop's frame tick: `tokio::time::sleep(FRAME_TICK)` inside `select!`
fn is_frame_tick(path: &Path, lines: &[&str], idx: usize) -> bool {
    if !path.ends_with("tui/src/app.rs") {
        return false;
    }
    let context = idx.saturating_sub(10)..(idx + 5).min(lines.len());
    lines[idx].contains("tokio::time::sleep")
        && lines[context].iter().any(|l| {
            let l = l.to_lowercase();
            l.contains("frame") || l.contains("select!")
        })
}

fn find_sleep_violations(dir: &str) -> Vec<Violation> {
    let dir = workspace_path(dir);
    assert!(dir.exists(), "{} should exist", dir.display());

    scan(&dir, |path, lines, idx, code| {
        if !is_sleep_call(code) {
            return None;
        }
        if code.contains("thread::sleep") {
            return Some("Thread sleep blocks the runtime");
        }
        if is_frame_tick(path, lines, idx) {
            return None;
        }
        Some("Sleep in production code")
    })
}

#[test]
fn test_no_sleep_in_core() {
    assert_no_violations(
        "No sleep in shelf-core",
        &find_sleep_violations("shelf/core/src"),
    );
}

#[test]
fn test_only_frame_tick_sleeps_in_tui() {
    assert_no_violations(
        "No sleep in the TUI apart from the frame tick",
        &find_sleep_violations("tui/src"),
    );
}
