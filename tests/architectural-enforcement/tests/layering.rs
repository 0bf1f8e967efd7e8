//! Integration Test: Layering
//!
//! **Policy**: `shelf-core` is headless. It must not depend on ratatui or
//! crossterm, so it can drive any surface or run under test. The TUI talks
//! to the generation service only through `shelf-core`, never directly.

use std::fs;

use architectural_enforcement::{
    assert_no_violations, manifest_dependencies, scan, workspace_path,
};

const UI_CRATES: &[&str] = &["ratatui", "crossterm"];

#[test]
fn test_core_manifest_has_no_ui_dependencies() {
    let manifest = fs::read_to_string(workspace_path("shelf/core/Cargo.toml"))
        .expect("shelf/core/Cargo.toml should exist");

    let deps = manifest_dependencies(&manifest);
    assert!(deps.iter().any(|d| d == "tokio"), "manifest parse found no deps");

    for ui in UI_CRATES {
        assert!(
            !deps.iter().any(|d| d == ui),
            "shelf-core must not depend on {ui}"
        );
    }
}

#[test]
fn test_core_sources_do_not_reference_ui_crates() {
    let dir = workspace_path("shelf/core/src");
    assert!(dir.exists(), "{} should exist", dir.display());

    let violations = scan(&dir, |_, _, _, code| {
        UI_CRATES
            .iter()
            .any(|ui| code.contains(&format!("{ui}::")))
            .then_some("UI crate referenced from shelf-core")
    });

    assert_no_violations("shelf-core must stay UI-free", &violations);
}

#[test]
fn test_tui_reaches_service_only_through_core() {
    let manifest = fs::read_to_string(workspace_path("tui/Cargo.toml"))
        .expect("tui/Cargo.toml should exist");
    let deps = manifest_dependencies(&manifest);

    assert!(deps.iter().any(|d| d == "shelf-core"));
    assert!(
        !deps.iter().any(|d| d == "reqwest"),
        "the TUI must not call the generation service directly"
    );

    let violations = scan(&workspace_path("tui/src"), |_, _, _, code| {
        code.contains("reqwest::")
            .then_some("HTTP client used outside shelf-core")
    });
    assert_no_violations("TUI must go through shelf-core", &violations);
}
