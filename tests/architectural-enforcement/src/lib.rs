//! Architectural Enforcement
//!
//! Source-scanning helpers shared by the integration tests in `tests/`,
//! which enforce the workspace's layering rules:
//! - `shelf-core` stays UI-free; the TUI reaches the service only through it
//! - No sleep() calls in production code, apart from the TUI frame tick
//! - No blocking I/O inside async functions
//!
//! The scanners are line-based heuristics, not a parser. They understand
//! enough Rust to skip comments and test code.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// A rule broken at a specific line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File the line is in
    pub path: PathBuf,
    /// 1-based line number
    pub line: usize,
    /// The offending line, trimmed
    pub text: String,
    /// Which rule it breaks
    pub reason: &'static str,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} - {}: {}",
            self.path.display(),
            self.line,
            self.reason,
            self.text
        )
    }
}

/// Workspace root, found from this package's manifest directory
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

/// Path under the workspace root
pub fn workspace_path(relative: &str) -> PathBuf {
    workspace_root().join(relative)
}

/// Every `.rs` file under `dir`, sorted
pub fn rust_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// The code on a line, with any `//` comment removed
pub fn code_part(line: &str) -> &str {
    line.split("//").next().unwrap_or(line)
}

/// Whether a line declares a function (any visibility, async or not)
pub fn is_fn_declaration(line: &str) -> bool {
    let mut rest = line.trim_start();
    loop {
        let stripped = ["pub(crate) ", "pub(super) ", "pub ", "async ", "const ", "unsafe "]
            .iter()
            .find_map(|prefix| rest.strip_prefix(prefix));
        match stripped {
            Some(next) => rest = next,
            None => break,
        }
    }
    rest.starts_with("fn ")
}

/// Index of the nearest function declaration at or above `current_idx`
pub fn enclosing_fn(lines: &[&str], current_idx: usize) -> Option<usize> {
    (0..=current_idx.min(lines.len().saturating_sub(1)))
        .rev()
        .find(|&i| is_fn_declaration(lines[i]))
}

/// Whether the line sits inside an async function
pub fn is_in_async_function(lines: &[&str], current_idx: usize) -> bool {
    enclosing_fn(lines, current_idx).is_some_and(|i| {
        let decl = lines[i].trim_start();
        decl.contains("async fn ")
    })
}

/// Whether the line is test code: inside a `#[cfg(test)]` module or a
/// `#[test]` / `#[tokio::test]` function
pub fn is_in_test_code(lines: &[&str], current_idx: usize) -> bool {
    if let Some(module_start) = first_test_module(lines) {
        if current_idx > module_start {
            return true;
        }
    }

    let Some(fn_idx) = enclosing_fn(lines, current_idx) else {
        return false;
    };
    for i in (0..fn_idx).rev() {
        let line = lines[i].trim();
        if line.starts_with("#[test]") || line.starts_with("#[tokio::test") {
            return true;
        }
        if !line.starts_with("#[") && !line.starts_with("///") && !line.is_empty() {
            break;
        }
    }
    false
}

/// Line index of the first `#[cfg(test)]` that introduces a module
fn first_test_module(lines: &[&str]) -> Option<usize> {
    lines.iter().enumerate().find_map(|(i, line)| {
        if line.trim() != "#[cfg(test)]" {
            return None;
        }
        let next = lines[i + 1..].iter().map(|l| l.trim()).find(|l| !l.is_empty())?;
        let is_module = next.starts_with("mod ") || next.contains(" mod ");
        is_module.then_some(i)
    })
}

/// Run `check` over every production line of every Rust file under `dir`
///
/// `check` receives the file path, all lines, the line index and the code
/// part of the line; it returns the rule broken, if any. Test code and
/// comment-only text are never passed in.
pub fn scan<F>(dir: &Path, mut check: F) -> Vec<Violation>
where
    F: FnMut(&Path, &[&str], usize, &str) -> Option<&'static str>,
{
    let mut violations = Vec::new();

    for path in rust_files(dir) {
        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };
        let lines: Vec<&str> = content.lines().collect();

        for (idx, line) in lines.iter().enumerate() {
            let code = code_part(line);
            if code.trim().is_empty() || is_in_test_code(&lines, idx) {
                continue;
            }
            if let Some(reason) = check(&path, &lines, idx, code) {
                violations.push(Violation {
                    path: path.clone(),
                    line: idx + 1,
                    text: line.trim().to_string(),
                    reason,
                });
            }
        }
    }

    violations
}

/// Dependency names declared in a Cargo manifest (all dependency tables)
pub fn manifest_dependencies(manifest: &str) -> Vec<String> {
    let mut in_deps = false;
    let mut names = Vec::new();

    for line in manifest.lines() {
        let line = line.trim();
        if line.starts_with('[') {
            in_deps = line.contains("dependencies");
            continue;
        }
        if !in_deps || line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((name, _)) = line.split_once('=') {
            names.push(name.trim().to_string());
        }
    }

    names
}

/// Print violations and panic if there are any
pub fn assert_no_violations(rule: &str, violations: &[Violation]) {
    if violations.is_empty() {
        return;
    }

    eprintln!("\n❌ {rule}\n");
    for violation in violations {
        eprintln!("  ❌ {violation}");
    }

    panic!(
        "\nFound {} violation(s): {rule}.\nFix these before merging!",
        violations.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fn_declarations() {
        assert!(is_fn_declaration("fn main() {"));
        assert!(is_fn_declaration("    pub async fn run(&mut self) {"));
        assert!(is_fn_declaration("pub(crate) fn helper() {"));
        assert!(!is_fn_declaration("let f = fn_pointer;"));
        assert!(!is_fn_declaration("// fn commented()"));
    }

    #[test]
    fn test_async_function_detection() {
        let code = vec![
            "pub async fn fetch(&self) {",
            "    let contents = std::fs::read_to_string(\"file.txt\")?;",
            "}",
            "fn load() {",
            "    let contents = std::fs::read_to_string(\"config.toml\")?;",
            "}",
        ];
        assert!(is_in_async_function(&code, 1));
        assert!(!is_in_async_function(&code, 4));
    }

    #[test]
    fn test_test_code_detection() {
        let code = vec![
            "fn production() {",
            "    work();",
            "}",
            "",
            "#[tokio::test]",
            "async fn test_something() {",
            "    tokio::time::sleep(d).await;",
            "}",
        ];
        assert!(!is_in_test_code(&code, 1));
        assert!(is_in_test_code(&code, 6));

        let module = vec!["fn a() {}", "#[cfg(test)]", "mod tests {", "    fn helper() {}", "}"];
        assert!(!is_in_test_code(&module, 0));
        assert!(is_in_test_code(&module, 3));
    }

    #[test]
    fn test_manifest_dependencies() {
        let manifest = "[package]\nname = \"x\"\n\n[dependencies]\n# UI\nratatui = \"0.29\"\ntokio = { version = \"1\" }\n\n[dev-dependencies]\nproptest = \"1\"\n";
        assert_eq!(
            manifest_dependencies(manifest),
            vec!["ratatui", "tokio", "proptest"]
        );
    }

    #[test]
    fn test_code_part_strips_comments() {
        assert_eq!(code_part("let x = 1; // std::thread::sleep"), "let x = 1; ");
    }
}
