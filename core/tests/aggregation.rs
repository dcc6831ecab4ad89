use aidigest_core::{AggregationRequest, NoProgress, aggregate};
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

fn request(root: &Path) -> AggregationRequest {
    let mut request = AggregationRequest::new(root, root.join("codebase.md"));
    request.use_default_ignores = false;
    request
}

#[test]
fn renders_one_section_per_file_in_case_insensitive_order() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("b.txt"), "bee").unwrap();
    fs::write(dir.path().join("A.txt"), "ay").unwrap();
    fs::create_dir(dir.path().join("src")).unwrap();
    fs::write(dir.path().join("src/main.rs"), "fn main() {}").unwrap();

    let result = aggregate(&request(dir.path()), &NoProgress).unwrap();
    assert_eq!(result.included_files, 3);
    assert_eq!(result.total_files, 3);

    let document = fs::read_to_string(dir.path().join("codebase.md")).unwrap();
    let a = document.find("# A.txt").unwrap();
    let b = document.find("# b.txt").unwrap();
    let main = document.find("# src/main.rs").unwrap();
    assert!(a < b && b < main);
    assert!(document.contains("# src/main.rs\n\n```rs\nfn main() {}\n```\n\n"));
}

#[test]
fn rerun_on_unchanged_directory_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("one.txt"), "1").unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("nested/two.md"), "2").unwrap();

    aggregate(&request(dir.path()), &NoProgress).unwrap();
    let first = fs::read(dir.path().join("codebase.md")).unwrap();

    // The previous output is excluded by file name, so the rerun sees the
    // same inputs and must reproduce the document exactly.
    aggregate(&request(dir.path()), &NoProgress).unwrap();
    let second = fs::read(dir.path().join("codebase.md")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn empty_directory_writes_empty_document_without_error() {
    let dir = TempDir::new().unwrap();
    let result = aggregate(&request(dir.path()), &NoProgress).unwrap();
    assert_eq!(result.total_files, 0);
    assert_eq!(result.included_files, 0);
    assert!(dir.path().join("codebase.md").exists());
    assert_eq!(fs::read_to_string(dir.path().join("codebase.md")).unwrap(), "");
}

#[test]
fn ignore_patterns_exclude_files_and_are_counted() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("app")).unwrap();
    fs::create_dir_all(dir.path().join("app/build")).unwrap();
    fs::write(dir.path().join("app/build/out.js"), "x").unwrap();
    fs::write(dir.path().join("rebuild.txt"), "x").unwrap();
    fs::write(dir.path().join("keep.rs"), "x").unwrap();

    let mut request = request(dir.path());
    request.ignore_patterns = vec!["build".to_string()];
    let result = aggregate(&request, &NoProgress).unwrap();

    // Literal rules are substring matches: both the build directory and
    // rebuild.txt are excluded.
    assert_eq!(result.ignored_files, 2);
    assert_eq!(result.included_files, 1);
    let document = fs::read_to_string(dir.path().join("codebase.md")).unwrap();
    assert!(document.contains("# keep.rs"));
    assert!(!document.contains("rebuild.txt"));
}

#[test]
fn glob_patterns_match_nested_paths() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("vendor")).unwrap();
    fs::write(dir.path().join("vendor/app.min.js"), "x").unwrap();
    fs::write(dir.path().join("app.js"), "x").unwrap();

    let mut request = request(dir.path());
    request.ignore_patterns = vec!["*.min.js".to_string()];
    let result = aggregate(&request, &NoProgress).unwrap();
    assert_eq!(result.ignored_files, 1);
    assert_eq!(result.included_files, 1);
}

#[test]
fn binary_and_svg_files_become_type_notes() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("icon.svg"), "<svg/>").unwrap();
    fs::write(dir.path().join("blob.dat"), b"ab\x00cd").unwrap();

    let result = aggregate(&request(dir.path()), &NoProgress).unwrap();
    assert_eq!(result.included_files, 2);
    assert_eq!(result.binary_files, 2);

    let document = fs::read_to_string(dir.path().join("codebase.md")).unwrap();
    assert!(document.contains("# icon.svg\n\nThis is a file of the type: SVG Image\n"));
    assert!(document.contains("# blob.dat\n\nThis is a binary file of the type: Binary\n"));
}

#[test]
fn triple_backticks_never_close_the_fence_early() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("snippet.md"), "before\n```\ncode\n```\nafter").unwrap();

    aggregate(&request(dir.path()), &NoProgress).unwrap();
    let document = fs::read_to_string(dir.path().join("codebase.md")).unwrap();

    let body_start = document.find("```md\n").unwrap() + "```md\n".len();
    let body_end = document.rfind("\n```\n").unwrap();
    let body = &document[body_start..body_end];
    assert!(!body.contains("```"));
    assert!(body.contains("\\`\\`\\`"));
}

#[test]
fn whitespace_collapsing_spares_indentation_sensitive_files() {
    let dir = TempDir::new().unwrap();
    let python = "def f():\n    return 1\n";
    fs::write(dir.path().join("script.py"), python).unwrap();
    fs::write(dir.path().join("notes.txt"), "a   b\n\nc").unwrap();

    let mut request = request(dir.path());
    request.strip_whitespace = true;
    aggregate(&request, &NoProgress).unwrap();

    let document = fs::read_to_string(dir.path().join("codebase.md")).unwrap();
    assert!(document.contains("```txt\na b c\n```"));
    assert!(document.contains(python));
}

#[test]
fn one_undecodable_file_does_not_abort_the_run() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("good.txt"), "fine").unwrap();
    // Invalid UTF-8 with no NUL byte: passes the binary probe, then fails
    // the full text read.
    fs::write(dir.path().join("broken.txt"), [0xC3u8, 0x28, 0x61]).unwrap();

    let messages = Mutex::new(Vec::new());
    let progress = |message: &str| {
        messages.lock().unwrap().push(message.to_string());
    };
    let result = aggregate(&request(dir.path()), &progress).unwrap();

    assert_eq!(result.included_files, 1);
    assert_eq!(result.error_files.len(), 1);
    assert_eq!(result.error_files[0].path, "broken.txt");

    let document = fs::read_to_string(dir.path().join("codebase.md")).unwrap();
    assert!(document.contains("# good.txt"));
    assert!(!document.contains("# broken.txt"));

    let messages = messages.into_inner().unwrap();
    assert!(
        messages
            .iter()
            .any(|m| m.starts_with("Warning: Could not process file 'broken.txt'"))
    );
    assert!(messages.iter().any(|m| m.starts_with("Done!")));
}

#[test]
fn progress_reports_summary_counts_in_order() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), "a").unwrap();

    let messages = Mutex::new(Vec::new());
    let progress = |message: &str| {
        messages.lock().unwrap().push(message.to_string());
    };
    aggregate(&request(dir.path()), &progress).unwrap();

    let messages = messages.into_inner().unwrap();
    let found = messages.iter().position(|m| m.starts_with("Found 1 files in")).unwrap();
    let total = messages.iter().position(|m| m == "Total files found: 1").unwrap();
    let included = messages
        .iter()
        .position(|m| m == "Files included in output: 1")
        .unwrap();
    let done = messages.iter().position(|m| m.starts_with("Done!")).unwrap();
    assert!(found < total && total < included && included < done);
}

#[test]
fn output_parent_directory_is_created() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), "a").unwrap();

    let mut request = request(dir.path());
    request.output_file = dir.path().join("out/deep/codebase.md");
    let result = aggregate(&request, &NoProgress).unwrap();
    assert!(request.output_file.exists());
    assert_eq!(result.output_size, fs::metadata(&request.output_file).unwrap().len());
}

#[test]
fn default_ignores_drop_common_artifacts() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("node_modules/pkg")).unwrap();
    fs::write(dir.path().join("node_modules/pkg/index.js"), "x").unwrap();
    fs::write(dir.path().join("main.js"), "x").unwrap();

    let mut request = request(dir.path());
    request.use_default_ignores = true;
    let result = aggregate(&request, &NoProgress).unwrap();
    assert_eq!(result.included_files, 1);
    assert_eq!(result.ignored_files, 1);
}
