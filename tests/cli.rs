//! CLI integration tests.
//!
//! Tests the command-line interface by running the binary as a subprocess.

mod common;

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

use common::{write_file, SAMPLE_BIB};

/// Path to the compiled binary
fn binary_path() -> &'static str {
    env!("CARGO_BIN_EXE_bib-shorten")
}

fn run(args: &[&str]) -> Output {
    Command::new(binary_path())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

// ============================================
// Tests for CLI argument parsing
// ============================================

#[test]
fn test_cli_help() {
    // Given: The CLI binary
    let output = run(&["--help"]);

    // Then: Help is displayed with expected content
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("bib-shorten") || stdout.contains("et al."),
        "Help should mention the tool name or purpose: {}",
        stdout
    );
    assert!(
        stdout.contains("--collapse-online"),
        "Help should list --collapse-online: {}",
        stdout
    );
    assert!(output.status.success(), "Help should exit with success");
}

#[test]
fn test_cli_missing_input() {
    // Given: No positional argument
    let output = run(&[]);

    // Then: clap reports the missing argument
    assert!(!output.status.success(), "Missing input should fail");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("required") || stderr.contains("Usage"),
        "Should indicate missing required argument: {}",
        stderr
    );
}

// ============================================
// Tests for shortening
// ============================================

#[test]
fn test_cli_shortens_file() {
    // Given: A bib file exercising every rule
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "refs.bib", SAMPLE_BIB);

    // When: We run the tool
    let output = run(&[path_arg(&input)]);

    // Then: It succeeds and writes the sibling file
    assert!(
        output.status.success(),
        "Run should succeed. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("shortened 4 entries"),
        "Summary should count entries: {}",
        stderr
    );

    let short = fs::read_to_string(dir.path().join("refs_short.bib")).unwrap();
    assert!(short.contains(r"author = {Smith \textit{et al.}, John}"), "{}", short);
    assert!(
        short.contains("author = {Last1, First1 and Last2, First2 and Last3, First3}"),
        "{}",
        short
    );
    assert!(!short.contains("pages"), "pages should be removed: {}", short);
    assert!(!short.contains("address"), "address should be removed: {}", short);
    assert!(!short.contains("In press"), "article note should be removed: {}", short);
    assert!(short.contains("note = {Version 2}"), "misc note should stay: {}", short);
    assert!(short.contains("url = {http://x}"), "online kept by default: {}", short);

    // And: The input is untouched and entries keep their order
    assert_eq!(fs::read_to_string(&input).unwrap(), SAMPLE_BIB);
    let positions: Vec<usize> = ["{long,", "{three,", "{tool,", "{site,"]
        .iter()
        .map(|k| short.find(k).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", short);
}

#[test]
fn test_cli_collapse_online() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "refs.bib", SAMPLE_BIB);

    let output = run(&[path_arg(&input), "--collapse-online"]);

    assert!(output.status.success());
    let short = fs::read_to_string(dir.path().join("refs_short.bib")).unwrap();
    assert!(
        short.contains("@online{site,\n note = {http://x}\n}"),
        "online entry should collapse: {}",
        short
    );
    assert!(!short.contains("A Website"), "{}", short);
}

#[test]
fn test_cli_custom_remove() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "refs.bib", SAMPLE_BIB);

    let output = run(&[path_arg(&input), "--remove", "title"]);

    assert!(output.status.success());
    let short = fs::read_to_string(dir.path().join("refs_short.bib")).unwrap();
    assert!(!short.contains("title"), "{}", short);
    assert!(short.contains("pages = {1--10}"), "{}", short);
}

#[test]
fn test_cli_input_without_bib_extension() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "references", SAMPLE_BIB);

    let output = run(&[path_arg(&input)]);

    assert!(output.status.success());
    assert!(dir.path().join("references_short.bib").exists());
}

// ============================================
// Tests for exit codes
// ============================================

#[test]
fn test_exit_code_10_input_not_found() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.bib");

    let output = run(&[path_arg(&missing)]);

    assert_eq!(
        output.status.code(),
        Some(10),
        "Missing input should exit with code 10, got {:?}. stderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"), "{}", stderr);
    assert!(stderr.contains("hint:"), "{}", stderr);
}

#[test]
fn test_exit_code_11_parse_error() {
    // Given: A file whose second record never closes
    let dir = TempDir::new().unwrap();
    let input = write_file(
        dir.path(),
        "bad.bib",
        "@misc{ok, title = {Fine}}\n@article{bad, title = {Oops\n",
    );

    // When: We run the tool
    let output = run(&[path_arg(&input)]);

    // Then: It fails with code 11 and writes nothing
    assert_eq!(
        output.status.code(),
        Some(11),
        "Malformed input should exit with code 11, got {:?}. stderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("@article"), "{}", stderr);
    assert!(!dir.path().join("bad_short.bib").exists());
}

#[test]
fn test_exit_code_15_output_not_writable() {
    // Given: The output path is occupied by a directory
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "refs.bib", SAMPLE_BIB);
    fs::create_dir(dir.path().join("refs_short.bib")).unwrap();

    let output = run(&[path_arg(&input)]);

    assert_eq!(
        output.status.code(),
        Some(15),
        "Unwritable output should exit with code 15, got {:?}. stderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );
}
