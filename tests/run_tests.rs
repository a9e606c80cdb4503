use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn fixtures_dir(group: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join(group)
}

/// Find all fixture directories in tests/<group>/
fn find_cases(group: &str) -> Vec<PathBuf> {
    let mut case_dirs = Vec::new();

    if let Ok(entries) = fs::read_dir(fixtures_dir(group)) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() && path.join("types.toml").exists() {
                case_dirs.push(path);
            }
        }
    }

    case_dirs.sort();
    case_dirs
}

fn typestring(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_typestring"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute typestring")
}

/// Run a single fixture: `typestring <command> types.toml [args.txt lines]`
fn run_case(command: &str, case_dir: &Path) -> Result<(), String> {
    let case_name = case_dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");

    let expected_output = fs::read_to_string(case_dir.join("expected_output.txt"))
        .map_err(|e| format!("Case '{}': failed to read expected_output.txt: {}", case_name, e))?;

    // One argument per line
    let extra_args = fs::read_to_string(case_dir.join("args.txt")).unwrap_or_default();

    let document = case_dir.join("types.toml");
    let mut args = vec![command, document.to_str().unwrap_or_default()];
    args.extend(extra_args.lines().map(str::trim).filter(|l| !l.is_empty()));

    let output = typestring(&args);

    if !output.status.success() {
        return Err(format!(
            "Case '{}': typestring {} failed with exit code {:?}\nStderr: {}",
            case_name,
            command,
            output.status.code(),
            String::from_utf8_lossy(&output.stderr)
        ));
    }

    let actual_output = String::from_utf8_lossy(&output.stdout);
    if actual_output.trim() != expected_output.trim() {
        return Err(format!(
            "Case '{}': output mismatch\nExpected:\n{}\nActual:\n{}",
            case_name,
            expected_output.trim(),
            actual_output.trim()
        ));
    }

    Ok(())
}

fn run_group(command: &str, group: &str) {
    let case_dirs = find_cases(group);

    if case_dirs.is_empty() {
        panic!("No fixtures found in tests/{}/", group);
    }

    let mut failures = Vec::new();

    for case_dir in &case_dirs {
        if let Err(e) = run_case(command, case_dir) {
            failures.push(e);
        }
    }

    if !failures.is_empty() {
        for failure in &failures {
            eprintln!("  {}", failure);
        }
        panic!("{} case(s) failed", failures.len());
    }
}

#[test]
fn test_render_fixtures() {
    run_group("render", "render");
}

#[test]
fn test_check_fixtures() {
    run_group("check", "check");
}

// ========== Failures ==========

fn write_document(dir: &tempfile::TempDir, source: &str) -> PathBuf {
    let path = dir.path().join("types.toml");
    fs::write(&path, source).unwrap();
    path
}

#[test]
fn test_unknown_reference_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_document(
        &dir,
        r#"
[types.p]
kind = "pointer"
elem = "nowhere"
"#,
    );

    let output = typestring(&["check", path.to_str().unwrap()]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("nowhere"), "stderr: {}", stderr);
}

#[test]
fn test_unknown_selected_type_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_document(
        &dir,
        r#"
[types.any]
kind = "empty_interface"
"#,
    );

    let output = typestring(&["render", path.to_str().unwrap(), "--type", "ghost"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ghost"));
}

#[test]
fn test_limits_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_document(
        &dir,
        r#"
[types.a]
kind = "pointer"
elem = "b"

[types.b]
kind = "pointer"
elem = "c"

[types.c]
kind = "primitive"
name = "int"
"#,
    );
    let config = dir.path().join("typestring.toml");
    fs::write(&config, "[limits]\nmax_nesting_depth = 1\n").unwrap();

    let permissive = typestring(&["check", path.to_str().unwrap()]);
    assert!(permissive.status.success());
    assert_eq!(String::from_utf8_lossy(&permissive.stdout).trim(), "ok: 3 types");

    let limited = typestring(&[
        "check",
        path.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);
    assert!(!limited.status.success());
}

#[test]
fn test_missing_document_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.toml");

    let output = typestring(&["render", missing.to_str().unwrap()]);

    assert!(!output.status.success());
}
