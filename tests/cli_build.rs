//! End-to-end tests: run the `daybook` binary against `fixtures/content/`
//! and inspect the generated tree.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Setup helpers
// ---------------------------------------------------------------------------

/// Copy the fixture tree into a fresh temp dir so tests never share output.
fn fixture_copy() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, &tmp.path().join("source")).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

fn daybook(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_daybook"))
        .current_dir(root)
        .env_remove("RUST_LOG")
        .env("DAYBOOK_SECRET", "hunter2")
        .args(args)
        .output()
        .expect("failed to run daybook")
}

fn build_at(root: &Path, now: &str) -> Output {
    let out = daybook(root, &["build", "--now", now]);
    assert!(
        out.status.success(),
        "build failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    out
}

fn read(root: &Path, path: &str) -> String {
    fs::read_to_string(root.join("docs").join(path))
        .unwrap_or_else(|e| panic!("cannot read docs/{path}: {e}"))
}

// ---------------------------------------------------------------------------
// Output tree
// ---------------------------------------------------------------------------

#[test]
fn build_writes_expected_tree() {
    let tmp = fixture_copy();
    build_at(tmp.path(), "2024-03-01");
    let docs = tmp.path().join("docs");

    for path in [
        ".nojekyll",
        "index.html",
        "archive/top/index.html",
        "archive/2023/11.html",
        "archive/2023/12.html",
        "archive/2024/01.html",
        "archive/2024/02.html",
        "category/diary/001.html",
        "category/editor/001.html",
        "category/お知らせ/001.html",
        "category/uncategorized/001.html",
        "js/litebox.js",
    ] {
        assert!(docs.join(path).is_file(), "missing docs/{path}");
    }
    assert!(!docs.join("archive/2024/03.html").exists());
    assert_eq!(fs::read(docs.join(".nojekyll")).unwrap().len(), 0);
}

#[test]
fn pages_are_wrapped_in_templates() {
    let tmp = fixture_copy();
    build_at(tmp.path(), "2024-03-01");
    let month = read(tmp.path(), "archive/2024/01.html");
    assert!(month.starts_with("<!DOCTYPE html>"));
    assert!(month.contains("<title>2024-01 | Fixture Devlog</title>"));
    assert!(month.contains("<h1 class=\"site-title\">2024-01</h1>"));
    assert!(month.trim_end().ends_with("</html>"));

    let category = read(tmp.path(), "category/diary/001.html");
    assert!(category.contains("<title>日記 | Fixture Devlog</title>"));
}

#[test]
fn same_day_entries_get_lettered_anchors() {
    let tmp = fixture_copy();
    build_at(tmp.path(), "2024-03-01");
    let month = read(tmp.path(), "archive/2024/01.html");

    let evening = month.find(r#"id="2024-01-05A""#).expect("evening anchor");
    let morning = month.find(r#"id="2024-01-05""#).expect("morning anchor");
    assert!(evening < morning, "month page lists newest first");
    assert!(month.contains(
        r#"data-permalink="https://example.com/devlog/archive/2024/01.html#2024-01-05A""#
    ));
}

#[test]
fn secret_is_substituted_from_environment() {
    let tmp = fixture_copy();
    build_at(tmp.path(), "2024-03-01");
    let month = read(tmp.path(), "archive/2024/02.html");
    assert!(month.contains("hunter2"));
    assert!(!month.contains("%SECRET_TOKEN%"));
}

#[test]
fn top_index_covers_two_newest_months() {
    let tmp = fixture_copy();
    build_at(tmp.path(), "2024-03-01");
    let top = read(tmp.path(), "archive/top/index.html");
    assert!(top.contains(r#"id="2024-02-11""#));
    assert!(top.contains(r#"id="2024-01-01""#));
    assert!(!top.contains(r#"id="2023-12-31""#));
    assert!(top.contains(r#"<a class="older" href="../../archive/2023/12.html">"#));
}

#[test]
fn master_index_groups_years_newest_first() {
    let tmp = fixture_copy();
    build_at(tmp.path(), "2024-03-01");
    let index = read(tmp.path(), "index.html");
    let y2024 = index.find(r#"id="y2024""#).unwrap();
    let y2023 = index.find(r#"id="y2023""#).unwrap();
    assert!(y2024 < y2023);
    assert!(index.contains(r#"href="./archive/2023/11.html#2023-11-20""#));
    assert!(!index.contains("下書きメモ"), "undated entry must not appear");
}

// ---------------------------------------------------------------------------
// Scheduled publishing
// ---------------------------------------------------------------------------

#[test]
fn future_entry_hidden_until_build_time_passes() {
    let tmp = fixture_copy();
    build_at(tmp.path(), "2024-03-01");
    assert!(!read(tmp.path(), "index.html").contains("最終回"));
    assert!(!read(tmp.path(), "category/diary/001.html").contains("最終回"));
    assert!(!tmp.path().join("docs/archive/2024/03.html").exists());

    build_at(tmp.path(), "2024-03-10");
    assert!(read(tmp.path(), "index.html").contains("最終回"));
    assert!(read(tmp.path(), "archive/2024/03.html").contains("最終回"));
    assert!(read(tmp.path(), "category/diary/001.html").contains("最終回"));
}

#[test]
fn rebuild_is_byte_identical() {
    let tmp = fixture_copy();
    build_at(tmp.path(), "2024-03-01");
    let first = read(tmp.path(), "archive/2023/11.html");
    let first_index = read(tmp.path(), "index.html");
    build_at(tmp.path(), "2024-03-01");
    assert_eq!(first, read(tmp.path(), "archive/2023/11.html"));
    assert_eq!(first_index, read(tmp.path(), "index.html"));
}

// ---------------------------------------------------------------------------
// Failures and other commands
// ---------------------------------------------------------------------------

#[test]
fn missing_template_fails_without_output() {
    let tmp = fixture_copy();
    fs::remove_file(tmp.path().join("source/templates/header.html")).unwrap();
    let out = daybook(tmp.path(), &["build", "--now", "2024-03-01"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("header.html"));
    assert!(!tmp.path().join("docs").exists());
}

#[test]
fn invalid_date_fails_with_location() {
    let tmp = fixture_copy();
    fs::write(
        tmp.path().join("source/entries/broken.md"),
        "TITLE: broken\nDATE: 2024/01/05\nBODY:\nx\n-----\n",
    )
    .unwrap();
    let out = daybook(tmp.path(), &["build", "--now", "2024-03-01"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("entries/broken.md"), "stderr: {stderr}");
    assert!(stderr.contains("2024/01/05"), "stderr: {stderr}");
}

#[test]
fn scan_writes_manifest() {
    let tmp = fixture_copy();
    let out = daybook(tmp.path(), &["scan"]);
    assert!(out.status.success());
    let manifest = fs::read_to_string(tmp.path().join(".daybook-temp/manifest.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&manifest).unwrap();
    assert_eq!(json["entries"].as_array().unwrap().len(), 10);
    assert!(String::from_utf8_lossy(&out.stdout).contains("entries/2024.md"));
}

#[test]
fn check_reports_hidden_entries_and_writes_nothing() {
    let tmp = fixture_copy();
    let out = daybook(tmp.path(), &["check", "--now", "2024-03-01"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("1 undated"));
    assert!(stdout.contains("1 scheduled"));
    assert!(!tmp.path().join("docs").exists());
}

#[test]
fn gen_config_prints_stock_config() {
    let tmp = TempDir::new().unwrap();
    let out = daybook(tmp.path(), &["gen-config"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("[site]"));
    assert!(stdout.contains("[labels]"));
}
