//! Integration tests for nephro CLI

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::tempdir;

const HEADER: &str = "Area\tFeret\tFeretX\tFeretY\tFeretAngle\tMinFeret\n";

fn run_nephro(args: &[&str]) -> (String, String, bool) {
    let mut cmd_args = vec!["run", "-q", "-p", "nephro", "--"];
    cmd_args.extend(args);

    let output = Command::new("cargo")
        .args(&cmd_args)
        .current_dir(env!("CARGO_MANIFEST_DIR").to_string() + "/..")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();

    (stdout, stderr, success)
}

fn export(areas: &[f64]) -> String {
    let mut content = HEADER.to_string();
    for (i, area) in areas.iter().enumerate() {
        content.push_str(&format!("{}\t{area}\t10.0\t1.0\t1.0\t1.0\t1.0\n", i + 1));
    }
    content
}

/// Two biopsies: B1 with images 1 and 2, B2 with image 5.
fn create_fixture(root: &Path) {
    fs::create_dir_all(root.join("B1")).unwrap();
    fs::create_dir_all(root.join("B2")).unwrap();

    fs::write(
        root.join("B1/1.xls"),
        export(&[8914.940, 23.243, 40.369, 16.014]),
    )
    .unwrap();
    fs::write(
        root.join("B1/2.xls"),
        export(&[8734.557, 55.939, 6584.420, 18.238]),
    )
    .unwrap();
    fs::write(root.join("B2/5.xls"), export(&[5000.0, 12.0])).unwrap();
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_cli_help() {
    let (stdout, _, success) = run_nephro(&["--help"]);

    assert!(success);
    assert!(stdout.contains("nephro"));
    assert!(stdout.contains("--output"));
    assert!(stdout.contains("--skip-invalid"));
    assert!(stdout.contains("biopsy"));
    assert!(stdout.contains("image"));
}

#[test]
fn test_cli_version() {
    let (stdout, _, success) = run_nephro(&["--version"]);

    assert!(success);
    assert!(stdout.contains("nephro"));
}

#[test]
fn test_root_table_output() {
    let temp = tempdir().unwrap();
    create_fixture(temp.path());

    let (stdout, stderr, success) = run_nephro(&[path_str(temp.path())]);

    assert!(success, "stderr: {stderr}");
    assert!(stdout.contains("Biopsy"));
    assert!(stdout.contains("Glomeruli"));
    assert!(stdout.contains("B1"));
    assert!(stdout.contains("B2"));
    assert!(stdout.contains("Total (2 biopsies)"));
}

#[test]
fn test_root_json_output() {
    let temp = tempdir().unwrap();
    create_fixture(temp.path());

    let (stdout, stderr, success) = run_nephro(&[path_str(temp.path()), "--output", "json"]);
    assert!(success, "stderr: {stderr}");

    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON output");
    let biopsies = parsed["biopsies"].as_array().unwrap();
    assert_eq!(biopsies.len(), 2);
    assert_eq!(biopsies[0]["id"], "B1");

    let images = biopsies[0]["images"].as_array().unwrap();
    assert_eq!(images.len(), 2);
    assert_eq!(images[1]["image_id"], 2);

    let glomeruli = images[1]["glomeruli"].as_array().unwrap();
    assert_eq!(glomeruli.len(), 2);
    assert_eq!(glomeruli[1]["number"], 2);
    assert_eq!(glomeruli[1]["podocytes"].as_array().unwrap().len(), 1);
}

#[test]
fn test_biopsy_by_image() {
    let temp = tempdir().unwrap();
    create_fixture(temp.path());
    let dir = temp.path().join("B1");

    let (stdout, stderr, success) = run_nephro(&["biopsy", path_str(&dir)]);

    assert!(success, "stderr: {stderr}");
    assert!(stdout.contains("Biopsy B1"));
    assert!(stdout.contains("Image"));
    assert!(stdout.contains("Total (2 images)"));
}

#[test]
fn test_image_command() {
    let temp = tempdir().unwrap();
    create_fixture(temp.path());
    let file = temp.path().join("B1/2.xls");

    let (stdout, stderr, success) = run_nephro(&["image", path_str(&file), "-o", "json"]);
    assert!(success, "stderr: {stderr}");

    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON output");
    assert_eq!(parsed["image_id"], 2);
    assert_eq!(parsed["glomeruli"].as_array().unwrap().len(), 2);
}

#[test]
fn test_invalid_file_aborts() {
    let temp = tempdir().unwrap();
    create_fixture(temp.path());
    // Podocyte before any glomerulus
    fs::write(temp.path().join("B2/6.xls"), export(&[12.0, 5000.0, 12.0])).unwrap();

    let (_, stderr, success) = run_nephro(&[path_str(temp.path())]);

    assert!(!success);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("6.xls"));
}

#[test]
fn test_invalid_file_skipped() {
    let temp = tempdir().unwrap();
    create_fixture(temp.path());
    fs::write(temp.path().join("B2/6.xls"), export(&[5000.0])).unwrap();

    let (stdout, stderr, success) = run_nephro(&[path_str(temp.path()), "--skip-invalid"]);

    assert!(success, "stderr: {stderr}");
    assert!(stdout.contains("skipped"));
    assert!(stdout.contains("6.xls"));
}

#[test]
fn test_on_error_skip_with_text_output() {
    let temp = tempdir().unwrap();
    create_fixture(temp.path());
    fs::write(temp.path().join("B2/6.xls"), export(&[5000.0])).unwrap();

    let (stdout, stderr, success) = run_nephro(&[
        path_str(temp.path()),
        "--on-error",
        "skip",
        "--output",
        "text",
    ]);

    assert!(success, "stderr: {stderr}");
    assert!(stdout.contains("Total (2 biopsies)"));
    assert!(stdout.contains("6.xls"));
    assert!(!stdout.contains('\x1b'));
}

#[test]
fn test_invalid_image_filename() {
    let temp = tempdir().unwrap();
    create_fixture(temp.path());
    fs::write(temp.path().join("B1/overview.xls"), export(&[5000.0, 12.0])).unwrap();

    let (_, stderr, success) = run_nephro(&[path_str(temp.path()), "--skip-invalid"]);

    assert!(!success);
    assert!(stderr.contains("illegal image data file"));
}

#[test]
fn test_invalid_path() {
    let (_, stderr, success) = run_nephro(&["/nonexistent/path"]);

    assert!(!success);
    assert!(stderr.contains("Error:"));
}
