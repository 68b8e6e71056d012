mod common;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

use common::{TestWorkspace, sample_csv};

fn bin() -> Command {
    Command::cargo_bin("sheet-tally").expect("binary exists")
}

#[test]
fn analyze_tabulates_every_column_with_counts_and_percentages() {
    let workspace = TestWorkspace::new();
    let csv_path = sample_csv(&workspace);

    bin()
        .args(["analyze", "-i", csv_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("red"))
        .stdout(contains("66.67%"))
        .stdout(contains("blue"))
        .stdout(contains("33.33%"));
}

#[test]
fn analyze_restricts_output_to_requested_columns() {
    let workspace = TestWorkspace::new();
    let csv_path = sample_csv(&workspace);

    bin()
        .args(["analyze", "-i", csv_path.to_str().unwrap(), "-C", "qty"])
        .assert()
        .success()
        .stdout(contains("qty"))
        .stdout(contains("red").not());
}

#[test]
fn analyze_rejects_unknown_columns() {
    let workspace = TestWorkspace::new();
    let csv_path = sample_csv(&workspace);

    bin()
        .args(["analyze", "-i", csv_path.to_str().unwrap(), "-C", "nope"])
        .assert()
        .failure()
        .stderr(contains("column 'nope' not found"));
}

#[test]
fn analyze_top_caps_distinct_values_per_column() {
    let workspace = TestWorkspace::new();
    let csv_path = workspace.write("many.csv", "c\nx\ny\nx\nz\n");

    let output = bin()
        .args(["analyze", "-i", csv_path.to_str().unwrap(), "--top", "1"])
        .assert()
        .success()
        .stdout(contains("x"))
        .get_output()
        .clone();
    let stdout = String::from_utf8(output.stdout).expect("utf-8 stdout");
    assert!(!stdout.contains('y'), "truncated values still rendered:\n{stdout}");
}

#[test]
fn analyze_keeps_zero_and_empty_cell_as_separate_categories() {
    let workspace = TestWorkspace::new();
    let csv_path = workspace.write("zeroes.csv", "id,v\n1,0\n2,\n3,0\n");

    bin()
        .args(["analyze", "-i", csv_path.to_str().unwrap(), "-C", "v"])
        .assert()
        .success()
        .stdout(contains("66.67%"))
        .stdout(contains("33.33%"));
}

#[test]
fn analyze_counts_each_row_once_under_a_duplicated_header() {
    let workspace = TestWorkspace::new();
    let csv_path = workspace.write("dup.csv", "a,a\n1,2\n1,3\n");

    let output = bin()
        .args(["analyze", "-i", csv_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("100.00%"))
        .get_output()
        .clone();
    let stdout = String::from_utf8(output.stdout).expect("utf-8 stdout");
    let column_rows = stdout.lines().filter(|line| line.starts_with('a')).count();
    assert_eq!(column_rows, 1, "duplicated column rendered twice:\n{stdout}");
}

#[test]
fn analyze_rejects_unsupported_file_types() {
    let workspace = TestWorkspace::new();
    let txt_path = workspace.write("notes.txt", "color,qty\nred,1\n");

    bin()
        .args(["analyze", "-i", txt_path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("unsupported file type"));
}

#[test]
fn analyze_fails_cleanly_on_a_header_only_sheet() {
    let workspace = TestWorkspace::new();
    let csv_path = workspace.write("empty.csv", "color,qty\n");

    bin()
        .args(["analyze", "-i", csv_path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("dataset contains no rows"));
}

#[test]
fn analyze_honours_custom_delimiters() {
    let workspace = TestWorkspace::new();
    let csv_path = workspace.write("semi.csv", "color;qty\nred;1\nred;2\n");

    bin()
        .args([
            "analyze",
            "-i",
            csv_path.to_str().unwrap(),
            "--delimiter",
            ";",
            "-C",
            "color",
        ])
        .assert()
        .success()
        .stdout(contains("red"))
        .stdout(contains("100.00%"));
}

#[test]
fn columns_lists_field_names_in_order() {
    let workspace = TestWorkspace::new();
    let csv_path = sample_csv(&workspace);

    bin()
        .args(["columns", "-i", csv_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("color"))
        .stdout(contains("qty"));
}

#[test]
fn preview_renders_the_first_rows() {
    let workspace = TestWorkspace::new();
    let csv_path = sample_csv(&workspace);

    bin()
        .args(["preview", "-i", csv_path.to_str().unwrap(), "--rows", "2"])
        .assert()
        .success()
        .stdout(contains("red"))
        .stdout(contains("blue"));
}
