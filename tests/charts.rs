mod common;

use std::fs;

use assert_cmd::Command;
use predicates::str::contains;
use serde_json::Value as Json;

use common::{TestWorkspace, sample_csv};

fn bin() -> Command {
    Command::cargo_bin("sheet-tally").expect("binary exists")
}

#[test]
fn charts_writes_a_feed_with_parallel_labels_and_counts() {
    let workspace = TestWorkspace::new();
    let csv_path = sample_csv(&workspace);
    let feed_path = workspace.path().join("feed.json");

    bin()
        .args([
            "charts",
            "-i",
            csv_path.to_str().unwrap(),
            "-o",
            feed_path.to_str().unwrap(),
        ])
        .assert()
        .success();

    let feed: Json = serde_json::from_str(&fs::read_to_string(&feed_path).expect("read feed"))
        .expect("parse feed");
    assert_eq!(feed["kind"], "bar");
    assert_eq!(feed["fields"][0], "color");
    assert_eq!(feed["fields"][1], "qty");

    let color = &feed["charts"][0];
    assert_eq!(color["field"], "color");
    assert_eq!(color["labels"][0], "red");
    assert_eq!(color["labels"][1], "blue");
    assert_eq!(color["counts"][0], 2);
    assert_eq!(color["counts"][1], 1);

    let qty = &feed["charts"][1];
    assert_eq!(qty["labels"].as_array().map(Vec::len), Some(3));
    assert_eq!(qty["counts"][0], 1);
}

#[test]
fn charts_kind_option_tags_every_series_uniformly() {
    let workspace = TestWorkspace::new();
    let csv_path = sample_csv(&workspace);
    let feed_path = workspace.path().join("feed.json");

    bin()
        .args([
            "charts",
            "-i",
            csv_path.to_str().unwrap(),
            "-o",
            feed_path.to_str().unwrap(),
            "--kind",
            "doughnut",
        ])
        .assert()
        .success();

    let feed: Json = serde_json::from_str(&fs::read_to_string(&feed_path).expect("read feed"))
        .expect("parse feed");
    assert_eq!(feed["kind"], "doughnut");
}

#[test]
fn charts_only_narrows_to_one_chart_but_keeps_the_field_list() {
    let workspace = TestWorkspace::new();
    let csv_path = sample_csv(&workspace);
    let feed_path = workspace.path().join("feed.json");

    bin()
        .args([
            "charts",
            "-i",
            csv_path.to_str().unwrap(),
            "-o",
            feed_path.to_str().unwrap(),
            "--only",
            "qty",
        ])
        .assert()
        .success();

    let feed: Json = serde_json::from_str(&fs::read_to_string(&feed_path).expect("read feed"))
        .expect("parse feed");
    assert_eq!(feed["charts"].as_array().map(Vec::len), Some(1));
    assert_eq!(feed["charts"][0]["field"], "qty");
    assert_eq!(feed["fields"].as_array().map(Vec::len), Some(2));
}

#[test]
fn charts_only_rejects_unknown_columns() {
    let workspace = TestWorkspace::new();
    let csv_path = sample_csv(&workspace);

    bin()
        .args(["charts", "-i", csv_path.to_str().unwrap(), "--only", "nope"])
        .assert()
        .failure()
        .stderr(contains("column 'nope' not found"));
}

#[test]
fn charts_prints_to_stdout_when_no_output_is_given() {
    let workspace = TestWorkspace::new();
    let csv_path = sample_csv(&workspace);

    bin()
        .args(["charts", "-i", csv_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("\"kind\": \"bar\""))
        .stdout(contains("\"labels\""));
}
