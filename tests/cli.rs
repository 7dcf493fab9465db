extern crate assert_cmd;
extern crate predicates;
extern crate tempfile;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;

#[test]
fn requires_an_output_path() {
    Command::cargo_bin("flamegen")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("output"));
}

#[test]
fn rejects_an_unknown_variation() {
    Command::cargo_bin("flamegen")
        .unwrap()
        .args(&["--output", "ignored", "--variations", "swirl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("swirl"));
}

#[test]
fn rejects_a_non_positive_gamma() {
    Command::cargo_bin("flamegen")
        .unwrap()
        .args(&["--output", "ignored", "--gamma", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Gamma"));
}

#[test]
fn rejects_a_degenerate_world_rect() {
    Command::cargo_bin("flamegen")
        .unwrap()
        .args(&["--output", "ignored", "--rect", "0,0,0,2"])
        .assert()
        .failure();
}

#[test]
fn renders_a_small_image_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let stem = dir.path().join("flame");
    Command::cargo_bin("flamegen")
        .unwrap()
        .args(&[
            "--output",
            stem.to_str().unwrap(),
            "--format",
            "png",
            "--size",
            "16x16",
            "--renderer",
            "single",
            "--samples",
            "50",
            "--iterations",
            "40",
            "--steps",
            "5",
            "--variations",
            "linear,spherical",
        ])
        .assert()
        .success();
    let path = dir.path().join("flame.png");
    assert!(path.is_file());
    assert!(fs::metadata(&path).unwrap().len() > 0);
}
