use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use slide_deck_test_support::write_fixture_deck;
use tempfile::TempDir;

fn fixture() -> TempDir {
    let temp = TempDir::new().expect("tempdir");
    write_fixture_deck(temp.path());
    temp
}

fn slide_deck(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("slide-deck").expect("binary");
    cmd.current_dir(dir.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn render_reads_stdin_when_file_is_dash() {
    let temp = TempDir::new().expect("tempdir");

    slide_deck(&temp)
        .args(["render", "-"])
        .write_stdin("# Title\n\nSome *text*.\n\n- one\n- two\n")
        .assert()
        .success()
        .stdout(
            "<h1>Title</h1><p>Some <em>text</em>.</p><ul><li>one</li><li>two</li></ul>\n",
        );
}

#[test]
fn render_prints_title_or_json() {
    let temp = fixture();

    slide_deck(&temp)
        .args(["render", "--title", "slides/02-details.md"])
        .assert()
        .success()
        .stdout("Details\n");

    let output = slide_deck(&temp)
        .args(["render", "--json", "slides/03-untitled.md"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output).expect("json output");
    assert!(value["title"].is_null());
    assert_eq!(
        value["html"],
        "<p>Just a paragraph with <code>code</code>.</p>"
    );
}

#[test]
fn render_reports_missing_file() {
    let temp = TempDir::new().expect("tempdir");

    slide_deck(&temp)
        .args(["render", "nope.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unable to read markdown from nope.md"));
}

#[test]
fn list_prints_numbered_titles() {
    let temp = fixture();

    slide_deck(&temp)
        .arg("list")
        .assert()
        .success()
        .stdout("1. Welcome\n2. Details\n3. Untitled\n");
}

#[test]
fn show_selects_slide_by_number_or_hash() {
    let temp = fixture();

    slide_deck(&temp)
        .args(["show", "--slide", "2"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Details\n\n<h2>Details</h2><ol>"));

    slide_deck(&temp)
        .args(["show", "--hash", "#slide3"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Untitled\n\n<p>"));

    slide_deck(&temp)
        .args(["show", "--hash", "#slide99"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Welcome\n"));
}

#[test]
fn show_rejects_out_of_range_slide() {
    let temp = fixture();

    slide_deck(&temp)
        .args(["show", "--slide", "9"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("slide 9 is out of range (deck has 3 slides)"));
}

#[test]
fn build_writes_bundle_and_show_can_fall_back_to_it() {
    let temp = fixture();

    slide_deck(&temp)
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("Build complete. Generated"))
        .stdout(predicate::str::contains("(3 slides, 2 assets)"));

    let bundle = temp.path().join("docs/index.html");
    let html = fs::read_to_string(&bundle).expect("read bundle");
    assert!(html.contains("window.EMBED_DATA = {"));

    fs::remove_dir_all(temp.path().join("slides")).expect("remove slides");

    slide_deck(&temp)
        .args(["show", "--slide", "1", "--json", "--embedded", "docs/index.html"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"title\": \"Welcome\""))
        .stdout(predicate::str::contains("\"hash\": \"#slide1\""))
        .stdout(predicate::str::contains("data:image/png;base64,cG5nLWJ5dGVz"));
}

#[test]
fn build_honours_output_flag_and_config_override() {
    let temp = fixture();
    fs::write(
        temp.path().join("custom.toml"),
        "[bundle]\noutput = \"site/deck.html\"\n",
    )
    .expect("write override");

    slide_deck(&temp)
        .args(["build", "--config", "custom.toml"])
        .assert()
        .success();
    assert!(temp.path().join("site/deck.html").is_file());

    slide_deck(&temp)
        .args(["build", "--output", "elsewhere.html"])
        .assert()
        .success();
    assert!(temp.path().join("elsewhere.html").is_file());
}

#[test]
fn build_fails_with_io_exit_code_when_template_missing() {
    let temp = fixture();
    fs::remove_file(temp.path().join("index.html")).expect("remove template");

    slide_deck(&temp)
        .arg("build")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("slide-deck error: failed to read"));
}
