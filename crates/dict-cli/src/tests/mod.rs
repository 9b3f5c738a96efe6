//! End-to-end runs of the CLI against a scripted DICT server.

mod support;

use std::ffi::OsString;
use std::process::ExitCode;

use dict_config::Config;
use rstest::rstest;

use self::support::{FakeServer, StaticLoader, definition_reply, listing};
use crate::run_with_loader;

struct Outcome {
    exit: ExitCode,
    stdout: String,
    stderr: String,
}

fn run_against(server: &FakeServer, args: &[&str]) -> Outcome {
    let loader = StaticLoader(Config {
        host: "127.0.0.1".to_owned(),
        port: server.port(),
        ..Config::default()
    });
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let exit = run_with_loader(
        args.iter().map(OsString::from),
        &mut stdout,
        &mut stderr,
        &loader,
    );
    Outcome {
        exit,
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
    }
}

#[rstest]
fn lists_databases_and_quits() {
    let mut server = FakeServer::spawn(vec![("SHOW DB", listing())]).expect("spawn server");

    let outcome = run_against(&server, &["dict", "databases"]);

    assert_eq!(outcome.exit, ExitCode::SUCCESS);
    assert_eq!(
        outcome.stdout,
        "wn     WordNet (r) 3.0 (2006)\ngcide  The Collaborative International Dictionary of English\n"
    );
    assert_eq!(
        server.take_requests().expect("requests"),
        vec!["SHOW DB", "QUIT"]
    );
}

#[rstest]
fn defines_words_in_a_named_database() {
    let mut server = FakeServer::spawn(vec![
        ("SHOW DB", listing()),
        ("DEFINE wn sun", definition_reply("sun", "the star at the centre")),
    ])
    .expect("spawn server");

    let outcome = run_against(&server, &["dict", "define", "sun", "--database", "wn"]);

    assert_eq!(outcome.exit, ExitCode::SUCCESS, "stderr: {}", outcome.stderr);
    assert_eq!(
        outcome.stdout,
        "From WordNet (r) 3.0 (2006) [wn]:\n\n  the star at the centre\n"
    );
    assert_eq!(
        server.take_requests().expect("requests"),
        vec!["SHOW DB", "DEFINE wn sun", "QUIT"]
    );
}

#[rstest]
fn json_output_serialises_definitions() {
    let mut server = FakeServer::spawn(vec![
        ("SHOW DB", listing()),
        ("DEFINE * sun", definition_reply("sun", "the star")),
    ])
    .expect("spawn server");

    let outcome = run_against(&server, &["dict", "--output", "json", "define", "sun"]);

    assert_eq!(outcome.exit, ExitCode::SUCCESS, "stderr: {}", outcome.stderr);
    let value: serde_json::Value =
        serde_json::from_str(outcome.stdout.trim_end()).expect("valid json");
    assert_eq!(value[0]["word"], "sun");
    assert_eq!(value[0]["database"]["name"], "wn");
    assert_eq!(value[0]["text"][0], "the star");
    server.take_requests().expect("requests");
}

#[rstest]
fn empty_lookups_exit_with_code_two() {
    let mut server = FakeServer::spawn(vec![
        ("SHOW DB", listing()),
        ("MATCH * . qwxz", vec!["552 no match".to_owned()]),
    ])
    .expect("spawn server");

    let outcome = run_against(&server, &["dict", "match", "qwxz"]);

    assert_eq!(outcome.exit, ExitCode::from(2));
    assert!(outcome.stdout.is_empty());
    assert!(outcome.stderr.contains("qwxz"), "stderr: {}", outcome.stderr);
    assert_eq!(
        server.take_requests().expect("requests").last().map(String::as_str),
        Some("QUIT")
    );
}

#[rstest]
fn unknown_database_names_fail_without_a_lookup() {
    let mut server = FakeServer::spawn(vec![("SHOW DB", listing())]).expect("spawn server");

    let outcome = run_against(&server, &["dict", "define", "sun", "--database", "nope"]);

    assert_eq!(outcome.exit, ExitCode::FAILURE);
    assert!(outcome.stderr.contains("unknown database 'nope'"));
    assert_eq!(
        server.take_requests().expect("requests"),
        vec!["SHOW DB", "QUIT"]
    );
}

#[rstest]
fn usage_errors_fail_before_connecting() {
    let loader = StaticLoader(Config::default());
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();

    let exit = run_with_loader(
        ["dict", "define"].map(OsString::from),
        &mut stdout,
        &mut stderr,
        &loader,
    );

    assert_eq!(exit, ExitCode::FAILURE);
    assert!(String::from_utf8_lossy(&stderr).contains("<WORD>"));
}
