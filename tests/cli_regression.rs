// Regression tests for the ontarget-host binary
// Requires: assert_cmd, predicates crates in [dev-dependencies]

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

fn host() -> Command {
    Command::cargo_bin("ontarget-host").unwrap()
}

#[test]
fn selftest_suite_passes_and_exits_zero() {
    host()
        .args(["run", "--suite", "selftest", "--color", "never"])
        .assert()
        .success()
        .stdout(contains("running reflexive_across_shapes... ok"))
        .stdout(contains("test result: ok. 9 passed"));
}

#[test]
fn showcase_aborts_on_second_case() {
    host()
        .args(["run", "--suite", "showcase", "--color", "never"])
        .assert()
        .code(1)
        .stdout(contains("running boots... ok"))
        .stdout(contains(
            "test calibration_matches failed: .offset: expected -2, found 3",
        ))
        .stdout(contains("never_reached").not())
        .stdout(contains("test result").not())
        .stderr(contains("panicked").not());
}

#[test]
fn list_prints_names_in_order() {
    host()
        .args(["list", "--suite", "showcase"])
        .assert()
        .success()
        .stdout("boots\ncalibration_matches\nnever_reached\n");
}

#[test]
fn color_never_emits_no_escapes() {
    host()
        .args(["run", "--color", "never"])
        .assert()
        .success()
        .stdout(contains("\x1b[").not());
}

#[test]
fn color_always_colours_markers() {
    host()
        .args(["run", "--color", "always"])
        .assert()
        .success()
        .stdout(contains("\x1b["));
}

#[test]
fn unknown_suite_is_rejected() {
    host()
        .args(["run", "--suite", "bogus"])
        .assert()
        .failure()
        .stderr(contains("invalid value"));
}
