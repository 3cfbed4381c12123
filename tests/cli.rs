use assert_cmd::Command;
use predicates::boolean::PredicateBooleanExt;
use predicates::str::contains;

const BINARY_NAME: &str = "flipper";

#[test]
fn king_capture_game() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.args([
            "--probability",
            "1",
            "--white-think-ms",
            "10",
            "--black-think-ms",
            "10",
            "--fen",
            "4k3/8/8/8/8/8/8/4R1K1 w - -",
        ])
        .assert()
        .success()
        .stdout(
            contains("Flipper chess engine")
                .and(contains("w,S,RE1xE8"))
                .and(contains("Result: 1-0")),
        ),
    );
}

#[test]
fn short_self_play() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.args([
            "--white-think-ms",
            "1",
            "--black-think-ms",
            "1",
            "--max-plies",
            "4",
            "--seed",
            "17",
            "--white-eval",
            "material",
            "--black-eval",
            "export-material",
        ])
        .assert()
        .success()
        .stdout(contains("w,").and(contains("Result:"))),
    );
}

#[test]
fn invalid_configuration() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");
    drop(cmd.args(["--probability", "1.5"]).assert().failure());

    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");
    drop(cmd.args(["--search-bias", "1"]).assert().failure());

    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");
    drop(
        cmd.args(["--fen", "not a position"])
            .assert()
            .failure(),
    );
}
