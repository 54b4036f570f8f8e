/// Smoke tests to verify the binary runs without panicking
use std::process::Command;

#[test]
fn binary_shows_help() {
    let output = Command::new("cargo")
        .args(["run", "--", "--help"])
        .output()
        .expect("Failed to execute cargo run");

    assert!(
        output.status.success(),
        "Binary failed to run --help: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("threatmap"),
        "Help output should mention threatmap"
    );
}

#[test]
fn binary_shows_version() {
    let output = Command::new("cargo")
        .args(["run", "--", "--version"])
        .output()
        .expect("Failed to execute cargo run");

    assert!(
        output.status.success(),
        "Binary failed to run --version: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn invalid_subcommand_fails_gracefully() {
    let output = Command::new("cargo")
        .args(["run", "--", "nonexistent-command"])
        .output()
        .expect("Failed to execute cargo run");

    // Should fail with error, not panic
    assert!(
        !output.status.success(),
        "Invalid subcommand should return error status"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        !stderr.contains("panicked at"),
        "Invalid subcommand should not cause panic"
    );
}

#[test]
fn frame_dump_is_json_with_arcs() {
    let output = Command::new("cargo")
        .args(["run", "--", "frame", "--seed", "1", "--at", "1.5"])
        .output()
        .expect("Failed to execute cargo run");

    assert!(
        output.status.success(),
        "frame failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let frame: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("frame output should be JSON");
    let primitives = frame["primitives"].as_array().expect("primitives array");
    assert!(!primitives.is_empty());
    assert!(
        primitives.iter().any(|p| p["layer"] == "arcs"),
        "Arcs should be in flight 1.5s after start-up"
    );
    assert!(frame["live_arcs"].as_u64().unwrap() > 0);
}

#[test]
fn frame_rejects_bad_numbers() {
    let output = Command::new("cargo")
        .args(["run", "--", "frame", "--at", "soon"])
        .output()
        .expect("Failed to execute cargo run");

    assert!(!output.status.success());
    assert!(!String::from_utf8_lossy(&output.stderr).contains("panicked at"));
}

#[test]
fn frame_far_in_the_future_finishes() {
    let output = Command::new("cargo")
        .args(["run", "--", "frame", "--seed", "3", "--at", "1e7"])
        .output()
        .expect("Failed to execute cargo run");

    assert!(
        output.status.success(),
        "frame --at 1e7 failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let frame: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("frame output should be JSON");
    assert_eq!(frame["elapsed"].as_f64(), Some(1e7));
}

#[test]
fn frame_rejects_non_finite_times() {
    for at in ["inf", "NaN", "-1", "1e12"] {
        let output = Command::new("cargo")
            .args(["run", "--", "frame", "--at", at])
            .output()
            .expect("Failed to execute cargo run");

        assert!(!output.status.success(), "--at {at} should be rejected");
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(!stderr.contains("panicked at"));
    }
}

#[cfg(target_os = "linux")]
#[test]
fn motion_preference_persists_between_runs() {
    let data = tempfile::tempdir().unwrap();
    let run = |args: &[&str]| {
        let output = Command::new("cargo")
            .arg("run")
            .arg("--")
            .args(args)
            .env("XDG_DATA_HOME", data.path())
            .env_remove("THREATMAP_REDUCED_MOTION")
            .output()
            .expect("Failed to execute cargo run");
        assert!(
            output.status.success(),
            "motion {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    };

    assert!(run(&["motion", "set", "on"]).starts_with("reduced-motion: on"));
    assert!(run(&["motion", "show"]).starts_with("reduced-motion: on"));
    assert!(run(&["motion", "toggle"]).starts_with("reduced-motion: off"));
    assert!(data.path().join("threatmap").join("state.toml").exists());
}
