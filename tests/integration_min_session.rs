// Minimal integration test that drives the compiled binary through a PTY.
// This exercises the real event loop, the tick thread and crossterm input
// handling without relying on internal modules.
//
// Notes:
// - Requires a TTY; uses expectrl which allocates a pseudo terminal.
// - Marked Unix-only and ignored by default to avoid CI/platform issues.
// - Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn accelerated_session_runs_and_exits() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let log = dir.path().join("session.log");

    // One minute intervals at 2ms per tick: the whole session takes about a second
    let bin = assert_cmd::cargo::cargo_bin("pomodoro");
    let cmd = format!(
        "{} -f 1 -b 1 --tick-ms 2 --log-file {}",
        bin.display(),
        log.display()
    );

    let mut p = spawn(cmd)?;

    // Give the app a moment to initialize the terminal/alternate screen
    std::thread::sleep(Duration::from_millis(200));

    p.send("\r")?;

    std::thread::sleep(Duration::from_millis(3000));

    // Ctrl+C quits even while notices are queued
    p.send("\x03")?;
    p.expect(Eof)?;

    let contents = std::fs::read_to_string(&log)?;
    assert!(contents.contains("timer started"));
    assert!(contents.contains("all cycles complete"));
    Ok(())
}
