//! Integration tests for the process session
//!
//! These drive real `/bin/sh` processes through the full lifecycle:
//! normal exit, timeout with and without output, forced kill of processes
//! that ignore SIGTERM, and cleanup of shell-spawned descendants.

use std::time::{Duration, Instant};

use kali_common::NO_EXIT_CODE;
use kali_tools::session::{self, ProcessSession, SessionLimits, SessionState};
use nix::errno::Errno;
use nix::sys::signal::kill;
use nix::unistd::Pid;

fn limits(timeout: Duration, grace: Duration) -> SessionLimits {
    SessionLimits {
        timeout,
        grace_period: grace,
        ..Default::default()
    }
}

fn read_pid(path: &std::path::Path) -> Pid {
    let text = std::fs::read_to_string(path).unwrap();
    Pid::from_raw(text.trim().parse().unwrap())
}

/// Dead or a zombie waiting for a reaper we do not control
fn is_gone(pid: Pid) -> bool {
    if kill(pid, None) == Err(Errno::ESRCH) {
        return true;
    }
    match std::fs::read_to_string(format!("/proc/{pid}/stat")) {
        Ok(stat) => stat
            .rsplit(')')
            .next()
            .is_some_and(|rest| rest.trim_start().starts_with('Z')),
        Err(_) => true,
    }
}

// ============================================================================
// Normal completion
// ============================================================================

/// Output of both streams is captured in order, line terminators included
#[tokio::test]
async fn test_many_lines_preserve_order() {
    let result = session::run(
        "i=1; while [ $i -le 2000 ]; do echo line$i; echo err$i >&2; i=$((i+1)); done",
        &limits(Duration::from_secs(30), Duration::from_secs(2)),
    )
    .await;

    assert!(result.success);
    let out: Vec<&str> = result.stdout.lines().collect();
    let err: Vec<&str> = result.stderr.lines().collect();
    assert_eq!(out.len(), 2000);
    assert_eq!(err.len(), 2000);
    for (i, line) in out.iter().enumerate() {
        assert_eq!(*line, format!("line{}", i + 1));
    }
    assert_eq!(err[1999], "err2000");
}

/// A process writing far more than a pipe buffer does not deadlock
#[tokio::test]
async fn test_large_output_does_not_block() {
    let result = session::run(
        "head -c 1048576 /dev/zero | tr '\\0' 'a'; echo",
        &limits(Duration::from_secs(30), Duration::from_secs(2)),
    )
    .await;
    assert!(result.success);
    assert!(!result.timed_out);
    assert_eq!(result.stdout.trim_end().len(), 1_048_576);
}

/// A fresh session starts in Created and carries an execution id
#[test]
fn test_new_session_state() {
    let a = ProcessSession::new("true", SessionLimits::default());
    let b = ProcessSession::new("true", SessionLimits::default());
    assert_eq!(a.state(), SessionState::Created);
    assert_ne!(a.id(), b.id());
}

// ============================================================================
// Timeouts and termination
// ============================================================================

/// `sleep 10` with a 1 s timeout returns promptly with no output
#[tokio::test]
async fn test_timeout_returns_promptly() {
    let started = Instant::now();
    let result = session::run(
        "sleep 10",
        &limits(Duration::from_secs(1), Duration::from_secs(5)),
    )
    .await;

    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(result.timed_out);
    assert!(!result.success);
    assert!(!result.partial_results);
    assert_eq!(result.return_code, NO_EXIT_CODE);
}

/// A process that ignores SIGTERM is force-killed after the grace period
#[tokio::test]
async fn test_sigterm_ignoring_process_is_killed() {
    let dir = tempfile::tempdir().unwrap();
    let pid_file = dir.path().join("pid");
    let command = format!(
        "echo $$ > {}; trap '' TERM; echo started; while true; do sleep 0.1; done",
        pid_file.display()
    );

    let started = Instant::now();
    let result = session::run(
        &command,
        &limits(Duration::from_secs(1), Duration::from_secs(1)),
    )
    .await;

    assert!(started.elapsed() < Duration::from_secs(6));
    assert!(result.timed_out);
    assert_eq!(result.stdout, "started\n");
    assert!(result.success);
    assert!(result.partial_results);
    assert!(is_gone(read_pid(&pid_file)));
}

/// Background jobs of the shell do not outlive the session
#[tokio::test]
async fn test_background_descendants_are_killed() {
    let dir = tempfile::tempdir().unwrap();
    let pid_file = dir.path().join("child");
    let command = format!(
        "sleep 30 > /dev/null 2>&1 & echo $! > {}; echo spawned",
        pid_file.display()
    );

    let result = session::run(
        &command,
        &limits(Duration::from_secs(10), Duration::from_secs(1)),
    )
    .await;
    assert!(result.success);
    assert_eq!(result.stdout, "spawned\n");

    let child = read_pid(&pid_file);
    // the orphaned sleep is reaped by init; give it a moment
    let deadline = Instant::now() + Duration::from_secs(5);
    while !is_gone(child) && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(is_gone(child));
}

/// A descendant holding the output pipe open does not stall a finished command
#[tokio::test]
async fn test_descendant_holding_pipe_is_cut_off() {
    let started = Instant::now();
    let result = session::run(
        "sleep 30 & echo done",
        &limits(Duration::from_secs(20), Duration::from_secs(1)),
    )
    .await;

    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(!result.timed_out);
    assert_eq!(result.return_code, 0);
    assert_eq!(result.stdout, "done\n");
}

/// Dropping a running session kills the process
#[tokio::test]
async fn test_dropped_session_kills_process() {
    let dir = tempfile::tempdir().unwrap();
    let pid_file = dir.path().join("pid");
    let command = format!("echo $$ > {}; exec sleep 30", pid_file.display());

    let session = ProcessSession::new(
        command,
        limits(Duration::from_secs(60), Duration::from_secs(1)),
    );
    let run = tokio::time::timeout(Duration::from_millis(500), session.run()).await;
    assert!(run.is_err());

    let pid = read_pid(&pid_file);
    let deadline = Instant::now() + Duration::from_secs(5);
    while !is_gone(pid) && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(is_gone(pid));
}

// ============================================================================
// Concurrency
// ============================================================================

/// Sessions are independent and can run side by side
#[tokio::test]
async fn test_concurrent_sessions() {
    let limits = limits(Duration::from_secs(10), Duration::from_secs(1));
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let limits = limits.clone();
            tokio::spawn(async move { session::run(&format!("echo session{i}"), &limits).await })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let result = handle.await.unwrap();
        assert_eq!(result.stdout, format!("session{i}\n"));
        assert!(result.success);
    }
}
