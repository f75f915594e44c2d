//! Process session — runs one shell command under timeout supervision
//!
//! Lifecycle: Created → Running → {Completed | TimedOut → Terminating →
//! {Terminated | Killed}} → ResultEmitted. A launch or wait error moves the
//! session to Failed instead, and a running child is still terminated.
//!
//! Both output streams are drained by their own task from the moment the
//! process starts, so a process that fills one pipe never stalls while we
//! wait on it. The child runs in its own process group: termination signals
//! reach everything the shell spawned, which is also what closes the pipes
//! and lets the drain tasks finish.

use std::os::unix::process::ExitStatusExt;
use std::process::{ExitStatus, Stdio};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use kali_common::{ExecutionResult, NO_EXIT_CODE};
use nix::errno::Errno;
use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(5);
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Timing and launch parameters for a session
#[derive(Debug, Clone)]
pub struct SessionLimits {
    /// Wall-clock bound measured from launch
    pub timeout: Duration,
    /// How long a terminated process gets before it is force-killed
    pub grace_period: Duration,
    /// Shell used as `<shell> -c <command>`
    pub shell: String,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            grace_period: DEFAULT_GRACE_PERIOD,
            shell: DEFAULT_SHELL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Created,
    Running,
    Completed,
    TimedOut,
    Failed,
    Terminating,
    Terminated,
    Killed,
    ResultEmitted,
}

impl SessionState {
    pub fn can_advance_to(self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Created, Running)
                | (Created, Failed)
                | (Running, Completed)
                | (Running, TimedOut)
                | (Running, Failed)
                | (TimedOut, Terminating)
                | (Failed, Terminating)
                | (Terminating, Terminated)
                | (Terminating, Killed)
                | (Completed, ResultEmitted)
                | (Terminated, ResultEmitted)
                | (Killed, ResultEmitted)
                | (Failed, ResultEmitted)
        )
    }
}

type Capture = Arc<Mutex<String>>;

/// Supervises exactly one external process
pub struct ProcessSession {
    id: Uuid,
    command: String,
    limits: SessionLimits,
    state: SessionState,
    stdout: Capture,
    stderr: Capture,
}

impl ProcessSession {
    pub fn new(command: impl Into<String>, limits: SessionLimits) -> Self {
        Self {
            id: Uuid::new_v4(),
            command: command.into(),
            limits,
            state: SessionState::Created,
            stdout: Capture::default(),
            stderr: Capture::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Run the command to completion or to the deadline.
    ///
    /// Never fails: launch errors, wait errors and timeouts are all encoded
    /// in the returned result. The process is not running once this returns.
    pub async fn run(self) -> ExecutionResult {
        let span = info_span!("session", execution_id = %self.id);
        self.supervise().instrument(span).await
    }

    async fn supervise(mut self) -> ExecutionResult {
        info!("Executing command: {}", self.command);

        let mut child = match self.spawn() {
            Ok(child) => child,
            Err(e) => {
                error!("Error executing command: {e}");
                self.advance(SessionState::Failed);
                return self.emit(|out, err| ExecutionResult::failed(out, err, e.to_string()));
            }
        };
        let mut group = GroupGuard(child.id().map(|pid| Pid::from_raw(pid as i32)));
        self.advance(SessionState::Running);

        let mut readers = Readers::default();
        if let Some(pipe) = child.stdout.take() {
            readers.spawn(pipe, self.stdout.clone());
        }
        if let Some(pipe) = child.stderr.take() {
            readers.spawn(pipe, self.stderr.clone());
        }

        match tokio::time::timeout(self.limits.timeout, child.wait()).await {
            Ok(Ok(status)) => {
                self.advance(SessionState::Completed);
                self.settle(&mut group, &mut readers).await;
                let code = exit_code(status);
                debug!("Command exited with code {code}");
                self.emit(|out, err| ExecutionResult::completed(out, err, code))
            }
            Ok(Err(e)) => {
                error!("Error waiting for command: {e}");
                self.advance(SessionState::Failed);
                self.terminate(&mut child, &mut group).await;
                readers.abort_all().await;
                self.emit(|out, err| ExecutionResult::failed(out, err, e.to_string()))
            }
            Err(_) => {
                warn!(
                    "Command timed out after {} seconds. Terminating process.",
                    self.limits.timeout.as_secs_f64()
                );
                self.advance(SessionState::TimedOut);
                self.terminate(&mut child, &mut group).await;
                if !readers.join_within(self.limits.grace_period).await {
                    readers.abort_all().await;
                }
                let result = self.emit(ExecutionResult::timed_out);
                if result.is_qualified_success() {
                    info!("Returning partial output captured before the timeout");
                }
                result
            }
        }
    }

    fn spawn(&self) -> std::io::Result<Child> {
        Command::new(&self.limits.shell)
            .arg("-c")
            .arg(&self.command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .process_group(0)
            .kill_on_drop(true)
            .spawn()
    }

    /// Normal exit: flush the drain tasks. Descendants that outlive the shell
    /// and keep the pipes open are killed so the readers can finish.
    async fn settle(&self, group: &mut GroupGuard, readers: &mut Readers) {
        if !readers.join_within(self.limits.grace_period).await {
            warn!("Output streams still open after exit. Killing remaining process group.");
            group.kill();
            if !readers.join_within(self.limits.grace_period).await {
                readers.abort_all().await;
            }
        }
    }

    /// Two-phase termination: SIGTERM to the group, then SIGKILL once the
    /// grace period runs out.
    async fn terminate(&mut self, child: &mut Child, group: &mut GroupGuard) {
        self.advance(SessionState::Terminating);
        match group.0 {
            Some(pgid) => signal_group(pgid, Signal::SIGTERM),
            None => {
                if let Err(e) = child.start_kill() {
                    debug!("Failed to signal process: {e}");
                }
            }
        }

        match tokio::time::timeout(self.limits.grace_period, child.wait()).await {
            Ok(_) => self.advance(SessionState::Terminated),
            Err(_) => {
                warn!("Process not responding to termination. Killing.");
                group.kill();
                if let Err(e) = child.kill().await {
                    error!("Failed to kill process: {e}");
                }
                self.advance(SessionState::Killed);
            }
        }
    }

    fn advance(&mut self, next: SessionState) {
        if !self.state.can_advance_to(next) {
            warn!("Unexpected session transition {:?} -> {:?}", self.state, next);
        }
        debug!("Session state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn emit(
        mut self,
        build: impl FnOnce(String, String) -> ExecutionResult,
    ) -> ExecutionResult {
        let stdout = std::mem::take(&mut *lock(&self.stdout));
        let stderr = std::mem::take(&mut *lock(&self.stderr));
        self.advance(SessionState::ResultEmitted);
        build(stdout, stderr)
    }
}

/// Run `command` in a fresh session.
pub async fn run(command: &str, limits: &SessionLimits) -> ExecutionResult {
    ProcessSession::new(command, limits.clone()).run().await
}

/// Kills whatever is left of the process group when the session ends,
/// including when the session future is dropped mid-run. Disarmed once the
/// group has been sent SIGKILL, so a recycled group id is never signalled.
struct GroupGuard(Option<Pid>);

impl GroupGuard {
    fn kill(&mut self) {
        if let Some(pgid) = self.0.take() {
            signal_group(pgid, Signal::SIGKILL);
        }
    }
}

impl Drop for GroupGuard {
    fn drop(&mut self) {
        self.kill();
    }
}

/// The two drain tasks of a session
#[derive(Default)]
struct Readers {
    handles: Vec<JoinHandle<()>>,
}

impl Readers {
    fn spawn<R>(&mut self, pipe: R, capture: Capture)
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        self.handles.push(tokio::spawn(drain(pipe, capture)));
    }

    /// Wait for every stream to reach end-of-file. Returns false when `limit`
    /// elapses first; unfinished readers stay joinable.
    async fn join_within(&mut self, limit: Duration) -> bool {
        let joined = tokio::time::timeout(limit, async {
            while let Some(handle) = self.handles.last_mut() {
                if let Err(e) = handle.await {
                    debug!("Output reader ended abnormally: {e}");
                }
                self.handles.pop();
            }
        })
        .await;
        joined.is_ok()
    }

    async fn abort_all(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
            let _ = handle.await;
        }
    }
}

/// Append every line from `pipe` to `capture` until end-of-file.
async fn drain<R>(pipe: R, capture: Capture)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(pipe);
    let mut line = Vec::new();
    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => break,
            Ok(_) => lock(&capture).push_str(&String::from_utf8_lossy(&line)),
            Err(e) => {
                debug!("Output stream read failed: {e}");
                break;
            }
        }
    }
}

fn lock(capture: &Capture) -> MutexGuard<'_, String> {
    capture.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn signal_group(pgid: Pid, signal: Signal) {
    match killpg(pgid, signal) {
        Ok(()) => debug!("Sent {signal:?} to process group {pgid}"),
        Err(Errno::ESRCH) => {} // group already gone
        Err(e) => warn!("Failed to send {signal:?} to process group {pgid}: {e}"),
    }
}

/// Exit code, or the negated signal number when the process was killed by one
fn exit_code(status: ExitStatus) -> i32 {
    status
        .code()
        .or_else(|| status.signal().map(|signal| -signal))
        .unwrap_or(NO_EXIT_CODE)
}
