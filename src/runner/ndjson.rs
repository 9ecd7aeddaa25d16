use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;

use crate::models::{ErrorRecord, SuiteInfo, TestInfo, TestKind, TestState};
use crate::report::RunnerEvent;

use super::EventSource;

/// Guard that kills the child process (and its entire process group) on drop.
struct ChildGuard {
    child: Option<tokio::process::Child>,
    /// Process group ID saved at spawn time so we can kill the whole group.
    #[cfg(unix)]
    pgid: Option<u32>,
}

impl ChildGuard {
    fn new(child: tokio::process::Child) -> Self {
        #[cfg(unix)]
        let pgid = child.id();
        Self {
            child: Some(child),
            #[cfg(unix)]
            pgid,
        }
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        // Kill the entire process group so runner worker processes don't
        // become orphans.
        #[cfg(unix)]
        if let Some(pgid) = self.pgid {
            unsafe { libc::kill(-(pgid as libc::pid_t), libc::SIGKILL) };
        }
        // Fallback / non-Unix: kill just the direct child.
        if let Some(ref mut child) = self.child {
            let _ = child.start_kill();
        }
    }
}

/// Spawns the configured runner command and decodes its stdout as NDJSON
/// lifecycle records.
pub struct CommandSource {
    command: String,
    workspace: PathBuf,
}

impl CommandSource {
    pub fn new(command: String, workspace: PathBuf) -> Self {
        Self { command, workspace }
    }
}

#[async_trait]
impl EventSource for CommandSource {
    async fn stream(&self, tx: mpsc::UnboundedSender<RunnerEvent>) -> Result<()> {
        let argv = shell_words::split(&self.command)
            .with_context(|| format!("invalid runner command: {}", self.command))?;
        let Some((program, args)) = argv.split_first() else {
            anyhow::bail!("empty runner command");
        };

        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(&self.workspace)
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped());

        // Put the child in its own process group so killing it (via
        // ChildGuard) also takes out any workers it forks.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.as_std_mut().process_group(0);
        }

        let mut child = cmd
            .spawn()
            .with_context(|| format!("failed to spawn runner '{program}'"))?;

        let stdout = child.stdout.take().context("missing stdout")?;
        let stderr = child.stderr.take().context("missing stderr")?;

        // The child stays in the guard at all times so it is always killed
        // if this future is dropped mid-run.
        let mut child_guard = ChildGuard::new(child);

        // Surface runner diagnostics without mixing them into the report.
        let stderr_handle = tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                tracing::warn!(target: "runner", "{line}");
            }
        });

        let mut lines = BufReader::new(stdout).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if let Some(event) = parse_line(&line) {
                let _ = tx.send(event);
            }
        }

        stderr_handle.await.ok();

        if let Some(ref mut child) = child_guard.child {
            let status = child.wait().await.context("failed to wait for runner")?;
            // A suite with failures exits non-zero; that is a result, not a
            // transport error.
            if !status.success() {
                tracing::debug!("runner exited with code {}", status.code().unwrap_or(-1));
            }
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "command"
    }
}

/// Decodes NDJSON lifecycle records piped to our own stdin.
pub struct StdinSource;

#[async_trait]
impl EventSource for StdinSource {
    async fn stream(&self, tx: mpsc::UnboundedSender<RunnerEvent>) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if let Some(event) = parse_line(&line) {
                let _ = tx.send(event);
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "stdin"
    }
}

/// Decode one NDJSON line. Unknown record kinds and non-JSON lines yield
/// `None` (logged, never fatal).
pub fn parse_line(line: &str) -> Option<RunnerEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str::<WireEvent>(line) {
        Ok(event) => Some(event.into_runner_event()),
        Err(err) => {
            tracing::debug!("skipping unrecognized runner output: {err}");
            None
        }
    }
}

// --- NDJSON deserialization types ---

#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
enum WireEvent {
    Start,
    Suite(WireSuite),
    SuiteEnd(WireSuite),
    TestEnd(WireTest),
    Pass(WireTest),
    Fail(WireTest),
    End,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSuite {
    title: String,
    #[serde(default)]
    root: bool,
    #[serde(default)]
    full_title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireTest {
    title: String,
    #[serde(default)]
    full_title: String,
    duration: Option<u64>,
    state: Option<TestState>,
    #[serde(default)]
    pending: bool,
    slow_threshold: Option<u64>,
    source: Option<String>,
    #[serde(default)]
    kind: TestKind,
    error: Option<WireError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireError {
    message: Option<String>,
    stack: Option<String>,
    source_url: Option<String>,
    line: Option<u32>,
}

impl WireSuite {
    fn into_info(self) -> SuiteInfo {
        SuiteInfo {
            title: self.title,
            root: self.root,
            full_title: self.full_title,
        }
    }
}

impl WireTest {
    fn into_info(self) -> TestInfo {
        TestInfo {
            title: self.title,
            full_title: self.full_title,
            duration_ms: self.duration,
            state: self.state,
            pending: self.pending,
            slow_ms: self.slow_threshold,
            source: self.source,
            kind: self.kind,
            err: self.error.map(WireError::into_record),
        }
    }
}

impl WireError {
    fn into_record(self) -> ErrorRecord {
        ErrorRecord {
            message: strip_ansi(&self.message.unwrap_or_default()),
            stack: self.stack.map(|s| strip_ansi(&s)),
            source_url: self.source_url,
            line: self.line,
        }
    }
}

impl WireEvent {
    fn into_runner_event(self) -> RunnerEvent {
        match self {
            WireEvent::Start => RunnerEvent::RunStarted,
            WireEvent::Suite(suite) => RunnerEvent::SuiteStarted(suite.into_info()),
            WireEvent::SuiteEnd(suite) => RunnerEvent::SuiteFinished(suite.into_info()),
            WireEvent::TestEnd(test) => RunnerEvent::TestFinished(test.into_info()),
            WireEvent::Pass(test) => RunnerEvent::TestPassed(test.into_info()),
            WireEvent::Fail(test) => {
                // The wire record carries the error inline; the event keeps
                // it as a separate argument, mirroring the runner interface.
                let mut test = test.into_info();
                let err = test.err.take().unwrap_or_default();
                RunnerEvent::TestFailed { test, err }
            }
            WireEvent::End => RunnerEvent::RunFinished,
        }
    }
}

/// Strip ANSI escape sequences from a string.
fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // Skip until we hit a letter (end of escape sequence)
            for c2 in chars.by_ref() {
                if c2.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}
