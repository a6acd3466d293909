//! Process runners: the seam between tool operations and real subprocesses.

use std::future::Future;
use std::process::Stdio;
use std::time::Duration;

use ap_core::{Error, Result};
use tokio::process::Command;
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::command::{ToolCommand, ToolOutput};

/// Executes a [`ToolCommand`] and reports how it exited.
///
/// A non-zero exit is *not* an error at this level; callers decide via
/// [`ToolOutput::check`]. Errors are reserved for failing to launch the
/// process, interruption, and deadlines.
pub trait ProcessRunner {
    fn run(&self, cmd: &ToolCommand) -> Result<ToolOutput>;
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for &R {
    fn run(&self, cmd: &ToolCommand) -> Result<ToolOutput> {
        (**self).run(cmd)
    }
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for Box<R> {
    fn run(&self, cmd: &ToolCommand) -> Result<ToolOutput> {
        (**self).run(cmd)
    }
}

/// Runs commands as real child processes, blocking the calling thread.
///
/// A private tokio runtime waits on the child while racing the optional
/// deadline and the runner's [`CancellationToken`]. Ctrl-C cancels that token
/// for the whole life of the runner, so an interrupt that lands between two
/// runs still stops the next one. Cancellation kills the child and fails the
/// call with [`Error::Interrupted`]; once cancelled, every later run fails
/// immediately.
///
/// Must not be called from inside another tokio runtime.
pub struct SystemRunner {
    runtime: tokio::runtime::Runtime,
    cancel: CancellationToken,
}

impl SystemRunner {
    pub fn new() -> Result<Self> {
        // One worker keeps the interrupt listener alive between runs.
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("audioprep-runner")
            .enable_all()
            .build()?;

        let cancel = CancellationToken::new();
        watch_interrupts(&runtime, cancel.clone())?;

        Ok(Self { runtime, cancel })
    }

    /// Token that interrupts the in-flight (and every later) run when
    /// cancelled from another thread.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&self, cmd: &ToolCommand) -> Result<ToolOutput> {
        if self.cancel.is_cancelled() {
            return Err(Error::interrupted(cmd.program_name()));
        }

        tracing::debug!("exec: {cmd}");
        self.runtime.block_on(execute(cmd, &self.cancel))
    }
}

/// Cancel `cancel` on the first Ctrl-C received while `runtime` lives.
///
/// The handler is installed before this returns.
#[cfg(unix)]
fn watch_interrupts(runtime: &Runtime, cancel: CancellationToken) -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = {
        let _guard = runtime.enter();
        signal(SignalKind::interrupt())?
    };

    runtime.spawn(async move {
        if interrupt.recv().await.is_some() {
            tracing::warn!("interrupt received; stopping external tools");
            cancel.cancel();
        }
    });

    Ok(())
}

#[cfg(not(unix))]
fn watch_interrupts(runtime: &Runtime, cancel: CancellationToken) -> Result<()> {
    runtime.spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::warn!("interrupt received; stopping external tools");
                cancel.cancel();
            }
            Err(e) => tracing::error!("Failed to install Ctrl+C handler: {}", e),
        }
    });

    Ok(())
}

async fn execute(cmd: &ToolCommand, cancel: &CancellationToken) -> Result<ToolOutput> {
    let tool = cmd.program_name();

    let mut command = Command::new(cmd.program());
    command
        .args(cmd.get_args())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = command.spawn().map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
            tracing::debug!("failed to spawn {tool}: {e}");
            Error::tool_unavailable(&tool)
        }
        _ => Error::from(e),
    })?;

    // Dropping the wait future drops the child, which kills it.
    let output = tokio::select! {
        waited = with_deadline(child.wait_with_output(), cmd.get_timeout()) => match waited {
            Some(output) => output?,
            None => {
                return Err(Error::TimedOut {
                    tool,
                    after: cmd.get_timeout().unwrap_or_default(),
                });
            }
        },
        _ = cancel.cancelled() => {
            tracing::warn!("stopping {tool}");
            return Err(Error::interrupted(tool));
        }
    };

    Ok(ToolOutput {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// Await `fut`, giving up after `deadline` if one is set.
async fn with_deadline<F: Future>(fut: F, deadline: Option<Duration>) -> Option<F::Output> {
    match deadline {
        Some(limit) => tokio::time::timeout(limit, fut).await.ok(),
        None => Some(fut.await),
    }
}
