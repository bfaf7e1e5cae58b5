// src/exec/action.rs

//! The registered action invoked once per quiescent file.
//!
//! - [`LogAction`] is the default when nothing is configured.
//! - [`CommandAction`] runs a shell command per file.
//! - [`FnAction`] wraps a closure for library users and tests.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

/// Environment variable carrying the translated path into commands.
pub const PATH_ENV_VAR: &str = "FILETRIGGER_PATH";

/// Boxed future returned by [`Action::run`].
pub type ActionFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// Something to do with a file once it has finished arriving.
///
/// Errors are reported back to the dispatcher, which logs them; they never
/// stop the session.
pub trait Action: Send + Sync + fmt::Debug {
    fn run<'a>(&'a self, path: &'a str) -> ActionFuture<'a>;
}

/// Default action: log the path and succeed.
#[derive(Debug, Clone, Default)]
pub struct LogAction;

impl Action for LogAction {
    fn run<'a>(&'a self, path: &'a str) -> ActionFuture<'a> {
        Box::pin(async move {
            info!(%path, "file ready (no action configured)");
            Ok(())
        })
    }
}

/// Runs `cmd` through the platform shell with the path appended as its last
/// argument and exported as `FILETRIGGER_PATH`. Non-zero exit is a failure.
#[derive(Debug, Clone)]
pub struct CommandAction {
    cmd: String,
}

impl CommandAction {
    pub fn new(cmd: impl Into<String>) -> Self {
        Self { cmd: cmd.into() }
    }

    pub fn cmd(&self) -> &str {
        &self.cmd
    }

    fn build_command(&self, path: &str) -> Command {
        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(format!("{} \"{}\"", self.cmd, path));
            c
        } else {
            // `$1` keeps the path out of shell word splitting.
            let mut c = Command::new("sh");
            c.arg("-c")
                .arg(format!("{} \"$1\"", self.cmd))
                .arg("filetrigger")
                .arg(path);
            c
        };

        cmd.env(PATH_ENV_VAR, path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

impl Action for CommandAction {
    fn run<'a>(&'a self, path: &'a str) -> ActionFuture<'a> {
        Box::pin(async move {
            debug!(cmd = %self.cmd, %path, "starting action command");

            let mut child = self
                .build_command(path)
                .spawn()
                .with_context(|| format!("spawning action command '{}'", self.cmd))?;

            if let Some(stdout) = child.stdout.take() {
                drain_lines(stdout, path.to_string(), "stdout");
            }
            if let Some(stderr) = child.stderr.take() {
                drain_lines(stderr, path.to_string(), "stderr");
            }

            let status = child
                .wait()
                .await
                .with_context(|| format!("waiting for action command '{}'", self.cmd))?;

            if status.success() {
                Ok(())
            } else {
                let code = status.code().unwrap_or(-1);
                Err(anyhow!("action command exited with status {code}"))
            }
        })
    }
}

/// Consume a child pipe so its buffer never fills; log lines at debug.
fn drain_lines<R>(pipe: R, path: String, stream: &'static str)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(pipe).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            debug!(%path, stream, "{}", line);
        }
    });
}

/// Adapts a synchronous closure into an [`Action`].
///
/// The closure runs on tokio's blocking pool, so it may block (e.g. a
/// synchronous upload) without stalling the session loop or other paths.
pub struct FnAction<F> {
    f: Arc<F>,
}

impl<F> FnAction<F>
where
    F: Fn(&str) -> Result<()> + Send + Sync + 'static,
{
    pub fn new(f: F) -> Self {
        Self { f: Arc::new(f) }
    }
}

impl<F> fmt::Debug for FnAction<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnAction").finish_non_exhaustive()
    }
}

impl<F> Action for FnAction<F>
where
    F: Fn(&str) -> Result<()> + Send + Sync + 'static,
{
    fn run<'a>(&'a self, path: &'a str) -> ActionFuture<'a> {
        let f = Arc::clone(&self.f);
        let path = path.to_string();
        Box::pin(async move {
            match tokio::task::spawn_blocking(move || (*f)(&path)).await {
                Ok(res) => res,
                // Keep the panic visible to the dispatcher.
                Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
                Err(err) => Err(anyhow!("action task failed: {err}")),
            }
        })
    }
}
