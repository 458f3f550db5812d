//! Backend that runs the `git` executable
//!
//! Every query spawns one `git` process whose stdout is handed out as the
//! log stream. The process belongs to the stream: reading to the end checks
//! its exit status, dropping the stream early kills and reaps it.

use crate::areas::backend::{LogBackend, LogReader};
use crate::artifacts::log::log_format::LogFormat;
use crate::artifacts::log::log_query::LogQuery;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, Result};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStderr, ChildStdout, Command, Stdio};
use tracing::{debug, debug_span};

/// Fragments of git's stderr that mean "no such revision/object"
const UNKNOWN_REVISION_MARKERS: &[&str] = &[
    "unknown revision",
    "bad revision",
    "bad object",
    "not a valid object name",
    "invalid revision range",
    "ambiguous argument",
];

#[derive(Debug, Clone)]
pub struct GitBinary {
    work_dir: PathBuf,
}

impl GitBinary {
    /// Backend for the repository containing `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let work_dir = path.as_ref().canonicalize()?;
        Ok(Self { work_dir })
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    fn git(&self) -> Command {
        let mut cmd = Command::new("git");
        // User configuration (log.showSignature, color.ui, ...) changes the output shape
        cmd.env("GIT_CONFIG_GLOBAL", "/dev/null");
        cmd.env("GIT_CONFIG_NOSYSTEM", "1");
        cmd.env("GIT_CONFIG_SYSTEM", "/dev/null");
        cmd.arg("-C").arg(&self.work_dir);
        cmd.stdin(Stdio::null());
        cmd
    }

    fn spawn(&self, mut cmd: Command) -> Result<LogReader> {
        debug!("{cmd:?}");
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

        let stream = ProcessStream::spawn(cmd)?;
        Ok(Box::new(BufReader::new(stream)))
    }
}

impl LogBackend for GitBinary {
    fn log(&self, query: &LogQuery, format: &LogFormat) -> Result<LogReader> {
        format.ensure_parsable()?;
        let _span = debug_span!("git_log", revision = query.revision()).entered();

        let mut cmd = self.git();
        cmd.arg("rev-list").arg("--pretty=raw");
        if format.allows_annotations() {
            cmd.arg("--parents");
        }
        if query.is_bisect_all() {
            cmd.arg("--bisect-all");
        }
        if query.is_first_parent() {
            cmd.arg("--first-parent");
        }
        if let Some(max_count) = query.limit() {
            cmd.arg(format!("--max-count={max_count}"));
        }
        if query.skipped() > 0 {
            cmd.arg(format!("--skip={}", query.skipped()));
        }
        cmd.arg(query.revision()).arg("--").args(query.path_filters());

        self.spawn(cmd)
    }

    fn show(&self, id: &ObjectId) -> Result<LogReader> {
        let _span = debug_span!("git_show", %id).entered();

        let mut cmd = self.git();
        cmd.args(["rev-list", "--pretty=raw", "--max-count=1"])
            .arg(id.as_ref())
            .arg("--");

        self.spawn(cmd)
    }

    fn numstat(&self, id: &ObjectId, parent: Option<&ObjectId>) -> Result<LogReader> {
        let _span = debug_span!("git_numstat", %id).entered();

        let mut cmd = self.git();
        cmd.args(["diff-tree", "-r", "--no-commit-id", "--numstat", "--shortstat"]);
        match parent {
            Some(parent) => cmd.arg(parent.as_ref()),
            None => cmd.arg("--root"),
        };
        cmd.arg(id.as_ref());

        self.spawn(cmd)
    }
}

/// Stdout of a running git process
///
/// End of stream is only reported once the process exited successfully;
/// otherwise the read fails with the process' stderr, converted into
/// [`Error::Resolution`] or [`Error::Git`].
pub struct ProcessStream {
    child: Child,
    stdout: ChildStdout,
    stderr: Option<ChildStderr>,
    finished: bool,
}

impl ProcessStream {
    pub fn spawn(mut cmd: Command) -> Result<Self> {
        let mut child = cmd.spawn()?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("child stdout is not piped"))?;
        let stderr = child.stderr.take();

        Ok(Self {
            child,
            stdout,
            stderr,
            finished: false,
        })
    }

    pub fn id(&self) -> u32 {
        self.child.id()
    }

    fn finish(&mut self) -> io::Result<()> {
        self.finished = true;

        let mut stderr = String::new();
        if let Some(mut pipe) = self.stderr.take() {
            pipe.read_to_string(&mut stderr)?;
        }

        let status = self.child.wait()?;
        if status.success() {
            return Ok(());
        }

        debug!(%status, "git failed: {}", stderr.trim());
        let lowered = stderr.to_lowercase();
        let error = if UNKNOWN_REVISION_MARKERS
            .iter()
            .any(|marker| lowered.contains(marker))
        {
            Error::Resolution(stderr.lines().next().unwrap_or_default().to_string())
        } else {
            Error::Git {
                status,
                stderr: stderr.trim().to_string(),
            }
        };
        Err(io::Error::other(error))
    }
}

impl Read for ProcessStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.finished {
            return Ok(0);
        }

        let read = self.stdout.read(buf)?;
        if read == 0 && !buf.is_empty() {
            self.finish()?;
        }
        Ok(read)
    }
}

impl Drop for ProcessStream {
    fn drop(&mut self) {
        if self.finished {
            return;
        }

        debug!(pid = self.child.id(), "abandoning git process");
        // The process may already have exited on its own
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
