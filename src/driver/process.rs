//! Generator subprocess lifecycle and output streaming.

use super::GeneratorCommand;
use std::io::{BufRead, BufReader, Read};
use std::process::{Child, ChildStdout, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use thiserror::Error;

/// Cap on captured stderr; a chatty generator must not grow memory.
const MAX_DIAGNOSTIC_BYTES: u64 = 64 * 1024;

/// Poll interval while reaping the child after its stream ends.
const REAP_POLL: Duration = Duration::from_millis(25);

/// Errors raised while driving the generator.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The subprocess could not be started at all. Fatal: the run aborts
    /// before any statistics exist.
    #[error("failed to launch generator {program}: {source}")]
    Launch {
        /// Program that failed to start.
        program: String,
        /// Underlying spawn error.
        #[source]
        source: std::io::Error,
    },
    /// Reading the output stream failed mid-run.
    #[error("error reading generator output: {0}")]
    Stream(#[from] std::io::Error),
    /// The generator outlived its deadline and was killed.
    #[error("generator exceeded the {0:?} timeout and was killed")]
    TimedOut(Duration),
    /// The caller aborted the run before the stream completed.
    #[error("run aborted before the sample stream completed")]
    Aborted,
}

/// Exit status and captured diagnostics of a finished generator.
#[derive(Debug, Clone)]
pub struct GeneratorExit {
    /// Process exit code; `None` if killed by a signal.
    pub status_code: Option<i32>,
    /// Standard error captured verbatim, never parsed as sample data.
    pub diagnostics: String,
}

impl GeneratorExit {
    /// True if the generator exited zero.
    pub fn success(&self) -> bool {
        self.status_code == Some(0)
    }

    /// True if the captured diagnostics contain the given substring.
    ///
    /// Failure wording varies across generator revisions, so callers
    /// match a configured hint rather than an exact string.
    pub fn diagnostic_matches(&self, hint: &str) -> bool {
        self.diagnostics.contains(hint)
    }
}

/// A live generator subprocess with its output exposed as a line stream.
///
/// Standard output must be consumed through [`reader`] until EOF before
/// calling [`finish`]; pipe backpressure bounds memory on both sides.
///
/// [`reader`]: GeneratorProcess::reader
/// [`finish`]: GeneratorProcess::finish
pub struct GeneratorProcess {
    child: Arc<Mutex<Child>>,
    stdout: BufReader<ChildStdout>,
    stderr_thread: Option<JoinHandle<String>>,
    watchdog: Option<Watchdog>,
}

struct Watchdog {
    stop: mpsc::Sender<()>,
    fired: Arc<AtomicBool>,
    timeout: Duration,
    handle: JoinHandle<()>,
}

impl GeneratorProcess {
    /// Spawns the generator for one run.
    ///
    /// With a `timeout`, a watchdog thread kills the subprocess if it is
    /// still alive when the deadline passes; [`finish`] then reports
    /// [`DriverError::TimedOut`].
    ///
    /// [`finish`]: GeneratorProcess::finish
    pub fn spawn(
        command: &GeneratorCommand,
        selector: &str,
        units: u64,
        timeout: Option<Duration>,
    ) -> Result<Self, DriverError> {
        let mut cmd = command.build(selector, units);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|source| DriverError::Launch {
            program: command.program().display().to_string(),
            source,
        })?;

        tracing::debug!(
            program = %command.program().display(),
            selector,
            units,
            "Generator spawned"
        );

        // Both pipes were requested above, so take() cannot return None.
        let stdout = BufReader::new(child.stdout.take().expect("stdout is piped"));
        let stderr = child.stderr.take().expect("stderr is piped");

        // Drain stderr concurrently so a generator that writes a lot of
        // diagnostics cannot fill the pipe and deadlock against us.
        let stderr_thread = thread::spawn(move || {
            let mut diagnostics = String::new();
            let _ = stderr
                .take(MAX_DIAGNOSTIC_BYTES)
                .read_to_string(&mut diagnostics);
            diagnostics
        });

        let child = Arc::new(Mutex::new(child));
        let watchdog = timeout.map(|timeout| Self::arm_watchdog(Arc::clone(&child), timeout));

        Ok(Self {
            child,
            stdout,
            stderr_thread: Some(stderr_thread),
            watchdog,
        })
    }

    fn arm_watchdog(child: Arc<Mutex<Child>>, timeout: Duration) -> Watchdog {
        let (stop, stop_rx) = mpsc::channel();
        let fired = Arc::new(AtomicBool::new(false));
        let fired_flag = Arc::clone(&fired);
        let handle = thread::spawn(move || {
            match stop_rx.recv_timeout(timeout) {
                // finish() signaled, or the process handle was dropped.
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {}
                Err(RecvTimeoutError::Timeout) => {
                    let _ = lock_child(&child).kill();
                    fired_flag.store(true, Ordering::SeqCst);
                    tracing::warn!(?timeout, "Generator timed out and was killed");
                }
            }
        });
        Watchdog {
            stop,
            fired,
            timeout,
            handle,
        }
    }

    /// Buffered line stream over the generator's standard output.
    pub fn reader(&mut self) -> &mut impl BufRead {
        &mut self.stdout
    }

    /// Kills the subprocess, e.g. when the caller is aborting the run.
    pub fn kill(&self) {
        let _ = lock_child(&self.child).kill();
    }

    /// Reaps the subprocess and returns its exit status and diagnostics.
    ///
    /// Call after the output stream reached EOF. Polls rather than
    /// blocking on `wait` so an armed watchdog can still kill a child
    /// that closed its pipes but refuses to exit.
    pub fn finish(mut self) -> Result<GeneratorExit, DriverError> {
        let status = loop {
            if let Some(status) = lock_child(&self.child).try_wait()? {
                break status;
            }
            thread::sleep(REAP_POLL);
        };

        if let Some(watchdog) = self.watchdog.take() {
            let _ = watchdog.stop.send(());
            let _ = watchdog.handle.join();
            if watchdog.fired.load(Ordering::SeqCst) {
                return Err(DriverError::TimedOut(watchdog.timeout));
            }
        }

        let diagnostics = self
            .stderr_thread
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();

        let exit = GeneratorExit {
            status_code: status.code(),
            diagnostics,
        };
        if exit.success() {
            tracing::debug!("Generator exited cleanly");
        } else {
            tracing::warn!(code = ?exit.status_code, "Generator exited with failure");
        }
        Ok(exit)
    }
}

// Recover the child on a poisoned lock instead of propagating the panic;
// the mutex only guards kill/try_wait calls.
fn lock_child(child: &Arc<Mutex<Child>>) -> MutexGuard<'_, Child> {
    child.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
