//! Running the helper programs the Linux detectors read settings with.
use crate::DetectorError;
use log::{debug, warn};
use std::{
    io::{self, BufRead, BufReader},
    process::{Child, ChildStdout, Command, Stdio},
    sync::{Arc, Mutex, PoisonError},
};

/// Runs commands given as an argument vector.
pub trait CommandRunner: Send + Sync {
    /// Run a command to completion and return its stdout.
    fn output(&self, argv: &[&str]) -> Result<String, DetectorError>;

    /// Start a long running command whose stdout is read line by line.
    fn spawn(&self, argv: &[&str]) -> Result<Arc<dyn MonitorProcess>, DetectorError>;
}

/// A running monitoring process.
pub trait MonitorProcess: Send + Sync {
    /// Block for the next stdout line. `None` once the output is closed.
    fn read_line(&self) -> io::Result<Option<String>>;

    fn is_alive(&self) -> bool;

    /// Kill the process. Unblocks a pending [`MonitorProcess::read_line`].
    fn terminate(&self);
}

/// [`CommandRunner`] backed by [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

fn command(argv: &[&str]) -> Result<Command, DetectorError> {
    let (program, args) = argv.split_first().ok_or_else(|| DetectorError::Spawn {
        command: String::new(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "empty command"),
    })?;

    let mut command = Command::new(program);
    command.args(args);
    Ok(command)
}

impl CommandRunner for SystemRunner {
    fn output(&self, argv: &[&str]) -> Result<String, DetectorError> {
        let output = command(argv)?
            .stdin(Stdio::null())
            .output()
            .map_err(|source| DetectorError::Spawn {
                command: argv.join(" "),
                source,
            })?;

        if !output.status.success() {
            return Err(DetectorError::CommandFailed {
                command: argv.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn spawn(&self, argv: &[&str]) -> Result<Arc<dyn MonitorProcess>, DetectorError> {
        let mut child = command(argv)?
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| DetectorError::Spawn {
                command: argv.join(" "),
                source,
            })?;

        let stdout = child.stdout.take().ok_or_else(|| DetectorError::Spawn {
            command: argv.join(" "),
            source: io::Error::new(io::ErrorKind::BrokenPipe, "no stdout"),
        })?;
        debug!("Started monitoring process: {}", argv.join(" "));

        Ok(Arc::new(ChildProcess {
            command: argv.join(" "),
            child: Mutex::new(child),
            stdout: Mutex::new(BufReader::new(stdout)),
        }))
    }
}

struct ChildProcess {
    command: String,
    child: Mutex<Child>,
    stdout: Mutex<BufReader<ChildStdout>>,
}

impl MonitorProcess for ChildProcess {
    fn read_line(&self) -> io::Result<Option<String>> {
        let mut line = Vec::new();
        let read = self
            .stdout
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .read_until(b'\n', &mut line)?;

        // Invalid UTF-8 is replaced so the line fails parsing instead of the read.
        Ok((read > 0).then(|| String::from_utf8_lossy(&line).trim_end().to_owned()))
    }

    fn is_alive(&self) -> bool {
        matches!(
            self.child
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .try_wait(),
            Ok(None)
        )
    }

    fn terminate(&self) {
        let mut child = self.child.lock().unwrap_or_else(PoisonError::into_inner);
        if let Ok(None) = child.try_wait() {
            if let Err(err) = child.kill() {
                warn!("Failed to kill {}: {err}", self.command);
            }
            // Reap so the process does not linger as a zombie.
            let _ = child.wait();
            debug!("Monitoring process {} has been terminated", self.command);
        }
    }
}
