//! Mock process runner and helpers shared by the unit tests.
use crate::{CommandRunner, DetectorError, Listener, MonitorProcess};
use std::{
    collections::HashMap,
    io,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, RecvTimeoutError, Sender},
        Arc, Mutex,
    },
    thread,
    time::{Duration, Instant},
};

pub(crate) const TIMEOUT: Duration = Duration::from_secs(5);

/// Listener forwarding every value to a channel.
pub(crate) fn recorder() -> (Listener, Receiver<bool>) {
    let (tx, rx) = mpsc::channel();
    let listener: Listener = Arc::new(move |dark| {
        let _ = tx.send(dark);
    });
    (listener, rx)
}

/// Poll `condition` until it holds or [`TIMEOUT`] elapses.
pub(crate) fn wait_until(condition: impl Fn() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < TIMEOUT {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    condition()
}

/// Scripted [`CommandRunner`]. Every spawn hands out a fresh [`MockProcess`].
#[derive(Default)]
pub(crate) struct MockRunner {
    outputs: Mutex<HashMap<String, Result<String, String>>>,
    processes: Mutex<Vec<Arc<MockProcess>>>,
    fail_spawn: AtomicBool,
}

impl MockRunner {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn set_output(&self, argv: &[&str], output: &str) {
        self.outputs
            .lock()
            .unwrap()
            .insert(argv.join(" "), Ok(output.to_owned()));
    }

    pub(crate) fn set_failure(&self, argv: &[&str], stderr: &str) {
        self.outputs
            .lock()
            .unwrap()
            .insert(argv.join(" "), Err(stderr.to_owned()));
    }

    pub(crate) fn fail_spawn(&self, fail: bool) {
        self.fail_spawn.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn spawn_count(&self) -> usize {
        self.processes.lock().unwrap().len()
    }

    /// Wait for the `index`th spawned process.
    pub(crate) fn process(&self, index: usize) -> Arc<MockProcess> {
        assert!(
            wait_until(|| self.spawn_count() > index),
            "process {index} never spawned"
        );
        self.processes.lock().unwrap()[index].clone()
    }
}

impl CommandRunner for MockRunner {
    fn output(&self, argv: &[&str]) -> Result<String, DetectorError> {
        let command = argv.join(" ");
        match self.outputs.lock().unwrap().get(&command).cloned() {
            Some(Ok(output)) => Ok(output),
            Some(Err(stderr)) => Err(DetectorError::CommandFailed { command, stderr }),
            None => Err(DetectorError::Spawn {
                command,
                source: io::Error::new(io::ErrorKind::NotFound, "not scripted"),
            }),
        }
    }

    fn spawn(&self, argv: &[&str]) -> Result<Arc<dyn MonitorProcess>, DetectorError> {
        if self.fail_spawn.load(Ordering::SeqCst) {
            return Err(DetectorError::Spawn {
                command: argv.join(" "),
                source: io::Error::new(io::ErrorKind::NotFound, "spawn disabled"),
            });
        }

        let process = MockProcess::new(argv.join(" "));
        self.processes.lock().unwrap().push(process.clone());
        Ok(process)
    }
}

/// Monitoring process fed through [`MockProcess::emit`].
pub(crate) struct MockProcess {
    pub(crate) command: String,
    lines: Mutex<Receiver<String>>,
    feed: Mutex<Option<Sender<String>>>,
    terminated: AtomicBool,
}

impl MockProcess {
    fn new(command: String) -> Arc<Self> {
        let (tx, rx) = mpsc::channel();
        Arc::new(Self {
            command,
            lines: Mutex::new(rx),
            feed: Mutex::new(Some(tx)),
            terminated: AtomicBool::new(false),
        })
    }

    pub(crate) fn emit(&self, line: &str) {
        if let Some(feed) = self.feed.lock().unwrap().as_ref() {
            let _ = feed.send(line.to_owned());
        }
    }

    /// Close stdout as if the process died on its own.
    pub(crate) fn exit(&self) {
        self.feed.lock().unwrap().take();
    }

    pub(crate) fn was_terminated(&self) -> bool {
        self.terminated.load(Ordering::SeqCst)
    }
}

impl MonitorProcess for MockProcess {
    fn read_line(&self) -> io::Result<Option<String>> {
        let lines = self.lines.lock().unwrap();
        loop {
            if self.was_terminated() {
                return Ok(None);
            }
            match lines.recv_timeout(Duration::from_millis(5)) {
                Ok(line) => return Ok(Some(line)),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return Ok(None),
            }
        }
    }

    fn is_alive(&self) -> bool {
        !self.was_terminated() && self.feed.lock().unwrap().is_some()
    }

    fn terminate(&self) {
        self.terminated.store(true, Ordering::SeqCst);
    }
}
