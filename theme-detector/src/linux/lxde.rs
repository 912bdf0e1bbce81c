use crate::{classify::is_dark_lxde_config, watcher::WatchContext, DetectorError};
use log::{debug, warn};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::{
    fs,
    path::PathBuf,
    sync::mpsc::{self, RecvTimeoutError},
    time::Duration,
};

const DESKTOP_CONF: &str = "desktop.conf";

/// LXDE detector reading `sNet/ThemeName` from the session `desktop.conf`
/// and watching its directory for changes.
pub(crate) struct Lxde {
    config_dir: Option<PathBuf>,
    wait_interval: Duration,
}

fn is_config_change(event: &Event) -> bool {
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        && event
            .paths
            .iter()
            .any(|path| path.file_name().is_some_and(|name| name == DESKTOP_CONF))
}

impl Lxde {
    pub(crate) fn new(config_dir: Option<PathBuf>, wait_interval: Duration) -> Self {
        Self {
            config_dir,
            wait_interval,
        }
    }

    fn config_dir(&self) -> Result<PathBuf, DetectorError> {
        match &self.config_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::home_dir()
                .map(|home| home.join(".config/lxsession/LXDE"))
                .ok_or(DetectorError::NoHomeDir),
        }
    }

    pub(crate) fn query(&self) -> Result<bool, DetectorError> {
        let contents = fs::read_to_string(self.config_dir()?.join(DESKTOP_CONF))?;
        Ok(is_dark_lxde_config(&contents))
    }

    pub(crate) fn watch(&self, ctx: &mut WatchContext) -> Result<(), DetectorError> {
        let dir = self.config_dir()?;
        let (tx, rx) = mpsc::channel::<notify::Result<Event>>();
        let mut watcher = notify::recommended_watcher(tx)?;
        watcher.watch(&dir, RecursiveMode::Recursive)?;
        debug!("Watching {}", dir.display());

        while !ctx.is_cancelled() {
            match rx.recv_timeout(self.wait_interval) {
                Ok(Ok(event)) if is_config_change(&event) => match self.query() {
                    Ok(dark) => {
                        ctx.update(dark);
                    }
                    Err(err) => warn!("Couldn't detect LXDE theme: {err}"),
                },
                Ok(Ok(_)) | Err(RecvTimeoutError::Timeout) => (),
                Ok(Err(err)) => warn!("File watch error: {err}"),
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(DetectorError::MonitorExited(dir.display().to_string()))
                }
            }
        }

        if let Err(err) = watcher.unwatch(&dir) {
            debug!("Failed to unwatch {}: {err}", dir.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod lxde_tests;
