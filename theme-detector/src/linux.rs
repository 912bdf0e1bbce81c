//! Linux desktop detectors.
//!
//! GNOME and the generic fallback follow a `gsettings monitor` process, KDE
//! polls `kreadconfig5` and LXDE watches its `desktop.conf`.
use crate::{watcher::WatchContext, CommandRunner, DetectorError};
use log::{debug, warn};
use std::io;

mod generic;
mod gnome;
mod kde;
mod lxde;

pub(crate) use generic::GenericLinux;
pub(crate) use gnome::Gnome;
pub(crate) use kde::Kde;
pub(crate) use lxde::Lxde;

/// GSettings schema holding the GTK desktop interface keys.
pub(crate) const INTERFACE_SCHEMA: &str = "org.gnome.desktop.interface";

/// Split a `gsettings monitor` line such as `gtk-theme: 'Adwaita-dark'`
/// into its key and unquoted value.
pub(crate) fn parse_monitor_line(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    let (key, value) = (key.trim(), value.trim());

    if key.is_empty() || key.contains(char::is_whitespace) || value.is_empty() {
        return None;
    }
    Some((key, value.trim_matches('\'')))
}

/// First line of a `gsettings get` style output.
pub(crate) fn first_line(output: &str) -> &str {
    output.lines().next().unwrap_or_default().trim()
}

/// Read lines from a monitoring process until cancelled, handing every
/// parsed `key: value` pair to `on_change`.
///
/// A blocked read only returns once the cancel hook killed the process.
pub(crate) fn follow_monitor(
    runner: &dyn CommandRunner,
    argv: &[&str],
    ctx: &mut WatchContext,
    mut on_change: impl FnMut(&str, &str, &mut WatchContext),
) -> Result<(), DetectorError> {
    let process = runner.spawn(argv)?;
    let hook = process.clone();
    ctx.on_cancel(move || hook.terminate());

    let result = loop {
        if ctx.is_cancelled() {
            break Ok(());
        }

        let line = match process.read_line() {
            Ok(Some(line)) => line,
            Ok(None) | Err(_) if ctx.is_cancelled() => break Ok(()),
            Ok(None) => break Err(DetectorError::MonitorExited(argv.join(" "))),
            Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                warn!("Skipping unreadable monitor output: {err}");
                continue;
            }
            Err(err) => break Err(err.into()),
        };

        if line.trim().is_empty() {
            continue;
        }

        match parse_monitor_line(&line) {
            Some((key, value)) => on_change(key, value, ctx),
            None => warn!("Couldn't parse monitor output: {line:?}"),
        }
    };

    if process.is_alive() {
        process.terminate();
    }
    debug!("Stopped following {}", argv.join(" "));

    result
}
