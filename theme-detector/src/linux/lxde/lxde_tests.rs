use super::Lxde;
use crate::{
    testing::{recorder, wait_until, TIMEOUT},
    watcher::{CancelToken, WatchContext},
    DetectorError, ListenerSet,
};
use cool_asserts::assert_matches;
use std::{
    fs,
    path::Path,
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

const LIGHT: &str = "[GTK]\nsNet/ThemeName=Clearlooks\nsNet/IconThemeName=nuoveXT2\n";
const DARK: &str = "[GTK]\nsNet/ThemeName=Adwaita-dark\nsNet/IconThemeName=nuoveXT2\n";

/// Replace the file in one step so the watcher never reads it half written.
fn replace(path: &Path, contents: &str) {
    let tmp = path.with_extension("conf.tmp");
    fs::write(&tmp, contents).unwrap();
    fs::rename(&tmp, path).unwrap();
}

#[test]
fn reads_desktop_conf() {
    let dir = tempfile::tempdir().unwrap();
    let lxde = Lxde::new(Some(dir.path().to_path_buf()), Duration::from_millis(10));

    assert_matches!(lxde.query(), Err(DetectorError::IO(_)));

    fs::write(dir.path().join("desktop.conf"), LIGHT).unwrap();
    assert!(!lxde.query().unwrap());

    fs::write(dir.path().join("desktop.conf"), DARK).unwrap();
    assert!(lxde.query().unwrap());
}

#[test]
fn missing_directory_fails_the_watch() {
    let dir = tempfile::tempdir().unwrap();
    let lxde = Lxde::new(Some(dir.path().join("missing")), Duration::from_millis(10));
    let mut ctx = WatchContext::new(
        Arc::new(ListenerSet::new()),
        CancelToken::default(),
        false,
    );

    assert_matches!(lxde.watch(&mut ctx), Err(DetectorError::Watch(_)));
}

#[test]
fn watch_notices_config_changes() {
    let dir = tempfile::tempdir().unwrap();
    let conf = dir.path().join("desktop.conf");
    fs::write(&conf, LIGHT).unwrap();

    let lxde = Arc::new(Lxde::new(
        Some(dir.path().to_path_buf()),
        Duration::from_millis(10),
    ));
    let listeners = Arc::new(ListenerSet::new());
    let (listener, rx) = recorder();
    listeners.add(listener);

    let cancel = CancelToken::default();
    let mut ctx = WatchContext::new(listeners, cancel.clone(), false);
    let watching = lxde.clone();
    let handle = thread::spawn(move || watching.watch(&mut ctx));

    // The watch is set up asynchronously, keep writing until it is seen.
    let start = Instant::now();
    let mut received = None;
    while received.is_none() && start.elapsed() < TIMEOUT {
        replace(&conf, DARK);
        received = rx.recv_timeout(Duration::from_millis(100)).ok();
    }
    assert_eq!(received, Some(true));

    // Rewriting the same theme is not a change.
    replace(&conf, DARK);
    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());

    // The watch loop sees the cancellation within a few wait intervals.
    cancel.cancel();
    assert!(wait_until(|| handle.is_finished()));
    assert_matches!(handle.join().unwrap(), Ok(()));
}
