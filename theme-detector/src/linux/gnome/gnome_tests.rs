use super::{Gnome, COLOR_SCHEME, GTK_THEME};
use crate::{
    linux::INTERFACE_SCHEMA,
    testing::{recorder, MockRunner, TIMEOUT},
    watcher::{CancelToken, WatchContext},
    DetectorError, ListenerSet,
};
use cool_asserts::assert_matches;
use std::{sync::Arc, thread, time::Duration};

fn get(key: &str) -> [&str; 4] {
    ["gsettings", "get", INTERFACE_SCHEMA, key]
}

fn runner(gtk_theme: &str, color_scheme: &str) -> Arc<MockRunner> {
    let runner = MockRunner::new();
    runner.set_output(&get(GTK_THEME), gtk_theme);
    runner.set_output(&get(COLOR_SCHEME), color_scheme);
    runner
}

#[test]
fn either_setting_makes_it_dark() {
    let gnome = Gnome::new(runner("'light'\n", "'prefer-dark'\n"));
    assert!(gnome.query().unwrap());

    let gnome = Gnome::new(runner("'Adwaita-dark'\n", "'default'\n"));
    assert!(gnome.query().unwrap());

    let gnome = Gnome::new(runner("'Adwaita'\n", "'default'\n"));
    assert!(!gnome.query().unwrap());
}

#[test]
fn missing_color_scheme_key() {
    let runner = MockRunner::new();
    runner.set_output(&get(GTK_THEME), "'Yaru-dark'\n");
    runner.set_failure(&get(COLOR_SCHEME), "No such key “color-scheme”");

    assert!(Gnome::new(runner).query().unwrap());
}

#[test]
fn both_settings_failing_is_an_error() {
    let runner = MockRunner::new();
    runner.set_failure(&get(GTK_THEME), "No such schema");
    runner.set_failure(&get(COLOR_SCHEME), "No such schema");

    assert_matches!(
        Gnome::new(runner).query(),
        Err(DetectorError::CommandFailed { .. })
    );
}

#[test]
fn watch_tracks_both_settings() {
    let runner = runner("'Adwaita'\n", "'default'\n");
    let gnome = Arc::new(Gnome::new(runner.clone()));
    let listeners = Arc::new(ListenerSet::new());
    let (listener, rx) = recorder();
    listeners.add(listener);

    let cancel = CancelToken::default();
    let mut ctx = WatchContext::new(listeners, cancel.clone(), false);
    let watching = gnome.clone();
    let handle = thread::spawn(move || watching.watch(&mut ctx));

    let process = runner.process(0);
    assert_eq!(process.command, "gsettings monitor org.gnome.desktop.interface");

    process.emit("font-name: 'Cantarell 11'");
    process.emit("color-scheme: 'prefer-dark'");
    assert_eq!(rx.recv_timeout(TIMEOUT), Ok(true));

    // Still dark through the color scheme.
    process.emit("gtk-theme: 'Adwaita'");
    process.emit("gtk-theme: 'Adwaita-dark'");
    process.emit("color-scheme: 'default'");
    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());

    process.emit("gtk-theme: 'Adwaita'");
    assert_eq!(rx.recv_timeout(TIMEOUT), Ok(false));

    cancel.cancel();
    assert!(process.was_terminated());
    assert_matches!(handle.join().unwrap(), Ok(()));
}
