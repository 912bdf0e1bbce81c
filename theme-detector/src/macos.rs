//! macOS defaults and theme change notifications.
use crate::{classify::is_dark_name, watcher::WatchContext, DetectorError};
use block2::RcBlock;
use log::{debug, info, warn};
use objc2::{rc::Retained, runtime::AnyObject};
use objc2_foundation::{
    ns_string, NSDistributedNotificationCenter, NSNotification, NSString, NSUserDefaults,
};
use std::{
    ptr::NonNull,
    sync::mpsc::{self, RecvTimeoutError},
    time::Duration,
};

/// macOS detector using `AppleInterfaceStyle` and the distributed
/// `AppleInterfaceThemeChangedNotification`.
///
/// The notification is delivered on the thread running the main run loop.
/// The callback only forwards a wake up to the watcher thread, which does the
/// query and notifies listeners.
pub(crate) struct MacOs {
    wait_interval: Duration,
}

impl MacOs {
    pub(crate) fn new(wait_interval: Duration) -> Self {
        Self { wait_interval }
    }

    pub(crate) fn query(&self) -> Result<bool, DetectorError> {
        unsafe {
            let style = NSUserDefaults::standardUserDefaults()
                .persistentDomainForName(ns_string!("Apple Global Domain"))
                .ok_or_else(|| DetectorError::Query("Failed to lookup global domain".into()))?
                .objectForKey(ns_string!("AppleInterfaceStyle"));

            let Some(style) = style else {
                debug!("No style found. Using light theme.");
                return Ok(false);
            };

            let style = Retained::cast_unchecked::<NSString>(style);
            debug!("Macos interface style: {style}");

            Ok(is_dark_name(&style.to_string()))
        }
    }

    pub(crate) fn watch(&self, ctx: &mut WatchContext) -> Result<(), DetectorError> {
        let (tx, rx) = mpsc::channel::<()>();
        let block = RcBlock::new(move |_notification: NonNull<NSNotification>| {
            let _ = tx.send(());
        });

        let center = NSDistributedNotificationCenter::defaultCenter();
        let observer = unsafe {
            center.addObserverForName_object_queue_usingBlock(
                Some(ns_string!("AppleInterfaceThemeChangedNotification")),
                None,
                None,
                &block,
            )
        };
        info!("Observing AppleInterfaceThemeChangedNotification");

        while !ctx.is_cancelled() {
            match rx.recv_timeout(self.wait_interval) {
                Ok(()) => match self.query() {
                    Ok(dark) => {
                        ctx.update(dark);
                    }
                    Err(err) => warn!("Couldn't detect macOS theme: {err}"),
                },
                Err(RecvTimeoutError::Timeout) => (),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        let observer: &AnyObject = AsRef::<AnyObject>::as_ref(&*observer);
        unsafe { center.removeObserver(observer) };
        debug!("Removed theme change observer");
        Ok(())
    }
}
