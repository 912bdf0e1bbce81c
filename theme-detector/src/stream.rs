//! Theme changes as a [`Stream`].
use crate::{Listener, ThemeDetector};
use futures::{
    channel::mpsc::{self, UnboundedReceiver},
    Stream,
};
use log::debug;
use std::{
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

/// Stream of dark theme flags from [`ThemeDetector::subscribe`].
///
/// The underlying listener is removed when the stream is dropped.
pub struct ThemeChanges<'a> {
    detector: &'a ThemeDetector,
    listener: Listener,
    rx: UnboundedReceiver<bool>,
}

impl<'a> ThemeChanges<'a> {
    pub(crate) fn new(detector: &'a ThemeDetector) -> Self {
        let (tx, rx) = mpsc::unbounded::<bool>();
        let listener: Listener = Arc::new(move |dark| {
            if let Err(err) = tx.unbounded_send(dark) {
                debug!("Theme change receiver is gone: {err}");
            }
        });
        detector.register_listener(listener.clone());

        Self {
            detector,
            listener,
            rx,
        }
    }
}

impl Stream for ThemeChanges<'_> {
    type Item = bool;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<bool>> {
        Pin::new(&mut self.rx).poll_next(cx)
    }
}

impl Drop for ThemeChanges<'_> {
    fn drop(&mut self) {
        self.detector.remove_listener(&self.listener);
    }
}
