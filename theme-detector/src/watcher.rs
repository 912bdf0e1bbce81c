//! Background watcher thread and its cancellation.
use crate::{detector::Backend, ListenerSet};
use log::{debug, error, info};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Condvar, Mutex, MutexGuard, PoisonError,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

type Hook = Box<dyn FnOnce() + Send>;

#[derive(Default)]
struct CancelState {
    cancelled: bool,
    hooks: Vec<Hook>,
}

/// Cooperative cancellation shared between a [`Watcher`] and its thread.
///
/// Hooks registered with [`CancelToken::on_cancel`] run on the cancelling
/// thread, which is how a watcher blocked in a read gets unblocked.
#[derive(Clone, Default)]
pub(crate) struct CancelToken {
    inner: Arc<(Mutex<CancelState>, Condvar)>,
}

impl CancelToken {
    fn state(&self) -> MutexGuard<'_, CancelState> {
        self.inner.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn cancel(&self) {
        let hooks = {
            let mut state = self.state();
            if state.cancelled {
                return;
            }
            state.cancelled = true;
            std::mem::take(&mut state.hooks)
        };
        self.inner.1.notify_all();

        for hook in hooks {
            hook();
        }
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.state().cancelled
    }

    /// Run `hook` when cancelled, or right away if that already happened.
    pub(crate) fn on_cancel(&self, hook: impl FnOnce() + Send + 'static) {
        let mut state = self.state();
        if state.cancelled {
            drop(state);
            hook();
        } else {
            state.hooks.push(Box::new(hook));
        }
    }

    /// Sleep for up to `timeout`. Returns `true` if cancelled.
    pub(crate) fn wait(&self, timeout: Duration) -> bool {
        let state = self.state();
        let (state, _) = self
            .inner
            .1
            .wait_timeout_while(state, timeout, |state| !state.cancelled)
            .unwrap_or_else(PoisonError::into_inner);
        state.cancelled
    }
}

/// State owned by a running watcher thread.
///
/// `last_known` is only ever read and written by that thread.
pub(crate) struct WatchContext {
    listeners: Arc<ListenerSet>,
    cancel: CancelToken,
    last_known: bool,
}

impl WatchContext {
    pub(crate) fn new(listeners: Arc<ListenerSet>, cancel: CancelToken, last_known: bool) -> Self {
        Self {
            listeners,
            cancel,
            last_known,
        }
    }

    #[cfg(test)]
    pub(crate) fn last_known(&self) -> bool {
        self.last_known
    }

    pub(crate) fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub(crate) fn on_cancel(&self, hook: impl FnOnce() + Send + 'static) {
        self.cancel.on_cancel(hook)
    }

    /// Record the current state and notify listeners if it flipped.
    pub(crate) fn update(&mut self, dark: bool) -> bool {
        if dark == self.last_known {
            return false;
        }
        self.last_known = dark;
        info!("Theme change detected, dark: {dark}");
        self.listeners.notify(dark);
        true
    }
}

/// Handle to a running watcher thread. Dropping it cancels the thread
/// without waiting for it.
pub(crate) struct Watcher {
    cancel: CancelToken,
    finished: Arc<AtomicBool>,
    _thread: Option<JoinHandle<()>>,
}

/// Flags the watcher as finished however its thread exits.
struct FinishGuard(Arc<AtomicBool>);

impl Drop for FinishGuard {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl Watcher {
    /// Read the current state on the calling thread, then watch on a new one.
    pub(crate) fn start(backend: Arc<Backend>, listeners: Arc<ListenerSet>) -> Self {
        let cancel = CancelToken::default();
        let finished = Arc::new(AtomicBool::new(false));
        let initial = backend.query_state();
        let mut ctx = WatchContext::new(listeners, cancel.clone(), initial);

        let guard = FinishGuard(finished.clone());
        let name = format!("{} theme detector", backend.name());
        debug!("Starting {name}, dark: {initial}");

        let thread = thread::Builder::new().name(name).spawn(move || {
            let _guard = guard;
            match backend.watch(&mut ctx) {
                Ok(()) => debug!("{} watcher stopped", backend.name()),
                Err(err) => error!("{} watcher failed: {err}", backend.name()),
            }
        });

        let thread = match thread {
            Ok(thread) => Some(thread),
            Err(err) => {
                error!("Failed to spawn watcher thread: {err}");
                finished.store(true, Ordering::SeqCst);
                None
            }
        };

        Self {
            cancel,
            finished,
            _thread: thread,
        }
    }

    /// The thread exited, either after a fault or after cancellation.
    pub(crate) fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }
}

impl Drop for Watcher {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
