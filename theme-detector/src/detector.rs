//! The detector facade and the platform backends behind it.
use crate::{
    linux::{GenericLinux, Gnome, Kde, Lxde},
    watcher::{WatchContext, Watcher},
    DetectorConfig, DetectorError, Listener, ListenerSet, PlatformFacts, SystemRunner, Theme,
    ThemeChanges, Variant,
};
use log::{debug, error, info, warn};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

/// One backend per supported platform, picked once at startup.
pub(crate) enum Backend {
    #[cfg(target_os = "windows")]
    Windows(crate::registry::Windows),
    #[cfg(target_os = "macos")]
    MacOs(crate::macos::MacOs),
    Gnome(Gnome),
    Kde(Kde),
    Lxde(Lxde),
    GenericLinux(GenericLinux),
    Unsupported,
}

impl Backend {
    pub(crate) fn new(variant: Variant, config: &DetectorConfig) -> Self {
        let runner = Arc::new(SystemRunner);
        match variant {
            #[cfg(target_os = "windows")]
            Variant::Windows => Backend::Windows(crate::registry::Windows::new(config.wait_interval())),
            #[cfg(target_os = "macos")]
            Variant::MacOs => Backend::MacOs(crate::macos::MacOs::new(config.wait_interval())),
            Variant::Gnome => Backend::Gnome(Gnome::new(runner)),
            Variant::Kde => Backend::Kde(Kde::new(
                runner,
                config.kde_read_config.clone(),
                config.kde_poll_interval(),
            )),
            Variant::Lxde => Backend::Lxde(Lxde::new(
                config.lxde_config_dir.clone(),
                config.wait_interval(),
            )),
            Variant::GenericLinux => Backend::GenericLinux(GenericLinux::new(runner)),
            _ => Backend::Unsupported,
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            #[cfg(target_os = "windows")]
            Backend::Windows(_) => "Windows",
            #[cfg(target_os = "macos")]
            Backend::MacOs(_) => "macOS",
            Backend::Gnome(_) => "GNOME",
            Backend::Kde(_) => "KDE",
            Backend::Lxde(_) => "LXDE",
            Backend::GenericLinux(_) => "Linux",
            Backend::Unsupported => "Unsupported",
        }
    }

    fn is_supported(&self) -> bool {
        !matches!(self, Backend::Unsupported)
    }

    fn query(&self) -> Result<bool, DetectorError> {
        match self {
            #[cfg(target_os = "windows")]
            Backend::Windows(windows) => windows.query(),
            #[cfg(target_os = "macos")]
            Backend::MacOs(macos) => macos.query(),
            Backend::Gnome(gnome) => gnome.query(),
            Backend::Kde(kde) => kde.query(),
            Backend::Lxde(lxde) => lxde.query(),
            Backend::GenericLinux(linux) => linux.query(),
            Backend::Unsupported => Ok(false),
        }
    }

    /// Query, logging a failure as a light theme.
    pub(crate) fn query_state(&self) -> bool {
        self.query().unwrap_or_else(|err| {
            error!("Couldn't detect {} OS theme: {err}", self.name());
            false
        })
    }

    /// Block on the platform change notification until cancelled.
    pub(crate) fn watch(&self, ctx: &mut WatchContext) -> Result<(), DetectorError> {
        match self {
            #[cfg(target_os = "windows")]
            Backend::Windows(windows) => windows.watch(ctx),
            #[cfg(target_os = "macos")]
            Backend::MacOs(macos) => macos.watch(ctx),
            Backend::Gnome(gnome) => gnome.watch(ctx),
            Backend::Kde(kde) => kde.watch(ctx),
            Backend::Lxde(lxde) => lxde.watch(ctx),
            Backend::GenericLinux(linux) => linux.watch(ctx),
            Backend::Unsupported => Ok(()),
        }
    }
}

static FACTS: OnceLock<PlatformFacts> = OnceLock::new();
static DETECTOR: OnceLock<ThemeDetector> = OnceLock::new();

fn facts() -> &'static PlatformFacts {
    FACTS.get_or_init(PlatformFacts::detect)
}

/// Detects the OS dark theme and notifies listeners when it changes.
///
/// A background watcher runs only while at least one listener is
/// registered.
pub struct ThemeDetector {
    backend: Arc<Backend>,
    listeners: Arc<ListenerSet>,
    watcher: Mutex<Option<Watcher>>,
}

impl ThemeDetector {
    /// The process wide detector, created with the default configuration on
    /// first use.
    pub fn get() -> &'static ThemeDetector {
        Self::init(DetectorConfig::default())
    }

    /// The process wide detector, created with `config` unless it already
    /// exists.
    pub fn init(config: DetectorConfig) -> &'static ThemeDetector {
        let mut created = false;
        let detector = DETECTOR.get_or_init(|| {
            created = true;
            Self::new(facts().variant(), &config)
        });
        if !created {
            debug!("Theme detector already initialized, ignoring config");
        }
        detector
    }

    /// Create a standalone detector for `variant`.
    pub fn new(variant: Variant, config: &DetectorConfig) -> Self {
        match variant {
            Variant::Unsupported => debug!(
                "Theme detection is not supported on {} {}",
                std::env::consts::OS,
                std::env::consts::ARCH
            ),
            variant => debug!("Supported desktop detected: {variant:?}"),
        }
        Self::with_backend(Backend::new(variant, config))
    }

    pub(crate) fn with_backend(backend: Backend) -> Self {
        Self {
            backend: Arc::new(backend),
            listeners: Arc::new(ListenerSet::new()),
            watcher: Mutex::new(None),
        }
    }

    /// Whether this OS and desktop have a detector.
    pub fn is_supported() -> bool {
        facts().variant() != Variant::Unsupported
    }

    /// Name of the active backend.
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Read the current OS theme. Failures are logged and reported as light.
    pub fn query_state(&self) -> bool {
        self.backend.query_state()
    }

    pub fn theme(&self) -> Theme {
        self.query_state().into()
    }

    /// Register a listener, starting the watcher if none is running.
    pub fn register_listener(&self, listener: Listener) {
        if !self.backend.is_supported() {
            return;
        }

        let mut watcher = self.watcher.lock().unwrap_or_else(PoisonError::into_inner);
        self.listeners.add(listener);

        let running = watcher.as_ref().is_some_and(|w| !w.is_finished());
        if !running {
            if watcher.is_some() {
                warn!("{} watcher has terminated, restarting", self.backend.name());
            }
            *watcher = Some(Watcher::start(self.backend.clone(), self.listeners.clone()));
        }
    }

    /// Remove a listener, stopping the watcher once none are left.
    pub fn remove_listener(&self, listener: &Listener) {
        if !self.backend.is_supported() {
            return;
        }

        let mut watcher = self.watcher.lock().unwrap_or_else(PoisonError::into_inner);
        self.listeners.remove(listener);

        if self.listeners.is_empty() {
            if let Some(stopped) = watcher.take() {
                info!("Stopping {} theme detector", self.backend.name());
                drop(stopped);
            }
        }
    }

    /// Stream of theme changes. Dropping it removes the listener.
    pub fn subscribe(&self) -> ThemeChanges<'_> {
        ThemeChanges::new(self)
    }

    /// A watcher thread is currently running.
    pub fn is_watching(&self) -> bool {
        self.watcher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|watcher| !watcher.is_finished())
    }

    #[cfg(test)]
    pub(crate) fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
