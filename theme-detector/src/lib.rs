//! Detect whether the operating system uses a dark theme and get notified
//! when that changes.
//!
//! ```no_run
//! use std::sync::Arc;
//! use theme_detector::{Listener, ThemeDetector};
//!
//! let detector = ThemeDetector::get();
//! println!("dark: {}", detector.query_state());
//!
//! let listener: Listener = Arc::new(|dark| println!("dark: {dark}"));
//! detector.register_listener(listener.clone());
//! // ...
//! detector.remove_listener(&listener);
//! ```
pub mod classify;
mod config;
mod detector;
mod error;
mod linux;
mod listeners;
mod platform;
mod process;
mod stream;
mod watcher;

#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "windows")]
mod registry;

#[cfg(test)]
mod testing;

pub use config::DetectorConfig;
pub use detector::ThemeDetector;
pub use error::DetectorError;
pub use listeners::{Listener, ListenerSet};
pub use platform::{PlatformFacts, Variant};
pub use process::{CommandRunner, MonitorProcess, SystemRunner};
pub use stream::ThemeChanges;

/// The system theme.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Theme {
    /// Dark mode enabled
    Dark,
    /// Light mode enabled
    Light,
}

impl Theme {
    /// `true` for [`Theme::Dark`].
    pub fn is_dark(self) -> bool {
        matches!(self, Theme::Dark)
    }
}

impl From<bool> for Theme {
    fn from(dark: bool) -> Self {
        if dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}
