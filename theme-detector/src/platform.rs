//! Identify the OS and desktop environment.
use crate::{CommandRunner, SystemRunner};
use log::{debug, warn};
use std::{cmp::Ordering, env};

/// The detector variants, one per supported OS or desktop.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Variant {
    Windows,
    MacOs,
    Gnome,
    Kde,
    Lxde,
    GenericLinux,
    /// Nothing supported, the detector always reports a light theme.
    Unsupported,
}

/// What is known about the running platform.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct PlatformFacts {
    pub windows_10_or_later: bool,
    pub macos_mojave_or_later: bool,
    pub linux: bool,
    pub gnome: bool,
    pub kde: bool,
    pub lxde: bool,
}

impl PlatformFacts {
    /// Inspect the running system.
    pub fn detect() -> Self {
        let os = env::consts::OS;
        let facts = Self::from_env(os, |name| env::var(name).ok());

        let facts = Self {
            windows_10_or_later: os == "windows" && windows_10_or_later(),
            macos_mojave_or_later: os == "macos" && macos_mojave_or_later(&SystemRunner),
            ..facts
        };
        debug!("Platform facts: {facts:?}");
        facts
    }

    /// Desktop facts from the OS name and environment variables.
    pub fn from_env(os: &str, var: impl Fn(&str) -> Option<String>) -> Self {
        let linux = os == "linux";
        let contains = |name: &str, needle: &str| {
            var(name).is_some_and(|value| value.to_lowercase().contains(needle))
        };
        let desktop = |needle: &str| {
            linux && (contains("XDG_CURRENT_DESKTOP", needle) || contains("XDG_DATA_DIRS", needle))
        };

        Self {
            linux,
            gnome: desktop("gnome"),
            lxde: desktop("lxde"),
            kde: linux
                && (contains("XDG_CURRENT_DESKTOP", "kde")
                    || var("KDE_FULL_SESSION").as_deref() == Some("true")),
            ..Self::default()
        }
    }

    /// Pick the variant. Order matters: a KDE session often has GNOME
    /// directories in `XDG_DATA_DIRS` too.
    pub fn variant(&self) -> Variant {
        if self.windows_10_or_later {
            Variant::Windows
        } else if self.kde {
            Variant::Kde
        } else if self.lxde {
            Variant::Lxde
        } else if self.gnome {
            Variant::Gnome
        } else if self.linux {
            Variant::GenericLinux
        } else if self.macos_mojave_or_later {
            Variant::MacOs
        } else {
            Variant::Unsupported
        }
    }
}

#[cfg(target_os = "windows")]
fn windows_10_or_later() -> bool {
    crate::registry::windows_10_or_later()
}

#[cfg(not(target_os = "windows"))]
fn windows_10_or_later() -> bool {
    false
}

fn macos_mojave_or_later(runner: &dyn CommandRunner) -> bool {
    match runner.output(&["sw_vers", "-productVersion"]) {
        Ok(version) => version_at_least(version.trim(), "10.14"),
        Err(err) => {
            warn!("Could not read the macOS version: {err}");
            false
        }
    }
}

/// Compare dotted numeric versions, missing parts count as zero.
pub(crate) fn version_at_least(version: &str, minimum: &str) -> bool {
    let parts = |v: &str| {
        v.split('.')
            .map(|part| part.trim().parse::<u32>().unwrap_or(0))
            .collect::<Vec<_>>()
    };
    let (version, minimum) = (parts(version), parts(minimum));
    let len = version.len().max(minimum.len());

    let ordering = (0..len)
        .map(|i| {
            let a = version.get(i).copied().unwrap_or(0);
            let b = minimum.get(i).copied().unwrap_or(0);
            a.cmp(&b)
        })
        .find(|ordering| *ordering != Ordering::Equal)
        .unwrap_or(Ordering::Equal);

    ordering != Ordering::Less
}
