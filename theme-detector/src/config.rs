use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Detector tuning.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DetectorConfig {
    /// Delay between two KDE color scheme reads.
    pub kde_poll_interval_ms: u64,
    /// How often a watcher blocked on an OS primitive checks for cancellation.
    pub wait_interval_ms: u64,
    /// Program used to read `kdeglobals`.
    pub kde_read_config: String,
    /// Directory holding the LXDE `desktop.conf`.
    pub lxde_config_dir: Option<PathBuf>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            kde_poll_interval_ms: 1_000,
            wait_interval_ms: 500,
            kde_read_config: "kreadconfig5".into(),
            lxde_config_dir: None,
        }
    }
}

impl DetectorConfig {
    pub fn kde_poll_interval(&self) -> Duration {
        Duration::from_millis(self.kde_poll_interval_ms)
    }

    pub fn wait_interval(&self) -> Duration {
        Duration::from_millis(self.wait_interval_ms.max(1))
    }
}
