//! Configuration and logging for theme detector apps.
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use app_dirs2::{get_app_dir, get_app_root, AppDataType, AppInfo};
use flexi_logger::{Age, Cleanup, Criterion, FileSpec, Naming};
use log::info;
use theme_detector::DetectorConfig;

/// Detector tuning file in the user config directory.
pub const CONFIG_FILE: &str = "theme-detector.json";

/// Application information.
pub const APP_INFO: AppInfo = AppInfo {
    name: "Theme Detector",
    author: "Somebody",
};

fn config_dir() -> anyhow::Result<PathBuf> {
    get_app_root(AppDataType::UserConfig, &APP_INFO).context("No app root")
}

/// Save the detector configuration.
pub fn save_config(config: &DetectorConfig) -> anyhow::Result<()> {
    save_config_to(&config_dir()?, config)
}

/// Save the detector configuration into `dir`.
pub fn save_config_to(dir: &Path, config: &DetectorConfig) -> anyhow::Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }

    let config_path = dir.join(CONFIG_FILE);
    std::fs::write(&config_path, serde_json::to_vec_pretty(config)?)?;
    info!("Wrote to config file: {config_path:?}");

    Ok(())
}

/// Load the detector configuration.
pub fn load_config() -> anyhow::Result<DetectorConfig> {
    load_config_from(&config_dir()?)
}

/// Load the detector configuration from `dir`.
pub fn load_config_from(dir: &Path) -> anyhow::Result<DetectorConfig> {
    let config_path = dir.join(CONFIG_FILE);
    let content = std::fs::read(&config_path)
        .with_context(|| format!("Failed to read {config_path:?}"))?;
    let config = serde_json::from_slice(&content)
        .with_context(|| format!("Invalid config file {config_path:?}"))?;

    Ok(config)
}

/// Get the shared log directory.
pub fn log_dir() -> anyhow::Result<PathBuf> {
    get_app_dir(AppDataType::UserData, &APP_INFO, "logs")
        .context("Failed to get app logs directory")
}

pub fn init_logger() -> anyhow::Result<()> {
    let _logger = flexi_logger::Logger::try_with_env_or_str("info")?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir()?)
                .basename("theme-detector"),
        )
        .rotate(
            Criterion::Age(Age::Day),
            Naming::Timestamps,
            Cleanup::KeepLogFiles(5),
        )
        .print_message()
        .start()?;
    Ok(())
}
