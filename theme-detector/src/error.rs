use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("Failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },
    #[error("Monitoring process {0} exited")]
    MonitorExited(String),
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
    #[error("File watch error: {0}")]
    Watch(#[from] notify::Error),
    #[cfg(target_os = "windows")]
    #[error("Registry error: {0}")]
    Registry(#[from] windows::core::Error),
    #[error("Failed to query the OS: {0}")]
    Query(String),
    #[error("No home directory")]
    NoHomeDir,
}
