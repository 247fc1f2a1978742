use std::{env, path::PathBuf};

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// TCP port serving both the health probe and the WebSocket upgrade
    pub port: u16,
    /// Path of the persisted partition state
    pub state_file: PathBuf,
    /// Directory receiving the per-block CSV series
    pub output_dir: PathBuf,
    /// Accumulation window length in seconds
    pub window_secs: u64,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl RuntimeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var("PORT") {
            Ok(raw) => parse_port(&raw)?,
            Err(_) => 3000,
        };

        let state_file = env::var("STATE_FILE")
            .unwrap_or_else(|_| "state.json".to_string())
            .into();

        let output_dir = env::var("OUTPUT_DIR")
            .unwrap_or_else(|_| ".".to_string())
            .into();

        let window_secs = match env::var("WINDOW_SECS") {
            Ok(raw) => parse_window_secs(&raw)?,
            Err(_) => 3600,
        };

        Ok(Self {
            port,
            state_file,
            output_dir,
            window_secs,
        })
    }
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    raw.parse::<u16>().map_err(|_| {
        ConfigError::InvalidValue(format!("PORT must be a valid TCP port, got '{}'", raw))
    })
}

fn parse_window_secs(raw: &str) -> Result<u64, ConfigError> {
    let secs = raw.parse::<u64>().map_err(|_| {
        ConfigError::InvalidValue(format!("WINDOW_SECS must be an integer, got '{}'", raw))
    })?;

    if secs == 0 {
        return Err(ConfigError::InvalidValue(
            "WINDOW_SECS must be greater than zero".to_string(),
        ));
    }

    Ok(secs)
}
