use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const HTTP_ADDR_VAR: &str = "ROSTER_TOOL_HTTP_ADDR";
pub const SCHEDULES_DIR_VAR: &str = "ROSTER_TOOL_SCHEDULES_DIR";
pub const HEATMAPS_DIR_VAR: &str = "ROSTER_TOOL_HEATMAPS_DIR";
pub const ROSTER_DB_VAR: &str = "ROSTER_TOOL_ROSTER_DB";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub http_addr: SocketAddr,
    pub schedules_dir: PathBuf,
    pub heatmaps_dir: PathBuf,
    /// SQLite file the HTTP server keeps the session roster in, if any.
    pub roster_db: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    InvalidAddr { value: String, message: String },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::InvalidAddr { value, message } => {
                write!(f, "{HTTP_ADDR_VAR}='{value}' is not a socket address: {message}")
            }
        }
    }
}

impl std::error::Error for SettingsError {}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let addr = non_empty(HTTP_ADDR_VAR).unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let http_addr = addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|err: std::net::AddrParseError| SettingsError::InvalidAddr {
                value: addr.clone(),
                message: err.to_string(),
            })?;

        Ok(Self {
            http_addr,
            schedules_dir: non_empty(SCHEDULES_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("schedules")),
            heatmaps_dir: non_empty(HEATMAPS_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("heatmaps")),
            roster_db: non_empty(ROSTER_DB_VAR).map(PathBuf::from),
        })
    }
}
