// ⚙️ Runtime configuration (environment variables)

use std::env;
use std::path::PathBuf;

pub const ENV_LOG_JSON: &str = "CLINIC_LOG_JSON";
pub const ENV_CSV_PATH: &str = "CLINIC_CSV_PATH";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Emit log lines as JSON instead of plain text
    pub log_json: bool,

    /// Seed the registry from this CSV instead of the sample clinics
    pub csv_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup (keeps tests off the process environment)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        AppConfig {
            log_json: lookup(ENV_LOG_JSON).map(|v| parse_bool(&v)).unwrap_or(false),
            csv_path: lookup(ENV_CSV_PATH)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
