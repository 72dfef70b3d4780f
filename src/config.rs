use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "PatientRecords";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// File name of the SQLite database inside the data directory.
pub const DB_FILE_NAME: &str = "patients.db";

/// Address the API binds to when `PATIENT_RECORDS_ADDR` is unset.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

const ENV_DB_PATH: &str = "PATIENT_RECORDS_DB";
const ENV_BIND_ADDR: &str = "PATIENT_RECORDS_ADDR";
const ENV_EMAIL_DOMAINS: &str = "PATIENT_RECORDS_EMAIL_DOMAINS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot determine home directory")]
    NoHomeDir,
    #[error("Invalid bind address {value:?}: {reason}")]
    InvalidAddr { value: String, reason: String },
}

/// Default filter for the tracing subscriber when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "patient_records_lib=info,tower_http=warn"
}

/// Get the application data directory
/// ~/PatientRecords/ on all platforms
pub fn app_data_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(APP_NAME))
}

/// Runtime settings for the service, resolved once at startup.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub db_path: PathBuf,
    pub bind_addr: SocketAddr,
    /// Lowercased mail domains accepted for `contact_email`. Empty = any domain.
    pub allowed_email_domains: Vec<String>,
}

impl ServiceConfig {
    /// Build the config from the process environment, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let db_path = match std::env::var(ENV_DB_PATH) {
            Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => app_data_dir()?.join(DB_FILE_NAME),
        };

        let raw_addr =
            std::env::var(ENV_BIND_ADDR).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = parse_bind_addr(&raw_addr)?;

        let allowed_email_domains = std::env::var(ENV_EMAIL_DOMAINS)
            .map(|raw| parse_domain_list(&raw))
            .unwrap_or_default();

        Ok(Self {
            db_path,
            bind_addr,
            allowed_email_domains,
        })
    }

    /// Config pointing at an explicit database file, other settings defaulted.
    pub fn with_db_path(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            allowed_email_domains: Vec::new(),
        }
    }
}

fn parse_bind_addr(raw: &str) -> Result<SocketAddr, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|e: std::net::AddrParseError| ConfigError::InvalidAddr {
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

/// Split a comma-separated domain list, dropping blanks and a leading `@`.
fn parse_domain_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|d| d.trim().trim_start_matches('@').to_lowercase())
        .filter(|d| !d.is_empty())
        .collect()
}
