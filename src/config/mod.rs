use crate::error::{LogtailError, Result};
use crate::logs::validate_services;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Environment variable overriding the log directory
pub const ENV_LOG_DIR: &str = "LOGTAIL_LOG_DIR";

/// Environment variable overriding the bind address
pub const ENV_BIND_ADDRESS: &str = "LOGTAIL_BIND_ADDRESS";

/// Environment variable with allowed CORS origins (JSON list or comma-separated)
pub const ENV_CORS_ORIGINS: &str = "CORS_ORIGINS";

/// Service configuration: where logs live, which services exist, how to serve them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Directory holding every managed log file
    pub log_dir: PathBuf,

    /// Address the HTTP server binds to
    pub bind_address: String,

    /// Origins allowed by the CORS layer
    pub cors_origins: Vec<String>,

    /// Service identifier -> log file name inside `log_dir`
    pub services: BTreeMap<String, String>,

    /// Default tracing filter when RUST_LOG is not set
    pub log_level: String,
}

// Default values
fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_bind_address() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

fn default_services() -> BTreeMap<String, String> {
    ["backend", "frontend", "dashboard", "streamlit"]
        .into_iter()
        .map(|id| (id.to_string(), format!("{}.log", id)))
        .collect()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            bind_address: default_bind_address(),
            cors_origins: default_cors_origins(),
            services: default_services(),
            log_level: default_log_level(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration: defaults or the given file, then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::read_file(path, env_lookup)?,
            None => Self::default(),
        };

        config.apply_env_overrides(env_lookup);
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a file (supports TOML and JSON)
    pub fn from_file(path: &Path) -> Result<Self> {
        let config = Self::read_file(path, env_lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a config file, expanding variables in `log_dir` via `lookup`
    fn read_file<F>(path: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| LogtailError::ConfigError(format!("Failed to read config file: {}", e)))?;

        // Determine format based on file extension
        let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");

        let mut config = match extension {
            "toml" => Self::parse_toml(&contents)?,
            "json" => Self::parse_json(&contents)?,
            _ => {
                return Err(LogtailError::InvalidConfig(format!(
                    "Unsupported file format: {}. Use .toml or .json",
                    extension
                )))
            }
        };

        config.log_dir = expand_env_in_path(&config.log_dir, &lookup);

        Ok(config)
    }

    /// Parse TOML configuration
    fn parse_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| LogtailError::InvalidConfig(format!("Failed to parse TOML: {}", e)))
    }

    /// Parse JSON configuration
    fn parse_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents)
            .map_err(|e| LogtailError::InvalidConfig(format!("Failed to parse JSON: {}", e)))
    }

    /// Apply overrides from the environment, looked up through `lookup`
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_LOG_DIR).filter(|v| !v.trim().is_empty()) {
            self.log_dir = PathBuf::from(dir.trim());
        }

        if let Some(addr) = lookup(ENV_BIND_ADDRESS).filter(|v| !v.trim().is_empty()) {
            self.bind_address = addr.trim().to_string();
        }

        if let Some(raw) = lookup(ENV_CORS_ORIGINS) {
            self.cors_origins = parse_cors_origins(&raw);
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.log_dir.as_os_str().is_empty() {
            return Err(LogtailError::MissingConfigField("log_dir".to_string()));
        }

        if self.services.is_empty() {
            return Err(LogtailError::MissingConfigField("services".to_string()));
        }

        validate_services(
            self.services
                .iter()
                .map(|(id, file)| (id.as_str(), file.as_str())),
        )?;

        self.socket_addr()?;

        Ok(())
    }

    /// Parse the bind address
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_address.parse().map_err(|e| {
            LogtailError::ConfigValidationError(format!(
                "Invalid bind_address '{}': {}",
                self.bind_address, e
            ))
        })
    }
}

/// Parse allowed CORS origins from a JSON list or a comma-separated string
///
/// Falls back to the default origin when nothing usable is given.
pub fn parse_cors_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = match serde_json::from_str::<Vec<String>>(raw) {
        Ok(list) => list,
        Err(_) => raw.split(',').map(|s| s.to_string()).collect(),
    };

    let origins: Vec<String> = origins
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if origins.is_empty() {
        default_cors_origins()
    } else {
        origins
    }
}

/// Look up a variable in the process environment
fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Expand `$VAR` and `${VAR}` references in a string
///
/// Each reference is parsed as a whole token, so `$HOME` never matches the
/// front of `$HOMEDIR`. Unknown or malformed references are left as written.
fn expand_env_in_string<F>(s: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(dollar) = rest.find('$') {
        result.push_str(&rest[..dollar]);
        let after = &rest[dollar + 1..];

        let (name, token_len) = if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => ("", 0),
            }
        } else {
            let end = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            (&after[..end], end)
        };

        let token = &rest[dollar..dollar + 1 + token_len];
        match (!name.is_empty()).then(|| lookup(name)).flatten() {
            Some(value) => result.push_str(&value),
            None => result.push_str(token),
        }
        rest = &rest[dollar + 1 + token_len..];
    }

    result.push_str(rest);
    result
}

/// Expand environment variables in a path
fn expand_env_in_path<F>(path: &Path, lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    let path_str = path.to_string_lossy();
    PathBuf::from(expand_env_in_string(&path_str, lookup))
}
