//! Server configuration parsed from environment variables.

use crate::roster::DEFAULT_ROSTER_LIMIT;
use crate::settings::DEFAULT_MAX_LOGO_BYTES;

pub const DEFAULT_PORT: u16 = 3000;

/// Extra room above the largest logo for the rest of a settings event.
const MESSAGE_OVERHEAD_BYTES: usize = 16 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    /// Names kept per school roster.
    pub roster_limit: usize,
    /// Max length of an encoded logo data URI.
    pub max_logo_bytes: usize,
    /// Schools created at startup.
    pub seed_schools: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            roster_limit: DEFAULT_ROSTER_LIMIT,
            max_logo_bytes: DEFAULT_MAX_LOGO_BYTES,
            seed_schools: Vec::new(),
        }
    }
}

impl Config {
    /// Build config from the process environment.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `ROLLCALL_ROSTER_LIMIT`: default 12, at least 1
    /// - `ROLLCALL_MAX_LOGO_BYTES`: default 2 MiB
    /// - `ROLLCALL_SCHOOLS`: comma-separated school names to create
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = parse_or("PORT", lookup("PORT"), DEFAULT_PORT)?;
        let roster_limit = parse_or("ROLLCALL_ROSTER_LIMIT", lookup("ROLLCALL_ROSTER_LIMIT"), DEFAULT_ROSTER_LIMIT)?;
        if roster_limit == 0 {
            return Err(ConfigError::Invalid { var: "ROLLCALL_ROSTER_LIMIT", value: "0".into() });
        }
        let max_logo_bytes =
            parse_or("ROLLCALL_MAX_LOGO_BYTES", lookup("ROLLCALL_MAX_LOGO_BYTES"), DEFAULT_MAX_LOGO_BYTES)?;
        let seed_schools = lookup("ROLLCALL_SCHOOLS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self { port, roster_limit, max_logo_bytes, seed_schools })
    }

    /// Largest inbound WebSocket message the server accepts.
    #[must_use]
    pub fn max_message_bytes(&self) -> usize {
        self.max_logo_bytes.saturating_add(MESSAGE_OVERHEAD_BYTES)
    }
}

fn parse_or<T: std::str::FromStr>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid { var, value }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
