//! Configuration management for the authentication service.
//!
//! This module handles loading and validating configuration values from
//! environment variables and `.env` files. All required settings are read
//! once at process startup into an immutable [`Config`] that is passed
//! explicitly to the components that need it; nothing reads the environment
//! at request time.
//!
//! Validation is fail-fast: a missing or malformed required value produces a
//! [`ConfigError`] before the server accepts its first request. This covers
//! the secret material in particular - the AES key and IV must be hex strings
//! of exactly 32 and 16 bytes.

use std::{env, fmt, path::Path, str::FromStr};

use crate::crypto;

/// Default HTTP port when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 5001;

/// Error raised for missing or malformed configuration values.
///
/// Fatal at startup; also returned by the state-token encryptor when it is
/// handed key material that does not satisfy the length/encoding contract.
#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid {
        name: &'static str,
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(name) => write!(f, "missing required setting {name}"),
            ConfigError::Invalid { name, reason } => {
                write!(f, "invalid setting {name}: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Execution mode of the service, controlling the browser launch profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Development,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "production" => Ok(Environment::Production),
            "development" => Ok(Environment::Development),
            other => Err(ConfigError::Invalid {
                name: "ENVIRONMENT",
                reason: format!("expected 'production' or 'development', got '{other}'"),
            }),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Production => write!(f, "production"),
            Environment::Development => write!(f, "development"),
        }
    }
}

/// Registration and account data for one provider.
#[derive(Clone)]
pub struct ProviderAccount {
    /// Client/app identifier from the provider's developer dashboard.
    pub client_id: String,
    /// Redirect URI registered with the provider.
    pub redirect_uri: String,
    /// Email of the account whose login the service automates.
    pub email: String,
    /// Password of that account.
    pub password: String,
}

impl fmt::Debug for ProviderAccount {
    // Credentials never reach logs, not even through {:?}.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderAccount")
            .field("client_id", &self.client_id)
            .field("redirect_uri", &self.redirect_uri)
            .field("email", &"<redacted>")
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Immutable process configuration, validated once at startup.
#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub environment: Environment,
    /// Hex-encoded 32-byte AES key; also the password of the HTTP access gate.
    pub secret_key: String,
    /// Hex-encoded 16-byte AES initialization vector.
    pub initialization_vector: String,
    /// Browser binary for development mode; production resolves its own.
    pub browser_executable_path: Option<String>,
    pub spotify: ProviderAccount,
    pub deezer: ProviderAccount,
}

impl Config {
    /// Reads and validates the full configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a required variable is absent or empty,
    /// when `PORT` is not a number, when `ENVIRONMENT` is not a known mode,
    /// or when the secret key / IV are not hex of the required byte length.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var("PORT") {
            Ok(value) => value.parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                reason: format!("'{value}' is not a valid port number"),
            })?,
            Err(_) => DEFAULT_PORT,
        };

        let environment: Environment = require("ENVIRONMENT")?.parse()?;

        let secret_key = require("SECRET_KEY")?;
        crypto::decode_secret_key(&secret_key)?;
        let initialization_vector = require("INITIALIZATION_VECTOR")?;
        crypto::decode_initialization_vector(&initialization_vector)?;

        let spotify = ProviderAccount {
            client_id: require("SPOTIFY_CLIENT_ID")?,
            redirect_uri: require("SPOTIFY_AUTH_REDIRECT_URI")?,
            email: require("SPOTIFY_AUTH_EMAIL")?,
            password: require("SPOTIFY_AUTH_PASSWORD")?,
        };

        let deezer = ProviderAccount {
            client_id: require("DEEZER_APP_ID")?,
            redirect_uri: require("DEEZER_AUTH_REDIRECT_URI")?,
            email: require("DEEZER_AUTH_EMAIL")?,
            password: require("DEEZER_AUTH_PASSWORD")?,
        };

        Ok(Config {
            port,
            environment,
            secret_key,
            initialization_vector,
            browser_executable_path: env::var("BROWSER_EXECUTABLE_PATH")
                .ok()
                .filter(|path| !path.is_empty()),
            spotify,
            deezer,
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

/// Loads environment variables from a `.env` file.
///
/// With an explicit path the file must exist and parse; without one, a
/// missing `./.env` is fine - the process environment may already carry
/// everything needed.
pub fn load_env(path: Option<&Path>) -> Result<(), String> {
    match path {
        Some(path) => {
            dotenv::from_path(path).map_err(|e| format!("{}: {}", path.display(), e))
        }
        None => {
            let _ = dotenv::dotenv();
            Ok(())
        }
    }
}
