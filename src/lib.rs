//! Tunegate Service Library
//!
//! This library implements an HTTP service that completes OAuth-style
//! authorizations for music-streaming providers by driving an automated
//! browser session through the provider's hosted login form. It includes
//! modules for the HTTP API, configuration management, the browser session
//! layer, and the authentication flow itself.
//!
//! # Modules
//!
//! - `api` - HTTP API endpoints served by the authentication server
//! - `browser` - Automated browser sessions and launch profiles
//! - `config` - Configuration management and environment variables
//! - `crypto` - State-token encryption for authorization URLs
//! - `flow` - The scripted login flow driven against a provider
//! - `providers` - Static descriptors for the supported providers
//! - `server` - HTTP server, routing and access gate
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers

pub mod api;
pub mod browser;
pub mod config;
pub mod crypto;
pub mod flow;
pub mod providers;
pub mod server;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Provides a standard error handling pattern throughout the application
/// using a boxed dynamic error trait object. This allows for flexible
/// error handling while maintaining Send + Sync bounds for async contexts.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Navigated to {}...", url);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Authentication completed successfully");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Used for unrecoverable startup errors only; failures inside a running
/// authentication attempt are reported through the attempt's result and
/// logged with `warning!` instead.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("Failed to close browser session: {}", e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
