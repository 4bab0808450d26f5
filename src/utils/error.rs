//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while parsing an analyzer violation description
///
/// A parse error only ever affects the single violation being parsed;
/// callers log it and continue with the rest of the batch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Missing '::' separator in description: {0}")]
    MissingSeparator(String),

    #[error("Malformed metric pair '{0}', expected <id>=<value>")]
    MalformedPair(String),

    #[error("Invalid numeric value '{value}' for metric {metric}")]
    InvalidNumber { metric: String, value: String },
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Errors that can occur while loading the TOML configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFailed(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseFailed(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
