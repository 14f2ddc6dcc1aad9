//! Destination string parsing
//!
//! A destination ("DSN") selects where run events go:
//! - `file:///abs/path.json` or a bare path - JSON array written at end of run
//! - `http://...` / `https://...` - one POST per event

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use url::Url;

/// Name of the variable operators set the destination through
pub const DSN_ENV_VAR: &str = "TESTINEL_DSN";

/// A resolved destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Destination {
    /// Write all events to a local file
    File { path: PathBuf },
    /// POST each event to an HTTP endpoint
    Http { url: String },
}

impl Destination {
    pub fn kind(&self) -> &'static str {
        match self {
            Destination::File { .. } => "file",
            Destination::Http { .. } => "http",
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::File { path } => write!(f, "file {}", path.display()),
            Destination::Http { url } => write!(f, "http {}", url),
        }
    }
}

/// Configuration errors raised while resolving a destination
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DestinationError {
    #[error("TESTINEL_DSN is empty")]
    Empty,

    #[error("TESTINEL_DSN file destination must not have a host component (got '{host}')")]
    FileHost { host: String },

    #[error("Unsupported TESTINEL_DSN scheme: '{scheme}'")]
    UnsupportedScheme { scheme: String },

    #[error("Malformed TESTINEL_DSN '{dsn}': {reason}")]
    Malformed { dsn: String, reason: String },
}

/// Parse a destination string into a [`Destination`]
///
/// Surrounding whitespace is ignored; the trimmed string is what gets stored.
pub fn parse(dsn: &str) -> Result<Destination, DestinationError> {
    let dsn = dsn.trim();
    if dsn.is_empty() {
        return Err(DestinationError::Empty);
    }

    let Some(scheme) = scheme_of(dsn) else {
        return Ok(Destination::File { path: PathBuf::from(dsn) });
    };

    match scheme.as_str() {
        "file" => parse_file_url(dsn),
        "http" | "https" => {
            let url = parse_url(dsn)?;
            if url.host_str().is_none_or(str::is_empty) {
                return Err(malformed(dsn, "missing host"));
            }
            Ok(Destination::Http { url: dsn.to_string() })
        }
        _ => Err(DestinationError::UnsupportedScheme { scheme }),
    }
}

/// Lowercased scheme if the string starts with `scheme://`
fn scheme_of(dsn: &str) -> Option<String> {
    let (scheme, _) = dsn.split_once("://")?;
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        return None;
    }
    Some(scheme.to_ascii_lowercase())
}

fn parse_file_url(dsn: &str) -> Result<Destination, DestinationError> {
    // Url normalizes `localhost` away, so check the authority as written
    let (_, rest) = dsn.split_once("://").unwrap_or(("", dsn));
    let authority = rest.split('/').next().unwrap_or_default();
    if !authority.is_empty() {
        return Err(DestinationError::FileHost {
            host: authority.to_string(),
        });
    }

    let url = parse_url(dsn)?;

    if let Some(host) = url.host_str()
        && !host.is_empty()
    {
        return Err(DestinationError::FileHost { host: host.to_string() });
    }

    let path = url
        .to_file_path()
        .map_err(|_| malformed(dsn, "path is not a valid local file path"))?;
    Ok(Destination::File { path })
}

fn parse_url(dsn: &str) -> Result<Url, DestinationError> {
    Url::parse(dsn).map_err(|e| malformed(dsn, &e.to_string()))
}

fn malformed(dsn: &str, reason: &str) -> DestinationError {
    DestinationError::Malformed {
        dsn: dsn.to_string(),
        reason: reason.to_string(),
    }
}
