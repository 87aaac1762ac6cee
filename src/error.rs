/*
 * The contents of this file are subject to the terms of the
 * Common Development and Distribution License, Version 1.0 only
 * (the "License").  You may not use this file except in compliance
 * with the License.
 *
 * See the file LICENSE in this distribution for details.
 * A copy of the CDDL is also available via the Internet at
 * http://www.opensource.org/licenses/cddl1.txt
 *
 * When distributing Covered Code, include this CDDL HEADER in each
 * file and include the contents of the LICENSE file from this
 * distribution.
 */

// vidroute
// - error.rs file -

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Serializable tag of a failure. Callers switch on this, not on the error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    UnsupportedPlatform,
    ExtractionFailed,
    TransportFailure,
    MalformedRemoteResponse,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UnsupportedPlatform => "UnsupportedPlatform",
            Self::ExtractionFailed => "ExtractionFailed",
            Self::TransportFailure => "TransportFailure",
            Self::MalformedRemoteResponse => "MalformedRemoteResponse",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("unsupported video platform: {0}")]
    UnsupportedPlatform(String),

    #[error("{platform}: {reason}")]
    ExtractionFailed {
        platform: &'static str,
        reason: String,
    },

    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("unexpected response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },
}

impl ResolveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedPlatform(_) => ErrorKind::UnsupportedPlatform,
            Self::ExtractionFailed { .. } => ErrorKind::ExtractionFailed,
            Self::Transport { .. } => ErrorKind::TransportFailure,
            Self::MalformedResponse { .. } => ErrorKind::MalformedRemoteResponse,
        }
    }

    pub(crate) fn transport(url: &str, reason: impl ToString) -> Self {
        Self::Transport {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn malformed(url: &str, reason: impl ToString) -> Self {
        Self::MalformedResponse {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Errors while loading a configuration or a resolver list.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("resolver \"{name}\": {reason}")]
    Template { name: String, reason: String },

    #[error("invalid value for {key}: {value}")]
    Env { key: &'static str, value: String },

    #[error("invalid {setting}: {reason}")]
    InvalidValue {
        setting: &'static str,
        reason: String,
    },
}
