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
// - models.rs file -

use serde::Serialize;

use crate::error::{ErrorKind, ResolveError};
use crate::routes::ResolvedRoute;
use crate::utils::format_duration;

/// A single resolution attempt.
#[derive(Debug, Clone)]
pub struct ParseRequest {
    pub raw_url: String,
}

impl ParseRequest {
    pub fn new(raw_url: impl Into<String>) -> Self {
        Self {
            raw_url: raw_url.into(),
        }
    }
}

/// What a platform handler found out about a video.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionOutcome {
    /// Platform-native id. Empty if only a title could be found.
    pub video_id: String,
    pub title: String,
    /// 0 means "unknown".
    pub duration_seconds: u64,
    pub thumbnail_url: Option<String>,
    /// The platform puts most of its catalogue behind paid access.
    /// A hint for the caller, nothing is enforced.
    pub is_restricted_content: bool,
}

impl ExtractionOutcome {
    /// An outcome that only carries the platform's placeholder title.
    pub fn placeholder(title: &str, is_restricted_content: bool) -> Self {
        Self {
            video_id: String::new(),
            title: title.to_string(),
            duration_seconds: 0,
            thumbnail_url: None,
            is_restricted_content,
        }
    }

    pub fn duration(&self) -> String {
        format_duration(self.duration_seconds)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&ResolveError> for Failure {
    fn from(err: &ResolveError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// The pipeline's only output.
///
/// A successful result always carries the video and one route per
/// configured resolver. A failed one carries no routes.
#[derive(Debug, Clone, Serialize)]
pub struct ParseResult {
    success: bool,
    url: String,
    platform_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    video: Option<ExtractionOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<String>,
    routes: Vec<ResolvedRoute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<Failure>,
}

impl ParseResult {
    pub(crate) fn resolved(
        url: &str,
        platform_name: &str,
        video: ExtractionOutcome,
        routes: Vec<ResolvedRoute>,
    ) -> Self {
        Self {
            success: true,
            url: url.to_string(),
            platform_name: Some(platform_name.to_string()),
            duration: Some(video.duration()),
            video: Some(video),
            routes,
            error: None,
        }
    }

    pub(crate) fn failed(url: &str, platform_name: Option<&str>, err: &ResolveError) -> Self {
        Self {
            success: false,
            url: url.to_string(),
            platform_name: platform_name.map(String::from),
            video: None,
            duration: None,
            routes: Vec::new(),
            error: Some(Failure::from(err)),
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Set whenever a platform was detected, even if extraction failed.
    pub fn platform_name(&self) -> Option<&str> {
        self.platform_name.as_deref()
    }

    pub fn video(&self) -> Option<&ExtractionOutcome> {
        self.video.as_ref()
    }

    pub fn routes(&self) -> &[ResolvedRoute] {
        &self.routes
    }

    /// The most preferred route, if any.
    pub fn best_route(&self) -> Option<&ResolvedRoute> {
        self.routes.first()
    }

    pub fn error(&self) -> Option<&Failure> {
        self.error.as_ref()
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(|e| e.kind)
    }
}
