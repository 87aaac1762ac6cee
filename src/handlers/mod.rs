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
// - handlers -

use serde_json::Value;
use tracing::{debug, warn};

use crate::agent::Fetch;
use crate::config::Endpoints;
use crate::definitions::SiteDefinition;
use crate::error::ResolveError;
use crate::models::ExtractionOutcome;
use crate::utils::normalize_title;

pub mod bilibili;
pub mod iqiyi;
pub mod mgtv;
pub mod tencent;
pub mod youku;

// A fetched page body, or the reason this layer has nothing to offer.
fn fetch_page(
    handler: &dyn SiteDefinition,
    agent: &dyn Fetch,
    url: &str,
) -> Result<String, ResolveError> {
    match agent.fetch(url) {
        Ok(page) if page.is_success() => Ok(page.body),
        Ok(page) => {
            debug!("{}: page answered HTTP {}", handler.display_name(), page.status);
            Err(ResolveError::transport(url, format!("HTTP {}", page.status)))
        }
        Err(e) => {
            warn!("{}: page layer skipped: {}", handler.display_name(), e);
            Err(e)
        }
    }
}

/// Runs the extraction layers of <handler> against <url>.
///
/// URL structure first, then the page, then the metadata API. A layer
/// that fails only contributes nothing. The call fails only if the
/// platform needs a video id and no layer found one.
pub fn extract(
    handler: &dyn SiteDefinition,
    url: &str,
    agent: &dyn Fetch,
    endpoints: &Endpoints,
) -> Result<ExtractionOutcome, ResolveError> {
    let name = handler.display_name();
    let mut outcome = ExtractionOutcome::placeholder(name, handler.is_restricted_content());
    let mut title = None;
    // reported if no layer finds a required id
    let mut last_error: Option<ResolveError> = None;

    let mut video_id = handler.video_id_from_url(url);
    debug!("{}: video id from URL: {:?}", name, video_id);

    let mut page_fetched = false;
    if video_id.is_none() || !handler.has_metadata_api() {
        page_fetched = true;
        match fetch_page(handler, agent, url) {
            Ok(body) => {
                video_id = video_id.or_else(|| handler.video_id_from_page(&body));
                title = handler.title_from_page(&body);
                outcome.thumbnail_url = handler.thumbnail_from_page(&body);
                debug!("{}: after page: id {:?}, title {:?}", name, video_id, title);
            }
            Err(e) => last_error = Some(e),
        }
    }

    if let Some(id) = video_id.clone().filter(|_| handler.has_metadata_api()) {
        match handler.fetch_metadata(&id, agent, endpoints) {
            Ok(Some(metadata)) => {
                debug!("{}: metadata {:?}", name, metadata);
                if metadata.title.is_some() {
                    title = metadata.title;
                }
                if metadata.video_id.is_some() {
                    video_id = metadata.video_id;
                }
                if metadata.duration_seconds > 0 {
                    outcome.duration_seconds = metadata.duration_seconds;
                }
                if metadata.thumbnail_url.is_some() {
                    outcome.thumbnail_url = metadata.thumbnail_url;
                }
            }
            Ok(None) => debug!("{}: metadata API knows nothing about {}", name, id),
            Err(e) => {
                warn!("{}: metadata layer skipped: {}", name, e);
                last_error = Some(e);
            }
        }
    }

    if title.is_none() && !page_fetched {
        if let Ok(body) = fetch_page(handler, agent, url) {
            title = handler.title_from_page(&body);
            if outcome.thumbnail_url.is_none() {
                outcome.thumbnail_url = handler.thumbnail_from_page(&body);
            }
        }
    }

    outcome.video_id = match video_id {
        Some(id) => id,
        None if handler.requires_video_id() => {
            let mut reason = "no video id in the URL, the page or the metadata API".to_string();
            if let Some(e) = last_error {
                reason = format!("{} ({})", reason, e);
            }
            return Err(ResolveError::ExtractionFailed {
                platform: name,
                reason,
            });
        }
        None => String::new(),
    };

    let generic_suffix = format!(" - {}", name);
    let mut suffixes: Vec<&str> = handler.title_suffixes().to_vec();
    suffixes.push(&generic_suffix);
    if let Some(title) = title
        .map(|t| normalize_title(&t, &suffixes))
        .filter(|t| !t.is_empty())
    {
        outcome.title = title;
    }

    Ok(outcome)
}

/// Seconds from a JSON number or a numeric string ("2580.00").
pub(crate) fn json_seconds(value: &Value) -> u64 {
    if let Some(secs) = value.as_u64() {
        return secs;
    }
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
        .filter(|secs| secs.is_finite() && *secs > 0.0)
        .map(|secs| secs.round() as u64)
        .unwrap_or(0)
}

/// Non-empty string field.
pub(crate) fn json_string(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}
