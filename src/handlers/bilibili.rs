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
// - Bilibili handler -

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::agent::Fetch;
use crate::config::Endpoints;
use crate::definitions::{Metadata, SiteDefinition};
use crate::error::ResolveError;
use crate::scrape::{compile, first_capture};

static BVID: Lazy<Regex> = Lazy::new(|| Regex::new(r"BV([a-zA-Z0-9]+)").expect("static pattern"));
static AID: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bav(\d+)").expect("static pattern"));

// b23.tv short links redirect to a page that names the video.
static PAGE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r#""bvid"\s*:\s*"(BV[a-zA-Z0-9]+)""#,
        r"/video/(BV[a-zA-Z0-9]+)",
    ])
});

#[derive(Deserialize)]
struct ViewResponse {
    code: i64,
    #[serde(default)]
    message: String,
    data: Option<ViewData>,
}

#[derive(Deserialize)]
struct ViewData {
    #[serde(default)]
    bvid: String,
    #[serde(default)]
    aid: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    duration: u64,
    #[serde(default)]
    pic: String,
}

fn non_empty(s: String) -> Option<String> {
    let s = s.trim().to_string();
    (!s.is_empty()).then_some(s)
}

// Implement the site definition:
pub struct BilibiliHandler;
impl SiteDefinition for BilibiliHandler {
    fn display_name(&self) -> &'static str {
        "Bilibili"
    }

    fn title_suffixes(&self) -> &'static [&'static str] {
        &["_哔哩哔哩_bilibili", " - 哔哩哔哩"]
    }

    // Without a BV or av number there is nothing to ask the API about.
    fn requires_video_id(&self) -> bool {
        true
    }

    // Most of Bilibili is free to watch.
    fn is_restricted_content(&self) -> bool {
        false
    }

    fn video_id_from_url(&self, url: &str) -> Option<String> {
        if let Some(c) = BVID.captures(url) {
            return Some(format!("BV{}", &c[1]));
        }
        AID.captures(url).map(|c| format!("av{}", &c[1]))
    }

    fn video_id_from_page(&self, body: &str) -> Option<String> {
        first_capture(&PAGE_PATTERNS, body)
    }

    fn has_metadata_api(&self) -> bool {
        true
    }

    fn fetch_metadata(
        &self,
        video_id: &str,
        agent: &dyn Fetch,
        endpoints: &Endpoints,
    ) -> Result<Option<Metadata>, ResolveError> {
        let param = match video_id.strip_prefix("av") {
            Some(aid) => ("aid", aid),
            None => ("bvid", video_id),
        };
        let url = Url::parse_with_params(&endpoints.bilibili_view, &[param])
            .map_err(|e| ResolveError::transport(&endpoints.bilibili_view, e))?;

        let page = agent.fetch(url.as_str())?;
        if !page.is_success() {
            return Err(ResolveError::transport(
                url.as_str(),
                format!("HTTP {}", page.status),
            ));
        }

        let response: ViewResponse = serde_json::from_str(&page.body)
            .map_err(|e| ResolveError::malformed(url.as_str(), e))?;

        if response.code != 0 {
            // e.g. -404 for deleted videos
            debug!("Bilibili: view API code {}: {}", response.code, response.message);
            return Ok(None);
        }

        let data = response
            .data
            .ok_or_else(|| ResolveError::malformed(url.as_str(), "code 0 without data"))?;

        let video_id = non_empty(data.bvid)
            .or_else(|| (data.aid > 0).then(|| format!("av{}", data.aid)));

        Ok(Some(Metadata {
            video_id,
            title: non_empty(data.title),
            duration_seconds: data.duration,
            thumbnail_url: non_empty(data.pic),
        }))
    }
}
