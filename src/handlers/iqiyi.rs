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
// - iQIYI handler -

use once_cell::sync::Lazy;
use regex::Regex;

use crate::definitions::SiteDefinition;
use crate::scrape::{compile, first_capture, page_title};

static URL_PATTERNS: Lazy<Vec<Regex>> =
    Lazy::new(|| compile(&[r"/v_([a-zA-Z0-9]+)\.html", r"[?&]tvid=(\d+)"]));

static PAGE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r#"data-player-videoid="([^"]+)""#,
        r#""vid"\s*:\s*"([^"]+)""#,
        r"albumId[=:](\d+)",
        r#""tvId"\s*:\s*(\d+)"#,
    ])
});

// Used when the page has no usable <title>.
static TITLE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r#""albumName"\s*:\s*"([^"]+)""#,
        r#"data-share-title="([^"]+)""#,
    ])
});

// Implement the site definition:
pub struct IqiyiHandler;
impl SiteDefinition for IqiyiHandler {
    fn display_name(&self) -> &'static str {
        "iQIYI"
    }

    fn title_suffixes(&self) -> &'static [&'static str] {
        &[" - 爱奇艺", "-爱奇艺"]
    }

    fn video_id_from_url(&self, url: &str) -> Option<String> {
        first_capture(&URL_PATTERNS, url)
    }

    fn video_id_from_page(&self, body: &str) -> Option<String> {
        first_capture(&PAGE_PATTERNS, body)
    }

    fn title_from_page(&self, body: &str) -> Option<String> {
        page_title(body).or_else(|| first_capture(&TITLE_PATTERNS, body))
    }
}
