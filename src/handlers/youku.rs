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
// - Youku handler -

use once_cell::sync::Lazy;
use regex::Regex;

use crate::definitions::SiteDefinition;
use crate::scrape::{compile, first_capture, page_title, query_param};

static URL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| compile(&[r"/id_([^./]+)\.html"]));

static PAGE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r#"videoId["']?\s*:\s*["']([^"']+)["']"#,
        r#"vid["']?\s*:\s*["']([^"']+)["']"#,
        r#"data-vid="([^"]+)""#,
        r"showid[=:]([^&\s]+)",
    ])
});

static TITLE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r#""title"\s*:\s*"([^"]+)""#,
        r#"data-title="([^"]+)""#,
        r"<h1[^>]*>([^<]+)</h1>",
    ])
});

// Implement the site definition:
pub struct YoukuHandler;
impl SiteDefinition for YoukuHandler {
    fn display_name(&self) -> &'static str {
        "Youku"
    }

    fn title_suffixes(&self) -> &'static [&'static str] {
        &[" - 优酷视频", " - 优酷", "—优酷网"]
    }

    // Newer share links carry the id as ?vid=, older ones as /id_<vid>.html.
    fn video_id_from_url(&self, url: &str) -> Option<String> {
        query_param(url, "vid").or_else(|| first_capture(&URL_PATTERNS, url))
    }

    fn video_id_from_page(&self, body: &str) -> Option<String> {
        first_capture(&PAGE_PATTERNS, body)
    }

    fn title_from_page(&self, body: &str) -> Option<String> {
        page_title(body).or_else(|| first_capture(&TITLE_PATTERNS, body))
    }
}
