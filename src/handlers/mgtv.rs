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
// - Mango TV handler -

use once_cell::sync::Lazy;
use regex::Regex;

use crate::definitions::SiteDefinition;
use crate::scrape::{compile, first_capture};

// https://www.mgtv.com/b/<collection>/<vid>.html
static URL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| compile(&[r"/b/\d+/(\d+)\.html"]));

static PAGE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r#""vid"\s*:\s*"([^"]+)""#,
        r#"vid=([^&"'\s]+)"#,
        r"/b/\d+/(\d+)\.html",
    ])
});

// Implement the site definition:
pub struct MgtvHandler;
impl SiteDefinition for MgtvHandler {
    fn display_name(&self) -> &'static str {
        "Mango TV"
    }

    fn title_suffixes(&self) -> &'static [&'static str] {
        &[" - 芒果TV", "-芒果TV"]
    }

    fn video_id_from_url(&self, url: &str) -> Option<String> {
        first_capture(&URL_PATTERNS, url)
    }

    fn video_id_from_page(&self, body: &str) -> Option<String> {
        first_capture(&PAGE_PATTERNS, body)
    }
}
