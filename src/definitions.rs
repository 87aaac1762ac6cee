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
// - definitions.rs file -

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::agent::Fetch;
use crate::config::Config;
use crate::config::Endpoints;
use crate::error::ResolveError;
use crate::handlers;
use crate::models::ExtractionOutcome;
use crate::scrape;

/// Fields read from a platform's metadata API. They win over scraped ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub video_id: Option<String>,
    pub title: Option<String>,
    pub duration_seconds: u64,
    pub thumbnail_url: Option<String>,
}

// Define the public interface for site definitions:
pub trait SiteDefinition: Sync {
    // returns the name of the site (e.g. "Bilibili").
    fn display_name(&self) -> &'static str;

    // decorations the site appends to its page titles.
    fn title_suffixes(&self) -> &'static [&'static str];

    // true, if no result should be produced without a video id.
    fn requires_video_id(&self) -> bool {
        false
    }

    // true, if most of the site's catalogue is behind paid access.
    fn is_restricted_content(&self) -> bool {
        true
    }

    // finds the video id in the URL alone.
    fn video_id_from_url(&self, url: &str) -> Option<String>;

    // finds the video id in the page source.
    fn video_id_from_page(&self, body: &str) -> Option<String>;

    // finds the undecorated title in the page source.
    fn title_from_page(&self, body: &str) -> Option<String> {
        scrape::page_title(body)
    }

    // finds a preview image in the page source.
    fn thumbnail_from_page(&self, body: &str) -> Option<String> {
        scrape::page_thumbnail(body)
    }

    // true, if the site has a public metadata endpoint.
    fn has_metadata_api(&self) -> bool {
        false
    }

    // queries the metadata endpoint for <video_id>.
    fn fetch_metadata(
        &self,
        _video_id: &str,
        _agent: &dyn Fetch,
        _endpoints: &Endpoints,
    ) -> Result<Option<Metadata>, ResolveError> {
        Ok(None)
    }
}

/// Every supported platform. The declaration order is the detection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Tencent,
    Iqiyi,
    Youku,
    Bilibili,
    Mgtv,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Tencent,
        Platform::Iqiyi,
        Platform::Youku,
        Platform::Bilibili,
        Platform::Mgtv,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Tencent => "v.qq.com",
            Self::Iqiyi => "iqiyi.com",
            Self::Youku => "youku.com",
            Self::Bilibili => "bilibili.com",
            Self::Mgtv => "mgtv.com",
        }
    }

    fn match_patterns(self) -> &'static [&'static str] {
        match self {
            Self::Tencent => &[r"v\.qq\.com", r"video\.qq\.com"],
            Self::Iqiyi => &[r"iqiyi\.com", r"www\.iqiyi\.com"],
            Self::Youku => &[r"youku\.com", r"v\.youku\.com"],
            Self::Bilibili => &[r"bilibili\.com", r"b23\.tv"],
            Self::Mgtv => &[r"mgtv\.com", r"www\.mgtv\.com"],
        }
    }

    pub fn handler(self) -> &'static dyn SiteDefinition {
        match self {
            Self::Tencent => &handlers::tencent::TencentHandler,
            Self::Iqiyi => &handlers::iqiyi::IqiyiHandler,
            Self::Youku => &handlers::youku::YoukuHandler,
            Self::Bilibili => &handlers::bilibili::BilibiliHandler,
            Self::Mgtv => &handlers::mgtv::MgtvHandler,
        }
    }

    pub fn display_name(self) -> &'static str {
        self.handler().display_name()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Immutable registry entry of one platform.
#[derive(Debug)]
pub struct PlatformDescriptor {
    pub platform: Platform,
    pub key: &'static str,
    pub display_name: &'static str,
    pub match_rules: Vec<Regex>,
}

impl PlatformDescriptor {
    fn new(platform: Platform) -> Self {
        Self {
            platform,
            key: platform.key(),
            display_name: platform.display_name(),
            match_rules: scrape::compile(platform.match_patterns()),
        }
    }

    /// True, if any rule matches anywhere in <url>.
    pub fn matches(&self, url: &str) -> bool {
        self.match_rules.iter().any(|rule| rule.is_match(url))
    }

    pub fn extract(
        &self,
        url: &str,
        agent: &dyn Fetch,
        config: &Config,
    ) -> Result<ExtractionOutcome, ResolveError> {
        handlers::extract(self.platform.handler(), url, agent, &config.endpoints)
    }
}

static REGISTRY: Lazy<Vec<PlatformDescriptor>> =
    Lazy::new(|| Platform::ALL.iter().map(|p| PlatformDescriptor::new(*p)).collect());

/// All platforms in detection order.
pub fn registry() -> &'static [PlatformDescriptor] {
    &REGISTRY
}

/// The first registered platform with a rule matching <url>.
///
/// Rules are not exclusive: a URL matching several platforms goes to the
/// one registered first (see `Platform::ALL`).
pub fn detect(url: &str) -> Option<&'static PlatformDescriptor> {
    registry().iter().find(|descriptor| descriptor.matches(url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_each_platform() {
        let cases = [
            ("https://v.qq.com/x/cover/mcv8hkc8zk8lnov/m4101qychtr.html", Platform::Tencent),
            ("https://video.qq.com/page/x.html", Platform::Tencent),
            ("https://www.iqiyi.com/v_1fbzh2w5p54.html", Platform::Iqiyi),
            ("https://v.youku.com/v_show/id_XNTkxNjcwMjg0OA==.html", Platform::Youku),
            ("https://www.bilibili.com/video/BV1xx411c7mD", Platform::Bilibili),
            ("https://b23.tv/abcdEF1", Platform::Bilibili),
            ("https://www.mgtv.com/b/332759/3567533.html", Platform::Mgtv),
        ];

        for (url, platform) in cases {
            let descriptor = detect(url).unwrap_or_else(|| panic!("no platform for {}", url));
            assert_eq!(descriptor.platform, platform, "{}", url);
            assert_eq!(descriptor.display_name, platform.display_name());
        }
    }

    #[test]
    fn unrelated_urls_are_not_detected() {
        assert!(detect("https://example.com/watch?v=1").is_none());
        assert!(detect("").is_none());
    }

    #[test]
    fn match_is_unanchored() {
        // the Youku URL is only a parameter here, it still counts
        assert_eq!(
            detect("https://share.example/?target=v.youku.com").map(|d| d.platform),
            Some(Platform::Youku)
        );
    }

    #[test]
    fn first_registered_wins() {
        let url = "https://www.mgtv.com/redirect?to=https://v.qq.com/x/page/a.html";
        assert_eq!(detect(url).map(|d| d.platform), Some(Platform::Tencent));
    }

    #[test]
    fn registry_order_is_stable() {
        let keys: Vec<_> = registry().iter().map(|d| d.key).collect();
        assert_eq!(
            keys,
            ["v.qq.com", "iqiyi.com", "youku.com", "bilibili.com", "mgtv.com"]
        );
    }
}
