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
// - Tencent Video handler -

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use url::Url;

use crate::agent::Fetch;
use crate::config::Endpoints;
use crate::definitions::{Metadata, SiteDefinition};
use crate::error::ResolveError;
use crate::handlers::{json_seconds, json_string};
use crate::scrape::{compile, first_capture, unwrap_jsonp};

// Most specific first. Cover links look like /x/cover/<cover id>/<vid>.html.
static URL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"vid=([a-zA-Z0-9]+)",
        r"/cover/[^/]+/([a-zA-Z0-9]+)\.html",
        r"/([a-zA-Z0-9]+)\.html",
    ])
});

static PAGE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r#""vid"\s*:\s*"([^"]+)""#,
        r"vid=([a-zA-Z0-9]+)",
        r#"data-vid="([^"]+)""#,
        r#""id"\s*:\s*"([^"]+)""#,
    ])
});

// The getinfo endpoint answers with QZOutputJson={...}; and keeps the
// video list under vl.vi (older responses: pl.videolist).
fn parse_getinfo(url: &str, body: &str) -> Result<Option<Metadata>, ResolveError> {
    let json: Value =
        serde_json::from_str(unwrap_jsonp(body)).map_err(|e| ResolveError::malformed(url, e))?;

    if !json.is_object() {
        return Err(ResolveError::malformed(url, "expected a JSON object"));
    }

    let video = json["vl"]["vi"]
        .get(0)
        .or_else(|| json["pl"]["videolist"].get(0));

    // No entry usually means paid-only content.
    let Some(video) = video else {
        return Ok(None);
    };

    Ok(Some(Metadata {
        video_id: json_string(&video["vid"]),
        title: json_string(&video["ti"]),
        duration_seconds: json_seconds(&video["td"]),
        thumbnail_url: json_string(&video["pic"]),
    }))
}

// Implement the site definition:
pub struct TencentHandler;
impl SiteDefinition for TencentHandler {
    fn display_name(&self) -> &'static str {
        "Tencent Video"
    }

    fn title_suffixes(&self) -> &'static [&'static str] {
        &[" - 腾讯视频", "_腾讯视频"]
    }

    fn requires_video_id(&self) -> bool {
        true
    }

    fn video_id_from_url(&self, url: &str) -> Option<String> {
        first_capture(&URL_PATTERNS, url)
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
        let url = Url::parse_with_params(
            &endpoints.tencent_getinfo,
            &[
                ("vids", video_id),
                ("platform", "101001"),
                ("charge", "0"),
                ("otype", "json"),
            ],
        )
        .map_err(|e| ResolveError::transport(&endpoints.tencent_getinfo, e))?;

        let page = agent.fetch(url.as_str())?;
        if !page.is_success() {
            return Err(ResolveError::transport(
                url.as_str(),
                format!("HTTP {}", page.status),
            ));
        }

        parse_getinfo(url.as_str(), &page.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::stub::StubAgent;
    use crate::handlers::extract;

    const GETINFO: &str =
        "https://vv.video.qq.com/getinfo?vids=g123&platform=101001&charge=0&otype=json";

    #[test]
    fn id_from_cover_url() {
        let h = TencentHandler;
        assert_eq!(
            h.video_id_from_url("https://v.qq.com/x/cover/abcdef/g123.html"),
            Some("g123".to_string())
        );
        assert_eq!(
            h.video_id_from_url("https://v.qq.com/x/cover/mcv8hkc8zk8lnov/m4101qychtr.html"),
            Some("m4101qychtr".to_string())
        );
        assert_eq!(
            h.video_id_from_url("https://v.qq.com/x/page/a.html?vid=q0031abc"),
            Some("q0031abc".to_string())
        );
        assert_eq!(h.video_id_from_url("https://v.qq.com/channel/tv"), None);
    }

    #[test]
    fn id_from_page_source() {
        let h = TencentHandler;
        assert_eq!(
            h.video_id_from_page(r#"window.__PINIA__={"vid" : "k00abc12"}"#),
            Some("k00abc12".to_string())
        );
        assert_eq!(
            h.video_id_from_page(r#"<div data-vid="x9"></div>"#),
            Some("x9".to_string())
        );
    }

    #[test]
    fn structural_id_survives_without_network() {
        // nothing is reachable
        let agent = StubAgent::new();
        let outcome = extract(
            &TencentHandler,
            "https://v.qq.com/x/cover/abcdef/g123.html",
            &agent,
            &Endpoints::default(),
        )
        .unwrap();

        assert_eq!(outcome.video_id, "g123");
        assert_eq!(outcome.title, "Tencent Video");
        assert!(outcome.is_restricted_content);
        // the id was known before any request went out
        assert_eq!(agent.requested().first().map(String::as_str), Some(GETINFO));
    }

    #[test]
    fn getinfo_fills_metadata() {
        let agent = StubAgent::new().page(
            GETINFO,
            200,
            r#"QZOutputJson={"vl":{"vi":[{"vid":"g123","ti":"完美世界 第1集","td":"1234.00",
                "pic":"https://puui.qpic.cn/g123.jpg"}]}};"#,
        );
        let outcome = extract(
            &TencentHandler,
            "https://v.qq.com/x/cover/abcdef/g123.html",
            &agent,
            &Endpoints::default(),
        )
        .unwrap();

        assert_eq!(outcome.title, "完美世界 第1集");
        assert_eq!(outcome.duration_seconds, 1234);
        assert_eq!(outcome.thumbnail_url.as_deref(), Some("https://puui.qpic.cn/g123.jpg"));
    }

    #[test]
    fn legacy_videolist_shape() {
        let meta = parse_getinfo(
            GETINFO,
            r#"QZOutputJson={"pl":{"videolist":[{"ti":"Old","td":65}]}};"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(meta.title.as_deref(), Some("Old"));
        assert_eq!(meta.duration_seconds, 65);
    }

    #[test]
    fn empty_getinfo_falls_back_to_page_title() {
        let page = "https://v.qq.com/x/cover/abcdef/g123.html";
        let agent = StubAgent::new()
            .page(GETINFO, 200, r#"QZOutputJson={"em":85,"msg":"vid is wrong"};"#)
            .page(page, 200, "<title>完美世界 - 腾讯视频</title>");
        let outcome = extract(&TencentHandler, page, &agent, &Endpoints::default()).unwrap();

        assert_eq!(outcome.video_id, "g123");
        assert_eq!(outcome.title, "完美世界");
        assert_eq!(outcome.duration_seconds, 0);
    }

    #[test]
    fn garbage_getinfo_is_malformed() {
        let err = parse_getinfo(GETINFO, "<html>blocked</html>").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::MalformedRemoteResponse);
    }

    #[test]
    fn no_id_anywhere_fails() {
        let page = "https://v.qq.com/channel/tv";
        let agent = StubAgent::new().page(page, 200, "<title>频道</title>");
        let err = extract(&TencentHandler, page, &agent, &Endpoints::default()).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::ExtractionFailed);
        assert!(err.to_string().contains("Tencent Video"));
    }

    #[test]
    fn unreachable_page_is_named_in_the_failure() {
        let page = "https://v.qq.com/channel/tv";
        let err = extract(&TencentHandler, page, &StubAgent::new(), &Endpoints::default())
            .unwrap_err();

        assert_eq!(err.kind(), crate::error::ErrorKind::ExtractionFailed);
        let message = err.to_string();
        assert!(message.starts_with("Tencent Video: "), "{}", message);
        assert!(
            message.contains("request to https://v.qq.com/channel/tv failed: connection refused"),
            "{}",
            message
        );
    }
}
