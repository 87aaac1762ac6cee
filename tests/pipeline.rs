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

// Whole resolutions through the real HTTP agent. Metadata endpoints point
// at a local server; page URLs do too, since detection also matches a
// platform domain that only appears in the query string.

use httpmock::prelude::*;
use std::{env, fs};

use vidroute::{Config, Endpoints, ErrorKind, ResolverSet, Resolver};

fn local_endpoints(server: &MockServer) -> Endpoints {
    Endpoints {
        tencent_getinfo: server.url("/getinfo"),
        bilibili_view: server.url("/x/web-interface/view"),
    }
}

fn resolver_for(server: &MockServer) -> Resolver {
    Resolver::new(Config::default().with_endpoints(local_endpoints(server)))
}

#[test]
fn bilibili_metadata_from_view_api() {
    let server = MockServer::start();
    let api = server.mock(|when, then| {
        when.method(GET)
            .path("/x/web-interface/view")
            .query_param("bvid", "BV1xx411c7mD");
        then.status(200)
            .header("content-type", "application/json")
            .body(
                r#"{"code":0,"message":"0","data":{"bvid":"BV1xx411c7mD","aid":2,
                    "title":"字幕君交流场所","duration":2580,"pic":"http://i0.hdslb.com/a.jpg"}}"#,
            );
    });

    let url = "https://www.bilibili.com/video/BV1xx411c7mD";
    let result = resolver_for(&server).resolve(url);

    api.assert();
    assert!(result.success());
    assert_eq!(result.platform_name(), Some("Bilibili"));
    let video = result.video().unwrap();
    assert_eq!(video.video_id, "BV1xx411c7mD");
    assert_eq!(video.title, "字幕君交流场所");
    assert_eq!(video.duration(), "43:00");
    assert!(!video.is_restricted_content);
    assert_eq!(result.routes().len(), ResolverSet::General.templates().len());
}

#[test]
fn tencent_metadata_from_getinfo() {
    let server = MockServer::start();
    let api = server.mock(|when, then| {
        when.method(GET)
            .path("/getinfo")
            .query_param("vids", "m4101qychtr")
            .query_param("otype", "json");
        then.status(200).body(
            r#"QZOutputJson={"vl":{"vi":[{"vid":"m4101qychtr","ti":"庆余年 第1集","td":"2602.00"}]}};"#,
        );
    });

    let result = resolver_for(&server)
        .resolve("https://v.qq.com/x/cover/mcv8hkc8zk8lnov/m4101qychtr.html");

    api.assert();
    let video = result.video().unwrap();
    assert_eq!(video.title, "庆余年 第1集");
    assert_eq!(video.duration_seconds, 2602);
    assert_eq!(video.duration(), "43:22");
}

#[test]
fn iqiyi_page_scraped() {
    let server = MockServer::start();
    let page = server.mock(|when, then| {
        when.method(GET).path("/v_19rrok4nt0.html");
        then.status(200).body(
            r#"<html><head><title>狂飙第1集 - 爱奇艺</title>
               <meta property="og:image" content="//pic.iqiyipic.com/a.jpg"></head></html>"#,
        );
    });

    let result = resolver_for(&server).resolve(&server.url("/v_19rrok4nt0.html?from=iqiyi.com"));

    page.assert();
    assert!(result.success());
    assert_eq!(result.platform_name(), Some("iQIYI"));
    let video = result.video().unwrap();
    assert_eq!(video.video_id, "19rrok4nt0");
    assert_eq!(video.title, "狂飙第1集");
    assert_eq!(video.thumbnail_url.as_deref(), Some("https://pic.iqiyipic.com/a.jpg"));
}

#[test]
fn server_errors_degrade_to_placeholder() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/b/332759/3567533.html");
        then.status(500);
    });

    let result = resolver_for(&server).resolve(&server.url("/b/332759/3567533.html?ref=mgtv.com"));

    assert!(result.success());
    let video = result.video().unwrap();
    assert_eq!(video.video_id, "3567533");
    assert_eq!(video.title, "Mango TV");
    assert_eq!(video.duration(), "unknown");
}

#[test]
fn deleted_bilibili_video_fails_without_id() {
    let server = MockServer::start();
    // a short link page that names no video
    server.mock(|when, then| {
        when.method(GET).path("/short");
        then.status(200).body("<title>出错啦! - bilibili.com</title>");
    });

    let result = resolver_for(&server).resolve(&server.url("/short?via=b23.tv"));

    assert!(!result.success());
    assert_eq!(result.platform_name(), Some("Bilibili"));
    assert_eq!(result.error_kind(), Some(ErrorKind::ExtractionFailed));
    assert!(result.routes().is_empty());
}

#[test]
fn unsupported_platform_makes_no_request() {
    let server = MockServer::start();
    let any = server.mock(|when, then| {
        when.method(GET);
        then.status(200);
    });

    let result = resolver_for(&server).resolve(&server.url("/watch?v=1"));

    any.assert_hits(0);
    assert_eq!(result.error_kind(), Some(ErrorKind::UnsupportedPlatform));
    assert_eq!(result.platform_name(), None);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["kind"], "UnsupportedPlatform");
}

#[test]
fn config_file_selects_endpoints_and_resolvers() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/view").query_param("aid", "170001");
        then.status(200).body(
            r#"{"code":0,"data":{"bvid":"BV17x411w7KC","aid":170001,
                "title":"av170001","duration":65}}"#,
        );
    });

    let path = env::temp_dir().join(format!("vidroute-pipeline-{}.json", std::process::id()));
    let json = format!(
        r#"{{"timeout_secs": 5, "resolvers": "youku", "bilibili_view": "{}"}}"#,
        server.url("/view")
    );
    fs::write(&path, json).unwrap();

    let config = Config::from_file(path.to_str().unwrap()).unwrap();
    let result = Resolver::new(config).resolve("https://www.bilibili.com/video/av170001");
    fs::remove_file(&path).ok();

    assert!(result.success());
    let video = result.video().unwrap();
    assert_eq!(video.video_id, "BV17x411w7KC");
    assert_eq!(video.duration(), "01:05");
    assert_eq!(result.best_route().unwrap().name, "Youku preferred");
    assert_eq!(
        result.best_route().unwrap().url,
        "https://jx.xymp4.cc/?url=https://www.bilibili.com/video/av170001"
    );
}
