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
// - resolver.rs file -

use tracing::{info, warn};

use crate::agent::{Fetch, HttpAgent};
use crate::config::Config;
use crate::definitions::detect;
use crate::error::ResolveError;
use crate::models::{ParseRequest, ParseResult};
use crate::probe::{probe_all, Availability};
use crate::routes::{generate_routes, ResolvedRoute, ResolverTemplate};

/// Detection, extraction and route generation for one URL at a time.
///
/// Holds no per-request state: one resolver can serve any number of
/// calls, also from several threads.
pub struct Resolver<F: Fetch = HttpAgent> {
    config: Config,
    agent: F,
}

impl Resolver<HttpAgent> {
    pub fn new(config: Config) -> Self {
        let agent = HttpAgent::new(&config);
        Self { config, agent }
    }
}

impl<F: Fetch> Resolver<F> {
    /// A resolver that fetches through <agent> instead of HTTP.
    pub fn with_agent(config: Config, agent: F) -> Self {
        Self { config, agent }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn templates(&self) -> &[ResolverTemplate] {
        &self.config.templates
    }

    pub fn agent(&self) -> &F {
        &self.agent
    }

    /// Resolves <raw_url>. Never fails: problems are reported inside the
    /// result.
    ///
    /// Surrounding whitespace is ignored for detection and extraction only.
    /// Routes embed <raw_url> exactly as given.
    pub fn resolve(&self, raw_url: &str) -> ParseResult {
        let url = raw_url.trim();

        let Some(descriptor) = detect(url) else {
            let err = ResolveError::UnsupportedPlatform(raw_url.to_string());
            warn!("{}", err);
            return ParseResult::failed(raw_url, None, &err);
        };
        info!("{}: detected {}", url, descriptor.display_name);

        match descriptor.extract(url, &self.agent, &self.config) {
            Ok(video) => {
                let routes = generate_routes(raw_url, &self.config.templates);
                info!(
                    "{}: \"{}\" ({}), {} routes",
                    descriptor.display_name,
                    video.title,
                    video.video_id,
                    routes.len()
                );
                ParseResult::resolved(raw_url, descriptor.display_name, video, routes)
            }
            Err(err) => {
                warn!("{}", err);
                ParseResult::failed(raw_url, Some(descriptor.display_name), &err)
            }
        }
    }

    pub fn resolve_request(&self, request: &ParseRequest) -> ParseResult {
        self.resolve(&request.raw_url)
    }

    /// Probes every route of <result>, see `probe::probe_all`.
    pub fn probe_routes<C>(&self, result: &ParseResult, on_done: C) -> Vec<Availability>
    where
        C: Fn(&ResolvedRoute, &Availability) + Sync,
    {
        probe_all(result.routes(), &self.agent, on_done)
    }
}

/// Resolves <raw_url> with a default configuration.
pub fn resolve(raw_url: &str) -> ParseResult {
    Resolver::new(Config::default()).resolve(raw_url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::stub::StubAgent;
    use crate::error::ErrorKind;
    use crate::routes::ResolverSet;

    fn stub_resolver(agent: StubAgent) -> Resolver<StubAgent> {
        Resolver::with_agent(Config::default(), agent)
    }

    #[test]
    fn unsupported_platform() {
        let resolver = stub_resolver(StubAgent::new());
        let result = resolver.resolve("https://www.youtube.com/watch?v=dQw4w9WgXcQ");

        assert!(!result.success());
        assert_eq!(result.error_kind(), Some(ErrorKind::UnsupportedPlatform));
        assert_eq!(result.platform_name(), None);
        assert!(result.routes().is_empty());
        // detection failed, so nothing was fetched
        assert!(resolver.agent().requested().is_empty());
    }

    #[test]
    fn empty_input_is_unsupported() {
        let result = stub_resolver(StubAgent::new()).resolve("   ");
        assert_eq!(result.error_kind(), Some(ErrorKind::UnsupportedPlatform));
    }

    #[test]
    fn tencent_cover_link_offline() {
        let url = "https://v.qq.com/x/cover/abcdef/g123.html";
        let result = stub_resolver(StubAgent::new()).resolve(url);

        assert!(result.success());
        assert_eq!(result.platform_name(), Some("Tencent Video"));
        let video = result.video().unwrap();
        assert_eq!(video.video_id, "g123");
        assert_eq!(video.title, "Tencent Video");
        assert_eq!(video.duration(), "unknown");

        let templates = ResolverSet::General.templates();
        assert_eq!(result.routes().len(), templates.len());
        assert_eq!(result.best_route().map(|r| r.rank), Some(0));
        assert_eq!(
            result.best_route().map(|r| r.url.as_str()),
            Some("https://jx.xmflv.com/?url=https://v.qq.com/x/cover/abcdef/g123.html")
        );
    }

    #[test]
    fn routes_embed_the_input_exactly() {
        let input = " https://v.qq.com/x/cover/abcdef/g123.html\n";
        let result = stub_resolver(StubAgent::new()).resolve(input);

        assert!(result.success());
        assert_eq!(result.url(), input);
        assert_eq!(result.video().unwrap().video_id, "g123");
        for route in result.routes() {
            let (_, segment) = route.url.split_once("url=").unwrap();
            assert_eq!(urlencoding::decode(segment).unwrap(), input);
        }
    }

    #[test]
    fn extraction_failure_names_platform() {
        let result = stub_resolver(StubAgent::new()).resolve("https://www.bilibili.com/");

        assert!(!result.success());
        assert_eq!(result.platform_name(), Some("Bilibili"));
        assert_eq!(result.error_kind(), Some(ErrorKind::ExtractionFailed));
        assert!(result.routes().is_empty());
    }

    #[test]
    fn youku_list_for_youku() {
        let config = Config::default()
            .with_templates(ResolverSet::Youku.templates())
            .unwrap();
        let resolver = Resolver::with_agent(config, StubAgent::new());
        let result = resolver.resolve_request(&ParseRequest::new(
            "https://v.youku.com/v_show/id_XNTkxNjcwMjg0OA==.html",
        ));

        assert!(result.success());
        assert_eq!(result.video().unwrap().video_id, "XNTkxNjcwMjg0OA==");
        let names: Vec<_> = result.routes().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names.first(), Some(&"Youku preferred"));
        assert_eq!(names.len(), 5);
    }

    #[test]
    fn repeated_calls_agree() {
        let resolver = stub_resolver(StubAgent::new());
        let url = "https://www.mgtv.com/b/332759/3567533.html";
        let first = resolver.resolve(url);
        let second = resolver.resolve(url);

        assert_eq!(first.video(), second.video());
        assert_eq!(first.routes(), second.routes());
    }

    #[test]
    fn probing_a_failed_result_does_nothing() {
        let resolver = stub_resolver(StubAgent::new());
        let result = resolver.resolve("https://example.com/");
        assert!(resolver.probe_routes(&result, |_, _| {}).is_empty());
    }
}
