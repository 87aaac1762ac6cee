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
// - agent.rs file -

use std::time::Duration;
use tracing::debug;
use ureq::{Agent, AgentBuilder, Proxy};
use url::Url;

use crate::config::Config;
use crate::error::ResolveError;

/// A fetched response. Non-2xx responses are pages too, only transport
/// problems are errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub status: u16,
    pub body: String,
}

impl Page {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Fetches pages and API responses for the extraction layers and the probe.
pub trait Fetch: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Page, ResolveError>;
}

/// Default fetcher: one blocking GET, bounded by the configured timeout.
pub struct HttpAgent {
    timeout: Duration,
    user_agent: String,
    accept_language: String,
}

impl HttpAgent {
    pub fn new(config: &Config) -> Self {
        Self {
            timeout: config.timeout,
            user_agent: config.user_agent.clone(),
            accept_language: config.accept_language.clone(),
        }
    }

    // Builds an agent for <url>. Sets a proxy or not.
    fn agent_for(&self, url: &Url) -> Agent {
        let mut builder = AgentBuilder::new()
            .timeout(self.timeout)
            .user_agent(&self.user_agent);

        if let Some((host, port)) = env_proxy::for_url(url).host_port() {
            match Proxy::new(format!("{}:{}", host, port)) {
                Ok(proxy) => builder = builder.proxy(proxy),
                Err(e) => debug!("ignoring unusable proxy {}:{}: {}", host, port, e),
            }
        }

        builder.build()
    }
}

impl Fetch for HttpAgent {
    fn fetch(&self, url: &str) -> Result<Page, ResolveError> {
        let parsed = Url::parse(url).map_err(|e| ResolveError::transport(url, e))?;
        let agent = self.agent_for(&parsed);

        let request = agent
            .get(parsed.as_str())
            .set("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .set("Accept-Language", &self.accept_language);

        let response = match request.call() {
            Ok(response) => response,
            // ureq reports 4xx/5xx as errors, we want them as pages:
            Err(ureq::Error::Status(_, response)) => response,
            Err(e) => return Err(ResolveError::transport(url, e)),
        };

        let status = response.status();
        let body = response
            .into_string()
            .map_err(|e| ResolveError::transport(url, e))?;

        debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(Page { status, body })
    }
}
