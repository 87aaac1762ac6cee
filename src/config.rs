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
// - config.rs file -

use serde::Deserialize;
use std::{env, fs, time::Duration};

use crate::error::ConfigError;
use crate::routes::{
    check_unique_names, load_templates, RawTemplate, ResolverSet, ResolverTemplate,
};

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_USER_AGENT: &str = concat!(
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 ",
    "(KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
);

const DEFAULT_ACCEPT_LANGUAGE: &str = "zh-CN,zh;q=0.8,en-US;q=0.5,en;q=0.3";

const ENV_TIMEOUT: &str = "VIDROUTE_TIMEOUT";
const ENV_RESOLVERS: &str = "VIDROUTE_RESOLVERS";

/// Base URLs of the platform metadata APIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub tencent_getinfo: String,
    pub bilibili_view: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            tencent_getinfo: "https://vv.video.qq.com/getinfo".to_string(),
            bilibili_view: "https://api.bilibili.com/x/web-interface/view".to_string(),
        }
    }
}

/// Read-only after construction, shared by every resolve() call.
#[derive(Debug, Clone)]
pub struct Config {
    pub timeout: Duration,
    pub user_agent: String,
    pub accept_language: String,
    pub templates: Vec<ResolverTemplate>,
    pub endpoints: Endpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            templates: ResolverSet::General.templates(),
            endpoints: Endpoints::default(),
        }
    }
}

// On-disk shape. Every field is optional.
#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
    accept_language: Option<String>,
    resolvers: Option<ResolversEntry>,
    tencent_getinfo: Option<String>,
    bilibili_view: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ResolversEntry {
    // "general", "youku" or a path to a JSON list
    Named(String),
    // validated after parsing, so errors name the resolver
    Inline(Vec<RawTemplate>),
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        let file: FileConfig = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_string(),
            source,
        })?;

        let mut config = Self::default();
        if let Some(secs) = file.timeout_secs {
            config = config.with_timeout(secs)?;
        }
        if let Some(user_agent) = file.user_agent {
            config.user_agent = user_agent;
        }
        if let Some(accept_language) = file.accept_language {
            config.accept_language = accept_language;
        }
        match file.resolvers {
            Some(ResolversEntry::Named(spec)) => config.templates = resolvers_from(&spec)?,
            Some(ResolversEntry::Inline(list)) => {
                let templates = list
                    .into_iter()
                    .map(ResolverTemplate::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                config = config.with_templates(templates)?;
            }
            None => {}
        }
        if let Some(url) = file.tencent_getinfo {
            config.endpoints.tencent_getinfo = url;
        }
        if let Some(url) = file.bilibili_view {
            config.endpoints.bilibili_view = url;
        }

        Ok(config)
    }

    /// Applies VIDROUTE_TIMEOUT and VIDROUTE_RESOLVERS.
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_env_from(|key| env::var(key).ok())
    }

    fn with_env_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(value) = lookup(ENV_TIMEOUT) {
            let secs = value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::Env {
                    key: ENV_TIMEOUT,
                    value: value.clone(),
                })?;
            self = self.with_timeout(secs)?;
        }
        if let Some(value) = lookup(ENV_RESOLVERS) {
            self.templates = resolvers_from(&value)?;
        }
        Ok(self)
    }

    pub fn with_timeout(mut self, secs: u64) -> Result<Self, ConfigError> {
        if secs == 0 {
            return Err(ConfigError::InvalidValue {
                setting: "timeout",
                reason: "must be at least one second".to_string(),
            });
        }
        self.timeout = Duration::from_secs(secs);
        Ok(self)
    }

    pub fn with_templates(mut self, templates: Vec<ResolverTemplate>) -> Result<Self, ConfigError> {
        check_unique_names(&templates)?;
        self.templates = templates;
        Ok(self)
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }
}

/// A built-in resolver set by name, otherwise a JSON file.
pub fn resolvers_from(spec: &str) -> Result<Vec<ResolverTemplate>, ConfigError> {
    match spec.parse::<ResolverSet>() {
        Ok(set) => Ok(set.templates()),
        Err(_) => load_templates(spec),
    }
}
