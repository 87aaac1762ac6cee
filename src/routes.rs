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
// - routes.rs file -

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::{fs, str::FromStr};

use crate::error::ConfigError;

/// The substitution slot in a resolver URL pattern.
pub const SLOT: &str = "{}";

// Characters left alone besides ASCII alphanumerics and "-_.~", so that a
// resolver can still take the embedded URL apart.
const SAFE: &str = ":/?#[]@!$&'()*+,;=";

/// A third-party resolver. Priority is the position in its list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTemplate")]
pub struct ResolverTemplate {
    name: String,
    #[serde(rename = "url")]
    url_pattern: String,
}

// Unvalidated `{"name", "url"}` entry as read from JSON.
#[derive(Deserialize)]
pub(crate) struct RawTemplate {
    name: String,
    url: String,
}

impl TryFrom<RawTemplate> for ResolverTemplate {
    type Error = ConfigError;

    fn try_from(raw: RawTemplate) -> Result<Self, Self::Error> {
        Self::new(raw.name, raw.url)
    }
}

impl ResolverTemplate {
    pub fn new(
        name: impl Into<String>,
        url_pattern: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        let url_pattern = url_pattern.into();

        if name.trim().is_empty() {
            return Err(ConfigError::Template {
                name,
                reason: "the name must not be empty".to_string(),
            });
        }

        let slots = url_pattern.matches(SLOT).count();
        if slots != 1 {
            return Err(ConfigError::Template {
                name,
                reason: format!("expected exactly one {} slot, found {}", SLOT, slots),
            });
        }

        Ok(Self { name, url_pattern })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url_pattern(&self) -> &str {
        &self.url_pattern
    }

    /// The pattern with a readable marker in place of the slot.
    pub fn display_pattern(&self) -> String {
        self.url_pattern.replacen(SLOT, "[video URL]", 1)
    }

    fn instantiate(&self, encoded_target: &str) -> String {
        self.url_pattern.replacen(SLOT, encoded_target, 1)
    }
}

/// One instantiated resolver link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRoute {
    pub name: String,
    pub url: String,
    /// 0 is the most preferred route.
    pub rank: usize,
}

/// The resolver lists that ship with vidroute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverSet {
    /// Works for every supported platform.
    General,
    /// Ordered for Youku, where the general list does poorly.
    Youku,
}

impl ResolverSet {
    pub fn templates(self) -> Vec<ResolverTemplate> {
        let table: &[(&str, &str)] = match self {
            Self::General => &[
                ("Line 1 - HD stable", "https://jx.xmflv.com/?url={}"),
                ("Line 2 - fast", "https://api.bb3.buzz/jiexi/?url={}"),
                ("Line 3 - general", "https://jx.618g.com/?url={}"),
                ("Line 4 - backup", "https://okjx.cc/?url={}"),
                ("Line 5 - VIP", "https://www.1717yun.com/jx/ty.php?url={}"),
                ("Line 6 - ultra HD", "https://jx.jsonplayer.com/player/?url={}"),
                ("Line 7 - rapid", "https://jx.bozrc.com:4433/player/?url={}"),
            ],
            Self::Youku => &[
                ("Youku preferred", "https://jx.xymp4.cc/?url={}"),
                ("Stable", "https://www.8090g.cn/?url={}"),
                ("HD", "https://jx.m3u8.tv/jiexi/?url={}"),
                ("All-site VIP", "https://www.yemu.xyz/?url={}"),
                ("Rapid", "https://jx.xyflv.cc/?url={}"),
            ],
        };

        table
            .iter()
            .map(|(name, pattern)| ResolverTemplate {
                name: name.to_string(),
                url_pattern: pattern.to_string(),
            })
            .collect()
    }
}

impl FromStr for ResolverSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "general" => Ok(Self::General),
            "youku" => Ok(Self::Youku),
            other => Err(format!("unknown resolver set: {}", other)),
        }
    }
}

/// Loads a resolver list from a JSON array of `{"name", "url"}` objects.
pub fn load_templates(path: &str) -> Result<Vec<ResolverTemplate>, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_string(),
        source,
    })?;
    let templates: Vec<ResolverTemplate> =
        serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_string(),
            source,
        })?;
    check_unique_names(&templates)?;
    Ok(templates)
}

pub(crate) fn check_unique_names(templates: &[ResolverTemplate]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for template in templates {
        if !seen.insert(template.name()) {
            return Err(ConfigError::Template {
                name: template.name().to_string(),
                reason: "duplicate resolver name".to_string(),
            });
        }
    }
    Ok(())
}

/// Percent-encodes everything outside the unreserved and URL-structural sets.
pub fn encode_target(url: &str) -> String {
    let mut encoded = String::with_capacity(url.len());
    let mut buf = [0u8; 4];

    for c in url.chars() {
        if c.is_ascii_alphanumeric() || "-_.~".contains(c) || SAFE.contains(c) {
            encoded.push(c);
        } else {
            encoded.push_str(&urlencoding::encode(c.encode_utf8(&mut buf)));
        }
    }

    encoded
}

/// Builds one route per template, in template order. Never does any I/O.
pub fn generate_routes(original_url: &str, templates: &[ResolverTemplate]) -> Vec<ResolvedRoute> {
    let encoded = encode_target(original_url);

    templates
        .iter()
        .enumerate()
        .map(|(rank, template)| ResolvedRoute {
            name: template.name().to_string(),
            url: template.instantiate(&encoded),
            rank,
        })
        .collect()
}
