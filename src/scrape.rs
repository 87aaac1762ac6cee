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
// - scrape.rs file -

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    combinator::rest,
    sequence::{preceded, tuple},
    IResult,
};
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

/// Compiles a static pattern table. Only ever called with literals.
pub(crate) fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("static pattern must compile"))
        .collect()
}

/// Tries the patterns in order and returns the first non-empty group 1.
pub(crate) fn first_capture(patterns: &[Regex], haystack: &str) -> Option<String> {
    patterns.iter().find_map(|re| {
        re.captures(haystack)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
    })
}

/// Value of a query parameter, already percent-decoded.
pub(crate) fn query_param(url: &str, name: &str) -> Option<String> {
    let url = Url::parse(url).ok()?;
    url.query_pairs()
        .find(|(key, value)| key == name && !value.is_empty())
        .map(|(_, value)| value.into_owned())
}

/// The document's <title>, or its og:title if there is no usable <title>.
pub fn page_title(body: &str) -> Option<String> {
    let document = Html::parse_document(body);

    let title_selector = Selector::parse("title").ok()?;
    let title = document
        .select(&title_selector)
        .next()
        .map(|t| t.text().collect::<String>())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    if title.is_some() {
        return title;
    }

    let og_selector = Selector::parse(r#"meta[property="og:title"]"#).ok()?;
    document
        .select(&og_selector)
        .filter_map(|m| m.value().attr("content"))
        .map(str::trim)
        .find(|c| !c.is_empty())
        .map(String::from)
}

/// The document's og:image, if any.
pub fn page_thumbnail(body: &str) -> Option<String> {
    let document = Html::parse_document(body);
    let selector = Selector::parse(r#"meta[property="og:image"]"#).ok()?;
    document
        .select(&selector)
        .filter_map(|m| m.value().attr("content"))
        .map(str::trim)
        .find(|c| !c.is_empty())
        .map(|c| match c.strip_prefix("//") {
            // protocol-relative, seen on most of these sites
            Some(rest) => format!("https://{}", rest),
            None => c.to_string(),
        })
}

fn callback_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '.')(input)
}

// QZOutputJson={...};
fn assignment(input: &str) -> IResult<&str, &str> {
    let (input, payload) =
        preceded(tuple((callback_name, multispace0, char('='))), rest)(input)?;
    Ok((input, payload.trim().trim_end_matches(';').trim_end()))
}

// callback({...});
fn invocation(input: &str) -> IResult<&str, &str> {
    let (input, payload) =
        preceded(tuple((callback_name, multispace0, char('('))), rest)(input)?;
    let payload = payload.trim().trim_end_matches(';').trim_end();
    match payload.strip_suffix(')') {
        Some(inner) => Ok((input, inner.trim())),
        None => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        ))),
    }
}

/// Strips a JSONP wrapper (`name=...;` or `name(...);`) from a response body.
/// Plain JSON is returned as-is.
pub fn unwrap_jsonp(body: &str) -> &str {
    let body = body.trim();
    if body.starts_with('{') || body.starts_with('[') {
        return body;
    }

    match alt((assignment, invocation))(body) {
        Ok((_, payload)) => payload,
        Err(_) => body,
    }
}
