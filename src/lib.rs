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
// - lib.rs file -

//! Detects the video platform of a URL, extracts the video's id and
//! title, and builds a ranked list of third-party resolver links for it.
//!
//! ```no_run
//! let result = vidroute::resolve("https://www.bilibili.com/video/BV1xx411c7mD");
//! if let Some(route) = result.best_route() {
//!     println!("{}", route.url);
//! }
//! ```

pub mod agent;
pub mod config;
pub mod definitions;
pub mod error;
pub mod handlers;
pub mod models;
pub mod probe;
pub mod resolver;
pub mod routes;
pub mod scrape;
pub mod utils;

pub use agent::{Fetch, HttpAgent, Page};
pub use config::{Config, Endpoints};
pub use definitions::{detect, registry, Platform, PlatformDescriptor, SiteDefinition};
pub use error::{ConfigError, ErrorKind, ResolveError};
pub use models::{ExtractionOutcome, ParseRequest, ParseResult};
pub use probe::{probe, probe_all, Availability, ProbeFailure};
pub use resolver::{resolve, Resolver};
pub use routes::{generate_routes, ResolvedRoute, ResolverSet, ResolverTemplate};
