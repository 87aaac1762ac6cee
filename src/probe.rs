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
// - probe.rs file -

use serde::Serialize;
use std::fmt;
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::agent::Fetch;
use crate::routes::ResolvedRoute;

// A resolver page embedding a player mentions at least one of these.
const PLAYER_MARKERS: [&str; 4] = ["video", "mp4", "iframe", "player"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail")]
pub enum ProbeFailure {
    HttpStatus,
    NoPlayerContent,
    Transport(String),
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HttpStatus => f.write_str("unexpected HTTP status"),
            Self::NoPlayerContent => f.write_str("no player in the response"),
            Self::Transport(reason) => write!(f, "transport error: {}", reason),
        }
    }
}

/// The outcome of one probe. Advisory only: a resolver may still fail
/// to play the video after answering well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Availability {
    Available {
        status: u16,
        elapsed: Duration,
    },
    Unavailable {
        status: Option<u16>,
        reason: ProbeFailure,
    },
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available { status, elapsed } => {
                write!(f, "available (HTTP {}, {} ms)", status, elapsed.as_millis())
            }
            Self::Unavailable {
                status: Some(status),
                reason,
            } => write!(f, "unavailable (HTTP {}): {}", status, reason),
            Self::Unavailable { status: None, reason } => write!(f, "unavailable: {}", reason),
        }
    }
}

/// Makes one GET request to <route> and checks for a player.
pub fn probe(route: &ResolvedRoute, agent: &dyn Fetch) -> Availability {
    let started = Instant::now();

    let page = match agent.fetch(&route.url) {
        Ok(page) => page,
        Err(e) => {
            debug!("probe {}: {}", route.name, e);
            return Availability::Unavailable {
                status: None,
                reason: ProbeFailure::Transport(e.to_string()),
            };
        }
    };

    let elapsed = started.elapsed();
    debug!("probe {}: HTTP {} after {:?}", route.name, page.status, elapsed);

    if !page.is_success() {
        return Availability::Unavailable {
            status: Some(page.status),
            reason: ProbeFailure::HttpStatus,
        };
    }

    let body = page.body.to_lowercase();
    if PLAYER_MARKERS.iter().any(|marker| body.contains(marker)) {
        Availability::Available {
            status: page.status,
            elapsed,
        }
    } else {
        Availability::Unavailable {
            status: Some(page.status),
            reason: ProbeFailure::NoPlayerContent,
        }
    }
}

/// Probes all <routes> at once, one thread each. Results come back in
/// route order. <on_done> is called from the probing threads as each
/// probe finishes.
pub fn probe_all<F>(routes: &[ResolvedRoute], agent: &dyn Fetch, on_done: F) -> Vec<Availability>
where
    F: Fn(&ResolvedRoute, &Availability) + Sync,
{
    let on_done = &on_done;

    thread::scope(|scope| {
        let handles: Vec<_> = routes
            .iter()
            .map(|route| {
                scope.spawn(move || {
                    let availability = probe(route, agent);
                    on_done(route, &availability);
                    availability
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle.join().unwrap_or_else(|_| Availability::Unavailable {
                    status: None,
                    reason: ProbeFailure::Transport("probe thread panicked".to_string()),
                })
            })
            .collect()
    })
}
