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
// - utils.rs file -

/// Rendered instead of "00:00" when the duration is not known.
pub const UNKNOWN_DURATION: &str = "unknown";

/// Renders seconds as `HH:MM:SS` (one hour or more) or `MM:SS`.
pub fn format_duration(seconds: u64) -> String {
    if seconds == 0 {
        return UNKNOWN_DURATION.to_string();
    }

    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let seconds = seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Trims a page title and removes one trailing site decoration
/// such as " - 腾讯视频".
pub fn normalize_title(raw: &str, suffixes: &[&str]) -> String {
    let title = raw.trim();

    for suffix in suffixes {
        if let Some(stripped) = title.strip_suffix(suffix) {
            return stripped.trim().to_string();
        }
    }

    title.to_string()
}
