// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0
//! # Timestamps
//!
//! OpenStack services are not consistent in the way they render timestamps.
//! Most of them return RFC 3339 (`2022-10-07T18:56:03Z`), some use a numeric
//! offset without a colon (`2022-10-07T18:56:03+0000`) and Nova renders
//! `launched_at`/`terminated_at` without any zone information but with
//! microseconds (`2022-10-07T18:56:02.000000`). Timestamps without a zone are
//! UTC.
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Zone-less layouts, tried after RFC 3339 and the numeric offset layout.
const NAIVE_LAYOUTS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Layout with a `+hhmm` offset.
const OFFSET_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("timestamp {value:?} does not match any known layout")]
pub struct TimestampParseError {
    pub value: String,
}

/// Parse a timestamp trying every known layout in turn.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, TimestampParseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(value, OFFSET_LAYOUT) {
        return Ok(dt.with_timezone(&Utc));
    }
    for layout in NAIVE_LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, layout) {
            return Ok(dt.and_utc());
        }
    }
    Err(TimestampParseError {
        value: value.into(),
    })
}

/// Deserialize an optional timestamp. `null` and the empty string are `None`.
pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(value) if value.is_empty() => Ok(None),
        Some(value) => parse_timestamp(&value)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
