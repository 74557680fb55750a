//! Posts as returned by the liveblog API.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Point in time of a post modification (`_updated`).
///
/// The API has emitted several date layouts over time, all of them accepted
/// here:
///
/// - RFC 3339: `2020-01-02T10:00:00+00:00`, `2020-01-02T10:00:00Z`
/// - Superdesk: `2020-01-02T10:00:00+0000`, `2020-01-02T10:00:00.123+0000`
/// - RFC 1123: `Thu, 02 Jan 2020 10:00:00 GMT`
/// - naive date-time or bare date, read as UTC: `2020-01-02`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Wrap a UTC date-time.
    pub fn new(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }

    /// The underlying UTC date-time.
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Parse a timestamp in any of the accepted layouts.
    pub fn parse(value: &str) -> Result<Self> {
        value.parse()
    }
}

impl FromStr for Timestamp {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let s = value.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self(dt.with_timezone(&Utc)));
        }
        if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
            return Ok(Self(dt.with_timezone(&Utc)));
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
            return Ok(Self(dt.with_timezone(&Utc)));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
            return Ok(Self(naive.and_utc()));
        }
        if let Some(naive) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
        {
            return Ok(Self(naive.and_utc()));
        }
        Err(Error::timestamp(value, "unrecognized date layout"))
    }
}

/// Formats as RFC 3339 in UTC with second precision, the layout update
/// queries send to the API.
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<Timestamp>, D::Error> {
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match raw.parse() {
        Ok(timestamp) => Ok(Some(timestamp)),
        Err(e) => {
            tracing::warn!(target: crate::logging::targets::UPDATES, error = %e, "ignoring post timestamp");
            Ok(None)
        }
    }
}

/// Publication status of a post.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    /// Published and visible in the embed.
    Open,
    /// Withdrawn to the editors' drafts.
    Draft,
    /// Waiting for editor approval.
    Submitted,
    /// Any status this client does not know about.
    #[default]
    #[serde(other)]
    Other,
}

/// A liveblog post.
///
/// Only the fields pagination and reconciliation depend on are typed; the
/// rest of the document (items, groups, authorship, ...) is kept in
/// [`Post::extra`] untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Unique identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Last modification time. An unreadable value is dropped, so the post
    /// is still listed but never moves the watermark.
    #[serde(
        rename = "_updated",
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated: Option<Timestamp>,
    /// Soft-delete flag.
    #[serde(default)]
    pub deleted: bool,
    /// Publication status.
    #[serde(default)]
    pub post_status: PostStatus,
    /// Display position; higher values come first in the server's ordering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<f64>,
    /// Remaining fields of the document.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Post {
    /// An open post with no timestamp and no order.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            updated: None,
            deleted: false,
            post_status: PostStatus::Open,
            order: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Set the display order.
    pub fn with_order(mut self, order: f64) -> Self {
        self.order = Some(order);
        self
    }

    /// Set the last modification time.
    pub fn with_updated(mut self, updated: Timestamp) -> Self {
        self.updated = Some(updated);
        self
    }

    /// Set the publication status.
    pub fn with_status(mut self, status: PostStatus) -> Self {
        self.post_status = status;
        self
    }

    /// Mark the post as deleted.
    pub fn deleted(mut self) -> Self {
        self.deleted = true;
        self
    }

    /// Whether the post belongs in the feed: published and not deleted.
    pub fn is_active(&self) -> bool {
        !self.deleted && self.post_status == PostStatus::Open
    }

    /// Whether a cached copy of this post must leave the feed.
    pub fn is_withdrawn(&self) -> bool {
        self.deleted || self.post_status == PostStatus::Draft
    }
}

/// Most recent `_updated` among `posts`.
pub fn newest_update<'a>(posts: impl IntoIterator<Item = &'a Post>) -> Option<Timestamp> {
    posts.into_iter().filter_map(|post| post.updated).max()
}
