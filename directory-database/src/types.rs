//! Shared types for the directory store.
use chrono::{DateTime, SecondsFormat, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Key of a stored document. Wraps the store's native ObjectId so a
/// malformed identifier is rejected before any query is issued.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ResourceKey(ObjectId);

impl ResourceKey {
    /// Mint a fresh key, as the store would on insert.
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    pub fn as_object_id(&self) -> ObjectId {
        self.0
    }
}

impl FromStr for ResourceKey {
    type Err = mongodb::bson::oid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s).map(Self)
    }
}

impl From<ObjectId> for ResourceKey {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl Display for ResourceKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

/// Canonical wire format for server-stamped timestamps.
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A comment embedded in a blog document.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    pub author: String,
    pub text: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl Comment {
    /// Build a fresh comment with a server-assigned id and timestamp.
    pub fn new(author: String, text: String, at: DateTime<Utc>) -> Self {
        Self {
            id: ObjectId::new().to_hex(),
            author,
            text,
            created_at: timestamp(at),
        }
    }
}

/// Reactions accepted on a blog entry.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LikeAction {
    Like,
    Unlike,
}

pub struct ParseActionError;

impl FromStr for LikeAction {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(Self::Like),
            "unlike" => Ok(Self::Unlike),
            _ => Err(ParseActionError),
        }
    }
}

/// Workflow states of a disaster report.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReportStatus {
    Pending,
    InProgress,
    Resolved,
    Rejected,
}

pub struct ParseStatusError;

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Resolved => "resolved",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for ReportStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in-progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseStatusError),
        }
    }
}

/// A pagination window requested by a client. Pages are 1-based.
#[derive(Clone, Copy, Debug)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Build a window from raw query values. Absent, non-numeric and
    /// zero values fall back to page 1 with 10 items.
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: parse_positive(page).unwrap_or(1),
            limit: parse_positive(limit).unwrap_or(10),
        }
    }

    pub fn skip(&self) -> u64 {
        (self.page - 1) * self.limit
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|value| value.parse().ok()).filter(|n| *n >= 1)
}

/// One page of documents plus the counts needed to render a pager.
#[derive(Debug, Serialize)]
pub struct Page {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
    pub items: Vec<Value>,
}

impl Page {
    pub fn new(total: u64, request: PageRequest, items: Vec<Value>) -> Self {
        Self {
            total,
            page: request.page,
            limit: request.limit,
            total_pages: total.div_ceil(request.limit),
            items,
        }
    }
}
