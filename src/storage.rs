use crate::repo::RepositoryInfo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// A persisted webhook registration record.
///
/// Round-trips exactly through `to_json`/`from_json`: equality, hashing and
/// the serialized form all agree before and after a cycle. Branch revisions
/// live in a `BTreeMap` so the record hashes and serializes the same way
/// regardless of insertion order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct HookInfo {
    pub id: i64,
    pub url: String,
    pub correct: bool,
    #[serde(
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub last_used: Option<DateTime<Utc>>,
    pub last_branch_revisions: BTreeMap<String, String>,
    pub callback_url: String,
}

impl HookInfo {
    /// A fresh, not-yet-verified registration with no usage history.
    pub fn new(id: i64, url: impl Into<String>, callback_url: impl Into<String>) -> HookInfo {
        HookInfo {
            id,
            url: url.into(),
            correct: false,
            last_used: None,
            last_branch_revisions: BTreeMap::new(),
            callback_url: callback_url.into(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("HookInfo is always serializable")
    }

    /// Parse a stored record. Malformed input is treated as an absent hook.
    pub fn from_json(json: &str) -> Option<HookInfo> {
        match serde_json::from_str(json) {
            Ok(hook) => Some(hook),
            Err(e) => {
                debug!("discarding malformed hook record: {}", e);
                None
            }
        }
    }
}

/// Read-only view of the host's webhook persistence layer.
///
/// The host may install or remove hooks concurrently with a running report;
/// callers must treat every query as a fresh point-in-time answer.
pub trait HookStorage {
    fn get_hooks(&self, repo: &RepositoryInfo) -> HashSet<HookInfo>;
}
