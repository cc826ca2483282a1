use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::fmt;

pub const RECENT_ALERTS_CAPACITY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertChannel {
    Telegram,
    Email,
    Slack,
}

impl AlertChannel {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertChannel::Telegram => "telegram",
            AlertChannel::Email => "email",
            AlertChannel::Slack => "slack",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "telegram" => Some(AlertChannel::Telegram),
            "email" => Some(AlertChannel::Email),
            "slack" => Some(AlertChannel::Slack),
            _ => None,
        }
    }

    /// Parses the comma-joined column format, skipping blanks and unknown names.
    pub fn parse_list(value: &str) -> Vec<Self> {
        value.split(',').filter_map(Self::parse).collect()
    }

    pub fn join(channels: &[AlertChannel]) -> String {
        channels
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for AlertChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A CMS change as shown in the admin notification history.
///
/// `channels` only names channels that accepted the message; a channel that
/// was not configured and one that failed look the same here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertEntry {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub event: String,
    pub locale: String,
    pub channels: Vec<AlertChannel>,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Most-recent-first ring buffer of alerts kept in process memory.
#[derive(Debug)]
pub struct RecentAlerts {
    capacity: usize,
    entries: VecDeque<AlertEntry>,
}

impl RecentAlerts {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, entry: AlertEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    pub fn snapshot(&self) -> Vec<AlertEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RecentAlerts {
    fn default() -> Self {
        Self::new(RECENT_ALERTS_CAPACITY)
    }
}

/// In-memory alerts first, then durable rows, first occurrence of an id wins.
pub fn merge_recent(
    memory: Vec<AlertEntry>,
    durable: Vec<AlertEntry>,
    limit: usize,
) -> Vec<AlertEntry> {
    let mut seen = HashSet::new();
    memory
        .into_iter()
        .chain(durable)
        .filter(|alert| seen.insert(alert.id.clone()))
        .take(limit)
        .collect()
}
