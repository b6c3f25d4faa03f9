use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

pub const MIN_POLL_OPTIONS: usize = 2;
pub const MAX_POLL_OPTIONS: usize = 4;
// "poll:" + 32 hex digits + ":" + label must stay within the 100 character custom id limit
pub const MAX_OPTION_LABEL_CHARS: usize = 62;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PollId(String);

impl PollId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PollId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PollId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for PollId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    pub label: String,
    pub votes: u32,
}

/// Live poll state. Only the store hands out mutable access, and only
/// while holding the poll's lock.
#[derive(Debug, Clone)]
pub struct Poll {
    pub id: PollId,
    pub question: String,
    pub options: Vec<PollOption>,
    pub voters: HashSet<u64>,
    pub created_at: DateTime<Utc>,
}

impl Poll {
    pub fn new(question: String, labels: Vec<String>) -> Self {
        let options = labels
            .into_iter()
            .map(|label| PollOption { label, votes: 0 })
            .collect();

        Self {
            id: PollId::generate(),
            question,
            options,
            voters: HashSet::new(),
            created_at: Utc::now(),
        }
    }

    pub fn snapshot(&self) -> PollSnapshot {
        PollSnapshot {
            id: self.id.clone(),
            question: self.question.clone(),
            options: self.options.clone(),
            voter_count: self.voters.len(),
        }
    }
}

/// Immutable copy of a poll taken under its lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollSnapshot {
    pub id: PollId,
    pub question: String,
    pub options: Vec<PollOption>,
    pub voter_count: usize,
}

impl PollSnapshot {
    pub fn total_votes(&self) -> u32 {
        self.options.iter().map(|option| option.votes).sum()
    }

    pub fn votes_for(&self, label: &str) -> Option<u32> {
        self.options
            .iter()
            .find(|option| option.label == label)
            .map(|option| option.votes)
    }
}
