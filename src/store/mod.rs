//! In-memory poll storage.
//!
//! Each poll sits behind its own `RwLock`, and the map only hands out
//! `Arc` clones of those locks. Votes on different polls therefore never
//! contend, while votes on the same poll are serialized by the write lock.
//! Guards are `parking_lot` guards and are never held across an `.await`.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use log::{debug, info};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;

use crate::error::PollError;
use crate::models::{
    MAX_OPTION_LABEL_CHARS, MAX_POLL_OPTIONS, MIN_POLL_OPTIONS, Poll, PollId, PollSnapshot,
};

#[derive(Debug, Default)]
pub struct PollStore {
    polls: DashMap<PollId, Arc<RwLock<Poll>>>,
}

impl PollStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the labels and inserts a fully initialized poll.
    pub fn create_poll(
        &self,
        question: impl Into<String>,
        labels: Vec<String>,
    ) -> Result<PollSnapshot, PollError> {
        validate_labels(&labels)?;

        let poll = Poll::new(question.into(), labels);
        let snapshot = poll.snapshot();
        // The poll is complete before it is published to the map.
        self.polls
            .insert(poll.id.clone(), Arc::new(RwLock::new(poll)));

        info!(
            "Created poll {} with {} options",
            snapshot.id,
            snapshot.options.len()
        );
        Ok(snapshot)
    }

    pub fn register_vote(
        &self,
        poll_id: &PollId,
        voter_id: u64,
        label: &str,
    ) -> Result<(), PollError> {
        let poll = self.entry(poll_id)?;
        let mut poll = poll.write();

        if poll.voters.contains(&voter_id) {
            return Err(PollError::AlreadyVoted {
                poll_id: poll_id.clone(),
                voter_id,
            });
        }

        let option = poll
            .options
            .iter_mut()
            .find(|option| option.label == label)
            .ok_or_else(|| PollError::UnknownOption {
                poll_id: poll_id.clone(),
                label: label.to_string(),
            })?;
        option.votes += 1;
        poll.voters.insert(voter_id);

        debug!("Recorded vote from {} on poll {}", voter_id, poll_id);
        Ok(())
    }

    pub fn snapshot(&self, poll_id: &PollId) -> Result<PollSnapshot, PollError> {
        let poll = self.entry(poll_id)?;
        let snapshot = poll.read().snapshot();
        Ok(snapshot)
    }

    /// Removes every poll created before `cutoff`, returning how many went.
    pub fn prune_created_before(&self, cutoff: DateTime<Utc>) -> usize {
        let before = self.polls.len();
        self.polls.retain(|_, poll| poll.read().created_at >= cutoff);
        before.saturating_sub(self.polls.len())
    }

    pub fn len(&self) -> usize {
        self.polls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polls.is_empty()
    }

    // Clones the Arc out so the shard lock is released before the poll lock is taken.
    fn entry(&self, poll_id: &PollId) -> Result<Arc<RwLock<Poll>>, PollError> {
        self.polls
            .get(poll_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| PollError::PollNotFound(poll_id.clone()))
    }
}

fn validate_labels(labels: &[String]) -> Result<(), PollError> {
    if labels.len() < MIN_POLL_OPTIONS || labels.len() > MAX_POLL_OPTIONS {
        return Err(PollError::InvalidOptionCount(labels.len()));
    }

    let mut seen = HashSet::new();
    for label in labels {
        if label.trim().is_empty() {
            return Err(PollError::InvalidOption {
                label: label.clone(),
                reason: "options cannot be blank".to_string(),
            });
        }
        if label.chars().count() > MAX_OPTION_LABEL_CHARS {
            return Err(PollError::InvalidOption {
                label: label.clone(),
                reason: format!("options are limited to {} characters", MAX_OPTION_LABEL_CHARS),
            });
        }
        if !seen.insert(label.as_str()) {
            return Err(PollError::DuplicateOption(label.clone()));
        }
    }
    Ok(())
}
