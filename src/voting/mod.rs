use log::{info, warn};
use std::sync::Arc;

use crate::error::PollError;
use crate::interaction::poll_custom_id;
use crate::models::{PollId, PollSnapshot};
use crate::reply::{ButtonView, ComponentOutcome, EmbedView, ReplyPayload};
use crate::store::PollStore;

pub const POLL_COLOUR: u32 = 0x00FFFF;
pub const ALREADY_VOTED_NOTICE: &str = "You have already voted in this poll!";
pub const VOTE_FAILED_NOTICE: &str = "Sorry, that vote could not be recorded.";

/// Publishes polls and turns button clicks into store updates.
#[derive(Debug, Clone)]
pub struct PollController {
    store: Arc<PollStore>,
}

impl PollController {
    pub fn new(store: Arc<PollStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<PollStore> {
        &self.store
    }

    /// Creates the poll and renders the message carrying its vote buttons.
    pub fn publish(
        &self,
        question: &str,
        options: Vec<String>,
    ) -> Result<ReplyPayload, PollError> {
        let snapshot = self.store.create_poll(question, options)?;
        Ok(render(&snapshot))
    }

    pub fn handle_vote_action(
        &self,
        poll_id: &PollId,
        voter_id: u64,
        label: &str,
    ) -> ComponentOutcome {
        if let Err(e) = self.store.register_vote(poll_id, voter_id, label) {
            return rejection(e);
        }

        match self.store.snapshot(poll_id) {
            Ok(snapshot) => {
                info!(
                    "Poll {} now has {} vote(s)",
                    poll_id,
                    snapshot.total_votes()
                );
                ComponentOutcome::UpdateMessage(render(&snapshot))
            }
            Err(e) => rejection(e),
        }
    }
}

fn rejection(error: PollError) -> ComponentOutcome {
    match error {
        PollError::AlreadyVoted { .. } => {
            ComponentOutcome::Notice(ReplyPayload::private(ALREADY_VOTED_NOTICE))
        }
        other => {
            warn!("Rejected poll vote: {}", other);
            ComponentOutcome::Notice(ReplyPayload::private(VOTE_FAILED_NOTICE))
        }
    }
}

pub fn render(snapshot: &PollSnapshot) -> ReplyPayload {
    let description: String = snapshot
        .options
        .iter()
        .map(|option| format!("{}: {} votes\n", option.label, option.votes))
        .collect();

    let embed = EmbedView {
        title: Some(format!("📊 {}", snapshot.question)),
        description: Some(description),
        colour: Some(POLL_COLOUR),
        ..EmbedView::default()
    };

    let buttons = snapshot
        .options
        .iter()
        .map(|option| ButtonView {
            custom_id: poll_custom_id(&snapshot.id, &option.label),
            label: option.label.clone(),
        })
        .collect();

    ReplyPayload::embed(embed).with_buttons(buttons)
}
