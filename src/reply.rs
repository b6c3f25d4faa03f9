//! Platform-neutral response payloads.
//!
//! A command either answers at once (`Outcome::Immediate`) or acknowledges
//! first and answers later (`Outcome::Deferred`). The followup is an
//! `FnOnce`, so whoever owns the outcome can deliver it exactly once.

use futures::FutureExt;
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyPayload {
    pub content: Option<String>,
    pub embeds: Vec<EmbedView>,
    pub buttons: Vec<ButtonView>,
    pub ephemeral: bool,
}

impl ReplyPayload {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn private(content: impl Into<String>) -> Self {
        Self::text(content).ephemeral()
    }

    pub fn embed(embed: EmbedView) -> Self {
        Self {
            embeds: vec![embed],
            ..Self::default()
        }
    }

    pub fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }

    pub fn with_buttons(mut self, buttons: Vec<ButtonView>) -> Self {
        self.buttons = buttons;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedView {
    pub title: Option<String>,
    pub description: Option<String>,
    pub colour: Option<u32>,
    pub thumbnail: Option<String>,
    pub fields: Vec<EmbedField>,
    pub footer: Option<EmbedFooter>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedFooter {
    pub text: String,
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonView {
    pub custom_id: String,
    pub label: String,
}

/// Handed to a followup once the acknowledgement went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AckReceipt {
    pub latency: Duration,
}

pub struct Followup(Box<dyn FnOnce(AckReceipt) -> BoxFuture<'static, Vec<ReplyPayload>> + Send>);

impl Followup {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: FnOnce(AckReceipt) -> Fut + Send + 'static,
        Fut: Future<Output = Vec<ReplyPayload>> + Send + 'static,
    {
        Self(Box::new(move |receipt| f(receipt).boxed()))
    }

    pub async fn run(self, receipt: AckReceipt) -> Vec<ReplyPayload> {
        (self.0)(receipt).await
    }
}

impl fmt::Debug for Followup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Followup(..)")
    }
}

#[derive(Debug)]
pub enum Outcome {
    Immediate(ReplyPayload),
    Deferred { ephemeral: bool, followup: Followup },
}

impl Outcome {
    pub fn deferred<F, Fut>(ephemeral: bool, f: F) -> Self
    where
        F: FnOnce(AckReceipt) -> Fut + Send + 'static,
        Fut: Future<Output = Vec<ReplyPayload>> + Send + 'static,
    {
        Outcome::Deferred {
            ephemeral,
            followup: Followup::new(f),
        }
    }
}

/// Result of a button click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentOutcome {
    /// Replace the clicked message with this render.
    UpdateMessage(ReplyPayload),
    /// Answer only the clicking user; the message stays as it is.
    Notice(ReplyPayload),
}
