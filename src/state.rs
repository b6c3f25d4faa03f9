use std::sync::Arc;

use crate::ai::CompletionProvider;
use crate::config::BotConfig;
use crate::tasks::scheduler::Scheduler;
use crate::voting::PollController;

/// Long-lived services shared by every handler.
pub struct AppState {
    pub config: BotConfig,
    pub polls: PollController,
    pub scheduler: Scheduler,
    /// `None` when no AI key is configured.
    pub ai: Option<Arc<dyn CompletionProvider>>,
}
