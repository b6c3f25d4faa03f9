use log::{error, info, warn};
use serenity::async_trait;
use serenity::model::application::interaction::Interaction;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use songbird::SerenityInit;
use std::process;
use std::sync::Arc;

use trusty_helper::ai::{CompletionProvider, GeminiClient};
use trusty_helper::commands;
use trusty_helper::config::BotConfig;
use trusty_helper::dispatch::Dispatcher;
use trusty_helper::handlers;
use trusty_helper::health;
use trusty_helper::state::AppState;
use trusty_helper::store::PollStore;
use trusty_helper::tasks;
use trusty_helper::tasks::scheduler::Scheduler;
use trusty_helper::voting::PollController;

struct Bot {
    state: Arc<AppState>,
    dispatcher: Arc<Dispatcher>,
}

#[async_trait]
impl EventHandler for Bot {
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let state = Arc::clone(&self.state);
        let dispatcher = Arc::clone(&self.dispatcher);

        // Each interaction runs on its own task so a slow handler never blocks the gateway
        tokio::spawn(async move {
            handlers::handle_interaction(&dispatcher, state, ctx, interaction).await;
        });
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);

        if let Err(why) = handlers::register_commands(&ctx, &commands::definitions()).await {
            error!("Failed to register slash commands: {:?}", why);
        }
        info!("Bot is online and ready!");
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Error: {}", e);
            error!("Please set the environment variable with your bot token.");
            process::exit(1);
        }
    };

    let registry = match commands::build_registry() {
        Ok(registry) => registry,
        Err(e) => {
            error!("Failed to build the command registry: {}", e);
            process::exit(1);
        }
    };

    let ai: Option<Arc<dyn CompletionProvider>> = match &config.ai {
        Some(settings) => Some(Arc::new(GeminiClient::new(settings.clone()))),
        None => {
            warn!("No AI API key configured; /ask will reply with a setup notice.");
            None
        }
    };

    let store = Arc::new(PollStore::new());
    if let Some(ttl) = config.poll_ttl {
        tokio::spawn(tasks::poll_sweeper::sweep_expired_polls_task(Arc::clone(&store), ttl));
    }
    let (scheduler, _scheduler_worker) = Scheduler::start();
    tokio::spawn(health::serve(config.port));

    let token = config.token.clone();
    let state = Arc::new(AppState {
        config,
        polls: PollController::new(store),
        scheduler,
        ai,
    });

    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_VOICE_STATES;

    let mut client = match Client::builder(&token, intents)
        .event_handler(Bot {
            state,
            dispatcher: Arc::new(Dispatcher::new(registry)),
        })
        .register_songbird()
        .await
    {
        Ok(client) => client,
        Err(e) => {
            error!("Error creating client: {:?}", e);
            process::exit(1);
        }
    };

    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
    }
}
