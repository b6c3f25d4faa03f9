mod platform;
mod respond;

pub use platform::{SerenityPlatform, snowflake_created_at};

use log::{error, info, warn};
use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::{Command, CommandOptionType};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::message_component::MessageComponentInteraction;
use serenity::model::application::interaction::{Interaction, InteractionResponseType};
use serenity::model::guild::Member;
use serenity::model::id::GuildId;
use serenity::model::permissions::Permissions;
use serenity::model::user::User;
use serenity::prelude::*;
use std::sync::Arc;
use std::time::Instant;

use crate::commands::{CommandDefinition, ParamKind};
use crate::dispatch::{Dispatched, Dispatcher, HandlerContext};
use crate::interaction::{Caller, Envelope, RawEvent, RawOption, decode};
use crate::reply::{AckReceipt, ComponentOutcome, Outcome};
use crate::state::AppState;
use respond::{apply_followup, apply_response};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

fn apply_definition<'a>(
    command: &'a mut CreateApplicationCommand,
    definition: &CommandDefinition,
) -> &'a mut CreateApplicationCommand {
    command.name(definition.name).description(definition.description);
    for param in &definition.params {
        let kind = match param.kind {
            ParamKind::String => CommandOptionType::String,
            ParamKind::Integer => CommandOptionType::Integer,
            ParamKind::User => CommandOptionType::User,
        };
        command.create_option(|option| {
            option
                .name(param.name)
                .description(param.description)
                .kind(kind)
                .required(param.required)
        });
    }
    if definition.admin_only {
        command.default_member_permissions(Permissions::ADMINISTRATOR);
    }
    command
}

pub async fn register_commands(
    ctx: &Context,
    definitions: &[CommandDefinition],
) -> Result<(), serenity::Error> {
    let commands = Command::set_global_application_commands(&ctx.http, |builder| {
        for definition in definitions {
            builder.create_application_command(|command| apply_definition(command, definition));
        }
        builder
    })
    .await?;

    info!("Registered {} global slash commands.", commands.len());
    Ok(())
}

fn caller_from(user: &User, member: Option<&Member>, guild_id: Option<GuildId>) -> Caller {
    Caller {
        user_id: user.id.0,
        name: user.name.clone(),
        avatar_url: Some(user.face()),
        guild_id: guild_id.map(|id| id.0),
        is_admin: member
            .and_then(|member| member.permissions)
            .is_some_and(|permissions| permissions.administrator()),
    }
}

async fn handle_command(
    dispatcher: &Dispatcher,
    handler_ctx: &HandlerContext,
    ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> HandlerResult {
    let raw = RawEvent::SlashCommand {
        name: command.data.name.clone(),
        options: command
            .data
            .options
            .iter()
            .map(|option| RawOption {
                name: option.name.clone(),
                value: option.value.clone(),
            })
            .collect(),
    };
    let event = match decode(raw) {
        Ok(event) => event,
        Err(e) => {
            warn!("Dropping command interaction: {}", e);
            return Ok(());
        }
    };
    let envelope = Envelope {
        caller: caller_from(&command.user, command.member.as_ref(), command.guild_id),
        event,
    };

    match dispatcher.dispatch(handler_ctx, envelope).await {
        Dispatched::Command(Outcome::Immediate(payload)) => {
            command
                .create_interaction_response(&ctx.http, |response| {
                    response
                        .kind(InteractionResponseType::ChannelMessageWithSource)
                        .interaction_response_data(|data| apply_response(data, &payload))
                })
                .await?;
        }
        Dispatched::Command(Outcome::Deferred { ephemeral, followup }) => {
            let started = Instant::now();
            command
                .create_interaction_response(&ctx.http, |response| {
                    response
                        .kind(InteractionResponseType::DeferredChannelMessageWithSource)
                        .interaction_response_data(|data| data.ephemeral(ephemeral))
                })
                .await?;
            let receipt = AckReceipt {
                latency: started.elapsed(),
            };

            for payload in followup.run(receipt).await {
                command
                    .create_followup_message(&ctx.http, |message| apply_followup(message, &payload))
                    .await?;
            }
        }
        Dispatched::Component(_) => {
            error!("Command `{}` was routed as a component action", command.data.name);
        }
    }
    Ok(())
}

async fn handle_component(
    dispatcher: &Dispatcher,
    handler_ctx: &HandlerContext,
    ctx: &Context,
    component: &MessageComponentInteraction,
) -> HandlerResult {
    let custom_id = &component.data.custom_id;
    info!("Received component interaction: {}", custom_id);

    let event = match decode(RawEvent::Component {
        custom_id: custom_id.clone(),
    }) {
        Ok(event) => event,
        Err(e) => {
            warn!("Dropping component interaction: {}", e);
            return Ok(());
        }
    };
    let envelope = Envelope {
        caller: caller_from(&component.user, component.member.as_ref(), component.guild_id),
        event,
    };

    let (kind, payload) = match dispatcher.dispatch(handler_ctx, envelope).await {
        Dispatched::Component(ComponentOutcome::UpdateMessage(payload)) => {
            (InteractionResponseType::UpdateMessage, payload)
        }
        Dispatched::Component(ComponentOutcome::Notice(payload)) => {
            (InteractionResponseType::ChannelMessageWithSource, payload)
        }
        Dispatched::Command(_) => {
            error!("Component `{}` was routed as a command", custom_id);
            return Ok(());
        }
    };

    component
        .create_interaction_response(&ctx.http, |response| {
            response
                .kind(kind)
                .interaction_response_data(|data| apply_response(data, &payload))
        })
        .await?;
    Ok(())
}

/// Entry point for every interaction. Errors end here, logged.
pub async fn handle_interaction(
    dispatcher: &Dispatcher,
    state: Arc<AppState>,
    ctx: Context,
    interaction: Interaction,
) {
    let handler_ctx = HandlerContext {
        state,
        platform: Arc::new(SerenityPlatform::new(ctx.clone())),
    };

    let result = match interaction {
        Interaction::ApplicationCommand(command) => {
            handle_command(dispatcher, &handler_ctx, &ctx, &command).await
        }
        Interaction::MessageComponent(component) => {
            handle_component(dispatcher, &handler_ctx, &ctx, &component).await
        }
        other => {
            warn!("Unhandled interaction type: {:?}", other.kind());
            Ok(())
        }
    };

    if let Err(why) = result {
        error!("Interaction handler error: {:?}", why);
    }
}
