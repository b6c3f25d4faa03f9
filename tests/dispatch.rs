mod common;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use common::{FixedCompletion, MockPlatform, OWNER_ID, caller, command, context};
use trusty_helper::ai::{Completion, CompletionProvider};
use trusty_helper::commands::build_registry;
use trusty_helper::dispatch::{
    CommandHandler, CommandRegistry, Dispatched, Dispatcher, HANDLER_FAILED_NOTICE, HandlerContext,
    Invocation, UNKNOWN_COMMAND_NOTICE,
};
use trusty_helper::error::BotError;
use trusty_helper::interaction::{ArgValue, Args, Envelope, RawEvent, decode};
use trusty_helper::reply::{AckReceipt, ComponentOutcome, Outcome, ReplyPayload};
use trusty_helper::voting::ALREADY_VOTED_NOTICE;

fn immediate(dispatched: Dispatched) -> ReplyPayload {
    match dispatched {
        Dispatched::Command(Outcome::Immediate(payload)) => payload,
        other => panic!("expected an immediate reply, got {other:?}"),
    }
}

fn text(args: &[(&str, &str)]) -> Args {
    args.iter().fold(Args::new(), |args, (name, value)| {
        args.with(*name, ArgValue::Text(value.to_string()))
    })
}

#[tokio::test]
async fn unknown_command_gets_an_ephemeral_notice() {
    let ctx = context(Arc::new(MockPlatform::default()), None);
    let dispatcher = Dispatcher::new(build_registry().unwrap());

    let reply = immediate(
        dispatcher
            .dispatch(&ctx, command(caller(1), "dance", Args::new()))
            .await,
    );
    assert_eq!(reply.content.as_deref(), Some(UNKNOWN_COMMAND_NOTICE));
    assert!(reply.ephemeral);
}

#[tokio::test]
async fn leave_by_id_is_refused_for_non_owners() {
    let platform = Arc::new(MockPlatform::default().with_guild(555, "Rust Club"));
    let ctx = context(Arc::clone(&platform), None);
    let dispatcher = Dispatcher::new(build_registry().unwrap());

    let reply = immediate(
        dispatcher
            .dispatch(
                &ctx,
                command(caller(7), "leave-by-id", text(&[("server_id", "555")])),
            )
            .await,
    );
    assert_eq!(
        reply.content.as_deref(),
        Some("❌ You do not have permission to use this command.")
    );
    assert!(platform.left.lock().is_empty());
}

#[tokio::test]
async fn leave_by_id_leaves_known_guilds_for_the_owner() {
    let platform = Arc::new(MockPlatform::default().with_guild(555, "Rust Club"));
    let ctx = context(Arc::clone(&platform), None);
    let dispatcher = Dispatcher::new(build_registry().unwrap());

    let reply = immediate(
        dispatcher
            .dispatch(
                &ctx,
                command(caller(OWNER_ID), "leave-by-id", text(&[("server_id", "555")])),
            )
            .await,
    );
    assert_eq!(
        reply.content.as_deref(),
        Some("✅ Successfully left the server: Rust Club")
    );
    assert_eq!(*platform.left.lock(), vec![555]);

    let reply = immediate(
        dispatcher
            .dispatch(
                &ctx,
                command(caller(OWNER_ID), "leave-by-id", text(&[("server_id", "abc")])),
            )
            .await,
    );
    assert_eq!(
        reply.content.as_deref(),
        Some("❌ I am not in a server with the ID: abc")
    );
}

#[tokio::test]
async fn leave_requires_admin() {
    let platform = Arc::new(MockPlatform::default());
    let ctx = context(Arc::clone(&platform), None);
    let dispatcher = Dispatcher::new(build_registry().unwrap());

    let reply = immediate(
        dispatcher
            .dispatch(&ctx, command(caller(7), "leave", Args::new()))
            .await,
    );
    assert!(reply.ephemeral);
    assert!(platform.left.lock().is_empty());

    let mut admin = caller(8);
    admin.is_admin = true;
    let reply = immediate(dispatcher.dispatch(&ctx, command(admin, "leave", Args::new())).await);
    assert_eq!(reply.content.as_deref(), Some("I'm leaving now, goodbye!"));
    assert_eq!(*platform.left.lock(), vec![common::GUILD_ID]);
}

struct Exploding;

#[async_trait]
impl CommandHandler for Exploding {
    async fn handle(&self, _ctx: &HandlerContext, _inv: &Invocation) -> Result<Outcome, BotError> {
        panic!("handler blew up");
    }
}

#[tokio::test]
async fn a_panicking_handler_is_contained() {
    let ctx = context(Arc::new(MockPlatform::default()), None);
    let mut registry = build_registry().unwrap();
    registry.register("boom", Arc::new(Exploding)).unwrap();
    let dispatcher = Dispatcher::new(registry);

    let reply = immediate(
        dispatcher
            .dispatch(&ctx, command(caller(1), "boom", Args::new()))
            .await,
    );
    assert_eq!(reply.content.as_deref(), Some(HANDLER_FAILED_NOTICE));
    assert!(reply.ephemeral);

    // The dispatcher keeps serving afterwards.
    let reply = immediate(
        dispatcher
            .dispatch(&ctx, command(caller(1), "say", text(&[("content", "still here")])))
            .await,
    );
    assert_eq!(reply.content.as_deref(), Some("still here"));
}

#[test]
fn duplicate_registration_is_an_error() {
    let mut registry = CommandRegistry::new();
    registry.register("boom", Arc::new(Exploding)).unwrap();
    assert!(matches!(
        registry.register("boom", Arc::new(Exploding)),
        Err(BotError::DuplicateCommand(name)) if name == "boom"
    ));
}

#[tokio::test]
async fn poll_published_then_voted_through_buttons() {
    let ctx = context(Arc::new(MockPlatform::default()), None);
    let dispatcher = Dispatcher::new(build_registry().unwrap());

    let published = immediate(
        dispatcher
            .dispatch(
                &ctx,
                command(
                    caller(1),
                    "poll",
                    text(&[("question", "Lunch?"), ("option1", "Pizza"), ("option2", "Sushi")]),
                ),
            )
            .await,
    );
    assert!(!published.ephemeral);
    assert_eq!(published.buttons.len(), 2);
    let pizza = published.buttons[0].custom_id.clone();

    let click = |user_id| Envelope {
        caller: caller(user_id),
        event: decode(RawEvent::Component {
            custom_id: pizza.clone(),
        })
        .unwrap(),
    };

    match dispatcher.dispatch(&ctx, click(2)).await {
        Dispatched::Component(ComponentOutcome::UpdateMessage(render)) => {
            let description = render.embeds[0].description.clone().unwrap_or_default();
            assert!(description.contains("Pizza: 1 votes"));
            assert!(description.contains("Sushi: 0 votes"));
        }
        other => panic!("expected an update, got {other:?}"),
    }

    match dispatcher.dispatch(&ctx, click(2)).await {
        Dispatched::Component(ComponentOutcome::Notice(notice)) => {
            assert_eq!(notice.content.as_deref(), Some(ALREADY_VOTED_NOTICE));
            assert!(notice.ephemeral);
        }
        other => panic!("expected a notice, got {other:?}"),
    }
}

#[tokio::test]
async fn poll_with_duplicate_options_is_rejected() {
    let ctx = context(Arc::new(MockPlatform::default()), None);
    let dispatcher = Dispatcher::new(build_registry().unwrap());

    let reply = immediate(
        dispatcher
            .dispatch(
                &ctx,
                command(
                    caller(1),
                    "poll",
                    text(&[("question", "Lunch?"), ("option1", "Pizza"), ("option2", "Pizza")]),
                ),
            )
            .await,
    );
    assert!(reply.ephemeral);
    assert!(reply.buttons.is_empty());
    assert!(ctx.state.polls.store().is_empty());
}

#[tokio::test]
async fn long_answers_are_split_after_the_ack() {
    let answer = "a".repeat(2500);
    let provider: Arc<dyn CompletionProvider> =
        Arc::new(FixedCompletion(Completion::Text(answer.clone())));
    let ctx = context(Arc::new(MockPlatform::default()), Some(provider));
    let dispatcher = Dispatcher::new(build_registry().unwrap());

    let outcome = dispatcher
        .dispatch(&ctx, command(caller(1), "ask", text(&[("question", "Explain?")])))
        .await;
    let Dispatched::Command(Outcome::Deferred { ephemeral, followup }) = outcome else {
        panic!("ask should defer");
    };
    assert!(!ephemeral);

    let messages = followup
        .run(AckReceipt {
            latency: Duration::from_millis(5),
        })
        .await;
    assert_eq!(messages.len(), 2);
    let first = messages[0].content.clone().unwrap();
    assert!(first.starts_with("❓ **Question:**\n> Explain?\n\n🤖 **Answer:**\n"));
    let body: String = messages
        .iter()
        .map(|m| m.content.clone().unwrap())
        .collect::<String>();
    assert_eq!(body.matches('a').count(), 2500);
}

#[tokio::test]
async fn ask_without_a_key_explains_the_setup() {
    let ctx = context(Arc::new(MockPlatform::default()), None);
    let dispatcher = Dispatcher::new(build_registry().unwrap());

    let outcome = dispatcher
        .dispatch(&ctx, command(caller(1), "ask", text(&[("question", "Why?")])))
        .await;
    let Dispatched::Command(Outcome::Deferred { followup, .. }) = outcome else {
        panic!("ask should defer");
    };
    let messages = followup
        .run(AckReceipt {
            latency: Duration::ZERO,
        })
        .await;
    assert_eq!(messages.len(), 1);
    assert!(messages[0].content.as_deref().unwrap().contains("not configured"));
}

#[tokio::test]
async fn pomodoro_rejects_zero_minutes() {
    let platform = Arc::new(MockPlatform::default());
    let ctx = context(Arc::clone(&platform), None);
    let dispatcher = Dispatcher::new(build_registry().unwrap());

    let reply = immediate(
        dispatcher
            .dispatch(
                &ctx,
                command(caller(1), "pomodoro", Args::new().with("work", ArgValue::Integer(0))),
            )
            .await,
    );
    assert!(reply.ephemeral);
    assert!(reply.content.unwrap().contains("work"));
}

#[tokio::test(start_paused = true)]
async fn pomodoro_sends_both_reminders() {
    let platform = Arc::new(MockPlatform::default());
    let ctx = context(Arc::clone(&platform), None);
    let dispatcher = Dispatcher::new(build_registry().unwrap());

    let args = Args::new()
        .with("work", ArgValue::Integer(1))
        .with("break", ArgValue::Integer(2));
    let reply = immediate(dispatcher.dispatch(&ctx, command(caller(3), "pomodoro", args)).await);
    assert!(reply.content.unwrap().contains("**1 minutes**"));

    tokio::time::sleep(Duration::from_secs(61)).await;
    assert_eq!(platform.direct_messages.lock().len(), 1);

    tokio::time::sleep(Duration::from_secs(120)).await;
    let sent = platform.direct_messages.lock().clone();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].1.contains("**2-minute** break"));
    assert_eq!(sent[1], (3, "👍 Break's over! Time to get back to it.".to_string()));
}

#[tokio::test]
async fn ping_reports_the_ack_latency() {
    let ctx = context(Arc::new(MockPlatform::default()), None);
    let dispatcher = Dispatcher::new(build_registry().unwrap());

    let outcome = dispatcher
        .dispatch(&ctx, command(caller(1), "ping", Args::new()))
        .await;
    let Dispatched::Command(Outcome::Deferred { ephemeral, followup }) = outcome else {
        panic!("ping should defer");
    };
    assert!(ephemeral);
    let messages = followup
        .run(AckReceipt {
            latency: Duration::from_millis(42),
        })
        .await;
    assert_eq!(messages[0].content.as_deref(), Some("Pong! Latency is 42ms"));
}

#[tokio::test]
async fn userinfo_defaults_to_the_caller() {
    let ctx = context(Arc::new(MockPlatform::default()), None);
    let dispatcher = Dispatcher::new(build_registry().unwrap());

    let reply = immediate(
        dispatcher
            .dispatch(&ctx, command(caller(11), "userinfo", Args::new()))
            .await,
    );
    let embed = &reply.embeds[0];
    assert_eq!(embed.title.as_deref(), Some("User Info for ada"));
    let id_field = embed.fields.iter().find(|f| f.name == "User ID").unwrap();
    assert_eq!(id_field.value, "11");
    let created = embed.fields.iter().find(|f| f.name == "Account Created").unwrap();
    assert_eq!(created.value, "Apr 30, 2016");
    assert_eq!(
        embed.footer.as_ref().map(|f| f.text.as_str()),
        Some("Requested by user-11")
    );
}

#[tokio::test]
async fn join_needs_a_voice_channel() {
    let platform = Arc::new(MockPlatform::default());
    let ctx = context(Arc::clone(&platform), None);
    let dispatcher = Dispatcher::new(build_registry().unwrap());

    let reply = immediate(
        dispatcher
            .dispatch(&ctx, command(caller(5), "join", Args::new()))
            .await,
    );
    assert!(reply.ephemeral);
    assert!(platform.joined.lock().is_empty());

    platform.voice.lock().insert(
        5,
        trusty_helper::platform::VoiceChannelRef {
            channel_id: 77,
            name: "Lounge".to_string(),
        },
    );
    let reply = immediate(
        dispatcher
            .dispatch(&ctx, command(caller(5), "join", Args::new()))
            .await,
    );
    assert_eq!(reply.content.as_deref(), Some("✅ Joined `Lounge`"));
    assert_eq!(*platform.joined.lock(), vec![(common::GUILD_ID, 77)]);
}
