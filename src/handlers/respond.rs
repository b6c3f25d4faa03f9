use serenity::builder::{
    CreateComponents, CreateEmbed, CreateInteractionResponseData,
    CreateInteractionResponseFollowup,
};
use serenity::model::application::component::ButtonStyle;
use serenity::utils::Colour;

use crate::reply::{ButtonView, EmbedView, ReplyPayload};

// Discord allows at most five buttons per action row.
const BUTTONS_PER_ROW: usize = 5;

pub fn build_embed(view: &EmbedView) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    if let Some(title) = &view.title {
        embed.title(title);
    }
    if let Some(description) = &view.description {
        embed.description(description);
    }
    if let Some(colour) = view.colour {
        embed.colour(Colour::new(colour));
    }
    if let Some(thumbnail) = &view.thumbnail {
        embed.thumbnail(thumbnail);
    }
    for field in &view.fields {
        embed.field(&field.name, &field.value, field.inline);
    }
    if let Some(footer) = &view.footer {
        embed.footer(|f| {
            f.text(&footer.text);
            if let Some(icon_url) = &footer.icon_url {
                f.icon_url(icon_url);
            }
            f
        });
    }
    embed
}

fn build_buttons<'a>(
    components: &'a mut CreateComponents,
    buttons: &[ButtonView],
) -> &'a mut CreateComponents {
    for row in buttons.chunks(BUTTONS_PER_ROW) {
        components.create_action_row(|action_row| {
            for button in row {
                action_row.create_button(|b| {
                    b.custom_id(&button.custom_id)
                        .label(&button.label)
                        .style(ButtonStyle::Primary)
                });
            }
            action_row
        });
    }
    components
}

pub fn apply_response<'a, 'b>(
    data: &'b mut CreateInteractionResponseData<'a>,
    payload: &ReplyPayload,
) -> &'b mut CreateInteractionResponseData<'a> {
    if let Some(content) = &payload.content {
        data.content(content);
    }
    for embed in &payload.embeds {
        data.add_embed(build_embed(embed));
    }
    if !payload.buttons.is_empty() {
        data.components(|c| build_buttons(c, &payload.buttons));
    }
    data.ephemeral(payload.ephemeral)
}

pub fn apply_followup<'a, 'b>(
    message: &'b mut CreateInteractionResponseFollowup<'a>,
    payload: &ReplyPayload,
) -> &'b mut CreateInteractionResponseFollowup<'a> {
    if let Some(content) = &payload.content {
        message.content(content);
    }
    for embed in &payload.embeds {
        message.add_embed(build_embed(embed));
    }
    if !payload.buttons.is_empty() {
        message.components(|c| build_buttons(c, &payload.buttons));
    }
    message.ephemeral(payload.ephemeral)
}
