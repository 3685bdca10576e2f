//! Interaction handler for the `/voicerooms` admin command.
//!
//! Replies are ephemeral. The response is deferred first since a sweep issues one platform call
//! per managed room and may outlast Discord's initial response window.

use serenity::all::{
    CommandInteraction, Context, CreateInteractionResponse, CreateInteractionResponseMessage,
    EditInteractionResponse, Interaction,
};

use crate::{
    bot::command::{self, AdminCommand},
    service::{admin::AdminService, room::VoiceRoomService},
    state::BotState,
};

/// Handles the interaction_create event, ignoring everything but `/voicerooms`.
pub async fn handle_interaction_create(state: &BotState, ctx: Context, interaction: Interaction) {
    let Interaction::Command(interaction) = interaction else {
        return;
    };

    if interaction.data.name != command::NAME {
        return;
    }

    if interaction.guild_id.is_none() {
        reply_immediately(&ctx, &interaction, "This command can only be used in a server.").await;
        return;
    }

    let parsed = AdminCommand::from_options(&interaction.data.options());
    let Some(admin_command) = parsed else {
        tracing::warn!(
            "Unrecognized /{} invocation from {}",
            command::NAME,
            interaction.user.id
        );
        reply_immediately(&ctx, &interaction, "Unknown subcommand.").await;
        return;
    };

    if let Err(e) = interaction.defer_ephemeral(&ctx.http).await {
        tracing::error!("Failed to defer /{} response: {:?}", command::NAME, e);
        return;
    }

    tracing::info!(
        "{} ({}) ran /{} {:?}",
        interaction.user.name,
        interaction.user.id,
        command::NAME,
        admin_command
    );

    let reply = execute(state, &ctx, admin_command).await;

    if let Err(e) = interaction
        .edit_response(&ctx.http, EditInteractionResponse::new().content(reply))
        .await
    {
        tracing::error!("Failed to send /{} response: {:?}", command::NAME, e);
    }
}

async fn execute(state: &BotState, ctx: &Context, admin_command: AdminCommand) -> String {
    let admin = AdminService::new(&state.registry, &state.policy);

    match admin_command {
        AdminCommand::AllowAdd(role_id) => {
            let added = admin.allow_role(role_id).await;
            command::allow_added_reply(role_id, added)
        }
        AdminCommand::AllowRemove(role_id) => {
            let removed = admin.disallow_role(role_id).await;
            let remaining = admin.allowed_roles().await.len();
            command::allow_removed_reply(role_id, removed, remaining)
        }
        AdminCommand::AllowList => command::allow_list_reply(&admin.allowed_roles().await),
        AdminCommand::Sweep => {
            let (platform, notifier) = state.collaborators(ctx);
            let report = VoiceRoomService::new(
                &platform,
                &notifier,
                &state.registry,
                &state.policy,
                &state.rooms,
            )
            .sweep()
            .await;
            command::sweep_reply(&report)
        }
        AdminCommand::Status => command::status_reply(&admin.stats().await),
    }
}

async fn reply_immediately(ctx: &Context, interaction: &CommandInteraction, content: &str) {
    let response = CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(content)
            .ephemeral(true),
    );

    if let Err(e) = interaction.create_response(&ctx.http, response).await {
        tracing::error!("Failed to respond to /{}: {:?}", command::NAME, e);
    }
}
