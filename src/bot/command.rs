//! The `/voicerooms` admin command.
//!
//! Registration builder, option parsing into `AdminCommand`, and the text of each reply.
//! Execution lives in the interaction handler.

use serenity::all::{
    CommandOptionType, CreateCommand, CreateCommandOption, Mentionable, Permissions,
    ResolvedOption, ResolvedValue, RoleId,
};

use crate::model::room::{RoomStats, SweepReport};

/// Name of the admin command.
pub const NAME: &str = "voicerooms";

/// Parsed `/voicerooms` invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminCommand {
    /// `allow add <role>`
    AllowAdd(RoleId),
    /// `allow remove <role>`
    AllowRemove(RoleId),
    /// `allow list`
    AllowList,
    /// `sweep`
    Sweep,
    /// `status`
    Status,
}

/// Builds the command registration, visible only to members who can manage channels.
pub fn register() -> CreateCommand {
    let role_option = || {
        CreateCommandOption::new(CommandOptionType::Role, "role", "Role to change")
            .required(true)
    };

    let allow = CreateCommandOption::new(
        CommandOptionType::SubCommandGroup,
        "allow",
        "Manage which roles may create voice rooms",
    )
    .add_sub_option(
        CreateCommandOption::new(
            CommandOptionType::SubCommand,
            "add",
            "Allow a role to create voice rooms",
        )
        .add_sub_option(role_option()),
    )
    .add_sub_option(
        CreateCommandOption::new(
            CommandOptionType::SubCommand,
            "remove",
            "Stop allowing a role to create voice rooms",
        )
        .add_sub_option(role_option()),
    )
    .add_sub_option(CreateCommandOption::new(
        CommandOptionType::SubCommand,
        "list",
        "Show the roles allowed to create voice rooms",
    ));

    CreateCommand::new(NAME)
        .description("Manage dynamic voice rooms")
        .default_member_permissions(Permissions::MANAGE_CHANNELS)
        .add_option(allow)
        .add_option(CreateCommandOption::new(
            CommandOptionType::SubCommand,
            "sweep",
            "Delete every managed room that is currently empty",
        ))
        .add_option(CreateCommandOption::new(
            CommandOptionType::SubCommand,
            "status",
            "Show managed room counts",
        ))
}

impl AdminCommand {
    /// Parses the resolved options of a `/voicerooms` interaction.
    pub fn from_options(options: &[ResolvedOption<'_>]) -> Option<Self> {
        let [option] = options else {
            return None;
        };

        match &option.value {
            ResolvedValue::SubCommandGroup(subcommands) => {
                let [subcommand] = subcommands.as_slice() else {
                    return None;
                };
                let ResolvedValue::SubCommand(arguments) = &subcommand.value else {
                    return None;
                };

                let role_id = arguments.iter().find_map(|argument| match &argument.value {
                    ResolvedValue::Role(role) if argument.name == "role" => Some(role.id),
                    _ => None,
                });

                Self::from_parts(Some(option.name), subcommand.name, role_id)
            }
            ResolvedValue::SubCommand(_) => Self::from_parts(None, option.name, None),
            _ => None,
        }
    }

    /// Maps a subcommand path to a command.
    ///
    /// # Arguments
    /// - `group` - Subcommand group, if any
    /// - `subcommand` - Subcommand name
    /// - `role_id` - The `role` argument, required by `allow add` and `allow remove`
    pub fn from_parts(
        group: Option<&str>,
        subcommand: &str,
        role_id: Option<RoleId>,
    ) -> Option<Self> {
        match (group, subcommand) {
            (Some("allow"), "add") => role_id.map(Self::AllowAdd),
            (Some("allow"), "remove") => role_id.map(Self::AllowRemove),
            (Some("allow"), "list") => Some(Self::AllowList),
            (None, "sweep") => Some(Self::Sweep),
            (None, "status") => Some(Self::Status),
            _ => None,
        }
    }
}

pub fn allow_added_reply(role_id: RoleId, added: bool) -> String {
    if added {
        format!("{} can now create voice rooms.", role_id.mention())
    } else {
        format!("{} is already allowed.", role_id.mention())
    }
}

pub fn allow_removed_reply(role_id: RoleId, removed: bool, remaining: usize) -> String {
    match (removed, remaining) {
        (false, _) => format!("{} was not in the allow-list.", role_id.mention()),
        (true, 0) => format!(
            "{} removed. The allow-list is now empty, so everyone can create voice rooms.",
            role_id.mention()
        ),
        (true, _) => format!("{} can no longer create voice rooms.", role_id.mention()),
    }
}

pub fn allow_list_reply(roles: &[RoleId]) -> String {
    if roles.is_empty() {
        return "No allow-list configured, everyone can create voice rooms.".to_string();
    }

    let mentions: Vec<String> = roles
        .iter()
        .map(|role_id| role_id.mention().to_string())
        .collect();

    format!("Roles allowed to create voice rooms: {}", mentions.join(", "))
}

pub fn sweep_reply(report: &SweepReport) -> String {
    let mut reply = format!(
        "Reclaimed {} empty room(s), {} still occupied.",
        report.reclaimed.len(),
        report.occupied
    );

    if !report.dangling.is_empty() {
        reply.push_str(&format!(
            " Could not delete {} empty room(s); they are no longer tracked and must be removed manually.",
            report.dangling.len()
        ));
    }

    if report.failed > 0 {
        reply.push_str(&format!(
            " Could not check {} room(s), see the bot logs.",
            report.failed
        ));
    }

    reply
}

pub fn status_reply(stats: &RoomStats) -> String {
    if stats.total == 0 {
        return "No managed voice rooms.".to_string();
    }

    let mut reply = format!("{} managed voice room(s):", stats.total);
    for (label, count) in &stats.per_role {
        reply.push_str(&format!("\n- {}: {}", label, count));
    }

    reply
}
