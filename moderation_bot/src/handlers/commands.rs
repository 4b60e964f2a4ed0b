use bot_commons::useful_methods::CommandLine;
use teloxide::types::{BotCommand, ChatId, UserId};

use crate::config::{Change, ConfigStore};

pub const COMMANDS: &[Command] = &[START, HELP, INITGROUP, BANUID, UNBANUID];

/// What a command does once it's matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Help,
    InitGroup,
    BanUid,
    UnbanUid,
}

pub struct Command {
    pub callname: &'static str,
    pub description: &'static str,
    pub action: Action,
    hidden: bool,
}

pub const START: Command = Command {
    callname: "/start",
    description: "",
    action: Action::Help,
    hidden: true,
};

pub const HELP: Command = Command {
    callname: "/help",
    description: "Show this help.",
    action: Action::Help,
    hidden: false,
};

pub const INITGROUP: Command = Command {
    callname: "/initgroup",
    description: "Enable blacklist enforcement in this group.",
    action: Action::InitGroup,
    hidden: false,
};

pub const BANUID: Command = Command {
    callname: "/banuid <uid>",
    description: "Add a user ID to the blacklist.",
    action: Action::BanUid,
    hidden: false,
};

pub const UNBANUID: Command = Command {
    callname: "/unbanuid <uid>",
    description: "Remove a user ID from the blacklist.",
    action: Action::UnbanUid,
    hidden: false,
};

impl Command {
    pub fn is_matching_callname(&self, command: &str) -> bool {
        self.callname
            .split_ascii_whitespace()
            .next()
            .is_some_and(|x| x.eq_ignore_ascii_case(command))
    }

    /// Find the command with this callname, like `/banuid`.
    pub fn find(callname: &str) -> Option<&'static Command> {
        COMMANDS.iter().find(|x| x.is_matching_callname(callname))
    }

    pub fn generate_help() -> String {
        let mut response = String::from("Commands:\n");
        for command in COMMANDS.iter().filter(|x| !x.hidden) {
            response.push('\n');
            response.push_str(command.callname);
            response.push_str(" - ");
            response.push_str(command.description);
        }
        response
    }

    pub fn generate_bot_commands() -> Vec<BotCommand> {
        let mut output = Vec::new();

        for command in COMMANDS {
            if command.hidden {
                continue;
            }
            let Some(callname) = command.callname.split_ascii_whitespace().next() else {
                continue;
            };

            // Cut off the /
            output.push(BotCommand::new(&callname[1..], command.description));
        }

        output
    }
}

/// Where a command was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandContext {
    pub sender: UserId,
    pub chat: ChatId,
    pub in_group: bool,
}

/// Run a privileged command and produce the text to reply with.
///
/// Returns [`None`] if the line is not one of our commands, or if the sender
/// is not whitelisted. Unauthorized users get no reply at all, so that the bot
/// doesn't reveal anything about itself to them.
pub async fn run_command(
    store: &ConfigStore,
    context: CommandContext,
    line: &CommandLine<'_>,
) -> Option<String> {
    let command = Command::find(line.callname())?;

    if !store.is_whitelisted(context.sender).await {
        log::info!(
            "Ignoring {} from non-whitelisted user {}",
            line.callname(),
            context.sender
        );
        return None;
    }

    let reply = match command.action {
        Action::Help => Command::generate_help(),
        Action::InitGroup => init_group(store, context).await,
        Action::BanUid => {
            let Some(uid) = parse_uid(line.params()) else {
                return Some(usage(command));
            };
            ban_uid(store, uid).await
        }
        Action::UnbanUid => {
            let Some(uid) = parse_uid(line.params()) else {
                return Some(usage(command));
            };
            unban_uid(store, uid).await
        }
    };

    Some(reply)
}

/// Parse parameters that should consist of exactly one user ID.
fn parse_uid(params: &str) -> Option<UserId> {
    let mut iter = params.split_whitespace();
    let uid = iter.next()?.parse().ok()?;
    if iter.next().is_some() {
        return None;
    }
    Some(UserId(uid))
}

fn usage(command: &Command) -> String {
    format!("Usage: {}", command.callname)
}

const SAVE_FAILED: &str = "Failed to save the config. Nothing was changed.";

async fn init_group(store: &ConfigStore, context: CommandContext) -> String {
    if !context.in_group {
        return "This command only works in groups.".to_string();
    }

    match store.allow_group(context.chat).await {
        Ok(Change::Applied) => {
            log::info!("Enabled moderation in chat {}", context.chat);
            "Moderation is now enabled in this group.".to_string()
        }
        Ok(Change::Unchanged) => "Moderation is already enabled in this group.".to_string(),
        Err(e) => {
            log::error!("Failed to allow chat {}: {e}", context.chat);
            SAVE_FAILED.to_string()
        }
    }
}

async fn ban_uid(store: &ConfigStore, uid: UserId) -> String {
    match store.ban(uid).await {
        Ok(Change::Applied) => {
            log::info!("Banned user {uid}");
            format!("User {uid} is now banned.")
        }
        Ok(Change::Unchanged) => format!("User {uid} is already banned."),
        Err(e) => {
            log::error!("Failed to ban user {uid}: {e}");
            SAVE_FAILED.to_string()
        }
    }
}

async fn unban_uid(store: &ConfigStore, uid: UserId) -> String {
    match store.unban(uid).await {
        Ok(Change::Applied) => {
            log::info!("Unbanned user {uid}");
            format!("User {uid} is now unbanned.")
        }
        Ok(Change::Unchanged) => format!("User {uid} is not in the blacklist."),
        Err(e) => {
            log::error!("Failed to unban user {uid}: {e}");
            SAVE_FAILED.to_string()
        }
    }
}
