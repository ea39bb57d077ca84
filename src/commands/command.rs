//! Slash commands handled by the bot.

use crate::discord::CommandDefinition;

/// Represents a slash command.
///
/// Every variant is registered on Discord at startup and matched by name when
/// an interaction arrives.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Command {
    /// Check that the bot answers
    Ping,
    /// List worlds under maintenance or closed to new characters
    Status,
    /// List worlds closed to new characters
    Characters,
}

impl Command {
    /// Every command, in registration order.
    pub fn all() -> [Command; 3] {
        [Command::Ping, Command::Status, Command::Characters]
    }

    /// Name typed by users after `/`.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Ping => "ping",
            Command::Status => "status",
            Command::Characters => "characters",
        }
    }

    /// Description shown by Discord in the command picker.
    pub fn description(&self) -> &'static str {
        match self {
            Command::Ping => "Check that the bot is alive",
            Command::Status => "Show worlds under maintenance or closed to new characters",
            Command::Characters => "Show worlds where new characters cannot be created",
        }
    }

    /// Declaration sent to Discord on registration.
    pub fn definition(&self) -> CommandDefinition {
        CommandDefinition::new(self.name(), self.description())
    }
}
