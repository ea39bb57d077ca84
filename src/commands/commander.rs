//! Command orchestration and execution.
//!
//! This module provides the [`Commander`] struct, which routes an invoked slash
//! command to its handler.
//!
//! # Flow
//!
//! ```text
//! CommandData → dispatch() → Command → handle_*() → InteractionResponse
//! ```
//!
//! # Examples
//!
//! ```no_run
//! let source = Arc::new(ApiRequester::new("https://ffxiv.example.com/api/", None, 10)?);
//! let commander = Commander::new(source, Presentation::default(), &Command::all());
//!
//! let response = commander.dispatch(&data).await?;
//! ```

use std::{collections::BTreeMap, sync::Arc};

use log::{debug, warn};

use crate::{
    commands::{
        Presentation,
        actions::{handle_characters, handle_ping, handle_status},
        command::Command,
    },
    discord::{CommandData, CommandDefinition, InteractionResponse},
    ffxiv::WorldsSource,
    server::ErrorResponse,
};

/// Command dispatcher.
///
/// The lookup table is filled once by [`Commander::new`] and never changes
/// afterwards, so a `Commander` can be shared between requests behind an [`Arc`].
pub struct Commander {
    /// Status API used by the `status` and `characters` commands
    source: Arc<dyn WorldsSource>,
    /// Embed title and thumbnail
    presentation: Presentation,
    /// Registered commands indexed by name
    commands: BTreeMap<&'static str, Command>,
}

impl Commander {
    /// Creates a new Commander handling `commands`.
    ///
    /// # Arguments
    ///
    /// * `source` - Status API client
    /// * `presentation` - Embed title and optional thumbnail
    /// * `commands` - Commands to handle, usually [`Command::all`]
    pub fn new(
        source: Arc<dyn WorldsSource>,
        presentation: Presentation,
        commands: &[Command],
    ) -> Self {
        let commands = commands
            .iter()
            .map(|command| (command.name(), *command))
            .collect::<BTreeMap<_, _>>();

        debug!("commands handled: {:?}", commands.keys());

        Commander {
            source,
            presentation,
            commands,
        }
    }

    /// Declarations of the handled commands, for registration on Discord.
    pub fn definitions(&self) -> Vec<CommandDefinition> {
        self.commands.values().map(Command::definition).collect()
    }

    /// Runs the handler of the invoked command.
    ///
    /// # Arguments
    ///
    /// * `data` - Command payload of the interaction
    ///
    /// # Returns
    ///
    /// * `Ok(InteractionResponse)` - Message to send back, including the
    ///   apology when the status API cannot be reached
    /// * `Err(ErrorResponse)` - `400 unknown-command` when no handler matches
    pub async fn dispatch(&self, data: &CommandData) -> Result<InteractionResponse, ErrorResponse> {
        let Some(command) = self.commands.get(data.name.as_str()) else {
            warn!("unknown command {}", data.name);
            return Err(ErrorResponse::unknown_command(&data.name));
        };

        debug!("dispatching command {:?}", command);

        let response = match command {
            Command::Ping => handle_ping(),
            Command::Status => handle_status(self.source.as_ref(), &self.presentation).await,
            Command::Characters => {
                handle_characters(self.source.as_ref(), &self.presentation).await
            }
        };

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffxiv::{MockWorldsSource, World, WorldsResponse};

    fn command_data(name: &str) -> CommandData {
        CommandData {
            name: name.to_owned(),
            ..Default::default()
        }
    }

    fn create_commander(source: MockWorldsSource) -> Commander {
        Commander::new(Arc::new(source), Presentation::default(), &Command::all())
    }

    #[tokio::test]
    async fn test_dispatch_ping_does_not_fetch() {
        let mut source = MockWorldsSource::new();
        source.expect_get_worlds().never();

        let commander = create_commander(source);
        let response = commander.dispatch(&command_data("ping")).await.unwrap();

        assert_eq!(response, InteractionResponse::text("Pong."));
    }

    #[tokio::test]
    async fn test_dispatch_status() {
        let mut source = MockWorldsSource::new();
        source.expect_get_worlds().times(1).returning(|| {
            Ok(WorldsResponse {
                worlds: vec![World {
                    group: "Aether".to_owned(),
                    name: "Gilgamesh".to_owned(),
                    is_maintenance: true,
                    can_create_new_characters: true,
                    ..Default::default()
                }],
            })
        });

        let commander = create_commander(source);
        let response = commander.dispatch(&command_data("status")).await.unwrap();
        let data = response.data.unwrap();

        assert_eq!(data.embeds.len(), 1);
        assert_eq!(data.embeds[0].description.as_deref(), Some("Maintenance"));
    }

    #[tokio::test]
    async fn test_dispatch_characters() {
        let mut source = MockWorldsSource::new();
        source
            .expect_get_worlds()
            .times(1)
            .returning(|| Ok(WorldsResponse::default()));

        let commander = create_commander(source);
        let response = commander
            .dispatch(&command_data("characters"))
            .await
            .unwrap();

        assert_eq!(
            response.data.unwrap().content.as_deref(),
            Some("Everything looks good.")
        );
    }

    #[tokio::test]
    async fn test_dispatch_unknown_command() {
        let mut source = MockWorldsSource::new();
        source.expect_get_worlds().never();

        let commander = create_commander(source);
        let error = commander
            .dispatch(&command_data("weather"))
            .await
            .unwrap_err();

        assert_eq!(error.status, Some(400));
        assert_eq!(error.kind, "urn:ffxiv-status:error:unknown-command");
        assert_eq!(error.title.as_deref(), Some("Unknown command"));
        assert!(error.detail.unwrap().contains("weather"));
    }

    #[tokio::test]
    async fn test_dispatch_only_registered_commands() {
        let commander = Commander::new(
            Arc::new(MockWorldsSource::new()),
            Presentation::default(),
            &[Command::Ping],
        );

        assert!(commander.dispatch(&command_data("ping")).await.is_ok());
        assert!(commander.dispatch(&command_data("status")).await.is_err());
    }

    #[test]
    fn test_definitions() {
        let commander = create_commander(MockWorldsSource::new());

        let names: Vec<String> = commander
            .definitions()
            .into_iter()
            .map(|definition| definition.name)
            .collect();

        assert_eq!(names, vec!["characters", "ping", "status"]);
    }
}
