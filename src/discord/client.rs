//! REST client for Discord application commands.

use log::{debug, error, info, warn};
use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde::{Deserialize, Serialize};

use crate::discord::DiscordError;

const USER_AGENT: &str = concat!("ffxiv-status/", env!("CARGO_PKG_VERSION"));
const CHAT_INPUT_COMMAND: u8 = 1;

/// Slash command declaration sent to Discord.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CommandDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: u8,
}

impl CommandDefinition {
    /// Create a chat input command definition.
    pub fn new(name: &str, description: &str) -> Self {
        CommandDefinition {
            name: name.to_owned(),
            description: description.to_owned(),
            kind: CHAT_INPUT_COMMAND,
        }
    }
}

/// Command created on Discord, kept to delete it on shutdown.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RegisteredCommand {
    pub id: String,
    pub name: String,
}

/// Authenticated session against the Discord REST API.
///
/// # Examples
///
/// ```no_run
/// let client = DiscordClient::new("https://discord.com/api/v10", "1234", "bot-token")?;
/// let registered = client.register_commands(&definitions).await;
/// client.delete_commands(&registered).await;
/// ```
#[derive(Debug)]
pub struct DiscordClient {
    /// `{api_url}/applications/{application_id}/commands`
    commands_url: String,
    client: Client,
}

impl DiscordClient {
    /// Open a session with the bot token.
    ///
    /// # Arguments
    ///
    /// * `api_url` - Base URL of the Discord REST API, e.g. `https://discord.com/api/v10`.
    /// * `application_id` - Application owning the commands.
    /// * `token` - Bot token, sent as `Authorization: Bot <token>`.
    pub fn new(api_url: &str, application_id: &str, token: &str) -> Result<Self, DiscordError> {
        let mut authorization = HeaderValue::from_str(&format!("Bot {}", token.trim()))
            .map_err(|_| DiscordError::InvalidToken)?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        let commands_url = format!(
            "{}/applications/{}/commands",
            api_url.trim_end_matches('/'),
            application_id
        );

        info!("Discord session opened for application {}", application_id);

        Ok(DiscordClient {
            commands_url,
            client,
        })
    }

    /// Create one application command.
    pub async fn create_command(
        &self,
        definition: &CommandDefinition,
    ) -> Result<RegisteredCommand, DiscordError> {
        debug!("create command {}", definition.name);

        let response = self
            .client
            .post(&self.commands_url)
            .json(definition)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DiscordError::Status { status, body });
        }

        Ok(response.json::<RegisteredCommand>().await?)
    }

    /// Delete one application command.
    pub async fn delete_command(&self, command_id: &str) -> Result<(), DiscordError> {
        debug!("delete command {}", command_id);

        let response = self
            .client
            .delete(format!("{}/{}", self.commands_url, command_id))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DiscordError::Status { status, body });
        }

        Ok(())
    }

    /// Create every command, in order.
    ///
    /// A failed registration is logged and skipped; the others are still attempted.
    ///
    /// # Returns
    ///
    /// The commands that were created.
    pub async fn register_commands(
        &self,
        definitions: &[CommandDefinition],
    ) -> Vec<RegisteredCommand> {
        let mut registered = Vec::with_capacity(definitions.len());

        for definition in definitions {
            match self.create_command(definition).await {
                Ok(command) => {
                    info!("registered command {} ({})", command.name, command.id);
                    registered.push(command);
                }
                Err(e) => error!("cannot register command {}: {}", definition.name, e),
            }
        }

        registered
    }

    /// Delete every registered command, best effort.
    pub async fn delete_commands(&self, registered: &[RegisteredCommand]) {
        for command in registered {
            match self.delete_command(&command.id).await {
                Ok(()) => info!("deleted command {}", command.name),
                Err(e) => warn!("cannot delete command {}: {}", command.name, e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn definitions() -> Vec<CommandDefinition> {
        vec![
            CommandDefinition::new("ping", "Check that the bot is alive"),
            CommandDefinition::new("status", "Show worlds with issues"),
        ]
    }

    #[test]
    fn test_command_definition_serialization() {
        let value = serde_json::to_value(CommandDefinition::new("ping", "Pong")).unwrap();
        assert_eq!(
            value,
            json!({"name": "ping", "description": "Pong", "type": 1})
        );
    }

    #[test]
    fn test_new_rejects_invalid_token() {
        let result = DiscordClient::new("https://discord.com/api/v10", "1", "bad\ntoken");
        assert!(matches!(result, Err(DiscordError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_create_command() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/applications/1234/commands")
            .match_header("authorization", "Bot bot-token")
            .match_body(Matcher::Json(
                json!({"name": "ping", "description": "Pong", "type": 1}),
            ))
            .with_status(201)
            .with_body(r#"{"id": "99", "name": "ping", "application_id": "1234"}"#)
            .create_async()
            .await;

        let client = DiscordClient::new(&server.url(), "1234", "bot-token").unwrap();
        let command = client
            .create_command(&CommandDefinition::new("ping", "Pong"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            command,
            RegisteredCommand {
                id: "99".to_owned(),
                name: "ping".to_owned()
            }
        );
    }

    #[tokio::test]
    async fn test_register_commands_skips_failures() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("POST", "/applications/1234/commands")
            .match_body(Matcher::PartialJson(json!({"name": "ping"})))
            .with_status(400)
            .with_body(r#"{"message": "Invalid Form Body"}"#)
            .create_async()
            .await;
        server
            .mock("POST", "/applications/1234/commands")
            .match_body(Matcher::PartialJson(json!({"name": "status"})))
            .with_status(201)
            .with_body(r#"{"id": "2", "name": "status"}"#)
            .create_async()
            .await;

        let client = DiscordClient::new(&format!("{}/", server.url()), "1234", "t").unwrap();
        let registered = client.register_commands(&definitions()).await;

        assert_eq!(registered.len(), 1);
        assert_eq!(registered[0].name, "status");
    }

    #[tokio::test]
    async fn test_delete_commands() {
        let mut server = mockito::Server::new_async().await;

        let first = server
            .mock("DELETE", "/applications/1234/commands/1")
            .with_status(404)
            .create_async()
            .await;
        let second = server
            .mock("DELETE", "/applications/1234/commands/2")
            .with_status(204)
            .create_async()
            .await;

        let client = DiscordClient::new(&server.url(), "1234", "t").unwrap();
        let registered = vec![
            RegisteredCommand {
                id: "1".to_owned(),
                name: "ping".to_owned(),
            },
            RegisteredCommand {
                id: "2".to_owned(),
                name: "status".to_owned(),
            },
        ];
        client.delete_commands(&registered).await;

        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_command_error_status() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("DELETE", "/applications/1234/commands/1")
            .with_status(500)
            .with_body("oops")
            .create_async()
            .await;

        let client = DiscordClient::new(&server.url(), "1234", "t").unwrap();
        let result = client.delete_command("1").await;

        assert!(matches!(
            result,
            Err(DiscordError::Status { status, ref body }) if status.as_u16() == 500 && body == "oops"
        ));
    }
}
