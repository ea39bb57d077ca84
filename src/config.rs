//! Configuration file structures for the bot.
//!
//! The configuration is read from a YAML file, then overridden by environment
//! variables prefixed with `FFXIV_STATUS_` (`__` separates nested keys). It is
//! split into three sections: the world status API, the Discord application and
//! the HTTP server.
//!
//! # Configuration File Format
//!
//! ```yaml
//! api:
//!   # Base URL of the world status API, must end with '/'
//!   url: "https://ffxiv.example.com/api/"
//!   # Optional API key sent as X-Api-Key
//!   token: "secret"
//!   # Request timeout in seconds
//!   timeout: 10
//!
//! discord:
//!   application_id: "123456789012345678"
//!   # Bot token, inline or read from a file
//!   token_file: "/run/secrets/discord_token"
//!   # Hex encoded application public key, inline or read from a file
//!   public_key: "e5f1..."
//!   skip_request_validation: false
//!   thumbnail_url: "https://example.com/icon.png"
//!   embed_title: "FFXIV World Status"
//!   api_url: "https://discord.com/api/v10"
//!
//! server:
//!   listen_address: "0.0.0.0:8080"
//!   timeout: 60
//!   shutdown_grace_period: 10
//! ```
//!
//! # Environment Variable Overrides
//!
//! ```bash
//! export FFXIV_STATUS_DISCORD__TOKEN="bot-token"
//! export FFXIV_STATUS_SERVER__LISTEN_ADDRESS="127.0.0.1:3000"
//! ```

use std::{fmt, path::PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{
    Deserialize, Deserializer,
    de::{self, Visitor},
};

use crate::{commands::DEFAULT_EMBED_TITLE, utils::read_secret};

const ENV_PREFIX: &str = "FFXIV_STATUS_";
const DEFAULT_DISCORD_API_URL: &str = "https://discord.com/api/v10";

/// Errors raised while loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file cannot be read or does not match the expected structure.
    #[error("cannot load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
    /// A required value is missing or blank.
    #[error("missing configuration value: {0}")]
    Missing(&'static str),
    /// A secret file cannot be read.
    #[error("cannot read {path}: {source}")]
    SecretFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Root configuration structure.
#[derive(Deserialize, Debug)]
pub struct Config {
    /// World status API configuration
    pub api: Api,
    /// Discord application configuration
    pub discord: Discord,
    /// HTTP server configuration
    pub server: Server,
}

/// World status API configuration.
#[derive(Deserialize, Debug)]
pub struct Api {
    /// Base URL of the API.
    ///
    /// The path must end with `/`, e.g. `https://ffxiv.example.com/api/`.
    pub url: String,

    /// Optional API key, sent as `X-Api-Key`.
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub token: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_api_timeout")]
    pub timeout: u64,
}

/// Discord application configuration.
#[derive(Deserialize, Debug)]
pub struct Discord {
    /// Application owning the slash commands.
    #[serde(deserialize_with = "string_or_number")]
    pub application_id: String,

    /// Bot token. Takes precedence over `token_file`.
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub token: Option<String>,
    /// File containing the bot token.
    #[serde(default)]
    pub token_file: Option<PathBuf>,

    /// Hex encoded Ed25519 public key. Takes precedence over `public_key_file`.
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub public_key: Option<String>,
    /// File containing the hex encoded public key.
    #[serde(default)]
    pub public_key_file: Option<PathBuf>,

    /// Accept unsigned requests. Local testing only.
    #[serde(default)]
    pub skip_request_validation: bool,

    /// Thumbnail shown in every embed.
    #[serde(default)]
    pub thumbnail_url: Option<String>,

    /// Title of every embed.
    #[serde(default = "default_embed_title")]
    pub embed_title: String,

    /// Base URL of the Discord REST API.
    #[serde(default = "default_discord_api_url")]
    pub api_url: String,
}

/// HTTP server configuration.
#[derive(Deserialize, Debug)]
pub struct Server {
    /// Address the interaction endpoint listens on, e.g. `0.0.0.0:8080`.
    pub listen_address: String,

    /// Maximum time to answer a request, in seconds.
    #[serde(default = "default_server_timeout")]
    pub timeout: u64,

    /// Time given to in-flight requests on shutdown, in seconds.
    #[serde(default = "default_shutdown_grace_period")]
    pub shutdown_grace_period: u64,
}

fn default_api_timeout() -> u64 {
    10
}

fn default_server_timeout() -> u64 {
    60
}

fn default_shutdown_grace_period() -> u64 {
    10
}

fn default_embed_title() -> String {
    DEFAULT_EMBED_TITLE.to_owned()
}

fn default_discord_api_url() -> String {
    DEFAULT_DISCORD_API_URL.to_owned()
}

/// Accepts any scalar as a string.
///
/// Snowflakes are often written unquoted, and figment parses environment
/// values that look like numbers or booleans. Digits with leading zeros must be
/// quoted (`'"0123"'`) to survive.
struct ScalarString;

impl<'de> Visitor<'de> for ScalarString {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string or a number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_owned())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }

    fn visit_char<E: de::Error>(self, v: char) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
        Ok(v.to_string())
    }
}

struct OptionalScalarString;

impl<'de> Visitor<'de> for OptionalScalarString {
    type Value = Option<String>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an optional string or number")
    }

    fn visit_none<E: de::Error>(self) -> Result<Option<String>, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Option<String>, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Option<String>, D::Error> {
        string_or_number(deserializer).map(Some)
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    deserializer.deserialize_any(ScalarString)
}

fn optional_string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    deserializer.deserialize_option(OptionalScalarString)
}

impl Config {
    /// Loads the configuration from `path` and the environment.
    ///
    /// # Errors
    ///
    /// Fails if the file is unreadable or malformed, or if a required value is
    /// missing or blank.
    pub fn load(path: &str) -> Result<Config, ConfigError> {
        let config: Config = Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(Box::new)?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.api.url.trim().is_empty() {
            return Err(ConfigError::Missing("api.url"));
        }
        if self.discord.application_id.trim().is_empty() {
            return Err(ConfigError::Missing("discord.application_id"));
        }
        if self.discord.token.is_none() && self.discord.token_file.is_none() {
            return Err(ConfigError::Missing("discord.token"));
        }
        if self.discord.public_key.is_none() && self.discord.public_key_file.is_none() {
            return Err(ConfigError::Missing("discord.public_key"));
        }
        if self.server.listen_address.trim().is_empty() {
            return Err(ConfigError::Missing("server.listen_address"));
        }

        Ok(())
    }
}

impl Discord {
    /// Resolves the bot token, inline or from `token_file`.
    pub fn token(&self) -> Result<String, ConfigError> {
        read_secret(
            "discord.token",
            self.token.as_deref(),
            self.token_file.as_deref(),
        )
    }

    /// Resolves the hex encoded public key, inline or from `public_key_file`.
    pub fn public_key(&self) -> Result<String, ConfigError> {
        read_secret(
            "discord.public_key",
            self.public_key.as_deref(),
            self.public_key_file.as_deref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    const MINIMAL_CONFIG: &str = r#"
api:
  url: "https://ffxiv.example.com/api/"
discord:
  application_id: "1234"
  token: "bot-token"
  public_key: "abcd"
server:
  listen_address: "127.0.0.1:8080"
"#;

    #[test]
    fn test_load_with_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file("config.yaml", MINIMAL_CONFIG)?;

            let config = Config::load("config.yaml").unwrap();

            assert_eq!(config.api.url, "https://ffxiv.example.com/api/");
            assert!(config.api.token.is_none());
            assert_eq!(config.api.timeout, 10);
            assert_eq!(config.discord.application_id, "1234");
            assert!(!config.discord.skip_request_validation);
            assert!(config.discord.thumbnail_url.is_none());
            assert_eq!(config.discord.embed_title, "FFXIV World Status");
            assert_eq!(config.discord.api_url, "https://discord.com/api/v10");
            assert_eq!(config.server.listen_address, "127.0.0.1:8080");
            assert_eq!(config.server.timeout, 60);
            assert_eq!(config.server.shutdown_grace_period, 10);

            Ok(())
        });
    }

    #[test]
    fn test_load_full() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                r#"
api:
  url: "https://ffxiv.example.com/api/"
  token: "api-key"
  timeout: 3
discord:
  application_id: 123456789012345678
  token: "bot-token"
  public_key: "abcd"
  skip_request_validation: true
  thumbnail_url: "https://example.com/icon.png"
  embed_title: "Worlds"
  api_url: "http://localhost:9000"
server:
  listen_address: "0.0.0.0:3000"
  timeout: 30
  shutdown_grace_period: 2
"#,
            )?;

            let config = Config::load("config.yaml").unwrap();

            assert_eq!(config.api.token.as_deref(), Some("api-key"));
            assert_eq!(config.api.timeout, 3);
            assert_eq!(config.discord.application_id, "123456789012345678");
            assert!(config.discord.skip_request_validation);
            assert_eq!(
                config.discord.thumbnail_url.as_deref(),
                Some("https://example.com/icon.png")
            );
            assert_eq!(config.discord.embed_title, "Worlds");
            assert_eq!(config.discord.api_url, "http://localhost:9000");
            assert_eq!(config.server.timeout, 30);
            assert_eq!(config.server.shutdown_grace_period, 2);

            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("config.yaml", MINIMAL_CONFIG)?;
            jail.set_env("FFXIV_STATUS_DISCORD__TOKEN", "env-token");
            jail.set_env("FFXIV_STATUS_SERVER__TIMEOUT", "15");

            let config = Config::load("config.yaml").unwrap();

            assert_eq!(config.discord.token().unwrap(), "env-token");
            assert_eq!(config.server.timeout, 15);

            Ok(())
        });
    }

    #[test]
    fn test_numeric_env_secrets() {
        Jail::expect_with(|jail| {
            jail.create_file("config.yaml", MINIMAL_CONFIG)?;
            jail.set_env("FFXIV_STATUS_API__TOKEN", "1234567890");
            jail.set_env("FFXIV_STATUS_DISCORD__TOKEN", "987654321");
            jail.set_env("FFXIV_STATUS_DISCORD__PUBLIC_KEY", "42");
            jail.set_env("FFXIV_STATUS_DISCORD__APPLICATION_ID", "5678");

            let config = Config::load("config.yaml").unwrap();

            assert_eq!(config.api.token.as_deref(), Some("1234567890"));
            assert_eq!(config.discord.token().unwrap(), "987654321");
            assert_eq!(config.discord.public_key().unwrap(), "42");
            assert_eq!(config.discord.application_id, "5678");

            Ok(())
        });
    }

    #[test]
    fn test_missing_section_is_error() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                r#"
api:
  url: "https://ffxiv.example.com/api/"
"#,
            )?;

            assert!(matches!(
                Config::load("config.yaml"),
                Err(ConfigError::Load(_))
            ));

            Ok(())
        });
    }

    #[test]
    fn test_blank_value_is_error() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                &MINIMAL_CONFIG.replace("127.0.0.1:8080", "  "),
            )?;

            assert!(matches!(
                Config::load("config.yaml"),
                Err(ConfigError::Missing("server.listen_address"))
            ));

            Ok(())
        });
    }

    #[test]
    fn test_missing_token_is_error() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                r#"
api:
  url: "https://ffxiv.example.com/api/"
discord:
  application_id: "1234"
  public_key: "abcd"
server:
  listen_address: "127.0.0.1:8080"
"#,
            )?;

            assert!(matches!(
                Config::load("config.yaml"),
                Err(ConfigError::Missing("discord.token"))
            ));

            Ok(())
        });
    }

    #[test]
    fn test_secrets_from_files() {
        Jail::expect_with(|jail| {
            jail.create_file("token", "file-token\n")?;
            jail.create_file("public_key", "  abcd  \n")?;
            jail.create_file(
                "config.yaml",
                r#"
api:
  url: "https://ffxiv.example.com/api/"
discord:
  application_id: "1234"
  token_file: "token"
  public_key_file: "public_key"
server:
  listen_address: "127.0.0.1:8080"
"#,
            )?;

            let config = Config::load("config.yaml").unwrap();

            assert_eq!(config.discord.token().unwrap(), "file-token");
            assert_eq!(config.discord.public_key().unwrap(), "abcd");

            Ok(())
        });
    }
}
