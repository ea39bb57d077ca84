//! Bot module wiring the status API, Discord and the interaction server.
//!
//! This module provides the main [`Bot`] implementation. It composes every
//! component at startup and drives the process lifecycle until shutdown.
//!
//! # Startup
//!
//! Sequential, any failure is fatal:
//!
//! 1. Build the world status API client
//! 2. Build the command dispatcher
//! 3. Build the interaction router (signature verification, timeout, logging)
//! 4. Open the Discord REST session and register the slash commands
//!
//! # Shutdown
//!
//! A [`CancellationToken`] is cancelled either by SIGINT/SIGTERM or by an
//! unexpected server error. The first cause is kept as the [`ShutdownReason`]
//! and decides the exit code. In-flight requests get a grace period, then the
//! server task is aborted, the slash commands are deleted and the Discord
//! session is closed.
//!
//! ```text
//! signal / server error → cancel → drain (grace period) → abort → delete commands → exit
//! ```
//!
//! # Example
//!
//! ```no_run
//! let config = Config::load("config.yaml")?;
//!
//! let bot = Bot::new(config).await?;
//! let reason = bot.run().await; // Runs until shutdown
//! std::process::exit(reason.exit_code().into());
//! ```

use std::{
    sync::{Arc, OnceLock},
    time::Duration,
};

use axum::Router;
use log::{debug, error, info, warn};
use tokio::{net::TcpListener, task::JoinHandle, time};
use tokio_util::sync::CancellationToken;

use crate::{
    commands::{Command, Commander, Presentation},
    config::Config,
    discord::{DiscordClient, RegisteredCommand, RequestVerifier},
    ffxiv::ApiRequester,
    server::{AppState, create_router},
};

/// Why the bot stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// SIGINT or SIGTERM received
    Signal,
    /// The listener could not be bound or the server stopped on its own
    ListenerFailed,
}

impl ShutdownReason {
    /// Process exit code for this reason.
    pub fn exit_code(&self) -> u8 {
        match self {
            ShutdownReason::Signal => 0,
            ShutdownReason::ListenerFailed => 1,
        }
    }
}

/// Shutdown trigger shared by the server and signal tasks.
#[derive(Clone, Default)]
struct Shutdown {
    token: CancellationToken,
    reason: Arc<OnceLock<ShutdownReason>>,
}

impl Shutdown {
    /// Records `reason` if none was set yet, then cancels the token.
    fn trigger(&self, reason: ShutdownReason) {
        if self.reason.set(reason).is_ok() {
            info!("shutting down: {:?}", reason);
        } else {
            debug!("shutdown already triggered, ignoring {:?}", reason);
        }
        self.token.cancel();
    }

    fn reason(&self) -> ShutdownReason {
        self.reason
            .get()
            .copied()
            .unwrap_or(ShutdownReason::Signal)
    }
}

/// Main bot structure.
///
/// Owns the interaction router, the Discord session and the commands
/// registered on it.
pub struct Bot {
    /// Interaction router
    router: Router,
    /// Discord REST session
    discord: DiscordClient,
    /// Commands created at startup, deleted on shutdown
    registered: Vec<RegisteredCommand>,
    /// Address of the interaction endpoint
    listen_address: String,
    /// Time given to in-flight requests on shutdown
    grace_period: Duration,
}

impl Bot {
    /// Creates a new bot from the configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration loaded by [`Config::load`]
    ///
    /// # Errors
    ///
    /// Fails on invalid API base URL, unreadable secrets, malformed public key
    /// or invalid bot token. A command that cannot be registered is only logged.
    pub async fn new(config: Config) -> Result<Self, anyhow::Error> {
        // Create status api client
        let requester = ApiRequester::new(
            &config.api.url,
            config.api.token.as_deref(),
            config.api.timeout,
        )?;

        let presentation = Presentation {
            title: config.discord.embed_title.clone(),
            thumbnail_url: config.discord.thumbnail_url.clone(),
        };
        let commander = Commander::new(Arc::new(requester), presentation, &Command::all());
        let definitions = commander.definitions();

        let verifier = RequestVerifier::from_hex(
            &config.discord.public_key()?,
            config.discord.skip_request_validation,
        )?;
        if verifier.skips_validation() {
            warn!("request validation is disabled, every request will be accepted");
        }

        let router = create_router(
            AppState {
                commander: Arc::new(commander),
                verifier: Arc::new(verifier),
            },
            Duration::from_secs(config.server.timeout),
        );

        // Create discord session and register the commands
        let discord = DiscordClient::new(
            &config.discord.api_url,
            &config.discord.application_id,
            &config.discord.token()?,
        )?;
        let registered = discord.register_commands(&definitions).await;
        info!(
            "{}/{} commands registered",
            registered.len(),
            definitions.len()
        );

        Ok(Bot {
            router,
            discord,
            registered,
            listen_address: config.server.listen_address,
            grace_period: Duration::from_secs(config.server.shutdown_grace_period),
        })
    }

    /// Serves interactions until SIGINT/SIGTERM or a server failure.
    ///
    /// # Returns
    ///
    /// The [`ShutdownReason`] that stopped the bot.
    pub async fn run(self) -> ShutdownReason {
        let shutdown = Shutdown::default();
        let signals = Self::start_signal_task(shutdown.clone());

        let reason = self.run_until(shutdown).await;
        signals.abort();

        reason
    }

    async fn run_until(self, shutdown: Shutdown) -> ShutdownReason {
        match TcpListener::bind(&self.listen_address).await {
            Ok(listener) => {
                info!("listening on {}", self.listen_address);

                let server = self.start_server_task(listener, shutdown.clone());
                shutdown.token.cancelled().await;
                self.drain(server).await;
            }
            Err(e) => {
                error!("cannot listen on {}: {}", self.listen_address, e);
                shutdown.trigger(ShutdownReason::ListenerFailed);
            }
        }

        self.cleanup().await;

        shutdown.reason()
    }

    /// Serves the router until the token is cancelled.
    ///
    /// The server stopping by itself triggers a [`ShutdownReason::ListenerFailed`].
    fn start_server_task(&self, listener: TcpListener, shutdown: Shutdown) -> JoinHandle<()> {
        let router = self.router.clone();

        tokio::spawn(async move {
            let result = axum::serve(listener, router)
                .with_graceful_shutdown(shutdown.token.clone().cancelled_owned())
                .await;

            match result {
                Err(e) => {
                    error!("server error: {}", e);
                    shutdown.trigger(ShutdownReason::ListenerFailed);
                }
                Ok(()) if !shutdown.token.is_cancelled() => {
                    error!("server stopped unexpectedly");
                    shutdown.trigger(ShutdownReason::ListenerFailed);
                }
                Ok(()) => debug!("server stopped"),
            }
        })
    }

    /// Triggers a [`ShutdownReason::Signal`] on SIGINT or SIGTERM.
    fn start_signal_task(shutdown: Shutdown) -> JoinHandle<()> {
        tokio::spawn(async move {
            wait_for_signal().await;
            shutdown.trigger(ShutdownReason::Signal);
        })
    }

    /// Waits for the server task, aborting it after the grace period.
    async fn drain(&self, server: JoinHandle<()>) {
        let abort = server.abort_handle();

        match time::timeout(self.grace_period, server).await {
            Ok(Ok(())) => info!("in-flight requests completed"),
            Ok(Err(e)) => error!("server task failed: {}", e),
            Err(_) => {
                warn!(
                    "grace period of {}s elapsed, aborting in-flight requests",
                    self.grace_period.as_secs()
                );
                abort.abort();
            }
        }
    }

    /// Deletes the registered commands and closes the Discord session.
    async fn cleanup(self) {
        self.discord.delete_commands(&self.registered).await;
        drop(self.discord);
        info!("Discord session closed");
    }
}

async fn wait_for_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("received SIGINT"),
            Err(e) => {
                error!("cannot listen for SIGINT: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("received SIGTERM");
            }
            Err(e) => {
                error!("cannot listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Api, Discord, Server};
    use ed25519_dalek::SigningKey;

    fn create_config(discord_url: &str, listen_address: &str) -> Config {
        Config {
            api: Api {
                url: "https://ffxiv.example.com/api/".to_owned(),
                token: None,
                timeout: 5,
            },
            discord: Discord {
                application_id: "1234".to_owned(),
                token: Some("bot-token".to_owned()),
                token_file: None,
                public_key: Some(hex::encode(
                    SigningKey::from_bytes(&[7u8; 32]).verifying_key().to_bytes(),
                )),
                public_key_file: None,
                skip_request_validation: false,
                thumbnail_url: None,
                embed_title: "FFXIV World Status".to_owned(),
                api_url: discord_url.to_owned(),
            },
            server: Server {
                listen_address: listen_address.to_owned(),
                timeout: 5,
                shutdown_grace_period: 1,
            },
        }
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(ShutdownReason::Signal.exit_code(), 0);
        assert_eq!(ShutdownReason::ListenerFailed.exit_code(), 1);
    }

    #[test]
    fn test_first_reason_wins() {
        let shutdown = Shutdown::default();
        assert!(!shutdown.token.is_cancelled());

        shutdown.trigger(ShutdownReason::ListenerFailed);
        shutdown.trigger(ShutdownReason::Signal);

        assert!(shutdown.token.is_cancelled());
        assert_eq!(shutdown.reason(), ShutdownReason::ListenerFailed);
    }

    #[tokio::test]
    async fn test_new_rejects_invalid_public_key() {
        let mut config = create_config("http://127.0.0.1:1", "127.0.0.1:0");
        config.discord.public_key = Some("not-hex".to_owned());

        assert!(Bot::new(config).await.is_err());
    }

    #[tokio::test]
    async fn test_run_registers_and_deletes_commands() {
        let mut server = mockito::Server::new_async().await;

        let register = server
            .mock("POST", "/applications/1234/commands")
            .with_status(201)
            .with_body(r#"{"id": "1", "name": "ping"}"#)
            .expect(3)
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", "/applications/1234/commands/1")
            .with_status(204)
            .expect(3)
            .create_async()
            .await;

        let bot = Bot::new(create_config(&server.url(), "127.0.0.1:0"))
            .await
            .unwrap();
        register.assert_async().await;

        let shutdown = Shutdown::default();
        let run = tokio::spawn(bot.run_until(shutdown.clone()));

        shutdown.trigger(ShutdownReason::Signal);
        let reason = run.await.unwrap();

        assert_eq!(reason, ShutdownReason::Signal);
        delete.assert_async().await;
    }

    #[tokio::test]
    async fn test_run_bind_failure() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("POST", "/applications/1234/commands")
            .with_status(201)
            .with_body(r#"{"id": "1", "name": "ping"}"#)
            .expect(3)
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", "/applications/1234/commands/1")
            .with_status(204)
            .expect(3)
            .create_async()
            .await;

        // Keep the port busy
        let busy = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = busy.local_addr().unwrap().to_string();

        let bot = Bot::new(create_config(&server.url(), &address))
            .await
            .unwrap();
        let reason = bot.run_until(Shutdown::default()).await;

        assert_eq!(reason, ShutdownReason::ListenerFailed);
        assert_eq!(reason.exit_code(), 1);
        delete.assert_async().await;
    }
}
