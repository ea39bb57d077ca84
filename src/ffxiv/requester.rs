//! HTTP client for the world status API.
//!
//! This module provides the [`ApiRequester`] struct for requesting the
//! `worlds` endpoint, and the [`WorldsSource`] trait command handlers depend on.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, trace};
use mockall::automock;
use reqwest::Client;
use url::Url;

use crate::ffxiv::{
    ClientError, FetchError,
    origin::{parse_base_url, resolve},
    response_structs::WorldsResponse,
};

const USER_AGENT: &str = concat!("ffxiv-status/", env!("CARGO_PKG_VERSION"));
const API_KEY_HEADER: &str = "x-api-key";

/// Source of world status records.
///
/// This trait abstracts the HTTP operations for easier testing with mocks.
#[automock]
#[async_trait]
pub trait WorldsSource: Send + Sync {
    /// Fetches the status of every world.
    async fn get_worlds(&self) -> Result<WorldsResponse, FetchError>;
}

/// HTTP client for requesting data from the world status API.
///
/// # Examples
///
/// ```no_run
/// let requester = ApiRequester::new("https://ffxiv.example.com/api/", None, 10)?;
/// let worlds = requester.get_worlds().await?;
/// println!("Worlds: {:?}", worlds);
/// ```
#[derive(Debug)]
pub struct ApiRequester {
    /// Resolved `worlds` endpoint
    worlds_url: Url,
    /// API key, sent as `X-Api-Key` when set
    token: Option<String>,
    /// HTTP client
    client: Client,
}

impl ApiRequester {
    /// Create a new [ApiRequester].
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the API. Its path must end with `/`.
    /// * `token` - Optional API key. Blank tokens are ignored.
    /// * `timeout` - Request timeout in seconds.
    ///
    /// # Errors
    ///
    /// Fails if the base URL is invalid or if the `worlds` endpoint does not
    /// resolve to the same origin as the base URL.
    pub fn new(base_url: &str, token: Option<&str>, timeout: u64) -> Result<Self, ClientError> {
        let base_url = parse_base_url(base_url)?;
        let worlds_url = resolve(&base_url, "worlds")?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout))
            .build()?;

        let token = token
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_owned);

        Ok(ApiRequester {
            worlds_url,
            token,
            client,
        })
    }
}

#[async_trait]
impl WorldsSource for ApiRequester {
    /// Request `/worlds` to get the status of every world.
    ///
    /// This api call returns a json object:
    /// ```json
    /// {
    ///   "worlds": [
    ///     { "group": "Aether", "name": "Gilgamesh", "isMaintenance": false, "canCreateNewCharacters": true, ... }
    ///   ]
    /// }
    /// ```
    async fn get_worlds(&self) -> Result<WorldsResponse, FetchError> {
        info!("request worlds");
        debug!("request {}", &self.worlds_url);

        let mut request = self.client.get(self.worlds_url.clone());
        if let Some(token) = &self.token {
            request = request.header(API_KEY_HEADER, token);
        }

        let response = request.send().await.map_err(FetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await.map_err(FetchError::Transport)?;
        let worlds_response: WorldsResponse = serde_json::from_slice(&body)?;

        debug!(
            "response from {} -> {} worlds",
            &self.worlds_url,
            worlds_response.worlds.len()
        );
        for world in &worlds_response.worlds {
            trace!("{}", world);
        }

        Ok(worlds_response)
    }
}
