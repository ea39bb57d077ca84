//! FINAL FANTASY XIV world status API client.
//!
//! This module provides access to the upstream world status API, which reports
//! every game world together with its group (data center), category and
//! availability flags.
//!
//! # Modules
//!
//! - `requester` - HTTP client for the `worlds` endpoint
//! - `response_structs` - Data structures for API responses
//! - `origin` - Base URL validation and same-origin endpoint resolution
//!
//! # Examples
//!
//! ```no_run
//! use crate::ffxiv::{ApiRequester, WorldsSource};
//!
//! # async fn example() -> Result<(), anyhow::Error> {
//! let requester = ApiRequester::new("https://ffxiv.example.com/api/", Some("token"), 10)?;
//! let worlds = requester.get_worlds().await?;
//! println!("{} worlds", worlds.worlds.len());
//! # Ok(())
//! # }
//! ```

mod origin;
mod requester;
mod response_structs;

#[cfg(test)]
pub use crate::ffxiv::requester::MockWorldsSource;
pub use crate::ffxiv::requester::{ApiRequester, WorldsSource};
pub use crate::ffxiv::response_structs::{World, WorldsResponse};

/// Errors raised while building the API client.
///
/// These are configuration errors: the process refuses to start when one of
/// them occurs.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The base URL could not be parsed.
    #[error("could not parse base URL: {0}")]
    InvalidBaseUrl(#[source] url::ParseError),
    /// The base URL path must end with a `/` so relative endpoints resolve below it.
    #[error("expected base URL's path to end with a `/`")]
    MissingTrailingSlash,
    /// An endpoint could not be resolved against the base URL.
    #[error("could not resolve URL {endpoint:?}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },
    /// The resolved endpoint points to another scheme, user or host.
    #[error("resolved URL {0} does not have the same origin")]
    CrossOrigin(String),
    /// The underlying HTTP client could not be built.
    #[error("could not create API client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors raised while fetching world status.
///
/// Command handlers recover from these and answer with an apology message.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read.
    #[error("could not send HTTP request: {0}")]
    Transport(#[source] reqwest::Error),
    /// The API answered with a non-success status.
    #[error("API responded with status {0}")]
    Status(reqwest::StatusCode),
    /// The body is not a valid worlds response.
    #[error("could not decode JSON response: {0}")]
    Decode(#[from] serde_json::Error),
}
