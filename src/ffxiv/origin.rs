//! Base URL validation and endpoint resolution.
//!
//! Endpoints are resolved relative to the configured base URL. A resolved
//! endpoint must stay on the same origin as the base, so a configuration value
//! can never send the API token to another host.

use url::Url;

use crate::ffxiv::ClientError;

/// Parses the API base URL.
///
/// # Errors
///
/// Returns [`ClientError::InvalidBaseUrl`] if the URL does not parse and
/// [`ClientError::MissingTrailingSlash`] if its path does not end with `/`.
pub fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let base_url = Url::parse(raw.trim()).map_err(ClientError::InvalidBaseUrl)?;

    if !base_url.path().ends_with('/') {
        return Err(ClientError::MissingTrailingSlash);
    }

    Ok(base_url)
}

/// Resolves `endpoint` against `base_url` and checks that the result keeps the
/// same origin.
///
/// # Errors
///
/// Returns [`ClientError::InvalidEndpoint`] if the endpoint cannot be joined
/// and [`ClientError::CrossOrigin`] if the joined URL leaves the base origin.
pub fn resolve(base_url: &Url, endpoint: &str) -> Result<Url, ClientError> {
    let resolved = base_url
        .join(endpoint)
        .map_err(|source| ClientError::InvalidEndpoint {
            endpoint: endpoint.to_owned(),
            source,
        })?;

    if !same_origin(base_url, &resolved) {
        return Err(ClientError::CrossOrigin(resolved.to_string()));
    }

    Ok(resolved)
}

/// Scheme, user info, host and port must all match.
fn same_origin(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme()
        && a.username() == b.username()
        && a.password() == b.password()
        && a.host() == b.host()
        && a.port() == b.port()
}
