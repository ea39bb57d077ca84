//! Utility functions for configuration secrets.

use std::{fs, path::Path};

use crate::config::ConfigError;

/// Resolves a secret given inline or stored in a file.
///
/// The inline value wins when both are set. File contents are trimmed so a
/// trailing newline does not end up in the secret.
///
/// # Arguments
///
/// * `name` - Configuration key, used in error messages
/// * `inline` - Value written in the configuration
/// * `file` - Path of a file containing the value
///
/// # Errors
///
/// Returns [`ConfigError::Missing`] if neither is set or the value is blank, and
/// [`ConfigError::SecretFile`] if the file cannot be read.
///
/// # Examples
///
/// ```no_run
/// let token = read_secret("discord.token", None, Some(Path::new("/run/secrets/token")))?;
/// ```
pub fn read_secret(
    name: &'static str,
    inline: Option<&str>,
    file: Option<&Path>,
) -> Result<String, ConfigError> {
    let secret = match (inline, file) {
        (Some(value), _) => value.trim().to_owned(),
        (None, Some(path)) => fs::read_to_string(path)
            .map_err(|source| ConfigError::SecretFile {
                path: path.to_path_buf(),
                source,
            })?
            .trim()
            .to_owned(),
        (None, None) => return Err(ConfigError::Missing(name)),
    };

    if secret.is_empty() {
        return Err(ConfigError::Missing(name));
    }

    Ok(secret)
}
