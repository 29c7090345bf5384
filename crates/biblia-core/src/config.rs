//! Environment-backed configuration helpers.

use std::env::VarError;
use std::str::FromStr;

use anyhow::Context as _;

/// Load a `.env` file from the working directory if one exists.
///
/// Variables already present in the process environment win. A missing file is
/// not an error; an unreadable or malformed one is returned so the caller can
/// log it once tracing is up.
pub fn load_dotenv() -> Result<(), dotenvy::Error> {
    dotenv_outcome(dotenvy::dotenv().map(|_| ()))
}

fn dotenv_outcome(result: Result<(), dotenvy::Error>) -> Result<(), dotenvy::Error> {
    match result {
        Err(e) if e.not_found() => Ok(()),
        other => other,
    }
}

/// Read a required variable.
pub fn required(key: &str) -> anyhow::Result<String> {
    std::env::var(key).with_context(|| format!("{key} must be set"))
}

/// Read an optional variable, falling back to `default` when unset.
///
/// A value that is set but does not parse is an error, not a silent default.
pub fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    Ok(env_opt(key)?.unwrap_or(default))
}

/// Like [`env_or`] but yields `None` when unset.
pub fn env_opt<T>(key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_var(key, std::env::var(key))
}

fn parse_var<T>(key: &str, raw: Result<String, VarError>) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("invalid value for {key}: {e}")),
        Err(VarError::NotPresent) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("invalid value for {key}")),
    }
}
