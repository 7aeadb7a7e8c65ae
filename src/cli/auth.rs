//! cli::auth
//!
//! API token discovery.
//!
//! The token comes from `--token`, else `$CHANGELOG_GITHUB_TOKEN`. Without
//! either the run continues unauthenticated under a much lower rate limit.
//! Token values are never printed.

use std::fmt;

/// Environment variable holding the API token.
pub const TOKEN_ENV: &str = "CHANGELOG_GITHUB_TOKEN";

/// No token was found; requests will be anonymous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialWarning;

impl fmt::Display for CredentialWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no token provided (-t option) and ${} is not set\n\
             GitHub allows only 50 unauthenticated API requests per hour",
            TOKEN_ENV
        )
    }
}

/// Pick the API token from the flag or the environment value.
///
/// Empty values count as absent.
pub fn discover_token(
    flag: Option<String>,
    env: Option<String>,
) -> Result<String, CredentialWarning> {
    flag.into_iter()
        .chain(env)
        .find(|token| !token.trim().is_empty())
        .ok_or(CredentialWarning)
}

/// [`discover_token`] against the process environment.
pub fn discover_token_from_env(flag: Option<String>) -> Result<String, CredentialWarning> {
    discover_token(flag, std::env::var(TOKEN_ENV).ok())
}
