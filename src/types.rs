use std::{fmt, str::FromStr};

use serde::Serialize;

/// One of the supported music-streaming providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Spotify,
    Deezer,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::Spotify, Provider::Deezer];

    pub fn name(&self) -> &'static str {
        match self {
            Provider::Spotify => "spotify",
            Provider::Deezer => "deezer",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spotify" => Ok(Provider::Spotify),
            "deezer" => Ok(Provider::Deezer),
            other => Err(format!("unknown platform '{other}'")),
        }
    }
}

/// Everything one authentication attempt needs: the built authorization URL,
/// the account credentials and the form locators of the provider's login
/// page. Created per invocation and dropped when the attempt completes;
/// never persisted.
pub struct AuthenticationRequest {
    pub provider: Provider,
    pub auth_url: String,
    pub email: String,
    pub password: String,
    pub email_selector: &'static str,
    pub password_selector: &'static str,
    pub submit_selector: &'static str,
    pub success_marker: &'static str,
}

impl fmt::Debug for AuthenticationRequest {
    // Account credentials stay out of any formatted output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticationRequest")
            .field("provider", &self.provider)
            .field("auth_url", &self.auth_url)
            .field("email", &"<redacted>")
            .field("password", &"<redacted>")
            .field("email_selector", &self.email_selector)
            .field("password_selector", &self.password_selector)
            .field("submit_selector", &self.submit_selector)
            .field("success_marker", &self.success_marker)
            .finish()
    }
}

/// Verdict of one authentication attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    pub succeeded: bool,
    pub message: String,
}

impl AuthenticationResult {
    pub fn success() -> Self {
        AuthenticationResult {
            succeeded: true,
            message: "successful".to_string(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        AuthenticationResult {
            succeeded: false,
            message: message.into(),
        }
    }
}

/// Wire shape of the verdict returned by the authentication endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct VerdictBody {
    pub status: bool,
    pub message: String,
}

impl From<AuthenticationResult> for VerdictBody {
    fn from(result: AuthenticationResult) -> Self {
        VerdictBody {
            status: result.succeeded,
            message: result.message,
        }
    }
}
