//! Static descriptors for the supported providers.
//!
//! Everything provider-specific is data: the authorization endpoint, its
//! query parameters, the DOM locators of the hosted login form and the
//! literal marker that signals a completed authorization. The flow itself is
//! generic - supporting another provider means adding a descriptor record
//! here, not new control flow.
//!
//! The selectors and markers are coupled to the provider's current login
//! page HTML and will break when that page changes; that fragility is
//! inherent to form automation and the reason these live in one place.

use chrono::Utc;

use crate::{
    config::{Config, ConfigError, ProviderAccount},
    crypto,
    types::{AuthenticationRequest, Provider},
    utils,
};

/// Static record describing how to authorize against one provider.
pub struct ProviderDescriptor {
    pub provider: Provider,
    pub auth_base_url: &'static str,
    pub email_selector: &'static str,
    pub password_selector: &'static str,
    pub submit_selector: &'static str,
    pub success_marker: &'static str,
}

const SPOTIFY: ProviderDescriptor = ProviderDescriptor {
    provider: Provider::Spotify,
    auth_base_url: "https://accounts.spotify.com/authorize",
    email_selector: "#login-username",
    password_selector: "#login-password",
    submit_selector: "#login-button",
    success_marker: "spotify token saved",
};

const DEEZER: ProviderDescriptor = ProviderDescriptor {
    provider: Provider::Deezer,
    auth_base_url: "https://connect.deezer.com/oauth/auth.php",
    email_selector: "#login_mail",
    password_selector: "#login_password",
    submit_selector: "#login_form_submit",
    success_marker: "deezer token saved",
};

/// Looks up the descriptor for a provider.
pub fn descriptor(provider: Provider) -> &'static ProviderDescriptor {
    match provider {
        Provider::Spotify => &SPOTIFY,
        Provider::Deezer => &DEEZER,
    }
}

impl ProviderDescriptor {
    /// Builds the full authorization URL for this provider.
    ///
    /// Spotify carries an encrypted `state` parameter derived from the
    /// current timestamp; Deezer's endpoint takes none, so it gets only its
    /// app registration parameters.
    pub fn authorization_url(&self, config: &Config) -> Result<String, ConfigError> {
        let account = self.account(config);

        match self.provider {
            Provider::Spotify => {
                let state = crypto::encrypt_state(
                    &config.secret_key,
                    &config.initialization_vector,
                    &format!("{}:{}", Utc::now().timestamp_millis(), self.provider),
                )?;

                Ok(utils::build_authorization_url(
                    self.auth_base_url,
                    &[
                        ("response_type", "code"),
                        ("client_id", &account.client_id),
                        ("redirect_uri", &account.redirect_uri),
                        ("scope", "playlist-modify-public"),
                        ("state", &state),
                    ],
                ))
            }
            Provider::Deezer => Ok(utils::build_authorization_url(
                self.auth_base_url,
                &[
                    ("app_id", &account.client_id),
                    ("redirect_uri", &account.redirect_uri),
                    ("perms", "manage_library,offline_access"),
                ],
            )),
        }
    }

    /// Assembles the ephemeral request for one authentication attempt.
    pub fn login_request(&self, config: &Config) -> Result<AuthenticationRequest, ConfigError> {
        let account = self.account(config);

        Ok(AuthenticationRequest {
            provider: self.provider,
            auth_url: self.authorization_url(config)?,
            email: account.email.clone(),
            password: account.password.clone(),
            email_selector: self.email_selector,
            password_selector: self.password_selector,
            submit_selector: self.submit_selector,
            success_marker: self.success_marker,
        })
    }

    fn account<'a>(&self, config: &'a Config) -> &'a ProviderAccount {
        match self.provider {
            Provider::Spotify => &config.spotify,
            Provider::Deezer => &config.deezer,
        }
    }
}
