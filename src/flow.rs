//! The scripted login flow driven against one provider.
//!
//! One call to [`authenticate`] is one attempt: acquire a browser session,
//! navigate to the built authorization URL, fill the credential fields,
//! submit while awaiting the resulting navigation, then inspect the rendered
//! content for the provider's success marker. The session is released on
//! every exit path, and no fault of the browser layer escapes this module -
//! callers always receive a structured [`AuthenticationResult`].
//!
//! Every suspending step runs under a bounded wait; an elapsed timeout is
//! reported the same way as any other interaction failure.

use std::{future::Future, time::Duration};

use tokio::time::timeout;

use crate::{
    browser::{BrowserError, BrowserSession, SessionProvider},
    info,
    types::{AuthenticationRequest, AuthenticationResult},
    warning,
};

/// Upper bound for acquiring a browser session.
const SETUP_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound for one page navigation, including the post-submit one.
const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Upper bound for filling one credential field, paced typing included.
const FILL_TIMEOUT: Duration = Duration::from_secs(45);

/// Upper bound for reading the rendered page content.
const READ_TIMEOUT: Duration = Duration::from_secs(15);

/// Longest page-content excerpt carried in a failure message. The markup
/// can embed account data, so the diagnostic stays bounded.
const DIAGNOSTIC_EXCERPT_LEN: usize = 600;

/// Runs one authentication attempt against `request`'s provider.
///
/// Never fails at the type level: session-setup errors, interaction errors,
/// timeouts and an absent success marker all come back as a result with
/// `succeeded: false` and a diagnostic message.
pub async fn authenticate(
    sessions: &dyn SessionProvider,
    request: &AuthenticationRequest,
) -> AuthenticationResult {
    let mut session = match step(SETUP_TIMEOUT, "browser session setup", sessions.acquire()).await
    {
        Ok(session) => session,
        Err(e) => {
            warning!("{} authentication aborted: {}", request.provider, e);
            return AuthenticationResult::failure(
                "An error occurred while setting up the browser session",
            );
        }
    };

    let verdict = drive_login(session.as_ref(), request).await;

    // Cleanup runs regardless of how the attempt went; the session owns
    // the only browser process of this attempt.
    if let Err(e) = session.close().await {
        warning!(
            "Failed to release {} browser session: {}",
            request.provider,
            e
        );
    }

    match verdict {
        Ok(result) => result,
        Err(e) => {
            warning!("{} authentication failed: {}", request.provider, e);
            AuthenticationResult::failure(format!(
                "An error occurred while driving the login form: {e}"
            ))
        }
    }
}

async fn drive_login(
    session: &dyn BrowserSession,
    request: &AuthenticationRequest,
) -> Result<AuthenticationResult, BrowserError> {
    step(
        NAVIGATION_TIMEOUT,
        "navigation to the authorization page",
        session.navigate(&request.auth_url),
    )
    .await?;
    info!("Navigated to {}...", request.auth_url);

    step(
        FILL_TIMEOUT,
        "filling the email field",
        session.type_into(request.email_selector, &request.email),
    )
    .await?;
    step(
        FILL_TIMEOUT,
        "filling the password field",
        session.type_into(request.password_selector, &request.password),
    )
    .await?;

    step(
        NAVIGATION_TIMEOUT,
        "submitting the login form",
        session.submit_and_await(request.submit_selector),
    )
    .await?;

    let content = step(READ_TIMEOUT, "reading the result page", session.content()).await?;

    // The marker literal is the sole success signal this flow has.
    if content.contains(request.success_marker) {
        Ok(AuthenticationResult::success())
    } else {
        Ok(AuthenticationResult::failure(format!(
            "An error occurred: {}",
            excerpt(&content)
        )))
    }
}

async fn step<T>(
    limit: Duration,
    what: &str,
    operation: impl Future<Output = Result<T, BrowserError>>,
) -> Result<T, BrowserError> {
    match timeout(limit, operation).await {
        Ok(outcome) => outcome,
        Err(_) => Err(BrowserError::Interaction(format!(
            "{} timed out after {}s",
            what,
            limit.as_secs()
        ))),
    }
}

fn excerpt(content: &str) -> String {
    if content.len() <= DIAGNOSTIC_EXCERPT_LEN {
        return content.to_string();
    }

    let mut end = DIAGNOSTIC_EXCERPT_LEN;
    while !content.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated]", &content[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_keeps_short_content_intact() {
        assert_eq!(excerpt("login rejected"), "login rejected");
    }

    #[test]
    fn excerpt_truncates_long_content_on_a_char_boundary() {
        let content = "ä".repeat(DIAGNOSTIC_EXCERPT_LEN);
        let shortened = excerpt(&content);
        assert!(shortened.len() < content.len());
        assert!(shortened.ends_with("... [truncated]"));
    }
}
