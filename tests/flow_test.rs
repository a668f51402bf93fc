use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

use async_trait::async_trait;
use tunegate::browser::{BrowserError, BrowserSession, SessionProvider};
use tunegate::flow;
use tunegate::types::{AuthenticationRequest, Provider};

/// Shared call log; entries are prefixed with the session id so concurrent
/// attempts can be told apart.
#[derive(Clone, Default)]
struct Recorder {
    calls: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    fn push(&self, entry: String) {
        self.calls.lock().unwrap().push(entry);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn calls_of(&self, session_id: usize) -> Vec<String> {
        let prefix = format!("s{session_id}:");
        self.calls()
            .into_iter()
            .filter_map(|entry| entry.strip_prefix(&prefix).map(str::to_string))
            .collect()
    }

    fn count_of(&self, session_id: usize, operation: &str) -> usize {
        self.calls_of(session_id)
            .iter()
            .filter(|entry| entry.starts_with(operation))
            .count()
    }
}

struct StubSession {
    id: usize,
    recorder: Recorder,
    content: String,
    fail_selector: Option<String>,
    hang_on_navigate: bool,
}

impl StubSession {
    fn record(&self, entry: impl AsRef<str>) {
        self.recorder.push(format!("s{}:{}", self.id, entry.as_ref()));
    }
}

#[async_trait]
impl BrowserSession for StubSession {
    async fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        self.record(format!("navigate:{url}"));
        if self.hang_on_navigate {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        Ok(())
    }

    async fn type_into(&self, selector: &str, text: &str) -> Result<(), BrowserError> {
        self.record(format!("type:{selector}:{text}"));
        if self.fail_selector.as_deref() == Some(selector) {
            return Err(BrowserError::Interaction(format!(
                "element '{selector}' detached"
            )));
        }
        Ok(())
    }

    async fn submit_and_await(&self, selector: &str) -> Result<(), BrowserError> {
        self.record(format!("click:{selector}"));
        Ok(())
    }

    async fn content(&self) -> Result<String, BrowserError> {
        self.record("content");
        Ok(self.content.clone())
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        self.record("close");
        Ok(())
    }
}

#[derive(Default)]
struct StubProvider {
    recorder: Recorder,
    content: String,
    fail_selector: Option<String>,
    fail_acquire: bool,
    hang_on_navigate: bool,
    next_id: AtomicUsize,
}

impl StubProvider {
    fn with_content(content: &str) -> Self {
        StubProvider {
            content: content.to_string(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl SessionProvider for StubProvider {
    async fn acquire(&self) -> Result<Box<dyn BrowserSession>, BrowserError> {
        if self.fail_acquire {
            return Err(BrowserError::Setup("no browser binary found".to_string()));
        }

        Ok(Box::new(StubSession {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            recorder: self.recorder.clone(),
            content: self.content.clone(),
            fail_selector: self.fail_selector.clone(),
            hang_on_navigate: self.hang_on_navigate,
        }))
    }
}

fn spotify_request() -> AuthenticationRequest {
    AuthenticationRequest {
        provider: Provider::Spotify,
        auth_url: "https://accounts.spotify.com/authorize?client_id=abc".to_string(),
        email: "artist@example.com".to_string(),
        password: "sp-secret".to_string(),
        email_selector: "#login-username",
        password_selector: "#login-password",
        submit_selector: "#login-button",
        success_marker: "spotify token saved",
    }
}

fn deezer_request() -> AuthenticationRequest {
    AuthenticationRequest {
        provider: Provider::Deezer,
        auth_url: "https://connect.deezer.com/oauth/auth.php?app_id=xyz".to_string(),
        email: "listener@example.com".to_string(),
        password: "dz-secret".to_string(),
        email_selector: "#login_mail",
        password_selector: "#login_password",
        submit_selector: "#login_form_submit",
        success_marker: "deezer token saved",
    }
}

#[tokio::test]
async fn test_successful_attempt_observes_exact_call_sequence() {
    let provider = StubProvider::with_content("<html>spotify token saved</html>");
    let result = flow::authenticate(&provider, &spotify_request()).await;

    assert!(result.succeeded);
    assert_eq!(result.message, "successful");

    // Exactly one navigate, one type per field, one click, one read, one close
    assert_eq!(
        provider.recorder.calls(),
        vec![
            "s0:navigate:https://accounts.spotify.com/authorize?client_id=abc",
            "s0:type:#login-username:artist@example.com",
            "s0:type:#login-password:sp-secret",
            "s0:click:#login-button",
            "s0:content",
            "s0:close",
        ]
    );
}

#[tokio::test]
async fn test_absent_marker_is_a_failure_with_diagnostic_content() {
    let provider = StubProvider::with_content("<html>Incorrect password.</html>");
    let result = flow::authenticate(&provider, &spotify_request()).await;

    assert!(!result.succeeded);
    // The captured content is referenced for troubleshooting
    assert!(result.message.contains("Incorrect password."));
    // The session is still released exactly once
    assert_eq!(provider.recorder.count_of(0, "close"), 1);
}

#[tokio::test]
async fn test_failed_acquisition_is_recovered_into_a_result() {
    let provider = StubProvider {
        fail_acquire: true,
        ..Default::default()
    };
    let result = flow::authenticate(&provider, &spotify_request()).await;

    assert!(!result.succeeded);
    assert!(result.message.contains("setting up"));
    // No session ever existed, so nothing was driven or closed
    assert!(provider.recorder.calls().is_empty());
}

#[tokio::test]
async fn test_mid_flow_fault_still_releases_the_session_once() {
    let provider = StubProvider {
        content: "irrelevant".to_string(),
        fail_selector: Some("#login-password".to_string()),
        ..Default::default()
    };
    let result = flow::authenticate(&provider, &spotify_request()).await;

    assert!(!result.succeeded);
    assert_eq!(provider.recorder.count_of(0, "close"), 1);
    // The flow stopped at the failing field: no click, no content read
    assert_eq!(provider.recorder.count_of(0, "click"), 0);
    assert_eq!(provider.recorder.count_of(0, "content"), 0);
}

#[tokio::test(start_paused = true)]
async fn test_stalled_navigation_times_out_into_a_failure() {
    let provider = StubProvider {
        content: "never reached".to_string(),
        hang_on_navigate: true,
        ..Default::default()
    };
    let result = flow::authenticate(&provider, &spotify_request()).await;

    assert!(!result.succeeded);
    assert!(result.message.contains("timed out"));
    // Cleanup still ran after the timeout
    assert_eq!(provider.recorder.count_of(0, "close"), 1);
}

#[tokio::test]
async fn test_concurrent_attempts_use_isolated_sessions() {
    let provider = Arc::new(StubProvider::with_content(
        "spotify token saved deezer token saved",
    ));

    let spotify = {
        let provider = Arc::clone(&provider);
        tokio::spawn(async move { flow::authenticate(provider.as_ref(), &spotify_request()).await })
    };
    let deezer = {
        let provider = Arc::clone(&provider);
        tokio::spawn(async move { flow::authenticate(provider.as_ref(), &deezer_request()).await })
    };

    let (spotify_result, deezer_result) = (spotify.await.unwrap(), deezer.await.unwrap());
    assert!(spotify_result.succeeded);
    assert!(deezer_result.succeeded);

    // Each attempt got its own session and drove it through the full
    // sequence; nothing leaked across
    for id in 0..2 {
        let calls = provider.recorder.calls_of(id);
        assert_eq!(calls.len(), 6);
        assert_eq!(provider.recorder.count_of(id, "close"), 1);

        // A session only ever saw one provider's selectors
        let saw_spotify = calls.iter().any(|call| call.contains("#login-username"));
        let saw_deezer = calls.iter().any(|call| call.contains("#login_mail"));
        assert!(saw_spotify != saw_deezer);
    }
}
