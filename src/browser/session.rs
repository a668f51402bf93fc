use std::fmt;

use async_trait::async_trait;

/// Failures raised by the browser layer.
#[derive(Debug)]
pub enum BrowserError {
    /// The browser process could not be launched or its page could not be
    /// prepared. Recovered by the flow into a failed result.
    Setup(String),
    /// A navigate/type/click/read step failed or timed out.
    Interaction(String),
    /// The devtools layer answered with something the client could not
    /// interpret.
    Structural(String),
}

impl fmt::Display for BrowserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowserError::Setup(msg) => write!(f, "browser setup failed: {msg}"),
            BrowserError::Interaction(msg) => write!(f, "browser interaction failed: {msg}"),
            BrowserError::Structural(msg) => write!(f, "unexpected browser response: {msg}"),
        }
    }
}

impl std::error::Error for BrowserError {}

/// One automated browser session: a single browser process with a single
/// page, exclusively owned by one authentication attempt.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Directs the page to `url` and waits for the navigation to settle.
    async fn navigate(&self, url: &str) -> Result<(), BrowserError>;

    /// Types `text` into the element located by `selector`, paced like
    /// human input.
    async fn type_into(&self, selector: &str, text: &str) -> Result<(), BrowserError>;

    /// Clicks the element located by `selector` and awaits the navigation
    /// the click triggers. The wait must be armed when the click lands so
    /// the navigation cannot be missed.
    async fn submit_and_await(&self, selector: &str) -> Result<(), BrowserError>;

    /// Reads the fully rendered page content.
    async fn content(&self) -> Result<String, BrowserError>;

    /// Releases the session, closing the browser process. Must be safe to
    /// call more than once; the process is torn down exactly once.
    async fn close(&mut self) -> Result<(), BrowserError>;
}

/// Acquires browser sessions, one per authentication attempt.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn acquire(&self) -> Result<Box<dyn BrowserSession>, BrowserError>;
}
