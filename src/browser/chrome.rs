use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::error::CdpError;
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;

use crate::{
    config::{Config, Environment},
    utils, warning,
};

use super::session::{BrowserError, BrowserSession, SessionProvider};

/// Flags applied to every launch. Target sites actively challenge obvious
/// automation, so the fingerprint reduction is unconditional.
const STEALTH_ARGS: [&str; 4] = [
    "--disable-blink-features=AutomationControlled",
    "--disable-infobars",
    "--no-first-run",
    "--no-default-browser-check",
];

/// Flags for constrained server environments: no GPU, no privileged
/// sandbox helpers, no usable /dev/shm.
const HEADLESS_SERVER_ARGS: [&str; 3] = [
    "--disable-gpu",
    "--disable-dev-shm-usage",
    "--disable-setuid-sandbox",
];

/// Runs before any document script; masks the headless fingerprints the
/// launch flags cannot reach.
const STEALTH_INIT_SCRIPT: &str = r#"
Object.defineProperty(navigator, 'webdriver', { get: () => undefined });
window.chrome = window.chrome || { runtime: {} };
Object.defineProperty(navigator, 'languages', { get: () => ['en-US', 'en'] });
Object.defineProperty(navigator, 'plugins', { get: () => [1, 2, 3] });
"#;

/// Headless Chrome reports itself as `HeadlessChrome/...`; present a
/// regular desktop agent instead.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
(KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

/// Launches one isolated headless Chrome per authentication attempt.
pub struct ChromeSessionProvider {
    environment: Environment,
    executable_path: Option<String>,
}

impl ChromeSessionProvider {
    pub fn from_config(config: &Config) -> Self {
        ChromeSessionProvider {
            environment: config.environment,
            executable_path: config.browser_executable_path.clone(),
        }
    }

    /// Builds the launch profile for the configured execution mode.
    ///
    /// Production resolves the browser binary through the devtools client's
    /// own discovery and pins the hardened headless flag set; development
    /// may point at a locally configured binary instead.
    fn launch_config(&self) -> Result<BrowserConfig, BrowserError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .args(STEALTH_ARGS)
            .args(HEADLESS_SERVER_ARGS);

        if self.environment == Environment::Development {
            if let Some(path) = &self.executable_path {
                builder = builder.chrome_executable(path);
            }
        }

        builder.build().map_err(BrowserError::Setup)
    }
}

#[async_trait]
impl SessionProvider for ChromeSessionProvider {
    async fn acquire(&self) -> Result<Box<dyn BrowserSession>, BrowserError> {
        let launch_config = self.launch_config()?;

        let (browser, mut handler) = Browser::launch(launch_config)
            .await
            .map_err(|e| BrowserError::Setup(format!("could not launch browser: {e}")))?;

        // The handler drives the devtools websocket; it must be polled for
        // the lifetime of the session.
        let event_loop = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                teardown(browser, event_loop).await;
                return Err(BrowserError::Setup(format!("could not open page: {e}")));
            }
        };

        if let Err(e) = harden_page(&page).await {
            teardown(browser, event_loop).await;
            return Err(e);
        }

        Ok(Box::new(ChromeSession {
            browser,
            page,
            event_loop,
            released: false,
        }))
    }
}

/// Applies the per-page anti-detection countermeasures.
async fn harden_page(page: &Page) -> Result<(), BrowserError> {
    page.set_user_agent(USER_AGENT)
        .await
        .map_err(|e| BrowserError::Setup(format!("could not override user agent: {e}")))?;

    let script = AddScriptToEvaluateOnNewDocumentParams::builder()
        .source(STEALTH_INIT_SCRIPT)
        .build()
        .map_err(BrowserError::Setup)?;
    page.execute(script)
        .await
        .map_err(|e| BrowserError::Setup(format!("could not install init script: {e}")))?;

    Ok(())
}

/// Best-effort release for sessions that failed mid-acquisition.
async fn teardown(mut browser: Browser, event_loop: JoinHandle<()>) {
    if let Err(e) = browser.close().await {
        warning!("Browser did not close cleanly: {}", e);
    }
    if let Err(e) = browser.wait().await {
        warning!("Browser process did not exit cleanly: {}", e);
    }
    event_loop.abort();
}

struct ChromeSession {
    browser: Browser,
    page: Page,
    event_loop: JoinHandle<()>,
    released: bool,
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        self.page
            .goto(url)
            .await
            .map_err(|e| classify(e, "navigation failed"))?;
        self.page
            .wait_for_navigation()
            .await
            .map_err(|e| classify(e, "navigation did not settle"))?;
        Ok(())
    }

    async fn type_into(&self, selector: &str, text: &str) -> Result<(), BrowserError> {
        let field = self
            .page
            .find_element(selector)
            .await
            .map_err(|e| classify(e, &format!("element '{selector}' not found")))?;

        // Focus first; typing goes to the focused element.
        field
            .click()
            .await
            .map_err(|e| classify(e, &format!("could not focus '{selector}'")))?;

        for ch in text.chars() {
            field
                .type_str(ch.to_string())
                .await
                .map_err(|e| classify(e, &format!("could not type into '{selector}'")))?;
            tokio::time::sleep(utils::keystroke_delay()).await;
        }

        Ok(())
    }

    async fn submit_and_await(&self, selector: &str) -> Result<(), BrowserError> {
        let button = self
            .page
            .find_element(selector)
            .await
            .map_err(|e| classify(e, &format!("element '{selector}' not found")))?;

        // Arm the navigation wait together with the click so the resulting
        // navigation cannot slip between the two.
        let (navigation, click) =
            tokio::join!(self.page.wait_for_navigation(), button.click());

        click.map_err(|e| classify(e, &format!("could not click '{selector}'")))?;
        navigation.map_err(|e| classify(e, "post-submit navigation did not settle"))?;
        Ok(())
    }

    async fn content(&self) -> Result<String, BrowserError> {
        self.page
            .content()
            .await
            .map_err(|e| classify(e, "could not read page content"))
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        if self.released {
            return Ok(());
        }
        self.released = true;

        // Close failures are logged, never escalated - this runs from the
        // guaranteed-cleanup path where a primary failure may already be
        // in flight.
        if let Err(e) = self.browser.close().await {
            warning!("Browser did not close cleanly: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            warning!("Browser process did not exit cleanly: {}", e);
        }
        self.event_loop.abort();
        Ok(())
    }
}

fn classify(err: CdpError, context: &str) -> BrowserError {
    match err {
        CdpError::Serde(e) => {
            BrowserError::Structural(format!("{context}: malformed devtools payload: {e}"))
        }
        other => BrowserError::Interaction(format!("{context}: {other}")),
    }
}
