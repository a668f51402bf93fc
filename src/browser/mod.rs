//! # Browser Module
//!
//! This module owns the automated browser sessions that drive provider login
//! forms. The rest of the service talks to it exclusively through two traits:
//!
//! - [`SessionProvider`] - acquires one isolated session per authentication
//!   attempt
//! - [`BrowserSession`] - the per-attempt capability surface: navigate, type
//!   into a locator, click-and-await-navigation, read rendered content, close
//!
//! The production implementation ([`ChromeSessionProvider`]) launches a
//! headless Chrome via the DevTools protocol with launch profiles per
//! execution mode and anti-detection countermeasures enabled for every
//! session. Tests substitute their own [`BrowserSession`] implementations
//! behind the same traits.
//!
//! A session pairs one browser process with one page; it is owned by exactly
//! one attempt and must be released on every exit path. [`BrowserSession::close`]
//! is safe to call on an already torn-down session.

mod chrome;
mod session;

pub use chrome::ChromeSessionProvider;
pub use session::BrowserError;
pub use session::BrowserSession;
pub use session::SessionProvider;
