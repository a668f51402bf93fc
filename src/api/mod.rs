//! # API Module
//!
//! HTTP endpoints of the authentication service.
//!
//! ## Endpoints
//!
//! - [`ping`] - liveness probe, `GET /ping`, empty 200
//! - [`authorization_link`] - `GET /api/oauth/{platform}/link`, returns the
//!   built authorization URL for a platform without running an attempt
//! - [`authenticate`] - `POST /api/oauth/{platform}`, runs one scripted
//!   login attempt and reports the structured verdict
//!
//! All `/api` routes sit behind the basic-auth gate wired up in
//! [`crate::server`]. Handlers never surface raw internal faults; the worst
//! a caller sees is a failed verdict with a diagnostic message.

mod oauth;
mod ping;

pub use oauth::authenticate;
pub use oauth::authorization_link;
pub use ping::ping;
