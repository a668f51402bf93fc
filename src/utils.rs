use std::time::Duration;

use rand::Rng;
use url::form_urlencoded;

/// Base delay between two keystrokes when filling a login form.
pub const KEYSTROKE_DELAY_MS: u64 = 100;

/// Upper bound of the random jitter added on top of the base delay.
const KEYSTROKE_JITTER_MS: u64 = 50;

/// Appends `params` to `base_url` as a standard query string.
///
/// Values are form-urlencoded (space becomes `+`) and serialized in the
/// order given; the base URL itself is left untouched. Callers supply
/// already-correct values, nothing is re-validated here.
pub fn build_authorization_url(base_url: &str, params: &[(&str, &str)]) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    for (name, value) in params {
        query.append_pair(name, value);
    }

    format!("{}?{}", base_url, query.finish())
}

/// Pause between keystrokes while typing credentials into a login form.
///
/// A fixed cadence is a known automation fingerprint; the jitter keeps the
/// pacing within a human-plausible band around 100ms per character.
pub fn keystroke_delay() -> Duration {
    let jitter = rand::rng().random_range(0..=KEYSTROKE_JITTER_MS);
    Duration::from_millis(KEYSTROKE_DELAY_MS + jitter)
}
