use std::time::Duration;

use tunegate::utils::{KEYSTROKE_DELAY_MS, build_authorization_url, keystroke_delay};

#[test]
fn test_build_authorization_url_encodes_query() {
    let url = build_authorization_url("https://x/y", &[("a", "1"), ("b", "2 c")]);

    // Base URL unchanged, parameters form-urlencoded (space becomes '+')
    assert_eq!(url, "https://x/y?a=1&b=2+c");
}

#[test]
fn test_build_authorization_url_keeps_insertion_order() {
    let url = build_authorization_url(
        "https://accounts.spotify.com/authorize",
        &[
            ("response_type", "code"),
            ("client_id", "abc123"),
            ("scope", "playlist-modify-public"),
        ],
    );

    assert_eq!(
        url,
        "https://accounts.spotify.com/authorize?response_type=code&client_id=abc123&scope=playlist-modify-public"
    );
}

#[test]
fn test_build_authorization_url_escapes_reserved_characters() {
    let url = build_authorization_url(
        "https://x/y",
        &[("redirect_uri", "https://cb.example/path?next=1")],
    );

    assert_eq!(
        url,
        "https://x/y?redirect_uri=https%3A%2F%2Fcb.example%2Fpath%3Fnext%3D1"
    );
}

#[test]
fn test_keystroke_delay_stays_in_the_human_band() {
    for _ in 0..100 {
        let delay = keystroke_delay();
        assert!(delay >= Duration::from_millis(KEYSTROKE_DELAY_MS));
        assert!(delay <= Duration::from_millis(KEYSTROKE_DELAY_MS + 50));
    }
}
