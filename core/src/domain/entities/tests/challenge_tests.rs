//! Unit tests for the challenge entity

use std::collections::HashSet;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};

use crate::domain::entities::challenge::{Challenge, CODE_LENGTH};

#[test]
fn test_new_challenge() {
    let now = Utc::now();
    let challenge = Challenge::new(
        "15551234567@c.us",
        Some("https://example.com/hook".to_string()),
        StdDuration::from_secs(300),
        now,
    );

    assert_eq!(challenge.recipient_key, "15551234567@c.us");
    assert_eq!(challenge.secret.len(), CODE_LENGTH);
    assert_eq!(challenge.expires_at - challenge.created_at, Duration::minutes(5));
    assert_eq!(challenge.notify_target.as_deref(), Some("https://example.com/hook"));
    assert!(!challenge.is_expired_at(now));
}

#[test]
fn test_generate_secret_format() {
    for _ in 0..200 {
        let secret = Challenge::generate_secret();
        assert_eq!(secret.len(), CODE_LENGTH);
        let num: u32 = secret.parse().expect("secret should be numeric");
        assert!((100_000..1_000_000).contains(&num));
    }
}

#[test]
fn test_secret_uniqueness() {
    let secrets: HashSet<String> = (0..100).map(|_| Challenge::generate_secret()).collect();
    assert!(secrets.len() > 1);
}

#[test]
fn test_expiry_boundary_is_exclusive() {
    let now = Utc::now();
    let challenge = Challenge::new("a@x", None, StdDuration::from_secs(60), now);

    assert!(!challenge.is_expired_at(now + Duration::seconds(59)));
    assert!(challenge.is_expired_at(challenge.expires_at));
    assert!(challenge.is_expired_at(now + Duration::seconds(61)));
}

#[test]
fn test_matches() {
    let challenge = Challenge::new("a@x", None, StdDuration::from_secs(60), Utc::now());
    let secret = challenge.secret.clone();

    assert!(challenge.matches(&secret));
    assert!(challenge.matches(&format!(" {}\n", secret)));
    assert!(!challenge.matches("12345"));
    assert!(!challenge.matches(""));
    assert!(!challenge.matches(&format!("{}0", secret)));
}

#[test]
fn test_ensure_secret_differs() {
    let mut challenge = Challenge::new("a@x", None, StdDuration::from_secs(60), Utc::now());
    let previous = challenge.secret.clone();
    challenge.ensure_secret_differs(&previous);
    assert_ne!(challenge.secret, previous);
}

#[test]
fn test_remaining_at() {
    let now = Utc::now();
    let challenge = Challenge::new("a@x", None, StdDuration::from_secs(120), now);

    assert_eq!(challenge.remaining_at(now), Duration::seconds(120));
    assert_eq!(challenge.remaining_at(now + Duration::minutes(10)), Duration::zero());
}

#[test]
fn test_huge_ttl_saturates_deadline() {
    let now = Utc::now();
    let challenge = Challenge::new("15551234567@c.us", None, StdDuration::from_secs(u64::MAX), now);

    assert_eq!(challenge.expires_at, chrono::DateTime::<Utc>::MAX_UTC);
    assert!(!challenge.is_expired_at(now));
}
