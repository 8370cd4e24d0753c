// tests/config_test.rs

use golfshot_scraper::{Credentials, ErrorPolicy, ScraperConfig, ScraperError};

#[test]
fn test_urls_from_profile() {
    let config = ScraperConfig::new("olOm3");
    assert_eq!(config.signin_url(), "https://play.golfshot.com/signin");
    assert_eq!(
        config.rounds_url(),
        "https://play.golfshot.com/profiles/olOm3/rounds"
    );
    assert_eq!(config.max_attempts, 2);
    assert_eq!(config.error_policy, ErrorPolicy::SkipAndContinue);
}

#[test]
fn test_password_is_redacted() {
    let credentials = Credentials::new("golfer@example.com", "hunter2");
    let debug = format!("{:?}", credentials);
    assert!(debug.contains("golfer@example.com"));
    assert!(!debug.contains("hunter2"));
}

#[test]
fn test_error_classification() {
    let timeout = ScraperError::Timeout {
        url: "https://golf.test".to_string(),
        after: std::time::Duration::from_secs(1),
    };
    assert!(timeout.is_retryable());
    assert!(!timeout.is_fatal());
    assert!(ScraperError::SessionExpired.is_fatal());
    assert!(!ScraperError::SessionExpired.is_retryable());
    assert!(!ScraperError::ParsingError("bad".to_string()).is_retryable());
}

#[test]
fn test_backoff_doubles_and_saturates() {
    let mut config = ScraperConfig::new("olOm3");
    config.retry_backoff = std::time::Duration::from_secs(1);

    assert_eq!(config.backoff_for(1), std::time::Duration::from_secs(1));
    assert_eq!(config.backoff_for(2), std::time::Duration::from_secs(2));
    assert_eq!(config.backoff_for(4), std::time::Duration::from_secs(8));
    // Far past u32 range: no panic, just the longest pause.
    assert_eq!(
        config.backoff_for(40),
        std::time::Duration::from_secs(u32::MAX as u64)
    );
}
