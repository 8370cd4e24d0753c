use crate::error::ConfigError;
use crate::models::DelayConfig;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const USERNAME_VAR: &str = "GOLFSHOT_USERNAME";
pub const PASSWORD_VAR: &str = "GOLFSHOT_PASSWORD";
pub const PROFILE_VAR: &str = "GOLFSHOT_PROFILE";

pub const DEFAULT_BASE_URL: &str = "https://play.golfshot.com";
pub const DEFAULT_SIGNIN_PATH: &str = "/signin";

/// Username/password pair for the Golfshot account.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Reads `GOLFSHOT_USERNAME` / `GOLFSHOT_PASSWORD`, after loading `.env` if there is one.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Ok(Self {
            username: require_var(USERNAME_VAR)?,
            password: require_var(PASSWORD_VAR)?,
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// What to do when a single round fails to extract or normalize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Log the failure, record the round as skipped and move on.
    #[default]
    SkipAndContinue,
    /// Stop at the first failing round.
    AbortOnFirst,
}

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub base_url: String,
    pub signin_path: String,
    /// Public profile identifier, as it appears in `/profiles/{id}/rounds`.
    pub profile_id: String,
    /// Upper bound on waiting for the sign-in form to show up.
    pub login_wait: Duration,
    /// Pause after submitting credentials so the server-side session settles.
    pub settle: Duration,
    pub navigation_timeout: Duration,
    /// Attempts per round, including the first one.
    pub max_attempts: u32,
    /// Backoff before the second attempt; doubled for each one after.
    pub retry_backoff: Duration,
    pub max_pages: usize,
    pub error_policy: ErrorPolicy,
    pub delay: DelayConfig,
    pub cache_dir: Option<PathBuf>,
    pub cache_ttl: Duration,
}

impl ScraperConfig {
    pub fn new(profile_id: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            signin_path: DEFAULT_SIGNIN_PATH.to_string(),
            profile_id: profile_id.into(),
            login_wait: Duration::from_secs(10),
            settle: Duration::from_secs(5),
            navigation_timeout: Duration::from_secs(30),
            max_attempts: 2,
            retry_backoff: Duration::from_secs(1),
            max_pages: 50,
            error_policy: ErrorPolicy::default(),
            delay: DelayConfig::default(),
            cache_dir: None,
            cache_ttl: Duration::from_secs(7 * 24 * 60 * 60),
        }
    }

    /// Builds a config from `GOLFSHOT_PROFILE` and the optional `GOLFSHOT_BASE_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let mut config = Self::new(require_var(PROFILE_VAR)?);
        if let Ok(base_url) = env::var("GOLFSHOT_BASE_URL") {
            if !base_url.starts_with("http") {
                return Err(ConfigError::Invalid {
                    name: "GOLFSHOT_BASE_URL",
                    value: base_url,
                });
            }
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        Ok(config)
    }

    /// Pause after failed attempt `attempt` (1-based): `retry_backoff` doubled
    /// per earlier attempt, saturating instead of overflowing.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2u32
            .checked_pow(attempt.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.retry_backoff.saturating_mul(factor)
    }

    pub fn signin_url(&self) -> String {
        format!("{}{}", self.base_url, self.signin_path)
    }

    pub fn rounds_url(&self) -> String {
        format!("{}/profiles/{}/rounds", self.base_url, self.profile_id)
    }
}

fn require_var(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(name)),
    }
}
