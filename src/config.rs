use std::fmt;
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::retry::{RetryPolicy, CONNECT_RETRY, STEP_RETRY};

/// Browsers the hub can hand out sessions for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    #[default]
    Chrome,
    Firefox,
}

impl Browser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Chrome => "chrome",
            Browser::Firefox => "firefox",
        }
    }

    /// W3C capability object sent with the new-session request.
    pub fn capabilities(&self) -> Map<String, Value> {
        let mut caps = Map::new();
        caps.insert("browserName".to_string(), Value::from(self.as_str()));
        caps
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for one smoke-test run, read from the environment.
///
/// Every knob has a default; see the `Default` impl for the values.
#[derive(Debug, Clone)]
pub struct SmokeConfig {
    pub browser: Browser,
    /// Pause between test steps (`TEST_SLEEPS`, fractional seconds).
    pub step_sleep: Duration,
    /// Hub address (`SELENIUM_HUB_PROTO` / `_HOST` / `_PORT`).
    pub hub_proto: String,
    pub hub_host: String,
    pub hub_port: u16,
    /// Initial window size (`SCREEN_WIDTH` / `SCREEN_HEIGHT`).
    pub screen_width: u32,
    pub screen_height: u32,
    /// Target page server (`MOCK_SERVER_HOST` / `MOCK_SERVER_PORT`).
    pub page_host: String,
    pub page_port: u16,
    pub implicit_wait: Duration,
    pub connect_retry: RetryPolicy,
    pub step_retry: RetryPolicy,
}

impl Default for SmokeConfig {
    fn default() -> Self {
        Self {
            browser: Browser::default(),
            step_sleep: Duration::from_millis(100),
            hub_proto: "http".to_string(),
            hub_host: "localhost".to_string(),
            hub_port: 4444,
            screen_width: 800,
            screen_height: 600,
            page_host: "mock".to_string(),
            page_port: 8080,
            implicit_wait: Duration::from_secs(10),
            connect_retry: CONNECT_RETRY,
            step_retry: STEP_RETRY,
        }
    }
}

impl SmokeConfig {
    /// Build a configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup. Unset keys fall
    /// back to defaults; set keys that fail to parse are an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup("TEST_SLEEPS") {
            config.step_sleep = parse_seconds("TEST_SLEEPS", &raw)?;
        }
        if let Some(raw) = lookup("SELENIUM_HUB_PROTO") {
            config.hub_proto = raw;
        }
        if let Some(raw) = lookup("SELENIUM_HUB_HOST") {
            config.hub_host = raw;
        }
        if let Some(raw) = lookup("SELENIUM_HUB_PORT") {
            config.hub_port = parse_number("SELENIUM_HUB_PORT", &raw)?;
        }
        if let Some(raw) = lookup("SCREEN_WIDTH") {
            config.screen_width = parse_number("SCREEN_WIDTH", &raw)?;
        }
        if let Some(raw) = lookup("SCREEN_HEIGHT") {
            config.screen_height = parse_number("SCREEN_HEIGHT", &raw)?;
        }
        if let Some(raw) = lookup("MOCK_SERVER_HOST") {
            config.page_host = raw;
        }
        if let Some(raw) = lookup("MOCK_SERVER_PORT") {
            config.page_port = parse_number("MOCK_SERVER_PORT", &raw)?;
        }

        Ok(config)
    }

    /// WebDriver command endpoint on the hub.
    pub fn hub_url(&self) -> String {
        format!(
            "{}://{}:{}/wd/hub",
            self.hub_proto, self.hub_host, self.hub_port
        )
    }

    /// The page the smoke test exercises.
    pub fn page_url(&self) -> String {
        format!("http://{}:{}/adwords", self.page_host, self.page_port)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| Error::Config {
        key: key.to_string(),
        message: format!("expected a number, got {raw:?}"),
    })
}

fn parse_seconds(key: &str, raw: &str) -> Result<Duration> {
    let secs: f64 = raw.trim().parse().map_err(|_| Error::Config {
        key: key.to_string(),
        message: format!("expected seconds, got {raw:?}"),
    })?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(Error::Config {
            key: key.to_string(),
            message: format!("expected non-negative seconds, got {raw:?}"),
        });
    }
    Ok(Duration::from_secs_f64(secs))
}
