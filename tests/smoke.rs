use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use grid_smoke::smoke::{self, COSTS_LINK, COSTS_TITLE, HOME_LINK, HOME_TITLE};
use grid_smoke::{Driver, Error, Result, RetryPolicy, SmokeConfig};

/// A scripted stand-in for a remote session: serves titles from a fixed
/// two-page site (home <-> costs) and records every call it receives.
struct ScriptedDriver {
    home_title: String,
    costs_title: String,
    /// Title served on the home page after navigating back, when it should
    /// differ from the first visit.
    home_title_after_back: Option<String>,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    page: Page,
    went_back: bool,
    calls: Vec<String>,
}

#[derive(Default, Clone, Copy, PartialEq)]
enum Page {
    #[default]
    None,
    Home,
    Costs,
}

impl ScriptedDriver {
    fn serving_expected_titles() -> Self {
        Self {
            home_title: HOME_TITLE.to_string(),
            costs_title: COSTS_TITLE.to_string(),
            home_title_after_back: None,
            state: Mutex::default(),
        }
    }

    fn record(&self, call: impl Into<String>) {
        self.state.lock().unwrap().calls.push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == call).count()
    }
}

#[async_trait]
impl Driver for ScriptedDriver {
    async fn set_implicit_wait(&self, _timeout: Duration) -> Result<()> {
        self.record("set_implicit_wait");
        Ok(())
    }

    async fn set_window_position(&self, x: u32, y: u32) -> Result<()> {
        self.record(format!("set_window_position:{x},{y}"));
        Ok(())
    }

    async fn set_window_size(&self, width: u32, height: u32) -> Result<()> {
        self.record(format!("set_window_size:{width}x{height}"));
        Ok(())
    }

    async fn maximize_window(&self) -> Result<()> {
        self.record("maximize_window");
        Ok(())
    }

    async fn open(&self, url: &str) -> Result<()> {
        self.record(format!("open:{url}"));
        self.state.lock().unwrap().page = Page::Home;
        Ok(())
    }

    async fn title(&self) -> Result<String> {
        self.record("title");
        let state = self.state.lock().unwrap();
        let title = match state.page {
            Page::None => String::new(),
            Page::Costs => self.costs_title.clone(),
            Page::Home => {
                if state.went_back {
                    self.home_title_after_back
                        .clone()
                        .unwrap_or_else(|| self.home_title.clone())
                } else {
                    self.home_title.clone()
                }
            }
        };
        Ok(title)
    }

    async fn click_link(&self, text: &str) -> Result<()> {
        self.record(format!("click_link:{text}"));
        let mut state = self.state.lock().unwrap();
        match text {
            COSTS_LINK => state.page = Page::Costs,
            HOME_LINK => {
                state.page = Page::Home;
                state.went_back = true;
            }
            other => panic!("scripted site has no link {other:?}"),
        }
        Ok(())
    }

    async fn close_window(&self) -> Result<()> {
        self.record("close_window");
        Ok(())
    }

    async fn quit(&self) -> Result<()> {
        self.record("quit");
        Ok(())
    }
}

fn fast_config() -> SmokeConfig {
    let mut config = SmokeConfig::from_lookup(|_| None).unwrap();
    config.step_sleep = Duration::ZERO;
    config.implicit_wait = Duration::ZERO;
    config.connect_retry = RetryPolicy::new(2, Duration::from_secs(1), Duration::from_millis(1));
    config.step_retry = RetryPolicy::new(3, Duration::from_secs(5), Duration::from_millis(1));
    config
}

#[tokio::test]
async fn full_flow_succeeds_against_a_well_behaved_site() {
    let driver = ScriptedDriver::serving_expected_titles();
    let config = fast_config();

    smoke::run_session(&driver, &config).await.unwrap();

    let calls = driver.calls();
    assert_eq!(calls[0], "set_implicit_wait");
    assert_eq!(calls[1], "set_window_position:0,0");
    assert_eq!(calls[2], "set_window_size:800x600");
    assert_eq!(driver.count("open:http://mock:8080/adwords"), 1);
    assert_eq!(driver.count(&format!("click_link:{COSTS_LINK}")), 1);
    assert_eq!(driver.count("maximize_window"), 1);
    assert_eq!(driver.count(&format!("click_link:{HOME_LINK}")), 1);
    assert_eq!(driver.count("close_window"), 1);
    assert_eq!(calls.last().map(String::as_str), Some("quit"));

    // One title read per stop: home, costs, home again.
    assert_eq!(driver.count("title"), 3);
}

#[tokio::test]
async fn wrong_home_title_exhausts_the_step_retry_budget() {
    let driver = ScriptedDriver {
        home_title: "503 Service Unavailable".to_string(),
        ..ScriptedDriver::serving_expected_titles()
    };
    let config = fast_config();

    let err = smoke::run_session(&driver, &config).await.unwrap_err();
    assert!(matches!(err, Error::TitleMismatch { ref expected, .. } if expected == HOME_TITLE));

    // The whole open step (navigate + title check) is retried as a unit.
    let attempts = config.step_retry.max_attempts as usize;
    assert_eq!(driver.count("open:http://mock:8080/adwords"), attempts);
    assert_eq!(driver.count("title"), attempts);
}

#[tokio::test]
async fn wrong_costs_title_fails_after_retries() {
    let driver = ScriptedDriver {
        costs_title: "Some unrelated page".to_string(),
        ..ScriptedDriver::serving_expected_titles()
    };
    let config = fast_config();

    let err = smoke::run_session(&driver, &config).await.unwrap_err();
    assert!(matches!(err, Error::TitleMismatch { ref expected, .. } if expected == COSTS_TITLE));

    // Only the title check is in the retried step; the click is not redone.
    let attempts = config.step_retry.max_attempts as usize;
    assert_eq!(driver.count(&format!("click_link:{COSTS_LINK}")), 1);
    assert_eq!(driver.count("title"), 1 + attempts);
}

#[tokio::test]
async fn back_navigation_title_is_checked_exactly_once() {
    let driver = ScriptedDriver {
        home_title_after_back: Some("Cached stale page".to_string()),
        ..ScriptedDriver::serving_expected_titles()
    };
    let config = fast_config();

    let err = smoke::run_session(&driver, &config).await.unwrap_err();
    assert!(matches!(err, Error::TitleMismatch { .. }));

    assert_eq!(driver.count(&format!("click_link:{HOME_LINK}")), 1);
    // home + costs + one unretried read after going back
    assert_eq!(driver.count("title"), 3);
}

#[tokio::test]
async fn session_teardown_is_attempted_on_failure() {
    let driver = ScriptedDriver {
        home_title: "nothing like the real thing".to_string(),
        ..ScriptedDriver::serving_expected_titles()
    };
    let config = fast_config();

    assert!(smoke::run_session(&driver, &config).await.is_err());
    assert_eq!(driver.calls().last().map(String::as_str), Some("quit"));
}

/// Full run against a live grid and mock page server, configured through the
/// usual environment variables.
#[tokio::test]
#[ignore = "requires a running WebDriver hub and the mock page server"]
async fn end_to_end_against_a_live_hub() {
    let config = SmokeConfig::from_env().unwrap();
    smoke::run(&config).await.unwrap();
}
