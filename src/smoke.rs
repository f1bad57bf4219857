//! The scripted smoke flow: open the mock AdWords page, follow the costs
//! link, come back, and check the page title at every stop.

use tracing::{debug, info};

use crate::config::SmokeConfig;
use crate::error::{Error, Result};
use crate::session::{Driver, Session};

/// Title of the mock AdWords landing page.
pub const HOME_TITLE: &str = "Google AdWords | Pay-per-Click-Onlinewerbung auf Google (PPC)";
/// Title of the mock costs page.
pub const COSTS_TITLE: &str = "Kosten von Google AdWords | Google AdWords";
/// Link text leading from the landing page to the costs page.
pub const COSTS_LINK: &str = "Kosten";
/// Link text leading back to the landing page.
pub const HOME_LINK: &str = "Übersicht";

/// Connect to the hub and run the full smoke flow, tearing the session
/// down at the end no matter how the flow went.
pub async fn run(config: &SmokeConfig) -> Result<()> {
    let hub_url = config.hub_url();
    info!(browser = %config.browser, hub = %hub_url, "connecting to hub");

    let session = config
        .connect_retry
        .run("connect", || Session::connect(&hub_url, config.browser))
        .await?;

    run_session(&session, config).await
}

/// Run the flow on an already-connected driver. Teardown is attempted even
/// when a step failed; its own failure is ignored.
pub async fn run_session<D: Driver>(driver: &D, config: &SmokeConfig) -> Result<()> {
    let result = drive(driver, config).await;
    if let Err(err) = driver.quit().await {
        debug!(error = %err, "session quit failed (ignored)");
    }
    result
}

async fn drive<D: Driver>(driver: &D, config: &SmokeConfig) -> Result<()> {
    driver.set_implicit_wait(config.implicit_wait).await?;
    pause(config).await;

    // Top-left corner, sized to what the container allows.
    driver.set_window_position(0, 0).await?;
    driver
        .set_window_size(config.screen_width, config.screen_height)
        .await?;

    let page_url = config.page_url();
    let url = page_url.as_str();
    config
        .step_retry
        .run("open page", || async move {
            info!(url, "opening page");
            driver.open(url).await?;
            pause(config).await;
            expect_title(driver, HOME_TITLE).await
        })
        .await?;

    config
        .step_retry
        .run("click costs link", || async move {
            info!(link = COSTS_LINK, "clicking link");
            driver.click_link(COSTS_LINK).await?;
            pause(config).await;
            Ok(())
        })
        .await?;

    driver.maximize_window().await?;

    config
        .step_retry
        .run("costs page title", || expect_title(driver, COSTS_TITLE))
        .await?;

    // Back to the landing page. No retry budget from here on: a wrong
    // title after back-navigation is fatal.
    info!(link = HOME_LINK, "going back to the home page");
    driver.click_link(HOME_LINK).await?;
    pause(config).await;
    expect_title(driver, HOME_TITLE).await?;
    pause(config).await;

    info!("closing window");
    driver.close_window().await?;
    pause(config).await;

    Ok(())
}

async fn expect_title<D: Driver>(driver: &D, expected: &str) -> Result<()> {
    let title = driver.title().await?;
    info!(%title, expected, "checking page title");
    ensure_title_contains(&title, expected)
}

fn ensure_title_contains(actual: &str, expected: &str) -> Result<()> {
    if actual.contains(expected) {
        Ok(())
    } else {
        Err(Error::TitleMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }
}

async fn pause(config: &SmokeConfig) {
    tokio::time::sleep(config.step_sleep).await;
}
