use std::time::Duration;

use async_trait::async_trait;
use fantoccini::wd::TimeoutConfiguration;
use fantoccini::{Client, ClientBuilder, Locator};
use tracing::debug;

use crate::config::Browser;
use crate::error::Result;

/// The remote-browser operations the smoke flow is written against.
///
/// `Session` is the real implementation; tests drive the flow with a
/// scripted in-memory driver instead.
#[async_trait]
pub trait Driver {
    async fn set_implicit_wait(&self, timeout: Duration) -> Result<()>;
    async fn set_window_position(&self, x: u32, y: u32) -> Result<()>;
    async fn set_window_size(&self, width: u32, height: u32) -> Result<()>;
    async fn maximize_window(&self) -> Result<()>;
    /// Navigate to the given URL and wait for the page to load.
    async fn open(&self, url: &str) -> Result<()>;
    /// Current page title.
    async fn title(&self) -> Result<String>;
    /// Find a link by its exact link text and click it.
    async fn click_link(&self, text: &str) -> Result<()>;
    /// Close the current browser window.
    async fn close_window(&self) -> Result<()>;
    /// Delete the remote session.
    async fn quit(&self) -> Result<()>;
}

/// A single browser session negotiated with a remote WebDriver hub.
pub struct Session {
    client: Client,
}

impl Session {
    /// Connect to the hub and start a session for the given browser.
    pub async fn connect(hub_url: &str, browser: Browser) -> Result<Self> {
        debug!(hub_url, browser = %browser, "negotiating session");
        let client = ClientBuilder::native()
            .capabilities(browser.capabilities())
            .connect(hub_url)
            .await?;
        Ok(Self { client })
    }

    /// Returns a reference to the underlying fantoccini client.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Driver for Session {
    async fn set_implicit_wait(&self, timeout: Duration) -> Result<()> {
        let timeouts = TimeoutConfiguration::new(None, None, Some(timeout));
        self.client.update_timeouts(timeouts).await?;
        Ok(())
    }

    async fn set_window_position(&self, x: u32, y: u32) -> Result<()> {
        self.client.set_window_position(x, y).await?;
        Ok(())
    }

    async fn set_window_size(&self, width: u32, height: u32) -> Result<()> {
        self.client.set_window_size(width, height).await?;
        Ok(())
    }

    async fn maximize_window(&self) -> Result<()> {
        self.client.maximize_window().await?;
        Ok(())
    }

    async fn open(&self, url: &str) -> Result<()> {
        self.client.goto(url).await?;
        Ok(())
    }

    async fn title(&self) -> Result<String> {
        Ok(self.client.title().await?)
    }

    async fn click_link(&self, text: &str) -> Result<()> {
        self.client.find(Locator::LinkText(text)).await?.click().await?;
        Ok(())
    }

    async fn close_window(&self) -> Result<()> {
        self.client.close_window().await?;
        Ok(())
    }

    async fn quit(&self) -> Result<()> {
        // Client::close consumes; the handle is cheaply cloneable.
        self.client.clone().close().await?;
        Ok(())
    }
}
