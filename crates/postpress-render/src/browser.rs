//! Shared headless-browser session: one browser process and one page are
//! reused for every post in a run.

use std::path::Path;
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures_util::StreamExt;
use postpress_core::config::RenderConfig;
use tracing::{debug, warn};

use crate::error::{RenderError, Result};

pub struct BrowserSession {
    browser: Browser,
    page: Page,
    handler_task: tokio::task::JoinHandle<()>,
    capture_timeout: Duration,
}

impl BrowserSession {
    pub async fn launch(config: &RenderConfig) -> Result<Self> {
        let viewport = Viewport {
            width: config.width,
            height: config.height,
            ..Viewport::default()
        };
        let browser_config = BrowserConfig::builder()
            .no_sandbox()
            .window_size(config.width, config.height)
            .viewport(viewport)
            .build()
            .map_err(RenderError::Launch)?;

        let (browser, mut handler) = Browser::launch(browser_config).await?;
        // The handler drives all CDP traffic; it ends when the browser goes away.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser.new_page("about:blank").await?;
        debug!(width = config.width, height = config.height, "browser session ready");

        Ok(Self {
            browser,
            page,
            handler_task,
            capture_timeout: Duration::from_secs(config.capture_timeout_secs),
        })
    }

    /// Load `html` into the shared page and screenshot it to `output` as PNG.
    ///
    /// The whole interaction runs under one timeout so a stuck navigation
    /// surfaces as a retryable error instead of hanging the batch.
    pub async fn capture(&self, html: &str, output: &Path) -> Result<()> {
        let secs = self.capture_timeout.as_secs();
        tokio::time::timeout(self.capture_timeout, async {
            self.page.set_content(html).await?;
            self.page.wait_for_navigation().await?;
            self.page
                .save_screenshot(
                    ScreenshotParams::builder()
                        .format(CaptureScreenshotFormat::Png)
                        .full_page(false)
                        .build(),
                    output,
                )
                .await?;
            Ok(())
        })
        .await
        .map_err(|_| RenderError::Timeout { secs })?
    }

    /// Always called at the end of a run, success or failure.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("browser close failed: {e}");
        }
        if let Err(e) = self.browser.wait().await {
            warn!("browser did not exit cleanly: {e}");
        }
        self.handler_task.abort();
    }
}
