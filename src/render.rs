//! Headless Chromium rasterizer.
//!
//! The browser is a scoped resource: [`BrowserSession`] is launched right
//! before the capture and closed afterwards whether or not the capture
//! succeeded. Dropping a session without closing it (panic, cancelled future)
//! still stops the event-loop task, and chromiumoxide kills the child process.

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::{CaptureScreenshotFormat, Viewport as ClipRect};
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::ScreenshotParams;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::config::RenderConfig;
use crate::report::REPORT_CONTAINER_ID;
use crate::{BulletinError, Result};

/// Turns an HTML document into PNG bytes of its report container.
pub trait Rasterizer {
    async fn capture(&self, html: &str) -> Result<Vec<u8>>;
}

pub struct ChromiumRasterizer {
    config: RenderConfig,
    selector: String,
}

impl ChromiumRasterizer {
    #[must_use]
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            selector: format!("#{REPORT_CONTAINER_ID}"),
        }
    }

    fn browser_config(&self) -> Result<BrowserConfig> {
        let viewport = Viewport {
            width: self.config.width,
            height: self.config.height,
            device_scale_factor: Some(self.config.device_scale_factor),
            ..Viewport::default()
        };

        let mut builder = BrowserConfig::builder()
            .window_size(self.config.width, self.config.height)
            .viewport(viewport)
            .arg("--disable-dev-shm-usage")
            .arg("--font-render-hinting=medium");

        if !self.config.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(executable) = &self.config.chrome_executable {
            builder = builder.chrome_executable(executable);
        }
        for arg in &self.config.extra_args {
            builder = builder.arg(arg.as_str());
        }

        builder.build().map_err(BulletinError::render)
    }
}

impl Rasterizer for ChromiumRasterizer {
    #[instrument(skip_all, fields(selector = %self.selector))]
    async fn capture(&self, html: &str) -> Result<Vec<u8>> {
        let session = BrowserSession::launch(self.browser_config()?).await?;
        let outcome = session.screenshot_element(html, &self.selector).await;
        session.close().await;
        outcome
    }
}

/// A running browser plus the task driving its CDP event loop.
struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl BrowserSession {
    async fn launch(config: BrowserConfig) -> Result<Self> {
        info!("Launching headless Chromium");
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BulletinError::render(format!("Failed to launch browser: {e}")))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler stopped: {}", e);
                    break;
                }
            }
        });

        Ok(Self { browser, handler })
    }

    async fn screenshot_element(&self, html: &str, selector: &str) -> Result<Vec<u8>> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| BulletinError::render(format!("Failed to open page: {e}")))?;

        page.set_content(html)
            .await
            .map_err(|e| BulletinError::render(format!("Failed to load report HTML: {e}")))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| BulletinError::render(format!("Page did not finish loading: {e}")))?;

        let elements = page
            .find_elements(selector)
            .await
            .map_err(|e| BulletinError::render(format!("Element lookup failed: {e}")))?;
        let element = first_match(selector, elements)?;

        let bounds = element
            .bounding_box()
            .await
            .map_err(|e| BulletinError::render(format!("Failed to measure container: {e}")))?;
        let metrics = page
            .layout_metrics()
            .await
            .map_err(|e| BulletinError::render(format!("Failed to read layout metrics: {e}")))?;
        let scroll = &metrics.css_layout_viewport;
        let clip = element_clip(
            ElementBox {
                x: bounds.x,
                y: bounds.y,
                width: bounds.width,
                height: bounds.height,
            },
            scroll.page_x as f64,
            scroll.page_y as f64,
        );
        debug!(x = clip.x, y = clip.y, width = clip.width, height = clip.height, "Report clip");

        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .clip(clip)
            .capture_beyond_viewport(true)
            .build();
        let png = page
            .screenshot(params)
            .await
            .map_err(|e| BulletinError::render(format!("Screenshot failed: {e}")))?;

        debug!(bytes = png.len(), "Captured report container");
        Ok(png)
    }

    async fn close(mut self) {
        info!("Closing headless Chromium");
        if let Err(e) = self.browser.close().await {
            warn!("Browser did not close cleanly: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            warn!("Failed to reap browser process: {}", e);
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

/// Element border box in CSS pixels, relative to the visible viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ElementBox {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

/// Page-space clip covering the whole element. The scroll offset is added
/// exactly once and the edges are rounded outwards to whole pixels.
fn element_clip(element: ElementBox, scroll_x: f64, scroll_y: f64) -> ClipRect {
    let left = (element.x + scroll_x).max(0.0).floor();
    let top = (element.y + scroll_y).max(0.0).floor();
    let right = (element.x + scroll_x + element.width).ceil();
    let bottom = (element.y + scroll_y + element.height).ceil();
    ClipRect {
        x: left,
        y: top,
        width: (right - left).max(1.0),
        height: (bottom - top).max(1.0),
        scale: 1.0,
    }
}

/// The capture target is the first element matching `selector`.
fn first_match<T>(selector: &str, found: Vec<T>) -> Result<T> {
    found
        .into_iter()
        .next()
        .ok_or_else(|| BulletinError::render_target_not_found(selector))
}
