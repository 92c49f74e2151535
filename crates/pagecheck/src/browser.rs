//! Browser control for headless testing.
//!
//! With the `browser` feature, [`ChromiumDriver`] drives a real Chromium over
//! the Chrome `DevTools` Protocol via chromiumoxide. Element lookups and reads
//! are JavaScript generated from [`ElementPath`]s; clicks are CDP mouse events
//! at the element's center.
//!
//! [`ElementPath`]: crate::ElementPath

use std::path::PathBuf;

/// Environment variable naming the Chromium binary
pub const CHROMIUM_PATH_VAR: &str = "CHROMIUM_PATH";

/// Browser configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Window width
    pub window_width: u32,
    /// Window height
    pub window_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<PathBuf>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
    /// Extra command line arguments
    pub args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1280,
            window_height: 800,
            chromium_path: None,
            sandbox: true,
            args: vec!["--disable-dev-shm-usage".to_string()],
        }
    }
}

impl BrowserConfig {
    /// Default configuration with `CHROMIUM_PATH` applied when set
    #[must_use]
    pub fn from_env() -> Self {
        let config = Self::default();
        match std::env::var_os(CHROMIUM_PATH_VAR).filter(|p| !p.is_empty()) {
            Some(path) => config.with_chromium_path(path),
            None => config,
        }
    }

    /// Set window dimensions
    #[must_use]
    pub const fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }

    /// Append a command line argument
    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

#[cfg(feature = "browser")]
#[allow(clippy::similar_names, clippy::items_after_statements)]
mod cdp {
    use super::BrowserConfig;
    use crate::driver::PageDriver;
    use crate::locator::{ElementPath, Locator};
    use crate::result::{PagecheckError, PagecheckResult};
    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::input::{
        DispatchMouseEventParams, DispatchMouseEventType, MouseButton,
    };
    use chromiumoxide::cdp::browser_protocol::page::{
        CaptureScreenshotFormat, CaptureScreenshotParams,
    };
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use serde::de::DeserializeOwned;
    use serde::Deserialize;
    use tokio::task::JoinHandle;
    use tracing::{debug, warn};

    /// `el` is rendered and visible
    const DISPLAYED_JS: &str = "(() => { const s = window.getComputedStyle(el); \
        return s.display !== 'none' && s.visibility !== 'hidden' \
        && !!(el.offsetWidth || el.offsetHeight || el.getClientRects().length); })()";

    /// Center of `el` in viewport coordinates, after scrolling it into view
    const CENTER_JS: &str = "(() => { el.scrollIntoView({ block: 'center', inline: 'center' }); \
        const r = el.getBoundingClientRect(); \
        return { x: r.left + r.width / 2, y: r.top + r.height / 2, width: r.width, height: r.height }; })()";

    /// Result of a path walk in the page
    #[derive(Debug, Deserialize)]
    struct Lookup<T> {
        found: bool,
        #[serde(default = "Option::default")]
        value: Option<T>,
    }

    #[derive(Debug, Deserialize)]
    struct Center {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    }

    /// Chromium session with a single page
    #[derive(Debug)]
    pub struct ChromiumDriver {
        browser: CdpBrowser,
        page: CdpPage,
        handler: JoinHandle<()>,
        closed: bool,
    }

    impl ChromiumDriver {
        /// Launch Chromium and open one blank page
        ///
        /// # Errors
        ///
        /// Returns error if browser cannot be launched
        pub async fn launch(config: &BrowserConfig) -> PagecheckResult<Self> {
            debug!(?config, "launching chromium");
            let launch_err = |e: String| PagecheckError::BrowserLaunch { message: e };

            let mut builder = CdpConfig::builder()
                .window_size(config.window_width, config.window_height)
                .user_data_dir(
                    std::env::temp_dir().join(format!("pagecheck-{}", uuid::Uuid::new_v4())),
                );
            if !config.headless {
                builder = builder.with_head();
            }
            if !config.sandbox {
                builder = builder.no_sandbox();
            }
            if let Some(path) = &config.chromium_path {
                builder = builder.chrome_executable(path);
            }
            for arg in &config.args {
                builder = builder.arg(arg.as_str());
            }
            let cdp_config = builder.build().map_err(launch_err)?;

            let (browser, mut handler) = CdpBrowser::launch(cdp_config)
                .await
                .map_err(|e| launch_err(e.to_string()))?;

            let handler = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if let Err(e) = event {
                        warn!("browser handler error: {e}");
                    }
                }
            });

            let page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| launch_err(e.to_string()))?;

            Ok(Self {
                browser,
                page,
                handler,
                closed: false,
            })
        }

        async fn eval<T: DeserializeOwned>(&self, script: &str) -> PagecheckResult<T> {
            self.page
                .evaluate(script)
                .await
                .map_err(|e| PagecheckError::script(e.to_string()))?
                .into_value()
                .map_err(|e| PagecheckError::script(e.to_string()))
        }

        /// Evaluate `expr` on the element at `path`
        async fn read<T: DeserializeOwned>(
            &self,
            path: &ElementPath,
            expr: &str,
        ) -> PagecheckResult<Option<T>> {
            let lookup: Lookup<T> = self.eval(&path.script(expr)).await?;
            if lookup.found {
                Ok(lookup.value)
            } else {
                Err(PagecheckError::not_found(path.to_string()))
            }
        }

        async fn mouse(&self, kind: DispatchMouseEventType, x: f64, y: f64) -> PagecheckResult<()> {
            let input_err = |message: String| PagecheckError::Input { message };
            let mut params = DispatchMouseEventParams::builder().r#type(kind.clone()).x(x).y(y);
            if kind != DispatchMouseEventType::MouseMoved {
                params = params.button(MouseButton::Left).click_count(1);
            }
            let params = params.build().map_err(input_err)?;
            self.page
                .execute(params)
                .await
                .map_err(|e| input_err(e.to_string()))?;
            Ok(())
        }

        async fn pointer_click(&self, path: &ElementPath, hover: bool) -> PagecheckResult<()> {
            let center: Center = self
                .read(path, CENTER_JS)
                .await?
                .ok_or_else(|| PagecheckError::not_found(path.to_string()))?;
            if center.width == 0.0 && center.height == 0.0 {
                return Err(PagecheckError::Input {
                    message: format!("element not interactable: {path}"),
                });
            }
            if hover {
                self.mouse(DispatchMouseEventType::MouseMoved, center.x, center.y)
                    .await?;
            }
            self.mouse(DispatchMouseEventType::MousePressed, center.x, center.y)
                .await?;
            self.mouse(DispatchMouseEventType::MouseReleased, center.x, center.y)
                .await
        }
    }

    /// Expression reading property `name` of `el` as a string or null
    fn property_js(name: &str) -> String {
        let name = serde_json::to_string(name).unwrap_or_default();
        format!("(() => {{ const v = el[{name}]; return (v === undefined || v === null) ? null : String(v); }})()")
    }

    /// Property value when it is a primitive, attribute otherwise; `class`
    /// and `style` always read the attribute
    fn attribute_js(name: &str) -> String {
        let name = serde_json::to_string(name).unwrap_or_default();
        format!(
            "(() => {{ const n = {name}; const v = el[n]; \
             if (n !== 'class' && n !== 'style' && v !== undefined && v !== null \
             && typeof v !== 'object' && typeof v !== 'function') {{ return String(v); }} \
             return el.getAttribute(n); }})()"
        )
    }

    #[async_trait]
    impl PageDriver for ChromiumDriver {
        async fn navigate(&mut self, url: &str) -> PagecheckResult<()> {
            debug!(url, "navigate");
            self.page
                .goto(url)
                .await
                .map_err(|e| PagecheckError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            Ok(())
        }

        async fn title(&mut self) -> PagecheckResult<String> {
            self.eval("document.title").await
        }

        async fn current_url(&mut self) -> PagecheckResult<String> {
            self.eval("window.location.href").await
        }

        async fn find_elements(
            &mut self,
            scope: Option<&ElementPath>,
            locator: &Locator,
        ) -> PagecheckResult<usize> {
            let lookup: Lookup<usize> = self
                .eval(&ElementPath::count_script(scope, locator))
                .await?;
            match (lookup.found, scope) {
                (true, _) => Ok(lookup.value.unwrap_or_default()),
                (false, Some(path)) => Err(PagecheckError::not_found(path.to_string())),
                (false, None) => Err(PagecheckError::not_found(locator.to_string())),
            }
        }

        async fn text(&mut self, element: &ElementPath) -> PagecheckResult<String> {
            let expr = format!("({DISPLAYED_JS}) ? (el.innerText || '').trim() : ''");
            Ok(self.read::<String>(element, &expr).await?.unwrap_or_default())
        }

        async fn property(
            &mut self,
            element: &ElementPath,
            name: &str,
        ) -> PagecheckResult<Option<String>> {
            self.read(element, &property_js(name)).await
        }

        async fn attribute(
            &mut self,
            element: &ElementPath,
            name: &str,
        ) -> PagecheckResult<Option<String>> {
            self.read(element, &attribute_js(name)).await
        }

        async fn is_displayed(&mut self, element: &ElementPath) -> PagecheckResult<bool> {
            Ok(self.read::<bool>(element, DISPLAYED_JS).await?.unwrap_or(false))
        }

        async fn is_selected(&mut self, element: &ElementPath) -> PagecheckResult<bool> {
            Ok(self
                .read::<bool>(element, "!!(el.selected || el.checked)")
                .await?
                .unwrap_or(false))
        }

        async fn click(&mut self, element: &ElementPath) -> PagecheckResult<()> {
            debug!(%element, "click");
            self.pointer_click(element, false).await
        }

        async fn hover_click(&mut self, element: &ElementPath) -> PagecheckResult<()> {
            debug!(%element, "hover and click");
            self.pointer_click(element, true).await
        }

        async fn screenshot(&mut self) -> PagecheckResult<Vec<u8>> {
            let params = CaptureScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .build();
            let screenshot = self
                .page
                .execute(params)
                .await
                .map_err(|e| PagecheckError::Screenshot {
                    message: e.to_string(),
                })?;

            use base64::Engine;
            base64::engine::general_purpose::STANDARD
                .decode(&screenshot.data)
                .map_err(|e| PagecheckError::Screenshot {
                    message: e.to_string(),
                })
        }

        async fn quit(&mut self) -> PagecheckResult<()> {
            if self.closed {
                return Ok(());
            }
            self.closed = true;
            let result = self.browser.close().await;
            self.handler.abort();
            result.map_err(|e| PagecheckError::BrowserLaunch {
                message: format!("failed to close browser: {e}"),
            })?;
            debug!("browser closed");
            Ok(())
        }
    }

    impl Drop for ChromiumDriver {
        fn drop(&mut self) {
            if !self.closed {
                warn!("ChromiumDriver dropped without quit(); chromium is killed on drop");
                self.handler.abort();
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_property_js_escapes_name() {
            let js = property_js("innerText");
            assert!(js.contains("el[\"innerText\"]"));
            assert!(js.contains("String(v)"));
        }

        #[test]
        fn test_attribute_js_prefers_primitive_property() {
            let js = attribute_js("src");
            assert!(js.contains("typeof v !== 'object'"));
            assert!(js.contains("getAttribute(n)"));
        }

        #[test]
        fn test_lookup_missing_value() {
            let lookup: Lookup<String> = serde_json::from_str(r#"{"found": false}"#).unwrap();
            assert!(!lookup.found);
            assert!(lookup.value.is_none());
        }

        #[tokio::test]
        #[ignore = "requires chromium"]
        async fn test_launch_and_quit() {
            let config = BrowserConfig::from_env().with_no_sandbox();
            let mut driver = ChromiumDriver::launch(&config).await.unwrap();
            driver
                .navigate("data:text/html,<title>t</title><h1>Hi</h1>")
                .await
                .unwrap();
            assert_eq!(driver.title().await.unwrap(), "t");
            assert_eq!(
                driver.find_elements(None, &Locator::tag("h1")).await.unwrap(),
                1
            );
            driver.quit().await.unwrap();
        }
    }
}

#[cfg(feature = "browser")]
pub use cdp::ChromiumDriver;
