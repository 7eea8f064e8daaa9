use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use headless_chrome::protocol::cdp::Network::CookieParam;
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::protocol::cdp::{DOM, Emulation};
use headless_chrome::types::PrintToPdfOptions;
use thiserror::Error;
use url::Url;

use crate::options::{Cookie, LaunchConfig, NavigationConfig, OptionsError, parse_cookie};
use crate::pdf::{PdfConfig, PdfError};
use crate::viewport::Viewport;

#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("ChromeError: {0}")]
    Chrome(#[from] anyhow::Error),
    #[error("NavigationError for {url}: {message}")]
    Navigation { url: String, message: String },
    #[error("can't convert {0:?} to a file:// URL")]
    FileUrl(PathBuf),
    #[error("{0}")]
    Cookie(#[from] OptionsError),
    #[error("PdfError: {0}")]
    Pdf(#[from] PdfError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BrowserError>;

/// A single render job: where the content lives and where the bytes go.
/// With no output path the bytes are streamed raw to stdout.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub target: String,
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ScreenshotConfig {
    pub full_page: bool,
    pub omit_background: bool,
    pub viewport: Option<Viewport>,
}

/// Absolute URLs pass through untouched; anything else is treated as a
/// local path and converted to a file:// URL.
pub fn resolve_target(target: &str) -> Result<Url> {
    if let Ok(url) = Url::parse(target) {
        return Ok(url);
    }

    let path = std::fs::canonicalize(target)?;
    Url::from_file_path(&path).map_err(|_| BrowserError::FileUrl(path))
}

pub struct Browser(headless_chrome::Browser);

impl Browser {
    pub fn launch(config: &LaunchConfig, window_size: Option<Viewport>) -> Result<Self> {
        log::debug!(
            "launching browser (sandbox: {}, extra args: {:?})",
            config.sandbox,
            config.extra_args
        );

        let options = headless_chrome::LaunchOptions {
            sandbox: config.sandbox,
            args: config.extra_args.iter().map(OsStr::new).collect(),
            window_size: window_size.map(|v| (v.width, v.height)),
            ..Default::default()
        };

        Ok(Self(headless_chrome::Browser::new(options)?))
    }

    pub fn open_page(&self, nav: &NavigationConfig) -> Result<Page> {
        let tab = self.0.new_tab()?;
        tab.set_default_timeout(nav.timeout);
        Ok(Page(tab))
    }
}

pub struct Page(Arc<headless_chrome::Tab>);

impl Page {
    /// Cookies must land before navigation or the initial request misses them.
    pub fn set_cookies(&self, cookies: Vec<Cookie>) -> Result<()> {
        let params = cookies
            .into_iter()
            .map(|cookie| CookieParam {
                name: cookie.name,
                value: cookie.value,
                url: Some(cookie.url),
                domain: None,
                path: None,
                secure: None,
                http_only: None,
                same_site: None,
                expires: None,
                priority: None,
                same_party: None,
                source_scheme: None,
                source_port: None,
                partition_key: None,
            })
            .collect();

        self.0.set_cookies(params)?;
        Ok(())
    }

    pub fn goto(&self, url: &Url, nav: &NavigationConfig) -> Result<()> {
        log::debug!("navigating to {url}");

        self.0
            .navigate_to(url.as_str())
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| BrowserError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        if let Some(grace) = nav.wait_until.idle_grace() {
            std::thread::sleep(grace);
        }

        Ok(())
    }

    pub fn print_pdf(&self, options: PrintToPdfOptions) -> Result<Vec<u8>> {
        Ok(self.0.print_to_pdf(Some(options))?)
    }

    pub fn screenshot(&self, config: &ScreenshotConfig) -> Result<Vec<u8>> {
        if config.omit_background {
            self.0
                .call_method(Emulation::SetDefaultBackgroundColorOverride {
                    color: Some(DOM::RGBA {
                        r: 0,
                        g: 0,
                        b: 0,
                        a: Some(0.0),
                    }),
                })?;
        }

        let clip = if config.full_page {
            let body = self.0.wait_for_element("body")?;
            Some(body.get_box_model()?.margin_viewport())
        } else {
            None
        };

        Ok(self
            .0
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, clip, true)?)
    }
}

/// Prints a single target to PDF. Launches a fresh browser that is torn
/// down when it drops, on success and failure alike.
pub fn print_page(
    request: &RenderRequest,
    pdf: &PdfConfig,
    nav: &NavigationConfig,
    launch: &LaunchConfig,
    cookie: Option<&str>,
) -> Result<()> {
    let url = resolve_target(&request.target)?;

    let browser = Browser::launch(launch, None)?;
    let page = browser.open_page(nav)?;

    if let Some(spec) = cookie {
        page.set_cookies(vec![parse_cookie(url.as_str(), spec)?])?;
    }

    page.goto(&url, nav)?;
    let bytes = page.print_pdf(pdf.to_print_options(None)?)?;
    write_output(&bytes, request.output.as_deref())?;

    log::info!("printed {} ({} bytes)", url, bytes.len());
    Ok(())
}

/// Captures a single target as a PNG screenshot. Same lifecycle as
/// [`print_page`]; the viewport, when given, is applied at launch.
pub fn screenshot_page(
    request: &RenderRequest,
    config: &ScreenshotConfig,
    nav: &NavigationConfig,
    launch: &LaunchConfig,
    cookie: Option<&str>,
) -> Result<()> {
    let url = resolve_target(&request.target)?;

    let browser = Browser::launch(launch, config.viewport)?;
    let page = browser.open_page(nav)?;

    if let Some(spec) = cookie {
        page.set_cookies(vec![parse_cookie(url.as_str(), spec)?])?;
    }

    page.goto(&url, nav)?;
    let bytes = page.screenshot(config)?;
    write_output(&bytes, request.output.as_deref())?;

    log::info!("captured {} ({} bytes)", url, bytes.len());
    Ok(())
}

pub fn write_output(bytes: &[u8], output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, bytes)?,
        None => std::io::stdout().lock().write_all(bytes)?,
    }
    Ok(())
}
