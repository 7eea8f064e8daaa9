use clap::ValueEnum;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("MalformedCookieError: expected key:value, got {0:?}")]
    MalformedCookie(String),
}

pub type Result<T> = std::result::Result<T, OptionsError>;

/// Chrome refuses to drop its sandbox unless both flags are passed together.
pub const NO_SANDBOX_ARGS: [&str; 2] = ["--no-sandbox", "--disable-setuid-sandbox"];

#[derive(Debug, Clone)]
pub struct LaunchConfig {
    pub sandbox: bool,
    pub extra_args: Vec<String>,
}

impl LaunchConfig {
    pub fn new(sandbox: bool) -> Self {
        let extra_args = if sandbox {
            Vec::new()
        } else {
            NO_SANDBOX_ARGS.iter().map(|s| s.to_string()).collect()
        };

        Self { sandbox, extra_args }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NavigationConfig {
    pub timeout: Duration,
    pub wait_until: WaitUntil,
}

impl NavigationConfig {
    pub fn new(timeout_ms: u64, wait_until: WaitUntil) -> Self {
        Self {
            timeout: Duration::from_millis(timeout_ms),
            wait_until,
        }
    }
}

/// Readiness condition navigation blocks on before rendering starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WaitUntil {
    Load,
    #[value(name = "domcontentloaded")]
    DomContentLoaded,
    #[value(name = "networkidle0")]
    NetworkIdle0,
    #[value(name = "networkidle2")]
    NetworkIdle2,
}

impl WaitUntil {
    /// Extra settling time after the load event for the network-idle
    /// conditions; the engine itself only signals up to `load`.
    pub fn idle_grace(self) -> Option<Duration> {
        match self {
            WaitUntil::NetworkIdle0 | WaitUntil::NetworkIdle2 => Some(Duration::from_millis(500)),
            WaitUntil::Load | WaitUntil::DomContentLoaded => None,
        }
    }
}

/// Cookie injected into the page before navigation,
/// always scoped to the navigation target URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub url: String,
}

/// Splits a `key:value` cookie spec at the first `:`.
pub fn parse_cookie(target_url: &str, spec: &str) -> Result<Cookie> {
    let (name, value) = spec
        .split_once(':')
        .ok_or_else(|| OptionsError::MalformedCookie(spec.to_string()))?;

    Ok(Cookie {
        name: name.to_string(),
        value: value.to_string(),
        url: target_url.to_string(),
    })
}
