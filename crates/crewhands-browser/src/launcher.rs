//! Chrome process launcher.
//!
//! Every session gets its own browser process, debugging port and throwaway
//! profile directory, so concurrent adapters never share cookies or tabs.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

use tempfile::TempDir;
use tokio::process::{Child, Command};
use tracing::{debug, info};

use crewhands_protocols::SessionOptions;

use crate::error::BrowserError;

/// Ports handed out above the base port before wrapping around.
const PORT_SPAN: u16 = 200;

#[derive(Debug, Clone)]
pub struct LaunchConfig {
    /// Explicit browser binary; searched in the usual places when unset.
    pub chrome_path: Option<PathBuf>,
    pub headless: bool,
    pub base_debug_port: u16,
    /// How long to wait for the debugging endpoint to come up.
    pub startup_timeout: Duration,
    /// Per-navigation load timeout for sessions.
    pub load_timeout: Duration,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            chrome_path: None,
            headless: true,
            base_debug_port: 9333,
            startup_timeout: Duration::from_secs(6),
            load_timeout: Duration::from_secs(30),
        }
    }
}

/// A launched browser. The process is killed and the profile removed when
/// this is dropped.
#[derive(Debug)]
pub struct BrowserProcess {
    child: Child,
    port: u16,
    _profile: TempDir,
}

impl BrowserProcess {
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn endpoint(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    pub async fn kill(&mut self) {
        if let Err(e) = self.child.kill().await {
            debug!("Chrome {} already gone: {}", self.port, e);
        }
    }
}

#[derive(Debug)]
pub struct ChromeLauncher {
    config: LaunchConfig,
    next_port: AtomicU16,
}

impl ChromeLauncher {
    pub fn new(config: LaunchConfig) -> Self {
        Self {
            config,
            next_port: AtomicU16::new(0),
        }
    }

    pub fn config(&self) -> &LaunchConfig {
        &self.config
    }

    /// Find Chrome executable path.
    pub fn find_chrome() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        let paths: &[&str] = &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
        ];

        #[cfg(target_os = "linux")]
        let paths: &[&str] = &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
        ];

        #[cfg(target_os = "windows")]
        let paths: &[&str] = &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ];

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        let paths: &[&str] = &[];

        paths.iter().map(PathBuf::from).find(|p| p.exists())
    }

    fn chrome_binary(&self) -> Result<PathBuf, BrowserError> {
        match &self.config.chrome_path {
            Some(path) if path.exists() => Ok(path.clone()),
            Some(path) => Err(BrowserError::LaunchFailed(format!(
                "{} does not exist",
                path.display()
            ))),
            None => Self::find_chrome().ok_or(BrowserError::ChromeNotFound),
        }
    }

    /// Next debugging port, unique among concurrently open sessions.
    pub fn next_port(&self) -> u16 {
        let offset = self.next_port.fetch_add(1, Ordering::Relaxed) % PORT_SPAN;
        self.config.base_debug_port.saturating_add(offset)
    }

    /// Command-line flags for one session.
    pub fn chrome_args(&self, port: u16, profile_dir: &Path, options: &SessionOptions) -> Vec<String> {
        let mut args = vec![
            format!("--remote-debugging-port={}", port),
            format!("--user-data-dir={}", profile_dir.display()),
            format!(
                "--window-size={},{}",
                options.viewport.width, options.viewport.height
            ),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            "--disable-background-networking".to_string(),
            "--disable-sync".to_string(),
            "--disable-translate".to_string(),
            "--metrics-recording-only".to_string(),
        ];
        if let Some(proxy) = &options.proxy_server {
            args.push(format!("--proxy-server={}", proxy));
        }
        if self.config.headless {
            args.push("--headless=new".to_string());
        }
        args.push("about:blank".to_string());
        args
    }

    /// Start a browser and wait for its debugging endpoint.
    pub async fn launch(&self, options: &SessionOptions) -> Result<BrowserProcess, BrowserError> {
        let chrome_path = self.chrome_binary()?;
        let profile = tempfile::Builder::new().prefix("crewhands-profile-").tempdir()?;
        let port = self.next_port();

        let child = Command::new(&chrome_path)
            .args(self.chrome_args(port, profile.path(), options))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        let mut process = BrowserProcess {
            child,
            port,
            _profile: profile,
        };
        info!(
            "Chrome launched with PID {:?} on port {}{}",
            process.pid(),
            port,
            options
                .proxy_server
                .as_deref()
                .map(|p| format!(" via {}", p))
                .unwrap_or_default()
        );

        if let Err(e) = self.wait_until_ready(&process).await {
            process.kill().await;
            return Err(e);
        }
        Ok(process)
    }

    async fn wait_until_ready(&self, process: &BrowserProcess) -> Result<(), BrowserError> {
        let version_url = format!("{}/json/version", process.endpoint());
        let attempts = (self.config.startup_timeout.as_millis() / 200).max(1);
        for _ in 0..attempts {
            tokio::time::sleep(Duration::from_millis(200)).await;
            if reqwest::get(&version_url).await.is_ok() {
                return Ok(());
            }
        }
        Err(BrowserError::LaunchFailed(format!(
            "Chrome failed to start within {:?} on port {}",
            self.config.startup_timeout, process.port
        )))
    }
}
