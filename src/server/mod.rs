use crate::checker::client::LanguageToolClient;
use crate::config::ServerConfig;
use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Owns the spawned LanguageTool server process for the lifetime of the
/// application. Dropping the handle terminates the child, so the server
/// never outlives the run that started it.
#[derive(Debug)]
pub struct ServerHandle {
    child: Child,
    port: u16,
}

impl ServerHandle {
    /// Launch `java -jar <jar> --port <port>`. A missing java binary or jar
    /// is fatal: nothing can be checked without the server.
    pub fn start(config: &ServerConfig) -> Result<Self> {
        let java = config
            .java_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("java"));

        if let Some(path) = &config.java_path {
            if !path.exists() {
                bail!("Java not found at {}", path.display());
            }
        }
        if !config.jar_path.exists() {
            bail!(
                "LanguageTool server jar not found at {}",
                config.jar_path.display()
            );
        }

        let child = Command::new(&java)
            .arg("-jar")
            .arg(&config.jar_path)
            .arg("--port")
            .arg(config.port.to_string())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to launch {}", java.display()))?;

        Ok(Self {
            child,
            port: config.port,
        })
    }

    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Poll the HTTP endpoint until the server answers or `timeout` elapses.
    pub fn wait_until_ready(&mut self, timeout: Duration) -> Result<()> {
        let client = LanguageToolClient::new(self.url(), Duration::from_secs(2))?;

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        spinner.set_message("Waiting for LanguageTool server...");

        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Some(status) = self.child.try_wait().context("Failed to poll server process")? {
                spinner.finish_and_clear();
                bail!("LanguageTool server exited during startup ({})", status);
            }
            if client.is_ready() {
                spinner.finish_with_message("Server ready");
                return Ok(());
            }
            thread::sleep(Duration::from_millis(250));
            spinner.tick();
        }

        spinner.finish_and_clear();
        bail!(
            "LanguageTool server did not become ready within {} seconds",
            timeout.as_secs()
        )
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
