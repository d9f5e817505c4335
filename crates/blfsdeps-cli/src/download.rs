use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use blfsdeps_core::source_file_name;
use blfsdeps_installer::SourceDownloader;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use tracing::debug;

use crate::render::OutputStyle;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Streams source archives over HTTP(S).
pub(crate) struct HttpDownloader {
    client: Client,
    style: OutputStyle,
}

impl HttpDownloader {
    pub(crate) fn new(style: OutputStyle) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("blfsdeps/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(None::<Duration>)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client, style })
    }

    fn progress_bar(&self, url: &str, length: Option<u64>) -> ProgressBar {
        if self.style == OutputStyle::Plain {
            return ProgressBar::hidden();
        }
        let progress_bar = match length {
            Some(length) => {
                let progress_bar = ProgressBar::new(length);
                if let Ok(style) = ProgressStyle::with_template(
                    "{msg} [{bar:30.cyan/blue}] {bytes}/{total_bytes} {bytes_per_sec}",
                ) {
                    progress_bar.set_style(style.progress_chars("=>-"));
                }
                progress_bar
            }
            None => {
                let progress_bar = ProgressBar::new_spinner();
                progress_bar.enable_steady_tick(Duration::from_millis(80));
                progress_bar
            }
        };
        progress_bar.set_message(source_file_name(url).unwrap_or(url).to_string());
        progress_bar
    }
}

impl SourceDownloader for HttpDownloader {
    fn download(&self, url: &str, destination: &Path) -> Result<()> {
        debug!(url, destination = %destination.display(), "requesting");
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("failed to request {url}"))?
            .error_for_status()
            .with_context(|| format!("server rejected download of {url}"))?;

        let progress_bar = self.progress_bar(url, response.content_length());
        let file = File::create(destination)
            .with_context(|| format!("failed to create {}", destination.display()))?;
        let mut writer = BufWriter::new(file);
        let mut reader = progress_bar.wrap_read(response);
        let copied = io::copy(&mut reader, &mut writer);
        progress_bar.finish_and_clear();
        let bytes = copied.with_context(|| format!("failed to download {url}"))?;
        writer
            .flush()
            .with_context(|| format!("failed to write {}", destination.display()))?;
        debug!(url, bytes, "download complete");
        Ok(())
    }
}
