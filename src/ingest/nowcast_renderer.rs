/// Rain Nowcast Renderer
///
/// The HKO rainfall nowcast page builds its time-series images with
/// JavaScript, so the image list is scraped by an external headless-browser
/// script. This module builds the page URL, runs the script, and decodes
/// its JSON output. The renderer itself is an opaque collaborator: it is
/// given a retry count and is expected to print
/// `[{"src": "...", "alt": "..."}, ...]` on stdout.

use std::path::PathBuf;
use std::process::Command;

use reqwest::Url;

use crate::model::{NowcastError, RainImage};

/// Anything that can turn a nowcast page URL into its image list.
pub trait RainImageSource {
    fn fetch_images(&self, url: &str, retry: u32) -> Result<Vec<RainImage>, NowcastError>;
}

/// Runs `<program> <script> <url> <retry>` and parses stdout.
#[derive(Debug, Clone)]
pub struct NodeRenderer {
    pub program: String,
    pub script: PathBuf,
}

impl NodeRenderer {
    pub fn new(program: impl Into<String>, script: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            script: script.into(),
        }
    }
}

impl RainImageSource for NodeRenderer {
    fn fetch_images(&self, url: &str, retry: u32) -> Result<Vec<RainImage>, NowcastError> {
        let output = Command::new(&self.program)
            .arg(&self.script)
            .arg(url)
            .arg(retry.to_string())
            .output()?;

        if !output.status.success() {
            return Err(NowcastError::ExitStatus(output.status.to_string()));
        }

        parse_renderer_output(&output.stdout)
    }
}

/// Decodes the renderer's stdout.
pub fn parse_renderer_output(stdout: &[u8]) -> Result<Vec<RainImage>, NowcastError> {
    Ok(serde_json::from_slice(stdout)?)
}

/// Adds `lat`/`lon` to the nowcast page URL, keeping any existing query.
pub fn build_nowcast_url(base_url: &str, latitude: f64, longitude: f64) -> String {
    match Url::parse(base_url) {
        Ok(mut url) => {
            url.query_pairs_mut()
                .append_pair("lat", &latitude.to_string())
                .append_pair("lon", &longitude.to_string());
            url.to_string()
        }
        // Not a URL we can edit; let the renderer report it.
        Err(_) => base_url.to_string(),
    }
}
