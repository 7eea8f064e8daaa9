use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::browser::{Browser, BrowserError, resolve_target};
use crate::options::{LaunchConfig, NavigationConfig};
use crate::pdf::PdfConfig;

/// Pause after each entry's write; navigating again immediately can make
/// the engine serve the previous render.
const SETTLE_DELAY: Duration = Duration::from_millis(50);

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("ManifestParseError: can't read {path:?}: {source}")]
    ManifestRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("ManifestParseError: {path:?} is not a valid batch manifest: {source}")]
    ManifestJson {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Browser(#[from] BrowserError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BatchError>;

/// External contract of the bulk-print manifest. Structure is validated
/// in full at load time, before any entry is rendered.
#[derive(Debug, Deserialize)]
pub struct BatchManifest {
    pub data: Vec<BatchEntry>,
}

#[derive(Debug, Deserialize)]
pub struct BatchEntry {
    #[serde(rename = "htmlFile")]
    pub html_file: PathBuf,
    #[serde(rename = "tmpPDFFile")]
    pub destination: PathBuf,
    #[serde(rename = "pdfObject")]
    pub pdf_object: PdfObject,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfObject {
    pub is_landscape: bool,
    pub footer_template: String,
    pub footer_height: String,
}

impl BatchManifest {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| BatchError::ManifestRead {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| BatchError::ManifestJson {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Manifests carry over-escaped footer templates; `\"` means `"`.
fn unescape_template(template: &str) -> String {
    template.replace("\\\"", "\"")
}

/// Renders every manifest entry in order, reusing one browser and one tab
/// for the whole run. The first failing entry aborts the batch; files
/// already written stay on disk.
pub fn run_batch(
    manifest_path: &Path,
    shared: &PdfConfig,
    nav: &NavigationConfig,
    launch: &LaunchConfig,
) -> Result<()> {
    let manifest = BatchManifest::load(manifest_path)?;
    log::info!(
        "printing {} documents from {}",
        manifest.data.len(),
        manifest_path.display()
    );

    let browser = Browser::launch(launch, None)?;
    let page = browser.open_page(nav)?;

    for entry in &manifest.data {
        let url = resolve_target(&entry.html_file.to_string_lossy())?;
        page.goto(&url, nav)?;

        let mut pdf = shared.clone();
        pdf.landscape = entry.pdf_object.is_landscape;
        pdf.footer_template = unescape_template(&entry.pdf_object.footer_template);

        let options = pdf
            .to_print_options(Some(&entry.pdf_object.footer_height))
            .map_err(BrowserError::from)?;
        let bytes = page.print_pdf(options)?;
        std::fs::write(&entry.destination, &bytes)?;

        log::info!("wrote {} ({} bytes)", entry.destination.display(), bytes.len());

        std::thread::sleep(SETTLE_DELAY);
    }

    Ok(())
}
