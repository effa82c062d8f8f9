use crate::constants::*;
use crate::error::{Result, SyncError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Run configuration. Every section falls back to the defaults in `constants`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub output: OutputConfig,
    pub publish: PublishConfig,
    pub sheet: SheetGeometry,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    pub csv_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            csv_url: DEFAULT_SHEET_CSV_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub snapshot_path: PathBuf,
    pub pages_dir: PathBuf,
    pub label_sheet_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            pages_dir: PathBuf::from(DEFAULT_PAGES_DIR),
            label_sheet_path: PathBuf::from(DEFAULT_LABEL_SHEET_PATH),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PublishConfig {
    pub enabled: bool,
    /// Working tree the git commands run in
    pub repo_dir: PathBuf,
    pub commit_message: String,
    pub github_user: String,
    pub github_repo: String,
    /// Explicit page base address; derived from the GitHub Pages names when unset
    pub base_url: Option<String>,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            repo_dir: PathBuf::from("."),
            commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
            github_user: DEFAULT_GITHUB_USER.to_string(),
            github_repo: DEFAULT_GITHUB_REPO.to_string(),
            base_url: None,
        }
    }
}

/// Label sheet geometry, in PDF points (1/72 inch).
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SheetGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_x: f32,
    pub margin_y: f32,
    pub col_width: f32,
    pub row_height: f32,
    pub qr_size: f32,
    pub items_per_row: usize,
    pub items_per_page: usize,
    /// Horizontal gap between the code and its caption
    pub caption_gap: f32,
    /// Distance of the first caption baseline below the code's top edge
    pub caption_drop: f32,
    pub line_spacing: f32,
    pub title_font_size: f32,
    pub body_font_size: f32,
    pub include_notes: bool,
}

impl Default for SheetGeometry {
    fn default() -> Self {
        // US Letter
        Self {
            page_width: 612.0,
            page_height: 792.0,
            margin_x: 50.0,
            margin_y: 50.0,
            col_width: 300.0,
            row_height: 120.0,
            qr_size: 80.0,
            items_per_row: 2,
            items_per_page: 8,
            caption_gap: 10.0,
            caption_drop: 10.0,
            line_spacing: 15.0,
            title_font_size: 10.0,
            body_font_size: 9.0,
            include_notes: true,
        }
    }
}

impl SheetGeometry {
    pub fn validate(&self) -> Result<()> {
        if self.items_per_row == 0 || self.items_per_page == 0 {
            return Err(SyncError::Config(
                "sheet.items_per_row and sheet.items_per_page must be at least 1".into(),
            ));
        }
        let sizes = [
            ("page_width", self.page_width),
            ("page_height", self.page_height),
            ("col_width", self.col_width),
            ("row_height", self.row_height),
            ("qr_size", self.qr_size),
            ("title_font_size", self.title_font_size),
            ("body_font_size", self.body_font_size),
        ];
        for (name, value) in sizes {
            if !(value > 0.0) {
                return Err(SyncError::Config(format!("sheet.{name} must be positive, got {value}")));
            }
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from `path`, or from `cellar_sync.toml` when present,
    /// or fall back to defaults. Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SyncError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(url) = env_value(ENV_SHEET_CSV_URL) {
            self.source.csv_url = url;
        }
        if let Some(base) = env_value(ENV_BASE_URL) {
            self.publish.base_url = Some(base);
        }
        if let Some(dir) = env_value(ENV_REPO_DIR) {
            self.publish.repo_dir = PathBuf::from(dir);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.source.csv_url.trim().is_empty() {
            return Err(SyncError::Config("source.csv_url must not be empty".into()));
        }
        self.sheet.validate()
    }

    /// Address the detail pages are served from, always ending in `/`.
    pub fn page_base_url(&self) -> String {
        let base = match &self.publish.base_url {
            Some(base) => base.clone(),
            None => format!(
                "https://{}.github.io/{}/{}/",
                self.publish.github_user,
                self.publish.github_repo,
                self.output.pages_dir.display()
            ),
        };
        if base.ends_with('/') {
            base
        } else {
            format!("{base}/")
        }
    }
}

fn env_value(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => None,
    }
}
