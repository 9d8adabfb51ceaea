//! Viewer configuration
//!
//! Settings are loaded once by the host and passed explicitly into every
//! [`ViewState`](crate::ViewState) constructor. Nothing in the engine reads
//! a process-wide settings registry.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SettingsError;
use crate::zoom::ZoomBands;

pub const CURRENT_VERSION: u32 = 1;
const SETTINGS_FILENAME: &str = "config.yaml";
const APP_NAME: &str = "pagekeeper";

/// How pages are fitted into the view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PageAlign {
    /// Page width matches view width
    Width,
    /// Page height matches view height
    Height,
    /// Whole page fits into the view
    #[default]
    Auto,
}

/// Document view mode, one controller variant per mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DocumentViewMode {
    /// Continuous vertical scroll
    #[default]
    VerticalScroll,
    /// Continuous horizontal scroll
    HorizontalScroll,
    /// One page at a time
    SinglePage,
}

impl DocumentViewMode {
    /// Alignment forced by the mode, if any
    #[must_use]
    pub fn forced_align(self) -> Option<PageAlign> {
        match self {
            DocumentViewMode::VerticalScroll => Some(PageAlign::Width),
            DocumentViewMode::HorizontalScroll => Some(PageAlign::Height),
            DocumentViewMode::SinglePage => None,
        }
    }

    /// Effective alignment for a book: the mode's forced alignment, else the
    /// book's own choice. Without book settings alignment is `Auto`.
    #[must_use]
    pub fn page_align(book: Option<&BookSettings>) -> PageAlign {
        match book {
            Some(book) => book.view_mode.forced_align().unwrap_or(book.page_align),
            None => PageAlign::Auto,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentViewMode::VerticalScroll => "vertical_scroll",
            DocumentViewMode::HorizontalScroll => "horizontal_scroll",
            DocumentViewMode::SinglePage => "single_page",
        }
    }
}

/// Application-wide settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Number of pages kept resident around the current page
    #[serde(default = "default_pages_in_memory")]
    pub pages_in_memory: usize,

    #[serde(default)]
    pub night_mode: bool,

    /// Capacity of the optional page bounds cache, 0 disables it
    #[serde(default)]
    pub bounds_cache_capacity: usize,

    #[serde(default)]
    pub zoom_bands: ZoomBands,
}

fn default_pages_in_memory() -> usize {
    3
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            pages_in_memory: default_pages_in_memory(),
            night_mode: false,
            bounds_cache_capacity: 0,
            zoom_bands: ZoomBands::default(),
        }
    }
}

/// Per-document settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSettings {
    #[serde(default)]
    pub view_mode: DocumentViewMode,

    #[serde(default)]
    pub page_align: PageAlign,

    #[serde(default = "default_zoom")]
    pub zoom: f32,
}

fn default_zoom() -> f32 {
    1.0
}

impl Default for BookSettings {
    fn default() -> Self {
        Self {
            view_mode: DocumentViewMode::default(),
            page_align: PageAlign::default(),
            zoom: default_zoom(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub app: AppSettings,

    /// Settings of the open book, absent before a book is opened
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book: Option<BookSettings>,
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            app: AppSettings::default(),
            book: Some(BookSettings::default()),
        }
    }
}

impl Settings {
    /// Default config location under the user's config directory
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        dirs::config_dir()
            .map(|config| config.join(APP_NAME).join(SETTINGS_FILENAME))
            .ok_or(SettingsError::NoConfigDir)
    }

    /// Parse settings from YAML text, correcting invalid values
    pub fn from_yaml(content: &str, path: &Path) -> Result<Self, SettingsError> {
        let mut settings: Settings =
            serde_yaml::from_str(content).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.sanitize();
        Ok(settings)
    }

    /// Load settings from `path`, migrating and re-saving older versions
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut settings = Self::from_yaml(&content, path)?;
        debug!("Loaded settings from {path:?}");

        if settings.version < CURRENT_VERSION {
            settings.migrate();
            settings.save(path)?;
        }
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any failure.
    ///
    /// A missing file is created with defaults.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            info!("Settings file not found, creating with defaults at {path:?}");
            let settings = Self::default();
            if let Err(e) = settings.save(path) {
                warn!("{e}");
            }
            return settings;
        }
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{e}");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let mut content = String::from(SETTINGS_HEADER);
        content.push_str(&serde_yaml::to_string(self)?);

        fs::write(path, content).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Saved settings to {path:?}");
        Ok(())
    }

    fn migrate(&mut self) {
        info!(
            "Migrating settings from v{} to v{}",
            self.version, CURRENT_VERSION
        );
        self.version = CURRENT_VERSION;
    }

    fn sanitize(&mut self) {
        if self.app.pages_in_memory == 0 {
            warn!("pages_in_memory must be positive, using 1");
            self.app.pages_in_memory = 1;
        }
        if !self.app.zoom_bands.is_valid() {
            warn!(
                "Invalid zoom bands {:?}, using defaults",
                self.app.zoom_bands
            );
            self.app.zoom_bands = ZoomBands::default();
        }
        if let Some(book) = self.book.as_mut() {
            if !book.zoom.is_finite() || book.zoom <= 0.0 {
                warn!("Invalid book zoom {}, using 1.0", book.zoom);
                book.zoom = default_zoom();
            }
        }
    }

    /// Effective page alignment for the open book
    #[must_use]
    pub fn page_align(&self) -> PageAlign {
        DocumentViewMode::page_align(self.book.as_ref())
    }

    #[must_use]
    pub fn view_mode(&self) -> DocumentViewMode {
        self.book
            .as_ref()
            .map(|b| b.view_mode)
            .unwrap_or_default()
    }
}

const SETTINGS_HEADER: &str = r#"# ============================================================================
# pagekeeper settings
# ============================================================================
# app.pages_in_memory        pages kept resident around the current page
# app.night_mode             render pages with the night palette
# app.bounds_cache_capacity  page bounds cache entries, 0 disables the cache
# app.zoom_bands             zoom cut points for tile residency
# book.view_mode             vertical_scroll | horizontal_scroll | single_page
# book.page_align            width | height | auto (single_page only)

"#;
