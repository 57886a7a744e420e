// Toolkit settings, loaded from the embedded defaults or a user JSON file
use crate::error::ToolkitError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_CONFIG: &str = include_str!("../../assets/config/default.json");

/// Application name, used for the default data directory
pub const APP_DIR_NAME: &str = "grantdesk";

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub app: AppSettings,
    pub notifications: NotificationSettings,
    pub export: ExportSettings,
    pub api: ApiSettings,
    pub drafts: DraftSettings,
    pub print: PrintSettings,
    pub shortcuts: ShortcutSettings,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    pub financial_year: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            financial_year: "2026-2027".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct NotificationSettings {
    /// Time a notification stays fully visible
    pub display_ms: u64,
    /// Fade-out time before removal
    pub fade_ms: u64,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        NotificationSettings {
            display_ms: 3000,
            fade_ms: 300,
        }
    }
}

impl NotificationSettings {
    pub fn display(&self) -> Duration {
        Duration::from_millis(self.display_ms)
    }

    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }
}

/// How the CSV exporter picks its columns.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColumnSchema {
    /// Every field seen in any record, in first-seen order
    #[default]
    Union,
    /// Only the fields of the first record; extra fields in later records are dropped
    FirstRecord,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ExportSettings {
    pub output_dir: Option<PathBuf>,
    pub column_schema: ColumnSchema,
}

impl ExportSettings {
    // Falls back to the platform download directory, then the working directory.
    pub fn resolved_output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: None,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct DraftSettings {
    pub store_path: Option<PathBuf>,
}

impl DraftSettings {
    pub fn resolved_store_path(&self) -> PathBuf {
        self.store_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR_NAME)
                .join("drafts.json")
        })
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PrintSettings {
    /// Open the rendered report with the system viewer
    pub open_after_render: bool,
}

impl Default for PrintSettings {
    fn default() -> Self {
        PrintSettings {
            open_after_render: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ShortcutSettings {
    pub save: String,
    pub close: String,
    pub quick_search: String,
}

impl Default for ShortcutSettings {
    fn default() -> Self {
        ShortcutSettings {
            save: "Ctrl+S".to_string(),
            close: "Escape".to_string(),
            quick_search: "Ctrl+K".to_string(),
        }
    }
}

impl Settings {
    pub fn load_default() -> Result<Self, ToolkitError> {
        Self::from_json(DEFAULT_CONFIG)
    }

    /// Loads a user configuration file. Sections or fields missing from the
    /// file keep their default values.
    pub fn load(path: &Path) -> Result<Self, ToolkitError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ToolkitError::ConfigError(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        let settings = Self::from_json(&content)?;
        tracing::info!(path = %path.display(), "Loaded configuration");
        Ok(settings)
    }

    pub fn from_json(content: &str) -> Result<Self, ToolkitError> {
        let settings: Settings =
            serde_json::from_str(content).map_err(|e| ToolkitError::ConfigError(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ToolkitError> {
        if self.api.timeout_secs == 0 {
            return Err(ToolkitError::ConfigError(
                "api.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
