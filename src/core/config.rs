use std::env;
use std::path::PathBuf;

use chrono::format::{Item, StrftimeItems};

use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub app: AppConfig,
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Default page size for list operations
    pub default_page_size: i64,
}

/// Configuration for rendering notification messages
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    /// Locale subdirectory used when looking up message templates (e.g., "en")
    pub locale: String,
    /// chrono format string for dates in messages
    pub date_format: String,
    /// chrono format string for times in messages
    pub time_format: String,
    /// Optional directory holding `<locale>/<name>.jinja` template overrides
    pub template_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            notifications: NotificationConfig::from_env()?,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let default_page_size = env::var("DEFAULT_PAGE_SIZE")
            .unwrap_or_else(|_| DEFAULT_PAGE_SIZE.to_string())
            .parse::<i64>()
            .map_err(|_| "DEFAULT_PAGE_SIZE must be a valid number".to_string())?;

        if !(1..=MAX_PAGE_SIZE).contains(&default_page_size) {
            return Err(format!(
                "DEFAULT_PAGE_SIZE must be between 1 and {}",
                MAX_PAGE_SIZE
            ));
        }

        Ok(Self { default_page_size })
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            locale: Self::DEFAULT_LOCALE.to_string(),
            date_format: Self::DEFAULT_DATE_FORMAT.to_string(),
            time_format: Self::DEFAULT_TIME_FORMAT.to_string(),
            template_dir: None,
        }
    }
}

impl NotificationConfig {
    const DEFAULT_LOCALE: &'static str = "en";
    const DEFAULT_DATE_FORMAT: &'static str = "%Y-%m-%d";
    const DEFAULT_TIME_FORMAT: &'static str = "%H:%M";

    pub fn from_env() -> Result<Self, String> {
        let locale = env::var("APP_LOCALE")
            .ok()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_LOCALE.to_string());

        if !locale.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(format!("Invalid APP_LOCALE: {}", locale));
        }

        let date_format = env::var("DATE_DISPLAY_FORMAT")
            .unwrap_or_else(|_| Self::DEFAULT_DATE_FORMAT.to_string());
        let time_format = env::var("TIME_DISPLAY_FORMAT")
            .unwrap_or_else(|_| Self::DEFAULT_TIME_FORMAT.to_string());

        validate_format("DATE_DISPLAY_FORMAT", &date_format)?;
        validate_format("TIME_DISPLAY_FORMAT", &time_format)?;

        // Only use the override directory if it is non-empty
        let template_dir = env::var("NOTIFICATION_TEMPLATE_DIR")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            locale,
            date_format,
            time_format,
            template_dir,
        })
    }
}

/// Reject chrono format strings that would fail when a message is rendered
fn validate_format(name: &str, format: &str) -> Result<(), String> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(format!("{} is not a valid date/time format: {}", name, format));
    }
    Ok(())
}
