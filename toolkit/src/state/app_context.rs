// Application context passed explicitly to the components that need it.
use crate::config::AppSettings;
use crate::error::ToolkitError;
use url::Url;

pub const DEFAULT_FINANCIAL_YEAR: &str = "2026-2027";
const FINANCIAL_YEAR_PARAM: &str = "financial_year";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppContext {
    pub financial_year: String,
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new(DEFAULT_FINANCIAL_YEAR)
    }
}

impl AppContext {
    pub fn new(financial_year: &str) -> Self {
        Self {
            financial_year: financial_year.to_string(),
        }
    }

    pub fn from_settings(settings: &AppSettings) -> Self {
        if settings.financial_year.trim().is_empty() {
            Self::default()
        } else {
            Self::new(settings.financial_year.trim())
        }
    }

    /// Takes the year from a page URL's `financial_year` query parameter,
    /// keeping the current one when the parameter is absent or empty.
    pub fn with_page_url(self, page_url: &str) -> Result<Self, ToolkitError> {
        let url = Url::parse(page_url)
            .map_err(|e| ToolkitError::ConfigError(format!("Invalid page URL '{}': {}", page_url, e)))?;
        let year = url
            .query_pairs()
            .find(|(key, _)| key == FINANCIAL_YEAR_PARAM)
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty());
        Ok(match year {
            Some(year) => Self::new(&year),
            None => self,
        })
    }
}
