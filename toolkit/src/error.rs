use thiserror::Error;

/// Failures of the API request helper. The display text is what ends up in
/// the "API Error: ..." notification.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("HTTP error! status: {status}")]
    Status { status: u16 },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid JSON response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid request URL '{0}'")]
    InvalidUrl(String),

    #[error("Invalid request header '{0}'")]
    InvalidHeader(String),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Invalid export filename '{0}'")]
    InvalidFilename(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV writing error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    #[error("JSON serialization error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum ToolkitError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Draft storage error: {0}")]
    StorageError(String),

    #[error("Invalid shortcut binding: {0}")]
    ShortcutError(String),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    // Catch-all for anyhow errors from the shared crate
    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let err = RequestError::Status { status: 404 };
        assert_eq!(err.to_string(), "HTTP error! status: 404");
    }

    #[test]
    fn test_export_error_converts_into_toolkit_error() {
        let err: ToolkitError = ExportError::InvalidFilename("../x.csv".to_string()).into();
        assert_eq!(err.to_string(), "Invalid export filename '../x.csv'");
    }
}
