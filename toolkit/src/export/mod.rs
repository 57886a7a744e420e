// Record export to JSON and CSV files
pub mod csv_writer;
pub mod downloads;

pub use downloads::{DirectoryDownloads, Downloads};

use crate::config::ColumnSchema;
use crate::error::ExportError;
use crate::notify::Notifier;
use shared::models::{ExportFormat, ExportRecord};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Message shown when a CSV export is asked for with no records.
pub const NO_DATA_MESSAGE: &str = "No data to export";

#[derive(Clone)]
pub struct Exporter {
    notifier: Notifier,
    downloads: Arc<dyn Downloads>,
    schema: ColumnSchema,
}

impl fmt::Debug for Exporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exporter").field("schema", &self.schema).finish_non_exhaustive()
    }
}

impl Exporter {
    pub fn new(notifier: Notifier, downloads: Arc<dyn Downloads>) -> Self {
        Self {
            notifier,
            downloads,
            schema: ColumnSchema::default(),
        }
    }

    pub fn with_column_schema(mut self, schema: ColumnSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Saves `records` as an indented JSON array. An empty slice gives `[]`.
    pub fn export_json(&self, records: &[ExportRecord], filename: &str) -> Result<PathBuf, ExportError> {
        let body = serde_json::to_vec_pretty(records)?;
        self.deliver(filename, ExportFormat::Json, records.len(), &body)
    }

    /// Saves `records` as CSV. With no records, shows an error notification and
    /// returns `Ok(None)` without producing a file.
    pub fn export_csv(&self, records: &[ExportRecord], filename: &str) -> Result<Option<PathBuf>, ExportError> {
        if records.is_empty() {
            tracing::warn!(filename, "CSV export requested with no records");
            self.notifier.error(NO_DATA_MESSAGE);
            return Ok(None);
        }

        let columns = csv_writer::derive_columns(records, self.schema);
        let body = csv_writer::render_csv(records, &columns)?;
        self.deliver(filename, ExportFormat::Csv, records.len(), &body).map(Some)
    }

    pub fn export(&self, records: &[ExportRecord], filename: &str, format: ExportFormat) -> Result<Option<PathBuf>, ExportError> {
        match format {
            ExportFormat::Json => self.export_json(records, filename).map(Some),
            ExportFormat::Csv => self.export_csv(records, filename),
        }
    }

    fn deliver(&self, filename: &str, format: ExportFormat, rows: usize, body: &[u8]) -> Result<PathBuf, ExportError> {
        match self.downloads.save(filename, format.mime_type(), body) {
            Ok(path) => {
                tracing::info!(%format, rows, path = %path.display(), "Exported records");
                Ok(path)
            }
            Err(e) => {
                tracing::error!(%format, filename, error = %e, "Export failed");
                self.notifier.error(&format!("Export failed: {}", e));
                Err(e)
            }
        }
    }
}

/// One export request: created, run once, discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportJob {
    pub records: Vec<ExportRecord>,
    pub filename: String,
    pub format: ExportFormat,
}

impl ExportJob {
    pub fn new(records: Vec<ExportRecord>, filename: &str, format: ExportFormat) -> Self {
        Self {
            records,
            filename: filename.to_string(),
            format,
        }
    }

    pub fn run(self, exporter: &Exporter) -> Result<Option<PathBuf>, ExportError> {
        exporter.export(&self.records, &self.filename, self.format)
    }
}
