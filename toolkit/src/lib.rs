// Toolkit library root: client-side utilities for the Grant Management System.

pub mod api;
pub mod config;
pub mod drafts;
pub mod error;
pub mod export;
pub mod forms;
pub mod notify;
pub mod print;
pub mod shortcuts;
pub mod state;

use crate::api::ApiClient;
use crate::config::Settings;
use crate::drafts::{DraftRecorder, FileStore};
use crate::error::ToolkitError;
use crate::export::{DirectoryDownloads, Exporter};
use crate::notify::{DismissTiming, Notifier, Surface};
use crate::print::PrintRenderer;
use crate::shortcuts::Keymap;
use crate::state::AppContext;
use std::sync::Arc;

/// Every component wired from one set of settings.
#[derive(Debug, Clone)]
pub struct Toolkit {
    pub context: AppContext,
    pub notifier: Notifier,
    pub exporter: Exporter,
    pub api: ApiClient,
    pub drafts: DraftRecorder,
    pub keymap: Keymap,
    pub printer: PrintRenderer,
}

impl Toolkit {
    pub fn new(settings: &Settings, surface: Arc<dyn Surface>) -> Result<Self, ToolkitError> {
        let context = AppContext::from_settings(&settings.app);
        let notifier = Notifier::new(surface).with_timing(DismissTiming::from(&settings.notifications));
        let downloads = Arc::new(DirectoryDownloads::new(settings.export.resolved_output_dir()));

        let exporter = Exporter::new(notifier.clone(), downloads.clone())
            .with_column_schema(settings.export.column_schema);
        let api = ApiClient::new(&settings.api, notifier.clone())?;
        let drafts = DraftRecorder::new(Arc::new(FileStore::new(settings.drafts.resolved_store_path())));
        let keymap = Keymap::from_settings(&settings.shortcuts)?;
        let printer = PrintRenderer::new(context.clone(), downloads)
            .open_after_render(settings.print.open_after_render);

        tracing::debug!(financial_year = %context.financial_year, "Toolkit initialised");
        Ok(Self {
            context,
            notifier,
            exporter,
            api,
            drafts,
            keymap,
            printer,
        })
    }
}
