// Printable report rendering
use crate::error::ToolkitError;
use crate::export::Downloads;
use crate::state::AppContext;
use chrono::{Local, NaiveDate};
use shared::utils::zambian_format::format_long_date;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

const FALLBACK_TITLE: &str = "Report";
const FOOTER_TEXT: &str = "Generated by Grant Management System";

const PRINT_STYLES: &str = "\
        body { font-family: Arial, sans-serif; margin: 20px; }
        table { width: 100%; border-collapse: collapse; margin: 20px 0; }
        th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }
        th { background-color: #f2f2f2; }
        .header { text-align: center; margin-bottom: 30px; }
        .footer { margin-top: 30px; text-align: center; font-size: 12px; }";

/// Picks the report title: the explicit one, else the page title up to its
/// first " - ", else "Report".
pub fn resolve_title(explicit: Option<&str>, page_title: Option<&str>) -> String {
    let explicit = explicit.map(str::trim).filter(|t| !t.is_empty());
    let from_page = page_title
        .and_then(|t| t.split(" - ").next())
        .map(str::trim)
        .filter(|t| !t.is_empty());
    explicit
        .or(from_page)
        .unwrap_or(FALLBACK_TITLE)
        .to_string()
}

#[derive(Clone)]
pub struct PrintRenderer {
    context: AppContext,
    downloads: Arc<dyn Downloads>,
    open_after_render: bool,
}

impl fmt::Debug for PrintRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrintRenderer")
            .field("context", &self.context)
            .field("open_after_render", &self.open_after_render)
            .finish_non_exhaustive()
    }
}

impl PrintRenderer {
    pub fn new(context: AppContext, downloads: Arc<dyn Downloads>) -> Self {
        Self {
            context,
            downloads,
            open_after_render: false,
        }
    }

    pub fn open_after_render(mut self, open: bool) -> Self {
        self.open_after_render = open;
        self
    }

    /// Builds the standalone HTML document. `body_html` is sanitized; title and
    /// financial year are escaped.
    pub fn render(&self, title: &str, body_html: &str, generated_on: NaiveDate) -> String {
        let title = ammonia::clean_text(title);
        let year = ammonia::clean_text(&self.context.financial_year);
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <style>
{styles}
    </style>
</head>
<body>
    <div class="header">
        <h1>{title}</h1>
        <p>Financial Year: {year}</p>
        <p>Generated: {generated}</p>
    </div>
    {body}
    <div class="footer">
        <p>{footer}</p>
    </div>
</body>
</html>
"#,
            title = title,
            styles = PRINT_STYLES,
            year = year,
            generated = format_long_date(generated_on),
            body = ammonia::clean(body_html),
            footer = FOOTER_TEXT,
        )
    }

    /// Renders the report, saves it and, if configured, opens it in the
    /// system viewer for printing.
    pub fn print(&self, title: Option<&str>, page_title: Option<&str>, body_html: &str) -> Result<PathBuf, ToolkitError> {
        let title = resolve_title(title, page_title);
        let document = self.render(&title, body_html, Local::now().date_naive());
        let filename = format!("{}.html", slugify(&title));
        let path = self.downloads.save(&filename, "text/html", document.as_bytes())?;
        tracing::info!(title = %title, path = %path.display(), "Rendered print report");

        if self.open_after_render {
            open::that_detached(&path)?;
        }
        Ok(path)
    }
}

// "Budget Summary 2026/27" -> "budget-summary-2026-27"
fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "report".to_string()
    } else {
        slug.to_string()
    }
}
