// grantdesk: command line front end for the toolkit
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use shared::models::{ExportFormat, ExportRecord};
use shared::utils::zambian_format::{format_currency, format_date};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use toolkit::api::RequestOptions;
use toolkit::config::Settings;
use toolkit::notify::ConsoleSurface;
use toolkit::Toolkit;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "grantdesk", version, about = "Grant Management System client utilities")]
struct Cli {
    /// JSON configuration file; built-in defaults are used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides the configured financial year
    #[arg(long, global = true)]
    financial_year: Option<String>,

    /// Directory that exports and print reports are saved into
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export a JSON array of records to JSON or CSV
    Export {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value = "csv")]
        format: ExportFormat,
        /// File name for the export (defaults to the input name)
        #[arg(long)]
        output: Option<String>,
    },
    /// Request a JSON resource, optionally exporting the returned records
    Fetch {
        url: String,
        #[arg(long)]
        export: Option<ExportFormat>,
        #[arg(long)]
        output: Option<String>,
    },
    /// Render an HTML fragment as a printable report
    Print {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        title: Option<String>,
        /// Do not open the rendered report
        #[arg(long)]
        no_open: bool,
    },
    /// Format a value for display
    Format {
        #[command(subcommand)]
        what: FormatCommand,
    },
}

#[derive(Subcommand, Debug)]
enum FormatCommand {
    Currency {
        #[arg(allow_negative_numbers = true)]
        amount: f64,
    },
    Date {
        value: String,
    },
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::load_default()?,
    };
    if let Some(year) = &cli.financial_year {
        settings.app.financial_year = year.clone();
    }
    if let Some(dir) = &cli.out_dir {
        settings.export.output_dir = Some(dir.clone());
    }
    Ok(settings)
}

fn default_output_name(input: &Path, format: ExportFormat) -> String {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("export");
    format!("{}.{}", stem, format.extension())
}

fn read_records(path: &Path) -> Result<Vec<ExportRecord>> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read '{}'", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("'{}' is not a JSON array of records", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings(&cli)?;
    if let Command::Print { no_open: true, .. } = &cli.command {
        settings.print.open_after_render = false;
    }
    let toolkit = Toolkit::new(&settings, Arc::new(ConsoleSurface))?;

    match cli.command {
        Command::Export { input, format, output } => {
            let records = read_records(&input)?;
            let filename = output.unwrap_or_else(|| default_output_name(&input, format));
            match toolkit.exporter.export(&records, &filename, format)? {
                Some(path) => {
                    toolkit.notifier.success(&format!("Exported {} records", records.len()));
                    println!("{}", path.display());
                }
                None => info!("Nothing exported"),
            }
        }
        Command::Fetch { url, export, output } => {
            let body = toolkit.api.request(&url, RequestOptions::get()).await?;
            match export {
                None => println!("{}", serde_json::to_string_pretty(&body)?),
                Some(format) => {
                    if !body.is_array() {
                        bail!("Response from {} is not an array of records", url);
                    }
                    let records: Vec<ExportRecord> = serde_json::from_value(body)?;
                    let filename = output.unwrap_or_else(|| format!("export.{}", format.extension()));
                    if let Some(path) = toolkit.exporter.export(&records, &filename, format)? {
                        println!("{}", path.display());
                    }
                }
            }
        }
        Command::Print { input, title, .. } => {
            let body = std::fs::read_to_string(&input).with_context(|| format!("Failed to read '{}'", input.display()))?;
            let page_title = input.file_stem().and_then(|s| s.to_str());
            let path = toolkit.printer.print(title.as_deref(), page_title, &body)?;
            println!("{}", path.display());
        }
        Command::Format { what } => match what {
            FormatCommand::Currency { amount } => println!("{}", format_currency(amount)),
            FormatCommand::Date { value } => println!("{}", format_date(&value)?),
        },
    }

    Ok(())
}
