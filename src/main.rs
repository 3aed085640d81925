use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

use feedmeta::config::Config;
use feedmeta::feed::enrich_items_with_meta;
use feedmeta::input::{read_document, select_items};
use feedmeta::output::{render_json, render_table, OutputFormat, TableOptions};

/// Default config path (~/.config/feedmeta/config.toml)
fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("feedmeta")
        .join("config.toml"))
}

#[derive(Parser, Debug)]
#[command(
    name = "feedmeta",
    about = "Add formatted view counts and author info to feed items"
)]
struct Args {
    /// JSON document to read (defaults to stdin)
    #[arg(long, short, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Config file (defaults to ~/.config/feedmeta/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// JSON Pointer to the item array, e.g. /data/list
    #[arg(long, short, value_name = "POINTER")]
    pointer: Option<String>,

    /// Output format: json or table
    #[arg(long, short)]
    format: Option<OutputFormat>,

    /// Write JSON on a single line
    #[arg(long)]
    compact: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the result, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let pointer = args.pointer.unwrap_or(config.items_pointer);
    let format = args.format.unwrap_or(config.format);
    let pretty = config.pretty && !args.compact;

    let document = read_document(args.input.as_deref())
        .await
        .with_context(|| match &args.input {
            Some(path) => format!("Failed to load {}", path.display()),
            None => "Failed to load stdin".to_string(),
        })?;
    let items = select_items(&document, &pointer)?;

    let enriched = enrich_items_with_meta(items);
    tracing::info!(items = enriched.len(), %format, "Enriched feed items");

    let rendered = match format {
        OutputFormat::Json => {
            let mut json = render_json(&enriched, pretty).context("Failed to serialize items")?;
            json.push('\n');
            json
        }
        OutputFormat::Table => render_table(
            &enriched,
            &TableOptions {
                title_field: config.title_field,
                title_width: config.title_width,
            },
        ),
    };

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(rendered.as_bytes())
        .and_then(|_| stdout.flush())
        .context("Failed to write output")?;

    Ok(())
}
