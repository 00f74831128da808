//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use glob::glob;
use tracing_subscriber::EnvFilter;

use notemark_assets::{AssetResolver, HttpFetcher};
use notemark_ast::PageDocument;
use notemark_core::{convert_batch, render_page, slugify, BatchReport, RenderConfig, Template};

use crate::settings::Settings;

/// Config file names searched in the working directory
const CONFIG_CANDIDATES: [&str; 2] = ["notemark.toml", ".notemark.toml"];

/// Output format for conversion results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for tool consumption
    Json,
}

#[derive(Parser)]
#[command(name = "notemark")]
#[command(author, version, about = "Notion pages to static site Markdown", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert page dumps (JSON) into Markdown posts
    Convert {
        /// Page dump files or directories containing them
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Configuration file (defaults to notemark.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory receiving the posts (overrides the config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep hosted image URLs instead of downloading them
        #[arg(long)]
        no_download: bool,

        /// Print the documents instead of writing them
        #[arg(long)]
        dry_run: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the slug a title would get
    Slug {
        /// Title words
        #[arg(required = true)]
        title: Vec<String>,

        /// Prefix prepended before slugifying
        #[arg(short, long, default_value = "")]
        prefix: String,
    },

    /// Print the front matter template in effect
    Template {
        /// Configuration file (defaults to notemark.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Run the CLI application
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Convert {
            inputs,
            config,
            output,
            no_download,
            dry_run,
            format,
        } => convert_command(&ConvertOptions {
            inputs,
            config,
            output,
            no_download,
            dry_run,
            format,
        }),
        Commands::Slug { title, prefix } => slug_command(&title, &prefix),
        Commands::Template { config } => template_command(config.as_deref()),
    }
}

/// Route log records to stderr; `RUST_LOG` refines the level
fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    // A subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .try_init();
}

/// Options of the convert command
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub inputs: Vec<PathBuf>,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub no_download: bool,
    pub dry_run: bool,
    pub format: OutputFormat,
}

/// Convert page dumps and report per-page results
pub fn convert_command(options: &ConvertOptions) -> Result<()> {
    let (mut settings, base_dir) = load_settings(options.config.as_deref())?;
    if let Some(output) = &options.output {
        settings.markdown.post_save_path = output.clone();
    }
    // A dry run leaves the filesystem untouched, images included
    if options.no_download || options.dry_run {
        settings.assets.download = false;
    }

    let config = settings
        .render_config(&base_dir)
        .context("Failed to build render configuration")?;
    let loaded = load_documents(&options.inputs)?;
    tracing::info!(
        pages = loaded.documents.len(),
        invalid = loaded.failures.len(),
        "Loaded page dumps"
    );

    if options.dry_run {
        print_documents(&loaded.documents, &config, options.format)?;
        for failure in &loaded.failures {
            eprintln!("  Failed:  {} ({})", failure.path.display(), failure.error);
        }
        if !loaded.failures.is_empty() {
            anyhow::bail!(
                "{} of {} page dumps could not be read",
                loaded.failures.len(),
                loaded.len()
            );
        }
        return Ok(());
    }

    let resolver = if config.assets.download {
        let fetcher = HttpFetcher::with_timeout(settings.assets.timeout())
            .context("Failed to create HTTP client")?;
        Some(AssetResolver::new(fetcher))
    } else {
        None
    };

    let report = convert_batch(&loaded.documents, &config, resolver.as_ref());
    print_report(&report, &loaded.failures, options.format)?;

    let failed = report.failed() + loaded.failures.len();
    if failed > 0 {
        anyhow::bail!("{} of {} pages failed", failed, loaded.len());
    }
    Ok(())
}

fn print_documents(
    documents: &[PageDocument],
    config: &RenderConfig,
    format: OutputFormat,
) -> Result<()> {
    let pages: Vec<_> = documents
        .iter()
        .map(|document| render_page(document, config, None))
        .collect();

    match format {
        OutputFormat::Json => {
            let json: Vec<_> = pages
                .iter()
                .map(|page| {
                    serde_json::json!({
                        "path": page.path,
                        "slug": page.slug,
                        "content": page.content,
                        "diagnostics": page.diagnostics,
                    })
                })
                .collect();
            let json = serde_json::to_string_pretty(&json)
                .context("Failed to serialize pages to JSON")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            for page in &pages {
                println!("==> {} <==", page.path.display());
                print!("{}", page.content);
                for diag in &page.diagnostics {
                    eprintln!("{}", diag);
                }
                println!();
            }
        }
    }
    Ok(())
}

fn print_report(
    report: &BatchReport,
    failures: &[DumpFailure],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let pages: Vec<_> = report
                .pages
                .iter()
                .map(|page| match &page.result {
                    Ok(outcome) => serde_json::json!({
                        "id": page.id,
                        "path": outcome.path,
                        "slug": outcome.slug,
                        "diagnostics": outcome.diagnostics,
                    }),
                    Err(e) => serde_json::json!({
                        "id": page.id,
                        "error": e.to_string(),
                    }),
                })
                .collect();
            let invalid: Vec<_> = failures
                .iter()
                .map(|failure| {
                    serde_json::json!({
                        "path": failure.path,
                        "error": failure.error,
                    })
                })
                .collect();
            let json = serde_json::to_string_pretty(&serde_json::json!({
                "succeeded": report.succeeded(),
                "failed": report.failed() + failures.len(),
                "pages": pages,
                "invalid_dumps": invalid,
            }))
            .context("Failed to serialize report to JSON")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            println!("notemark v{}", crate::VERSION);
            println!();
            for page in &report.pages {
                match &page.result {
                    Ok(outcome) => {
                        println!("  Created: {}", outcome.path.display());
                        for diag in &outcome.diagnostics {
                            println!("    {}", diag.to_string().replace('\n', "\n    "));
                        }
                    }
                    Err(e) => println!("  Failed:  {} ({})", page.id, e),
                }
            }
            for failure in failures {
                println!("  Failed:  {} ({})", failure.path.display(), failure.error);
            }
            println!();
            println!(
                "Converted {} of {} pages",
                report.succeeded(),
                report.pages.len() + failures.len()
            );
        }
    }
    Ok(())
}

/// Print the slug for a title
fn slug_command(title: &[String], prefix: &str) -> Result<()> {
    let slug = slugify(&format!("{}{}", prefix, title.join(" ")));
    if slug.is_empty() {
        anyhow::bail!("Title has no characters usable in a slug");
    }
    println!("{}", slug);
    Ok(())
}

/// Print the effective front matter template and its fields
fn template_command(config_path: Option<&Path>) -> Result<()> {
    let (settings, base_dir) = load_settings(config_path)?;
    let template = match &settings.markdown.template {
        Some(path) => Template::from_file(&base_dir.join(path))
            .with_context(|| format!("Failed to load template: {}", path.display()))?,
        None => Template::new(notemark_core::DEFAULT_TEMPLATE),
    };

    print!("{}", template.source());
    eprintln!("Fields: {}", template.placeholders().join(", "));
    Ok(())
}

/// Load settings and the directory relative paths resolve against
fn load_settings(config_path: Option<&Path>) -> Result<(Settings, PathBuf)> {
    match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            read_settings(path)
        }
        None => {
            for candidate in CONFIG_CANDIDATES {
                let path = Path::new(candidate);
                if path.exists() {
                    return read_settings(path);
                }
            }
            Ok((Settings::default(), PathBuf::from(".")))
        }
    }
}

fn read_settings(path: &Path) -> Result<(Settings, PathBuf)> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let settings = Settings::from_toml_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;
    let base_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    tracing::debug!(path = %path.display(), "Loaded settings");
    Ok((settings, base_dir))
}

/// A page dump that could not be read or parsed
#[derive(Debug, Clone)]
pub struct DumpFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Page dumps read from the inputs
#[derive(Debug, Default)]
pub struct LoadedDumps {
    pub documents: Vec<PageDocument>,
    /// Dumps that were skipped; the rest still convert
    pub failures: Vec<DumpFailure>,
}

impl LoadedDumps {
    /// Number of dumps found, readable or not
    pub fn len(&self) -> usize {
        self.documents.len() + self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read page dumps; directories contribute their `.json` files, sorted
///
/// A dump that cannot be read or parsed is recorded as a failure and does
/// not stop the others from loading.
pub fn load_documents(inputs: &[PathBuf]) -> Result<LoadedDumps> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let pattern = input.join("**").join("*.json");
            let pattern = pattern.to_string_lossy();
            let mut found: Vec<PathBuf> = glob(&pattern)
                .with_context(|| format!("Invalid input pattern: {}", pattern))?
                .filter_map(|entry| entry.ok())
                .filter(|path| path.is_file())
                .collect();
            found.sort();
            if found.is_empty() {
                tracing::warn!(dir = %input.display(), "No page dumps found");
            }
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }

    let mut loaded = LoadedDumps::default();
    for path in files {
        match read_document(&path) {
            Ok(document) => loaded.documents.push(document),
            Err(e) => {
                tracing::warn!(path = %path.display(), "Skipping page dump: {:#}", e);
                loaded.failures.push(DumpFailure {
                    path,
                    error: format!("{:#}", e),
                });
            }
        }
    }
    Ok(loaded)
}

fn read_document(path: &Path) -> Result<PageDocument> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read page dump: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse page dump: {}", path.display()))
}
