//! clause-highlight
//!
//! Reads contract clauses with their flagged excerpts from a JSON file,
//! locates and merges the excerpts, and writes the annotated result as HTML,
//! JSON or console text.
//!
//! Input is either a single clause object or an array of them:
//!
//! ```json
//! [
//!   {
//!     "title": "Payment Terms",
//!     "text": "The Client shall pay the Consultant within 30 days of receipt of invoice.",
//!     "segments": [
//!       {"problematic_text": "within 30 days", "explanation": "Short window", "severity": "medium"}
//!     ]
//!   }
//! ]
//! ```
//!
//! Logs go to stderr so rendered output on stdout can be piped.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use highlight_engine::{HighlightEngine, OutputFormat, Renderer};
use tracing::{info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;

use config::Config;

/// Command-line arguments for clause-highlight
#[derive(Parser, Debug)]
#[command(name = "clause-highlight")]
#[command(about = "Highlight flagged excerpts in contract clauses")]
struct Args {
    /// Clause JSON file (one clause object or an array of clauses)
    #[arg(short, long)]
    input: PathBuf,

    /// Output format: html, json, json-pretty or console
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Write output to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Characters of each excerpt shown in annotation previews
    #[arg(long)]
    preview_chars: Option<usize>,

    /// Fixed suffix for HTML ids and classes
    #[arg(long)]
    html_scope: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// File configuration with command-line overrides applied
    fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(preview_chars) = self.preview_chars {
            config.engine.preview_chars = preview_chars;
        }
        if let Some(scope) = &self.html_scope {
            config.output.html_scope = Some(scope.clone());
        }

        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    run(&args)
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = args.resolve_config()?;

    let input = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read input file: {}", args.input.display()))?;
    info!("Analysing clauses from {}", args.input.display());

    let rendered = render_input(&input, &config)?;

    match &args.output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            info!("Output written to {}", path.display());
        }
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}

/// Parse clause JSON, analyse every clause and render the batch
fn render_input(input: &str, config: &Config) -> anyhow::Result<String> {
    let value: serde_json::Value =
        serde_json::from_str(input).context("Input is not valid JSON")?;

    let engine = HighlightEngine::with_config(config.engine.clone());
    let report = engine
        .analyze_json(&value)
        .context("Input does not contain clauses")?;

    if report.summary.unmatched_segments > 0 {
        warn!(
            "{} of {} reported issues could not be located in their clause text",
            report.summary.unmatched_segments, report.summary.segments
        );
    }

    let mut renderer = Renderer::new(config.output.format);
    if let Some(scope) = &config.output.html_scope {
        renderer = renderer.with_html_scope(scope.clone());
    }

    Ok(renderer.render_batch(&report)?)
}
