//! Headless driver: render an HTML file or URL to a PNG.
//!
//! ```text
//! tern render page.html -o page.png --width 1024
//! tern render https://example.com -o example.png
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use url::Url;

use tern_headless::{render_html, RenderOptions};

#[derive(Parser)]
#[command(name = "tern", about = "Lightweight HTML/CSS renderer", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render an HTML file or URL to a PNG image.
    Render {
        /// Input HTML file path or http(s) URL.
        input: String,

        /// Output PNG path.
        #[arg(short, long, default_value = "page.png")]
        output: PathBuf,

        /// Viewport width in pixels.
        #[arg(long, default_value_t = 1280)]
        width: u32,

        /// Surface height in pixels (0 = document height).
        #[arg(long, default_value_t = 0)]
        height: u32,

        /// Base URL override for relative references.
        #[arg(long)]
        base_url: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    if let Err(err) = run() {
        eprintln!("{} {err:#}", "error:".red().bold());
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Render {
            input,
            output,
            width,
            height,
            base_url,
        } => render(&input, &output, width, height, base_url.as_deref()),
    }
}

fn render(
    input: &str,
    output: &PathBuf,
    width: u32,
    height: u32,
    base_url: Option<&str>,
) -> anyhow::Result<()> {
    let (html, resolved_base) = load_input(input)?;

    let base_url = match base_url {
        Some(explicit) => Url::parse(explicit)
            .with_context(|| format!("invalid base URL '{explicit}'"))
            .map(Some)?,
        None => resolved_base,
    };

    let options = RenderOptions {
        width,
        height,
        base_url,
    };

    let result = render_html(&html, &options).context("render failed")?;
    let png = result.encode_png().context("PNG encoding failed")?;
    std::fs::write(output, png)
        .with_context(|| format!("cannot write {}", output.display()))?;

    println!(
        "{} {} ({}x{})",
        "rendered".green().bold(),
        output.display(),
        result.document.width(),
        result.document.height(),
    );
    Ok(())
}

/// Read the input document and derive its base URL.
fn load_input(input: &str) -> anyhow::Result<(String, Option<Url>)> {
    if input.starts_with("http://") || input.starts_with("https://") {
        let url = Url::parse(input).with_context(|| format!("invalid URL '{input}'"))?;
        let html = tern_common::net::fetch_text(&url)
            .with_context(|| format!("cannot fetch '{input}'"))?;
        return Ok((html, Some(url)));
    }

    let path = std::path::Path::new(input);
    let html =
        std::fs::read_to_string(path).with_context(|| format!("cannot read '{input}'"))?;
    Ok((html, tern_common::urlutil::file_url(path)))
}
