use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use html_sections::{
    parse_blocks_from_bytes, section_list_from_blocks, sections_from_blocks, ExtractOptions,
    UploadResponse,
};
use std::fs::File;
use std::io::{Read, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Title -> content object, titles in document order.
    Map,
    /// Array of {title, level, content}.
    List,
    /// {content, sections} as returned after an upload.
    Upload,
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Input HTML file (fragment or full document). Reads stdin when omitted.
    #[arg(long)]
    html_file: Option<PathBuf>,

    /// Output .json path. Writes stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Map)]
    format: Format,

    /// Indent the JSON output.
    #[arg(long)]
    pretty: bool,

    /// Reject inputs larger than this many MiB.
    #[arg(long, default_value_t = 50)]
    max_input_mb: usize,
}

fn read_input(path: Option<&PathBuf>) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    match path {
        Some(p) => {
            File::open(p)
                .with_context(|| format!("open {}", p.display()))?
                .read_to_end(&mut bytes)
                .with_context(|| format!("read {}", p.display()))?;
        }
        None => {
            std::io::stdin()
                .read_to_end(&mut bytes)
                .context("read stdin")?;
        }
    }
    Ok(bytes)
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

fn render(bytes: &[u8], args: &Args, options: &ExtractOptions) -> Result<String> {
    match args.format {
        Format::Map => {
            let blocks = parse_blocks_from_bytes(bytes, options)?;
            to_json(&sections_from_blocks(&blocks), args.pretty)
        }
        Format::List => {
            let blocks = parse_blocks_from_bytes(bytes, options)?;
            to_json(&section_list_from_blocks(&blocks), args.pretty)
        }
        Format::Upload => to_json(&UploadResponse::from_bytes(bytes, options)?, args.pretty),
    }
}

fn options_for(args: &Args) -> ExtractOptions {
    ExtractOptions::default().with_max_input_bytes(args.max_input_mb.saturating_mul(1024 * 1024))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let options = options_for(&args);

    let bytes = read_input(args.html_file.as_ref())?;
    let json = render(&bytes, &args, &options)?;

    match &args.out {
        Some(p) => {
            let mut f = File::create(p).with_context(|| format!("create {}", p.display()))?;
            f.write_all(json.as_bytes())?;
            f.write_all(b"\n")?;
            info!(out = %p.display(), format = ?args.format, "wrote sections");
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(json.as_bytes())?;
            lock.write_all(b"\n")?;
        }
    }
    Ok(())
}
