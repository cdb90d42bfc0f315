//! PDF Pages CLI - Command line tool for editing the page order of PDF documents.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use pdf_pages_core::{
    Anchor, EditedPdf, EditorConfig, InsertRequest, PdfEditor, Side, load_pdf, load_pdfs, save_pdf,
};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "pdf-pages")]
#[command(author, version, about = "Extract, remove, rearrange, insert and merge PDF pages", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Directory edited files are written to
    #[arg(short = 'd', long, env = "PDF_PAGES_OUTPUT_DIR", global = true)]
    output_dir: Option<PathBuf>,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Write streams uncompressed
    #[arg(long, global = true)]
    no_compress: bool,

    /// Print a JSON summary instead of a message
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Keep only a range of pages
    Extract {
        input: PathBuf,
        /// Pages to keep, e.g. "3-5" or "4"
        #[arg(short, long)]
        pages: PageSpan,
        /// Output file (default: <output-dir>/<stem>_extracted.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Delete a range of pages
    Remove {
        input: PathBuf,
        /// Pages to delete, e.g. "3-5" or "4"
        #[arg(short, long)]
        pages: PageSpan,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Move a range of pages before or after another page
    Rearrange {
        input: PathBuf,
        /// Pages to move, e.g. "8-10"
        #[arg(short, long)]
        pages: PageSpan,
        /// Destination, e.g. "before:2" or "after:5"
        #[arg(short, long)]
        to: Placement,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Insert pages of other documents into a document
    Insert {
        input: PathBuf,
        /// Block to insert: "<before|after>:<page>=<file>[#<pages>]", repeatable.
        /// Pages refer to the input's original numbering.
        #[arg(short, long = "block", required = true)]
        blocks: Vec<BlockSpec>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Concatenate documents in the given order
    Merge {
        #[arg(required = true, num_args = 2..)]
        inputs: Vec<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Inclusive page span, "3-5" or a single page "4"
#[derive(Debug, Clone, Copy)]
struct PageSpan {
    start: usize,
    end: usize,
}

impl FromStr for PageSpan {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some((start, end)) = s.split_once('-') {
            let start: usize = start.trim().parse().context("Invalid page range start")?;
            let end: usize = end.trim().parse().context("Invalid page range end")?;
            Ok(Self { start, end })
        } else {
            let page: usize = s.parse().context("Invalid page number")?;
            Ok(Self {
                start: page,
                end: page,
            })
        }
    }
}

/// "<side>:<page>"
#[derive(Debug, Clone, Copy)]
struct Placement(Anchor);

impl FromStr for Placement {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let Some((side, page)) = s.split_once(':') else {
            bail!("expected <before|after>:<page>, got '{s}'");
        };
        let side: Side = side.parse()?;
        let page: usize = page.trim().parse().context("Invalid anchor page")?;
        Ok(Self(Anchor::new(page, side)))
    }
}

/// "<side>:<page>=<file>[#<pages>]"
#[derive(Debug, Clone)]
struct BlockSpec {
    anchor: Anchor,
    path: PathBuf,
    pages: Option<PageSpan>,
}

impl FromStr for BlockSpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let Some((placement, source)) = s.split_once('=') else {
            bail!("expected <before|after>:<page>=<file>[#<pages>], got '{s}'");
        };
        let Placement(anchor) = placement.parse::<Placement>()?;

        let (path, pages) = match source.rsplit_once('#') {
            Some((path, pages)) => (path, Some(pages.parse::<PageSpan>()?)),
            None => (source, None),
        };
        if path.is_empty() {
            bail!("missing file in block '{s}'");
        }

        Ok(Self {
            anchor,
            path: PathBuf::from(path),
            pages,
        })
    }
}

fn init_logging(verbose: u8) {
    let log_level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // RUST_LOG takes precedence over -v
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_str().to_lowercase()));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(command: Command, editor: &PdfEditor) -> Result<(EditedPdf, Option<PathBuf>)> {
    match command {
        Command::Extract {
            input,
            pages,
            output,
        } => {
            let doc = load_pdf(&input)
                .await
                .context(format!("Failed to load PDF: {}", input.display()))?;
            let edited = editor.extract(&doc, pages.start, pages.end)?;
            Ok((edited, output))
        }
        Command::Remove {
            input,
            pages,
            output,
        } => {
            let doc = load_pdf(&input)
                .await
                .context(format!("Failed to load PDF: {}", input.display()))?;
            let edited = editor.remove(&doc, pages.start, pages.end)?;
            Ok((edited, output))
        }
        Command::Rearrange {
            input,
            pages,
            to,
            output,
        } => {
            let doc = load_pdf(&input)
                .await
                .context(format!("Failed to load PDF: {}", input.display()))?;
            let edited = editor.rearrange(&doc, pages.start, pages.end, to.0)?;
            Ok((edited, output))
        }
        Command::Insert {
            input,
            blocks,
            output,
        } => {
            let destination = load_pdf(&input)
                .await
                .context(format!("Failed to load PDF: {}", input.display()))?;
            let paths: Vec<&PathBuf> = blocks.iter().map(|b| &b.path).collect();
            let sources = load_pdfs(&paths)
                .await
                .context("Failed to load documents to insert")?;

            let requests: Vec<InsertRequest<'_>> = blocks
                .iter()
                .zip(&sources)
                .map(|(block, source)| InsertRequest {
                    source,
                    start: block.pages.map(|p| p.start),
                    end: block.pages.map(|p| p.end),
                    anchor: block.anchor,
                })
                .collect();

            let edited = editor.insert(&destination, &requests)?;
            Ok((edited, output))
        }
        Command::Merge { inputs, output } => {
            let docs = load_pdfs(&inputs)
                .await
                .context("Failed to load documents to merge")?;
            let edited = editor.merge(&docs)?;
            Ok((edited, output))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_logging(args.verbose);

    // Load or create config
    let mut config = if let Some(config_path) = &args.config {
        EditorConfig::from_file(config_path).context("Failed to load config file")?
    } else {
        EditorConfig::load()
    };

    // Override config with CLI arguments
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    if args.no_compress {
        config.compress = false;
    }

    let editor = PdfEditor::new(config);
    let (edited, output) = run(args.command, &editor).await?;

    let output_path = output.unwrap_or_else(|| editor.output_path(&edited));
    let written = save_pdf(&edited.bytes, &output_path)
        .await
        .context(format!("Failed to write output: {}", output_path.display()))?;
    info!("{} pages written", edited.page_count);

    // CLI output is intentional
    #[allow(clippy::print_stdout)]
    {
        if args.json {
            let summary = serde_json::json!({
                "file": written,
                "file_name": edited.file_name,
                "page_count": edited.page_count,
            });
            println!("{summary}");
        } else {
            println!(
                "Saved {} ({} pages) to: {}",
                edited.file_name,
                edited.page_count,
                written.display()
            );
        }
    }

    Ok(())
}
