//! CLI binary for pdf-outline-md.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf_outline_md::{
    convert, inspect, AssetError, ConversionConfig, ConversionProgressCallback, ConversionStats,
    PageSelection, ParagraphMode, ProgressCallback,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

const TICKS: [&str; 11] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

/// Terminal progress callback: a live progress bar plus one log line per page.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// Spinner-only until `on_conversion_start` tells us the page count.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Extracting");
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_pages: usize) {
        self.activate_bar(total_pages);
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_complete(&self, page_num: usize, total: usize, fragments: usize, images: usize) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}  {}",
            green("✓"),
            page_num,
            total,
            dim(&format!("{fragments:>4} text blocks")),
            dim(&format!("{images:>2} images")),
        ));
        self.bar.inc(1);
    }

    fn on_asset_warning(&self, warning: &AssetError) {
        self.bar
            .println(format!("  {} {}", yellow("⚠"), yellow(&warning.to_string())));
    }

    fn on_conversion_complete(&self, _stats: &ConversionStats) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert, writing paper.md and paper_assets/ next to the input
  pdf2md paper.pdf

  # Choose the Markdown path (assets go beside it)
  pdf2md paper.pdf -o notes/paper.md

  # Text only, first ten pages
  pdf2md --no-images --no-render --pages 1-10 book.pdf

  # Merge body text into paragraphs instead of one line per text fragment
  pdf2md --paragraphs paper.pdf

  # Inspect PDF metadata
  pdf2md --inspect-only paper.pdf

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Directory containing the pdfium shared library
  RUST_LOG          Overrides the log filter (e.g. pdf_outline_md=debug)
"#;

/// Convert PDF files to structured Markdown.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2md",
    version,
    about = "Convert PDF files to Markdown with headings inferred from typography",
    long_about = "Convert a PDF document to Markdown. Headings are inferred from font size, \
weight and numbering. Body text is written one line per text fragment, or merged into \
paragraphs with --paragraphs. Embedded images and a rendering of every page are written to an \
assets directory next to the Markdown file.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path.
    input: PathBuf,

    /// Markdown output path. Default: <input stem>.md next to the input.
    #[arg(short, long, env = "PDF2MD_OUTPUT")]
    output: Option<PathBuf>,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, env = "PDF2MD_PAGES", default_value = "all")]
    pages: String,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2MD_PASSWORD")]
    password: Option<String>,

    /// Zoom factor for page renderings (0.5–8.0).
    #[arg(long, env = "PDF2MD_ZOOM", default_value_t = 2.0)]
    zoom: f32,

    /// Do not extract embedded images.
    #[arg(long)]
    no_images: bool,

    /// Do not render full pages.
    #[arg(long)]
    no_render: bool,

    /// Merge body text into paragraphs instead of one line per text fragment.
    #[arg(long)]
    paragraphs: bool,

    /// Directory containing the pdfium shared library.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Print conversion stats (or metadata with --inspect-only) as JSON.
    #[arg(long, env = "PDF2MD_JSON")]
    json: bool,

    /// Print PDF metadata only, no conversion.
    #[arg(long)]
    inspect_only: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2MD_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2MD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2MD_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level library logs.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let progress_cb: Option<ProgressCallback> = if show_progress && !cli.inspect_only {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let meta = inspect(&cli.input, &config)
            .await
            .context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialize metadata")?
            );
        } else {
            println!("File:         {}", cli.input.display());
            if let Some(ref t) = meta.title {
                println!("Title:        {}", t);
            }
            if let Some(ref a) = meta.author {
                println!("Author:       {}", a);
            }
            if let Some(ref s) = meta.subject {
                println!("Subject:      {}", s);
            }
            println!("Pages:        {}", meta.page_count);
            println!("PDF Version:  {}", meta.pdf_version);
            if let Some(ref p) = meta.producer {
                println!("Producer:     {}", p);
            }
            if let Some(ref c) = meta.creator {
                println!("Creator:      {}", c);
            }
        }
        return Ok(());
    }

    // ── Run conversion ───────────────────────────────────────────────────
    let output = convert(&cli.input, &config)
        .await
        .context("Conversion failed")?;
    let stats = &output.stats;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
        return Ok(());
    }

    if !cli.quiet {
        println!(
            "{} Wrote markdown to {}",
            green("✓"),
            bold(&output.markdown_path.display().to_string())
        );
        println!(
            "{} Assets saved to {}",
            green("✓"),
            output.assets_dir.display()
        );
        println!(
            "{} Processed {} pages with {} text blocks",
            green("✓"),
            stats.processed_pages,
            stats.fragment_count
        );
        println!(
            "{} Extracted {} images {}",
            green("✓"),
            stats.image_count,
            dim(&format!(
                "({} page renderings, {} headings, {}ms)",
                stats.render_count, stats.heading_count, stats.total_duration_ms
            ))
        );
        // The progress bar already printed warnings as they happened.
        if !show_progress {
            for warning in &stats.warnings {
                eprintln!("{} Warning: {}", yellow("⚠"), warning);
            }
        }
        if !stats.is_complete() {
            eprintln!(
                "{} {} assets could not be written",
                cyan("⚠"),
                stats.warnings.len()
            );
        }
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let pages = parse_pages(&cli.pages)?;

    let mut builder = ConversionConfig::builder()
        .pages(pages)
        .render_zoom(cli.zoom)
        .extract_images(!cli.no_images)
        .render_pages(!cli.no_render)
        .paragraph_mode(if cli.paragraphs {
            ParagraphMode::Paragraphs
        } else {
            ParagraphMode::Lines
        });

    if let Some(ref output) = cli.output {
        builder = builder.output_path(output);
    }
    if let Some(ref password) = cli.password {
        builder = builder.password(password);
    }
    if let Some(ref lib) = cli.pdfium_lib {
        builder = builder.pdfium_library_path(lib);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Parse `--pages` string into `PageSelection`.
fn parse_pages(s: &str) -> Result<PageSelection> {
    let s = s.trim().to_lowercase();

    if s == "all" {
        return Ok(PageSelection::All);
    }

    // Range: "3-15"
    if let Some((start, end)) = s.split_once('-') {
        let start: usize = start
            .trim()
            .parse()
            .context("Invalid start page in range")?;
        let end: usize = end.trim().parse().context("Invalid end page in range")?;

        if start < 1 {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", start);
        }
        if start > end {
            anyhow::bail!(
                "Invalid page range '{}-{}': start must be <= end",
                start,
                end
            );
        }

        return Ok(PageSelection::Range(start, end));
    }

    // Set: "1,3,5,7"
    if s.contains(',') {
        let pages: Vec<usize> = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<usize>()
                    .context(format!("Invalid page number: '{}'", p.trim()))
            })
            .collect::<Result<Vec<_>>>()?;

        if let Some(&p) = pages.iter().find(|&&p| p < 1) {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", p);
        }

        return Ok(PageSelection::Set(pages));
    }

    // Single page: "5"
    let page: usize = s.parse().context("Invalid page number")?;
    if page < 1 {
        anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", page);
    }

    Ok(PageSelection::Single(page))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pages_forms() {
        assert_eq!(parse_pages("all").unwrap(), PageSelection::All);
        assert_eq!(parse_pages(" 7 ").unwrap(), PageSelection::Single(7));
        assert_eq!(parse_pages("3-15").unwrap(), PageSelection::Range(3, 15));
        assert_eq!(
            parse_pages("1,3,5").unwrap(),
            PageSelection::Set(vec![1, 3, 5])
        );
    }

    #[test]
    fn parse_pages_rejects_bad_input() {
        assert!(parse_pages("0").is_err());
        assert!(parse_pages("9-2").is_err());
        assert!(parse_pages("1,x").is_err());
        assert!(parse_pages("1,0").is_err());
    }

    #[test]
    fn cli_flags_map_to_config() {
        let cli = Cli::parse_from([
            "pdf2md",
            "doc.pdf",
            "--paragraphs",
            "--no-images",
            "--zoom",
            "3",
            "--pages",
            "2-4",
        ]);
        let config = build_config(&cli, None).unwrap();
        assert_eq!(config.paragraph_mode, ParagraphMode::Paragraphs);
        assert!(!config.extract_images);
        assert!(config.render_pages);
        assert_eq!(config.render_zoom, 3.0);
        assert_eq!(config.pages, PageSelection::Range(2, 4));
    }

    #[test]
    fn line_per_fragment_without_paragraphs_flag() {
        let cli = Cli::parse_from(["pdf2md", "doc.pdf"]);
        let config = build_config(&cli, None).unwrap();
        assert_eq!(config.paragraph_mode, ParagraphMode::Lines);
    }
}
