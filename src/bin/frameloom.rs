use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "frameloom", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the color filters accepted by `--color-filter`.
    ColorFilters,
    /// Encode a list of images as one animation.
    Encode(EncodeArgs),
}

#[derive(Parser, Debug)]
struct EncodeArgs {
    /// Input images, one frame each, in order.
    #[arg(long = "input", required = true, num_args = 1..)]
    inputs: Vec<PathBuf>,

    /// Output format: webp, gif or avif.
    #[arg(long, default_value_t = frameloom::OutputFormat::WebP)]
    format: frameloom::OutputFormat,

    /// Per-frame delay in milliseconds.
    #[arg(long, default_value_t = frameloom::DEFAULT_DELAY_MS)]
    delay_ms: u32,

    /// Total playback budget in milliseconds; 0 keeps every frame.
    #[arg(long, default_value_t = 0)]
    max_duration_ms: u32,

    /// Integer upscale factor.
    #[arg(long, default_value_t = 1)]
    magnify: u32,

    /// Color filter name (see `color-filters`).
    #[arg(long, default_value = "none")]
    color_filter: String,

    /// Double the output size.
    #[arg(long)]
    output_2x: bool,

    /// Output path, or `-` for stdout.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::ColorFilters => cmd_color_filters(),
        Command::Encode(args) => cmd_encode(args),
    }
}

fn cmd_color_filters() -> anyhow::Result<()> {
    let mut filters = frameloom::ColorFilter::ALL.to_vec();
    filters.sort_by_key(|f| f.name());
    let mut out = std::io::stdout().lock();
    for f in filters {
        writeln!(out, "{:<10} {}", f.name(), f.description())?;
    }
    Ok(())
}

fn cmd_encode(args: EncodeArgs) -> anyhow::Result<()> {
    let images = args
        .inputs
        .iter()
        .map(|p| {
            image::open(p)
                .map(|img| img.into_rgba8())
                .with_context(|| format!("decode input '{}'", p.display()))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let filters = frameloom::RenderFilters::new()
        .with_magnify(args.magnify)
        .with_color_filter(frameloom::ColorFilter::validate(&args.color_filter)?)
        .with_output_2x(args.output_2x);
    let chain = filters.to_chain(false)?;

    let screens = frameloom::Screens::from_images(images).with_delay_ms(args.delay_ms);
    let opts = frameloom::EncodeOpts::from_env();
    let bytes = screens.encode(args.format, args.max_duration_ms, &chain, &opts)?;

    if args.out.as_os_str() == "-" {
        std::io::stdout().lock().write_all(&bytes)?;
    } else {
        std::fs::write(&args.out, &bytes)
            .with_context(|| format!("write output '{}'", args.out.display()))?;
        eprintln!(
            "wrote {} ({} bytes, {})",
            args.out.display(),
            bytes.len(),
            args.format
        );
    }
    Ok(())
}
