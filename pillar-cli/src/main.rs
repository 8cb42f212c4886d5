//! Pillar CLI - compose images and captions into a single picture
//!
//! Usage:
//!   pillar compose a.png b.png --width 6in --height 4in -o out.png
//!   pillar compose a.png --caption "Figure 1" --padding 0.1in -o out.png
//!   pillar compose a.svg b.png --direction vertical --json -o out.png

mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use image::Rgba;
use pillar_layout::{
    Align, AspectRatio, Axis, Dim, Direction, Flex, ImageRenderable, LayoutContext, Node, Padding,
    TextRenderable, Unit,
};
use pillar_render::{Raster, RasterBackend, load_image, render_to_canvas};
use tracing_subscriber::EnvFilter;

/// Font key the caption is registered under when `--font` is given.
const CAPTION_FONT: &str = "caption";

/// Pillar - static box layout of images and text
#[derive(Parser, Debug)]
#[command(name = "pillar")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Two images side by side on a 6x4 inch page at 100 dpi
    pillar compose left.png right.png --width 6in --height 4in -o out.png

    # Stack vertically with padding and a caption underneath
    pillar compose top.png bottom.svg --direction vertical --padding 0.2in \
        --caption "Before and after" --width 4in --height 8in -o out.png

    # Print placements as JSON, with the node path of each one
    pillar compose a.png b.png --width 800px --height 400px --json --trace -o out.png
"#)]
struct Cli {
    /// Log layout decisions (overrides RUST_LOG's default level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lay out images (and an optional caption) and write the result
    Compose(ComposeArgs),
}

#[derive(Args, Debug)]
struct ComposeArgs {
    /// Image files, in layout order (PNG, JPEG, GIF, WebP, SVG, ...)
    #[arg(value_name = "IMAGE", required = true)]
    images: Vec<PathBuf>,

    /// Caption text placed under the images
    #[arg(long)]
    caption: Option<String>,

    /// Font file for the caption (default: first system font found)
    #[arg(long, value_name = "PATH")]
    font: Option<PathBuf>,

    /// Caption font size, e.g. 0.2in or 24px
    #[arg(long, default_value = "0.2in")]
    font_size: Unit,

    /// Output width, e.g. 6in or 600px
    #[arg(long)]
    width: Unit,

    /// Output height, e.g. 4in or 400px
    #[arg(long)]
    height: Unit,

    /// Resolution in pixels per inch
    #[arg(long, default_value_t = 100.0)]
    dpi: f64,

    /// Direction the images are laid out in
    #[arg(long, default_value = "horizontal")]
    direction: Direction,

    /// Padding around the image block
    #[arg(long)]
    padding: Option<Unit>,

    /// Constrain the image block to this height/width ratio
    #[arg(long, value_name = "RATIO")]
    aspect: Option<f64>,

    /// Horizontal alignment of the ratio-constrained block
    #[arg(long, default_value = "middle")]
    halign: Align,

    /// Vertical alignment of the ratio-constrained block
    #[arg(long, default_value = "middle")]
    valign: Align,

    /// Scale the images up to fill the main axis
    #[arg(long)]
    expand: bool,

    /// Record the node path of every placement
    #[arg(long)]
    trace: bool,

    /// Print placements as JSON instead of a summary
    #[arg(long)]
    json: bool,

    /// Output file; the format follows the extension
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Compose(args) => compose(&args),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Build the layout tree described by `args`.
fn build_tree(args: &ComposeArgs, backend: &RasterBackend) -> Result<Node<Raster>> {
    let images = args
        .images
        .iter()
        .map(|path| load_image(path).map(|image| ImageRenderable::new(image).into()))
        .collect::<Result<Vec<Node<Raster>>>>()?;

    let mut block: Node<Raster> = Axis::new(args.direction, images)
        .with_expand(args.expand)
        .into();
    if let Some(pad) = args.padding {
        block = Padding::new(block, pad.to_in(args.dpi)).into();
    }
    if let Some(ratio) = args.aspect {
        anyhow::ensure!(
            ratio.is_finite() && ratio > 0.0,
            "aspect ratio must be positive, got {ratio}"
        );
        block = AspectRatio::new(block, ratio)
            .with_halign(args.halign)
            .with_valign(args.valign)
            .into();
    }

    let Some(caption) = args.caption.as_deref() else {
        return Ok(block);
    };
    let font = match &args.font {
        Some(path) => {
            backend.register_font_file(CAPTION_FONT, path)?;
            CAPTION_FONT
        }
        None => "",
    };
    let text = TextRenderable::new(caption, font, args.font_size);
    Ok(Flex::with_expanding(Direction::Vertical, vec![block, text.into()], 0).into())
}

fn compose(args: &ComposeArgs) -> Result<()> {
    anyhow::ensure!(
        args.dpi.is_finite() && args.dpi > 0.0,
        "dpi must be positive, got {}",
        args.dpi
    );
    let backend = RasterBackend::new();
    let tree = build_tree(args, &backend)?;

    let constraint = Dim::new(args.width, args.height)
        .to_in(args.dpi)
        .context("invalid output size")?;
    let cx = LayoutContext::new(&backend, args.dpi).with_trace(args.trace);
    tracing::info!(%constraint, dpi = args.dpi, "composing");

    let rendered = render_to_canvas(&tree, &constraint, &cx, Rgba([255, 255, 255, 255]))
        .context("layout failed")?;
    rendered.canvas.save(&args.output)?;

    let summary = report::Report::new(&args.output, args.dpi, &rendered);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        summary.print();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(extra: &[&str]) -> Result<ComposeArgs, clap::Error> {
        let mut argv = vec!["pillar", "compose", "a.png", "-o", "out.png"];
        argv.extend_from_slice(extra);
        let Command::Compose(args) = Cli::try_parse_from(argv)?.command;
        Ok(args)
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_compose_parses_lengths_and_enums() {
        let args = parse(&[
            "--width",
            "6in",
            "--height",
            "400px",
            "--direction",
            "column",
            "--halign",
            "center",
            "--padding",
            "0",
        ])
        .unwrap();
        assert_eq!(args.width, Unit::inches(6.0));
        assert_eq!(args.height, Unit::pixels(400.0));
        assert_eq!(args.direction, Direction::Vertical);
        assert_eq!(args.halign, Align::Middle);
        assert_eq!(args.valign, Align::Middle);
        assert_eq!(args.padding, Some(Unit::zero()));
        assert_eq!(args.font_size, Unit::inches(0.2));
    }

    #[test]
    fn test_compose_rejects_unitless_length() {
        assert!(parse(&["--width", "6", "--height", "4in"]).is_err());
    }

    #[test]
    fn test_compose_requires_an_image() {
        let err = Cli::try_parse_from(["pillar", "compose", "-o", "out.png"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }
}
