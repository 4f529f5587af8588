//! sidediff CLI - side-by-side PDF comparison tool

use std::fs::File;
use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use colored::Colorize;
use image::{DynamicImage, ImageFormat, RgbaImage};
use log::debug;

use sidediff::{
    compute_changes, markers_from_reader, markers_to_json, render_changes, DiffOptions, Marker,
    MarkStyle, RenderOptions,
};

#[derive(Parser)]
#[command(name = "sidediff")]
#[command(version)]
#[command(
    about = "Compare two PDF files and render a side-by-side image with the differences marked",
    long_about = None
)]
struct Cli {
    /// The two PDF files to compare
    #[arg(value_name = "FILE", num_args = 0..=2)]
    files: Vec<PathBuf>,

    /// Read a precomputed change list (JSON) from standard input instead
    /// of comparing two files
    #[arg(short = 'c', long)]
    changes: bool,

    /// Print the change list as JSON instead of rendering an image
    #[arg(long)]
    changes_only: bool,

    /// Marking styles for the left and right documents
    #[arg(
        short = 's',
        long,
        value_name = "box|strike|underline,...",
        default_value = "strike,underline"
    )]
    style: String,

    /// Output image format
    #[arg(short = 'f', long, value_enum, default_value = "png")]
    format: Format,

    /// Top margin to ignore, in percent of page height
    #[arg(short = 't', long, value_name = "PERCENT", default_value = "0")]
    top_margin: f32,

    /// Bottom margin to ignore, in percent of page height
    #[arg(short = 'b', long, value_name = "PERCENT", default_value = "100")]
    bottom_margin: f32,

    /// Width of each rendered page, in pixels
    #[arg(short = 'r', long, value_name = "PIXELS", default_value = "900")]
    result_width: u32,

    /// Output file (standard output if not specified)
    #[arg(short = 'o', long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Rasterize pages one at a time instead of in parallel
    #[arg(long)]
    sequential: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Png,
    Gif,
    Jpeg,
    Ppm,
    Tiff,
}

impl Format {
    fn image_format(self) -> ImageFormat {
        match self {
            Format::Png => ImageFormat::Png,
            Format::Gif => ImageFormat::Gif,
            Format::Jpeg => ImageFormat::Jpeg,
            Format::Ppm => ImageFormat::Pnm,
            Format::Tiff => ImageFormat::Tiff,
        }
    }

    fn has_alpha(self) -> bool {
        matches!(self, Format::Png | Format::Gif | Format::Tiff)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let markers = load_markers(cli)?;
    debug!("{} marker(s) in the change list", markers.len());

    if cli.changes_only {
        return emit(cli.output.as_deref(), markers_to_json(&markers)?.as_bytes());
    }

    let options = RenderOptions::new()
        .with_width(cli.result_width)
        .with_styles(MarkStyle::parse_pair(&cli.style)?);
    let options = if cli.sequential {
        options.sequential()
    } else {
        options
    };

    let image = render_changes(&markers, &options)?;
    emit(cli.output.as_deref(), &encode(image, cli.format)?)
}

fn load_markers(cli: &Cli) -> Result<Vec<Marker>, Box<dyn std::error::Error>> {
    if cli.changes {
        if !cli.files.is_empty() {
            return Err("--changes reads from standard input; no files expected".into());
        }
        Ok(markers_from_reader(io::stdin().lock())?)
    } else {
        let [left, right] = cli.files.as_slice() else {
            return Err("expected exactly two PDF files to compare (or --changes)".into());
        };
        let options = DiffOptions::new().with_margins(cli.top_margin, cli.bottom_margin);
        Ok(compute_changes(left, right, &options)?)
    }
}

fn encode(image: RgbaImage, format: Format) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    // jpeg and ppm have no alpha channel.
    let image = DynamicImage::ImageRgba8(image);
    let image = if format.has_alpha() {
        image
    } else {
        DynamicImage::ImageRgb8(image.to_rgb8())
    };
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, format.image_format())?;
    Ok(buffer.into_inner())
}

fn emit(output: Option<&Path>, bytes: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => File::create(path)?.write_all(bytes)?,
        None => io::stdout().lock().write_all(bytes)?,
    }
    Ok(())
}
