//! TechnoTeam image CLI application.
//!
//! Decodes TechnoTeam luminance camera images and ascii pixel grids, prints
//! a summary and optionally exports the pixels.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, LevelFilter};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;
use ttimage_core::{
    ascii, output, source, DecodeError, Delimiter, HeaderMap, ImageKind, PixelArray,
    TtImageDecoder,
};

/// TechnoTeam luminance camera image decoder.
///
/// Decodes .pus, .pf and .pcf images (and .txt ascii grids) and exports the
/// pixel values to CSV or NumPy files.
#[derive(Parser, Debug)]
#[command(name = "ttimage")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input image path (.pus, .pf, .pcf or .txt)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file path (.csv, .npy)
    ///
    /// The output format is determined by the file extension:
    /// - .csv: delimited text, one line per image row
    /// - .npy: NumPy array file
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Value delimiter for CSV output (comma, tab, semicolon, space)
    #[arg(short, long, default_value = "comma")]
    delimiter: String,

    /// Write the image header as key=value lines to this file
    #[arg(long, value_name = "PATH")]
    header: Option<PathBuf>,

    /// Print the image header to stdout
    #[arg(long)]
    print_header: bool,

    /// Suppress progress output
    #[arg(short, long)]
    quiet: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

/// Decoded input: the pixels plus the header for binary images.
struct Decoded {
    pixels: PixelArray,
    header: Option<HeaderMap>,
    format: String,
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(default)
        .parse_default_env()
        .init();
}

fn decode_input(path: &Path) -> Result<Decoded> {
    match ImageKind::from_path(path) {
        Some(ImageKind::Ascii) => {
            let text = source::read_ascii_file(path).context("Failed to read ascii image")?;
            debug!("read {} bytes of ascii text", text.len());
            let pixels = ascii::decode(&text).context("Failed to decode ascii image")?;
            Ok(Decoded {
                pixels,
                header: None,
                format: "ascii grid".to_string(),
            })
        }
        // the core reports unknown extensions itself
        Some(ImageKind::TechnoTeam) | None => {
            let mut decoder = TtImageDecoder::new();
            match decoder.decode_file(path) {
                Ok(result) => {
                    for (key, value) in result.header.iter() {
                        debug!("header {}={}", key, value);
                    }
                    Ok(Decoded {
                        pixels: result.pixels,
                        header: Some(result.header),
                        format: result.encoding.tag().to_string(),
                    })
                }
                Err(err) => {
                    if let Some(header) = decoder.header().filter(|_| err.is_pixel_error()) {
                        log::warn!(
                            "header parsed ({} entries) but pixel data is unusable",
                            header.len()
                        );
                    }
                    Err(hint(err).context("Failed to decode TechnoTeam image"))
                }
            }
        }
    }
}

/// Adds a hint to errors a user can act on.
fn hint(err: DecodeError) -> anyhow::Error {
    match err {
        DecodeError::UnsupportedExtension { .. } => anyhow::Error::new(err)
            .context("Valid formats are *.pus, *.pf and *.pcf (binary) or *.txt (ascii)"),
        DecodeError::UnsupportedPixelFormat(_) | DecodeError::MissingHeaderKey(_) => {
            anyhow::Error::new(err).context("The image type is not defined in the header")
        }
        other => anyhow::Error::new(other),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let delimiter = Delimiter::from_str(&args.delimiter)
        .context("Invalid delimiter. Use comma, tab, semicolon or space")?;

    // checked before anything is decoded or written
    if args.header.is_some() && ImageKind::from_path(&args.input) == Some(ImageKind::Ascii) {
        anyhow::bail!("Ascii images carry no header to write; drop --header");
    }

    // Setup progress bar
    let progress = if args.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap(),
        );
        pb
    };

    let start_time = Instant::now();

    progress.set_message(format!(
        "Decoding {:?}...",
        args.input.file_name().unwrap_or_default()
    ));

    let decoded = decode_input(&args.input)?;
    let decode_duration = start_time.elapsed();
    debug!(
        "decoded {} elements in {:.3}s",
        decoded.pixels.data().len(),
        decode_duration.as_secs_f64()
    );

    if args.print_header {
        match &decoded.header {
            Some(header) => {
                for (key, value) in header.iter() {
                    println!("{}={}", key, value);
                }
            }
            None => log::warn!("ascii images carry no header"),
        }
    }

    if let Some(output_path) = &args.output {
        let output_ext = output_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("csv");

        progress.set_message(format!(
            "Writing to {:?}...",
            output_path.file_name().unwrap_or_default()
        ));

        match output_ext.to_lowercase().as_str() {
            "csv" => {
                output::write_csv(output_path, &decoded.pixels, delimiter)
                    .context("Failed to write CSV output")?;
            }
            "npy" => {
                output::write_npy(output_path, &decoded.pixels)
                    .context("Failed to write npy output")?;
            }
            _ => {
                anyhow::bail!(
                    "Unsupported output format: .{}. Use .csv or .npy",
                    output_ext
                );
            }
        }
    }

    if let (Some(header_path), Some(header)) = (&args.header, &decoded.header) {
        output::write_header(header_path, header).context("Failed to write header output")?;
    }

    let total_duration = start_time.elapsed();
    let dims = decoded.pixels.shape().dims();

    progress.finish_with_message(format!(
        "Done! Decoded {:?} image in {:.2}s",
        dims,
        total_duration.as_secs_f64()
    ));

    if !args.quiet {
        // Print summary
        eprintln!();
        eprintln!("Summary:");
        eprintln!("  Input:        {:?}", args.input);
        if let Some(output_path) = &args.output {
            eprintln!("  Output:       {:?}", output_path);
        }
        eprintln!("  Format:       {}", decoded.format);
        eprintln!("  Shape:        {:?}", dims);
        if let Some(header) = &decoded.header {
            eprintln!("  Header keys:  {}", header.len());
        }
        eprintln!("  Duration:     {:.3}s", total_duration.as_secs_f64());
    }

    Ok(())
}
