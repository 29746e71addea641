use clap::{Parser, Subcommand};
use qrscan::tools::{
    binary_stats, collect_images, dump_cells, dump_data, grayscale_stats, load_grayscale,
    save_labels,
};
use qrscan::utils::binarization::adaptive_binarize;
use qrscan::{GreyImage, Recognizer, ScanResult, error_message, scan_frames};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "qrtool", version, about = "qrscan command-line tools")]
struct Cli {
    /// Log pipeline stages at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode every QR code in the given images or directories
    Scan {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Process images in parallel
        #[arg(long)]
        parallel: bool,
    },
    /// Print capstones, grids, cell grids and decoded metadata for one image
    Inspect {
        image: PathBuf,
        /// Also print each code's module grid
        #[arg(long)]
        cells: bool,
    },
    /// Write the thresholded image as a PNG
    Threshold {
        image: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Command::Scan { paths, parallel } => scan_cmd(&paths, parallel),
        Command::Inspect { image, cells } => inspect_cmd(&image, cells),
        Command::Threshold { image, output } => threshold_cmd(&image, &output),
    }
}

fn scan_cmd(paths: &[PathBuf], parallel: bool) -> ExitCode {
    let files: Vec<PathBuf> = paths.iter().flat_map(|p| collect_images(p)).collect();
    if files.is_empty() {
        eprintln!("No images found");
        return ExitCode::FAILURE;
    }

    let mut loaded = Vec::with_capacity(files.len());
    for path in &files {
        match load_grayscale(path) {
            Ok(img) => loaded.push((path, img)),
            Err(err) => eprintln!("Failed to load image {}: {}", path.display(), err),
        }
    }

    let start = Instant::now();
    let results: Vec<Vec<ScanResult>> = if parallel {
        let frames: Vec<GreyImage<'_>> = loaded
            .iter()
            .map(|(_, (pixels, width, height))| GreyImage {
                pixels,
                width: *width,
                height: *height,
            })
            .collect();
        scan_frames(&frames)
    } else {
        let mut rec = Recognizer::new();
        loaded
            .iter()
            .map(|(_, (pixels, width, height))| scan_one(&mut rec, pixels, *width, *height))
            .collect()
    };
    let elapsed = start.elapsed();

    let mut decoded = 0usize;
    for ((path, _), codes) in loaded.iter().zip(&results) {
        for result in codes {
            match &result.data {
                Ok(data) => {
                    decoded += 1;
                    println!(
                        "{}: {}",
                        path.display(),
                        String::from_utf8_lossy(&data.payload)
                    );
                }
                Err(err) => println!(
                    "{}: decode failed: {}",
                    path.display(),
                    error_message((*err).into())
                ),
            }
        }
    }
    eprintln!(
        "{} images, {} codes decoded in {:.2?}",
        loaded.len(),
        decoded,
        elapsed
    );

    if decoded > 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn scan_one(rec: &mut Recognizer, pixels: &[u8], width: usize, height: usize) -> Vec<ScanResult> {
    if let Err(err) = rec.resize(width, height).and_then(|_| rec.load_image(pixels)) {
        eprintln!("{err}");
        return Vec::new();
    }
    rec.identify();
    rec.codes()
        .iter()
        .map(|code| ScanResult {
            code: code.clone(),
            data: code.decode(),
        })
        .collect()
}

fn inspect_cmd(image: &Path, show_cells: bool) -> ExitCode {
    let (gray, width, height) = match load_grayscale(image) {
        Ok(img) => img,
        Err(err) => {
            eprintln!("Failed to load image {}: {}", image.display(), err);
            return ExitCode::FAILURE;
        }
    };
    println!("Image: {} ({}x{})", image.display(), width, height);

    let stats = grayscale_stats(&gray);
    println!(
        "Greyscale range: {}-{}, average: {}",
        stats.min, stats.max, stats.avg
    );

    let mut rec = Recognizer::new();
    if let Err(err) = rec.resize(width, height).and_then(|_| rec.load_image(&gray)) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }
    let start = Instant::now();
    let count = rec.identify();
    let elapsed = start.elapsed();

    let binary = adaptive_binarize(&gray, width, height);
    let bstats = binary_stats(&binary);
    println!(
        "Threshold: {} dark of {} ({:.2}%)",
        bstats.dark_pixels,
        bstats.total_pixels,
        bstats.dark_ratio * 100.0
    );
    println!("{} regions labelled", rec.regions().len());

    println!("{} capstones", rec.capstones().len());
    for (i, cap) in rec.capstones().iter().enumerate() {
        println!(
            "  Capstone {}: center=({}, {}) proportion_error={:.1} grid={:?}",
            i, cap.center.x, cap.center.y, cap.proportion_error, cap.grid
        );
    }

    println!("{} grids", rec.grids().len());
    for (i, grid) in rec.grids().iter().enumerate() {
        println!(
            "  Grid {}: size={} caps={:?} align=({}, {}) align_region={:?} timing={:?}/{:?}",
            i,
            grid.size,
            grid.caps,
            grid.align.x,
            grid.align.y,
            grid.align_region,
            grid.hscan,
            grid.vscan
        );
    }

    println!(
        "{count} codes in {elapsed:.2?} ({} scratch bytes, flood depth {})",
        rec.scratch_bytes(),
        rec.flood_depth()
    );
    for (i, code) in rec.codes().iter().enumerate() {
        println!("Code {i}:");
        if show_cells {
            print!("{}", dump_cells(code));
        }
        match code.decode() {
            Ok(data) => print!("{}", dump_data(&data)),
            Err(err) => {
                let mut flipped = code.clone();
                flipped.flip();
                match flipped.decode() {
                    Ok(data) => {
                        println!("    (mirrored)");
                        print!("{}", dump_data(&data));
                    }
                    Err(_) => println!("    Decode failed: {}", error_message(err.into())),
                }
            }
        }
    }
    ExitCode::SUCCESS
}

fn threshold_cmd(image: &Path, output: &Path) -> ExitCode {
    let (gray, width, height) = match load_grayscale(image) {
        Ok(img) => img,
        Err(err) => {
            eprintln!("Failed to load image {}: {}", image.display(), err);
            return ExitCode::FAILURE;
        }
    };

    let mut rec = Recognizer::new();
    if let Err(err) = rec.resize(width, height).and_then(|_| rec.load_image(&gray)) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }
    rec.identify();

    match save_labels(output, rec.labels(), width, height) {
        Ok(()) => {
            println!("Wrote {}", output.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Failed to write {}: {}", output.display(), err);
            ExitCode::FAILURE
        }
    }
}
