use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Builder;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn, LevelFilter};
use rayportal_common::GameConfig;
use rayportal_engine::{FrameBuffer, PortalGame};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Command-line arguments for the viewer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the game configuration
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Directory the PNG frames are written to
    #[arg(short, long, default_value = "frames")]
    output_dir: PathBuf,

    /// Write every N-th frame
    #[arg(long, default_value_t = 10)]
    every: u32,

    /// Number of ticks to run (defaults to `run.ticks` from the config)
    #[arg(long)]
    ticks: Option<u32>,

    /// Integer upscale factor applied to each saved frame
    #[arg(long, default_value_t = 1)]
    scale: u32,
}

/// Converts the packed `0xAARRGGBB` frame into an image.
fn frame_to_image(frame: &FrameBuffer) -> RgbaImage {
    RgbaImage::from_fn(frame.width() as u32, frame.height() as u32, |x, y| {
        let pixel = frame.pixel(x as usize, y as usize);
        Rgba([(pixel >> 16) as u8, (pixel >> 8) as u8, pixel as u8, (pixel >> 24) as u8])
    })
}

fn save_frame(frame: &FrameBuffer, scale: u32, path: &Path) -> Result<()> {
    let mut image = frame_to_image(frame);
    if scale > 1 {
        image = imageops::resize(&image, image.width() * scale, image.height() * scale, FilterType::Nearest);
    }
    image
        .save(path)
        .with_context(|| format!("Failed to write frame '{}'", path.display()))
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    run_with_args(args)
}

fn run_with_args(args: Args) -> Result<()> {
    // Initialize logger
    Builder::from_default_env()
        .filter(None, LevelFilter::Info)
        .init();

    info!("Starting portal raycaster viewer...");
    info!("Config: {}", args.config.display());
    info!("Output directory: {}", args.output_dir.display());

    let config = GameConfig::load(&args.config)?;
    let ticks = args.ticks.unwrap_or(config.run.ticks);
    let every = if args.every == 0 {
        warn!("--every 0 is not meaningful, writing every frame.");
        1
    } else {
        args.every
    };

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create output directory '{}'", args.output_dir.display()))?;

    let mut game = PortalGame::new(config)?;
    info!(
        "Rendering {}x{} frames for {} ticks (scale {}).",
        game.params().width,
        game.params().height,
        ticks,
        args.scale.max(1)
    );

    // Set up progress bar
    let progress_bar = ProgressBar::new(ticks as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ticks ({percent}%) [{eta}] {msg}")
            .expect("Invalid progress bar template")
            .progress_chars("#>-"),
    );

    let start_time = Instant::now();
    let mut written = 0usize;
    save_frame(game.frame(), args.scale, &args.output_dir.join("frame_00000.png"))?;
    written += 1;

    for tick in 1..=ticks {
        game.tick()?;
        if tick % every == 0 {
            let path = args.output_dir.join(format!("frame_{:05}.png", tick));
            save_frame(game.frame(), args.scale, &path)?;
            written += 1;
        }
        progress_bar.set_message(format!("{} teleports", game.teleports()));
        progress_bar.inc(1);
    }

    progress_bar.finish_with_message(format!("Wrote {} frames", written));
    game.log_summary();
    info!(
        "Finished in {:.2} s, {} frames in {}.",
        start_time.elapsed().as_secs_f64(),
        written,
        args.output_dir.display()
    );
    Ok(())
}
