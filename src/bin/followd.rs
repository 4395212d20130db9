//! followd - run the follow pipeline over a captured detector output dump.
//!
//! The capture file is a JSON document with the frame dimensions and one
//! entry per frame: the raw output layers the inference collaborator
//! produced, plus an optional path to the frame image for color-priority
//! scoring. This is the offline stand-in for the camera + DNN loop, useful
//! for replaying field recordings against new thresholds.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Deserialize;

use follow_kernel::{
    ClassLabels, Command, FollowConfig, FollowPipeline, OutputLayer, SelectionMode,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// Largest detection wins.
    Area,
    /// Highest color-signature score wins (needs frame images).
    Color,
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Capture file: JSON dump of per-frame detector output.
    #[arg(long, env = "FOLLOW_CAPTURE")]
    capture: PathBuf,
    /// Target selection mode.
    #[arg(long, value_enum, default_value_t = Mode::Area)]
    mode: Mode,
}

#[derive(Debug, Deserialize)]
struct Capture {
    width: u32,
    height: u32,
    frames: Vec<CaptureFrame>,
}

#[derive(Debug, Deserialize)]
struct CaptureFrame {
    layers: Vec<OutputLayer>,
    /// Frame image on disk, relative to the capture file.
    image: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let cfg = FollowConfig::load()?;
    let labels = match &cfg.class_names_path {
        Some(path) => Some(ClassLabels::load(path)?),
        None => None,
    };
    let mode = match args.mode {
        Mode::Area => SelectionMode::AreaPriority,
        Mode::Color => SelectionMode::ColorPriority,
    };
    let pipeline = FollowPipeline::from_config(&cfg, mode);

    let capture = read_capture(&args.capture)?;
    log::info!(
        "followd: {} frame(s) at {}x{}, mode {:?}",
        capture.frames.len(),
        capture.width,
        capture.height,
        args.mode
    );

    let base_dir = args.capture.parent().unwrap_or_else(|| Path::new("."));
    let mut held = 0usize;

    for (index, frame) in capture.frames.iter().enumerate() {
        let image = match &frame.image {
            Some(rel) => Some(load_frame_image(&base_dir.join(rel))?),
            None => None,
        };

        let verdict = pipeline.process(
            &frame.layers,
            capture.width,
            capture.height,
            image.as_ref(),
            None,
        );

        match &verdict.target {
            Some(target) => {
                let label = labels
                    .as_ref()
                    .and_then(|l| l.get(cfg.target_class_id))
                    .unwrap_or("target");
                log::info!(
                    "frame {}: {:?} -> {} at ({},{})-({},{}) conf {:.2}",
                    index,
                    verdict.command,
                    label,
                    target.bbox.x1,
                    target.bbox.y1,
                    target.bbox.x2,
                    target.bbox.y2,
                    target.confidence
                );
            }
            None => {
                held += 1;
                log::info!("frame {}: {:?}", index, Command::Hold);
            }
        }
    }

    println!("followd summary:");
    println!("  frames processed: {}", capture.frames.len());
    println!("  frames held: {}", held);
    Ok(())
}

fn read_capture(path: &Path) -> Result<Capture> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read capture file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("invalid capture file {}", path.display()))
}

fn load_frame_image(path: &Path) -> Result<image::RgbImage> {
    let img = image::open(path)
        .with_context(|| format!("failed to load frame image {}", path.display()))?;
    Ok(img.to_rgb8())
}
