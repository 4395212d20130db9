use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::color::{Hsv, HsvRange};

const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.3;
const DEFAULT_NMS_THRESHOLD: f32 = 0.4;
const DEFAULT_TARGET_CLASS_ID: usize = 0;
// The original deployment tracked a high-visibility safety vest.
const DEFAULT_COLOR_LOW: [u8; 3] = [0, 140, 185];
const DEFAULT_COLOR_HIGH: [u8; 3] = [30, 255, 255];
const DEFAULT_MIN_REGION_AREA: u32 = 0;

#[derive(Debug, Deserialize, Default)]
struct FollowConfigFile {
    confidence_threshold: Option<f32>,
    nms_threshold: Option<f32>,
    target_class_id: Option<usize>,
    class_names: Option<PathBuf>,
    color: Option<ColorConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct ColorConfigFile {
    low: Option<[u8; 3]>,
    high: Option<[u8; 3]>,
    min_region_area: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct FollowConfig {
    /// Detections at or below this confidence are dropped.
    pub confidence_threshold: f32,
    /// Boxes overlapping a kept box above this IoU are suppressed.
    pub nms_threshold: f32,
    /// The single class the pipeline tracks (0 = "person" in coco.names).
    pub target_class_id: usize,
    /// Optional class label table for human-readable output.
    pub class_names_path: Option<PathBuf>,
    pub color: ColorSettings,
}

#[derive(Debug, Clone, Copy)]
pub struct ColorSettings {
    pub range: HsvRange,
    pub min_region_area: u32,
}

impl FollowConfig {
    /// Load configuration from the JSON file named by `FOLLOW_CONFIG` (when
    /// set), then apply environment overrides and validate.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("FOLLOW_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => read_config_file(Path::new(path))?,
            None => FollowConfigFile::default(),
        };
        let mut cfg = Self::from_file(file_cfg)?;
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: FollowConfigFile) -> Result<Self> {
        let color = file.color.unwrap_or_default();
        let low = color.low.unwrap_or(DEFAULT_COLOR_LOW);
        let high = color.high.unwrap_or(DEFAULT_COLOR_HIGH);
        let range = HsvRange::new(
            Hsv::new(low[0], low[1], low[2]),
            Hsv::new(high[0], high[1], high[2]),
        )?;
        Ok(Self {
            confidence_threshold: file
                .confidence_threshold
                .unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD),
            nms_threshold: file.nms_threshold.unwrap_or(DEFAULT_NMS_THRESHOLD),
            target_class_id: file.target_class_id.unwrap_or(DEFAULT_TARGET_CLASS_ID),
            class_names_path: file.class_names,
            color: ColorSettings {
                range,
                min_region_area: color.min_region_area.unwrap_or(DEFAULT_MIN_REGION_AREA),
            },
        })
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(value) = std::env::var("FOLLOW_CONFIDENCE_THRESHOLD") {
            self.confidence_threshold = value
                .parse()
                .map_err(|_| anyhow!("FOLLOW_CONFIDENCE_THRESHOLD must be a float"))?;
        }
        if let Ok(value) = std::env::var("FOLLOW_NMS_THRESHOLD") {
            self.nms_threshold = value
                .parse()
                .map_err(|_| anyhow!("FOLLOW_NMS_THRESHOLD must be a float"))?;
        }
        if let Ok(value) = std::env::var("FOLLOW_TARGET_CLASS") {
            self.target_class_id = value
                .parse()
                .map_err(|_| anyhow!("FOLLOW_TARGET_CLASS must be a class index"))?;
        }
        if let Ok(path) = std::env::var("FOLLOW_CLASS_NAMES") {
            if !path.trim().is_empty() {
                self.class_names_path = Some(PathBuf::from(path));
            }
        }
        if let Ok(value) = std::env::var("FOLLOW_MIN_REGION_AREA") {
            self.color.min_region_area = value
                .parse()
                .map_err(|_| anyhow!("FOLLOW_MIN_REGION_AREA must be a pixel count"))?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.confidence_threshold) {
            return Err(anyhow!(
                "confidence_threshold must be in [0, 1), got {}",
                self.confidence_threshold
            ));
        }
        if !(0.0..=1.0).contains(&self.nms_threshold) {
            return Err(anyhow!(
                "nms_threshold must be in [0, 1], got {}",
                self.nms_threshold
            ));
        }
        // HsvRange validated its own bounds on construction.
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<FollowConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
