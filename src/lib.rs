//! Person-Following Vision Kernel
//!
//! This crate implements the detection post-processing and target-selection
//! pipeline behind a camera-guided "follow a person" behavior. The neural
//! network, camera, renderer, and depth sensor are external collaborators;
//! this crate owns everything between the raw detector output and the
//! movement command.
//!
//! # Pipeline
//!
//! 1. `detect::DetectionDecoder` - raw per-cell rows + frame dimensions ->
//!    candidate detections (bbox, confidence, class, position).
//! 2. `detect::suppress` - greedy non-maximum suppression.
//! 3. `color::ColorScorer` - optional per-box color-signature score.
//! 4. `select` - the single best detection -> `Command` and optional target
//!    distance.
//!
//! `pipeline::FollowPipeline` wires the stages together, parameterized by
//! `SelectionMode` (area-priority vs. color-priority). Each invocation is
//! stateless given its frame-scoped inputs: no detection survives a frame,
//! and concurrent frames would need no synchronization.
//!
//! # Degradation, not failure
//!
//! The pipeline never fails on frame data. Malformed detector rows are
//! filtered, degenerate geometry scores zero, and an empty detection list is
//! a normal outcome that yields `Command::Hold`. `Result` is reserved for
//! setup: configuration files, class-name tables, invalid thresholds.

pub mod classes;
pub mod color;
pub mod config;
pub mod detect;
pub mod pipeline;
pub mod select;

pub use classes::ClassLabels;
pub use color::{rgb_to_hsv, ColorScorer, Hsv, HsvRange};
pub use config::{ColorSettings, FollowConfig};
pub use detect::{suppress, BBox, Detection, DetectionDecoder, OutputLayer, Position};
pub use pipeline::{FollowPipeline, FrameVerdict, SelectionMode};
pub use select::{get_command, hunt, make_target, select_by_area, select_by_color, Command, DepthLookup, Target};
