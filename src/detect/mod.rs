//! Detection post-processing: decoding raw detector output and suppressing
//! redundant boxes.

mod decode;
mod nms;
mod result;

pub use decode::{DetectionDecoder, OutputLayer};
pub use nms::suppress;
pub use result::{BBox, Detection, Position};
