/// Axis-aligned bounding box in pixel coordinates.
///
/// Corners may fall outside the frame; callers that need in-frame coordinates
/// clamp with [`BBox::clamp_to`]. A box with `x2 <= x1` or `y2 <= y1` is
/// degenerate and has zero area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BBox {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> i32 {
        (self.x2 - self.x1).max(0)
    }

    pub fn height(&self) -> i32 {
        (self.y2 - self.y1).max(0)
    }

    pub fn area(&self) -> i64 {
        self.width() as i64 * self.height() as i64
    }

    /// Integer center, truncated like the rest of the pixel geometry.
    pub fn center(&self) -> (i32, i32) {
        ((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }

    /// Clamp the box into `[0, width] x [0, height]`.
    ///
    /// The upper bounds are the frame dimensions themselves because the box is
    /// half-open when used as a crop range.
    pub fn clamp_to(&self, width: u32, height: u32) -> Self {
        let w = width as i32;
        let h = height as i32;
        Self {
            x1: self.x1.clamp(0, w),
            y1: self.y1.clamp(0, h),
            x2: self.x2.clamp(0, w),
            y2: self.y2.clamp(0, h),
        }
    }

    /// Intersection over union with another box. Degenerate unions score 0.
    pub fn iou(&self, other: &BBox) -> f32 {
        let ix = (self.x2.min(other.x2) - self.x1.max(other.x1)).max(0) as f32;
        let iy = (self.y2.min(other.y2) - self.y1.max(other.y1)).max(0) as f32;
        let intersection = ix * iy;
        let union = self.area() as f32 + other.area() as f32 - intersection;
        if union <= 0.0 {
            0.0
        } else {
            intersection / union
        }
    }
}

/// Horizontal frame position of a detection, used as the steering hint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    Left,
    Center,
    Right,
}

impl Position {
    /// Classify a center x coordinate against the frame thirds.
    ///
    /// `Left` iff `cx <= width/3`, `Right` iff `cx >= 2*width/3`, else
    /// `Center`. The boundaries belong to the outer bands.
    pub fn classify(cx: f32, frame_width: u32) -> Self {
        let third = frame_width as f32 / 3.0;
        if cx <= third {
            Position::Left
        } else if cx >= 2.0 * third {
            Position::Right
        } else {
            Position::Center
        }
    }
}

/// One decoded detection. Frame-scoped: produced fresh per pipeline run and
/// never persisted across frames.
#[derive(Clone, Debug)]
pub struct Detection {
    pub class_id: usize,
    /// Strictly above the configured confidence threshold.
    pub confidence: f32,
    pub bbox: BBox,
    pub position: Position,
    /// `w * h` in pixels, computed before the corners are truncated to
    /// integers, so two boxes that round to the same corners can still rank
    /// differently.
    pub area: i64,
}
