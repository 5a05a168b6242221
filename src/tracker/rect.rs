/// Bounding box for a detected face, in pixel coordinates.
///
/// Stored as TLWH: Top-Left X, Top-Left Y, Width, Height.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// Top-left x coordinate
    pub x: f32,
    /// Top-left y coordinate
    pub y: f32,
    /// Width of the bounding box
    pub width: f32,
    /// Height of the bounding box
    pub height: f32,
}

impl Rect {
    /// Create a new Rect from top-left coordinates and dimensions (TLWH format).
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a Rect from TLBR format (top-left x, top-left y, bottom-right x, bottom-right y).
    #[inline]
    pub fn from_tlbr(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        }
    }

    /// Convert to TLBR format: (x1, y1, x2, y2).
    #[inline]
    pub fn to_tlbr(&self) -> [f32; 4] {
        [self.x, self.y, self.x + self.width, self.y + self.height]
    }

    /// Get the center point of the bounding box.
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Clamp the box to an image of the given dimensions, returning integer
    /// pixel bounds `(x, y, w, h)`. A box entirely outside the image clamps
    /// to a zero-sized region at the nearest edge.
    pub fn to_pixel_bounds(&self, image_width: u32, image_height: u32) -> (u32, u32, u32, u32) {
        let [x1, y1, x2, y2] = self.to_tlbr();
        let x1 = (x1.max(0.0) as u32).min(image_width);
        let y1 = (y1.max(0.0) as u32).min(image_height);
        let x2 = (x2.max(0.0) as u32).min(image_width);
        let y2 = (y2.max(0.0) as u32).min(image_height);
        (x1, y1, x2.saturating_sub(x1), y2.saturating_sub(y1))
    }
}
