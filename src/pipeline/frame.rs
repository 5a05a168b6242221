//! Frame and face image types: contiguous RGB8 bytes in row-major order.
//!
//! Format conversion happens at I/O boundaries only; the tracking core
//! treats pixel data as opaque apart from cropping and annotation.

use crate::tracker::Rect;

const CHANNELS: usize = 3;

/// A single video frame.
#[derive(Debug, Clone)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(
            data.len(),
            width as usize * height as usize * CHANNELS,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
        }
    }

    /// An all-black frame, mostly useful in tests.
    pub fn blank(width: u32, height: u32) -> Self {
        Self::new(
            vec![0; width as usize * height as usize * CHANNELS],
            width,
            height,
        )
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Copy the region under `rect` out of the frame, clamped to the frame
    /// bounds. Returns `None` when the clamped region is empty.
    pub fn crop(&self, rect: &Rect) -> Option<FaceImage> {
        let (x, y, w, h) = rect.to_pixel_bounds(self.width, self.height);
        if w == 0 || h == 0 {
            return None;
        }

        let mut data = Vec::with_capacity(w as usize * h as usize * CHANNELS);
        for row in y..y + h {
            let start = (row as usize * self.width as usize + x as usize) * CHANNELS;
            let end = start + w as usize * CHANNELS;
            data.extend_from_slice(&self.data[start..end]);
        }
        Some(FaceImage::new(data, w, h))
    }

    /// Draw a 2px box outline into the frame.
    pub fn draw_box(&mut self, rect: &Rect, color: [u8; 3]) {
        let (x, y, w, h) = rect.to_pixel_bounds(self.width, self.height);
        if w == 0 || h == 0 {
            return;
        }
        let thickness = 2u32.min(w).min(h);
        for t in 0..thickness {
            for col in x..x + w {
                self.put_pixel(col, y + t, color);
                self.put_pixel(col, (y + h - 1).saturating_sub(t), color);
            }
            for row in y..y + h {
                self.put_pixel(x + t, row, color);
                self.put_pixel((x + w - 1).saturating_sub(t), row, color);
            }
        }
    }

    fn put_pixel(&mut self, x: u32, y: u32, color: [u8; 3]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * CHANNELS;
        self.data[idx..idx + CHANNELS].copy_from_slice(&color);
    }
}

/// A cropped face image retained as a track's snapshot and attached to
/// sighting reports.
#[derive(Debug, Clone)]
pub struct FaceImage {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl FaceImage {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(
            data.len(),
            width as usize * height as usize * CHANNELS,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}
