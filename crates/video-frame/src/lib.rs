//! Decoded RGB video frames
//!
//! The capture side (webcam, HTTP multipart stream, test harness) is an
//! external collaborator; this crate only defines the frame type the
//! monitoring pipeline consumes, plus the pixel-level helpers needed to
//! crop classifier input regions out of a frame.

/// A rectangular pixel region, clamped to frame bounds on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// Build a region from inclusive pixel extents padded by `pad`,
    /// clamped to a `width` x `height` frame. Returns `None` when the
    /// extents are inverted or the clamped region is empty.
    pub fn from_extents(
        x_min: f32,
        x_max: f32,
        y_min: f32,
        y_max: f32,
        pad: f32,
        width: u32,
        height: u32,
    ) -> Option<Region> {
        if x_max < x_min || y_max < y_min {
            return None;
        }
        let x0 = (x_min - pad).max(0.0) as u32;
        let y0 = (y_min - pad).max(0.0) as u32;
        let x1 = ((x_max + pad) as u32).min(width);
        let y1 = ((y_max + pad) as u32).min(height);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Region {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }
}

/// Decoded RGB video frame (8-bit, 3 channels, row-major).
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// RGB pixel data (width * height * 3)
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Capture timestamp (milliseconds since epoch)
    pub timestamp_ms: u64,
    /// Frame sequence number
    pub sequence: u32,
}

impl VideoFrame {
    /// Create a new video frame from raw RGB data.
    pub fn new(data: Vec<u8>, width: u32, height: u32, timestamp_ms: u64, sequence: u32) -> Self {
        Self {
            data,
            width,
            height,
            timestamp_ms,
            sequence,
        }
    }

    /// Create an all-black frame of the given dimensions.
    pub fn blank(width: u32, height: u32) -> Self {
        Self::new(vec![0; (width * height * 3) as usize], width, height, 0, 0)
    }

    /// Get pixel at (x, y).
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 3) as usize;
        Some([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }

    /// Crop a region out of the frame. Returns `None` when the region
    /// exceeds the frame bounds.
    pub fn crop(&self, region: Region) -> Option<VideoFrame> {
        let Region {
            x,
            y,
            width: w,
            height: h,
        } = region;
        if x + w > self.width || y + h > self.height || w == 0 || h == 0 {
            return None;
        }

        let mut cropped = Vec::with_capacity((w * h * 3) as usize);
        for row in y..(y + h) {
            let start = ((row * self.width + x) * 3) as usize;
            let end = start + (w * 3) as usize;
            cropped.extend_from_slice(&self.data[start..end]);
        }

        Some(VideoFrame {
            data: cropped,
            width: w,
            height: h,
            timestamp_ms: self.timestamp_ms,
            sequence: self.sequence,
        })
    }

    /// Resize the frame with nearest-neighbor sampling.
    pub fn resize(&self, new_width: u32, new_height: u32) -> VideoFrame {
        let mut resized = Vec::with_capacity((new_width * new_height * 3) as usize);

        let x_ratio = self.width as f32 / new_width as f32;
        let y_ratio = self.height as f32 / new_height as f32;

        for y in 0..new_height {
            for x in 0..new_width {
                let src_x = ((x as f32 * x_ratio) as u32).min(self.width.saturating_sub(1));
                let src_y = ((y as f32 * y_ratio) as u32).min(self.height.saturating_sub(1));
                match self.get_pixel(src_x, src_y) {
                    Some(pixel) => resized.extend_from_slice(&pixel),
                    None => resized.extend_from_slice(&[0, 0, 0]),
                }
            }
        }

        VideoFrame {
            data: resized,
            width: new_width,
            height: new_height,
            timestamp_ms: self.timestamp_ms,
            sequence: self.sequence,
        }
    }

    /// Convert to grayscale (luminance).
    pub fn to_grayscale(&self) -> Vec<u8> {
        self.data
            .chunks(3)
            .map(|pixel| {
                (pixel[0] as f32 * 0.299 + pixel[1] as f32 * 0.587 + pixel[2] as f32 * 0.114) as u8
            })
            .collect()
    }
}
