//! Rectangle types and coordinate-space conversion.
//!
//! Two coordinate spaces exist in the pipeline:
//!
//! - [`NormalizedBox`]: resolution-independent, integer 0-1000 per axis,
//!   stored in the vision service's `[y_min, x_min, y_max, x_max]` order.
//! - [`PixelBox`]: `(x, y, w, h)` in pixels for a concrete resolution.
//!
//! Conversion rounds half-away-from-zero (`f64::round`), so repeated
//! conversions of the same value are deterministic. `normalize` is not an
//! exact inverse of `denormalize` (rounding loses information) but
//! round-trips within one unit per field.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Upper bound of the normalized coordinate space, per axis.
pub const NORMALIZED_SCALE: i64 = 1000;

/// A resolution-independent rectangle on the 0-1000 normalized scale.
///
/// Field order mirrors the detection wire format (`box_2d`):
/// `[y_min, x_min, y_max, x_max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedBox {
    pub y_min: i64,
    pub x_min: i64,
    pub y_max: i64,
    pub x_max: i64,
}

impl NormalizedBox {
    /// Validate and build a normalized box from a raw `box_2d` array.
    ///
    /// The detection service is untrusted: out-of-range and degenerate
    /// boxes are rejected here, at the boundary.
    pub fn from_raw(coords: [i64; 4]) -> ModelResult<Self> {
        let [y_min, x_min, y_max, x_max] = coords;

        let in_range = |v: i64| (0..=NORMALIZED_SCALE).contains(&v);
        if !coords.iter().copied().all(in_range) {
            return Err(ModelError::InvalidNormalizedBox {
                coords,
                reason: format!("coordinates must be within 0..={}", NORMALIZED_SCALE),
            });
        }

        if y_min >= y_max || x_min >= x_max {
            return Err(ModelError::InvalidNormalizedBox {
                coords,
                reason: "degenerate box (min must be strictly below max)".to_string(),
            });
        }

        Ok(Self { y_min, x_min, y_max, x_max })
    }

    /// Raw `[y_min, x_min, y_max, x_max]` array, wire order.
    pub fn as_raw(&self) -> [i64; 4] {
        [self.y_min, self.x_min, self.y_max, self.x_max]
    }

    /// Scale to pixel coordinates for a `width`x`height` frame.
    ///
    /// Width/height scale linearly; rounding is half-away-from-zero.
    pub fn denormalize(&self, width: u32, height: u32) -> ModelResult<PixelBox> {
        if width == 0 || height == 0 {
            return Err(ModelError::InvalidResolution { width, height });
        }

        let scale = |v: i64, extent: u32| -> u32 {
            ((v as f64 / NORMALIZED_SCALE as f64) * extent as f64).round() as u32
        };

        let x = scale(self.x_min, width);
        let y = scale(self.y_min, height);
        let w = scale(self.x_max - self.x_min, width).max(1);
        let h = scale(self.y_max - self.y_min, height).max(1);

        // Rounding the width independently of the edges can push the box
        // one pixel past the frame; clamp back in.
        let x = x.min(width.saturating_sub(w));
        let y = y.min(height.saturating_sub(h));

        PixelBox::new(x, y, w, h, width, height)
    }
}

/// A pixel-space rectangle, valid for a specific resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelBox {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl PixelBox {
    /// Validate and build a pixel box against a `width`x`height` frame.
    pub fn new(x: u32, y: u32, w: u32, h: u32, width: u32, height: u32) -> ModelResult<Self> {
        if w == 0 || h == 0 || x.saturating_add(w) > width || y.saturating_add(h) > height {
            return Err(ModelError::InvalidPixelBox { x, y, w, h, width, height });
        }
        Ok(Self { x, y, w, h })
    }

    /// Scale to the normalized 0-1000 space for a `width`x`height` frame.
    pub fn normalize(&self, width: u32, height: u32) -> ModelResult<NormalizedBox> {
        if width == 0 || height == 0 {
            return Err(ModelError::InvalidResolution { width, height });
        }

        let scale = |v: u32, extent: u32| -> i64 {
            ((v as f64 / extent as f64) * NORMALIZED_SCALE as f64).round() as i64
        };

        NormalizedBox::from_raw([
            scale(self.y, height),
            scale(self.x, width),
            scale(self.y + self.h, height),
            scale(self.x + self.w, width),
        ])
    }

    /// Reduce an arbitrary set of painted pixel coordinates to their
    /// bounding box.
    ///
    /// This is the pure core behind freehand mask selection: the capture
    /// modality (painting, dragging, service output) does not matter, only
    /// the min/max extent of the covered points.
    pub fn bounding(
        points: impl IntoIterator<Item = (u32, u32)>,
        width: u32,
        height: u32,
    ) -> ModelResult<Self> {
        let mut iter = points.into_iter();
        let first = iter.next().ok_or(ModelError::EmptyPointSet)?;

        let (mut min_x, mut min_y) = first;
        let (mut max_x, mut max_y) = first;
        for (px, py) in iter {
            min_x = min_x.min(px);
            min_y = min_y.min(py);
            max_x = max_x.max(px);
            max_y = max_y.max(py);
        }

        // A single point or a one-pixel-wide stroke still yields a 1x1 box.
        Self::new(
            min_x.min(width.saturating_sub(1)),
            min_y.min(height.saturating_sub(1)),
            (max_x - min_x).max(1),
            (max_y - min_y).max(1),
            width,
            height,
        )
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> u32 {
        self.x + self.w
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }
}

impl std::fmt::Display for PixelBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x={} y={} w={} h={}", self.x, self.y, self.w, self.h)
    }
}
