//! Region-selection strategies for manual mode.
//!
//! Drag-rectangle, quick presets, and freehand painting are all the same
//! capability -- "produce one pixel box for the current frame" -- exposed
//! through different input modalities. Each variant resolves to a
//! validated [`PixelBox`] for the loaded video's resolution.

use std::str::FromStr;

use demark_models::{ModelError, ModelResult, PixelBox};

/// Preset region size as a fraction of the frame.
const PRESET_WIDTH_FRAC: f64 = 0.20;
const PRESET_HEIGHT_FRAC: f64 = 0.10;
/// Preset inset from the frame edges.
const PRESET_MARGIN_FRAC: f64 = 0.02;

/// Quick-preset corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CornerPreset {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl FromStr for CornerPreset {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "top-left" => Ok(Self::TopLeft),
            "top-right" => Ok(Self::TopRight),
            "bottom-left" => Ok(Self::BottomLeft),
            "bottom-right" => Ok(Self::BottomRight),
            other => Err(ModelError::UnknownMethod(format!("preset {other}"))),
        }
    }
}

/// One way of producing a manual region.
#[derive(Debug, Clone)]
pub enum RegionSelection {
    /// Explicit pixel coordinates (drag-rectangle equivalent).
    Coords { x: u32, y: u32, w: u32, h: u32 },
    /// A corner preset position.
    Preset(CornerPreset),
    /// An arbitrary painted point set, reduced to its bounding box.
    Points(Vec<(u32, u32)>),
}

impl RegionSelection {
    /// Resolve to a validated box for a `width`x`height` frame.
    pub fn resolve(&self, width: u32, height: u32) -> ModelResult<PixelBox> {
        match self {
            RegionSelection::Coords { x, y, w, h } => {
                PixelBox::new(*x, *y, *w, *h, width, height)
            }
            RegionSelection::Preset(corner) => preset_box(*corner, width, height),
            RegionSelection::Points(points) => {
                PixelBox::bounding(points.iter().copied(), width, height)
            }
        }
    }
}

fn preset_box(corner: CornerPreset, width: u32, height: u32) -> ModelResult<PixelBox> {
    let w = ((width as f64 * PRESET_WIDTH_FRAC).round() as u32).max(1);
    let h = ((height as f64 * PRESET_HEIGHT_FRAC).round() as u32).max(1);
    let margin_x = (width as f64 * PRESET_MARGIN_FRAC).round() as u32;
    let margin_y = (height as f64 * PRESET_MARGIN_FRAC).round() as u32;

    let (x, y) = match corner {
        CornerPreset::TopLeft => (margin_x, margin_y),
        CornerPreset::TopRight => (width.saturating_sub(w + margin_x), margin_y),
        CornerPreset::BottomLeft => (margin_x, height.saturating_sub(h + margin_y)),
        CornerPreset::BottomRight => (
            width.saturating_sub(w + margin_x),
            height.saturating_sub(h + margin_y),
        ),
    };

    PixelBox::new(x, y, w, h, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coords_validated() {
        let selection = RegionSelection::Coords { x: 10, y: 10, w: 100, h: 50 };
        assert!(selection.resolve(1920, 1080).is_ok());

        let selection = RegionSelection::Coords { x: 1900, y: 10, w: 100, h: 50 };
        assert!(selection.resolve(1920, 1080).is_err());
    }

    #[test]
    fn test_presets_stay_in_frame() {
        for corner in [
            CornerPreset::TopLeft,
            CornerPreset::TopRight,
            CornerPreset::BottomLeft,
            CornerPreset::BottomRight,
        ] {
            let b = RegionSelection::Preset(corner).resolve(1920, 1080).unwrap();
            assert!(b.right() <= 1920);
            assert!(b.bottom() <= 1080);
        }
    }

    #[test]
    fn test_bottom_right_preset_is_bottom_right() {
        let b = RegionSelection::Preset(CornerPreset::BottomRight)
            .resolve(1920, 1080)
            .unwrap();
        assert!(b.x > 960);
        assert!(b.y > 540);
    }

    #[test]
    fn test_points_reduce_to_bounding_box() {
        let selection = RegionSelection::Points(vec![(100, 200), (150, 210), (120, 260)]);
        let b = selection.resolve(1920, 1080).unwrap();
        assert_eq!((b.x, b.y, b.w, b.h), (100, 200, 50, 60));
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!("bottom-right".parse::<CornerPreset>().unwrap(), CornerPreset::BottomRight);
        assert_eq!("TOP_LEFT".parse::<CornerPreset>().unwrap(), CornerPreset::TopLeft);
        assert!("middle".parse::<CornerPreset>().is_err());
    }
}
