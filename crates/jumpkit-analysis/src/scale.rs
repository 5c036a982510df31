//! Conversion from normalized coordinates to pixels and an approximate
//! real-world jump height.
//!
//! The centimetre figure assumes the subject spans a fixed fraction of the
//! frame height and has a reference body height. It is a rough estimate, not
//! a calibrated measurement.

use jumpkit_core::{Error, Point2D, Result};
use serde::{Deserialize, Serialize};

use crate::config::ScaleConfig;

/// Dimensions of the source video frame (pixels)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidInput(format!(
                "frame size must be non-zero, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Normalized point to pixel coordinates
    pub fn to_pixels(&self, point: &Point2D) -> Point2D {
        Point2D::new(point.x * self.width as f64, point.y * self.height as f64)
    }

    /// Convert a whole body-center series, keeping missing slots
    pub fn series_to_pixels(&self, centers: &[Option<Point2D>]) -> Vec<Option<Point2D>> {
        centers.iter().map(|c| c.map(|c| self.to_pixels(&c))).collect()
    }
}

/// Jump height in pixels and an approximate centimetre equivalent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeightEstimate {
    pub pixels: f64,
    pub pixels_per_cm: f64,
    pub centimetres: f64,
}

impl HeightEstimate {
    /// Estimate from a jump height in normalized vertical units
    pub fn from_normalized(jump_height: f64, frame: FrameSize, config: &ScaleConfig) -> Self {
        Self::from_pixels(jump_height * frame.height as f64, frame, config)
    }

    pub fn from_pixels(pixels: f64, frame: FrameSize, config: &ScaleConfig) -> Self {
        let body_pixels = frame.height as f64 * config.body_height_fraction;
        let pixels_per_cm = body_pixels / config.reference_height_cm;
        Self {
            pixels,
            pixels_per_cm,
            centimetres: pixels / pixels_per_cm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_size_validation() {
        assert!(FrameSize::new(0, 720).is_err());
        assert!(FrameSize::new(1280, 720).is_ok());
    }

    #[test]
    fn test_to_pixels() {
        let frame = FrameSize::new(720, 1280).unwrap();
        let p = frame.to_pixels(&Point2D::new(0.5, 0.25));
        assert_eq!(p, Point2D::new(360.0, 320.0));

        let series = frame.series_to_pixels(&[None, Some(Point2D::new(1.0, 1.0))]);
        assert_eq!(series, vec![None, Some(Point2D::new(720.0, 1280.0))]);
    }

    #[test]
    fn test_height_estimate() {
        let frame = FrameSize::new(720, 1000).unwrap();
        let estimate = HeightEstimate::from_normalized(0.1, frame, &ScaleConfig::default());

        // 1000 px * 0.7 / 170 cm
        assert!((estimate.pixels - 100.0).abs() < 1e-9);
        assert!((estimate.pixels_per_cm - 700.0 / 170.0).abs() < 1e-12);
        assert!((estimate.centimetres - 100.0 * 170.0 / 700.0).abs() < 1e-9);
    }
}
