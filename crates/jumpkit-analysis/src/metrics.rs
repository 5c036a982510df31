//! Jump height and phase durations.

use jumpkit_core::{Error, Point2D, Result};
use serde::{Deserialize, Serialize};

use crate::config::MetricsConfig;
use crate::segmentation::JumpPhases;
use crate::trajectory::valid_centers;

/// Fewest valid body-center points metrics are computed from
pub const MIN_METRIC_POINTS: usize = 2;

/// Scalar metrics derived from a segmented jump
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpMetrics {
    /// Vertical distance between the two extremes, in input units
    pub jump_height: f64,
    /// Seconds; negative only when the phase runs backwards
    pub preparation_duration: f64,
    pub takeoff_duration: f64,
    pub landing_duration: f64,
    pub total_duration: f64,
}

impl JumpMetrics {
    /// Compute metrics from the raw body-center series and its segmentation.
    ///
    /// Durations keep their sign; a backwards takeoff phase (permissive
    /// segmentation of an inverted jump) produces a negative duration.
    pub fn compute(
        centers: &[Option<Point2D>],
        phases: &JumpPhases,
        fps: f64,
        config: &MetricsConfig,
    ) -> Result<Self> {
        if !(fps.is_finite() && fps > 0.0) {
            return Err(Error::InvalidInput(format!("fps must be positive, got {fps}")));
        }

        let required = config.min_points.max(MIN_METRIC_POINTS);
        let valid = valid_centers(centers);
        if valid.len() < required {
            return Err(Error::InsufficientData {
                required,
                available: valid.len(),
            });
        }

        let y_at = |frame: usize| centers.get(frame).copied().flatten().map(|c| c.y);
        let jump_height = match (y_at(phases.min_y_frame), y_at(phases.max_y_frame)) {
            (Some(top), Some(bottom)) => (top - bottom).abs(),
            _ => 0.0,
        };

        let preparation_duration = phases.preparation.duration_secs(fps);
        let takeoff_duration = phases.takeoff.duration_secs(fps);
        let landing_duration = phases.landing.duration_secs(fps);

        let metrics = Self {
            jump_height,
            preparation_duration,
            takeoff_duration,
            landing_duration,
            total_duration: preparation_duration + takeoff_duration + landing_duration,
        };

        tracing::debug!(
            jump_height = metrics.jump_height,
            takeoff_duration = metrics.takeoff_duration,
            total_duration = metrics.total_duration,
            "Computed jump metrics"
        );

        Ok(metrics)
    }

    /// Whether every phase duration is non-negative
    pub fn is_forward(&self) -> bool {
        self.preparation_duration >= 0.0
            && self.takeoff_duration >= 0.0
            && self.landing_duration >= 0.0
    }
}
