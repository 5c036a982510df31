//! Frame sampling plan for the video collaborator.
//!
//! The engine only sees the frames that were kept, so its `fps` must be the
//! effective rate of the sampled sequence: `source_fps / frame_step`.

use jumpkit_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::config::SamplingConfig;

/// Which source frames to decode and the rate the kept frames represent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingPlan {
    pub source_fps: f64,
    pub total_frames: usize,
    /// Keep one frame out of every `frame_step`
    pub frame_step: usize,
    /// Rate to pass to the analyzer
    pub effective_fps: f64,
}

impl SamplingPlan {
    /// Plan for a clip; short clips are sampled more densely
    pub fn for_clip(source_fps: f64, total_frames: usize, config: &SamplingConfig) -> Result<Self> {
        if !(source_fps.is_finite() && source_fps > 0.0) {
            return Err(Error::InvalidInput(format!(
                "source fps must be positive, got {source_fps}"
            )));
        }

        let duration_secs = total_frames as f64 / source_fps;
        let rate = if duration_secs < config.short_clip_secs {
            config.short_clip_rate
        } else {
            config.long_clip_rate
        };

        Ok(Self::with_step(source_fps, total_frames, (source_fps / rate).floor() as usize))
    }

    /// Plan with an explicit step (clamped to at least 1)
    pub fn with_step(source_fps: f64, total_frames: usize, frame_step: usize) -> Self {
        let frame_step = frame_step.max(1);
        Self {
            source_fps,
            total_frames,
            frame_step,
            effective_fps: source_fps / frame_step as f64,
        }
    }

    /// Source frame indices to keep, in order
    pub fn frame_indices(&self) -> impl Iterator<Item = usize> {
        (0..self.total_frames).step_by(self.frame_step)
    }

    /// Number of frames the plan keeps
    pub fn sampled_len(&self) -> usize {
        self.total_frames.div_ceil(self.frame_step)
    }

    pub fn duration_secs(&self) -> f64 {
        self.total_frames as f64 / self.source_fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_clip_dense() {
        // 3 s at 30 fps -> 4 frames per second
        let plan = SamplingPlan::for_clip(30.0, 90, &SamplingConfig::default()).unwrap();
        assert_eq!(plan.frame_step, 7);
        assert!((plan.effective_fps - 30.0 / 7.0).abs() < 1e-12);
        assert_eq!(plan.sampled_len(), 13);
        assert_eq!(plan.frame_indices().count(), plan.sampled_len());
        assert!((plan.duration_secs() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_long_clip_sparse() {
        let plan = SamplingPlan::for_clip(30.0, 300, &SamplingConfig::default()).unwrap();
        assert_eq!(plan.frame_step, 15);
        assert!((plan.effective_fps - 2.0).abs() < 1e-12);
        let first: Vec<usize> = plan.frame_indices().take(3).collect();
        assert_eq!(first, vec![0, 15, 30]);
    }

    #[test]
    fn test_low_fps_keeps_every_frame() {
        let plan = SamplingPlan::for_clip(3.0, 6, &SamplingConfig::default()).unwrap();
        assert_eq!(plan.frame_step, 1);
        assert_eq!(plan.effective_fps, 3.0);
    }

    #[test]
    fn test_rejects_bad_fps() {
        assert!(SamplingPlan::for_clip(0.0, 10, &SamplingConfig::default()).is_err());
        assert!(SamplingPlan::for_clip(f64::INFINITY, 10, &SamplingConfig::default()).is_err());
    }
}
