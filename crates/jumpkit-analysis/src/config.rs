//! Analyzer configuration.
//!
//! Every section falls back to its defaults, so a config file only needs to
//! name the values it overrides.

use jumpkit_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::metrics::MIN_METRIC_POINTS;
use crate::segmentation::MIN_SEGMENTATION_POINTS;
use crate::strength::MIN_SMOOTHNESS_SAMPLES;

/// Complete analyzer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Landmark filtering during series extraction
    pub extraction: ExtractionConfig,

    /// Phase segmentation
    pub segmentation: SegmentationConfig,

    /// Metric calculation
    pub metrics: MetricsConfig,

    /// Strength and quality scoring
    pub scoring: ScoringConfig,

    /// Pixel / centimetre conversion
    pub scale: ScaleConfig,

    /// Frame sampling for the video collaborator
    pub sampling: SamplingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Landmarks below this visibility are treated as absent
    pub min_visibility: f64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_visibility: 0.0,
        }
    }
}

/// What to do when the highest body position comes after the lowest one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtremaOrderPolicy {
    /// Fail the segmentation with `Error::AmbiguousSegmentation`
    #[default]
    Reject,
    /// Emit the contiguous phases anyway; the takeoff phase runs backwards
    /// and its duration is negative
    Permissive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Minimum valid body-center points, never below 3
    pub min_points: usize,

    /// Smoothing is applied only with at least this many points
    pub smoothing_min_points: usize,

    /// Savitzky-Golay window length (odd)
    pub smoothing_window: usize,

    /// Savitzky-Golay polynomial order
    pub smoothing_order: usize,

    pub extrema_order: ExtremaOrderPolicy,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            min_points: 3,
            smoothing_min_points: 6,
            smoothing_window: 5,
            smoothing_order: 2,
            extrema_order: ExtremaOrderPolicy::Reject,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Minimum valid body-center points, never below 2
    pub min_points: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { min_points: 2 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Raw power (height / second) that maps to an explosive-power score of 1.0
    pub power_divisor: f64,

    /// Lower bound on the takeoff duration used as a divisor (seconds)
    pub duration_epsilon: f64,

    /// Minimum frames with both sides defined for a smoothness score, never below 3
    pub min_smoothness_samples: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            power_divisor: 100.0,
            duration_epsilon: 1e-6,
            min_smoothness_samples: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    /// Fraction of the frame height the subject's body is assumed to span
    pub body_height_fraction: f64,

    /// Assumed real body height (cm)
    pub reference_height_cm: f64,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            body_height_fraction: 0.7,
            reference_height_cm: 170.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Clips shorter than this (seconds) are sampled densely
    pub short_clip_secs: f64,

    /// Frames per second kept from short clips
    pub short_clip_rate: f64,

    /// Frames per second kept from longer clips
    pub long_clip_rate: f64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            short_clip_secs: 4.0,
            short_clip_rate: 4.0,
            long_clip_rate: 2.0,
        }
    }
}

impl AnalyzerConfig {
    /// Load configuration from file, with environment overrides
    pub fn from_file(path: &str) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::with_name(path))
            .add_source(environment())
            .build()?;

        let parsed: Self = settings.try_deserialize()?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Load from environment variables
    pub fn from_env() -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(environment())
            .build()?;

        let parsed: Self = settings.try_deserialize()?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Check value ranges the analyzer relies on
    pub fn validate(&self) -> Result<()> {
        let seg = &self.segmentation;
        if seg.smoothing_window % 2 == 0 || seg.smoothing_window <= seg.smoothing_order {
            return Err(Error::Config(format!(
                "smoothing window {} must be odd and larger than order {}",
                seg.smoothing_window, seg.smoothing_order
            )));
        }
        if seg.min_points < MIN_SEGMENTATION_POINTS {
            return Err(Error::Config(format!(
                "segmentation.min_points {} below {MIN_SEGMENTATION_POINTS}",
                seg.min_points
            )));
        }
        if self.metrics.min_points < MIN_METRIC_POINTS {
            return Err(Error::Config(format!(
                "metrics.min_points {} below {MIN_METRIC_POINTS}",
                self.metrics.min_points
            )));
        }
        if self.scoring.min_smoothness_samples < MIN_SMOOTHNESS_SAMPLES {
            return Err(Error::Config(format!(
                "scoring.min_smoothness_samples {} below {MIN_SMOOTHNESS_SAMPLES}",
                self.scoring.min_smoothness_samples
            )));
        }
        if !(0.0..=1.0).contains(&self.extraction.min_visibility) {
            return Err(Error::Config(format!(
                "min_visibility {} outside [0, 1]",
                self.extraction.min_visibility
            )));
        }
        if self.scoring.power_divisor <= 0.0 || self.scoring.duration_epsilon <= 0.0 {
            return Err(Error::Config(
                "power_divisor and duration_epsilon must be positive".into(),
            ));
        }
        if self.scale.body_height_fraction <= 0.0 || self.scale.reference_height_cm <= 0.0 {
            return Err(Error::Config("scale factors must be positive".into()));
        }
        let s = &self.sampling;
        if s.short_clip_rate <= 0.0 || s.long_clip_rate <= 0.0 {
            return Err(Error::Config("sampling rates must be positive".into()));
        }
        Ok(())
    }
}

/// `JUMPKIT_<SECTION>__<FIELD>`, e.g. `JUMPKIT_SCORING__POWER_DIVISOR=2.5`
fn environment() -> ::config::Environment {
    ::config::Environment::with_prefix("JUMPKIT")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
