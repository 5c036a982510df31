//! Jump phase segmentation.
//!
//! The body-center vertical trajectory is smoothed and its two global
//! extrema split the sequence into three contiguous phases:
//!
//! ```text
//! preparation = [first valid frame, min-y frame]
//! takeoff     = [min-y frame,       max-y frame]
//! landing     = [max-y frame,       last valid frame]
//! ```
//!
//! Image coordinates grow downwards, so the min-y frame is where the body is
//! visually highest and the max-y frame where it is visually lowest. Phases
//! are assigned by frame position only, and neighbouring phases share their
//! boundary frame.

use std::fmt;

use jumpkit_core::{Error, Point2D, Result};
use serde::{Deserialize, Serialize};

use crate::config::{ExtremaOrderPolicy, SegmentationConfig};
use crate::smoothing::SavitzkyGolayFilter;
use crate::trajectory::valid_centers;

/// Fewest valid body-center points a segmentation can be built from
pub const MIN_SEGMENTATION_POINTS: usize = 3;

/// Phase of a jump, in the only order they can occur
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseLabel {
    Preparation,
    Takeoff,
    Landing,
}

impl PhaseLabel {
    pub const ALL: [PhaseLabel; 3] = [Self::Preparation, Self::Takeoff, Self::Landing];

    /// The phase that follows this one, if any
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Preparation => Some(Self::Takeoff),
            Self::Takeoff => Some(Self::Landing),
            Self::Landing => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Preparation => "Preparation - loading before the jump",
            Self::Takeoff => "Takeoff - between the two vertical extremes",
            Self::Landing => "Landing - from the lowest position to the end",
        }
    }
}

impl fmt::Display for PhaseLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Preparation => "preparation",
            Self::Takeoff => "takeoff",
            Self::Landing => "landing",
        };
        f.write_str(name)
    }
}

/// A labelled span of frames (both ends inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub start_frame: usize,
    pub end_frame: usize,
    pub label: PhaseLabel,
}

impl Phase {
    pub fn new(label: PhaseLabel, start_frame: usize, end_frame: usize) -> Self {
        Self {
            start_frame,
            end_frame,
            label,
        }
    }

    /// Signed frame span; negative when the phase runs backwards
    pub fn frame_span(&self) -> i64 {
        self.end_frame as i64 - self.start_frame as i64
    }

    /// Signed duration in seconds at the given sampling rate
    pub fn duration_secs(&self, fps: f64) -> f64 {
        self.frame_span() as f64 / fps
    }

    pub fn is_reversed(&self) -> bool {
        self.start_frame > self.end_frame
    }

    /// Frames covered by the phase; empty when the phase runs backwards
    pub fn frames(&self) -> std::ops::RangeInclusive<usize> {
        self.start_frame..=self.end_frame
    }

    pub fn contains(&self, frame: usize) -> bool {
        self.frames().contains(&frame)
    }
}

/// Frame order of the two vertical extremes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtremaOrder {
    /// The highest position is reached no later than the lowest
    Canonical,
    /// The highest position comes after the lowest
    Inverted,
}

/// Result of a successful segmentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JumpPhases {
    pub preparation: Phase,
    pub takeoff: Phase,
    pub landing: Phase,
    /// Frame with the smallest smoothed y (visually highest body position)
    pub min_y_frame: usize,
    /// Frame with the largest smoothed y (visually lowest body position)
    pub max_y_frame: usize,
    pub order: ExtremaOrder,
    /// Number of valid body-center points the segmentation used
    pub valid_points: usize,
    /// Whether the vertical series was smoothed before the extrema search
    pub smoothed: bool,
}

impl JumpPhases {
    /// The three phases, in order
    pub fn phases(&self) -> [&Phase; 3] {
        [&self.preparation, &self.takeoff, &self.landing]
    }

    pub fn phase(&self, label: PhaseLabel) -> &Phase {
        match label {
            PhaseLabel::Preparation => &self.preparation,
            PhaseLabel::Takeoff => &self.takeoff,
            PhaseLabel::Landing => &self.landing,
        }
    }

    pub fn first_frame(&self) -> usize {
        self.preparation.start_frame
    }

    pub fn last_frame(&self) -> usize {
        self.landing.end_frame
    }
}

/// Splits a body-center trajectory into preparation, takeoff and landing
#[derive(Debug, Clone)]
pub struct PhaseSegmenter {
    config: SegmentationConfig,
    filter: SavitzkyGolayFilter,
}

impl PhaseSegmenter {
    pub fn new(config: SegmentationConfig) -> Result<Self> {
        if config.min_points < MIN_SEGMENTATION_POINTS {
            return Err(Error::Config(format!(
                "segmentation needs at least {MIN_SEGMENTATION_POINTS} points, configured {}",
                config.min_points
            )));
        }
        let filter = SavitzkyGolayFilter::new(config.smoothing_window, config.smoothing_order)?;
        Ok(Self { config, filter })
    }

    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    pub fn segment(&self, centers: &[Option<Point2D>]) -> Result<JumpPhases> {
        let valid = valid_centers(centers);

        if valid.len() < self.config.min_points {
            tracing::debug!(
                available = valid.len(),
                required = self.config.min_points,
                "Too few body-center points to segment"
            );
            return Err(Error::InsufficientData {
                required: self.config.min_points,
                available: valid.len(),
            });
        }

        let frames: Vec<usize> = valid.iter().map(|(i, _)| *i).collect();
        let raw_y: Vec<f64> = valid.iter().map(|(_, c)| c.y).collect();

        let smoothed = valid.len() >= self.config.smoothing_min_points;
        let y = if smoothed {
            self.filter.filter_signal(&raw_y)
        } else {
            raw_y
        };

        let (min_pos, max_pos) = extrema_positions(&y);
        let min_y_frame = frames[min_pos];
        let max_y_frame = frames[max_pos];
        let first = frames[0];
        let last = frames[frames.len() - 1];

        let order = if min_y_frame > max_y_frame {
            ExtremaOrder::Inverted
        } else {
            ExtremaOrder::Canonical
        };

        tracing::debug!(
            valid_points = valid.len(),
            smoothed,
            min_y_frame,
            max_y_frame,
            ?order,
            "Located vertical extremes"
        );

        if order == ExtremaOrder::Inverted {
            match self.config.extrema_order {
                ExtremaOrderPolicy::Reject => {
                    tracing::warn!(
                        min_y_frame,
                        max_y_frame,
                        "Highest position follows lowest position; rejecting segmentation"
                    );
                    return Err(Error::AmbiguousSegmentation {
                        min_y_frame,
                        max_y_frame,
                    });
                }
                ExtremaOrderPolicy::Permissive => {
                    tracing::warn!(
                        min_y_frame,
                        max_y_frame,
                        "Highest position follows lowest position; takeoff phase runs backwards"
                    );
                }
            }
        }

        Ok(JumpPhases {
            preparation: Phase::new(PhaseLabel::Preparation, first, min_y_frame),
            takeoff: Phase::new(PhaseLabel::Takeoff, min_y_frame, max_y_frame),
            landing: Phase::new(PhaseLabel::Landing, max_y_frame, last),
            min_y_frame,
            max_y_frame,
            order,
            valid_points: valid.len(),
            smoothed,
        })
    }
}

/// Positions of the global minimum and maximum; ties go to the earliest position
fn extrema_positions(values: &[f64]) -> (usize, usize) {
    let mut min_pos = 0;
    let mut max_pos = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v < values[min_pos] {
            min_pos = i;
        }
        if v > values[max_pos] {
            max_pos = i;
        }
    }
    (min_pos, max_pos)
}
