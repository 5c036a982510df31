//! Per-frame series extraction from a pose sequence.
//!
//! Every series keeps one slot per input frame so that frame indices line up
//! across series; a frame that cannot produce a value contributes `None`.

use jumpkit_core::{body_center, shoulder_tilt, Joint, Point2D, Pose, Side};
use serde::{Deserialize, Serialize};

use crate::config::ExtractionConfig;

/// Left/right angle pair for one joint in one frame (degrees)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JointAngles {
    pub left: Option<f64>,
    pub right: Option<f64>,
}

impl JointAngles {
    pub fn new(left: Option<f64>, right: Option<f64>) -> Self {
        Self { left, right }
    }

    pub fn from_pose(pose: &Pose, joint: Joint, min_visibility: f64) -> Self {
        Self {
            left: joint.angle(pose, Side::Left, min_visibility),
            right: joint.angle(pose, Side::Right, min_visibility),
        }
    }

    pub fn side(&self, side: Side) -> Option<f64> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Both sides, if both are defined
    pub fn both(&self) -> Option<(f64, f64)> {
        Some((self.left?, self.right?))
    }
}

/// Index-aligned series extracted from a pose sequence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectories {
    pub body_centers: Vec<Option<Point2D>>,
    pub knee_angles: Vec<Option<JointAngles>>,
    pub hip_angles: Vec<Option<JointAngles>>,
    /// Shoulder tilt per frame, used by posture analysis
    pub shoulder_tilt: Vec<Option<f64>>,
}

impl Trajectories {
    pub fn extract(poses: &[Option<Pose>], config: &ExtractionConfig) -> Self {
        let min_vis = config.min_visibility;
        let mut series = Self {
            body_centers: Vec::with_capacity(poses.len()),
            knee_angles: Vec::with_capacity(poses.len()),
            hip_angles: Vec::with_capacity(poses.len()),
            shoulder_tilt: Vec::with_capacity(poses.len()),
        };

        for pose in poses {
            match pose {
                Some(pose) => {
                    series.body_centers.push(body_center(pose, min_vis));
                    series
                        .knee_angles
                        .push(Some(JointAngles::from_pose(pose, Joint::Knee, min_vis)));
                    series
                        .hip_angles
                        .push(Some(JointAngles::from_pose(pose, Joint::Hip, min_vis)));
                    series.shoulder_tilt.push(shoulder_tilt(pose, min_vis));
                }
                None => {
                    series.body_centers.push(None);
                    series.knee_angles.push(None);
                    series.hip_angles.push(None);
                    series.shoulder_tilt.push(None);
                }
            }
        }

        series
    }

    /// Number of frames covered
    pub fn len(&self) -> usize {
        self.body_centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body_centers.is_empty()
    }

    /// `(frame_index, center)` for every frame with a body center
    pub fn valid_centers(&self) -> Vec<(usize, Point2D)> {
        valid_centers(&self.body_centers)
    }
}

/// `(frame_index, center)` for every present entry of a body-center series
pub fn valid_centers(centers: &[Option<Point2D>]) -> Vec<(usize, Point2D)> {
    centers
        .iter()
        .enumerate()
        .filter_map(|(i, c)| c.map(|c| (i, c)))
        .collect()
}
