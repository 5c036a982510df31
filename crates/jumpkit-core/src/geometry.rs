//! Derived body geometry: three-point joint angles, body center, shoulder tilt.

use serde::{Deserialize, Serialize};

use crate::pose::{Keypoint, Point2D, Pose};

/// Vectors shorter than this are treated as zero-length
const MIN_SEGMENT_LENGTH: f64 = 1e-12;

/// Body side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

/// Joints whose flexion angle is tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    /// hip - knee - ankle
    Knee,
    /// shoulder - hip - knee
    Hip,
}

impl Joint {
    /// The (proximal, vertex, distal) landmarks defining this joint's angle
    pub fn landmarks(self, side: Side) -> (Keypoint, Keypoint, Keypoint) {
        match (self, side) {
            (Joint::Knee, Side::Left) => {
                (Keypoint::LeftHip, Keypoint::LeftKnee, Keypoint::LeftAnkle)
            }
            (Joint::Knee, Side::Right) => {
                (Keypoint::RightHip, Keypoint::RightKnee, Keypoint::RightAnkle)
            }
            (Joint::Hip, Side::Left) => {
                (Keypoint::LeftShoulder, Keypoint::LeftHip, Keypoint::LeftKnee)
            }
            (Joint::Hip, Side::Right) => {
                (Keypoint::RightShoulder, Keypoint::RightHip, Keypoint::RightKnee)
            }
        }
    }

    /// Angle of this joint on one side of `pose`, in degrees
    pub fn angle(self, pose: &Pose, side: Side, min_visibility: f64) -> Option<f64> {
        let (a, vertex, b) = self.landmarks(side);
        let p1 = pose.resolve_visible(a, min_visibility)?;
        let v = pose.resolve_visible(vertex, min_visibility)?;
        let p3 = pose.resolve_visible(b, min_visibility)?;
        joint_angle(&p1, &v, &p3)
    }
}

/// Angle at `vertex` between the rays towards `p1` and `p3`, in degrees [0, 180].
///
/// Returns `None` when either ray has zero length.
pub fn joint_angle(p1: &Point2D, vertex: &Point2D, p3: &Point2D) -> Option<f64> {
    let a = p1.to_vector() - vertex.to_vector();
    let b = p3.to_vector() - vertex.to_vector();

    let (norm_a, norm_b) = (a.norm(), b.norm());
    if norm_a < MIN_SEGMENT_LENGTH || norm_b < MIN_SEGMENT_LENGTH {
        return None;
    }

    // Rounding can push the cosine slightly outside [-1, 1]
    let cos = (a.dot(&b) / (norm_a * norm_b)).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

/// Midpoint of the shoulder midpoint and the hip midpoint.
///
/// `None` unless both shoulders and both hips resolve.
pub fn body_center(pose: &Pose, min_visibility: f64) -> Option<Point2D> {
    let left_shoulder = pose.resolve_visible(Keypoint::LeftShoulder, min_visibility)?;
    let right_shoulder = pose.resolve_visible(Keypoint::RightShoulder, min_visibility)?;
    let left_hip = pose.resolve_visible(Keypoint::LeftHip, min_visibility)?;
    let right_hip = pose.resolve_visible(Keypoint::RightHip, min_visibility)?;

    let shoulders = left_shoulder.midpoint(&right_shoulder);
    let hips = left_hip.midpoint(&right_hip);
    Some(shoulders.midpoint(&hips))
}

/// Vertical offset between the two shoulders (0 = level)
pub fn shoulder_tilt(pose: &Pose, min_visibility: f64) -> Option<f64> {
    let left = pose.resolve_visible(Keypoint::LeftShoulder, min_visibility)?;
    let right = pose.resolve_visible(Keypoint::RightShoulder, min_visibility)?;
    Some((left.y - right.y).abs())
}
