//! Per-frame pose types: landmarks, the keypoint table and resolved points.

use std::fmt;
use std::str::FromStr;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// 33-landmark body model, in the order the pose estimator emits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Keypoint {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl Keypoint {
    pub const COUNT: usize = 33;

    pub const ALL: [Keypoint; Keypoint::COUNT] = [
        Self::Nose,
        Self::LeftEyeInner,
        Self::LeftEye,
        Self::LeftEyeOuter,
        Self::RightEyeInner,
        Self::RightEye,
        Self::RightEyeOuter,
        Self::LeftEar,
        Self::RightEar,
        Self::MouthLeft,
        Self::MouthRight,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftPinky,
        Self::RightPinky,
        Self::LeftIndex,
        Self::RightIndex,
        Self::LeftThumb,
        Self::RightThumb,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
        Self::LeftHeel,
        Self::RightHeel,
        Self::LeftFootIndex,
        Self::RightFootIndex,
    ];

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Snake-case name used by the pose estimator output
    pub fn name(self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEyeInner => "left_eye_inner",
            Self::LeftEye => "left_eye",
            Self::LeftEyeOuter => "left_eye_outer",
            Self::RightEyeInner => "right_eye_inner",
            Self::RightEye => "right_eye",
            Self::RightEyeOuter => "right_eye_outer",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::MouthLeft => "mouth_left",
            Self::MouthRight => "mouth_right",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftPinky => "left_pinky",
            Self::RightPinky => "right_pinky",
            Self::LeftIndex => "left_index",
            Self::RightIndex => "right_index",
            Self::LeftThumb => "left_thumb",
            Self::RightThumb => "right_thumb",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
            Self::LeftHeel => "left_heel",
            Self::RightHeel => "right_heel",
            Self::LeftFootIndex => "left_foot_index",
            Self::RightFootIndex => "right_foot_index",
        }
    }
}

impl fmt::Display for Keypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Keypoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kp| kp.name() == s)
            .ok_or_else(|| Error::InvalidInput(format!("unknown keypoint name: {s}")))
    }
}

/// A single landmark estimate in frame-normalized coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position (0.0 = left edge, 1.0 = right edge)
    pub x: f64,
    /// Vertical position, increasing downwards (0.0 = top edge)
    pub y: f64,
    /// Relative depth, when the estimator provides one
    #[serde(default)]
    pub z: Option<f64>,
    /// Detection confidence [0, 1]
    pub visibility: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, visibility: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            visibility,
        }
    }

    pub fn with_depth(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }

    pub fn point(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }
}

/// Resolved 2-D coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(&self, other: &Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        (self.to_vector() - other.to_vector()).norm()
    }

    pub fn to_vector(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

/// Landmarks of one detected body, index-aligned with [`Keypoint`]. A slot is
/// `None` when the estimator did not report that landmark. A frame without a
/// body is `None` in the surrounding `Option<Pose>` sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub landmarks: Vec<Option<Landmark>>,
}

impl Pose {
    /// Pose from a dense landmark list in estimator order
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self {
            landmarks: landmarks.into_iter().map(Some).collect(),
        }
    }

    /// Pose from a sparse set of keypoints; unlisted keypoints stay absent
    pub fn from_keypoints(points: &[(Keypoint, Landmark)]) -> Self {
        let mut landmarks = vec![None; Keypoint::COUNT];
        for (kp, lm) in points {
            landmarks[kp.index()] = Some(*lm);
        }
        Self { landmarks }
    }

    pub fn landmark(&self, keypoint: Keypoint) -> Option<&Landmark> {
        self.landmarks.get(keypoint.index()).and_then(Option::as_ref)
    }

    /// Coordinates of `keypoint`, or `None` if it was not reported
    pub fn resolve(&self, keypoint: Keypoint) -> Option<Point2D> {
        self.landmark(keypoint).map(Landmark::point)
    }

    /// Like [`Pose::resolve`], but landmarks below `min_visibility` count as absent
    pub fn resolve_visible(&self, keypoint: Keypoint, min_visibility: f64) -> Option<Point2D> {
        self.landmark(keypoint)
            .filter(|lm| lm.visibility >= min_visibility)
            .map(Landmark::point)
    }

    /// Name-based lookup; unknown names resolve to `None`
    pub fn resolve_by_name(&self, name: &str) -> Option<Point2D> {
        name.parse::<Keypoint>().ok().and_then(|kp| self.resolve(kp))
    }

    /// Mean visibility over the reported landmarks
    pub fn average_visibility(&self) -> f64 {
        let (sum, count) = self
            .landmarks
            .iter()
            .flatten()
            .fold((0.0, 0usize), |(sum, n), lm| (sum + lm.visibility, n + 1));
        if count == 0 {
            0.0
        } else {
            sum / count as f64
        }
    }
}
