//! Strength and movement-quality scoring.
//!
//! ## Explosive power
//!
//! P = min(1, (h / max(t, ε)) / D)
//!
//! Where h is the jump height, t the takeoff duration and D the configured
//! power divisor. D is tied to the scale of the input coordinates.
//!
//! ## Core strength: bilateral symmetry
//!
//! sym = 1 / (1 + mean(|l − r| / max(l, r)))
//!
//! averaged over the knee and hip joints, using frames where both sides of
//! the joint are known.
//!
//! ## Coordination: angular smoothness
//!
//! smooth = 1 / (1 + mean(|Δ²θ|))
//!
//! per side, averaged over sides and then over the knee and hip joints.

use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;
use crate::metrics::JumpMetrics;
use crate::trajectory::JointAngles;

/// Fewest angle samples a second difference can be taken over
pub const MIN_SMOOTHNESS_SAMPLES: usize = 3;

/// Normalized strength and quality scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrengthAssessment {
    /// Height over takeoff time, clamped to [0, 1]
    pub explosive_power: f64,
    /// Left/right symmetry of knee and hip angles [0, 1]
    pub core_strength: f64,
    /// Smoothness of knee and hip angle changes [0, 1]
    pub coordination: f64,
    /// Mean of the three scores
    pub overall_score: f64,
}

impl StrengthAssessment {
    pub fn assess(
        knee_angles: &[Option<JointAngles>],
        hip_angles: &[Option<JointAngles>],
        metrics: &JumpMetrics,
        config: &ScoringConfig,
    ) -> Self {
        let explosive_power = explosive_power(metrics, config);
        let core_strength = core_strength(knee_angles, hip_angles);
        let coordination = coordination(knee_angles, hip_angles, config.min_smoothness_samples);

        let assessment = Self {
            explosive_power,
            core_strength,
            coordination,
            overall_score: (explosive_power + core_strength + coordination) / 3.0,
        };

        tracing::debug!(
            explosive_power,
            core_strength,
            coordination,
            overall = assessment.overall_score,
            "Scored jump"
        );

        assessment
    }

    pub fn rating(&self) -> &'static str {
        if self.overall_score > 0.8 {
            "Excellent - powerful, balanced and fluid"
        } else if self.overall_score > 0.6 {
            "Good - solid technique with minor imbalances"
        } else if self.overall_score > 0.4 {
            "Fair - noticeable asymmetry or jerky movement"
        } else if self.overall_score > 0.2 {
            "Weak - limited power and control"
        } else {
            "Poor - insufficient power or unreliable data"
        }
    }
}

/// Jump height per second of takeoff, normalized by the power divisor.
///
/// A backwards takeoff (negative duration) scores 0.0.
pub fn explosive_power(metrics: &JumpMetrics, config: &ScoringConfig) -> f64 {
    if metrics.takeoff_duration < 0.0 {
        return 0.0;
    }
    let duration = metrics.takeoff_duration.max(config.duration_epsilon);
    let power = (metrics.jump_height / duration).max(0.0);
    (power / config.power_divisor).min(1.0)
}

/// Mean of knee and hip symmetry; 0.0 when either joint never has both sides
pub fn core_strength(
    knee_angles: &[Option<JointAngles>],
    hip_angles: &[Option<JointAngles>],
) -> f64 {
    let knees = paired(knee_angles);
    let hips = paired(hip_angles);
    if knees.is_empty() || hips.is_empty() {
        return 0.0;
    }
    (symmetry(&knees) + symmetry(&hips)) / 2.0
}

/// Mean of knee and hip smoothness; 0.0 when either joint has too few samples
pub fn coordination(
    knee_angles: &[Option<JointAngles>],
    hip_angles: &[Option<JointAngles>],
    min_samples: usize,
) -> f64 {
    let knees = paired(knee_angles);
    let hips = paired(hip_angles);
    let min_samples = min_samples.max(MIN_SMOOTHNESS_SAMPLES);
    if knees.len() < min_samples || hips.len() < min_samples {
        return 0.0;
    }
    (joint_smoothness(&knees) + joint_smoothness(&hips)) / 2.0
}

/// Symmetry score of left/right pairs
pub fn symmetry(pairs: &[(f64, f64)]) -> f64 {
    let asymmetries: Vec<f64> = pairs
        .iter()
        .filter_map(|&(l, r)| {
            let larger = l.max(r);
            (larger > 0.0).then(|| (l - r).abs() / larger)
        })
        .collect();

    if asymmetries.is_empty() {
        return 0.0;
    }

    let mean = asymmetries.iter().sum::<f64>() / asymmetries.len() as f64;
    1.0 / (1.0 + mean)
}

/// Smoothness of a single angle sequence; 0.0 with fewer than three samples
pub fn angle_smoothness(angles: &[f64]) -> f64 {
    if angles.len() < MIN_SMOOTHNESS_SAMPLES {
        return 0.0;
    }

    let second_diffs: Vec<f64> = angles
        .windows(3)
        .map(|w| (w[2] - 2.0 * w[1] + w[0]).abs())
        .collect();

    let mean = second_diffs.iter().sum::<f64>() / second_diffs.len() as f64;
    1.0 / (1.0 + mean)
}

fn joint_smoothness(pairs: &[(f64, f64)]) -> f64 {
    let left: Vec<f64> = pairs.iter().map(|p| p.0).collect();
    let right: Vec<f64> = pairs.iter().map(|p| p.1).collect();
    (angle_smoothness(&left) + angle_smoothness(&right)) / 2.0
}

/// Frames where both sides of the joint are defined, in frame order
fn paired(angles: &[Option<JointAngles>]) -> Vec<(f64, f64)> {
    angles.iter().flatten().filter_map(JointAngles::both).collect()
}
