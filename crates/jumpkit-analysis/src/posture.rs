//! Per-phase posture summary: mean joint angles, shoulder alignment and
//! positional stability.
//!
//! ## Stability
//!
//! S = 1 / (1 + √(σx² + σy²))
//!
//! Where σ is the population standard deviation of the body-center
//! coordinates observed inside the phase. S is 1 for a motionless body and
//! falls towards 0 as the center wanders.

use jumpkit_core::Point2D;
use serde::{Deserialize, Serialize};

use crate::segmentation::{JumpPhases, Phase};
use crate::trajectory::{JointAngles, Trajectories};

/// Posture summary for one phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhasePosture {
    /// Mean left knee angle (degrees), if any frame defines it
    pub avg_knee_angle: Option<f64>,
    /// Mean left hip angle (degrees), if any frame defines it
    pub avg_hip_angle: Option<f64>,
    /// Mean vertical offset between the shoulders
    pub shoulder_alignment: Option<f64>,
    /// Stability score (0, 1]; 0.0 with fewer than two body-center points
    pub stability_score: f64,
}

impl PhasePosture {
    pub fn from_phase(series: &Trajectories, phase: &Phase) -> Self {
        let frames = phase.frames();
        let slice = |len: usize| frames.clone().filter(move |&i| i < len);

        let knee = slice(series.knee_angles.len())
            .filter_map(|i| series.knee_angles[i].and_then(|a: JointAngles| a.left));
        let hip = slice(series.hip_angles.len())
            .filter_map(|i| series.hip_angles[i].and_then(|a: JointAngles| a.left));
        let tilt = slice(series.shoulder_tilt.len()).filter_map(|i| series.shoulder_tilt[i]);
        let centers: Vec<Point2D> = slice(series.body_centers.len())
            .filter_map(|i| series.body_centers[i])
            .collect();

        Self {
            avg_knee_angle: mean(knee),
            avg_hip_angle: mean(hip),
            shoulder_alignment: mean(tilt),
            stability_score: stability_score(&centers),
        }
    }

    pub fn description(&self) -> &'static str {
        if self.stability_score > 0.95 {
            "Very Stable - body center barely moves"
        } else if self.stability_score > 0.85 {
            "Stable - controlled movement"
        } else if self.stability_score > 0.7 {
            "Moderately Stable - noticeable sway"
        } else if self.stability_score > 0.0 {
            "Unstable - large body-center excursions"
        } else {
            "Unknown - not enough data"
        }
    }
}

/// Posture summaries for all three phases
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PostureAnalysis {
    pub preparation: PhasePosture,
    pub takeoff: PhasePosture,
    pub landing: PhasePosture,
}

impl PostureAnalysis {
    pub fn analyze(series: &Trajectories, phases: &JumpPhases) -> Self {
        let analysis = Self {
            preparation: PhasePosture::from_phase(series, &phases.preparation),
            takeoff: PhasePosture::from_phase(series, &phases.takeoff),
            landing: PhasePosture::from_phase(series, &phases.landing),
        };

        tracing::debug!(
            preparation = analysis.preparation.stability_score,
            takeoff = analysis.takeoff.stability_score,
            landing = analysis.landing.stability_score,
            "Computed phase stability"
        );

        analysis
    }

    /// Mean stability across the three phases
    pub fn mean_stability(&self) -> f64 {
        (self.preparation.stability_score
            + self.takeoff.stability_score
            + self.landing.stability_score)
            / 3.0
    }
}

/// Stability of a set of body-center positions
pub fn stability_score(centers: &[Point2D]) -> f64 {
    if centers.len() < 2 {
        return 0.0;
    }

    let xs: Vec<f64> = centers.iter().map(|c| c.x).collect();
    let ys: Vec<f64> = centers.iter().map(|c| c.y).collect();
    let spread = (population_variance(&xs) + population_variance(&ys)).sqrt();

    1.0 / (1.0 + spread)
}

fn population_variance(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmentation::PhaseLabel;

    fn series_with(
        centers: Vec<Option<Point2D>>,
        knees: Vec<Option<JointAngles>>,
    ) -> Trajectories {
        let n = centers.len();
        Trajectories {
            body_centers: centers,
            knee_angles: knees,
            hip_angles: vec![Some(JointAngles::new(Some(160.0), Some(150.0))); n],
            shoulder_tilt: vec![Some(0.02); n],
        }
    }

    #[test]
    fn test_stability_bounds() {
        assert_eq!(stability_score(&[]), 0.0);
        assert_eq!(stability_score(&[Point2D::new(0.5, 0.5)]), 0.0);

        let still = vec![Point2D::new(0.5, 0.5); 4];
        assert!((stability_score(&still) - 1.0).abs() < 1e-12);

        // σx = 0, σy = 0.1
        let moving = vec![Point2D::new(0.5, 0.4), Point2D::new(0.5, 0.6)];
        assert!((stability_score(&moving) - 1.0 / 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_phase_means_skip_missing() {
        let centers = vec![
            Some(Point2D::new(0.5, 0.5)),
            None,
            Some(Point2D::new(0.5, 0.5)),
            Some(Point2D::new(0.5, 0.9)),
        ];
        let knees = vec![
            Some(JointAngles::new(Some(100.0), Some(90.0))),
            None,
            Some(JointAngles::new(None, Some(95.0))),
            Some(JointAngles::new(Some(140.0), None)),
        ];
        let series = series_with(centers, knees);

        let phase = Phase::new(PhaseLabel::Preparation, 0, 2);
        let posture = PhasePosture::from_phase(&series, &phase);
        assert_eq!(posture.avg_knee_angle, Some(100.0));
        assert_eq!(posture.avg_hip_angle, Some(160.0));
        assert!((posture.shoulder_alignment.unwrap() - 0.02).abs() < 1e-12);
        assert!((posture.stability_score - 1.0).abs() < 1e-12);

        let whole = Phase::new(PhaseLabel::Preparation, 0, 3);
        let posture = PhasePosture::from_phase(&series, &whole);
        assert_eq!(posture.avg_knee_angle, Some(120.0));
        assert!(posture.stability_score < 1.0);
    }

    #[test]
    fn test_mean_stability_and_description() {
        let series = series_with(
            vec![
                Some(Point2D::new(0.5, 0.5)),
                Some(Point2D::new(0.5, 0.5)),
                Some(Point2D::new(0.5, 0.9)),
            ],
            vec![None; 3],
        );
        let posture = |label, start, end| {
            PhasePosture::from_phase(&series, &Phase::new(label, start, end))
        };
        let still = posture(PhaseLabel::Preparation, 0, 1);
        let moving = posture(PhaseLabel::Takeoff, 1, 2);
        let single = posture(PhaseLabel::Landing, 2, 2);

        assert_eq!(still.description(), "Very Stable - body center barely moves");
        // σy = 0.2 -> 1 / 1.2
        assert_eq!(moving.description(), "Moderately Stable - noticeable sway");
        assert_eq!(single.description(), "Unknown - not enough data");

        let analysis = PostureAnalysis {
            preparation: still,
            takeoff: moving,
            landing: single,
        };
        let expected = (1.0 + 1.0 / 1.2 + 0.0) / 3.0;
        assert!((analysis.mean_stability() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_no_angles_in_phase() {
        let series = series_with(
            vec![Some(Point2D::new(0.5, 0.5)); 3],
            vec![Some(JointAngles::default()); 3],
        );
        let posture = PhasePosture::from_phase(&series, &Phase::new(PhaseLabel::Landing, 1, 2));
        assert_eq!(posture.avg_knee_angle, None);
    }

    #[test]
    fn test_reversed_phase_is_empty() {
        let series = series_with(
            vec![Some(Point2D::new(0.5, 0.5)); 5],
            vec![Some(JointAngles::new(Some(120.0), Some(120.0))); 5],
        );
        let posture = PhasePosture::from_phase(&series, &Phase::new(PhaseLabel::Takeoff, 3, 0));
        assert_eq!(posture.avg_knee_angle, None);
        assert_eq!(posture.shoulder_alignment, None);
        assert_eq!(posture.stability_score, 0.0);
    }

    #[test]
    fn test_phase_beyond_series_is_clipped() {
        let series = series_with(
            vec![Some(Point2D::new(0.5, 0.5)); 2],
            vec![Some(JointAngles::new(Some(120.0), None)); 2],
        );
        let posture = PhasePosture::from_phase(&series, &Phase::new(PhaseLabel::Landing, 0, 10));
        assert_eq!(posture.avg_knee_angle, Some(120.0));
    }
}
