//! Complete jump analyzer orchestrating all analysis stages.
//!
//! Stages run in dependency order:
//!
//! ```text
//! poses -> trajectories -> phases -> { metrics, posture } -> strength
//! ```
//!
//! A stage whose input failed carries the upstream error unchanged, so every
//! stage of [`JumpAnalysis`] always has an entry.

use jumpkit_core::{Error, Point2D, Pose, Result};
use serde::{Deserialize, Serialize};

use crate::config::AnalyzerConfig;
use crate::metrics::JumpMetrics;
use crate::posture::PostureAnalysis;
use crate::scale::{FrameSize, HeightEstimate};
use crate::segmentation::{JumpPhases, PhaseSegmenter};
use crate::strength::StrengthAssessment;
use crate::trajectory::{JointAngles, Trajectories};

/// Stateless jump analyzer. Holds configuration only, so one instance can
/// serve any number of independent sequences, from any thread.
#[derive(Debug, Clone)]
pub struct JumpAnalyzer {
    config: AnalyzerConfig,
    segmenter: PhaseSegmenter,
}

impl JumpAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        let segmenter = PhaseSegmenter::new(config.segmentation.clone())?;
        Ok(Self { config, segmenter })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze a pose sequence sampled at `fps` frames per second
    pub fn analyze(&self, poses: &[Option<Pose>], fps: f64) -> JumpAnalysis {
        let series = Trajectories::extract(poses, &self.config.extraction);

        tracing::debug!(
            frames = series.len(),
            valid_centers = series.body_centers.iter().flatten().count(),
            "Extracted trajectories"
        );

        let phases = self.segmenter.segment(&series.body_centers);

        let metrics = phases.as_ref().map_err(Clone::clone).and_then(|phases| {
            JumpMetrics::compute(&series.body_centers, phases, fps, &self.config.metrics)
        });

        let posture = phases
            .as_ref()
            .map(|phases| PostureAnalysis::analyze(&series, phases))
            .map_err(Clone::clone);

        let strength = metrics.as_ref().map_err(Clone::clone).map(|metrics| {
            StrengthAssessment::assess(
                &series.knee_angles,
                &series.hip_angles,
                metrics,
                &self.config.scoring,
            )
        });

        match &strength {
            Ok(assessment) => tracing::info!(
                frames = series.len(),
                overall_score = assessment.overall_score,
                "Jump analysis complete"
            ),
            Err(e) => tracing::warn!(frames = series.len(), error = %e, "Jump analysis incomplete"),
        }

        JumpAnalysis {
            frame_count: series.len(),
            fps: fps.is_finite().then_some(fps),
            phases,
            metrics,
            posture,
            strength,
            height_estimate: None,
            body_centers: series.body_centers,
            knee_angles: series.knee_angles,
            hip_angles: series.hip_angles,
        }
    }

    /// Like [`JumpAnalyzer::analyze`], also estimating the jump height in
    /// pixels and centimetres for the given frame size
    pub fn analyze_with_frame(
        &self,
        poses: &[Option<Pose>],
        fps: f64,
        frame: FrameSize,
    ) -> JumpAnalysis {
        let mut analysis = self.analyze(poses, fps);
        analysis.height_estimate = analysis
            .metrics
            .as_ref()
            .ok()
            .map(|m| HeightEstimate::from_normalized(m.jump_height, frame, &self.config.scale));
        analysis
    }
}

/// Aggregate analysis result. Failed stages hold the error that stopped them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JumpAnalysis {
    pub frame_count: usize,
    /// Sampling rate the sequence was analyzed at; `None` when it was not finite
    pub fps: Option<f64>,
    pub phases: Result<JumpPhases>,
    pub metrics: Result<JumpMetrics>,
    pub posture: Result<PostureAnalysis>,
    pub strength: Result<StrengthAssessment>,
    pub height_estimate: Option<HeightEstimate>,
    pub body_centers: Vec<Option<Point2D>>,
    pub knee_angles: Vec<Option<JointAngles>>,
    pub hip_angles: Vec<Option<JointAngles>>,
}

impl JumpAnalysis {
    /// Whether every stage succeeded
    pub fn is_complete(&self) -> bool {
        self.phases.is_ok() && self.metrics.is_ok() && self.posture.is_ok() && self.strength.is_ok()
    }

    /// The first stage error, if any
    pub fn error(&self) -> Option<&Error> {
        [
            self.phases.as_ref().err(),
            self.metrics.as_ref().err(),
            self.posture.as_ref().err(),
            self.strength.as_ref().err(),
        ]
        .into_iter()
        .flatten()
        .next()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtremaOrderPolicy;
    use crate::segmentation::{ExtremaOrder, Phase, PhaseLabel};
    use jumpkit_core::{Keypoint, Landmark};

    /// Pose whose body center sits at (0.5, `center_y`) with bent knees
    fn pose_at(center_y: f64, knee_bend: f64) -> Pose {
        let lm = |x: f64, y: f64| Landmark::new(x, y, 0.9);
        let shoulder_y = center_y - 0.1;
        let hip_y = center_y + 0.1;
        let knee_y = hip_y + 0.15;
        Pose::from_keypoints(&[
            (Keypoint::LeftShoulder, lm(0.45, shoulder_y)),
            (Keypoint::RightShoulder, lm(0.55, shoulder_y)),
            (Keypoint::LeftHip, lm(0.45, hip_y)),
            (Keypoint::RightHip, lm(0.55, hip_y)),
            (Keypoint::LeftKnee, lm(0.45 + knee_bend, knee_y)),
            (Keypoint::RightKnee, lm(0.55 + knee_bend, knee_y)),
            (Keypoint::LeftAnkle, lm(0.45, knee_y + 0.15)),
            (Keypoint::RightAnkle, lm(0.55, knee_y + 0.15)),
        ])
    }

    fn sequence(ys: &[f64]) -> Vec<Option<Pose>> {
        ys.iter()
            .enumerate()
            .map(|(i, &y)| Some(pose_at(y, 0.01 * i as f64)))
            .collect()
    }

    const CANONICAL: [f64; 8] = [0.70, 0.72, 0.74, 0.50, 0.30, 0.45, 0.60, 0.75];

    fn analyzer() -> JumpAnalyzer {
        JumpAnalyzer::new(AnalyzerConfig::default()).unwrap()
    }

    #[test]
    fn test_full_analysis() {
        let analysis = analyzer().analyze(&sequence(&CANONICAL), 8.0);

        assert!(analysis.is_complete());
        assert_eq!(analysis.frame_count, 8);
        assert_eq!(analysis.fps, Some(8.0));
        assert!(analysis.error().is_none());

        let phases = analysis.phases.as_ref().unwrap();
        assert_eq!(phases.preparation, Phase::new(PhaseLabel::Preparation, 0, 4));
        assert_eq!(phases.takeoff, Phase::new(PhaseLabel::Takeoff, 4, 7));
        assert_eq!(phases.landing, Phase::new(PhaseLabel::Landing, 7, 7));

        let metrics = analysis.metrics.as_ref().unwrap();
        assert!((metrics.jump_height - 0.45).abs() < 1e-9);
        assert!(metrics.is_forward());

        let strength = analysis.strength.as_ref().unwrap();
        for score in [
            strength.explosive_power,
            strength.core_strength,
            strength.coordination,
            strength.overall_score,
        ] {
            assert!((0.0..=1.0).contains(&score));
        }
        // Left and right legs mirror each other exactly
        assert!((strength.core_strength - 1.0).abs() < 1e-9);

        let posture = analysis.posture.as_ref().unwrap();
        assert!(posture.preparation.avg_knee_angle.is_some());
        assert!(posture.landing.stability_score == 0.0);
    }

    #[test]
    fn test_deterministic() {
        let poses = sequence(&CANONICAL);
        let a = analyzer().analyze(&poses, 8.0);
        let b = analyzer().analyze(&poses, 8.0);
        assert_eq!(a, b);
        assert_eq!(a.to_json().unwrap(), b.to_json().unwrap());
    }

    #[test]
    fn test_failure_propagates_unchanged() {
        let poses = vec![Some(pose_at(0.5, 0.0)), None, Some(pose_at(0.4, 0.0)), None];
        let analysis = analyzer().analyze(&poses, 30.0);

        let expected = Error::InsufficientData {
            required: 3,
            available: 2,
        };
        assert!(!analysis.is_complete());
        assert_eq!(analysis.phases, Err(expected.clone()));
        assert_eq!(analysis.metrics, Err(expected.clone()));
        assert_eq!(analysis.posture, Err(expected.clone()));
        assert_eq!(analysis.strength, Err(expected.clone()));
        assert_eq!(analysis.error(), Some(&expected));
        // Raw series are still reported
        assert_eq!(analysis.body_centers.len(), 4);
    }

    #[test]
    fn test_bad_fps_fails_metrics_only() {
        let analysis = analyzer().analyze(&sequence(&CANONICAL), 0.0);
        assert!(analysis.phases.is_ok());
        assert!(analysis.posture.is_ok());
        assert!(matches!(analysis.metrics, Err(Error::InvalidInput(_))));
        assert_eq!(analysis.strength.as_ref().err(), analysis.metrics.as_ref().err());
        assert_eq!(analysis.fps, Some(0.0));
    }

    #[test]
    fn test_non_finite_fps_survives_json() {
        for fps in [f64::NAN, f64::INFINITY] {
            let analysis = analyzer().analyze(&sequence(&CANONICAL), fps);
            assert_eq!(analysis.fps, None);
            assert!(matches!(analysis.metrics, Err(Error::InvalidInput(_))));

            let back: JumpAnalysis = serde_json::from_str(&analysis.to_json().unwrap()).unwrap();
            assert_eq!(back.fps, None);
            assert_eq!(back.phases, analysis.phases);
            assert_eq!(back.metrics, analysis.metrics);
        }
    }

    #[test]
    fn test_inverted_jump_policies() {
        let poses = sequence(&[0.70, 0.75, 0.60, 0.40, 0.55, 0.70]);

        let strict = analyzer().analyze(&poses, 10.0);
        assert_eq!(
            strict.phases,
            Err(Error::AmbiguousSegmentation {
                min_y_frame: 3,
                max_y_frame: 0
            })
        );
        assert!(strict.strength.is_err());

        let mut config = AnalyzerConfig::default();
        config.segmentation.extrema_order = ExtremaOrderPolicy::Permissive;
        let lenient = JumpAnalyzer::new(config).unwrap().analyze(&poses, 10.0);
        assert!(lenient.is_complete());
        assert_eq!(lenient.phases.as_ref().unwrap().order, ExtremaOrder::Inverted);
        assert!(lenient.metrics.as_ref().unwrap().takeoff_duration < 0.0);
        // A backwards takeoff earns no power
        assert_eq!(lenient.strength.as_ref().unwrap().explosive_power, 0.0);
        assert_eq!(lenient.posture.as_ref().unwrap().takeoff.stability_score, 0.0);
    }

    #[test]
    fn test_every_third_frame_absent() {
        let mut values = CANONICAL.iter();
        let poses: Vec<Option<Pose>> = (0..12)
            .map(|i| {
                if i % 3 == 2 {
                    None
                } else {
                    values.next().map(|&y| pose_at(y, 0.0))
                }
            })
            .collect();

        let analysis = analyzer().analyze(&poses, 8.0);
        let phases = analysis.phases.as_ref().unwrap();
        assert_eq!(phases.first_frame(), 0);
        assert_eq!(phases.min_y_frame, 6);
        assert_eq!(phases.max_y_frame, 10);
        assert_eq!(phases.last_frame(), 10);
        assert!((analysis.metrics.as_ref().unwrap().takeoff_duration - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_height_estimate() {
        let frame = FrameSize::new(720, 1280).unwrap();
        let analysis = analyzer().analyze_with_frame(&sequence(&CANONICAL), 8.0, frame);
        let estimate = analysis.height_estimate.unwrap();
        assert!((estimate.pixels - 0.45 * 1280.0).abs() < 1e-6);

        let failed = analyzer().analyze_with_frame(&[None, None], 8.0, frame);
        assert!(failed.height_estimate.is_none());
    }

    #[test]
    fn test_json_roundtrip_keeps_errors() {
        let analysis = analyzer().analyze(&[None, None, None], 8.0);
        let json = analysis.to_json().unwrap();
        let back: JumpAnalysis = serde_json::from_str(&json).unwrap();
        assert_eq!(back, analysis);
    }

    #[test]
    fn test_analyzer_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<JumpAnalyzer>();
    }
}
