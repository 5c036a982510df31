//! # JumpKit-Analysis
//!
//! Phase segmentation and movement-quality scoring for a vertical jump
//! recorded as a sequence of per-frame pose estimates.
//!
//! ## Pipeline
//!
//! 1. **Trajectories**: body center, knee angles and hip angles per frame
//! 2. **Segmentation**: smoothed vertical extrema split the jump into
//!    preparation, takeoff and landing
//! 3. **Metrics**: jump height and phase durations
//! 4. **Posture**: mean joint angles and stability per phase
//! 5. **Strength**: explosive power, core strength (bilateral symmetry) and
//!    coordination (angular smoothness)
//!
//! ## Data contract
//!
//! - One `Option<Pose>` per sampled frame; `None` when no body was found
//! - `fps` is the rate of the *sampled* sequence (see [`SamplingPlan`])
//! - Missing landmarks degrade individual values to `None` or 0.0; only a
//!   lack of body-center points fails the analysis

pub mod analyzer;
pub mod config;
pub mod metrics;
pub mod posture;
pub mod sampling;
pub mod scale;
pub mod segmentation;
pub mod smoothing;
pub mod strength;
pub mod trajectory;

pub use analyzer::*;
pub use self::config::*;
pub use metrics::*;
pub use posture::*;
pub use sampling::*;
pub use scale::*;
pub use segmentation::*;
pub use smoothing::*;
pub use strength::*;
pub use trajectory::*;
