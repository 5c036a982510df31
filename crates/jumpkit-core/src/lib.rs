//! # JumpKit-Core
//!
//! Core types shared by the JumpKit jump-analysis engine: per-frame pose
//! landmarks, the fixed 33-point keypoint table, derived body geometry and
//! the error taxonomy.
//!
//! Coordinates are frame-normalized with the vertical axis increasing
//! downwards, so a smaller `y` means a visually higher position.

pub mod error;
pub mod geometry;
pub mod pose;

pub use error::{Error, Result};
pub use geometry::*;
pub use pose::*;
