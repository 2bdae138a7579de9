//! Layer 3: Algorithms
//!
//! # Purpose
//!
//! This layer implements the numeric algorithms:
//! - Smoothers used by preprocessing stages
//! - Statistical-family detectors (3-sigma, IQR)
//! - Distance-family detectors (KNN, LOF, DBSCAN)
//!
//! Algorithms receive already-validated, typed parameters and never fail.
//!
//! # Architecture
//!
//! ```text
//! Layer 6: Wire
//!   ↓
//! Layer 5: API
//!   ↓
//! Layer 4: Engine
//!   ↓
//! Layer 3: Algorithms ← You are here
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Moving-average, exponential, and Gaussian smoothing.
pub mod smoothing;

/// Statistical detectors.
pub mod statistical;

/// Distance detectors.
pub mod distance;
