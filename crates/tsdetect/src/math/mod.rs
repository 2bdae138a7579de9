//! Layer 2: Math
//!
//! # Purpose
//!
//! This layer provides pure mathematical functions used by the algorithms:
//! - The discrete Gaussian kernel for weighted smoothing
//! - Descriptive statistics (mean, standard deviation, percentiles)
//! - Value-space nearest-neighbour search
//!
//! These are reusable building blocks with no algorithm-specific logic.
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
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math ← You are here
//!   ↓
//! Layer 1: Primitives
//! ```

/// Gaussian kernel weights.
pub mod kernel;

/// Descriptive statistics.
pub mod stats;

/// Nearest-neighbour search in value space.
pub mod neighbors;
