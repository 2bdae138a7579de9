//! Layer 1: Primitives
//!
//! # Purpose
//!
//! This layer provides the value objects and basic utilities used throughout
//! the crate. It has zero internal dependencies within the crate.
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
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives ← You are here
//! ```

/// Shared error types.
pub mod errors;

/// Time series value object and detection windows.
pub mod series;

/// Windowing logic.
pub mod window;

/// Finite-value masks and data quality counts.
pub mod validity;
