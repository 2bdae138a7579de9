//! Layer 4: Engine
//!
//! # Purpose
//!
//! This layer orchestrates preprocessing and detection by coordinating the
//! method registry, the shared validation layer, and the algorithms. It
//! owns the request-level control flow: resolve, validate, execute, assemble.
//!
//! # Architecture
//!
//! ```text
//! Layer 6: Wire
//!   ↓
//! Layer 5: API
//!   ↓
//! Layer 4: Engine ← You are here
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Parameter schemas and method references.
pub mod schema;

/// Validation utilities.
pub mod validator;

/// Engine configuration.
pub mod config;

/// Method catalogue.
pub mod registry;

/// Pipeline execution.
pub mod pipeline;

/// Detection execution.
pub mod detector;

/// Output types for detection.
pub mod output;
