//! # Quotebook Testkit
//!
//! Test utilities for Quotebook.
//!
//! This crate provides:
//! - Temporary data directories and seeded repositories
//! - A store whose writes can be made to fail on demand
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quotebook_testkit::prelude::*;
//!
//! #[test]
//! fn test_with_repository() {
//!     let repo = memory_repository(&[("A", "X")]);
//!     assert_eq!(repo.len(), 1);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
