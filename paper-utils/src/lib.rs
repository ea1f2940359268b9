//! Paper Assembly Utility Functions
//!
//! ## Current API
//!
//! - Resolve blueprints into concrete section specs
//! - Generate papers
//! - Find alternative questions for manual swaps
//! - Validate generated papers
//!
pub mod blueprint;
pub mod error;
pub mod generation;
