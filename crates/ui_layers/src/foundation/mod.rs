//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types for rect layout and depth offsets
//! - Logging utilities

pub mod math;
pub mod logging;
