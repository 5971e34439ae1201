//! Discord interaction handlers
//!
//! This module provides handlers for Discord interactions such as autocomplete.

/// Autocomplete handlers for professional, patient, insurance and time slot names
pub mod autocomplete;
