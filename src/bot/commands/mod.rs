//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Daily agenda, booking and appointment commands
pub mod agenda;

/// Cash report and expense commands
pub mod cash;

/// General utility commands
pub mod general;

/// Insurance registry commands
pub mod insurance;

/// Patient registry commands
pub mod patient;

/// Professional registry commands
pub mod professional;

// Export commands
pub use agenda::*;
pub use cash::*;
pub use general::*;
pub use insurance::*;
pub use patient::*;
pub use professional::*;
