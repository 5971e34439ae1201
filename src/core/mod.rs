//! Core business logic - framework-agnostic clinic operations.
//!
//! Each module groups the commands (writes) and queries (reads) of one record
//! kind. Nothing in here knows about Discord; the bot layer calls these
//! functions and renders their results.

/// Appointment booking, editing, status and payment commands
pub mod appointment;
/// Cash flow ledger queries, expenses and summaries
pub mod cash_flow;
/// Form validation at the presentation boundary
pub mod forms;
/// Insurance registry
pub mod insurance;
/// Patient registry and search
pub mod patient;
/// Professional registry
pub mod professional;
/// Plain-text rendering of schedules and cash reports
pub mod report;
/// Fixed time slots and the per-day schedule grid
pub mod schedule;
/// Startup seeding from config.toml
pub mod seed;
