/// Clinic configuration loading from config.toml
pub mod clinic;

/// Database configuration and connection management
pub mod database;
