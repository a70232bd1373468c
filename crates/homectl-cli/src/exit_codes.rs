//! Standard exit codes for CLI operations
//!
//! Usage errors are reported by clap itself and exit with 2.

/// Success - every service and resource succeeded
pub const SUCCESS: u8 = 0;

/// At least one resource, service or dependency failed
pub const OPERATION_FAILED: u8 = 3;

/// Template error - the resource template could not be loaded
pub const TEMPLATE_ERROR: u8 = 4;

/// Configuration error - invalid or missing configuration file
pub const CONFIG_ERROR: u8 = 5;
