//! Resilience helpers for the hyperkit VM driver.
//!
//! The [`driver`] module holds the pieces the driver leans on when external
//! tools or disk images misbehave: a fixed-delay retry loop that tells
//! transient failures from permanent ones, an aggregate that keeps every
//! attempt's failure, the `hdiutil` invocation helper, and the scanner that
//! pulls the kernel boot options out of an isolinux config.

pub mod cli;
pub mod commands;
pub mod driver;
pub mod env_loader;
pub mod error;
pub mod logging;

pub use error::DriverError;
