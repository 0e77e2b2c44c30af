//! # Craft Common
//!
//! Foundational types shared by every Craft crate.
//!
//! ## Modules
//!
//! - [`edition`] - Licensing tiers that gate which services are available
//! - [`error`] - Severity classification implemented by every crate's error type
//! - [`logging`] - Helpers for formatting structured values in log lines

pub mod edition;
pub mod error;
pub mod logging;

pub use edition::Edition;
pub use error::{ErrorSeverity, Severity};
pub use logging::Pretty;
