//! Common components for pkpass signing crates.

#[cfg(feature = "logging")]
pub mod logging;
