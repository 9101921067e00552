//! Adapters - concrete implementations of ports (traits)

#[cfg(feature = "xsign")]
mod xsign;

#[cfg(test)]
pub mod fake_device;

// Re-export for convenience
#[cfg(feature = "xsign")]
pub use xsign::{XSignDevice, XSignSession};
