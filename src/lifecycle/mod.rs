//! Startup/shutdown coordination.

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
