//! Game session tracking

pub mod registry;

// Re-export key types for convenience
pub use registry::SessionRegistry;
