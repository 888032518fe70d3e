// Core types and primitives

pub mod strong_types;

// Re-export commonly used types
pub use strong_types::{current_time_millis, EntityId, EntityKind};
