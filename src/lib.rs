// Lobby Graph - social and event coordination graph with context-based authorization

// Core types and primitives
pub mod core;

// Entity store, identity tokens and the request viewer
pub mod infrastructure;

// Schema framework and the per-entity schema definitions
pub mod ent_schema;
pub mod schemas;

// Typed read models and their reference hydration
pub mod entities;

// Authorization gate, query and mutation services
pub mod services;

// Named operations and their HTTP transport
pub mod graph_interface;
pub mod http_api;

// Common utilities
pub mod app_state;
pub mod config;
pub mod error;

// Re-exports for convenience
pub use error::{AppError, AppResult};
pub use graph_interface::GraphInterface;
