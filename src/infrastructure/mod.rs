// Core infrastructure modules
pub mod database; // Entity store interface
pub mod id_generator; // ID generation system
pub mod middleware; // Viewer context middleware and extractor
pub mod security; // Password hashing and identity tokens
pub mod sqlite_database; // SQLite entity store
pub mod viewer; // Viewer context

pub use database::{Document, EntityStore, NewDocument, StoredDocument};
pub use id_generator::EntityIdGenerator;
pub use security::{SecurityConfig, SecurityService};
pub use sqlite_database::SqliteDatabase;
pub use viewer::{Identity, ViewerContext};
