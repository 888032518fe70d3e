// Schema definitions module - centralized schema registry

pub mod comment_schema;
pub mod event_schema;
pub mod group_schema;
pub mod post_schema;
pub mod profile_schema;
pub mod simple_schemas;
pub mod user_schema;

use crate::ent_schema::SchemaRegistry;

pub use comment_schema::CommentSchema;
pub use event_schema::EventSchema;
pub use group_schema::GroupSchema;
pub use post_schema::PostSchema;
pub use profile_schema::ProfileSchema;
pub use simple_schemas::{MessageSchema, ThreadSchema};
pub use user_schema::UserSchema;

/// Initialize and register all schemas
pub fn create_schema_registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();

    registry.register::<UserSchema>();
    registry.register::<ProfileSchema>();
    registry.register::<GroupSchema>();
    registry.register::<EventSchema>();
    registry.register::<PostSchema>();
    registry.register::<CommentSchema>();
    registry.register::<ThreadSchema>();
    registry.register::<MessageSchema>();

    registry
}

/// Validate all registered schemas
pub fn validate_schemas() -> Result<(), Vec<String>> {
    create_schema_registry().validate()
}
