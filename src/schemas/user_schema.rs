// User Entity Schema - credentials plus the optional back-reference to a profile

use crate::core::EntityKind;
use crate::ent_schema::{EntitySchema, FieldDefinition, FieldType};

pub struct UserSchema;

impl EntitySchema for UserSchema {
    const VERSION: u32 = 1;

    fn entity_kind() -> EntityKind {
        EntityKind::User
    }

    fn fields() -> Vec<FieldDefinition> {
        vec![
            // unique across users, enforced by the store's unique key
            FieldDefinition::new("email", FieldType::Email).required().unique(),
            // argon2 hash, write-only from the client's point of view
            FieldDefinition::new("password", FieldType::Secret).required(),
            // only set through updateUser
            FieldDefinition::new("profile", FieldType::Reference(EntityKind::Profile)),
        ]
    }
}
