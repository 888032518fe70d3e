// Thread and Message schemas - the direct messaging variant

use crate::core::EntityKind;
use crate::ent_schema::{EntitySchema, FieldDefinition, FieldType};

/// A conversation between a user and their match
pub struct ThreadSchema;

impl EntitySchema for ThreadSchema {
    const VERSION: u32 = 1;

    fn entity_kind() -> EntityKind {
        EntityKind::Thread
    }

    fn fields() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::new("text", FieldType::Text).required(),
            FieldDefinition::new("user", FieldType::Reference(EntityKind::User)),
            FieldDefinition::new("match", FieldType::Reference(EntityKind::User)),
        ]
    }
}

pub struct MessageSchema;

impl EntitySchema for MessageSchema {
    const VERSION: u32 = 1;

    fn entity_kind() -> EntityKind {
        EntityKind::Message
    }

    fn fields() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::new("text", FieldType::Text).required(),
            FieldDefinition::new("date", FieldType::DateTime).required(),
            FieldDefinition::new("thread", FieldType::Reference(EntityKind::Thread)),
            FieldDefinition::new("user", FieldType::Reference(EntityKind::User)),
        ]
    }
}
