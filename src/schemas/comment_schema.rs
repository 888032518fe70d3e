// Comment Entity Schema

use crate::core::EntityKind;
use crate::ent_schema::{EntitySchema, FieldDefinition, FieldType};

pub struct CommentSchema;

impl EntitySchema for CommentSchema {
    const VERSION: u32 = 1;

    fn entity_kind() -> EntityKind {
        EntityKind::Comment
    }

    fn fields() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::new("comment", FieldType::Text).required().trim(),
            FieldDefinition::new("commentDate", FieldType::DateTime).required(),
            FieldDefinition::new("post", FieldType::Reference(EntityKind::Post)),
            FieldDefinition::new("user", FieldType::Reference(EntityKind::User)),
        ]
    }
}
