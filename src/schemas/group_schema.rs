// Group Entity Schema

use crate::core::EntityKind;
use crate::ent_schema::{EntitySchema, FieldDefinition, FieldType};

pub struct GroupSchema;

impl EntitySchema for GroupSchema {
    const VERSION: u32 = 1;

    fn entity_kind() -> EntityKind {
        EntityKind::Group
    }

    fn fields() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::new("groupName", FieldType::Text).required().trim(),
            FieldDefinition::new("description", FieldType::Text).required(),
            FieldDefinition::new("event", FieldType::Reference(EntityKind::Event)),
            FieldDefinition::new("profile", FieldType::Reference(EntityKind::Profile)),
            FieldDefinition::new("user", FieldType::Reference(EntityKind::User)),
        ]
    }
}
