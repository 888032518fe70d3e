// Event Entity Schema

use crate::core::EntityKind;
use crate::ent_schema::{EntitySchema, FieldDefinition, FieldType};

pub struct EventSchema;

impl EntitySchema for EventSchema {
    const VERSION: u32 = 1;

    fn entity_kind() -> EntityKind {
        EntityKind::Event
    }

    fn fields() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::new("eventName", FieldType::Text).required().trim(),
            FieldDefinition::new("eventDate", FieldType::DateTime).required(),
            FieldDefinition::new("lobbyCode", FieldType::Text).trim(),
            FieldDefinition::new("description", FieldType::Text).required(),
            FieldDefinition::new("group", FieldType::Reference(EntityKind::Group)),
            FieldDefinition::new("profile", FieldType::Reference(EntityKind::Profile)),
            FieldDefinition::new("user", FieldType::Reference(EntityKind::User)),
        ]
    }
}
