// Profile Entity Schema
// Fixed core (first/last name) plus known optional attributes and an open attribute bag

use crate::core::EntityKind;
use crate::ent_schema::{EntitySchema, FieldDefinition, FieldType};

pub struct ProfileSchema;

impl EntitySchema for ProfileSchema {
    const VERSION: u32 = 2;

    fn entity_kind() -> EntityKind {
        EntityKind::Profile
    }

    fn fields() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::new("firstName", FieldType::Text).required().trim(),
            FieldDefinition::new("lastName", FieldType::Text).required().trim(),
            FieldDefinition::new("gender", FieldType::Text),
            FieldDefinition::new("photo", FieldType::Text),
            FieldDefinition::new("bio", FieldType::Text),
            FieldDefinition::new("birthdate", FieldType::DateTime),
            FieldDefinition::new("currentCity", FieldType::Text),
            FieldDefinition::new("platforms", FieldType::Text),
            // variant-specific extras live here instead of growing the core
            FieldDefinition::new("attributes", FieldType::Attributes),
            FieldDefinition::new("user", FieldType::Reference(EntityKind::User)),
        ]
    }
}
