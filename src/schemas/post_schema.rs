// Post Entity Schema - the only entity with a defaulted field and a reference list

use crate::core::EntityKind;
use crate::ent_schema::{EntitySchema, FieldDefault, FieldDefinition, FieldType};

pub struct PostSchema;

impl EntitySchema for PostSchema {
    const VERSION: u32 = 1;

    fn entity_kind() -> EntityKind {
        EntityKind::Post
    }

    fn fields() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::new("title", FieldType::Text).required(),
            FieldDefinition::new("content", FieldType::Text).required(),
            FieldDefinition::new("date", FieldType::DateTime).default_value(FieldDefault::Now),
            FieldDefinition::new("user", FieldType::Reference(EntityKind::User)),
            FieldDefinition::new("event", FieldType::Reference(EntityKind::Event)),
            // append-only, written only when a comment is added; removing a
            // comment leaves its id behind
            FieldDefinition::new("comments", FieldType::ReferenceList(EntityKind::Comment))
                .managed()
                .default_value(FieldDefault::EmptyList),
        ]
    }
}
