// Ent Schema Framework - declarative, versioned entity schemas
// Fields carry shape and required-ness; reference fields double as typed relation descriptors

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;

use crate::core::EntityKind;
use crate::error::{AppError, AppResult};
use crate::infrastructure::database::Document;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Schema definition trait, one implementation per entity kind
pub trait EntitySchema: Send + Sync {
    /// Bumped whenever the field set changes; stored alongside each document
    const VERSION: u32;

    fn entity_kind() -> EntityKind
    where
        Self: Sized;

    fn fields() -> Vec<FieldDefinition>
    where
        Self: Sized;

    /// Relation descriptors, derived from the reference fields
    fn relations() -> Vec<RelationDescriptor>
    where
        Self: Sized,
    {
        Self::fields()
            .into_iter()
            .filter_map(|field| match field.field_type {
                FieldType::Reference(target) => Some(RelationDescriptor {
                    name: field.name,
                    target,
                    cardinality: Cardinality::One,
                }),
                FieldType::ReferenceList(target) => Some(RelationDescriptor {
                    name: field.name,
                    target,
                    cardinality: Cardinality::Many,
                }),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub name: &'static str,
    pub field_type: FieldType,
    pub required: bool,
    pub trim: bool,
    pub unique: bool,
    /// Written only by the store's own operations, never by create or update input
    pub managed: bool,
    pub default: Option<FieldDefault>,
}

impl FieldDefinition {
    /// Optional field; chain `.required()` for the schema's core fields
    pub fn new(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: false,
            trim: false,
            unique: false,
            managed: false,
            default: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Strip surrounding whitespace before storage
    pub fn trim(mut self) -> Self {
        self.trim = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn managed(mut self) -> Self {
        self.managed = true;
        self
    }

    pub fn default_value(mut self, default: FieldDefault) -> Self {
        self.default = Some(default);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldType {
    Text,
    /// Lower-cased, pattern-checked address
    Email,
    /// Password hash; never part of a read model
    Secret,
    /// RFC 3339 timestamp
    DateTime,
    /// Free-form JSON object of extra attributes
    Attributes,
    Reference(EntityKind),
    ReferenceList(EntityKind),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDefault {
    /// Creation time
    Now,
    EmptyList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    One,
    Many,
}

/// A relation from one entity kind to another
#[derive(Debug, Clone, PartialEq)]
pub struct RelationDescriptor {
    pub name: &'static str,
    pub target: EntityKind,
    pub cardinality: Cardinality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    Update,
}

/// Check and normalise a write against the schema.
///
/// Nulls are dropped, unknown and managed fields rejected, text trimmed where declared,
/// emails lower-cased. On create, required fields must be present and
/// defaults are filled in; on update, required text may not be blanked.
pub fn normalize_document<S: EntitySchema>(mode: WriteMode, document: Document) -> AppResult<Document> {
    let fields = S::fields();
    let kind = S::entity_kind();
    let mut normalized = Document::new();

    for (name, value) in document {
        if value.is_null() {
            continue;
        }
        let field = fields.iter().find(|f| f.name == name).ok_or_else(|| {
            AppError::Validation(format!("{} has no field named {}", kind.label(), name))
        })?;
        if field.managed {
            return Err(AppError::Validation(format!(
                "{}.{} cannot be written directly",
                kind.label(),
                name
            )));
        }
        let value = normalize_value(field, value)?;
        normalized.insert(name, value);
    }

    for field in &fields {
        if normalized.contains_key(field.name) {
            continue;
        }
        if mode == WriteMode::Create {
            match field.default {
                Some(FieldDefault::Now) => {
                    normalized.insert(field.name.to_string(), Value::String(Utc::now().to_rfc3339()));
                }
                Some(FieldDefault::EmptyList) => {
                    normalized.insert(field.name.to_string(), Value::Array(Vec::new()));
                }
                None if field.required => {
                    return Err(AppError::Validation(format!(
                        "{} is required for {}",
                        field.name,
                        kind.label()
                    )));
                }
                None => {}
            }
        }
    }

    Ok(normalized)
}

fn normalize_value(field: &FieldDefinition, value: Value) -> AppResult<Value> {
    let invalid = |expected: &str| {
        AppError::Validation(format!("{} must be {}", field.name, expected))
    };

    match field.field_type {
        FieldType::Text | FieldType::Secret => {
            let text = value.as_str().ok_or_else(|| invalid("a string"))?;
            let text = if field.trim { text.trim() } else { text };
            if field.required && text.trim().is_empty() {
                return Err(invalid("non-empty"));
            }
            Ok(Value::String(text.to_string()))
        }
        FieldType::Email => {
            let text = value.as_str().ok_or_else(|| invalid("a string"))?;
            let email = normalize_email(text);
            if !EMAIL_PATTERN.is_match(&email) {
                return Err(invalid("a valid email address"));
            }
            Ok(Value::String(email))
        }
        FieldType::DateTime => {
            let text = value.as_str().ok_or_else(|| invalid("an RFC 3339 date-time"))?;
            let parsed = DateTime::parse_from_rfc3339(text)
                .map_err(|_| invalid("an RFC 3339 date-time"))?;
            Ok(Value::String(parsed.with_timezone(&Utc).to_rfc3339()))
        }
        FieldType::Attributes => match value {
            Value::Object(_) => Ok(value),
            _ => Err(invalid("an object")),
        },
        FieldType::Reference(_) => reference_id(&value)
            .map(Value::from)
            .ok_or_else(|| invalid("an entity id")),
        FieldType::ReferenceList(_) => value
            .as_array()
            .and_then(|ids| ids.iter().map(|id| reference_id(id).map(Value::from)).collect())
            .map(Value::Array)
            .ok_or_else(|| invalid("a list of entity ids")),
    }
}

/// Ids arrive as JSON numbers or decimal strings; the store keeps numbers
fn reference_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Check filter criteria against the schema and bring reference ids into stored form
pub fn normalize_criteria<S: EntitySchema>(criteria: Document) -> AppResult<Document> {
    let fields = S::fields();
    let kind = S::entity_kind();

    criteria
        .into_iter()
        .map(|(name, value)| -> AppResult<(String, Value)> {
            let field = fields.iter().find(|f| f.name == name).ok_or_else(|| {
                AppError::Validation(format!("{} cannot be filtered by {}", kind.label(), name))
            })?;
            let value = match field.field_type {
                FieldType::Reference(_) => reference_id(&value).map(Value::from).ok_or_else(|| {
                    AppError::Validation(format!("{} filter must be an entity id", name))
                })?,
                _ => value,
            };
            Ok((name, value))
        })
        .collect()
}

/// Canonical form used for storage and uniqueness
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Schema registry - holds all defined schemas
#[derive(Default)]
pub struct SchemaRegistry {
    field_definitions: HashMap<EntityKind, Vec<FieldDefinition>>,
    relations: HashMap<EntityKind, Vec<RelationDescriptor>>,
    versions: HashMap<EntityKind, u32>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: EntitySchema + 'static>(&mut self) {
        let kind = T::entity_kind();
        self.field_definitions.insert(kind, T::fields());
        self.relations.insert(kind, T::relations());
        self.versions.insert(kind, T::VERSION);
    }

    pub fn get_fields(&self, kind: EntityKind) -> Option<&Vec<FieldDefinition>> {
        self.field_definitions.get(&kind)
    }

    pub fn get_relations(&self, kind: EntityKind) -> Option<&Vec<RelationDescriptor>> {
        self.relations.get(&kind)
    }

    pub fn version(&self, kind: EntityKind) -> Option<u32> {
        self.versions.get(&kind).copied()
    }

    /// Every relation must point at a registered kind and field names must be unique
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for (kind, relations) in &self.relations {
            for relation in relations {
                if !self.field_definitions.contains_key(&relation.target) {
                    errors.push(format!(
                        "{} relation '{}' points to unregistered kind {}",
                        kind, relation.name, relation.target
                    ));
                }
            }
        }

        for (kind, fields) in &self.field_definitions {
            for (index, field) in fields.iter().enumerate() {
                if fields[..index].iter().any(|f| f.name == field.name) {
                    errors.push(format!("{} declares field '{}' twice", kind, field.name));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
