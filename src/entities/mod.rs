// Entity read models - typed views over stored documents
// Each entity names its schema, its write input and how its references hydrate

pub mod ent_comment;
pub mod ent_event;
pub mod ent_group;
pub mod ent_message;
pub mod ent_post;
pub mod ent_profile;
pub mod ent_thread;
pub mod ent_user;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::core::{EntityId, EntityKind};
use crate::ent_schema::EntitySchema;
use crate::error::{AppError, AppResult};
use crate::infrastructure::database::{Document, StoredDocument};
use crate::services::reference_resolver::ReferenceResolver;

pub use ent_comment::{Comment, CommentFilter, CommentInput};
pub use ent_event::{Event, EventFilter, EventInput};
pub use ent_group::{Group, GroupFilter, GroupInput};
pub use ent_message::{Message, MessageFilter, MessageInput};
pub use ent_post::{Post, PostFilter, PostInput};
pub use ent_profile::{Profile, ProfileFilter, ProfileInput};
pub use ent_thread::{Thread, ThreadFilter, ThreadInput};
pub use ent_user::{User, UserInput};

/// Entity trait that every read model implements
#[async_trait]
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    type Schema: EntitySchema;

    /// Fields accepted by add (all required ones present) and update (any subset)
    type Input: Serialize + Send + Sync;

    fn id(&self) -> EntityId;

    fn kind() -> EntityKind {
        Self::Schema::entity_kind()
    }

    /// Replace every reference id with the referenced record, one level deep
    async fn hydrate(self, resolver: &ReferenceResolver) -> Self;

    fn from_stored(document: StoredDocument) -> AppResult<Self> {
        let kind = document.kind;
        let id = document.id;
        serde_json::from_value(document.into_json()).map_err(|e| {
            AppError::Internal(format!("Stored {} {} does not match its read model: {}", kind, id, e))
        })
    }
}

/// A relation field: the raw id as stored, or the record it points at once hydrated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ref<T> {
    Id(EntityId),
    Loaded(Box<T>),
}

impl<T: Entity> Ref<T> {
    pub fn id(&self) -> EntityId {
        match self {
            Ref::Id(id) => *id,
            Ref::Loaded(entity) => entity.id(),
        }
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Ref::Loaded(entity) => Some(entity),
            Ref::Id(_) => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Ref::Loaded(_))
    }
}

impl<T> From<EntityId> for Ref<T> {
    fn from(id: EntityId) -> Self {
        Ref::Id(id)
    }
}

/// Flatten an input or filter struct into a document, dropping unset fields
pub fn to_document<T: Serialize>(value: &T) -> AppResult<Document> {
    match serde_json::to_value(value)? {
        Value::Object(document) => Ok(document),
        other => Err(AppError::Internal(format!(
            "Expected a field map, got {}",
            other
        ))),
    }
}
