// Mutation Service - gated create, merge-update and delete for every entity kind
// Each operation is a single store write; nothing spans documents

use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::{EntityId, EntityKind};
use crate::ent_schema::{normalize_document, Cardinality, EntitySchema, WriteMode};
use crate::entities::{to_document, Comment, Entity, Ref};
use crate::error::{AppError, AppResult};
use crate::infrastructure::database::{Document, EntityStore, NewDocument};
use crate::infrastructure::viewer::ViewerContext;
use crate::services::authorization::authorize;

#[derive(Clone)]
pub struct MutationService {
    store: Arc<dyn EntityStore>,
}

impl MutationService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Create a record. References in the result are raw ids.
    pub async fn add<T: Entity>(&self, vc: &ViewerContext, input: &T::Input) -> AppResult<T> {
        let identity = authorize(vc)?;
        let document = normalize_document::<T::Schema>(WriteMode::Create, to_document(input)?)?;
        self.create::<T>(document).await.inspect(|entity| {
            info!(kind = %T::kind(), id = %entity.id(), by = %identity.user_id, "created");
        })
    }

    /// Insert an already-normalised document, checking references and the unique key.
    /// Callers are responsible for authorization.
    pub(crate) async fn create<T: Entity>(&self, document: Document) -> AppResult<T> {
        self.ensure_references_exist::<T::Schema>(&document).await?;

        let stored = self
            .store
            .insert(NewDocument {
                kind: T::kind(),
                schema_version: T::Schema::VERSION,
                unique_key: unique_key::<T::Schema>(&document),
                data: document,
            })
            .await?;

        T::from_stored(stored)
    }

    /// Merge only the supplied fields. The gate runs before the existence check.
    pub async fn update<T: Entity>(
        &self,
        vc: &ViewerContext,
        id: EntityId,
        input: &T::Input,
    ) -> AppResult<T> {
        let identity = authorize(vc)?;
        let patch = normalize_document::<T::Schema>(WriteMode::Update, to_document(input)?)?;
        self.ensure_references_exist::<T::Schema>(&patch).await?;

        let fields = patch.len();
        let stored = self.store.merge(T::kind(), id, patch).await?.ok_or_else(|| {
            AppError::NotFound(format!("{} {}", T::kind().label(), id))
        })?;

        info!(kind = %T::kind(), %id, fields, by = %identity.user_id, "updated");
        T::from_stored(stored)
    }

    /// Idempotent: a missing id yields `None`, not an error
    pub async fn remove<T: Entity>(&self, vc: &ViewerContext, id: EntityId) -> AppResult<Option<T>> {
        let identity = authorize(vc)?;

        match self.store.delete(T::kind(), id).await? {
            Some(stored) => {
                info!(kind = %T::kind(), %id, by = %identity.user_id, "removed");
                T::from_stored(stored).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Create a comment, then link it into its post's comment list.
    /// The link is a second write; a failure there leaves the comment unlinked.
    pub async fn add_comment(
        &self,
        vc: &ViewerContext,
        input: &<Comment as Entity>::Input,
    ) -> AppResult<Comment> {
        let comment: Comment = self.add(vc, input).await?;

        if let Some(post) = comment.post.as_ref().map(Ref::id) {
            let linked = self
                .store
                .append(EntityKind::Post, post, "comments", Value::from(comment.id.value()))
                .await?;
            if !linked {
                warn!(comment = %comment.id, %post, "post vanished before the comment was linked");
            }
        }

        Ok(comment)
    }

    async fn ensure_references_exist<S: EntitySchema>(&self, document: &Document) -> AppResult<()> {
        for relation in S::relations() {
            let Some(value) = document.get(relation.name) else {
                continue;
            };

            let ids: Vec<EntityId> = match relation.cardinality {
                Cardinality::One => value.as_i64().map(EntityId::new).into_iter().collect(),
                Cardinality::Many => value
                    .as_array()
                    .map(|ids| ids.iter().filter_map(Value::as_i64).map(EntityId::new).collect())
                    .unwrap_or_default(),
            };

            for id in ids {
                if !self.store.exists(relation.target, id).await? {
                    return Err(AppError::Validation(format!(
                        "{} refers to a missing {} ({})",
                        relation.name,
                        relation.target.label(),
                        id
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Value of the schema's unique field, if any, as stored
fn unique_key<S: EntitySchema>(document: &Document) -> Option<String> {
    S::fields()
        .into_iter()
        .find(|field| field.unique)
        .and_then(|field| document.get(field.name))
        .and_then(Value::as_str)
        .map(str::to_string)
}
