// Query Service - read shapes shared by every entity kind
// Reads need no identity; every result passes through the reference resolver

use futures::future::join_all;
use std::sync::Arc;
use tracing::debug;

use crate::core::EntityId;
use crate::ent_schema::normalize_criteria;
use crate::entities::Entity;
use crate::error::{AppError, AppResult};
use crate::infrastructure::database::{Document, EntityStore};
use crate::services::reference_resolver::ReferenceResolver;

#[derive(Clone)]
pub struct QueryService {
    store: Arc<dyn EntityStore>,
    resolver: ReferenceResolver,
}

impl QueryService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self {
            resolver: ReferenceResolver::new(store.clone()),
            store,
        }
    }

    pub fn resolver(&self) -> &ReferenceResolver {
        &self.resolver
    }

    pub async fn find_all<T: Entity>(&self) -> AppResult<Vec<T>> {
        self.find_by_filter(Document::new()).await
    }

    pub async fn find_by_id<T: Entity>(&self, id: EntityId) -> AppResult<T> {
        self.find_optional(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} {}", T::kind().label(), id)))
    }

    pub async fn find_optional<T: Entity>(&self, id: EntityId) -> AppResult<Option<T>> {
        match self.resolver.load::<T>(id).await? {
            Some(entity) => Ok(Some(entity.hydrate(&self.resolver).await)),
            None => Ok(None),
        }
    }

    /// Exact-match criteria over top-level fields, AND-ed; ascending id order
    pub async fn find_by_filter<T: Entity>(&self, criteria: Document) -> AppResult<Vec<T>> {
        let kind = T::kind();
        let criteria = normalize_criteria::<T::Schema>(criteria)?;

        let documents = self.store.find(kind, &criteria).await?;
        debug!(%kind, criteria = criteria.len(), found = documents.len(), "filtered read");

        let entities = documents
            .into_iter()
            .map(T::from_stored)
            .collect::<AppResult<Vec<T>>>()?;

        Ok(join_all(entities.into_iter().map(|entity| entity.hydrate(&self.resolver))).await)
    }

    pub async fn find_first<T: Entity>(&self, criteria: Document) -> AppResult<Option<T>> {
        Ok(self.find_by_filter(criteria).await?.into_iter().next())
    }
}
