// Reference Resolver - swaps reference ids for the records they point at
// Hydration never fails a read: missing targets and store errors degrade to null

use futures::future::join_all;
use std::sync::Arc;
use tracing::warn;

use crate::core::EntityId;
use crate::entities::{Entity, Ref};
use crate::error::AppResult;
use crate::infrastructure::database::EntityStore;

#[derive(Clone)]
pub struct ReferenceResolver {
    store: Arc<dyn EntityStore>,
}

impl ReferenceResolver {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Typed, unhydrated fetch
    pub async fn load<T: Entity>(&self, id: EntityId) -> AppResult<Option<T>> {
        match self.store.get(T::kind(), id).await? {
            Some(document) => T::from_stored(document).map(Some),
            None => Ok(None),
        }
    }

    pub async fn resolve<T: Entity>(
        &self,
        field: &'static str,
        reference: Option<Ref<T>>,
    ) -> Option<Ref<T>> {
        match reference? {
            Ref::Id(id) => self.fetch(field, id).await.map(|entity| Ref::Loaded(Box::new(entity))),
            loaded @ Ref::Loaded(_) => Some(loaded),
        }
    }

    /// Hydrate a list in order, dropping entries whose target is gone
    pub async fn resolve_many<T: Entity>(
        &self,
        field: &'static str,
        references: Vec<Ref<T>>,
    ) -> Vec<Ref<T>> {
        join_all(
            references
                .into_iter()
                .map(|reference| self.resolve(field, Some(reference))),
        )
        .await
        .into_iter()
        .flatten()
        .collect()
    }

    async fn fetch<T: Entity>(&self, field: &'static str, id: EntityId) -> Option<T> {
        match self.load::<T>(id).await {
            Ok(Some(entity)) => Some(entity),
            Ok(None) => {
                warn!(field, %id, kind = %T::kind(), "dangling reference resolved to null");
                None
            }
            Err(e) => {
                warn!(field, %id, kind = %T::kind(), error = %e, "reference hydration failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EntityKind;
    use crate::entities::User;
    use crate::infrastructure::database::NewDocument;
    use crate::infrastructure::sqlite_database::SqliteDatabase;
    use serde_json::json;

    async fn store_with_user() -> (Arc<dyn EntityStore>, EntityId) {
        let store: Arc<dyn EntityStore> = Arc::new(SqliteDatabase::new_in_memory().await.unwrap());
        let stored = store
            .insert(NewDocument {
                kind: EntityKind::User,
                schema_version: 1,
                data: json!({"email": "a@x.com", "password": "hash"})
                    .as_object()
                    .cloned()
                    .unwrap(),
                unique_key: Some("a@x.com".to_string()),
            })
            .await
            .unwrap();
        (store, stored.id)
    }

    #[tokio::test]
    async fn test_resolve_loads_existing_target() {
        let (store, id) = store_with_user().await;
        let resolver = ReferenceResolver::new(store);

        let resolved = resolver.resolve::<User>("user", Some(Ref::Id(id))).await.unwrap();
        assert_eq!(resolved.loaded().unwrap().email, "a@x.com");
    }

    #[tokio::test]
    async fn test_dangling_reference_degrades_to_none() {
        let (store, _) = store_with_user().await;
        let resolver = ReferenceResolver::new(store);

        let resolved = resolver.resolve::<User>("user", Some(Ref::Id(EntityId::new(999)))).await;
        assert_eq!(resolved, None);
        assert_eq!(resolver.resolve::<User>("user", None).await, None);
    }

    #[tokio::test]
    async fn test_reference_to_wrong_kind_is_dangling() {
        let (store, id) = store_with_user().await;
        let resolver = ReferenceResolver::new(store);

        let resolved = resolver
            .resolve::<crate::entities::Profile>("profile", Some(Ref::Id(id)))
            .await;
        assert_eq!(resolved, None);
    }

    #[tokio::test]
    async fn test_resolve_many_keeps_order_and_drops_missing() {
        let (store, id) = store_with_user().await;
        let resolver = ReferenceResolver::new(store);

        let resolved = resolver
            .resolve_many::<User>(
                "users",
                vec![Ref::Id(id), Ref::Id(EntityId::new(999)), Ref::Id(id)],
            )
            .await;
        assert_eq!(resolved.len(), 2);
        assert!(resolved.iter().all(|r| r.id() == id && r.is_loaded()));
    }
}
