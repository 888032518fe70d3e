// EntUser - account record; the password hash stays in the store

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Entity, Profile, Ref};
use crate::core::EntityId;
use crate::schemas::UserSchema;
use crate::services::reference_resolver::ReferenceResolver;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: EntityId,
    pub email: String,
    #[serde(default)]
    pub profile: Option<Ref<Profile>>,
}

/// The only user field writable after registration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<EntityId>,
}

#[async_trait]
impl Entity for User {
    type Schema = UserSchema;
    type Input = UserInput;

    fn id(&self) -> EntityId {
        self.id
    }

    async fn hydrate(mut self, resolver: &ReferenceResolver) -> Self {
        self.profile = resolver.resolve("profile", self.profile).await;
        self
    }
}
