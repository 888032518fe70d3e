// EntThread - direct conversation between a user and a match

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Entity, Ref, User};
use crate::core::EntityId;
use crate::schemas::ThreadSchema;
use crate::services::reference_resolver::ReferenceResolver;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub id: EntityId,
    pub text: String,
    #[serde(default)]
    pub user: Option<Ref<User>>,
    #[serde(default, rename = "match")]
    pub match_user: Option<Ref<User>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<EntityId>,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_user: Option<EntityId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreadFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<EntityId>,
}

#[async_trait]
impl Entity for Thread {
    type Schema = ThreadSchema;
    type Input = ThreadInput;

    fn id(&self) -> EntityId {
        self.id
    }

    async fn hydrate(mut self, resolver: &ReferenceResolver) -> Self {
        let (user, match_user) = tokio::join!(
            resolver.resolve("user", self.user.take()),
            resolver.resolve("match", self.match_user.take()),
        );
        self.user = user;
        self.match_user = match_user;
        self
    }
}
