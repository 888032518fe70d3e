// EntGroup

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Entity, Event, Profile, Ref, User};
use crate::core::EntityId;
use crate::schemas::GroupSchema;
use crate::services::reference_resolver::ReferenceResolver;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: EntityId,
    pub group_name: String,
    pub description: String,
    #[serde(default)]
    pub event: Option<Ref<Event>>,
    #[serde(default)]
    pub profile: Option<Ref<Profile>>,
    #[serde(default)]
    pub user: Option<Ref<User>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<EntityId>,
}

/// Either or both; supplied filters are AND-ed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<EntityId>,
}

#[async_trait]
impl Entity for Group {
    type Schema = GroupSchema;
    type Input = GroupInput;

    fn id(&self) -> EntityId {
        self.id
    }

    async fn hydrate(mut self, resolver: &ReferenceResolver) -> Self {
        let (event, profile, user) = tokio::join!(
            resolver.resolve("event", self.event.take()),
            resolver.resolve("profile", self.profile.take()),
            resolver.resolve("user", self.user.take()),
        );
        self.event = event;
        self.profile = profile;
        self.user = user;
        self
    }
}
