// EntEvent

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, Group, Profile, Ref, User};
use crate::core::EntityId;
use crate::schemas::EventSchema;
use crate::services::reference_resolver::ReferenceResolver;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EntityId,
    pub event_name: String,
    pub event_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lobby_code: Option<String>,
    pub description: String,
    #[serde(default)]
    pub group: Option<Ref<Group>>,
    #[serde(default)]
    pub profile: Option<Ref<Profile>>,
    #[serde(default)]
    pub user: Option<Ref<User>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lobby_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<EntityId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<EntityId>,
}

#[async_trait]
impl Entity for Event {
    type Schema = EventSchema;
    type Input = EventInput;

    fn id(&self) -> EntityId {
        self.id
    }

    async fn hydrate(mut self, resolver: &ReferenceResolver) -> Self {
        let (group, profile, user) = tokio::join!(
            resolver.resolve("group", self.group.take()),
            resolver.resolve("profile", self.profile.take()),
            resolver.resolve("user", self.user.take()),
        );
        self.group = group;
        self.profile = profile;
        self.user = user;
        self
    }
}
