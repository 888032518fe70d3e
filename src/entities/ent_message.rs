// EntMessage

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, Ref, Thread, User};
use crate::core::EntityId;
use crate::schemas::MessageSchema;
use crate::services::reference_resolver::ReferenceResolver;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: EntityId,
    pub text: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub thread: Option<Ref<Thread>>,
    #[serde(default)]
    pub user: Option<Ref<User>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<EntityId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread: Option<EntityId>,
}

#[async_trait]
impl Entity for Message {
    type Schema = MessageSchema;
    type Input = MessageInput;

    fn id(&self) -> EntityId {
        self.id
    }

    async fn hydrate(mut self, resolver: &ReferenceResolver) -> Self {
        let (thread, user) = tokio::join!(
            resolver.resolve("thread", self.thread.take()),
            resolver.resolve("user", self.user.take()),
        );
        self.thread = thread;
        self.user = user;
        self
    }
}
