// EntPost - carries the ordered, append-only list of its comments

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Comment, Entity, Event, Ref, User};
use crate::core::EntityId;
use crate::schemas::PostSchema;
use crate::services::reference_resolver::ReferenceResolver;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: EntityId,
    pub title: String,
    pub content: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub user: Option<Ref<User>>,
    #[serde(default)]
    pub event: Option<Ref<Event>>,
    #[serde(default)]
    pub comments: Vec<Ref<Comment>>,
}

/// The comment list is not part of the input; comments join a post as they are added
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Defaults to the moment of creation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<EntityId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<EntityId>,
}

#[async_trait]
impl Entity for Post {
    type Schema = PostSchema;
    type Input = PostInput;

    fn id(&self) -> EntityId {
        self.id
    }

    async fn hydrate(mut self, resolver: &ReferenceResolver) -> Self {
        let comments = std::mem::take(&mut self.comments);
        let (user, event, comments) = tokio::join!(
            resolver.resolve("user", self.user.take()),
            resolver.resolve("event", self.event.take()),
            resolver.resolve_many("comments", comments),
        );
        self.user = user;
        self.event = event;
        self.comments = comments;
        self
    }
}
