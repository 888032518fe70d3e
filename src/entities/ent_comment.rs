// EntComment

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, Post, Ref, User};
use crate::core::EntityId;
use crate::schemas::CommentSchema;
use crate::services::reference_resolver::ReferenceResolver;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: EntityId,
    pub comment: String,
    pub comment_date: DateTime<Utc>,
    #[serde(default)]
    pub post: Option<Ref<Post>>,
    #[serde(default)]
    pub user: Option<Ref<User>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<EntityId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<EntityId>,
}

#[async_trait]
impl Entity for Comment {
    type Schema = CommentSchema;
    type Input = CommentInput;

    fn id(&self) -> EntityId {
        self.id
    }

    async fn hydrate(mut self, resolver: &ReferenceResolver) -> Self {
        let (post, user) = tokio::join!(
            resolver.resolve("post", self.post.take()),
            resolver.resolve("user", self.user.take()),
        );
        self.post = post;
        self.user = user;
        self
    }
}
