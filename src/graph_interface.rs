// Graph Interface - every named query and mutation over the social graph
// Queries are open to anyone except `me`; mutations other than login and
// registration take the caller's ViewerContext and pass it to the gate.

use std::sync::Arc;

use crate::core::EntityId;
use crate::entities::{
    to_document, Comment, CommentFilter, CommentInput, Event, EventFilter, EventInput, Group,
    GroupFilter, GroupInput, Message, MessageFilter, MessageInput, Post, PostFilter, PostInput,
    Profile, ProfileFilter, ProfileInput, Thread, ThreadFilter, ThreadInput, User,
};
use crate::error::AppResult;
use crate::infrastructure::database::EntityStore;
use crate::infrastructure::security::SecurityService;
use crate::infrastructure::viewer::ViewerContext;
use crate::services::{AuthPayload, AuthService, MutationService, QueryService};

#[derive(Clone)]
pub struct GraphInterface {
    queries: QueryService,
    mutations: MutationService,
    auth: AuthService,
}

impl GraphInterface {
    pub fn new(store: Arc<dyn EntityStore>, security: Arc<SecurityService>) -> Self {
        let queries = QueryService::new(store.clone());
        let mutations = MutationService::new(store.clone());
        let auth = AuthService::new(store, security, queries.clone(), mutations.clone());
        Self {
            queries,
            mutations,
            auth,
        }
    }

    pub fn queries(&self) -> &QueryService {
        &self.queries
    }

    // --- Queries ---

    pub async fn users(&self) -> AppResult<Vec<User>> {
        self.queries.find_all().await
    }

    pub async fn user(&self, id: EntityId) -> AppResult<User> {
        self.queries.find_by_id(id).await
    }

    pub async fn profiles(&self) -> AppResult<Vec<Profile>> {
        self.queries.find_all().await
    }

    pub async fn profile(&self, id: EntityId) -> AppResult<Profile> {
        self.queries.find_by_id(id).await
    }

    /// The profile owned by `user`, if one was created
    pub async fn userprofile(&self, user: EntityId) -> AppResult<Option<Profile>> {
        let filter = ProfileFilter { user: Some(user) };
        self.queries.find_first(to_document(&filter)?).await
    }

    pub async fn groups(&self, filter: &GroupFilter) -> AppResult<Vec<Group>> {
        self.queries.find_by_filter(to_document(filter)?).await
    }

    pub async fn group(&self, id: EntityId) -> AppResult<Group> {
        self.queries.find_by_id(id).await
    }

    pub async fn events(&self, filter: &EventFilter) -> AppResult<Vec<Event>> {
        self.queries.find_by_filter(to_document(filter)?).await
    }

    pub async fn event(&self, id: EntityId) -> AppResult<Event> {
        self.queries.find_by_id(id).await
    }

    pub async fn posts(&self, filter: &PostFilter) -> AppResult<Vec<Post>> {
        self.queries.find_by_filter(to_document(filter)?).await
    }

    pub async fn post(&self, id: EntityId) -> AppResult<Post> {
        self.queries.find_by_id(id).await
    }

    pub async fn comments(&self, filter: &CommentFilter) -> AppResult<Vec<Comment>> {
        self.queries.find_by_filter(to_document(filter)?).await
    }

    pub async fn comment(&self, id: EntityId) -> AppResult<Comment> {
        self.queries.find_by_id(id).await
    }

    pub async fn threads(&self, filter: &ThreadFilter) -> AppResult<Vec<Thread>> {
        self.queries.find_by_filter(to_document(filter)?).await
    }

    pub async fn thread(&self, id: EntityId) -> AppResult<Thread> {
        self.queries.find_by_id(id).await
    }

    pub async fn messages(&self, filter: &MessageFilter) -> AppResult<Vec<Message>> {
        self.queries.find_by_filter(to_document(filter)?).await
    }

    pub async fn message(&self, id: EntityId) -> AppResult<Message> {
        self.queries.find_by_id(id).await
    }

    pub async fn me(&self, vc: &ViewerContext) -> AppResult<User> {
        self.auth.me(vc).await
    }

    // --- Account mutations ---

    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthPayload> {
        self.auth.login(email, password).await
    }

    pub async fn add_user(&self, email: &str, password: &str) -> AppResult<AuthPayload> {
        self.auth.add_user(email, password).await
    }

    pub async fn update_user(
        &self,
        vc: &ViewerContext,
        id: EntityId,
        profile: Option<EntityId>,
    ) -> AppResult<User> {
        self.auth.update_user(vc, id, profile).await
    }

    // --- Profile ---

    pub async fn add_profile(&self, vc: &ViewerContext, input: &ProfileInput) -> AppResult<Profile> {
        self.mutations.add(vc, input).await
    }

    pub async fn update_profile(
        &self,
        vc: &ViewerContext,
        profile_id: EntityId,
        input: &ProfileInput,
    ) -> AppResult<Profile> {
        self.mutations.update(vc, profile_id, input).await
    }

    pub async fn remove_profile(&self, vc: &ViewerContext, profile_id: EntityId) -> AppResult<Option<Profile>> {
        self.mutations.remove(vc, profile_id).await
    }

    // --- Group ---

    pub async fn add_group(&self, vc: &ViewerContext, input: &GroupInput) -> AppResult<Group> {
        self.mutations.add(vc, input).await
    }

    pub async fn update_group(
        &self,
        vc: &ViewerContext,
        group_id: EntityId,
        input: &GroupInput,
    ) -> AppResult<Group> {
        self.mutations.update(vc, group_id, input).await
    }

    pub async fn remove_group(&self, vc: &ViewerContext, group_id: EntityId) -> AppResult<Option<Group>> {
        self.mutations.remove(vc, group_id).await
    }

    // --- Event ---

    pub async fn add_event(&self, vc: &ViewerContext, input: &EventInput) -> AppResult<Event> {
        self.mutations.add(vc, input).await
    }

    pub async fn update_event(
        &self,
        vc: &ViewerContext,
        event_id: EntityId,
        input: &EventInput,
    ) -> AppResult<Event> {
        self.mutations.update(vc, event_id, input).await
    }

    pub async fn remove_event(&self, vc: &ViewerContext, event_id: EntityId) -> AppResult<Option<Event>> {
        self.mutations.remove(vc, event_id).await
    }

    // --- Post ---

    pub async fn add_post(&self, vc: &ViewerContext, input: &PostInput) -> AppResult<Post> {
        self.mutations.add(vc, input).await
    }

    pub async fn update_post(
        &self,
        vc: &ViewerContext,
        post_id: EntityId,
        input: &PostInput,
    ) -> AppResult<Post> {
        self.mutations.update(vc, post_id, input).await
    }

    pub async fn remove_post(&self, vc: &ViewerContext, post_id: EntityId) -> AppResult<Option<Post>> {
        self.mutations.remove(vc, post_id).await
    }

    // --- Comment ---

    /// Also appends the comment to its post's comment list
    pub async fn add_comment(&self, vc: &ViewerContext, input: &CommentInput) -> AppResult<Comment> {
        self.mutations.add_comment(vc, input).await
    }

    pub async fn update_comment(
        &self,
        vc: &ViewerContext,
        comment_id: EntityId,
        input: &CommentInput,
    ) -> AppResult<Comment> {
        self.mutations.update(vc, comment_id, input).await
    }

    /// Leaves the id in the post's comment list; hydration skips it
    pub async fn remove_comment(&self, vc: &ViewerContext, comment_id: EntityId) -> AppResult<Option<Comment>> {
        self.mutations.remove(vc, comment_id).await
    }

    // --- Thread ---

    pub async fn add_thread(&self, vc: &ViewerContext, input: &ThreadInput) -> AppResult<Thread> {
        self.mutations.add(vc, input).await
    }

    pub async fn update_thread(
        &self,
        vc: &ViewerContext,
        thread_id: EntityId,
        input: &ThreadInput,
    ) -> AppResult<Thread> {
        self.mutations.update(vc, thread_id, input).await
    }

    pub async fn remove_thread(&self, vc: &ViewerContext, thread_id: EntityId) -> AppResult<Option<Thread>> {
        self.mutations.remove(vc, thread_id).await
    }

    // --- Message ---

    pub async fn add_message(&self, vc: &ViewerContext, input: &MessageInput) -> AppResult<Message> {
        self.mutations.add(vc, input).await
    }

    pub async fn update_message(
        &self,
        vc: &ViewerContext,
        message_id: EntityId,
        input: &MessageInput,
    ) -> AppResult<Message> {
        self.mutations.update(vc, message_id, input).await
    }

    pub async fn remove_message(&self, vc: &ViewerContext, message_id: EntityId) -> AppResult<Option<Message>> {
        self.mutations.remove(vc, message_id).await
    }
}
