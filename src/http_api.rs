// HTTP API - thin JSON transport over the graph interface
// Handlers extract, call one operation and serialise; errors map through AppError

use axum::{
    extract::{Path, Query, State},
    middleware::from_fn_with_state,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use crate::{
    app_state::AppState,
    core::EntityId,
    entities::{
        Comment, CommentFilter, CommentInput, Event, EventFilter, EventInput, Group, GroupFilter,
        GroupInput, Message, MessageFilter, MessageInput, Post, PostFilter, PostInput, Profile,
        ProfileInput, Thread, ThreadFilter, ThreadInput, User,
    },
    error::AppResult,
    infrastructure::middleware::{viewer_context_middleware, Vc},
    services::{AuthPayload, Credentials},
};

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub profile: Option<EntityId>,
}

/// Full application router: `/health` plus every operation under `/api/v1`
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/api/v1", api_routes())
        .layer(from_fn_with_state(state.clone(), viewer_context_middleware::<AppState>))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // Account
        .route("/auth/login", post(login_handler))
        .route("/auth/register", post(add_user_handler))
        .route("/me", get(me_handler))
        .route("/users", get(users_handler))
        .route("/users/{id}", get(user_handler).patch(update_user_handler))
        .route("/users/{id}/profile", get(userprofile_handler))
        // Profile
        .route("/profiles", get(profiles_handler).post(add_profile_handler))
        .route(
            "/profiles/{id}",
            get(profile_handler).patch(update_profile_handler).delete(remove_profile_handler),
        )
        // Group
        .route("/groups", get(groups_handler).post(add_group_handler))
        .route(
            "/groups/{id}",
            get(group_handler).patch(update_group_handler).delete(remove_group_handler),
        )
        // Event
        .route("/events", get(events_handler).post(add_event_handler))
        .route(
            "/events/{id}",
            get(event_handler).patch(update_event_handler).delete(remove_event_handler),
        )
        // Post
        .route("/posts", get(posts_handler).post(add_post_handler))
        .route(
            "/posts/{id}",
            get(post_handler).patch(update_post_handler).delete(remove_post_handler),
        )
        // Comment
        .route("/comments", get(comments_handler).post(add_comment_handler))
        .route(
            "/comments/{id}",
            get(comment_handler).patch(update_comment_handler).delete(remove_comment_handler),
        )
        // Thread / Message
        .route("/threads", get(threads_handler).post(add_thread_handler))
        .route(
            "/threads/{id}",
            get(thread_handler).patch(update_thread_handler).delete(remove_thread_handler),
        )
        .route("/messages", get(messages_handler).post(add_message_handler))
        .route(
            "/messages/{id}",
            get(message_handler).patch(update_message_handler).delete(remove_message_handler),
        )
}

pub async fn health_handler(State(state): State<AppState>) -> AppResult<Json<Value>> {
    state.store.health_check().await?;
    Ok(Json(json!({ "status": "ok" })))
}

// --- Account ---

pub async fn login_handler(
    State(state): State<AppState>,
    Json(req): Json<Credentials>,
) -> AppResult<Json<AuthPayload>> {
    Ok(Json(state.graph.login(&req.email, &req.password).await?))
}

pub async fn add_user_handler(
    State(state): State<AppState>,
    Json(req): Json<Credentials>,
) -> AppResult<Json<AuthPayload>> {
    Ok(Json(state.graph.add_user(&req.email, &req.password).await?))
}

pub async fn me_handler(State(state): State<AppState>, vc: Vc) -> AppResult<Json<User>> {
    Ok(Json(state.graph.me(&vc).await?))
}

pub async fn users_handler(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    Ok(Json(state.graph.users().await?))
}

pub async fn user_handler(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<Json<User>> {
    Ok(Json(state.graph.user(id).await?))
}

pub async fn update_user_handler(
    State(state): State<AppState>,
    vc: Vc,
    Path(id): Path<EntityId>,
    Json(req): Json<UpdateUserRequest>,
) -> AppResult<Json<User>> {
    Ok(Json(state.graph.update_user(&vc, id, req.profile).await?))
}

pub async fn userprofile_handler(
    State(state): State<AppState>,
    Path(user): Path<EntityId>,
) -> AppResult<Json<Option<Profile>>> {
    Ok(Json(state.graph.userprofile(user).await?))
}

// --- Profile ---

pub async fn profiles_handler(State(state): State<AppState>) -> AppResult<Json<Vec<Profile>>> {
    Ok(Json(state.graph.profiles().await?))
}

pub async fn profile_handler(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<Json<Profile>> {
    Ok(Json(state.graph.profile(id).await?))
}

pub async fn add_profile_handler(
    State(state): State<AppState>,
    vc: Vc,
    Json(input): Json<ProfileInput>,
) -> AppResult<Json<Profile>> {
    Ok(Json(state.graph.add_profile(&vc, &input).await?))
}

pub async fn update_profile_handler(
    State(state): State<AppState>,
    vc: Vc,
    Path(id): Path<EntityId>,
    Json(input): Json<ProfileInput>,
) -> AppResult<Json<Profile>> {
    Ok(Json(state.graph.update_profile(&vc, id, &input).await?))
}

pub async fn remove_profile_handler(
    State(state): State<AppState>,
    vc: Vc,
    Path(id): Path<EntityId>,
) -> AppResult<Json<Option<Profile>>> {
    Ok(Json(state.graph.remove_profile(&vc, id).await?))
}

// --- Group ---

pub async fn groups_handler(
    State(state): State<AppState>,
    Query(filter): Query<GroupFilter>,
) -> AppResult<Json<Vec<Group>>> {
    Ok(Json(state.graph.groups(&filter).await?))
}

pub async fn group_handler(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<Json<Group>> {
    Ok(Json(state.graph.group(id).await?))
}

pub async fn add_group_handler(
    State(state): State<AppState>,
    vc: Vc,
    Json(input): Json<GroupInput>,
) -> AppResult<Json<Group>> {
    Ok(Json(state.graph.add_group(&vc, &input).await?))
}

pub async fn update_group_handler(
    State(state): State<AppState>,
    vc: Vc,
    Path(id): Path<EntityId>,
    Json(input): Json<GroupInput>,
) -> AppResult<Json<Group>> {
    Ok(Json(state.graph.update_group(&vc, id, &input).await?))
}

pub async fn remove_group_handler(
    State(state): State<AppState>,
    vc: Vc,
    Path(id): Path<EntityId>,
) -> AppResult<Json<Option<Group>>> {
    Ok(Json(state.graph.remove_group(&vc, id).await?))
}

// --- Event ---

pub async fn events_handler(
    State(state): State<AppState>,
    Query(filter): Query<EventFilter>,
) -> AppResult<Json<Vec<Event>>> {
    Ok(Json(state.graph.events(&filter).await?))
}

pub async fn event_handler(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<Json<Event>> {
    Ok(Json(state.graph.event(id).await?))
}

pub async fn add_event_handler(
    State(state): State<AppState>,
    vc: Vc,
    Json(input): Json<EventInput>,
) -> AppResult<Json<Event>> {
    Ok(Json(state.graph.add_event(&vc, &input).await?))
}

pub async fn update_event_handler(
    State(state): State<AppState>,
    vc: Vc,
    Path(id): Path<EntityId>,
    Json(input): Json<EventInput>,
) -> AppResult<Json<Event>> {
    Ok(Json(state.graph.update_event(&vc, id, &input).await?))
}

pub async fn remove_event_handler(
    State(state): State<AppState>,
    vc: Vc,
    Path(id): Path<EntityId>,
) -> AppResult<Json<Option<Event>>> {
    Ok(Json(state.graph.remove_event(&vc, id).await?))
}

// --- Post ---

pub async fn posts_handler(
    State(state): State<AppState>,
    Query(filter): Query<PostFilter>,
) -> AppResult<Json<Vec<Post>>> {
    Ok(Json(state.graph.posts(&filter).await?))
}

pub async fn post_handler(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<Json<Post>> {
    Ok(Json(state.graph.post(id).await?))
}

pub async fn add_post_handler(
    State(state): State<AppState>,
    vc: Vc,
    Json(input): Json<PostInput>,
) -> AppResult<Json<Post>> {
    Ok(Json(state.graph.add_post(&vc, &input).await?))
}

pub async fn update_post_handler(
    State(state): State<AppState>,
    vc: Vc,
    Path(id): Path<EntityId>,
    Json(input): Json<PostInput>,
) -> AppResult<Json<Post>> {
    Ok(Json(state.graph.update_post(&vc, id, &input).await?))
}

pub async fn remove_post_handler(
    State(state): State<AppState>,
    vc: Vc,
    Path(id): Path<EntityId>,
) -> AppResult<Json<Option<Post>>> {
    Ok(Json(state.graph.remove_post(&vc, id).await?))
}

// --- Comment ---

pub async fn comments_handler(
    State(state): State<AppState>,
    Query(filter): Query<CommentFilter>,
) -> AppResult<Json<Vec<Comment>>> {
    Ok(Json(state.graph.comments(&filter).await?))
}

pub async fn comment_handler(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<Json<Comment>> {
    Ok(Json(state.graph.comment(id).await?))
}

pub async fn add_comment_handler(
    State(state): State<AppState>,
    vc: Vc,
    Json(input): Json<CommentInput>,
) -> AppResult<Json<Comment>> {
    Ok(Json(state.graph.add_comment(&vc, &input).await?))
}

pub async fn update_comment_handler(
    State(state): State<AppState>,
    vc: Vc,
    Path(id): Path<EntityId>,
    Json(input): Json<CommentInput>,
) -> AppResult<Json<Comment>> {
    Ok(Json(state.graph.update_comment(&vc, id, &input).await?))
}

pub async fn remove_comment_handler(
    State(state): State<AppState>,
    vc: Vc,
    Path(id): Path<EntityId>,
) -> AppResult<Json<Option<Comment>>> {
    Ok(Json(state.graph.remove_comment(&vc, id).await?))
}

// --- Thread ---

pub async fn threads_handler(
    State(state): State<AppState>,
    Query(filter): Query<ThreadFilter>,
) -> AppResult<Json<Vec<Thread>>> {
    Ok(Json(state.graph.threads(&filter).await?))
}

pub async fn thread_handler(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<Json<Thread>> {
    Ok(Json(state.graph.thread(id).await?))
}

pub async fn add_thread_handler(
    State(state): State<AppState>,
    vc: Vc,
    Json(input): Json<ThreadInput>,
) -> AppResult<Json<Thread>> {
    Ok(Json(state.graph.add_thread(&vc, &input).await?))
}

pub async fn update_thread_handler(
    State(state): State<AppState>,
    vc: Vc,
    Path(id): Path<EntityId>,
    Json(input): Json<ThreadInput>,
) -> AppResult<Json<Thread>> {
    Ok(Json(state.graph.update_thread(&vc, id, &input).await?))
}

pub async fn remove_thread_handler(
    State(state): State<AppState>,
    vc: Vc,
    Path(id): Path<EntityId>,
) -> AppResult<Json<Option<Thread>>> {
    Ok(Json(state.graph.remove_thread(&vc, id).await?))
}

// --- Message ---

pub async fn messages_handler(
    State(state): State<AppState>,
    Query(filter): Query<MessageFilter>,
) -> AppResult<Json<Vec<Message>>> {
    Ok(Json(state.graph.messages(&filter).await?))
}

pub async fn message_handler(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<Json<Message>> {
    Ok(Json(state.graph.message(id).await?))
}

pub async fn add_message_handler(
    State(state): State<AppState>,
    vc: Vc,
    Json(input): Json<MessageInput>,
) -> AppResult<Json<Message>> {
    Ok(Json(state.graph.add_message(&vc, &input).await?))
}

pub async fn update_message_handler(
    State(state): State<AppState>,
    vc: Vc,
    Path(id): Path<EntityId>,
    Json(input): Json<MessageInput>,
) -> AppResult<Json<Message>> {
    Ok(Json(state.graph.update_message(&vc, id, &input).await?))
}

pub async fn remove_message_handler(
    State(state): State<AppState>,
    vc: Vc,
    Path(id): Path<EntityId>,
) -> AppResult<Json<Option<Message>>> {
    Ok(Json(state.graph.remove_message(&vc, id).await?))
}
