// Integration tests for the graph operations against an in-memory store

use chrono::{DateTime, Utc};
use std::sync::Arc;

use lobby_graph::config::AuthConfig;
use lobby_graph::core::{EntityId, EntityKind};
use lobby_graph::ent_schema::{normalize_document, WriteMode};
use lobby_graph::entities::{
    CommentFilter, CommentInput, EventInput, GroupFilter, GroupInput, MessageFilter, MessageInput,
    PostFilter, PostInput, ProfileInput, ThreadFilter, ThreadInput,
};
use lobby_graph::error::AppError;
use lobby_graph::infrastructure::database::{Document, EntityStore};
use lobby_graph::infrastructure::security::{SecurityConfig, SecurityService};
use lobby_graph::infrastructure::sqlite_database::SqliteDatabase;
use lobby_graph::infrastructure::viewer::ViewerContext;
use lobby_graph::schemas::PostSchema;
use lobby_graph::services::AuthPayload;
use lobby_graph::GraphInterface;

struct Harness {
    graph: GraphInterface,
    store: Arc<dyn EntityStore>,
    security: Arc<SecurityService>,
}

impl Harness {
    async fn new() -> Self {
        let store: Arc<dyn EntityStore> = Arc::new(SqliteDatabase::new_in_memory().await.unwrap());
        Self::over(store)
    }

    fn over(store: Arc<dyn EntityStore>) -> Self {
        let security = Arc::new(SecurityService::new(SecurityConfig::from(&AuthConfig::default())));
        Self {
            graph: GraphInterface::new(store.clone(), security.clone()),
            store,
            security,
        }
    }

    /// The viewer a request carrying this token would get
    fn viewer(&self, auth: &AuthPayload) -> ViewerContext {
        ViewerContext::authenticated(self.security.verify_token(&auth.token).unwrap())
    }

    async fn signed_in(&self, email: &str) -> (AuthPayload, ViewerContext) {
        let auth = self.graph.add_user(email, "p").await.unwrap();
        let vc = self.viewer(&auth);
        (auth, vc)
    }

    /// Every document of every kind, for before/after comparisons
    async fn snapshot(&self) -> Vec<(EntityKind, Vec<(EntityId, Document)>)> {
        let mut snapshot = Vec::new();
        for kind in EntityKind::ALL {
            let documents = self.store.find(kind, &Document::new()).await.unwrap();
            snapshot.push((kind, documents.into_iter().map(|d| (d.id, d.data)).collect()));
        }
        snapshot
    }
}

fn at(timestamp: &str) -> DateTime<Utc> {
    timestamp.parse().unwrap()
}

fn event_input(name: &str) -> EventInput {
    EventInput {
        event_name: Some(name.to_string()),
        event_date: Some(at("2025-06-01T18:00:00Z")),
        lobby_code: Some("LOBBY-7".to_string()),
        description: Some("Weekly raid".to_string()),
        ..Default::default()
    }
}

fn profile_input(user: EntityId) -> ProfileInput {
    ProfileInput {
        first_name: Some("Jo".to_string()),
        last_name: Some("Doe".to_string()),
        user: Some(user),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_anonymous_mutations_are_rejected_without_touching_the_store() {
    let h = Harness::new().await;
    let (auth, vc) = h.signed_in("a@x.com").await;
    let event = h.graph.add_event(&vc, &event_input("Raid")).await.unwrap();

    let anon = ViewerContext::anonymous();
    let missing = EntityId::new(424242);
    let before = h.snapshot().await;

    let results = vec![
        h.graph.update_user(&anon, auth.user.id, None).await.map(|_| ()),
        h.graph.add_profile(&anon, &profile_input(auth.user.id)).await.map(|_| ()),
        h.graph.update_profile(&anon, missing, &ProfileInput::default()).await.map(|_| ()),
        h.graph.remove_profile(&anon, missing).await.map(|_| ()),
        h.graph.add_group(&anon, &GroupInput::default()).await.map(|_| ()),
        h.graph.update_group(&anon, missing, &GroupInput::default()).await.map(|_| ()),
        h.graph.remove_group(&anon, missing).await.map(|_| ()),
        h.graph.add_event(&anon, &event_input("Raid")).await.map(|_| ()),
        h.graph.update_event(&anon, event.id, &event_input("Renamed")).await.map(|_| ()),
        h.graph.remove_event(&anon, event.id).await.map(|_| ()),
        h.graph.add_post(&anon, &PostInput::default()).await.map(|_| ()),
        h.graph.update_post(&anon, missing, &PostInput::default()).await.map(|_| ()),
        h.graph.remove_post(&anon, missing).await.map(|_| ()),
        h.graph.add_comment(&anon, &CommentInput::default()).await.map(|_| ()),
        h.graph.update_comment(&anon, missing, &CommentInput::default()).await.map(|_| ()),
        h.graph.remove_comment(&anon, missing).await.map(|_| ()),
        h.graph.add_thread(&anon, &ThreadInput::default()).await.map(|_| ()),
        h.graph.update_thread(&anon, missing, &ThreadInput::default()).await.map(|_| ()),
        h.graph.remove_thread(&anon, missing).await.map(|_| ()),
        h.graph.add_message(&anon, &MessageInput::default()).await.map(|_| ()),
        h.graph.update_message(&anon, missing, &MessageInput::default()).await.map(|_| ()),
        h.graph.remove_message(&anon, missing).await.map(|_| ()),
        h.graph.me(&anon).await.map(|_| ()),
    ];

    for (index, result) in results.into_iter().enumerate() {
        assert!(
            matches!(result, Err(AppError::NotAuthenticated)),
            "operation #{} was not gated: {:?}",
            index,
            result
        );
    }
    assert_eq!(h.snapshot().await, before);
}

#[tokio::test]
async fn test_duplicate_registration_fails_and_keeps_one_user() {
    let h = Harness::new().await;
    h.graph.add_user("a@x.com", "p").await.unwrap();

    let err = h.graph.add_user("  A@X.com ", "other").await.unwrap_err();
    assert!(matches!(err, AppError::DuplicateEmail(ref email) if email == "a@x.com"));

    let users = h.graph.users().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, "a@x.com");
}

#[tokio::test]
async fn test_registration_validates_credentials() {
    let h = Harness::new().await;
    assert!(matches!(h.graph.add_user("a@x.com", "").await, Err(AppError::Validation(_))));
    assert!(matches!(h.graph.add_user("not-an-email", "p").await, Err(AppError::Validation(_))));
    assert!(h.graph.users().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let h = Harness::new().await;
    h.graph.add_user("a@x.com", "p").await.unwrap();

    let wrong_password = h.graph.login("a@x.com", "nope").await.unwrap_err();
    let unknown_email = h.graph.login("b@x.com", "p").await.unwrap_err();

    assert!(matches!(wrong_password, AppError::InvalidCredentials));
    assert!(matches!(unknown_email, AppError::InvalidCredentials));
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    assert_eq!(wrong_password.status_code(), unknown_email.status_code());
}

#[tokio::test]
async fn test_login_issues_token_for_the_user() {
    let h = Harness::new().await;
    let registered = h.graph.add_user("a@x.com", "p").await.unwrap();

    let auth = h.graph.login(" A@x.com", "p").await.unwrap();
    assert_eq!(auth.user.id, registered.user.id);
    let identity = h.security.verify_token(&auth.token).unwrap();
    assert_eq!(identity.user_id, registered.user.id);
    assert_eq!(identity.email, "a@x.com");
}

#[tokio::test]
async fn test_update_merges_only_supplied_fields() {
    let h = Harness::new().await;
    let (_, vc) = h.signed_in("a@x.com").await;
    let event = h.graph.add_event(&vc, &event_input("Raid")).await.unwrap();

    let patch = EventInput {
        description: Some("Moved to Friday".to_string()),
        ..Default::default()
    };
    let updated = h.graph.update_event(&vc, event.id, &patch).await.unwrap();
    assert_eq!(updated.description, "Moved to Friday");

    let reread = h.graph.event(event.id).await.unwrap();
    assert_eq!(reread.description, "Moved to Friday");
    assert_eq!(reread.event_name, event.event_name);
    assert_eq!(reread.event_date, event.event_date);
    assert_eq!(reread.lobby_code.as_deref(), Some("LOBBY-7"));
}

#[tokio::test]
async fn test_update_of_missing_record_is_not_found() {
    let h = Harness::new().await;
    let (_, vc) = h.signed_in("a@x.com").await;

    let err = h
        .graph
        .update_event(&vc, EntityId::new(99), &event_input("Raid"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_update_cannot_blank_required_fields() {
    let h = Harness::new().await;
    let (_, vc) = h.signed_in("a@x.com").await;
    let event = h.graph.add_event(&vc, &event_input("Raid")).await.unwrap();

    let patch = EventInput {
        event_name: Some("   ".to_string()),
        ..Default::default()
    };
    let err = h.graph.update_event(&vc, event.id, &patch).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(h.graph.event(event.id).await.unwrap().event_name, "Raid");
}

#[tokio::test]
async fn test_remove_is_idempotent() {
    let h = Harness::new().await;
    let (_, vc) = h.signed_in("a@x.com").await;
    let event = h.graph.add_event(&vc, &event_input("Raid")).await.unwrap();

    let before = h.snapshot().await;
    assert_eq!(h.graph.remove_event(&vc, EntityId::new(77)).await.unwrap(), None);
    assert_eq!(h.snapshot().await, before);

    let removed = h.graph.remove_event(&vc, event.id).await.unwrap().unwrap();
    assert_eq!(removed.id, event.id);
    assert!(matches!(h.graph.event(event.id).await, Err(AppError::NotFound(_))));
    assert_eq!(h.graph.remove_event(&vc, event.id).await.unwrap(), None);
}

#[tokio::test]
async fn test_dangling_group_hydrates_to_null() {
    let h = Harness::new().await;
    let (auth, vc) = h.signed_in("a@x.com").await;
    let group = h
        .graph
        .add_group(
            &vc,
            &GroupInput {
                group_name: Some("Raiders".to_string()),
                description: Some("Tuesday crew".to_string()),
                user: Some(auth.user.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let event = h
        .graph
        .add_event(
            &vc,
            &EventInput {
                group: Some(group.id),
                user: Some(auth.user.id),
                ..event_input("Raid")
            },
        )
        .await
        .unwrap();

    let hydrated = h.graph.event(event.id).await.unwrap();
    assert_eq!(hydrated.group.as_ref().unwrap().loaded().unwrap().group_name, "Raiders");

    h.graph.remove_group(&vc, group.id).await.unwrap();

    let after = h.graph.event(event.id).await.unwrap();
    assert_eq!(after.group, None);
    assert_eq!(after.user.as_ref().unwrap().loaded().unwrap().email, "a@x.com");
    assert_eq!(h.graph.events(&Default::default()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_hydration_is_one_level_deep() {
    let h = Harness::new().await;
    let (auth, vc) = h.signed_in("a@x.com").await;
    let group = h
        .graph
        .add_group(
            &vc,
            &GroupInput {
                group_name: Some("Raiders".to_string()),
                description: Some("crew".to_string()),
                user: Some(auth.user.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let event = h
        .graph
        .add_event(&vc, &EventInput { group: Some(group.id), ..event_input("Raid") })
        .await
        .unwrap();

    let hydrated = h.graph.event(event.id).await.unwrap();
    let group = hydrated.group.unwrap();
    let group = group.loaded().unwrap();
    assert!(!group.user.as_ref().unwrap().is_loaded());
}

#[tokio::test]
async fn test_add_rejects_missing_fields_and_dangling_references() {
    let h = Harness::new().await;
    let (_, vc) = h.signed_in("a@x.com").await;

    let no_last_name = ProfileInput {
        first_name: Some("Jo".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        h.graph.add_profile(&vc, &no_last_name).await,
        Err(AppError::Validation(_))
    ));

    let dangling = profile_input(EntityId::new(31337));
    let err = h.graph.add_profile(&vc, &dangling).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(ref msg) if msg.contains("user")));

    assert!(h.graph.profiles().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_reference_must_point_at_the_declared_kind() {
    let h = Harness::new().await;
    let (auth, vc) = h.signed_in("a@x.com").await;

    // a user id is not a group
    let input = EventInput {
        group: Some(auth.user.id),
        ..event_input("Raid")
    };
    assert!(matches!(h.graph.add_event(&vc, &input).await, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_profile_trims_names_and_keeps_attributes() {
    let h = Harness::new().await;
    let (auth, vc) = h.signed_in("a@x.com").await;

    let mut attributes = Document::new();
    attributes.insert("favouriteGame".to_string(), "Halo".into());
    let profile = h
        .graph
        .add_profile(
            &vc,
            &ProfileInput {
                first_name: Some("  Jo ".to_string()),
                last_name: Some("Doe".to_string()),
                current_city: Some("Austin".to_string()),
                attributes: Some(attributes),
                user: Some(auth.user.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(profile.first_name, "Jo");
    assert_eq!(profile.attributes["favouriteGame"], "Halo");

    let found = h.graph.userprofile(auth.user.id).await.unwrap().unwrap();
    assert_eq!(found.id, profile.id);
    assert_eq!(found.current_city.as_deref(), Some("Austin"));
    assert_eq!(found.user.unwrap().loaded().unwrap().email, "a@x.com");

    assert_eq!(h.graph.userprofile(EntityId::new(5)).await.unwrap(), None);
}

#[tokio::test]
async fn test_post_date_defaults_to_creation_time() {
    let h = Harness::new().await;
    let (auth, vc) = h.signed_in("a@x.com").await;

    let before = Utc::now();
    let post = h
        .graph
        .add_post(
            &vc,
            &PostInput {
                title: Some("Hello".to_string()),
                content: Some("First!".to_string()),
                user: Some(auth.user.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(post.date >= before - chrono::Duration::seconds(1));
    assert!(post.date <= Utc::now());
    assert!(post.comments.is_empty());
    // add returns raw references
    assert!(!post.user.unwrap().is_loaded());
}

#[tokio::test]
async fn test_comments_are_linked_into_their_post() {
    let h = Harness::new().await;
    let (auth, vc) = h.signed_in("a@x.com").await;
    let post = h
        .graph
        .add_post(
            &vc,
            &PostInput {
                title: Some("Hello".to_string()),
                content: Some("First!".to_string()),
                user: Some(auth.user.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let mut comments = Vec::new();
    for text in ["one", "two", "three"] {
        let comment = h
            .graph
            .add_comment(
                &vc,
                &CommentInput {
                    comment: Some(text.to_string()),
                    comment_date: Some(Utc::now()),
                    post: Some(post.id),
                    user: Some(auth.user.id),
                },
            )
            .await
            .unwrap();
        comments.push(comment);
    }

    let hydrated = h.graph.post(post.id).await.unwrap();
    let texts: Vec<_> = hydrated
        .comments
        .iter()
        .map(|c| c.loaded().unwrap().comment.clone())
        .collect();
    assert_eq!(texts, vec!["one", "two", "three"]);

    let listed = h.graph.comments(&CommentFilter { post: Some(post.id) }).await.unwrap();
    assert_eq!(listed.len(), 3);
    assert_eq!(listed[0].post.as_ref().unwrap().id(), post.id);

    // no cascade: the id stays in the list but hydration skips it
    h.graph.remove_comment(&vc, comments[1].id).await.unwrap();
    let raw = h.store.get(EntityKind::Post, post.id).await.unwrap().unwrap();
    assert_eq!(raw.data["comments"].as_array().unwrap().len(), 3);

    let hydrated = h.graph.post(post.id).await.unwrap();
    let ids: Vec<_> = hydrated.comments.iter().map(|c| c.id()).collect();
    assert_eq!(ids, vec![comments[0].id, comments[2].id]);
}

#[tokio::test]
async fn test_post_updates_cannot_rewrite_the_comment_list() {
    let h = Harness::new().await;
    let (auth, vc) = h.signed_in("a@x.com").await;
    let post = h
        .graph
        .add_post(
            &vc,
            &PostInput {
                title: Some("Hello".to_string()),
                content: Some("First!".to_string()),
                user: Some(auth.user.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let mut comment_ids = Vec::new();
    for text in ["one", "two"] {
        let comment = h
            .graph
            .add_comment(
                &vc,
                &CommentInput {
                    comment: Some(text.to_string()),
                    comment_date: Some(Utc::now()),
                    post: Some(post.id),
                    user: Some(auth.user.id),
                },
            )
            .await
            .unwrap();
        comment_ids.push(comment.id);
    }

    // the list is not writable through any post write
    for mode in [WriteMode::Create, WriteMode::Update] {
        let patch = serde_json::json!({"comments": []}).as_object().cloned().unwrap();
        assert!(matches!(
            normalize_document::<PostSchema>(mode, patch),
            Err(AppError::Validation(_))
        ));
    }

    let updated = h
        .graph
        .update_post(
            &vc,
            post.id,
            &PostInput {
                title: Some("Edited".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let ids: Vec<_> = updated.comments.iter().map(|c| c.id()).collect();
    assert_eq!(ids, comment_ids);

    let reread = h.graph.post(post.id).await.unwrap();
    assert_eq!(reread.title, "Edited");
    let ids: Vec<_> = reread.comments.iter().map(|c| c.id()).collect();
    assert_eq!(ids, comment_ids);
}

#[tokio::test]
async fn test_post_filters_are_anded() {
    let h = Harness::new().await;
    let (alice, vc) = h.signed_in("a@x.com").await;
    let (bob, _) = h.signed_in("b@x.com").await;
    let event = h.graph.add_event(&vc, &event_input("Raid")).await.unwrap();

    let post = |user: EntityId, event: Option<EntityId>, title: &str| PostInput {
        title: Some(title.to_string()),
        content: Some("...".to_string()),
        user: Some(user),
        event,
        ..Default::default()
    };
    h.graph.add_post(&vc, &post(alice.user.id, Some(event.id), "a-event")).await.unwrap();
    h.graph.add_post(&vc, &post(alice.user.id, None, "a-plain")).await.unwrap();
    h.graph.add_post(&vc, &post(bob.user.id, Some(event.id), "b-event")).await.unwrap();

    let titles = |posts: Vec<lobby_graph::entities::Post>| -> Vec<String> {
        posts.into_iter().map(|p| p.title).collect()
    };

    let by_alice = h
        .graph
        .posts(&PostFilter { user: Some(alice.user.id), event: None })
        .await
        .unwrap();
    assert_eq!(titles(by_alice), vec!["a-event", "a-plain"]);

    let at_event = h
        .graph
        .posts(&PostFilter { user: None, event: Some(event.id) })
        .await
        .unwrap();
    assert_eq!(titles(at_event), vec!["a-event", "b-event"]);

    let both = h
        .graph
        .posts(&PostFilter { user: Some(alice.user.id), event: Some(event.id) })
        .await
        .unwrap();
    assert_eq!(titles(both), vec!["a-event"]);

    assert_eq!(h.graph.posts(&PostFilter::default()).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_groups_and_events_filter_by_reference() {
    let h = Harness::new().await;
    let (auth, vc) = h.signed_in("a@x.com").await;
    let event = h.graph.add_event(&vc, &event_input("Raid")).await.unwrap();

    let group = h
        .graph
        .add_group(
            &vc,
            &GroupInput {
                group_name: Some("Raiders".to_string()),
                description: Some("crew".to_string()),
                event: Some(event.id),
                user: Some(auth.user.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    h.graph
        .add_group(
            &vc,
            &GroupInput {
                group_name: Some("Loners".to_string()),
                description: Some("solo".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let for_event = h
        .graph
        .groups(&GroupFilter { event: Some(event.id), user: None })
        .await
        .unwrap();
    assert_eq!(for_event.len(), 1);
    assert_eq!(for_event[0].id, group.id);
    assert_eq!(for_event[0].event.as_ref().unwrap().loaded().unwrap().event_name, "Raid");

    let linked = h
        .graph
        .update_event(&vc, event.id, &EventInput { group: Some(group.id), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(linked.group.unwrap().id(), group.id);

    let in_group = h
        .graph
        .events(&lobby_graph::entities::EventFilter { group: Some(group.id) })
        .await
        .unwrap();
    assert_eq!(in_group.len(), 1);
    assert_eq!(h.graph.groups(&GroupFilter::default()).await.unwrap().len(), 2);
    assert_eq!(h.graph.group(group.id).await.unwrap().group_name, "Raiders");
}

#[tokio::test]
async fn test_threads_and_messages() {
    let h = Harness::new().await;
    let (alice, vc) = h.signed_in("a@x.com").await;
    let (bob, _) = h.signed_in("b@x.com").await;

    let thread = h
        .graph
        .add_thread(
            &vc,
            &ThreadInput {
                text: Some("gg".to_string()),
                user: Some(alice.user.id),
                match_user: Some(bob.user.id),
            },
        )
        .await
        .unwrap();

    for text in ["hi", "rematch?"] {
        h.graph
            .add_message(
                &vc,
                &MessageInput {
                    text: Some(text.to_string()),
                    date: Some(Utc::now()),
                    thread: Some(thread.id),
                    user: Some(alice.user.id),
                },
            )
            .await
            .unwrap();
    }

    let threads = h.graph.threads(&ThreadFilter { user: Some(alice.user.id) }).await.unwrap();
    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0].match_user.as_ref().unwrap().loaded().unwrap().email, "b@x.com");

    let messages = h
        .graph
        .messages(&MessageFilter { thread: Some(thread.id) })
        .await
        .unwrap();
    let texts: Vec<_> = messages.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["hi", "rematch?"]);
    assert_eq!(messages[0].thread.as_ref().unwrap().loaded().unwrap().text, "gg");

    let removed = h.graph.remove_thread(&vc, thread.id).await.unwrap();
    assert!(removed.is_some());
    assert!(matches!(h.graph.thread(thread.id).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_signup_profile_and_me_scenario() {
    let h = Harness::new().await;

    let registered = h.graph.add_user("a@x.com", "p").await.unwrap();
    assert!(!registered.token.is_empty());
    assert_eq!(registered.user.email, "a@x.com");

    let auth = h.graph.login("a@x.com", "p").await.unwrap();
    let vc = h.viewer(&auth);

    let profile = h.graph.add_profile(&vc, &profile_input(auth.user.id)).await.unwrap();
    let user = h
        .graph
        .update_user(&vc, auth.user.id, Some(profile.id))
        .await
        .unwrap();
    assert_eq!(user.profile.unwrap().id(), profile.id);

    let me = h.graph.me(&vc).await.unwrap();
    assert_eq!(me.id, auth.user.id);
    let hydrated = me.profile.unwrap();
    let hydrated = hydrated.loaded().unwrap();
    assert_eq!(hydrated.id, profile.id);
    assert_eq!(hydrated.first_name, "Jo");
}

#[tokio::test]
async fn test_data_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("graph.db").display());

    let user_id = {
        let store: Arc<dyn EntityStore> = Arc::new(SqliteDatabase::connect(&url, 2, 0).await.unwrap());
        let h = Harness::over(store);
        h.graph.add_user("a@x.com", "p").await.unwrap().user.id
    };

    let store: Arc<dyn EntityStore> = Arc::new(SqliteDatabase::connect(&url, 2, 0).await.unwrap());
    let h = Harness::over(store);
    let auth = h.graph.login("a@x.com", "p").await.unwrap();
    assert_eq!(auth.user.id, user_id);
    assert!(matches!(
        h.graph.add_user("a@x.com", "p").await,
        Err(AppError::DuplicateEmail(_))
    ));
}
