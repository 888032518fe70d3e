// Auth Service - registration, login and the identity-bound user operations

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::core::{EntityId, EntityKind};
use crate::ent_schema::{normalize_document, normalize_email, WriteMode};
use crate::entities::{to_document, Entity, User, UserInput};
use crate::error::{AppError, AppResult};
use crate::infrastructure::database::{Document, EntityStore};
use crate::infrastructure::security::SecurityService;
use crate::infrastructure::viewer::ViewerContext;
use crate::schemas::UserSchema;
use crate::services::authorization::authorize;
use crate::services::mutation_service::MutationService;
use crate::services::query_service::QueryService;

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Returned by login and registration alike
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn EntityStore>,
    security: Arc<SecurityService>,
    queries: QueryService,
    mutations: MutationService,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn EntityStore>,
        security: Arc<SecurityService>,
        queries: QueryService,
        mutations: MutationService,
    ) -> Self {
        Self {
            store,
            security,
            queries,
            mutations,
        }
    }

    /// Unknown email and wrong password fail identically
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthPayload> {
        let mut criteria = Document::new();
        criteria.insert("email".to_string(), Value::String(normalize_email(email)));

        let Some(stored) = self.store.find(EntityKind::User, &criteria).await?.into_iter().next() else {
            warn!("login for unknown email");
            return Err(AppError::InvalidCredentials);
        };

        let hash = stored
            .data
            .get("password")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::Internal(format!("User {} has no password hash", stored.id)))?
            .to_string();

        if !self.security.verify_password(password, &hash).await? {
            warn!(user_id = %stored.id, "login with wrong password");
            return Err(AppError::InvalidCredentials);
        }

        let user = User::from_stored(stored)?.hydrate(self.queries.resolver()).await;
        let token = self.security.issue_token(user.id, &user.email)?;
        info!(user_id = %user.id, "user logged in");

        Ok(AuthPayload { token, user })
    }

    /// Anonymous registration; issues a token through the same path as login
    #[instrument(skip(self, password))]
    pub async fn add_user(&self, email: &str, password: &str) -> AppResult<AuthPayload> {
        if password.is_empty() {
            return Err(AppError::Validation("password must be non-empty".to_string()));
        }

        let document = normalize_document::<UserSchema>(
            WriteMode::Create,
            to_document(&json!({ "email": email, "password": password }))?,
        )?;
        let email = document
            .get("email")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let mut criteria = Document::new();
        criteria.insert("email".to_string(), Value::String(email.clone()));
        if !self.store.find(EntityKind::User, &criteria).await?.is_empty() {
            return Err(AppError::DuplicateEmail(email));
        }

        let hash = self.security.hash_password(password).await?;
        let mut document = document;
        document.insert("password".to_string(), Value::String(hash));

        // the unique key still catches a registration racing this one
        let user: User = self.mutations.create(document).await?;
        let token = self.security.issue_token(user.id, &user.email)?;
        info!(user_id = %user.id, "user registered");

        Ok(AuthPayload { token, user })
    }

    /// The one mutation that may link a user to a profile
    pub async fn update_user(
        &self,
        vc: &ViewerContext,
        id: EntityId,
        profile: Option<EntityId>,
    ) -> AppResult<User> {
        self.mutations.update::<User>(vc, id, &UserInput { profile }).await
    }

    /// The caller's own user record, profile hydrated
    pub async fn me(&self, vc: &ViewerContext) -> AppResult<User> {
        let identity = authorize(vc)?;
        self.queries.find_by_id::<User>(identity.user_id).await
    }
}
