// Viewer Context - the per-request identity, passed explicitly to every service call

use uuid::Uuid;

use crate::core::EntityId;

/// The authenticated caller, as embedded in a verified identity token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: EntityId,
    pub email: String,
}

/// Request-scoped viewer. Anonymous when no valid token accompanied the request.
#[derive(Debug, Clone)]
pub struct ViewerContext {
    pub identity: Option<Identity>,
    pub request_id: String,
}

impl ViewerContext {
    pub fn anonymous() -> Self {
        Self {
            identity: None,
            request_id: format!("req-{}", Uuid::new_v4()),
        }
    }

    pub fn authenticated(identity: Identity) -> Self {
        Self {
            request_id: format!("user-{}-{}", identity.user_id, Uuid::new_v4()),
            identity: Some(identity),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn user_id(&self) -> Option<EntityId> {
        self.identity.as_ref().map(|identity| identity.user_id)
    }
}
