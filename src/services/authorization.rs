// Authorization Gate - the single check every protected operation runs first

use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::infrastructure::viewer::{Identity, ViewerContext};

/// Identity of the caller, or `NotAuthenticated` for an anonymous viewer.
/// Pure guard: reads the context and nothing else.
pub fn authorize(vc: &ViewerContext) -> AppResult<&Identity> {
    match vc.identity.as_ref() {
        Some(identity) => Ok(identity),
        None => {
            debug!(request_id = %vc.request_id, "rejected anonymous viewer");
            Err(AppError::NotAuthenticated)
        }
    }
}
