// ViewerContext Middleware
// Verifies the request's identity token once and injects the ViewerContext into request extensions

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

use crate::infrastructure::{security::SecurityService, viewer::ViewerContext};

/// Application state that can verify identity tokens
pub trait HasSecurityService {
    fn security(&self) -> &Arc<SecurityService>;
}

/// Creates the request-scoped viewer. A missing, malformed, expired or
/// forged token yields an anonymous viewer rather than a rejection; the
/// operations themselves decide whether identity is required.
pub async fn viewer_context_middleware<T>(
    State(app_state): State<T>,
    mut request: Request,
    next: Next,
) -> Response
where
    T: HasSecurityService + Clone + Send + Sync + 'static,
{
    let viewer_context = create_viewer_context(request.headers(), app_state.security());
    debug!(
        request_id = %viewer_context.request_id,
        authenticated = viewer_context.is_authenticated(),
        "viewer context created"
    );

    request.extensions_mut().insert(Arc::new(viewer_context));
    next.run(request).await
}

pub fn create_viewer_context(headers: &HeaderMap, security: &SecurityService) -> ViewerContext {
    match extract_token(headers) {
        Some(token) => match security.verify_token(&token) {
            Ok(identity) => ViewerContext::authenticated(identity),
            Err(_) => ViewerContext::anonymous(),
        },
        None => ViewerContext::anonymous(),
    }
}

/// Bearer credential first, then the `token` cookie
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        if let Some(token) = value.strip_prefix("Bearer ") {
            let token = token.trim();
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == "token" && !value.is_empty())
        .map(|(_, value)| value.to_string())
}
