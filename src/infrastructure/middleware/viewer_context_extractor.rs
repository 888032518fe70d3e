// ViewerContext Extractor - hands the middleware's viewer to handlers

use axum::{extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;
use std::sync::Arc;

use crate::infrastructure::viewer::ViewerContext;

/// Cheap-to-clone handle on the request's ViewerContext.
///
/// Falls back to an anonymous viewer when the middleware did not run, so a
/// route mounted outside the layer can never act as someone.
#[derive(Debug, Clone)]
pub struct Vc(Arc<ViewerContext>);

impl Vc {
    pub fn new(vc: Arc<ViewerContext>) -> Self {
        Self(vc)
    }

    pub fn arc(self) -> Arc<ViewerContext> {
        self.0
    }
}

impl std::ops::Deref for Vc {
    type Target = ViewerContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Vc
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let vc = parts
            .extensions
            .get::<Arc<ViewerContext>>()
            .cloned()
            .unwrap_or_else(|| Arc::new(ViewerContext::anonymous()));
        Ok(Vc(vc))
    }
}
